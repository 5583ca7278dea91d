//! Default catalog of tarot cards.
//!
//! This module provides the built-in 78-card deck: 22 authored major arcana
//! followed by 56 minor arcana generated from rank and suit.

use crate::types::*;
use once_cell::sync::Lazy;
use std::collections::{HashMap, HashSet};

/// Cached default catalog - built once and reused across all operations
static DEFAULT_CATALOG: Lazy<Catalog> = Lazy::new(build_default_catalog_internal);

/// Number of cards in a complete deck
pub const DECK_SIZE: usize = 78;

const MINOR_RANKS: [&str; 14] = [
    "As", "Deux", "Trois", "Quatre", "Cinq", "Six", "Sept", "Huit", "Neuf", "Dix", "Valet",
    "Cavalier", "Reine", "Roi",
];

/// Get a reference to the cached default catalog
pub fn default_catalog() -> &'static Catalog {
    &DEFAULT_CATALOG
}

/// Builds a fresh copy of the default catalog
///
/// **Note**: For production use, prefer `default_catalog()` which returns a
/// cached reference. This function is retained for testing and custom decks.
pub fn build_default_catalog() -> Catalog {
    build_default_catalog_internal()
}

fn build_default_catalog_internal() -> Catalog {
    let mut cards = major_arcana();
    for suit in Arcana::SUITS {
        cards.extend(minor_arcana(suit));
    }
    Catalog { cards }
}

#[rustfmt::skip]
fn major_arcana() -> Vec<Card> {
    vec![
        major(0, "Le Mat", &["élan", "foi", "nouveau cycle"], "Ose un départ guidé par l'intuition.", "Évite la précipitation, recentre ton cap."),
        major(1, "Le Magicien", &["volonté", "création", "pouvoir personnel"], "Tu as les ressources pour manifester ton intention.", "Attention à la dispersion et aux promesses non tenues."),
        major(2, "La Papesse", &["intuition", "mystère", "sagesse"], "Écoute ton monde intérieur avant d'agir.", "Un secret ou un déni brouille ton jugement."),
        major(3, "L'Impératrice", &["abondance", "fertilité", "expression"], "Crée, nourris et laisse la vie circuler.", "Risque de surprotection ou de stagnation créative."),
        major(4, "L'Empereur", &["structure", "cadre", "autorité"], "Stabilise tes bases avec discipline.", "Rigidité ou besoin de contrôle excessif."),
        major(5, "Le Pape", &["enseignement", "valeurs", "tradition"], "Appuie-toi sur une sagesse éprouvée.", "Remets en question une règle devenue limitante."),
        major(6, "L'Amoureux", &["choix", "union", "alignement"], "Un choix de cœur demande cohérence.", "Ambivalence affective ou hésitation à s'engager."),
        major(7, "Le Chariot", &["élan", "victoire", "maîtrise"], "Avance avec détermination vers ton objectif.", "Le manque de direction ralentit ta progression."),
        major(8, "La Justice", &["équilibre", "vérité", "responsabilité"], "Choisis l'équité et la clarté.", "Évite les jugements hâtifs et l'injustice."),
        major(9, "L'Hermite", &["retrait", "quête", "discernement"], "Prends du recul pour entendre ta vérité.", "Isolement prolongé ou fermeture au monde."),
        major(10, "La Roue de Fortune", &["cycle", "changement", "destin"], "Un tournant s'ouvre, reste adaptable.", "Résistance au changement ou sentiment d'impuissance."),
        major(11, "La Force", &["courage", "douceur", "maîtrise émotionnelle"], "La vraie force naît de la patience du cœur.", "Fatigue nerveuse ou perte de confiance."),
        major(12, "Le Pendu", &["pause", "nouvelle perspective", "lâcher-prise"], "Une pause consciente éclaire la suite.", "Blocage dans une attente stérile."),
        major(13, "L'Arcane sans nom", &["transformation", "fin", "renaissance"], "Clôture nécessaire avant une renaissance.", "Peur de laisser mourir l'ancien."),
        major(14, "Tempérance", &["harmonie", "guérison", "fluidité"], "Trouve le juste dosage dans tes choix.", "Excès, impatience ou dispersion énergétique."),
        major(15, "Le Diable", &["attachement", "désir", "ombre"], "Observe ce qui t'enchaîne pour te libérer.", "Dépendance, peur ou auto-sabotage."),
        major(16, "La Maison Dieu", &["révélation", "rupture", "libération"], "Une vérité fracasse l'ancien pour te réaligner.", "Crainte du changement, résistance à la mue."),
        major(17, "L'Étoile", &["espoir", "inspiration", "foi"], "Tu es guidé·e, reste confiant·e.", "Doute, découragement ou perte de sens."),
        major(18, "La Lune", &["inconscient", "sensibilité", "imaginaire"], "Accueille tes émotions et tes rêves.", "Confusion émotionnelle, illusions ou anxiété."),
        major(19, "Le Soleil", &["joie", "clarté", "rayonnement"], "Succès, vitalité et vérité partagée.", "Égo blessé ou joie freinée par le doute."),
        major(20, "Le Jugement", &["appel", "éveil", "renouveau"], "Réponds à l'appel de ton âme.", "Rester figé·e dans le passé freine l'élan."),
        major(21, "Le Monde", &["accomplissement", "intégration", "expansion"], "Cycle accompli, ouverture vers une nouvelle étape.", "Difficulté à clôturer ou peur de grandir."),
    ]
}

fn major(number: u8, name: &str, keywords: &[&str], upright: &str, reversed: &str) -> Card {
    Card {
        number,
        name: name.to_string(),
        arcana: Arcana::Major,
        keywords: keywords.iter().map(|k| k.to_string()).collect(),
        upright_meaning: upright.to_string(),
        reversed_meaning: reversed.to_string(),
        interpretation: Interpretation {
            general: format!("{name} t'invite à te réaligner avec ta vérité intérieure."),
            love: format!("En amour, {name} met en lumière ce qui demande authenticité et maturité."),
            career: format!("Dans le pro, {name} encourage une décision alignée avec ta mission."),
            spiritual: format!("Spirituellement, {name} ouvre un passage d'évolution et de conscience."),
        },
    }
}

/// Generate the 14 cards of a suit, Ace (1) through King (14)
fn minor_arcana(suit: Arcana) -> Vec<Card> {
    let suit_name = suit.display_name();
    let energy = suit.energy();

    MINOR_RANKS
        .iter()
        .zip(1u8..)
        .map(|(rank, number)| {
            let name = format!("{rank} de {suit_name}");
            Card {
                number,
                arcana: suit,
                keywords: vec![
                    rank.to_lowercase(),
                    suit_name.to_lowercase(),
                    format!("énergie {energy}"),
                ],
                upright_meaning: format!("{name}: l'énergie {energy} circule de manière constructive."),
                reversed_meaning: format!("{name}: un déséquilibre {energy} invite à te réaligner."),
                interpretation: Interpretation {
                    general: format!("{name} t'invite à harmoniser ton quotidien avec ton intention."),
                    love: format!("En amour, {name} suggère d'exprimer clairement ton besoin {energy}."),
                    career: format!("Dans le travail, {name} recommande d'ordonner tes priorités {energy}."),
                    spiritual: format!("Spirituellement, {name} rappelle d'ancrer ton ressenti dans des rituels simples."),
                },
                name,
            }
        })
        .collect()
}

impl Catalog {
    /// Wrap an arbitrary list of cards, e.g. a reduced deck for testing
    pub fn from_cards(cards: Vec<Card>) -> Self {
        Self { cards }
    }

    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    pub fn find_by_name(&self, name: &str) -> Option<&Card> {
        self.cards.iter().find(|c| c.name == name)
    }

    pub fn find_by_id(&self, id: CardId) -> Option<&Card> {
        self.cards.iter().find(|c| c.id() == id)
    }

    pub fn by_arcana(&self, arcana: Arcana) -> impl Iterator<Item = &Card> + '_ {
        self.cards.iter().filter(move |c| c.arcana == arcana)
    }

    /// Names that appear on more than one card, in deck order
    pub fn duplicate_names(&self) -> Vec<&str> {
        let mut seen = HashSet::new();
        let mut duplicates = Vec::new();
        for card in &self.cards {
            let name = card.name.as_str();
            if !seen.insert(name) && !duplicates.contains(&name) {
                duplicates.push(name);
            }
        }
        duplicates
    }

    /// Validate the catalog for internal consistency
    ///
    /// Returns a list of validation errors (empty if valid).
    pub fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();

        if self.cards.len() != DECK_SIZE {
            errors.push(format!(
                "Catalog has {} cards, expected {}",
                self.cards.len(),
                DECK_SIZE
            ));
        }

        for card in &self.cards {
            if card.name.is_empty() {
                errors.push(format!("Card {} has empty name", card.id()));
            }
        }
        for name in self.duplicate_names() {
            errors.push(format!("Duplicate card name '{}'", name));
        }

        let mut ordinals: HashMap<Arcana, Vec<u8>> = HashMap::new();
        for card in &self.cards {
            ordinals.entry(card.arcana).or_default().push(card.number);
        }

        for arcana in Arcana::ALL {
            let mut numbers = ordinals.remove(&arcana).unwrap_or_default();
            numbers.sort_unstable();
            let expected: Vec<u8> = if arcana.is_major() {
                (0..=21).collect()
            } else {
                (1..=14).collect()
            };
            if numbers != expected {
                errors.push(format!(
                    "{} ordinals are {:?}, expected {}..={}",
                    arcana.display_name(),
                    numbers,
                    expected.first().copied().unwrap_or_default(),
                    expected.last().copied().unwrap_or_default()
                ));
            }
        }

        errors
    }
}
