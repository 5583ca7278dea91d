//! Core domain types for the tarot system.
//!
//! This module defines the fundamental types used throughout the system:
//! - Cards, arcana and interpretations
//! - Spreads and readings
//! - Persisted history entries

use crate::Error;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

// ============================================================================
// Card Types
// ============================================================================

/// Arcana category a card belongs to
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "lowercase")]
pub enum Arcana {
    Major,
    Cups,
    Wands,
    Swords,
    Pentacles,
}

impl Arcana {
    /// All categories, majors first then the four suits
    pub const ALL: [Arcana; 5] = [
        Arcana::Major,
        Arcana::Cups,
        Arcana::Wands,
        Arcana::Swords,
        Arcana::Pentacles,
    ];

    /// The four minor arcana suits
    pub const SUITS: [Arcana; 4] = [
        Arcana::Cups,
        Arcana::Wands,
        Arcana::Swords,
        Arcana::Pentacles,
    ];

    pub fn display_name(self) -> &'static str {
        match self {
            Arcana::Major => "Arcanes Majeurs",
            Arcana::Cups => "Coupes",
            Arcana::Wands => "Bâtons",
            Arcana::Swords => "Épées",
            Arcana::Pentacles => "Deniers",
        }
    }

    /// Energy descriptor substituted into generated minor arcana texts
    pub fn energy(self) -> &'static str {
        match self {
            Arcana::Major => "globale",
            Arcana::Cups => "émotionnelle",
            Arcana::Wands => "créative",
            Arcana::Swords => "mentale",
            Arcana::Pentacles => "matérielle",
        }
    }

    pub fn is_major(self) -> bool {
        matches!(self, Arcana::Major)
    }
}

/// Four-facet reading of a card
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct Interpretation {
    pub general: String,
    pub love: String,
    pub career: String,
    pub spiritual: String,
}

/// Stable card identity: arcana plus ordinal, identical across runs
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CardId {
    pub arcana: Arcana,
    pub number: u8,
}

impl fmt::Display for CardId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}-{}", self.arcana, self.number)
    }
}

/// A tarot card definition (e.g., "Le Mat")
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct Card {
    pub number: u8,
    pub name: String,
    pub arcana: Arcana,
    pub keywords: Vec<String>,
    pub upright_meaning: String,
    pub reversed_meaning: String,
    pub interpretation: Interpretation,
}

impl Card {
    pub fn id(&self) -> CardId {
        CardId {
            arcana: self.arcana,
            number: self.number,
        }
    }
}

/// A card as dealt in a reading
#[derive(Clone, Debug, PartialEq)]
pub struct DrawnCard {
    pub id: Uuid,
    pub card: Card,
    pub is_reversed: bool,
}

impl DrawnCard {
    pub(crate) fn new(card: Card, is_reversed: bool) -> Self {
        Self {
            id: Uuid::new_v4(),
            card,
            is_reversed,
        }
    }

    /// Meaning for the orientation the card was dealt in
    pub fn meaning(&self) -> &str {
        if self.is_reversed {
            &self.card.reversed_meaning
        } else {
            &self.card.upright_meaning
        }
    }
}

// ============================================================================
// Spread and Reading Types
// ============================================================================

/// Supported draw layouts
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "camelCase")]
pub enum SpreadType {
    DailyGuidance,
    PastPresentFuture,
    Relationship,
    SituationActionOutcome,
}

impl SpreadType {
    pub const ALL: [SpreadType; 4] = [
        SpreadType::DailyGuidance,
        SpreadType::PastPresentFuture,
        SpreadType::Relationship,
        SpreadType::SituationActionOutcome,
    ];

    pub fn card_count(self) -> usize {
        match self {
            SpreadType::DailyGuidance => 1,
            SpreadType::PastPresentFuture => 3,
            SpreadType::Relationship => 3,
            SpreadType::SituationActionOutcome => 3,
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            SpreadType::DailyGuidance => "Carte du jour",
            SpreadType::PastPresentFuture => "Passé · Présent · Futur",
            SpreadType::Relationship => "Relationnel",
            SpreadType::SituationActionOutcome => "Situation · Action · Résultat",
        }
    }

    pub fn subtitle(self) -> &'static str {
        match self {
            SpreadType::DailyGuidance => "Un message pour ta journée",
            SpreadType::PastPresentFuture => "Comprends ton chemin",
            SpreadType::Relationship => "Éclaire ta relation",
            SpreadType::SituationActionOutcome => "Trouve ta voie d'action",
        }
    }

    /// Positional labels, one per dealt card
    pub fn labels(self) -> &'static [&'static str] {
        match self {
            SpreadType::DailyGuidance => &["Message du jour"],
            SpreadType::PastPresentFuture => &["Passé", "Présent", "Futur"],
            SpreadType::Relationship => &["Toi", "L'autre", "Lien"],
            SpreadType::SituationActionOutcome => &["Situation", "Action", "Résultat"],
        }
    }

    /// Tag used in persisted history and on the wire
    pub fn tag(self) -> &'static str {
        match self {
            SpreadType::DailyGuidance => "dailyGuidance",
            SpreadType::PastPresentFuture => "pastPresentFuture",
            SpreadType::Relationship => "relationship",
            SpreadType::SituationActionOutcome => "situationActionOutcome",
        }
    }

    /// The largest card count of any spread
    pub fn max_card_count() -> usize {
        Self::ALL
            .iter()
            .map(|s| s.card_count())
            .max()
            .unwrap_or(0)
    }
}

impl fmt::Display for SpreadType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

impl FromStr for SpreadType {
    type Err = Error;

    /// Accepts the camelCase tag as well as kebab/snake case spellings
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized: String = s
            .chars()
            .filter(|c| *c != '-' && *c != '_')
            .flat_map(char::to_lowercase)
            .collect();

        match normalized.as_str() {
            "dailyguidance" | "daily" => Ok(SpreadType::DailyGuidance),
            "pastpresentfuture" => Ok(SpreadType::PastPresentFuture),
            "relationship" => Ok(SpreadType::Relationship),
            "situationactionoutcome" => Ok(SpreadType::SituationActionOutcome),
            _ => Err(Error::UnknownSpread(s.to_string())),
        }
    }
}

/// The result of a draw
#[derive(Clone, Debug, PartialEq)]
pub struct Reading {
    pub spread: SpreadType,
    pub cards: Vec<DrawnCard>,
    pub generated_at: DateTime<Utc>,
    pub question: Option<String>,
}

impl Reading {
    /// Pair each positional label with the card dealt there
    pub fn positions(&self) -> impl Iterator<Item = (&'static str, &DrawnCard)> + '_ {
        self.spread.labels().iter().copied().zip(self.cards.iter())
    }

    pub fn card_names(&self) -> Vec<String> {
        self.cards.iter().map(|c| c.card.name.clone()).collect()
    }
}

// ============================================================================
// Persisted Types
// ============================================================================

/// Summary of a past reading as stored in the history log
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct HistoryEntry {
    pub id: Uuid,
    pub created_at: DateTime<Utc>,
    pub spread: SpreadType,
    pub question: String,
    pub card_names: Vec<String>,
    /// Orientation of each card, parallel to `card_names`
    ///
    /// Entries written before orientations were recorded load with an empty list.
    #[serde(default)]
    pub card_reversals: Vec<bool>,
}

impl HistoryEntry {
    pub fn new(spread: SpreadType, question: impl Into<String>, card_names: Vec<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            created_at: Utc::now(),
            spread,
            question: question.into(),
            card_names,
            card_reversals: Vec::new(),
        }
    }

    /// Whether the card at `index` was drawn reversed, if that was recorded
    pub fn is_reversed(&self, index: usize) -> Option<bool> {
        self.card_reversals.get(index).copied()
    }

    /// Build an entry from a reading, substituting `placeholder` for a
    /// missing or blank question
    pub fn from_reading(reading: &Reading, placeholder: &str) -> Self {
        let question = reading
            .question
            .as_deref()
            .map(str::trim)
            .filter(|q| !q.is_empty())
            .unwrap_or(placeholder);

        Self {
            id: Uuid::new_v4(),
            created_at: reading.generated_at,
            spread: reading.spread,
            question: question.to_string(),
            card_names: reading.card_names(),
            card_reversals: reading.cards.iter().map(|c| c.is_reversed).collect(),
        }
    }
}

// ============================================================================
// Catalog Type
// ============================================================================

/// An ordered deck of cards
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Catalog {
    pub cards: Vec<Card>,
}
