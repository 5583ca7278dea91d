//! Reading engine for dealing spreads.
//!
//! A draw shuffles the whole deck, deals the first `card_count` cards in
//! order (position `i` maps to label `i` of the spread) and flips a fair coin
//! per card for its orientation. The randomness source is injected so tests
//! can use a seeded or fixed-sequence generator.

use crate::catalog::default_catalog;
use crate::{Catalog, DrawnCard, Error, Reading, Result, SpreadType};
use chrono::{DateTime, Utc};
use rand::rngs::ThreadRng;
use rand::seq::SliceRandom;
use rand::{Rng, RngCore};

/// Deals readings from a deck using a pluggable random source
#[derive(Debug)]
pub struct ReadingEngine<'a, R = ThreadRng> {
    catalog: &'a Catalog,
    rng: R,
}

impl ReadingEngine<'static, ThreadRng> {
    /// Engine over the default deck with the thread-local generator
    pub fn new() -> Self {
        Self {
            catalog: default_catalog(),
            rng: rand::rng(),
        }
    }
}

impl Default for ReadingEngine<'static, ThreadRng> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R: RngCore> ReadingEngine<'static, R> {
    /// Engine over the default deck with a caller-supplied generator
    pub fn with_rng(rng: R) -> Self {
        Self {
            catalog: default_catalog(),
            rng,
        }
    }
}

impl<'a, R: RngCore> ReadingEngine<'a, R> {
    /// Engine over a custom deck
    ///
    /// Fails if the deck cannot cover the largest spread or repeats a card
    /// name, so a constructed engine always deals complete readings of
    /// distinct cards.
    pub fn with_deck(catalog: &'a Catalog, rng: R) -> Result<Self> {
        let required = SpreadType::max_card_count();
        if catalog.len() < required {
            return Err(Error::DeckTooSmall {
                available: catalog.len(),
                required,
            });
        }
        let duplicates = catalog.duplicate_names();
        if !duplicates.is_empty() {
            return Err(Error::CatalogValidation(format!(
                "duplicate card names: {}",
                duplicates.join(", ")
            )));
        }
        Ok(Self { catalog, rng })
    }

    pub fn catalog(&self) -> &'a Catalog {
        self.catalog
    }

    /// Draw a reading stamped with the current time
    pub fn draw(&mut self, spread: SpreadType, question: Option<String>) -> Reading {
        self.draw_at(spread, question, Utc::now())
    }

    /// Draw a reading with an explicit timestamp
    ///
    /// The question is stored verbatim; trimming and placeholders are the
    /// caller's business.
    pub fn draw_at(
        &mut self,
        spread: SpreadType,
        question: Option<String>,
        generated_at: DateTime<Utc>,
    ) -> Reading {
        let mut deck: Vec<_> = self.catalog.cards.iter().collect();
        deck.shuffle(&mut self.rng);

        let cards: Vec<DrawnCard> = deck
            .into_iter()
            .take(spread.card_count())
            .map(|card| {
                let is_reversed = self.rng.random_bool(0.5);
                DrawnCard::new(card.clone(), is_reversed)
            })
            .collect();

        tracing::debug!(
            "Drew {} card(s) for {}: {:?}",
            cards.len(),
            spread,
            cards.iter().map(|c| c.card.name.as_str()).collect::<Vec<_>>()
        );

        Reading {
            spread,
            cards,
            generated_at,
            question,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::build_default_catalog;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use std::collections::HashSet;

    /// Fixed-sequence generator: a plain 64-bit LCG seeded at 42
    struct PredictableRng {
        state: u64,
    }

    impl PredictableRng {
        fn new() -> Self {
            Self { state: 42 }
        }
    }

    impl RngCore for PredictableRng {
        fn next_u32(&mut self) -> u32 {
            (self.next_u64() >> 32) as u32
        }

        fn next_u64(&mut self) -> u64 {
            self.state = self
                .state
                .wrapping_mul(6364136223846793005)
                .wrapping_add(1);
            self.state
        }

        fn fill_bytes(&mut self, dst: &mut [u8]) {
            for chunk in dst.chunks_mut(8) {
                let bytes = self.next_u64().to_le_bytes();
                chunk.copy_from_slice(&bytes[..chunk.len()]);
            }
        }
    }

    #[test]
    fn test_card_count_matches_spread() {
        let mut engine = ReadingEngine::with_rng(PredictableRng::new());
        for spread in SpreadType::ALL {
            let reading = engine.draw(spread, None);
            assert_eq!(reading.cards.len(), spread.card_count(), "{spread}");
        }
    }

    #[test]
    fn test_no_duplicates_across_seeds() {
        for seed in 0..200 {
            let mut engine = ReadingEngine::with_rng(StdRng::seed_from_u64(seed));
            for spread in SpreadType::ALL {
                let reading = engine.draw(spread, None);
                let unique: HashSet<_> = reading.cards.iter().map(|c| &c.card.name).collect();
                assert_eq!(unique.len(), reading.cards.len(), "seed {seed}, {spread}");
            }
        }
    }

    #[test]
    fn test_question_passes_through() {
        let mut engine = ReadingEngine::with_rng(PredictableRng::new());

        let reading = engine.draw(
            SpreadType::SituationActionOutcome,
            Some("Comment avancer ?".into()),
        );
        assert_eq!(reading.question.as_deref(), Some("Comment avancer ?"));

        let reading = engine.draw(SpreadType::SituationActionOutcome, None);
        assert_eq!(reading.question, None);
    }

    #[test]
    fn test_question_is_not_trimmed() {
        let mut engine = ReadingEngine::with_rng(PredictableRng::new());
        let reading = engine.draw(SpreadType::DailyGuidance, Some("  Q  ".into()));
        assert_eq!(reading.question.as_deref(), Some("  Q  "));
    }

    #[test]
    fn test_same_seed_same_reading() {
        let mut a = ReadingEngine::with_rng(StdRng::seed_from_u64(7));
        let mut b = ReadingEngine::with_rng(StdRng::seed_from_u64(7));

        let ra = a.draw(SpreadType::PastPresentFuture, None);
        let rb = b.draw(SpreadType::PastPresentFuture, None);

        assert_eq!(ra.card_names(), rb.card_names());
        let flags_a: Vec<_> = ra.cards.iter().map(|c| c.is_reversed).collect();
        let flags_b: Vec<_> = rb.cards.iter().map(|c| c.is_reversed).collect();
        assert_eq!(flags_a, flags_b);
    }

    #[test]
    fn test_both_orientations_occur() {
        let mut engine = ReadingEngine::with_rng(StdRng::seed_from_u64(1));
        let flags: HashSet<bool> = (0..100)
            .map(|_| engine.draw(SpreadType::DailyGuidance, None).cards[0].is_reversed)
            .collect();
        assert_eq!(flags.len(), 2);
    }

    #[test]
    fn test_draw_at_uses_given_timestamp() {
        let mut engine = ReadingEngine::with_rng(PredictableRng::new());
        let at = DateTime::parse_from_rfc3339("2024-03-01T09:30:00Z")
            .unwrap()
            .with_timezone(&Utc);
        let reading = engine.draw_at(SpreadType::Relationship, None, at);
        assert_eq!(reading.generated_at, at);
    }

    #[test]
    fn test_positions_follow_labels() {
        let mut engine = ReadingEngine::with_rng(PredictableRng::new());
        let reading = engine.draw(SpreadType::Relationship, None);

        let labels: Vec<_> = reading.positions().map(|(label, _)| label).collect();
        assert_eq!(labels, vec!["Toi", "L'autre", "Lien"]);

        let names: Vec<_> = reading.positions().map(|(_, c)| c.card.name.clone()).collect();
        assert_eq!(names, reading.card_names());
    }

    #[test]
    fn test_draw_ids_are_unique() {
        let mut engine = ReadingEngine::with_rng(PredictableRng::new());
        let reading = engine.draw(SpreadType::PastPresentFuture, None);
        let ids: HashSet<_> = reading.cards.iter().map(|c| c.id).collect();
        assert_eq!(ids.len(), 3);
    }

    #[test]
    fn test_small_deck_rejected() {
        let mut cards = build_default_catalog().cards;
        cards.truncate(2);
        let catalog = Catalog::from_cards(cards);

        let result = ReadingEngine::with_deck(&catalog, PredictableRng::new());
        assert!(matches!(
            result,
            Err(Error::DeckTooSmall {
                available: 2,
                required: 3
            })
        ));
    }

    #[test]
    fn test_deck_with_repeated_names_rejected() {
        let mut cards = build_default_catalog().cards;
        cards.truncate(3);
        for card in &mut cards {
            card.name = "Le Mat".to_string();
        }
        let catalog = Catalog::from_cards(cards);

        match ReadingEngine::with_deck(&catalog, PredictableRng::new()) {
            Err(Error::CatalogValidation(msg)) => assert!(msg.contains("Le Mat")),
            other => panic!("expected a catalog validation error, got {:?}", other.map(|_| ())),
        }
    }

    #[test]
    fn test_minimal_deck_deals_every_card() {
        let mut cards = build_default_catalog().cards;
        cards.truncate(3);
        let catalog = Catalog::from_cards(cards);

        let mut engine = ReadingEngine::with_deck(&catalog, PredictableRng::new()).unwrap();
        let reading = engine.draw(SpreadType::PastPresentFuture, None);

        let mut names = reading.card_names();
        names.sort();
        let mut expected: Vec<_> = catalog.cards.iter().map(|c| c.name.clone()).collect();
        expected.sort();
        assert_eq!(names, expected);
    }
}
