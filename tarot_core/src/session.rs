//! Draw-and-record workflow.
//!
//! Ties the engine to both stores the way a front end uses them: every draw
//! lands in the history, and single-card draws also become today's card.

use crate::config::HistoryConfig;
use crate::daily::DailyCardStore;
use crate::engine::ReadingEngine;
use crate::history::HistoryStore;
use crate::settings::SettingsStore;
use crate::{DrawnCard, HistoryEntry, Reading, SpreadType};
use chrono::Local;
use rand::rngs::ThreadRng;
use rand::RngCore;

/// A user's tarot table: engine plus persisted daily card and history
pub struct TarotSession<'a, S, R = ThreadRng> {
    engine: ReadingEngine<'a, R>,
    daily: DailyCardStore<S>,
    history: HistoryStore<S>,
    history_config: HistoryConfig,
}

impl<'a, S, R> TarotSession<'a, S, R>
where
    S: SettingsStore + Clone,
    R: RngCore,
{
    pub fn new(engine: ReadingEngine<'a, R>, settings: S, history_config: HistoryConfig) -> Self {
        Self {
            engine,
            daily: DailyCardStore::new(settings.clone()),
            history: HistoryStore::new(settings),
            history_config,
        }
    }

    /// Draw `spread` for a raw user question and record the result
    ///
    /// A blank question is passed to the engine as `None` and recorded in
    /// the history under the configured placeholder.
    pub fn draw(&mut self, spread: SpreadType, raw_question: &str) -> Reading {
        let trimmed = raw_question.trim();
        let question = (!trimmed.is_empty()).then(|| trimmed.to_string());

        let reading = self.engine.draw(spread, question);

        if spread == SpreadType::DailyGuidance {
            if let Some(card) = reading.cards.first() {
                let drawn_at = reading.generated_at.with_timezone(&Local);
                self.daily.save_today_card(card, &drawn_at);
            }
        }

        let entry = HistoryEntry::from_reading(&reading, &self.history_config.question_placeholder);
        self.history.append_with_limit(entry, self.history_config.max_entries);

        tracing::info!(
            "Recorded {} reading with {} card(s)",
            spread,
            reading.cards.len()
        );
        reading
    }

    /// Today's card, if a single-card draw happened today
    pub fn today_card(&self) -> Option<DrawnCard> {
        self.daily.read_today_card(self.engine.catalog())
    }

    /// Past readings, newest first
    pub fn history(&self) -> Vec<HistoryEntry> {
        self.history.load()
    }

    pub fn daily_store(&self) -> &DailyCardStore<S> {
        &self.daily
    }
}
