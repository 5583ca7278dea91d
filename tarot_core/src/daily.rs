//! Today's single-card draw.
//!
//! The record is three independent settings keys. It is only honored while
//! its date falls on the same calendar day as "now"; after that it reads as
//! absent and is simply overwritten by the next draw.

use crate::settings::SettingsStore;
use crate::{Catalog, DrawnCard};
use chrono::{DateTime, FixedOffset, Local, TimeZone};
use serde_json::Value;
use std::fmt::Display;

pub const DRAW_DATE_KEY: &str = "daily_draw_date";
pub const CARD_NAME_KEY: &str = "daily_card_name";
pub const IS_REVERSED_KEY: &str = "daily_card_is_reversed";

/// The raw persisted daily draw, regardless of whether it is still current
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DailyCardRecord {
    pub drawn_at: DateTime<FixedOffset>,
    pub card_name: String,
    pub is_reversed: bool,
}

/// Persists and restores the daily card through a settings store
#[derive(Debug)]
pub struct DailyCardStore<S> {
    settings: S,
}

impl<S: SettingsStore> DailyCardStore<S> {
    pub fn new(settings: S) -> Self {
        Self { settings }
    }

    /// Read the stored record without checking its date
    ///
    /// Missing or malformed keys yield `None`. A missing reversed flag reads
    /// as upright.
    pub fn record(&self) -> Option<DailyCardRecord> {
        let drawn_at = self
            .settings
            .get(DRAW_DATE_KEY)
            .and_then(|v| v.as_str().map(str::to_owned))
            .and_then(|s| match DateTime::parse_from_rfc3339(&s) {
                Ok(dt) => Some(dt),
                Err(e) => {
                    tracing::warn!("Ignoring malformed daily draw date {:?}: {}", s, e);
                    None
                }
            })?;

        let card_name = self
            .settings
            .get(CARD_NAME_KEY)
            .and_then(|v| v.as_str().map(str::to_owned))?;

        let is_reversed = self
            .settings
            .get(IS_REVERSED_KEY)
            .and_then(|v| v.as_bool())
            .unwrap_or(false);

        Some(DailyCardRecord {
            drawn_at,
            card_name,
            is_reversed,
        })
    }

    /// Today's card in local time, if one was drawn today
    pub fn read_today_card(&self, catalog: &Catalog) -> Option<DrawnCard> {
        self.read_today_card_at(catalog, &Local::now())
    }

    /// Today's card relative to `now`, compared by calendar day in `now`'s zone
    pub fn read_today_card_at<Tz: TimeZone>(
        &self,
        catalog: &Catalog,
        now: &DateTime<Tz>,
    ) -> Option<DrawnCard> {
        let record = self.record()?;

        let drawn_day = record.drawn_at.with_timezone(&now.timezone()).date_naive();
        if drawn_day != now.date_naive() {
            tracing::debug!(
                "Daily card from {} is stale (today is {})",
                drawn_day,
                now.date_naive()
            );
            return None;
        }

        let Some(card) = catalog.find_by_name(&record.card_name) else {
            tracing::warn!(
                "Daily card '{}' no longer exists in the catalog",
                record.card_name
            );
            return None;
        };

        Some(DrawnCard::new(card.clone(), record.is_reversed))
    }

    /// Overwrite the stored record with `card` drawn at `now`
    ///
    /// Write failures are logged and otherwise ignored.
    pub fn save_today_card<Tz: TimeZone>(&self, card: &DrawnCard, now: &DateTime<Tz>)
    where
        Tz::Offset: Display,
    {
        let writes = [
            (DRAW_DATE_KEY, Value::String(now.to_rfc3339())),
            (CARD_NAME_KEY, Value::String(card.card.name.clone())),
            (IS_REVERSED_KEY, Value::Bool(card.is_reversed)),
        ];

        for (key, value) in writes {
            if let Err(e) = self.settings.set(key, value) {
                tracing::warn!("Failed to save daily card key {}: {}", key, e);
            }
        }

        tracing::info!(
            "Saved daily card '{}'{}",
            card.card.name,
            if card.is_reversed { " (reversed)" } else { "" }
        );
    }
}
