#![forbid(unsafe_code)]

//! Core domain model and business logic for Tarot readings.
//!
//! This crate provides:
//! - Domain types (cards, spreads, readings, history entries)
//! - The built-in 78-card catalog
//! - The reading engine
//! - Persistence (settings store, daily card, history)
//! - Interpretation payloads and history export

pub mod types;
pub mod error;
pub mod catalog;
pub mod config;
pub mod logging;
pub mod settings;
pub mod daily;
pub mod history;
pub mod engine;
pub mod session;
pub mod interpret;
pub mod export;

// Re-export commonly used types
pub use error::{Error, Result};
pub use types::*;
pub use catalog::{build_default_catalog, default_catalog};
pub use config::Config;
pub use settings::{JsonSettingsFile, MemorySettings, SettingsStore};
pub use daily::{DailyCardRecord, DailyCardStore};
pub use history::HistoryStore;
pub use engine::ReadingEngine;
pub use session::TarotSession;
pub use interpret::{InterpretationRequest, InterpretationResponse};
pub use export::write_history_csv;
