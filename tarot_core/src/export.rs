//! CSV export of the reading history.

use crate::{HistoryEntry, Result};
use std::path::Path;

/// Separator between card names inside the `cards` column
pub const CARD_SEPARATOR: &str = " | ";

/// A row in the CSV output
#[derive(Debug, serde::Serialize)]
struct CsvRow<'a> {
    id: String,
    created_at: String,
    spread: &'static str,
    question: &'a str,
    cards: String,
    orientations: String,
}

fn orientation_label(is_reversed: bool) -> &'static str {
    if is_reversed {
        "renversée"
    } else {
        "droite"
    }
}

impl<'a> From<&'a HistoryEntry> for CsvRow<'a> {
    fn from(entry: &'a HistoryEntry) -> Self {
        CsvRow {
            id: entry.id.to_string(),
            created_at: entry.created_at.to_rfc3339(),
            spread: entry.spread.tag(),
            question: &entry.question,
            cards: entry.card_names.join(CARD_SEPARATOR),
            orientations: entry
                .card_reversals
                .iter()
                .map(|r| orientation_label(*r))
                .collect::<Vec<_>>()
                .join(CARD_SEPARATOR),
        }
    }
}

/// Write `entries` to a new CSV file at `path`, replacing any existing file
///
/// Returns the number of rows written.
pub fn write_history_csv(entries: &[HistoryEntry], path: &Path) -> Result<usize> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    let mut writer = csv::WriterBuilder::new()
        .has_headers(true)
        .from_path(path)?;

    for entry in entries {
        writer.serialize(CsvRow::from(entry))?;
    }

    writer.flush()?;
    tracing::info!("Exported {} history entries to {:?}", entries.len(), path);

    Ok(entries.len())
}
