//! Request and response bodies for the AI interpretation endpoint.
//!
//! The endpoint takes `POST` with a bearer token and answers
//! `{"interpretation": ...}` or `{"error": ...}`. Only the payloads are
//! modeled here; transport is left to the caller.

use crate::{Error, Reading, Result};
use serde::{Deserialize, Serialize};

/// Deck identifier sent alongside tarot readings
pub const TAROT_DECK_TYPE: &str = "tarot";

/// One positioned card in an interpretation request
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct InterpretationCard {
    pub position: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub family: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub essence: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message_profond: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub spread_interpretation: Option<String>,
}

/// Body of the interpretation request
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct InterpretationRequest {
    pub spread: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub question: Option<String>,
    #[serde(default)]
    pub cards: Vec<InterpretationCard>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_message: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deck_type: Option<String>,
}

impl InterpretationRequest {
    /// Build the request for a tarot reading
    ///
    /// Each card carries its position label, arcana family, keywords, the
    /// meaning for its orientation and its general interpretation.
    pub fn from_reading(reading: &Reading) -> Self {
        let cards = reading
            .positions()
            .map(|(label, drawn)| InterpretationCard {
                position: label.to_string(),
                name: drawn.card.name.clone(),
                family: Some(drawn.card.arcana.display_name().to_string()),
                essence: Some(drawn.card.keywords.clone()),
                message_profond: Some(drawn.meaning().to_string()),
                spread_interpretation: Some(drawn.card.interpretation.general.clone()),
            })
            .collect();

        Self {
            spread: reading.spread.title().to_string(),
            question: reading.question.clone(),
            cards,
            user_message: None,
            deck_type: Some(TAROT_DECK_TYPE.to_string()),
        }
    }

    pub fn with_user_message(mut self, message: impl Into<String>) -> Self {
        self.user_message = Some(message.into());
        self
    }

    /// The endpoint answers 400 unless a spread and at least one card are given
    pub fn validate(&self) -> Result<()> {
        if self.spread.trim().is_empty() {
            return Err(Error::Interpretation("interpretation request has no spread".into()));
        }
        if self.cards.is_empty() {
            return Err(Error::Interpretation("interpretation request has no cards".into()));
        }
        Ok(())
    }
}

/// Body returned by the endpoint
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(untagged)]
pub enum InterpretationResponse {
    Success { interpretation: String },
    Failure { error: String },
}

impl InterpretationResponse {
    pub fn into_result(self) -> Result<String> {
        match self {
            InterpretationResponse::Success { interpretation } => Ok(interpretation),
            InterpretationResponse::Failure { error } => Err(Error::Interpretation(error)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::ReadingEngine;
    use crate::SpreadType;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn reading(spread: SpreadType, question: Option<&str>) -> Reading {
        ReadingEngine::with_rng(StdRng::seed_from_u64(11)).draw(spread, question.map(Into::into))
    }

    #[test]
    fn test_request_from_reading() {
        let reading = reading(SpreadType::PastPresentFuture, Some("Et demain ?"));
        let request = InterpretationRequest::from_reading(&reading);

        assert_eq!(request.spread, "Passé · Présent · Futur");
        assert_eq!(request.question.as_deref(), Some("Et demain ?"));
        assert_eq!(request.deck_type.as_deref(), Some("tarot"));

        let positions: Vec<_> = request.cards.iter().map(|c| c.position.as_str()).collect();
        assert_eq!(positions, vec!["Passé", "Présent", "Futur"]);

        for (card, drawn) in request.cards.iter().zip(&reading.cards) {
            assert_eq!(card.name, drawn.card.name);
            assert_eq!(card.message_profond.as_deref(), Some(drawn.meaning()));
            assert_eq!(card.essence.as_ref(), Some(&drawn.card.keywords));
        }
        assert!(request.validate().is_ok());
    }

    #[test]
    fn test_request_json_shape() {
        let request = InterpretationRequest::from_reading(&reading(SpreadType::DailyGuidance, None))
            .with_user_message("Merci");
        let value = serde_json::to_value(&request).unwrap();

        assert!(value.get("question").is_none());
        assert_eq!(value["userMessage"], "Merci");
        assert_eq!(value["deckType"], "tarot");
        assert_eq!(value["cards"][0]["position"], "Message du jour");
        assert!(value["cards"][0].get("messageProfond").is_some());
        assert!(value["cards"][0].get("spreadInterpretation").is_some());
    }

    #[test]
    fn test_validate_rejects_empty_cards() {
        let request = InterpretationRequest {
            spread: "Carte du jour".into(),
            question: None,
            cards: vec![],
            user_message: None,
            deck_type: None,
        };
        assert!(request.validate().is_err());
    }

    #[test]
    fn test_response_variants() {
        let ok: InterpretationResponse =
            serde_json::from_str(r#"{"interpretation": "Avance."}"#).unwrap();
        assert_eq!(ok.into_result().unwrap(), "Avance.");

        let err: InterpretationResponse =
            serde_json::from_str(r#"{"error": "Unauthorized"}"#).unwrap();
        assert!(err.into_result().is_err());
    }
}
