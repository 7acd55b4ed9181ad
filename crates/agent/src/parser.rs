//! Defensive parsing of agent output. The upstream is an LLM-driven browsing
//! run with no schema guarantee; this module turns "best-effort prose that
//! happens to contain JSON" into a validated record or a classified failure.

use serde_json::Value;
use thiserror::Error;

use pricecompare_core::domain::CheapestItem;

use crate::history::RunHistory;

/// Classified parse failures. `InvalidJson` and `MalformedItem` carry the
/// offending agent text for operator diagnosis.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ParseError {
    #[error("agent did not produce a final result string")]
    NoFinalResult,
    #[error("agent produced invalid JSON output: {raw}")]
    InvalidJson { raw: String },
    #[error("agent result does not contain a well-formed `cheapest_item` object: {raw}")]
    MalformedItem { raw: String },
}

impl ParseError {
    /// The raw agent text the failure refers to, when one exists.
    pub fn raw_output(&self) -> Option<&str> {
        match self {
            Self::NoFinalResult => None,
            Self::InvalidJson { raw } | Self::MalformedItem { raw } => Some(raw),
        }
    }
}

/// Extract the cheapest listing from an agent run.
///
/// Scans the history for the latest terminal step with text, decodes that
/// text as JSON, and validates the `cheapest_item` object inside it. The
/// returned item is exactly what the agent produced; price interpretation is
/// deferred to the normalizer.
pub fn parse_agent_result(history: &RunHistory) -> Result<CheapestItem, ParseError> {
    let text = history.final_result().ok_or(ParseError::NoFinalResult)?;

    let decoded: Value = serde_json::from_str(text)
        .map_err(|_| ParseError::InvalidJson { raw: text.to_string() })?;

    let item = decoded
        .get("cheapest_item")
        .cloned()
        .ok_or_else(|| ParseError::MalformedItem { raw: text.to_string() })?;

    serde_json::from_value::<CheapestItem>(item)
        .map_err(|_| ParseError::MalformedItem { raw: text.to_string() })
}

#[cfg(test)]
mod tests {
    use pricecompare_core::domain::PriceValue;

    use super::{parse_agent_result, ParseError};
    use crate::history::{HistoryStep, RunHistory};

    fn done(content: &str) -> RunHistory {
        RunHistory {
            steps: vec![HistoryStep {
                is_done: true,
                extracted_content: Some(content.to_string()),
            }],
        }
    }

    #[test]
    fn parses_a_well_formed_result() {
        let history = done(
            r#"{"cheapest_item":{"price_huf":"210 000 Ft","store_name":"X","product_url":"http://x"}}"#,
        );

        let item = parse_agent_result(&history).expect("result should parse");
        assert_eq!(item.price_huf, PriceValue::Text("210 000 Ft".to_string()));
        assert_eq!(item.store_name, "X");
        assert_eq!(item.product_url, "http://x");
    }

    #[test]
    fn parses_numeric_prices_and_tolerates_extra_fields() {
        let history = done(
            r#"{"cheapest_item":{"price_huf":209990,"store_name":"Alza","product_url":"https://alza.hu/p","currency":"HUF"}}"#,
        );

        let item = parse_agent_result(&history).expect("result should parse");
        assert!(matches!(item.price_huf, PriceValue::Number(_)));
        assert_eq!(item.store_name, "Alza");
    }

    #[test]
    fn accepts_price_as_an_alias_key() {
        let history = done(
            r#"{"cheapest_item":{"price":"199 990","store_name":"eMAG","product_url":"https://emag.hu/p"}}"#,
        );

        let item = parse_agent_result(&history).expect("alias key should parse");
        assert_eq!(item.price_huf, PriceValue::Text("199 990".to_string()));
    }

    #[test]
    fn missing_terminal_step_is_a_distinct_failure() {
        let history = RunHistory {
            steps: vec![HistoryStep {
                is_done: false,
                extracted_content: Some("still browsing".to_string()),
            }],
        };

        assert_eq!(parse_agent_result(&history), Err(ParseError::NoFinalResult));
    }

    #[test]
    fn non_json_text_reports_the_raw_output() {
        let history = done("The cheapest item costs 210 000 Ft at X.");

        let error = parse_agent_result(&history).expect_err("prose should not parse");
        assert!(matches!(error, ParseError::InvalidJson { .. }));
        assert_eq!(error.raw_output(), Some("The cheapest item costs 210 000 Ft at X."));
    }

    #[test]
    fn missing_cheapest_item_key_is_malformed() {
        let history = done(r#"{"item":{"price_huf":1,"store_name":"X","product_url":"u"}}"#);

        assert!(matches!(
            parse_agent_result(&history),
            Err(ParseError::MalformedItem { .. })
        ));
    }

    #[test]
    fn cheapest_item_must_be_an_object_with_required_fields() {
        let not_an_object = done(r#"{"cheapest_item":"210 000 Ft"}"#);
        assert!(matches!(
            parse_agent_result(&not_an_object),
            Err(ParseError::MalformedItem { .. })
        ));

        let missing_store = done(r#"{"cheapest_item":{"price_huf":1,"product_url":"u"}}"#);
        assert!(matches!(
            parse_agent_result(&missing_store),
            Err(ParseError::MalformedItem { .. })
        ));

        let null_price = done(
            r#"{"cheapest_item":{"price_huf":null,"store_name":"X","product_url":"u"}}"#,
        );
        assert!(matches!(
            parse_agent_result(&null_price),
            Err(ParseError::MalformedItem { .. })
        ));
    }
}
