//! Status snapshot reported by the Dark Search backend.

use serde::Deserialize;
use serde_json::Value;

use crate::error::FetchError;

/// Crawl and index counters returned by the backend status endpoint.
///
/// Built fresh for every render and dropped when the render completes.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct StatusSnapshot {
    /// Domains known to the crawler.
    #[serde(default)]
    pub current_num_of_domains: Option<u64>,
    /// Domains already crawled.
    #[serde(default)]
    pub current_num_of_crawled_domains: Option<u64>,
    /// Webpages indexed.
    #[serde(default)]
    pub current_num_of_webpages: Option<u64>,
    /// Freeform status text, only sent by older backends.
    #[serde(default)]
    pub message: Option<String>,
}

impl StatusSnapshot {
    /// Parse and validate a response body.
    ///
    /// The body must be a JSON object carrying at least one known field.
    /// Counters must be non-negative integers; unknown fields are ignored.
    pub fn parse(body: &[u8]) -> Result<Self, FetchError> {
        let value: Value = serde_json::from_slice(body)?;

        if !value.is_object() {
            return Err(FetchError::Parse(format!(
                "expected a JSON object, got {}",
                json_type_name(&value)
            )));
        }

        let snapshot: StatusSnapshot = serde_json::from_value(value)?;

        if snapshot.is_empty() {
            return Err(FetchError::Parse(
                "payload carries none of the expected status fields".to_string(),
            ));
        }

        Ok(snapshot)
    }

    /// True when no recognized field is present.
    pub fn is_empty(&self) -> bool {
        self.current_num_of_domains.is_none()
            && self.current_num_of_crawled_domains.is_none()
            && self.current_num_of_webpages.is_none()
            && self.message.is_none()
    }
}

fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
