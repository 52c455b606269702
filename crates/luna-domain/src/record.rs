//! Structured readings extracted from model output

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A reading as returned by the model: a JSON object keyed by field name.
///
/// Values are whatever the model produced. No key set is enforced here; a
/// missing key simply reads as absent (or empty, through [`ResultRecord::text_or_empty`]).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ResultRecord(Map<String, Value>);

impl ResultRecord {
    /// Wrap an already-parsed JSON object
    pub fn new(fields: Map<String, Value>) -> Self {
        Self(fields)
    }

    /// Raw JSON value for a key
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    /// Display text for a key.
    ///
    /// Strings are returned as-is, `null` counts as absent, and any other
    /// value is rendered as compact JSON.
    ///
    /// ```
    /// use luna_domain::ResultRecord;
    ///
    /// let record: ResultRecord =
    ///     serde_json::from_str(r#"{"summary": "good day", "score": 7, "love": null}"#).unwrap();
    /// assert_eq!(record.text("summary").as_deref(), Some("good day"));
    /// assert_eq!(record.text("score").as_deref(), Some("7"));
    /// assert_eq!(record.text("love"), None);
    /// ```
    pub fn text(&self, key: &str) -> Option<String> {
        match self.0.get(key)? {
            Value::Null => None,
            Value::String(s) => Some(s.clone()),
            other => Some(other.to_string()),
        }
    }

    /// Display text for a key, or an empty string when absent
    pub fn text_or_empty(&self, key: &str) -> String {
        self.text(key).unwrap_or_default()
    }

    /// Keys present in the record
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    /// Number of keys
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether the model returned an empty object
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Pretty-printed JSON, as shown by the terminal presenter
    pub fn to_pretty_json(&self) -> String {
        // A Map<String, Value> always serializes
        serde_json::to_string_pretty(&self.0).unwrap_or_else(|_| "{}".to_string())
    }

    /// Borrow the underlying JSON object
    pub fn as_map(&self) -> &Map<String, Value> {
        &self.0
    }

    /// Take the underlying JSON object
    pub fn into_map(self) -> Map<String, Value> {
        self.0
    }
}

impl From<Map<String, Value>> for ResultRecord {
    fn from(fields: Map<String, Value>) -> Self {
        Self(fields)
    }
}
