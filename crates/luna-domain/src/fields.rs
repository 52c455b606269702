//! Field sets: which keys of a reading a presenter shows

use crate::error::DomainError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// One displayed field of a reading
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldSpec {
    /// JSON key requested from the model
    pub key: &'static str,
    /// Human-readable label
    pub label: &'static str,
}

impl FieldSpec {
    const fn new(key: &'static str, label: &'static str) -> Self {
        Self { key, label }
    }
}

const SUMMARY: FieldSpec = FieldSpec::new("summary", "Overall fortune");
const LOVE: FieldSpec = FieldSpec::new("love", "Love");
const WORK: FieldSpec = FieldSpec::new("work", "Work");
const HEALTH: FieldSpec = FieldSpec::new("health", "Health");
const ADVICE: FieldSpec = FieldSpec::new("advice", "Advice");
const LUCKY_ITEM: FieldSpec = FieldSpec::new("lucky_item", "Lucky item");

/// Named field-set variant, as written in configuration files
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldSet {
    /// summary, advice, lucky_item
    Simple,
    /// summary, love, work, health, advice, lucky_item
    #[default]
    Full,
}

impl FieldSet {
    /// The three-field variant
    pub fn simple() -> Self {
        FieldSet::Simple
    }

    /// The six-field variant
    pub fn full() -> Self {
        FieldSet::Full
    }

    /// Parse a variant name (case-insensitive)
    pub fn parse(name: &str) -> Result<Self, DomainError> {
        match name.trim().to_lowercase().as_str() {
            "simple" => Ok(FieldSet::Simple),
            "full" => Ok(FieldSet::Full),
            _ => Err(DomainError::UnknownFieldSet(name.to_string())),
        }
    }

    /// Fields in display order
    pub fn fields(&self) -> &'static [FieldSpec] {
        match self {
            FieldSet::Simple => &[SUMMARY, ADVICE, LUCKY_ITEM],
            FieldSet::Full => &[SUMMARY, LOVE, WORK, HEALTH, ADVICE, LUCKY_ITEM],
        }
    }

    /// Keys in display order
    pub fn keys(&self) -> impl Iterator<Item = &'static str> {
        self.fields().iter().map(|f| f.key)
    }

    /// The field used as a one-line digest in history listings
    pub fn headline(&self) -> &'static FieldSpec {
        &SUMMARY
    }

    /// Key of [`FieldSet::headline`]
    pub fn headline_key(&self) -> &'static str {
        self.headline().key
    }

    /// Variant name as used in configuration
    pub fn name(&self) -> &'static str {
        match self {
            FieldSet::Simple => "simple",
            FieldSet::Full => "full",
        }
    }
}

impl fmt::Display for FieldSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
