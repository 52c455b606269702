//! Result types for readings

use luna_domain::ResultRecord;
use serde::Serialize;

/// A completed reading
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Reading {
    /// The question as asked
    pub question: String,

    /// Raw model output, kept for diagnostics
    pub raw: String,

    /// Fields extracted from the output
    pub record: ResultRecord,
}
