//! Luna Domain Layer
//!
//! Core types and trait seams for the Luna fortune-telling toy. This crate does
//! no I/O: it only describes what a question, a reading and a session history
//! look like, and which interface a text-generation backend has to offer.
//!
//! ## Key Concepts
//!
//! - **Question**: user input, never empty
//! - **ResultRecord**: the JSON object extracted from a model response
//! - **FieldSet**: the per-variant keys a presenter shows (summary, love, ...)
//! - **History / Session**: append-only readings owned by one session
//! - **GenerationClient**: the hosted model, seen as "prompt in, text out"

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod error;
pub mod fields;
pub mod history;
pub mod question;
pub mod record;
pub mod session;
pub mod traits;

// Re-exports for convenience
pub use error::DomainError;
pub use fields::{FieldSet, FieldSpec};
pub use history::{History, HistoryEntry};
pub use question::Question;
pub use record::ResultRecord;
pub use session::Session;
pub use traits::{GeneratedText, GenerationClient, GenerationConfig};
