//! Luna Oracle
//!
//! Turns a question into a structured fortune reading using a hosted LLM.
//!
//! # Overview
//!
//! The oracle pairs a fixed persona instruction with the user's question,
//! sends the result to a text-generation backend, and pulls the first JSON
//! object out of whatever text comes back. Models do not reliably follow
//! "JSON only" instructions, so extraction tolerates markdown fences and
//! prose before or after the object.
//!
//! # Architecture
//!
//! ```text
//! Question → PromptBuilder → GenerationClient → raw text → extract → ResultRecord
//! ```
//!
//! # Example Usage
//!
//! ```
//! use luna_oracle::{Instruction, Oracle, OracleConfig};
//! use luna_llm::MockProvider;
//!
//! let llm = MockProvider::new("```json\n{\"summary\": \"good day\", \"advice\": \"smile\"}\n```");
//! let config = OracleConfig::simple();
//! let instruction = Instruction::default_for(config.fields());
//!
//! let oracle = Oracle::new(llm, config, instruction);
//! let reading = oracle.ask("How will today go?").unwrap();
//!
//! assert_eq!(reading.record.text("summary").as_deref(), Some("good day"));
//! ```

#![warn(missing_docs)]

mod config;
mod connect;
mod error;
mod extract;
mod instruction;
mod oracle;
mod prompt;
mod types;

#[cfg(test)]
mod tests;

pub use config::OracleConfig;
pub use connect::connect_gemini;
pub use error::{ExtractionError, OracleError};
pub use extract::{brace_span, extract, strip_fences};
pub use instruction::Instruction;
pub use oracle::Oracle;
pub use prompt::{build_prompt, PromptBuilder, DEFAULT_QUESTION_LABEL};
pub use types::Reading;
