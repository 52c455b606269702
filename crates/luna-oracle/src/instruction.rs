//! Persona instruction text

use crate::error::OracleError;
use luna_domain::FieldSet;
use std::fmt;
use std::fs;
use std::io::ErrorKind;
use std::path::Path;
use tracing::{debug, info};

const PERSONA: &str = r#"You are Luna, a playful and charming fortune teller.
You speak in a cute, friendly tone.
Output **only JSON** in the following shape.
Explanations, code blocks and any text outside the JSON object are forbidden."#;

/// Static persona/format instruction, loaded once at startup.
///
/// The text is opaque: it is forwarded into the prompt verbatim.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Instruction(String);

impl Instruction {
    /// Wrap instruction text as-is
    pub fn new(text: impl Into<String>) -> Self {
        Self(text.into())
    }

    /// Built-in instruction asking for the given fields
    ///
    /// ```
    /// use luna_domain::FieldSet;
    /// use luna_oracle::Instruction;
    ///
    /// let instruction = Instruction::default_for(FieldSet::simple());
    /// assert!(instruction.as_str().contains("\"lucky_item\": \"string\""));
    /// assert!(!instruction.as_str().contains("\"love\""));
    /// ```
    pub fn default_for(fields: FieldSet) -> Self {
        let shape = fields
            .keys()
            .map(|key| format!("  \"{}\": \"string\"", key))
            .collect::<Vec<_>>()
            .join(",\n");

        Self(format!("{}\n\n{{\n{}\n}}\n", PERSONA, shape))
    }

    /// Read the instruction file, or fall back to the built-in text when the
    /// file does not exist. Any other read failure is an error.
    pub fn load_or_default(path: impl AsRef<Path>, fields: FieldSet) -> Result<Self, OracleError> {
        let path = path.as_ref();
        match fs::read_to_string(path) {
            Ok(text) => {
                info!(path = %path.display(), "Loaded instruction file");
                Ok(Self(text))
            }
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!(path = %path.display(), variant = %fields, "Instruction file not found, using built-in text");
                Ok(Self::default_for(fields))
            }
            Err(e) => Err(OracleError::Io(e)),
        }
    }

    /// Instruction text
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Instruction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
