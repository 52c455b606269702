//! Prompt assembly

use crate::instruction::Instruction;
use luna_domain::Question;

/// Label placed in front of the question
pub const DEFAULT_QUESTION_LABEL: &str = "Question: ";

/// Join instruction and question: `instruction + "\n\n" + label + question`.
///
/// Neither part is escaped or truncated.
///
/// ```
/// use luna_oracle::build_prompt;
///
/// assert_eq!(
///     build_prompt("Be Luna.", "Question: ", "Will I be lucky?"),
///     "Be Luna.\n\nQuestion: Will I be lucky?"
/// );
/// ```
pub fn build_prompt(instruction: &str, label: &str, question: &str) -> String {
    let mut prompt = String::with_capacity(instruction.len() + label.len() + question.len() + 2);
    prompt.push_str(instruction);
    prompt.push_str("\n\n");
    prompt.push_str(label);
    prompt.push_str(question);
    prompt
}

/// Builds prompts for the fortune-telling model
#[derive(Debug, Clone)]
pub struct PromptBuilder {
    instruction: Instruction,
    label: String,
}

impl PromptBuilder {
    /// Create a new prompt builder with the default question label
    pub fn new(instruction: Instruction) -> Self {
        Self {
            instruction,
            label: DEFAULT_QUESTION_LABEL.to_string(),
        }
    }

    /// Use a different question label
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = label.into();
        self
    }

    /// Build the complete prompt for one question
    pub fn build(&self, question: &Question) -> String {
        build_prompt(self.instruction.as_str(), &self.label, question.as_str())
    }

    /// The instruction in use
    pub fn instruction(&self) -> &Instruction {
        &self.instruction
    }

    /// The question label in use
    pub fn label(&self) -> &str {
        &self.label
    }
}
