//! Core Oracle implementation

use crate::config::OracleConfig;
use crate::error::OracleError;
use crate::extract::extract;
use crate::instruction::Instruction;
use crate::prompt::PromptBuilder;
use crate::types::Reading;
use luna_domain::{
    FieldSet, GeneratedText, GenerationClient, GenerationConfig, Question, Session,
};
use luna_llm::LlmError;
use std::time::Instant;
use tracing::{debug, info, warn};

/// The Oracle turns questions into readings
pub struct Oracle<G>
where
    G: GenerationClient<Error = LlmError>,
{
    client: G,
    config: OracleConfig,
    prompt_builder: PromptBuilder,
    generation: GenerationConfig,
}

impl<G> Oracle<G>
where
    G: GenerationClient<Error = LlmError>,
{
    /// Create a new Oracle
    pub fn new(client: G, config: OracleConfig, instruction: Instruction) -> Self {
        let prompt_builder =
            PromptBuilder::new(instruction).with_label(config.question_label.clone());
        Self {
            client,
            config,
            prompt_builder,
            generation: GenerationConfig::default(),
        }
    }

    /// Use explicit generation settings instead of the empty default
    pub fn with_generation_config(mut self, generation: GenerationConfig) -> Self {
        self.generation = generation;
        self
    }

    /// Configuration in use
    pub fn config(&self) -> &OracleConfig {
        &self.config
    }

    /// Fields presenters should show for this oracle's readings
    pub fn fields(&self) -> FieldSet {
        self.config.fields()
    }

    /// The underlying generation client
    pub fn client(&self) -> &G {
        &self.client
    }

    /// Ask one question.
    ///
    /// An empty question is rejected before any request is made. Otherwise
    /// exactly one generation call is performed; its failure is returned as
    /// [`OracleError::Remote`] and an unparseable answer as
    /// [`OracleError::Extraction`] (which carries the raw text).
    pub fn ask(&self, question: &str) -> Result<Reading, OracleError> {
        let question = Question::new(question)?;
        let prompt = self.prompt_builder.build(&question);

        debug!("Prompt length: {} chars", prompt.len());

        let started = Instant::now();
        let response = self
            .client
            .generate(&self.config.model, &prompt, &self.generation)
            .map_err(|e| {
                warn!(model = %self.config.model, error = %e, "Generation failed");
                OracleError::Remote(e)
            })?;
        let raw = response.text().to_string();

        info!(
            model = %self.config.model,
            elapsed_ms = started.elapsed().as_millis() as u64,
            response_len = raw.len(),
            "Received model response"
        );

        let record = extract(&raw).map_err(|e| {
            warn!(error = %e, "Could not extract a reading from the response");
            OracleError::Extraction(e)
        })?;

        Ok(Reading {
            question: question.into_inner(),
            raw,
            record,
        })
    }

    /// Ask a question on behalf of a session.
    ///
    /// Successful readings are appended to the session's history; failures
    /// leave it untouched.
    pub fn consult(&self, session: &mut Session, question: &str) -> Result<Reading, OracleError> {
        let reading = self.ask(question)?;
        session.record(reading.question.clone(), reading.record.clone());
        Ok(reading)
    }
}
