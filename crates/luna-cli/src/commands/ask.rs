//! Ask command implementation.

use crate::cli::AskArgs;
use crate::error::Result;
use crate::output::Formatter;
use luna_domain::GenerationClient;
use luna_llm::{GeminiProvider, LlmError};
use luna_oracle::{connect_gemini, Instruction, Oracle, OracleConfig, OracleError};
use tracing::debug;

/// Execute the ask command.
///
/// A missing credential is an error here, before any prompt is built.
pub fn execute_ask(args: AskArgs, profile: &OracleConfig, formatter: &Formatter) -> Result<()> {
    let oracle = open_oracle(profile)?;
    let output = answer(&oracle, &args.text(), formatter)?;
    println!("{}", output);
    Ok(())
}

/// Connect to Gemini and load the instruction for `profile`.
pub fn open_oracle(profile: &OracleConfig) -> Result<Oracle<GeminiProvider>> {
    let llm = connect_gemini(profile)?;
    let instruction = Instruction::load_or_default(&profile.instruction_path, profile.fields())?;
    debug!(model = %profile.model, variant = %profile.fields(), "Oracle ready");
    Ok(Oracle::new(llm, profile.clone(), instruction))
}

/// Ask one question and render the outcome.
///
/// An extraction failure is rendered (with the raw model text) rather than
/// returned, since the model did answer.
pub fn answer<G>(oracle: &Oracle<G>, question: &str, formatter: &Formatter) -> Result<String>
where
    G: GenerationClient<Error = LlmError>,
{
    match oracle.ask(question) {
        Ok(reading) => formatter.format_reading(&reading, oracle.fields()),
        Err(e @ OracleError::Extraction(_)) => Ok(formatter.failure(&e)),
        Err(e) => Err(e.into()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::OutputFormat;
    use crate::error::CliError;
    use luna_llm::MockProvider;

    fn oracle(response: &str) -> Oracle<MockProvider> {
        Oracle::new(
            MockProvider::new(response),
            OracleConfig::simple(),
            Instruction::new("You are Luna."),
        )
    }

    #[test]
    fn test_answer_renders_reading() {
        let formatter = Formatter::new(OutputFormat::Pretty, false);
        let oracle = oracle(r#"{"summary": "Sunny", "advice": "Go out", "lucky_item": "Hat"}"#);

        let output = answer(&oracle, "weather?", &formatter).unwrap();
        assert!(output.contains("Overall fortune: Sunny"));
        assert!(output.contains("Lucky item: Hat"));
    }

    #[test]
    fn test_answer_reports_extraction_failure() {
        let formatter = Formatter::new(OutputFormat::Pretty, false);
        let oracle = oracle("The stars are silent.");

        let output = answer(&oracle, "weather?", &formatter).unwrap();
        assert!(output.contains("Received text:\nThe stars are silent."));
    }

    #[test]
    fn test_answer_propagates_empty_question() {
        let formatter = Formatter::new(OutputFormat::Pretty, false);
        let oracle = oracle("{}");

        let result = answer(&oracle, "  ", &formatter);
        assert!(matches!(result, Err(CliError::Oracle(OracleError::EmptyQuestion))));
        assert_eq!(oracle.client().call_count(), 0);
    }

    #[test]
    fn test_open_oracle_without_key() {
        let mut profile = OracleConfig::default();
        profile.api_key_env = "LUNA_CLI_TEST_KEY_NEVER_SET".to_string();

        let result = open_oracle(&profile);
        assert!(matches!(
            result,
            Err(CliError::Oracle(OracleError::Configuration(_)))
        ));
    }
}
