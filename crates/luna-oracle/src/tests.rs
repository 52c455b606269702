//! End-to-end tests for the Oracle pipeline

#[cfg(test)]
mod tests {
    use crate::{Instruction, Oracle, OracleConfig, OracleError};
    use luna_domain::{FieldSet, Session};
    use luna_llm::MockProvider;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn test_full_reading_flow() {
        let llm = MockProvider::new(
            r#"Here is your fortune!
```json
{
  "summary": "A sparkling day awaits",
  "love": "Someone is thinking of you",
  "work": "Finish what you started",
  "health": "Drink more water",
  "advice": "Smile at strangers",
  "lucky_item": "A blue pen"
}
```
Good luck!"#,
        );
        let config = OracleConfig::full();
        let instruction = Instruction::default_for(config.fields());
        let oracle = Oracle::new(llm, config, instruction);

        let reading = oracle.ask("How will today go?").unwrap();

        for key in FieldSet::full().keys() {
            assert!(reading.record.text(key).is_some(), "missing {}", key);
        }
        assert_eq!(reading.record.text_or_empty("lucky_item"), "A blue pen");

        let prompt = oracle.client().last_call().unwrap().prompt;
        assert!(prompt.starts_with("You are Luna"));
        assert!(prompt.ends_with("\n\nQuestion: How will today go?"));
    }

    #[test]
    fn test_reading_with_missing_keys() {
        let llm = MockProvider::new(r#"{"summary": "ok"}"#);
        let oracle = Oracle::new(llm, OracleConfig::full(), Instruction::new("I"));

        let reading = oracle.ask("q").unwrap();
        // Absent keys are the presenter's concern, not an error
        assert_eq!(reading.record.text_or_empty("love"), "");
    }

    #[test]
    fn test_extraction_with_invalid_json() {
        let llm = MockProvider::new("This is not JSON");
        let oracle = Oracle::new(llm, OracleConfig::default(), Instruction::new("I"));

        let err = oracle.ask("q").unwrap_err();
        assert!(matches!(err, OracleError::Extraction(_)));
        assert_eq!(err.raw_response(), Some("This is not JSON"));
    }

    #[test]
    fn test_session_continues_after_failure() {
        let mut llm = MockProvider::new(r#"{"summary": "fine"}"#);
        llm.add_response("I\n\nQuestion: second", "{ invalid json , }");
        let oracle = Oracle::new(llm, OracleConfig::default(), Instruction::new("I"));
        let mut session = Session::new("cli");

        oracle.consult(&mut session, "first").unwrap();
        assert!(matches!(
            oracle.consult(&mut session, "second"),
            Err(OracleError::Extraction(_))
        ));
        oracle.consult(&mut session, "third").unwrap();

        let questions: Vec<_> = session
            .history()
            .recent()
            .map(|e| e.question.as_str())
            .collect();
        assert_eq!(questions, vec!["third", "first"]);
        assert_eq!(oracle.client().call_count(), 3);
    }

    #[test]
    fn test_instruction_file_drives_prompt() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("system_prompt.txt");
        fs::write(&path, "Custom persona.").unwrap();

        let mut config = OracleConfig::simple();
        config.instruction_path = path.clone();
        let instruction = Instruction::load_or_default(&config.instruction_path, config.fields()).unwrap();

        let oracle = Oracle::new(MockProvider::new("{}"), config, instruction);
        oracle.ask("luck?").unwrap();

        assert_eq!(
            oracle.client().last_call().unwrap().prompt,
            "Custom persona.\n\nQuestion: luck?"
        );
    }
}
