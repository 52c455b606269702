//! Interactive REPL (Read-Eval-Print Loop) mode.
//!
//! Every line that is not a built-in command is a question. Readings are kept
//! in an in-memory session for the `history` command.

use crate::cli::{ProfileAction, ProfileArgs};
use crate::commands;
use crate::config::Config;
use crate::error::{CliError, Result};
use crate::output::Formatter;
use luna_domain::{GenerationClient, Session};
use luna_llm::{GeminiProvider, LlmError};
use luna_oracle::Oracle;
use rustyline::error::ReadlineError;
use rustyline::{Config as EditorConfig, DefaultEditor};
use std::path::PathBuf;
use tracing::debug;

/// Run the interactive REPL.
pub fn run_repl(config: &mut Config, formatter: &Formatter) -> Result<()> {
    println!(
        "{}",
        formatter.info("Luna is listening. Ask a question, 'help' for commands, 'exit' to quit")
    );
    println!();

    let editor_config = EditorConfig::builder()
        .max_history_size(config.settings.history_size)?
        .auto_add_history(false)
        .build();
    let mut editor = DefaultEditor::with_config(editor_config)?;

    // Load history
    let history_path = get_history_path()?;
    let _ = editor.load_history(&history_path);

    let mut session = Session::new("repl");
    // Connected lazily so a missing key is reported per question
    let mut oracle: Option<Oracle<GeminiProvider>> = None;

    loop {
        let prompt = format!("luna ({})> ", config.active_profile);

        match editor.readline(&prompt) {
            Ok(line) => {
                if line.trim().is_empty() {
                    continue;
                }

                editor.add_history_entry(line.as_str()).ok();

                match parse_repl_command(&line) {
                    Ok(ReplCommand::Exit) => {
                        println!("{}", formatter.info("Goodbye!"));
                        break;
                    }
                    Ok(ReplCommand::Help) => {
                        print_help(formatter);
                    }
                    Ok(ReplCommand::History) => {
                        let fields = config
                            .get_active_profile()
                            .map(|profile| profile.fields())
                            .unwrap_or_default();
                        match formatter.format_history(session.history(), fields) {
                            Ok(table) => println!("{}", table),
                            Err(e) => eprintln!("{}", formatter.error(&e.to_string())),
                        }
                    }
                    Ok(ReplCommand::Profile(args)) => {
                        let switching = matches!(args.action, ProfileAction::Switch { .. });
                        if let Err(e) = commands::execute_profile(args, config, formatter) {
                            eprintln!("{}", formatter.error(&e.to_string()));
                        } else if switching {
                            oracle = None;
                        }
                    }
                    Ok(ReplCommand::Ask(question)) => {
                        if oracle.is_none() {
                            match config
                                .get_active_profile()
                                .and_then(commands::open_oracle)
                            {
                                Ok(connected) => oracle = Some(connected),
                                Err(e) => {
                                    eprintln!("{}", formatter.error(&e.to_string()));
                                    continue;
                                }
                            }
                        }
                        if let Some(oracle) = &oracle {
                            match respond(oracle, &mut session, &question, formatter) {
                                Ok(output) => println!("{}", output),
                                Err(output) => eprintln!("{}", output),
                            }
                        }
                    }
                    Err(e) => {
                        eprintln!("{}", formatter.error(&e.to_string()));
                    }
                }
            }
            Err(ReadlineError::Interrupted) => {
                println!("{}", formatter.info("Use 'exit' to quit"));
            }
            Err(ReadlineError::Eof) => {
                break;
            }
            Err(err) => {
                eprintln!("{}", formatter.error(&format!("Error: {}", err)));
                break;
            }
        }
    }

    // Save history
    editor.save_history(&history_path).ok();

    Ok(())
}

/// REPL command type.
#[derive(Debug)]
enum ReplCommand {
    Exit,
    Help,
    History,
    Profile(ProfileArgs),
    Ask(String),
}

/// Parse a REPL command line.
///
/// Built-ins are matched on the trimmed words. Anything else, including a
/// `profile` line with an action the REPL does not know, is returned as a
/// question exactly as typed.
fn parse_repl_command(line: &str) -> Result<ReplCommand> {
    let parts: Vec<&str> = line.split_whitespace().collect();

    if parts.is_empty() {
        return Err(CliError::InvalidInput("Empty command".to_string()));
    }

    match parts[0] {
        "exit" | "quit" | "q" if parts.len() == 1 => Ok(ReplCommand::Exit),
        "help" | "?" if parts.len() == 1 => Ok(ReplCommand::Help),
        "history" if parts.len() == 1 => Ok(ReplCommand::History),
        "profile" => parse_profile_command(line, &parts[1..]),
        _ => Ok(ReplCommand::Ask(line.to_string())),
    }
}

fn parse_profile_command(line: &str, args: &[&str]) -> Result<ReplCommand> {
    if args.is_empty() {
        return Ok(ReplCommand::Profile(ProfileArgs {
            action: ProfileAction::Show,
        }));
    }

    let action = match args[0] {
        "list" if args.len() == 1 => ProfileAction::List,
        "show" if args.len() == 1 => ProfileAction::Show,
        "switch" if args.len() <= 2 => {
            if args.len() < 2 {
                return Err(CliError::InvalidInput("Usage: profile switch <name>".to_string()));
            }
            ProfileAction::Switch {
                name: args[1].to_string(),
            }
        }
        _ => return Ok(ReplCommand::Ask(line.to_string())),
    };

    Ok(ReplCommand::Profile(ProfileArgs { action }))
}

/// Answer one question within the session.
///
/// Returns the text for stdout on success and the text for stderr on failure.
/// Only successful readings are added to the session history.
fn respond<G>(
    oracle: &Oracle<G>,
    session: &mut Session,
    question: &str,
    formatter: &Formatter,
) -> std::result::Result<String, String>
where
    G: GenerationClient<Error = LlmError>,
{
    match oracle.consult(session, question) {
        Ok(reading) => {
            debug!(history_len = session.history().len(), "Reading recorded");
            formatter
                .format_reading(&reading, oracle.fields())
                .map_err(|e| formatter.error(&e.to_string()))
        }
        Err(e) => Err(formatter.failure(&e)),
    }
}

fn get_history_path() -> Result<PathBuf> {
    let luna_dir = Config::dir()?;
    std::fs::create_dir_all(&luna_dir)?;
    Ok(luna_dir.join("history.txt"))
}

fn print_help(formatter: &Formatter) {
    println!("{}", formatter.info("Available commands:"));
    println!();
    println!("  <question>                     - Ask Luna anything");
    println!("  history                        - Show this session's readings");
    println!("  profile [list|show|switch]     - Manage profiles");
    println!("  help, ?                        - Show this help");
    println!("  exit, quit, q                  - Exit REPL");
    println!();
}
