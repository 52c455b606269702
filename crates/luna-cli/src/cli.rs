//! CLI command definitions and argument parsing.

use clap::{Parser, Subcommand};
use luna_domain::FieldSet;

/// Luna - Ask the fortune teller a question.
#[derive(Debug, Parser)]
#[command(name = "luna")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Output format
    #[arg(short, long, value_enum, global = true)]
    pub format: Option<CliFormat>,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Configuration file path
    #[arg(short, long, global = true)]
    pub config: Option<String>,

    /// Profile to use
    #[arg(short, long, global = true)]
    pub profile: Option<String>,

    /// Log filter (e.g. "info", "luna_oracle=debug")
    #[arg(long, global = true, env = "LUNA_LOG", default_value = "warn")]
    pub log_level: String,

    #[command(subcommand)]
    pub command: Option<Command>,
}

/// Output format options.
#[derive(Debug, Clone, Copy, clap::ValueEnum)]
pub enum CliFormat {
    /// Labeled fields (default)
    Pretty,
    /// JSON format
    Json,
}

/// CLI commands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Ask a single question and print the reading
    Ask(AskArgs),

    /// Manage configuration profiles
    Profile(ProfileArgs),

    /// Enter interactive REPL mode
    Repl,
}

/// Arguments for the ask command.
#[derive(Debug, Parser)]
pub struct AskArgs {
    /// The question; multiple words are joined with spaces
    #[arg(required = true, num_args = 1..)]
    pub question: Vec<String>,
}

impl AskArgs {
    /// The question as one line of text
    pub fn text(&self) -> String {
        self.question.join(" ")
    }
}

/// Arguments for profile management.
#[derive(Debug, Parser)]
pub struct ProfileArgs {
    #[command(subcommand)]
    pub action: ProfileAction,
}

/// Profile management actions.
#[derive(Debug, Subcommand)]
pub enum ProfileAction {
    /// List all profiles
    List,

    /// Show active profile
    Show,

    /// Switch to a different profile
    Switch {
        /// Profile name
        name: String,
    },

    /// Create or update a profile
    Set {
        /// Profile name
        name: String,
        /// Model identifier
        #[arg(short, long)]
        model: Option<String>,
        /// Which fields to ask for
        #[arg(short, long, value_enum)]
        variant: Option<VariantArg>,
        /// Instruction file
        #[arg(short, long)]
        instruction: Option<String>,
        /// Environment variable holding the API key
        #[arg(long)]
        api_key_env: Option<String>,
    },

    /// Delete a profile
    Delete {
        /// Profile name
        name: String,
    },
}

/// Field set argument.
#[derive(Debug, Clone, Copy, clap::ValueEnum)]
pub enum VariantArg {
    /// Summary, advice and lucky item
    Simple,
    /// All six fields
    Full,
}

impl From<CliFormat> for crate::config::OutputFormat {
    fn from(format: CliFormat) -> Self {
        match format {
            CliFormat::Pretty => crate::config::OutputFormat::Pretty,
            CliFormat::Json => crate::config::OutputFormat::Json,
        }
    }
}

impl From<VariantArg> for FieldSet {
    fn from(variant: VariantArg) -> Self {
        match variant {
            VariantArg::Simple => FieldSet::Simple,
            VariantArg::Full => FieldSet::Full,
        }
    }
}
