//! Luna web server
//!
//! Serves the question page over HTTP.

use anyhow::Context;
use luna_web::{config::WebConfig, start_server};
use std::env;
use std::process;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        eprintln!("Error: {:#}", e);
        process::exit(1);
    }
}

fn init_tracing() {
    let filter = EnvFilter::try_from_env("LUNA_LOG").unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}

async fn run() -> anyhow::Result<()> {
    // Parse command-line arguments
    let args: Vec<String> = env::args().collect();

    let config = if args.len() > 2 && args[1] == "--config" {
        // Load from specified config file
        let config_path = &args[2];
        WebConfig::from_file(config_path)
            .with_context(|| format!("loading {}", config_path))?
    } else if args.len() > 1 && args[1] == "--help" {
        print_help();
        process::exit(0);
    } else {
        eprintln!("Warning: No config file specified, using default local configuration");
        eprintln!("Usage: luna-web --config <path-to-config.toml>");
        eprintln!();
        WebConfig::default_test_config()
    };

    init_tracing();

    start_server(config).await?;

    Ok(())
}

fn print_help() {
    println!("Luna - Fortune telling over HTTP");
    println!();
    println!("USAGE:");
    println!("    luna-web --config <path-to-config.toml>");
    println!();
    println!("OPTIONS:");
    println!("    --config <file>    Load configuration from TOML file");
    println!("    --help             Print this help message");
    println!();
    println!("CONFIGURATION:");
    println!("    The TOML config file may contain:");
    println!("    - bind_address: IP address to bind (default: '127.0.0.1')");
    println!("    - bind_port: Port number (default: 5000)");
    println!("    - [oracle]: model, api_key_env, variant, instruction_path, ...");
    println!();
    println!("    The API key is read from the variable named by api_key_env");
    println!("    (GEMINI_API_KEY by default). Set LUNA_LOG to adjust logging.");
    println!();
}
