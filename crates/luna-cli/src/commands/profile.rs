//! Profile command implementation.

use crate::cli::{ProfileAction, ProfileArgs, VariantArg};
use crate::config::Config;
use crate::error::{CliError, Result};
use crate::output::Formatter;
use luna_oracle::OracleConfig;
use std::path::PathBuf;

/// Overrides given to `profile set`.
#[derive(Debug, Default)]
pub struct ProfileUpdate {
    /// Model identifier
    pub model: Option<String>,
    /// Field set
    pub variant: Option<VariantArg>,
    /// Instruction file
    pub instruction: Option<String>,
    /// Environment variable holding the API key
    pub api_key_env: Option<String>,
}

/// Execute the profile command.
pub fn execute_profile(args: ProfileArgs, config: &mut Config, formatter: &Formatter) -> Result<()> {
    match args.action {
        ProfileAction::List => list_profiles(config, formatter),
        ProfileAction::Show => show_active_profile(config, formatter),
        ProfileAction::Switch { name } => switch_profile(config, name, formatter),
        ProfileAction::Set {
            name,
            model,
            variant,
            instruction,
            api_key_env,
        } => {
            let update = ProfileUpdate {
                model,
                variant,
                instruction,
                api_key_env,
            };
            set_profile(config, name, update, formatter)
        }
        ProfileAction::Delete { name } => delete_profile(config, name, formatter),
    }
}

/// List all profiles.
fn list_profiles(config: &Config, formatter: &Formatter) -> Result<()> {
    if config.profiles.is_empty() {
        println!("{}", formatter.info("No profiles configured"));
        return Ok(());
    }

    println!("Available profiles:");
    for (name, profile) in &config.profiles {
        if name == &config.active_profile {
            println!("* {}", formatter.success(name));
        } else {
            println!("  {}", name);
        }
        print_profile(profile, "    ");
    }

    Ok(())
}

/// Show the active profile.
fn show_active_profile(config: &Config, formatter: &Formatter) -> Result<()> {
    let profile = config.get_active_profile()?;

    println!("Active profile: {}", formatter.success(&config.active_profile));
    print_profile(profile, "  ");

    Ok(())
}

fn print_profile(profile: &OracleConfig, indent: &str) {
    println!("{}Model: {}", indent, profile.model);
    println!("{}Variant: {}", indent, profile.variant);
    println!("{}API key variable: {}", indent, profile.api_key_env);
    println!("{}Instruction: {}", indent, profile.instruction_path.display());
}

/// Switch to a different profile.
fn switch_profile(config: &mut Config, name: String, formatter: &Formatter) -> Result<()> {
    config.ensure_writable()?;
    config.switch_profile(name.clone())?;
    config.save()?;
    println!(
        "{}",
        formatter.success(&format!("Switched to profile '{}'", name))
    );
    Ok(())
}

/// Apply `update` on top of an existing profile, or the defaults.
fn updated_profile(existing: Option<&OracleConfig>, update: ProfileUpdate) -> Result<OracleConfig> {
    let mut profile = existing.cloned().unwrap_or_default();

    if let Some(model) = update.model {
        profile.model = model;
    }
    if let Some(variant) = update.variant {
        profile.variant = variant.into();
    }
    if let Some(instruction) = update.instruction {
        profile.instruction_path = PathBuf::from(instruction);
    }
    if let Some(api_key_env) = update.api_key_env {
        profile.api_key_env = api_key_env;
    }

    profile.validate()?;
    Ok(profile)
}

/// Create or update a profile.
fn set_profile(
    config: &mut Config,
    name: String,
    update: ProfileUpdate,
    formatter: &Formatter,
) -> Result<()> {
    config.ensure_writable()?;

    let existing = config.profiles.get(&name);
    let action = if existing.is_some() {
        "Updated"
    } else {
        "Created"
    };

    let profile = updated_profile(existing, update)?;
    config.set_profile(name.clone(), profile);
    config.save()?;

    println!(
        "{}",
        formatter.success(&format!("{} profile '{}'", action, name))
    );

    Ok(())
}

/// Delete a profile.
fn delete_profile(config: &mut Config, name: String, formatter: &Formatter) -> Result<()> {
    config.ensure_writable()?;

    if name == config.active_profile {
        return Err(CliError::NotPermitted(
            "Cannot delete the active profile".to_string(),
        ));
    }

    if config.profiles.remove(&name).is_some() {
        config.save()?;
        println!(
            "{}",
            formatter.success(&format!("Deleted profile '{}'", name))
        );
    } else {
        println!(
            "{}",
            formatter.warning(&format!("Profile '{}' does not exist", name))
        );
    }

    Ok(())
}
