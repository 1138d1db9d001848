//! Config command handlers.

use thingly_config::{config_path, load_config_or_default};

use crate::cli::{ConfigArgs, ConfigCommand, GlobalOpts};
use crate::config;
use crate::error::CliError;
use crate::output;

pub fn handle(args: ConfigArgs, global: &GlobalOpts) -> Result<(), CliError> {
    match args.command {
        ConfigCommand::Init {
            name,
            gateway,
            default,
        } => init(&name, &gateway, default, global),
        ConfigCommand::Show => show(global),
        ConfigCommand::Path => {
            output::print_output(&config_path().display().to_string(), global.quiet);
            Ok(())
        }
    }
}

fn init(name: &str, gateway: &str, default: bool, global: &GlobalOpts) -> Result<(), CliError> {
    // Validate the URL before persisting anything.
    thingly_core::HubConfig::new(gateway).map_err(|e| CliError::Validation {
        field: "gateway".into(),
        reason: e.to_string(),
    })?;

    config::upsert_profile(name, gateway, default)?;
    output::print_output(
        &format!("Saved profile '{name}' -> {gateway}"),
        global.quiet,
    );
    Ok(())
}

fn show(global: &GlobalOpts) -> Result<(), CliError> {
    let cfg = load_config_or_default();
    let rendered = toml::to_string_pretty(&cfg).map_err(|e| CliError::Internal {
        message: format!("failed to render config: {e}"),
    })?;
    output::print_output(&rendered, global.quiet);
    Ok(())
}
