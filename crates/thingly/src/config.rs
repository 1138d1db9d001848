//! GlobalOpts-aware configuration resolution.
//!
//! Thin wrapper over `thingly_config` that layers CLI flags on top of
//! the profile and defaults from the config file.

use thingly_config::{Config, Profile, config_path, load_config_or_default, profile_to_hub_config};
use thingly_core::{HubConfig, TlsVerification};

use crate::cli::GlobalOpts;
use crate::error::CliError;

/// Name of the profile the command should act on.
pub fn active_profile_name(global: &GlobalOpts, cfg: &Config) -> String {
    global
        .profile
        .clone()
        .or_else(|| cfg.default_profile.clone())
        .unwrap_or_else(|| "default".into())
}

/// Resolve the hub config from file, profile, and CLI overrides.
pub fn build_hub_config(global: &GlobalOpts) -> Result<HubConfig, CliError> {
    let cfg = load_config_or_default();
    let profile_name = active_profile_name(global, &cfg);

    let mut hub = if let Some(profile) = cfg.profiles.get(&profile_name) {
        profile_to_hub_config(profile, &cfg.defaults)?
    } else if let Some(ref gateway) = global.gateway {
        // No profile -- build purely from flags.
        HubConfig::new(gateway).map_err(|e| CliError::Validation {
            field: "gateway".into(),
            reason: e.to_string(),
        })?
    } else if global.profile.is_some() {
        let mut available: Vec<&str> = cfg.profiles.keys().map(String::as_str).collect();
        available.sort_unstable();
        return Err(CliError::ProfileNotFound {
            name: profile_name,
            available: available.join(", "),
        });
    } else {
        return Err(CliError::NoConfig {
            path: config_path().display().to_string(),
        });
    };

    // CLI flags override whatever the profile said.
    if let Some(ref gateway) = global.gateway {
        hub.url = gateway.parse().map_err(|e| CliError::Validation {
            field: "gateway".into(),
            reason: format!("invalid URL {gateway:?}: {e}"),
        })?;
    }
    if global.insecure {
        hub.tls = TlsVerification::Insecure;
    }
    hub.timeout_secs = global.timeout;
    hub.discovery_timeout_ms = global.discovery_timeout;

    Ok(hub)
}

/// Write or update a profile in the config file.
pub fn upsert_profile(
    name: &str,
    gateway: &str,
    make_default: bool,
) -> Result<(), CliError> {
    let mut cfg = load_config_or_default();
    cfg.profiles.insert(
        name.to_owned(),
        Profile {
            gateway: gateway.to_owned(),
            ca_cert: None,
            insecure: None,
            timeout: None,
            discovery_timeout: None,
            websocket: None,
        },
    );
    if make_default || cfg.default_profile.is_none() {
        cfg.default_profile = Some(name.to_owned());
    }
    thingly_config::save_config(&cfg)?;
    Ok(())
}
