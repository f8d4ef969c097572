//! Config subcommand handlers.

use std::fmt::Write as _;

use dialoguer::{Input, Password, Select};

use armlink_core::CloudEnvironment;

use crate::cli::{ConfigArgs, ConfigCommand, GlobalOpts};
use crate::config::{self, Config, Defaults, Profile};
use crate::error::CliError;
use crate::output;

const MASK: &str = "****";

// ── Helpers ─────────────────────────────────────────────────────────

/// Copy of the config with plaintext tokens masked, for every output format.
fn redacted(cfg: &Config) -> Config {
    Config {
        default_profile: cfg.default_profile.clone(),
        defaults: Defaults {
            output: cfg.defaults.output.clone(),
            color: cfg.defaults.color.clone(),
            timeout: cfg.defaults.timeout,
            poll_interval: cfg.defaults.poll_interval,
            poll_deadline: cfg.defaults.poll_deadline,
        },
        profiles: cfg
            .profiles
            .iter()
            .map(|(name, p)| {
                let mut p = p.clone();
                if p.token.is_some() {
                    p.token = Some(MASK.into());
                }
                (name.clone(), p)
            })
            .collect(),
    }
}

/// TOML-style view of a (redacted) config.
fn format_config(cfg: &Config) -> String {
    let mut out = String::new();
    if let Some(ref default) = cfg.default_profile {
        let _ = writeln!(out, "default_profile = \"{default}\"");
    }
    let _ = writeln!(out, "\n[defaults]");
    let _ = writeln!(out, "output = \"{}\"", cfg.defaults.output);
    let _ = writeln!(out, "color = \"{}\"", cfg.defaults.color);
    let _ = writeln!(out, "timeout = {}", cfg.defaults.timeout);
    let _ = writeln!(out, "poll_interval = {}", cfg.defaults.poll_interval);
    let _ = write!(out, "poll_deadline = {}", cfg.defaults.poll_deadline);

    let mut names: Vec<_> = cfg.profiles.keys().collect();
    names.sort();
    for name in names {
        let p = &cfg.profiles[name];
        let _ = writeln!(out, "\n\n[profiles.{name}]");
        let _ = writeln!(out, "subscription_id = \"{}\"", p.subscription_id);
        let _ = write!(out, "environment = \"{}\"", p.environment);
        let optional = [
            ("tenant_id", p.tenant_id.clone()),
            ("endpoint", p.endpoint.clone()),
            ("region", p.region.clone()),
            ("token", p.token.clone()),
            ("token_env", p.token_env.clone()),
            ("login_user", p.login_user.clone()),
            ("ca_cert", p.ca_cert.as_ref().map(|c| c.display().to_string())),
        ];
        for (key, value) in optional {
            if let Some(value) = value {
                let _ = write!(out, "\n{key} = \"{value}\"");
            }
        }
        if let Some(insecure) = p.insecure {
            let _ = write!(out, "\ninsecure = {insecure}");
        }
        if let Some(timeout) = p.timeout {
            let _ = write!(out, "\ntimeout = {timeout}");
        }
    }
    out
}

fn save_config(cfg: &Config) -> Result<(), CliError> {
    config::save_config(cfg)?;
    Ok(())
}

fn prompt_err(e: impl std::fmt::Display) -> CliError {
    CliError::Validation {
        field: "interactive".into(),
        reason: format!("prompt failed: {e}"),
    }
}

fn profile_not_found(cfg: &Config, name: String) -> CliError {
    let mut available: Vec<_> = cfg.profiles.keys().cloned().collect();
    available.sort();
    CliError::ProfileNotFound {
        name,
        available: if available.is_empty() {
            "(none)".into()
        } else {
            available.join(", ")
        },
    }
}

fn parse_flag<T: std::str::FromStr>(field: &str, value: &str, reason: &str) -> Result<T, CliError> {
    value.parse().map_err(|_| CliError::Validation {
        field: field.into(),
        reason: reason.into(),
    })
}

/// Apply `key = value` to a profile.
fn set_key(profile: &mut Profile, key: &str, value: String) -> Result<(), CliError> {
    match key {
        "subscription_id" | "subscription" => profile.subscription_id = value,
        "tenant_id" | "tenant" => profile.tenant_id = Some(value),
        "environment" => {
            parse_flag::<CloudEnvironment>(
                "environment",
                &value,
                "expected AzurePublicCloud, AzureChinaCloud, AzureUSGovernmentCloud or AzureGermanCloud",
            )?;
            profile.environment = value;
        }
        "endpoint" => profile.endpoint = Some(value),
        "region" => profile.region = Some(value),
        "token" => profile.token = Some(value),
        "token_env" | "token-env" => profile.token_env = Some(value),
        "login_user" | "login-user" => profile.login_user = Some(value),
        "ca_cert" | "ca-cert" => profile.ca_cert = Some(value.into()),
        "insecure" => {
            profile.insecure = Some(parse_flag("insecure", &value, "must be 'true' or 'false'")?);
        }
        "timeout" => {
            profile.timeout = Some(parse_flag("timeout", &value, "must be a number (seconds)")?);
        }
        other => {
            return Err(CliError::Validation {
                field: other.into(),
                reason: format!(
                    "unknown config key '{other}'. Valid keys: subscription_id, tenant_id, \
                     environment, endpoint, region, token, token_env, login_user, ca_cert, \
                     insecure, timeout"
                ),
            });
        }
    }
    Ok(())
}

/// Prompt for a bearer token without echo.
fn prompt_token() -> Result<String, CliError> {
    let token = Password::new()
        .with_prompt("Bearer token")
        .interact()
        .map_err(prompt_err)?;
    if token.trim().is_empty() {
        return Err(CliError::Validation {
            field: "token".into(),
            reason: "token cannot be empty".into(),
        });
    }
    Ok(token.trim().to_owned())
}

// ── Handler ─────────────────────────────────────────────────────────

pub fn handle(args: ConfigArgs, global: &GlobalOpts) -> Result<(), CliError> {
    match args.command {
        ConfigCommand::Init => {
            let config_path = config::config_path();
            eprintln!("armlink configuration");
            eprintln!("   Config path: {}\n", config_path.display());

            let profile_name: String = Input::new()
                .with_prompt("Profile name")
                .default("default".into())
                .interact_text()
                .map_err(prompt_err)?;

            let subscription_id: String = Input::new()
                .with_prompt("Subscription id")
                .interact_text()
                .map_err(prompt_err)?;

            let clouds = [
                CloudEnvironment::Public,
                CloudEnvironment::China,
                CloudEnvironment::UsGovernment,
                CloudEnvironment::German,
            ];
            let names: Vec<&str> = clouds.iter().map(CloudEnvironment::name).collect();
            let cloud = Select::new()
                .with_prompt("Azure cloud")
                .items(&names)
                .default(0)
                .interact()
                .map_err(prompt_err)?;

            let region: String = Input::new()
                .with_prompt("Default region (blank for none)")
                .allow_empty(true)
                .interact_text()
                .map_err(prompt_err)?;

            let token = prompt_token()?;
            let storage = Select::new()
                .with_prompt("Where to store the token?")
                .items(&[
                    "Store in system keyring (recommended)",
                    "Save to config file (plaintext)",
                ])
                .default(0)
                .interact()
                .map_err(prompt_err)?;
            let token = if storage == 0 {
                armlink_config::store_token(&profile_name, &token)?;
                eprintln!("   Token stored in system keyring");
                None
            } else {
                Some(token)
            };

            let profile = Profile {
                subscription_id: subscription_id.trim().to_owned(),
                environment: names[cloud].to_owned(),
                region: Some(region.trim().to_owned()).filter(|r| !r.is_empty()),
                token,
                ..Profile::default()
            };

            // Keep other profiles when re-running init
            let mut cfg = config::load_config_or_default();
            cfg.profiles.insert(profile_name.clone(), profile);
            cfg.default_profile = Some(profile_name.clone());
            save_config(&cfg)?;

            eprintln!("\nConfiguration written to {}", config_path.display());
            eprintln!("  Active profile: {profile_name}");
            eprintln!("\n  Test it: armlink regions list");
            Ok(())
        }

        ConfigCommand::Show => {
            let cfg = redacted(&config::load_config_or_default());
            let out = output::render_single(&global.output, &cfg, format_config, |c| {
                c.default_profile.clone().unwrap_or_default()
            })?;
            output::print_output(&out, global.quiet);
            Ok(())
        }

        ConfigCommand::Set { key, value } => {
            let mut cfg = config::load_config_or_default();
            let profile_name = config::active_profile_name(global, &cfg);
            let profile = cfg.profiles.entry(profile_name.clone()).or_insert_with(|| Profile {
                environment: CloudEnvironment::Public.name().into(),
                ..Profile::default()
            });
            set_key(profile, &key, value)?;
            save_config(&cfg)?;
            eprintln!("Set {key} on profile '{profile_name}'");
            Ok(())
        }

        ConfigCommand::Profiles => {
            let cfg = config::load_config_or_default();
            let default = cfg.default_profile.as_deref().unwrap_or("default");
            if cfg.profiles.is_empty() {
                eprintln!("No profiles configured. Run: armlink config init");
            } else {
                let mut names: Vec<&String> = cfg.profiles.keys().collect();
                names.sort();
                for name in names {
                    let marker = if name == default { " *" } else { "" };
                    println!("{name}{marker}");
                }
            }
            Ok(())
        }

        ConfigCommand::Use { name } => {
            let mut cfg = config::load_config_or_default();
            if !cfg.profiles.contains_key(&name) {
                return Err(profile_not_found(&cfg, name));
            }
            cfg.default_profile = Some(name.clone());
            save_config(&cfg)?;
            eprintln!("Default profile set to '{name}'");
            Ok(())
        }

        ConfigCommand::SetToken { profile } => {
            let cfg = config::load_config_or_default();
            let profile_name = profile.unwrap_or_else(|| config::active_profile_name(global, &cfg));
            if !cfg.profiles.contains_key(&profile_name) {
                return Err(profile_not_found(&cfg, profile_name));
            }
            let token = prompt_token()?;
            armlink_config::store_token(&profile_name, &token)?;
            eprintln!("Token stored in system keyring for profile '{profile_name}'");
            Ok(())
        }
    }
}
