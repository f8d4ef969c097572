//! CLI configuration: thin wrapper around `armlink_config` shared types.
//!
//! Adds resolution that respects `GlobalOpts` flag overrides
//! (--subscription, --token, --endpoint, --region, ...).

use std::time::Duration;

use secrecy::SecretString;

use armlink_core::{AccountConfig, CloudEnvironment, TlsMode};

use crate::cli::GlobalOpts;
use crate::error::CliError;

pub use armlink_config::{
    Config, Defaults, Profile, config_path, load_config_or_default, save_config,
};

/// Everything a command needs to reach ARM.
#[derive(Debug)]
pub struct Resolved {
    /// Profile name, or `"(flags)"` when no profile was used.
    pub profile: String,
    pub account: AccountConfig,
    /// Region from the flag, else the profile.
    pub region: Option<String>,
}

/// Resolve the active profile name from CLI flags and config.
pub fn active_profile_name(global: &GlobalOpts, config: &Config) -> String {
    global
        .profile
        .clone()
        .or_else(|| config.default_profile.clone())
        .unwrap_or_else(|| "default".into())
}

/// Build an account from the config file and CLI overrides.
pub fn resolve(global: &GlobalOpts) -> Result<Resolved, CliError> {
    let cfg = load_config_or_default();
    let profile_name = active_profile_name(global, &cfg);

    if let Some(profile) = cfg.profiles.get(&profile_name) {
        let account = resolve_profile(profile, &profile_name, &cfg.defaults, global)?;
        return Ok(Resolved {
            profile: profile_name,
            account,
            region: global.region.clone().or_else(|| profile.region.clone()),
        });
    }

    // An explicitly named profile must exist
    if global.profile.is_some() {
        let mut names: Vec<&str> = cfg.profiles.keys().map(String::as_str).collect();
        names.sort_unstable();
        return Err(CliError::ProfileNotFound {
            name: profile_name,
            available: if names.is_empty() {
                "(none)".into()
            } else {
                names.join(", ")
            },
        });
    }

    // No profile: flags and environment alone
    let Some(subscription) = global.subscription.clone() else {
        return Err(CliError::NoConfig {
            path: config_path().display().to_string(),
        });
    };
    if global.token.is_none() {
        return Err(CliError::NoCredentials {
            profile: profile_name,
        });
    }
    let profile = Profile {
        subscription_id: subscription,
        environment: CloudEnvironment::Public.name().into(),
        ..Profile::default()
    };
    let account = resolve_profile(&profile, "(flags)", &cfg.defaults, global)?;
    Ok(Resolved {
        profile: "(flags)".into(),
        account,
        region: global.region.clone(),
    })
}

/// Translate a `Profile` plus global flags into an `AccountConfig`.
///
/// CLI flag overrides take priority over profile values.
pub fn resolve_profile(
    profile: &Profile,
    profile_name: &str,
    defaults: &Defaults,
    global: &GlobalOpts,
) -> Result<AccountConfig, CliError> {
    let mut profile = profile.clone();
    if let Some(ref subscription) = global.subscription {
        profile.subscription_id.clone_from(subscription);
    }
    if global.endpoint.is_some() {
        profile.endpoint.clone_from(&global.endpoint);
    }

    let token = match global.token {
        Some(ref token) => SecretString::from(token.clone()),
        None => armlink_config::resolve_token(&profile, profile_name)?,
    };

    let mut account = armlink_config::account_config(&profile, defaults, token)?;
    if global.insecure {
        account.transport.tls = TlsMode::DangerAcceptInvalid;
    }
    if let Some(secs) = global.timeout {
        account.transport.timeout = Duration::from_secs(secs);
    }
    Ok(account)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use clap::Parser;

    use super::*;
    use crate::cli::Cli;

    fn global(args: &[&str]) -> GlobalOpts {
        let mut argv = vec!["armlink"];
        argv.extend_from_slice(args);
        argv.extend_from_slice(&["regions", "list"]);
        Cli::try_parse_from(argv).unwrap().global
    }

    fn profile() -> Profile {
        Profile {
            subscription_id: "sub-profile".into(),
            environment: "AzureUSGovernmentCloud".into(),
            token: Some("from-file".into()),
            timeout: Some(5),
            ..Profile::default()
        }
    }

    #[test]
    fn flags_override_profile_values() {
        let global = global(&[
            "--subscription",
            "sub-flag",
            "--token",
            "from-flag",
            "--endpoint",
            "http://127.0.0.1:9000",
            "--timeout",
            "42",
            "-k",
        ]);
        let account = resolve_profile(&profile(), "work", &Defaults::default(), &global).unwrap();

        assert_eq!(account.subscription_id, "sub-flag");
        assert_eq!(account.resource_manager_endpoint(), "http://127.0.0.1:9000");
        assert_eq!(account.transport.timeout, Duration::from_secs(42));
        assert!(matches!(account.transport.tls, TlsMode::DangerAcceptInvalid));
        assert_eq!(account.environment, CloudEnvironment::UsGovernment);
    }

    #[test]
    fn profile_values_apply_without_flags() {
        let account =
            resolve_profile(&profile(), "work", &Defaults::default(), &global(&[])).unwrap();

        assert_eq!(account.subscription_id, "sub-profile");
        assert_eq!(account.transport.timeout, Duration::from_secs(5));
        assert!(matches!(account.transport.tls, TlsMode::System));
    }

    #[test]
    fn active_profile_prefers_flag() {
        let cfg = Config::default();
        assert_eq!(active_profile_name(&global(&[]), &cfg), "default");
        assert_eq!(active_profile_name(&global(&["-p", "lab"]), &cfg), "lab");
    }
}
