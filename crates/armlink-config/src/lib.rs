//! Shared configuration for armlink tools.
//!
//! TOML profiles, token resolution (env + keyring + plaintext), and
//! translation to `armlink_core::AccountConfig`. The CLI layers its global
//! flags on top of what this crate resolves.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

use directories::ProjectDirs;
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use secrecy::SecretString;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use armlink_core::{
    AccountConfig, CloudEnvironment, DEFAULT_LOGIN_USER, PollConfig, TlsMode, TransportConfig,
};

/// Keyring service every stored token lives under.
pub const KEYRING_SERVICE: &str = "armlink";

// ── Error ───────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid {field}: {reason}")]
    Validation { field: String, reason: String },

    #[error("no token configured for profile '{profile}'")]
    NoCredentials { profile: String },

    #[error("profile '{name}' not found")]
    UnknownProfile { name: String },

    #[error("keyring error: {0}")]
    Keyring(#[from] keyring::Error),

    #[error("failed to serialize config: {0}")]
    Serialization(#[from] toml::ser::Error),

    #[error("config loading failed: {0}")]
    Figment(Box<figment::Error>),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<figment::Error> for ConfigError {
    fn from(err: figment::Error) -> Self {
        Self::Figment(Box::new(err))
    }
}

// ── TOML config structs ─────────────────────────────────────────────

/// Top-level TOML configuration.
#[derive(Debug, Deserialize, Serialize)]
pub struct Config {
    /// Default profile name.
    pub default_profile: Option<String>,

    #[serde(default)]
    pub defaults: Defaults,

    /// Named subscription profiles.
    #[serde(default)]
    pub profiles: HashMap<String, Profile>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            default_profile: Some("default".into()),
            defaults: Defaults::default(),
            profiles: HashMap::new(),
        }
    }
}

impl Config {
    /// The profile called `name`, or the default profile when `None`.
    pub fn profile(&self, name: Option<&str>) -> Result<(&str, &Profile), ConfigError> {
        let name = name
            .or(self.default_profile.as_deref())
            .unwrap_or("default");
        self.profiles
            .get_key_value(name)
            .map(|(k, p)| (k.as_str(), p))
            .ok_or_else(|| ConfigError::UnknownProfile { name: name.into() })
    }
}

#[derive(Debug, Deserialize, Serialize)]
pub struct Defaults {
    #[serde(default = "default_output")]
    pub output: String,

    #[serde(default = "default_color")]
    pub color: String,

    /// Request timeout in seconds.
    #[serde(default = "default_timeout")]
    pub timeout: u64,

    /// Seconds between polls of a long-running operation.
    #[serde(default = "default_poll_interval")]
    pub poll_interval: u64,

    /// Seconds before a long-running operation is abandoned.
    #[serde(default = "default_poll_deadline")]
    pub poll_deadline: u64,
}

impl Default for Defaults {
    fn default() -> Self {
        Self {
            output: default_output(),
            color: default_color(),
            timeout: default_timeout(),
            poll_interval: default_poll_interval(),
            poll_deadline: default_poll_deadline(),
        }
    }
}

fn default_output() -> String {
    "table".into()
}
fn default_color() -> String {
    "auto".into()
}
fn default_timeout() -> u64 {
    60
}
fn default_poll_interval() -> u64 {
    10
}
fn default_poll_deadline() -> u64 {
    1800
}

/// A named subscription profile.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Profile {
    pub subscription_id: String,

    pub tenant_id: Option<String>,

    /// Azure cloud name, e.g. "AzurePublicCloud" or "AzureChinaCloud".
    #[serde(default = "default_environment")]
    pub environment: String,

    /// Resource Manager endpoint override.
    pub endpoint: Option<String>,

    /// Region used when a command does not name one.
    pub region: Option<String>,

    /// Bearer token (plaintext; prefer keyring or env var).
    pub token: Option<String>,

    /// Environment variable name containing the bearer token.
    pub token_env: Option<String>,

    /// Admin user for VMs created through this profile.
    pub login_user: Option<String>,

    /// Path to custom CA certificate.
    pub ca_cert: Option<PathBuf>,

    pub insecure: Option<bool>,

    /// Override timeout.
    pub timeout: Option<u64>,
}

fn default_environment() -> String {
    CloudEnvironment::Public.name().into()
}

// ── Config file path ────────────────────────────────────────────────

/// Resolve the config file path via XDG / platform conventions.
pub fn config_path() -> PathBuf {
    ProjectDirs::from("com", "armlink", "armlink").map_or_else(
        || {
            let mut p = dirs_fallback();
            p.push("config.toml");
            p
        },
        |dirs| dirs.config_dir().join("config.toml"),
    )
}

fn dirs_fallback() -> PathBuf {
    let mut p = PathBuf::from(std::env::var("HOME").unwrap_or_else(|_| ".".into()));
    p.push(".config");
    p.push("armlink");
    p
}

// ── Config loading ──────────────────────────────────────────────────

/// Load the full Config from the canonical file + environment.
pub fn load_config() -> Result<Config, ConfigError> {
    load_config_from(&config_path())
}

/// Load from an explicit file. `ARMLINK_` variables override the file;
/// nested keys use `__`, e.g. `ARMLINK_DEFAULTS__OUTPUT=json`.
pub fn load_config_from(path: &Path) -> Result<Config, ConfigError> {
    let figment = Figment::new()
        .merge(Serialized::defaults(Config::default()))
        .merge(Toml::file(path))
        .merge(Env::prefixed("ARMLINK_").split("__"));

    let config: Config = figment.extract()?;
    Ok(config)
}

/// Load config, returning a default if the file doesn't exist.
pub fn load_config_or_default() -> Config {
    load_config().unwrap_or_default()
}

// ── Config saving ───────────────────────────────────────────────────

/// Serialize config to TOML and write to the canonical config path.
pub fn save_config(cfg: &Config) -> Result<(), ConfigError> {
    save_config_to(cfg, &config_path())
}

pub fn save_config_to(cfg: &Config, path: &Path) -> Result<(), ConfigError> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let toml_str = toml::to_string_pretty(cfg)?;
    std::fs::write(path, toml_str)?;
    Ok(())
}

// ── Token resolution ────────────────────────────────────────────────

fn keyring_entry(profile_name: &str) -> Result<keyring::Entry, keyring::Error> {
    keyring::Entry::new(KEYRING_SERVICE, &format!("{profile_name}/token"))
}

/// Resolve a bearer token from the credential chain (no CLI flag step).
pub fn resolve_token(profile: &Profile, profile_name: &str) -> Result<SecretString, ConfigError> {
    // 1. Profile's token_env → env var lookup
    if let Some(ref env_name) = profile.token_env {
        if let Ok(val) = std::env::var(env_name) {
            return Ok(SecretString::from(val));
        }
    }

    // 2. System keyring
    if let Ok(entry) = keyring_entry(profile_name) {
        if let Ok(secret) = entry.get_password() {
            return Ok(SecretString::from(secret));
        }
    }

    // 3. Plaintext in config
    if let Some(ref token) = profile.token {
        return Ok(SecretString::from(token.clone()));
    }

    Err(ConfigError::NoCredentials {
        profile: profile_name.into(),
    })
}

/// Store a token in the system keyring for `profile_name`.
pub fn store_token(profile_name: &str, token: &str) -> Result<(), ConfigError> {
    keyring_entry(profile_name)?.set_password(token)?;
    Ok(())
}

// ── Translation ─────────────────────────────────────────────────────

fn transport(profile: &Profile, defaults: &Defaults) -> TransportConfig {
    let tls = if profile.insecure.unwrap_or(false) {
        TlsMode::DangerAcceptInvalid
    } else if let Some(ref ca_path) = profile.ca_cert {
        TlsMode::CustomCa(ca_path.clone())
    } else {
        TlsMode::System
    };
    TransportConfig {
        tls,
        timeout: Duration::from_secs(profile.timeout.unwrap_or(defaults.timeout)),
    }
}

/// Build an `AccountConfig` from a profile and an already resolved token.
pub fn account_config(
    profile: &Profile,
    defaults: &Defaults,
    token: SecretString,
) -> Result<AccountConfig, ConfigError> {
    if profile.subscription_id.trim().is_empty() {
        return Err(ConfigError::Validation {
            field: "subscription_id".into(),
            reason: "must not be empty".into(),
        });
    }
    let environment: CloudEnvironment =
        profile
            .environment
            .parse()
            .map_err(|_| ConfigError::Validation {
                field: "environment".into(),
                reason: format!("unknown Azure cloud '{}'", profile.environment),
            })?;
    if let Some(ref endpoint) = profile.endpoint {
        endpoint
            .parse::<url::Url>()
            .map_err(|_| ConfigError::Validation {
                field: "endpoint".into(),
                reason: format!("invalid URL: {endpoint}"),
            })?;
    }

    let mut account = AccountConfig::new(profile.subscription_id.trim(), token);
    account.environment = environment;
    account.endpoint.clone_from(&profile.endpoint);
    account.tenant_id.clone_from(&profile.tenant_id);
    account.default_login_user = profile
        .login_user
        .clone()
        .unwrap_or_else(|| DEFAULT_LOGIN_USER.into());
    account.transport = transport(profile, defaults);
    account.poll = PollConfig {
        interval: Duration::from_secs(defaults.poll_interval),
        deadline: Duration::from_secs(defaults.poll_deadline),
    };
    Ok(account)
}

/// Build an `AccountConfig` from a profile, resolving its token.
pub fn profile_to_account_config(
    profile: &Profile,
    profile_name: &str,
    defaults: &Defaults,
) -> Result<AccountConfig, ConfigError> {
    let token = resolve_token(profile, profile_name)?;
    account_config(profile, defaults, token)
}
