//! CLI error types with miette diagnostics.
//!
//! Maps `CoreError` and `ConfigError` into user-facing errors with
//! actionable help text.

use miette::Diagnostic;
use thiserror::Error;

use armlink_config::ConfigError;
use armlink_core::CoreError;

/// Process exit codes.
pub mod exit_code {
    pub const GENERAL: i32 = 1;
    pub const USAGE: i32 = 2;
    pub const AUTH: i32 = 3;
    pub const NOT_FOUND: i32 = 4;
    pub const UNSUPPORTED: i32 = 5;
    pub const CONFLICT: i32 = 6;
    pub const CONNECTION: i32 = 7;
    pub const TIMEOUT: i32 = 8;
}

#[derive(Debug, Error, Diagnostic)]
pub enum CliError {
    // ── Connection ───────────────────────────────────────────────────
    #[error("Could not reach Azure Resource Manager")]
    #[diagnostic(
        code(armlink::connection_failed),
        help(
            "Check network access to the Resource Manager endpoint.\n\
             Sovereign clouds need `environment` set in the profile."
        )
    )]
    ConnectionFailed {
        #[source]
        source: armlink_api::Error,
    },

    #[error("TLS error: {message}")]
    #[diagnostic(
        code(armlink::tls_error),
        help("Configure ca_cert in your profile, or use --insecure (-k) for local emulators.")
    )]
    TlsError { message: String },

    // ── Authentication ───────────────────────────────────────────────
    #[error("Authentication failed: {message}")]
    #[diagnostic(
        code(armlink::auth_failed),
        help(
            "Bearer tokens expire after about an hour.\n\
             Fetch a new one: az account get-access-token --query accessToken -o tsv\n\
             Then run: armlink config set-token"
        )
    )]
    AuthFailed { message: String },

    #[error("No token configured for profile '{profile}'")]
    #[diagnostic(
        code(armlink::no_credentials),
        help(
            "Store one with: armlink config set-token --profile {profile}\n\
             Or set ARMLINK_TOKEN."
        )
    )]
    NoCredentials { profile: String },

    // ── Resources ────────────────────────────────────────────────────
    #[error("{resource_type} '{identifier}' not found")]
    #[diagnostic(
        code(armlink::not_found),
        help("Run: armlink {list_command} to see what exists in the region")
    )]
    NotFound {
        resource_type: String,
        identifier: String,
        list_command: String,
    },

    #[error("Conflict: {message}")]
    #[diagnostic(code(armlink::conflict))]
    Conflict { message: String },

    // ── ARM ──────────────────────────────────────────────────────────
    #[error("{message}")]
    #[diagnostic(code(armlink::api_error))]
    ApiError {
        message: String,
        code: Option<String>,
    },

    // ── Capability gaps ──────────────────────────────────────────────
    #[error("Operation '{operation}' is not supported on Azure")]
    #[diagnostic(code(armlink::unsupported))]
    Unsupported { operation: String },

    #[error("'{operation}' is not implemented")]
    #[diagnostic(
        code(armlink::not_implemented),
        help("Classic virtual networks are read-only through armlink.")
    )]
    NotYetImplemented { operation: String },

    // ── Provisioning ─────────────────────────────────────────────────
    #[error("No VM size accepted {cpu} vCPU / {memory_mb} MB")]
    #[diagnostic(
        code(armlink::no_instance_type),
        help("Run: armlink vms sizes --cpu {cpu} to see what the region offers")
    )]
    NoInstanceType { cpu: u32, memory_mb: u64 },

    #[error("Image '{image_id}' is not ready (state: {state})")]
    #[diagnostic(code(armlink::image_unavailable))]
    ImageUnavailable { image_id: String, state: String },

    // ── Validation ───────────────────────────────────────────────────
    #[error("Invalid value for {field}: {reason}")]
    #[diagnostic(code(armlink::validation))]
    Validation { field: String, reason: String },

    // ── Configuration ────────────────────────────────────────────────
    #[error("Profile '{name}' not found in configuration")]
    #[diagnostic(
        code(armlink::profile_not_found),
        help(
            "Available profiles: {available}\n\
             Create one with: armlink config init"
        )
    )]
    ProfileNotFound { name: String, available: String },

    #[error("No subscription configured")]
    #[diagnostic(
        code(armlink::no_config),
        help(
            "Create a profile with: armlink config init\n\
             Expected at: {path}\n\
             Or pass --subscription and --token."
        )
    )]
    NoConfig { path: String },

    #[error("No region selected")]
    #[diagnostic(
        code(armlink::no_region),
        help("Pass --region (-r), set ARMLINK_REGION, or set `region` in the profile.")
    )]
    NoRegion,

    #[error(transparent)]
    #[diagnostic(code(armlink::config))]
    Config(ConfigError),

    // ── Interactive ──────────────────────────────────────────────────
    #[error("Destructive operation '{action}' requires confirmation")]
    #[diagnostic(
        code(armlink::confirmation_required),
        help("Use --yes (-y) to skip confirmation in non-interactive contexts.")
    )]
    NonInteractiveRequiresYes { action: String },

    // ── Timeout ──────────────────────────────────────────────────────
    #[error("Timed out after {seconds}s waiting for {operation}")]
    #[diagnostic(
        code(armlink::timeout),
        help("The operation may still complete; check it with the matching `show` command.")
    )]
    Timeout { operation: String, seconds: u64 },

    // ── IO / Serialization ───────────────────────────────────────────
    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("Failed to render output: {0}")]
    #[diagnostic(code(armlink::output))]
    Render(String),

    #[error("Internal error: {0}")]
    #[diagnostic(code(armlink::internal))]
    Internal(String),
}

impl CliError {
    /// Map this error to an exit code for process termination.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::ConnectionFailed { .. } | Self::TlsError { .. } => exit_code::CONNECTION,
            Self::AuthFailed { .. } | Self::NoCredentials { .. } => exit_code::AUTH,
            Self::NotFound { .. } | Self::ProfileNotFound { .. } => exit_code::NOT_FOUND,
            Self::Conflict { .. } => exit_code::CONFLICT,
            Self::Timeout { .. } => exit_code::TIMEOUT,
            Self::Validation { .. }
            | Self::NonInteractiveRequiresYes { .. }
            | Self::NoConfig { .. }
            | Self::NoRegion => exit_code::USAGE,
            Self::Unsupported { .. } | Self::NotYetImplemented { .. } => exit_code::UNSUPPORTED,
            _ => exit_code::GENERAL,
        }
    }
}

/// `armlink <cmd> list` for an entity type named by the core crate.
fn list_command(entity_type: &str) -> &'static str {
    match entity_type {
        "region" => "regions list",
        "vpc" | "classic vpc" => "vpcs list",
        "subnet" | "network" => "networks list",
        "security group" | "security rule" => "secgroups list",
        "vm" | "instance" => "vms list",
        "site" | "app" | "app service plan" => "apps list",
        "image" => "images list",
        _ => "groups",
    }
}

// ── API error → CliError mapping ─────────────────────────────────────

impl From<armlink_api::Error> for CliError {
    fn from(err: armlink_api::Error) -> Self {
        use armlink_api::Error as Api;

        match err {
            Api::InvalidToken => CliError::AuthFailed {
                message: "bearer token rejected by Azure Resource Manager".into(),
            },
            Api::Authentication { message } => CliError::AuthFailed { message },
            Api::Timeout {
                operation,
                timeout_secs,
            } => CliError::Timeout {
                operation,
                seconds: timeout_secs,
            },
            Api::Tls(message) => CliError::TlsError { message },
            Api::Transport(ref e) if e.is_timeout() => CliError::Timeout {
                operation: "request".into(),
                seconds: 0,
            },
            other @ Api::Transport(_) => CliError::ConnectionFailed { source: other },
            Api::Arm {
                status: 409,
                message,
                ..
            } => CliError::Conflict { message },
            Api::Arm { code, body, .. } => CliError::ApiError {
                message: body,
                code,
            },
            Api::InvalidRequest { message } => CliError::Validation {
                field: "request".into(),
                reason: message,
            },
            Api::ReservedTagKey { key } => CliError::Validation {
                field: "tag".into(),
                reason: format!("key '{key}' uses a reserved prefix"),
            },
            Api::NotFound { resource, .. } => CliError::NotFound {
                resource_type: "resource".into(),
                identifier: resource,
                list_command: list_command("").into(),
            },
            other => CliError::ApiError {
                message: other.to_string(),
                code: None,
            },
        }
    }
}

// ── CoreError → CliError mapping ─────────────────────────────────────

impl From<CoreError> for CliError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::NotFound {
                entity_type,
                identifier,
            } => CliError::NotFound {
                list_command: list_command(&entity_type).into(),
                resource_type: entity_type,
                identifier,
            },

            CoreError::NotSupported { operation } => CliError::Unsupported { operation },

            CoreError::NotImplemented { operation } => CliError::NotYetImplemented { operation },

            CoreError::Request {
                operation,
                target,
                source,
            } => match CliError::from(source) {
                CliError::ApiError { message, code } => CliError::ApiError {
                    message: format!("{operation} {target}: {message}"),
                    code,
                },
                mapped => mapped,
            },

            CoreError::Api { message, code, .. } => CliError::ApiError { message, code },

            CoreError::InstanceTypeUnavailable { cpu, memory_mb } => {
                CliError::NoInstanceType { cpu, memory_mb }
            }

            CoreError::ImageUnavailable { image_id, state } => {
                CliError::ImageUnavailable { image_id, state }
            }

            CoreError::InvalidInput { message } => CliError::Validation {
                field: "input".into(),
                reason: message,
            },

            CoreError::Config { message } => CliError::AuthFailed { message },

            CoreError::Internal(message) => CliError::Internal(message),
        }
    }
}

// ── ConfigError → CliError mapping ───────────────────────────────────

impl From<ConfigError> for CliError {
    fn from(err: ConfigError) -> Self {
        match err {
            ConfigError::NoCredentials { profile } => CliError::NoCredentials { profile },
            ConfigError::Validation { field, reason } => CliError::Validation { field, reason },
            other => CliError::Config(other),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn not_found_points_at_list_command() {
        let err: CliError = CoreError::not_found("security group", "/nsg/x").into();
        assert_eq!(err.exit_code(), exit_code::NOT_FOUND);
        match err {
            CliError::NotFound { list_command, .. } => assert_eq!(list_command, "secgroups list"),
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn request_keeps_operation_and_arm_code() {
        let err: CliError = CoreError::Request {
            operation: "create vm".into(),
            target: "web".into(),
            source: armlink_api::Error::Arm {
                status: 400,
                code: Some("NicInUse".into()),
                message: "in use".into(),
                body: r#"{"error":{"code":"NicInUse"}}"#.into(),
            },
        }
        .into();
        match err {
            CliError::ApiError { message, code } => {
                assert!(message.starts_with("create vm web: "));
                assert_eq!(code.as_deref(), Some("NicInUse"));
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn expired_token_is_an_auth_failure() {
        let err: CliError = CoreError::Request {
            operation: "list vpcs".into(),
            target: "eastus".into(),
            source: armlink_api::Error::InvalidToken,
        }
        .into();
        assert_eq!(err.exit_code(), exit_code::AUTH);
    }

    #[test]
    fn capability_gaps_share_an_exit_code() {
        let unsupported: CliError = CoreError::NotSupported {
            operation: "delete classic vpc".into(),
        }
        .into();
        let missing: CliError = CoreError::NotImplemented {
            operation: "create classic subnet".into(),
        }
        .into();
        assert_eq!(unsupported.exit_code(), exit_code::UNSUPPORTED);
        assert_eq!(missing.exit_code(), exit_code::UNSUPPORTED);
    }
}
