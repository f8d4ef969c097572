// ── Core error types ──
//
// Errors surfaced by the projection and facade layers. ARM failures are
// wrapped with the operation and target that produced them, but a 404 stays
// a `NotFound` so callers can still tell "missing" from "broken".

use thiserror::Error;

/// Unified error type for the core crate.
#[derive(Debug, Error)]
pub enum CoreError {
    // ── Lookup ───────────────────────────────────────────────────────
    #[error("{entity_type} not found: {identifier}")]
    NotFound {
        entity_type: String,
        identifier: String,
    },

    // ── Capability gaps ──────────────────────────────────────────────
    /// ARM has no way to express the operation.
    #[error("Operation not supported: {operation}")]
    NotSupported { operation: String },

    /// The operation is expressible but deliberately left out.
    #[error("Operation not implemented: {operation}")]
    NotImplemented { operation: String },

    // ── ARM failures ─────────────────────────────────────────────────
    /// A request failed; the source keeps the raw ARM body.
    #[error("{operation} {target}: {source}")]
    Request {
        operation: String,
        target: String,
        #[source]
        source: armlink_api::Error,
    },

    #[error("API error: {message}")]
    Api {
        message: String,
        code: Option<String>,
        status: Option<u16>,
    },

    // ── Provisioning ─────────────────────────────────────────────────
    #[error("No instance type available for {cpu} vCPU / {memory_mb} MB")]
    InstanceTypeUnavailable { cpu: u32, memory_mb: u64 },

    #[error("Image {image_id} is not available (state: {state})")]
    ImageUnavailable { image_id: String, state: String },

    #[error("Invalid input: {message}")]
    InvalidInput { message: String },

    // ── Configuration ────────────────────────────────────────────────
    #[error("Configuration error: {message}")]
    Config { message: String },

    // ── Internal ─────────────────────────────────────────────────────
    #[error("Internal error: {0}")]
    Internal(String),
}

impl CoreError {
    /// Wrap an ARM error with operation context, keeping 404s as `NotFound`.
    pub fn request(
        operation: impl Into<String>,
        target: impl Into<String>,
        source: armlink_api::Error,
    ) -> Self {
        let target = target.into();
        if source.is_not_found() {
            return Self::NotFound {
                entity_type: "resource".into(),
                identifier: target,
            };
        }
        if matches!(source, armlink_api::Error::ReservedTagKey { .. }) {
            return source.into();
        }
        Self::Request {
            operation: operation.into(),
            target,
            source,
        }
    }

    pub fn not_found(entity_type: impl Into<String>, identifier: impl Into<String>) -> Self {
        Self::NotFound {
            entity_type: entity_type.into(),
            identifier: identifier.into(),
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    /// Returns `true` if the underlying ARM error carries `"code":"<code>"`.
    pub fn has_arm_code(&self, code: &str) -> bool {
        match self {
            Self::Request { source, .. } => source.has_arm_code(code),
            Self::Api { code: Some(c), .. } => c == code,
            _ => false,
        }
    }
}

// ── Conversion from transport-layer errors ───────────────────────────

impl From<armlink_api::Error> for CoreError {
    fn from(err: armlink_api::Error) -> Self {
        match err {
            armlink_api::Error::NotFound { resource, .. } => CoreError::NotFound {
                entity_type: "resource".into(),
                identifier: resource,
            },
            armlink_api::Error::InvalidToken => CoreError::Config {
                message: "bearer token rejected by Azure Resource Manager".into(),
            },
            armlink_api::Error::Authentication { message } => CoreError::Config { message },
            armlink_api::Error::InvalidUrl(e) => CoreError::Config {
                message: format!("Invalid URL: {e}"),
            },
            armlink_api::Error::Tls(msg) => CoreError::Config {
                message: format!("TLS error: {msg}"),
            },
            armlink_api::Error::InvalidRequest { message } => CoreError::InvalidInput { message },
            armlink_api::Error::ReservedTagKey { key } => CoreError::InvalidInput {
                message: format!("tag key '{key}' uses a reserved prefix"),
            },
            armlink_api::Error::Deserialization { message, body: _ } => {
                CoreError::Internal(format!("Deserialization error: {message}"))
            }
            other @ (armlink_api::Error::Transport(_)
            | armlink_api::Error::Timeout { .. }
            | armlink_api::Error::Arm { .. }
            | armlink_api::Error::OperationFailed { .. }) => CoreError::Request {
                operation: "request".into(),
                target: String::new(),
                source: other,
            },
        }
    }
}
