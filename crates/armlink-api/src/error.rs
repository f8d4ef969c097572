use thiserror::Error;

/// Top-level error type for the `armlink-api` crate.
///
/// Covers every failure mode of the ARM surface: authentication, transport,
/// structured ARM error documents, and decoding. `armlink-core` maps these
/// into domain-level errors with operation context.
#[derive(Debug, Error)]
pub enum Error {
    // ── Authentication ──────────────────────────────────────────────
    /// Bearer token rejected by ARM (HTTP 401).
    #[error("Invalid or expired bearer token")]
    InvalidToken,

    /// Token could not be turned into a request header.
    #[error("Authentication failed: {message}")]
    Authentication { message: String },

    // ── Transport ───────────────────────────────────────────────────
    /// HTTP transport error (connection refused, DNS failure, etc.)
    #[error("HTTP transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// URL parsing error.
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// Long-running operation did not settle before the poll deadline.
    #[error("Timed out after {timeout_secs}s waiting for {operation}")]
    Timeout { operation: String, timeout_secs: u64 },

    /// TLS configuration or certificate error.
    #[error("TLS error: {0}")]
    Tls(String),

    // ── ARM ─────────────────────────────────────────────────────────
    /// ARM returned 404 for the requested resource.
    #[error("Resource not found: {resource}")]
    NotFound { resource: String, body: String },

    /// Structured ARM error document. The raw body is kept verbatim in the
    /// message so callers can match on `"code":"<Code>"` fragments.
    #[error("ARM request failed (HTTP {status}): {body}")]
    Arm {
        status: u16,
        code: Option<String>,
        message: String,
        body: String,
    },

    /// An asynchronous ARM operation reported `Failed`.
    #[error("Operation {operation} failed: {message}")]
    OperationFailed { operation: String, message: String },

    // ── Request shape ───────────────────────────────────────────────
    /// The caller supplied a body or path ARM cannot accept.
    #[error("Invalid request: {message}")]
    InvalidRequest { message: String },

    /// Tag keys with a reserved prefix cannot be written.
    #[error("Tag key '{key}' uses a reserved prefix (microsoft, azure, windows)")]
    ReservedTagKey { key: String },

    // ── Data ────────────────────────────────────────────────────────
    /// JSON deserialization failed, with the raw body for debugging.
    #[error("Deserialization error: {message}")]
    Deserialization { message: String, body: String },
}

impl Error {
    /// Returns `true` if this is a transient error worth retrying.
    pub fn is_transient(&self) -> bool {
        match self {
            Self::Transport(e) => e.is_timeout() || e.is_connect(),
            Self::Timeout { .. } => true,
            Self::Arm { status, .. } => *status == 429 || *status >= 500,
            _ => false,
        }
    }

    /// Returns `true` if ARM reported the resource as missing.
    pub fn is_not_found(&self) -> bool {
        match self {
            Self::NotFound { .. } => true,
            Self::Transport(e) => e.status() == Some(reqwest::StatusCode::NOT_FOUND),
            _ => false,
        }
    }

    /// Extract the ARM error code, if available.
    pub fn api_error_code(&self) -> Option<&str> {
        match self {
            Self::Arm { code, .. } => code.as_deref(),
            _ => None,
        }
    }

    /// Returns `true` if the rendered error carries `"code":"<code>"`.
    ///
    /// Matches the top-level code as well as any nested detail code, since the
    /// raw body is part of the message.
    pub fn has_arm_code(&self, code: &str) -> bool {
        if self.api_error_code() == Some(code) {
            return true;
        }
        let needle = format!("\"code\":\"{code}\"");
        self.to_string().replace(": \"", ":\"").contains(&needle)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn arm_error_message_keeps_raw_body() {
        let body = r#"{"error":{"code":"NicInUse","message":"nic is attached"}}"#;
        let err = Error::Arm {
            status: 400,
            code: Some("NicInUse".into()),
            message: "nic is attached".into(),
            body: body.into(),
        };
        assert!(err.to_string().contains(r#""code":"NicInUse""#));
        assert!(err.has_arm_code("NicInUse"));
        assert!(!err.has_arm_code("InvalidParameter"));
    }

    #[test]
    fn nested_detail_code_is_matched() {
        let body = r#"{"error":{"code":"BadRequest","details":[{"code": "InvalidParameter"}]}}"#;
        let err = Error::Arm {
            status: 400,
            code: Some("BadRequest".into()),
            message: String::new(),
            body: body.into(),
        };
        assert!(err.has_arm_code("InvalidParameter"));
    }

    #[test]
    fn transient_classification() {
        let throttled = Error::Arm {
            status: 429,
            code: None,
            message: String::new(),
            body: String::new(),
        };
        assert!(throttled.is_transient());
        assert!(!Error::InvalidToken.is_transient());
        assert!(
            Error::NotFound {
                resource: "x".into(),
                body: String::new()
            }
            .is_not_found()
        );
    }
}
