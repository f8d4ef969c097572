// Envelope, error, and subscription-level shapes shared by every provider.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// Reference to another ARM resource by id (`{"id": "..."}`).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubResource {
    #[serde(default, alias = "Id", alias = "ID")]
    pub id: String,
}

impl SubResource {
    pub fn new(id: impl Into<String>) -> Self {
        Self { id: id.into() }
    }
}

/// Paginated list envelope: `{"value": [...], "nextLink": "..."}`.
#[derive(Debug, Clone, Deserialize)]
pub struct Page<T> {
    #[serde(default = "Vec::new")]
    pub value: Vec<T>,
    #[serde(default, rename = "nextLink")]
    pub next_link: Option<String>,
}

// ── Error documents ─────────────────────────────────────────────────

/// ARM error document. Most providers nest under `error`; a few legacy
/// endpoints return `code`/`message` at the top level.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ErrorResponse {
    #[serde(default)]
    pub error: Option<ErrorBody>,
    #[serde(default, alias = "Code")]
    pub code: Option<String>,
    #[serde(default, alias = "Message")]
    pub message: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ErrorBody {
    #[serde(default)]
    pub code: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub details: Vec<ErrorDetail>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ErrorDetail {
    #[serde(default)]
    pub code: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub target: Option<String>,
}

impl ErrorResponse {
    /// The most specific code available.
    pub fn code(&self) -> Option<&str> {
        self.error
            .as_ref()
            .and_then(|e| e.code.as_deref())
            .or(self.code.as_deref())
    }

    pub fn message(&self) -> Option<&str> {
        self.error
            .as_ref()
            .and_then(|e| e.message.as_deref())
            .or(self.message.as_deref())
    }
}

// ── Subscription-level resources ────────────────────────────────────

/// An Azure location, from `GET /subscriptions/{sub}/locations`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Location {
    #[serde(default)]
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub display_name: String,
    #[serde(default)]
    pub latitude: Option<String>,
    #[serde(default)]
    pub longitude: Option<String>,
}

/// A resource group (the "project" of every resource under it).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ResourceGroup {
    #[serde(default)]
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub location: String,
    #[serde(default)]
    pub tags: Option<HashMap<String, String>>,
    #[serde(default)]
    pub properties: ResourceGroupProperties,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResourceGroupProperties {
    #[serde(default)]
    pub provisioning_state: String,
}

// ── Tags ────────────────────────────────────────────────────────────

/// Body of `/{id}/providers/Microsoft.Resources/tags/default`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TagsResource {
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub operation: String,
    #[serde(default)]
    pub properties: TagProperties,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TagProperties {
    #[serde(default)]
    pub tags: HashMap<String, String>,
}

/// Result of a `checkNameAvailability` probe.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NameAvailability {
    #[serde(default)]
    pub name_available: bool,
    #[serde(default)]
    pub reason: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn error_response_prefers_nested_code() {
        let raw = r#"{"error":{"code":"NicInUse","message":"in use","details":[{"code":"X","target":"nic"}]}}"#;
        let parsed: ErrorResponse = serde_json::from_str(raw).unwrap();
        assert_eq!(parsed.code(), Some("NicInUse"));
        assert_eq!(parsed.message(), Some("in use"));
        let body = parsed.error.unwrap();
        assert_eq!(body.details[0].target.as_deref(), Some("nic"));
    }

    #[test]
    fn error_response_top_level_shape() {
        let raw = r#"{"Code":"NotFound","Message":"gone"}"#;
        let parsed: ErrorResponse = serde_json::from_str(raw).unwrap();
        assert_eq!(parsed.code(), Some("NotFound"));
    }

    #[test]
    fn page_without_next_link() {
        let page: Page<Location> =
            serde_json::from_str(r#"{"value":[{"name":"eastus","displayName":"East US"}]}"#)
                .unwrap();
        assert_eq!(page.value.len(), 1);
        assert!(page.next_link.is_none());
        assert_eq!(page.value[0].display_name, "East US");
    }
}
