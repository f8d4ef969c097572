// ── Runtime account configuration ──
//
// Describes *which* Azure account to talk to and how. Carries the bearer
// token and transport tuning, but never touches disk. The CLI builds an
// `AccountConfig` from its profile and hands it in.

use armlink_api::{CloudEnvironment, PollConfig, TransportConfig};
use secrecy::SecretString;

/// Login user written into new VMs when the caller does not name one.
pub const DEFAULT_LOGIN_USER: &str = "azureuser";

/// Configuration for one Azure subscription.
#[derive(Debug, Clone)]
pub struct AccountConfig {
    /// Which Azure cloud the subscription lives in.
    pub environment: CloudEnvironment,
    /// Resource Manager endpoint override (sovereign clouds, tests).
    pub endpoint: Option<String>,
    pub subscription_id: String,
    pub tenant_id: Option<String>,
    /// Pre-acquired ARM bearer token.
    pub token: SecretString,
    /// Admin user for VMs created through this account.
    pub default_login_user: String,
    pub transport: TransportConfig,
    pub poll: PollConfig,
}

impl AccountConfig {
    pub fn new(subscription_id: impl Into<String>, token: SecretString) -> Self {
        Self {
            environment: CloudEnvironment::default(),
            endpoint: None,
            subscription_id: subscription_id.into(),
            tenant_id: None,
            token,
            default_login_user: DEFAULT_LOGIN_USER.into(),
            transport: TransportConfig::default(),
            poll: PollConfig::default(),
        }
    }

    /// The endpoint requests go to: the override, else the cloud default.
    pub fn resource_manager_endpoint(&self) -> &str {
        self.endpoint
            .as_deref()
            .unwrap_or_else(|| self.environment.resource_manager_endpoint())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn endpoint_override_wins() {
        let mut cfg = AccountConfig::new("sub", SecretString::from("t"));
        cfg.environment = CloudEnvironment::China;
        assert_eq!(
            cfg.resource_manager_endpoint(),
            "https://management.chinacloudapi.cn/"
        );
        cfg.endpoint = Some("http://127.0.0.1:9000".into());
        assert_eq!(cfg.resource_manager_endpoint(), "http://127.0.0.1:9000");
    }
}
