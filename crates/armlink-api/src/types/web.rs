// Microsoft.Web payloads: server farms, sites, slots, backups, certificates.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

// ── Server farms ────────────────────────────────────────────────────

/// An App Service plan (`Microsoft.Web/serverFarms`).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppServicePlan {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub kind: String,
    #[serde(default)]
    pub location: String,
    #[serde(default)]
    pub tags: Option<HashMap<String, String>>,
    #[serde(default)]
    pub sku: Option<SkuDescription>,
    #[serde(default)]
    pub properties: AppServicePlanProperties,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppServicePlanProperties {
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub geo_region: String,
    #[serde(default)]
    pub number_of_sites: u32,
    #[serde(default)]
    pub number_of_workers: Option<u32>,
    #[serde(default)]
    pub maximum_number_of_workers: Option<u32>,
    #[serde(default)]
    pub resource_group: String,
    #[serde(default)]
    pub reserved: bool,
    #[serde(default)]
    pub provisioning_state: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SkuDescription {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub tier: String,
    #[serde(default)]
    pub size: String,
    #[serde(default)]
    pub family: String,
    #[serde(default)]
    pub capacity: Option<u32>,
}

// ── Sites and slots ─────────────────────────────────────────────────

/// A web app or one of its deployment slots.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Site {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub kind: String,
    #[serde(default, rename = "type")]
    pub resource_type: String,
    #[serde(default)]
    pub location: String,
    #[serde(default)]
    pub tags: Option<HashMap<String, String>>,
    #[serde(default)]
    pub properties: Option<SiteProperties>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SiteProperties {
    #[serde(default)]
    pub state: String,
    #[serde(default)]
    pub enabled: Option<bool>,
    #[serde(default)]
    pub default_host_name: String,
    #[serde(default)]
    pub host_names: Vec<String>,
    #[serde(default)]
    pub host_name_ssl_states: Vec<HostNameSslState>,
    #[serde(default)]
    pub server_farm_id: String,
    #[serde(default)]
    pub public_network_access: Option<String>,
    #[serde(default)]
    pub virtual_network_subnet_id: Option<String>,
    #[serde(default)]
    pub outbound_ip_addresses: Option<String>,
    #[serde(default)]
    pub possible_outbound_ip_addresses: Option<String>,
    #[serde(default)]
    pub private_endpoint_connections: Vec<PrivateEndpointConnection>,
    #[serde(flatten)]
    pub extra: HashMap<String, Value>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HostNameSslState {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub ssl_state: String,
    #[serde(default)]
    pub host_type: String,
    #[serde(default)]
    pub thumbprint: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PrivateEndpointConnection {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub properties: PrivateEndpointConnectionProperties,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PrivateEndpointConnectionProperties {
    #[serde(default)]
    pub ip_addresses: Vec<String>,
}

// ── Configuration ───────────────────────────────────────────────────

/// One entry of `<site>/config` (normally just `web`).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SiteConfigResource {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub properties: SiteConfig,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SiteConfig {
    #[serde(default)]
    pub linux_fx_version: Option<String>,
    #[serde(default)]
    pub windows_fx_version: Option<String>,
    #[serde(default)]
    pub net_framework_version: Option<String>,
    #[serde(default)]
    pub php_version: Option<String>,
    #[serde(default)]
    pub python_version: Option<String>,
    #[serde(default)]
    pub node_version: Option<String>,
    #[serde(default)]
    pub power_shell_version: Option<String>,
    #[serde(default)]
    pub java_version: Option<String>,
}

/// Response of `POST <site>/config/metadata/list`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SiteMetadata {
    #[serde(default)]
    pub properties: SiteMetadataProperties,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct SiteMetadataProperties {
    #[serde(
        default,
        rename = "CURRENT_STACK",
        alias = "currentStack",
        alias = "CurrentStack"
    )]
    pub current_stack: Option<String>,
}

/// Response of `POST <site>/config/backup/list`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BackupRequest {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub properties: BackupRequestProperties,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BackupRequestProperties {
    #[serde(default)]
    pub backup_name: Option<String>,
    #[serde(default)]
    pub enabled: Option<bool>,
    #[serde(default)]
    pub storage_account_url: Option<String>,
    #[serde(default)]
    pub backup_schedule: Option<BackupSchedule>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BackupSchedule {
    #[serde(default)]
    pub frequency_interval: u32,
    #[serde(default)]
    pub frequency_unit: String,
    #[serde(default)]
    pub keep_at_least_one_backup: bool,
    #[serde(default)]
    pub retention_period_in_days: u32,
    #[serde(default)]
    pub start_time: Option<String>,
}

// ── Backups and snapshots ───────────────────────────────────────────

/// A manual backup (`<site>/backups`) or automatic snapshot
/// (`<site>/snapshots`); both share the ARM envelope.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BackupItem {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default, rename = "type")]
    pub resource_type: String,
    #[serde(default)]
    pub location: String,
    #[serde(default)]
    pub properties: BackupItemProperties,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BackupItemProperties {
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub blob_name: Option<String>,
    #[serde(default)]
    pub storage_account_url: Option<String>,
    #[serde(default)]
    pub size_in_bytes: Option<u64>,
    #[serde(default)]
    pub created: Option<String>,
    /// Snapshots report their timestamp here instead of `created`.
    #[serde(default)]
    pub time: Option<String>,
    #[serde(default)]
    pub scheduled: Option<bool>,
}

// ── Certificates ────────────────────────────────────────────────────

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Certificate {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub location: String,
    #[serde(default)]
    pub tags: Option<HashMap<String, String>>,
    #[serde(default)]
    pub properties: CertificateProperties,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CertificateProperties {
    #[serde(default)]
    pub friendly_name: String,
    #[serde(default)]
    pub subject_name: String,
    #[serde(default)]
    pub host_names: Vec<String>,
    #[serde(default)]
    pub issuer: String,
    #[serde(default)]
    pub issue_date: Option<String>,
    #[serde(default)]
    pub expiration_date: Option<String>,
    #[serde(default)]
    pub thumbprint: String,
    #[serde(default)]
    pub server_farm_id: Option<String>,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn metadata_accepts_stack_key_variants() {
        for key in ["CURRENT_STACK", "currentStack", "CurrentStack"] {
            let meta: SiteMetadata =
                serde_json::from_value(json!({"properties": {key: "python"}})).unwrap();
            assert_eq!(meta.properties.current_stack.as_deref(), Some("python"));
        }
    }

    #[test]
    fn site_without_properties() {
        let site: Site = serde_json::from_value(json!({"name": "app", "kind": "app"})).unwrap();
        assert!(site.properties.is_none());
    }

    #[test]
    fn plan_sku_is_optional() {
        let plan: AppServicePlan = serde_json::from_value(json!({
            "id": "/subscriptions/s/resourceGroups/rg/providers/Microsoft.Web/serverFarms/p1",
            "name": "p1",
            "properties": {"numberOfSites": 3}
        }))
        .unwrap();
        assert!(plan.sku.is_none());
        assert_eq!(plan.properties.number_of_sites, 3);
    }
}
