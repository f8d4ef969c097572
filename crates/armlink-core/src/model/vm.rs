// ── Virtual machine domain types ──

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// Guest operating system family.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString,
)]
#[strum(ascii_case_insensitive)]
pub enum OsType {
    #[default]
    Linux,
    Windows,
}

/// Provider-agnostic VM status, mapped from `PowerState/*` codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
#[non_exhaustive]
pub enum VmStatus {
    Running,
    /// Stopped or deallocated.
    Ready,
    Starting,
    Stopping,
    Deleting,
    Unknown,
}

/// A managed disk request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiskConfig {
    /// Managed disk account type, e.g. `Standard_LRS` or `Premium_LRS`.
    pub storage_type: String,
    pub size_gb: u32,
}

impl DiskConfig {
    pub fn new(storage_type: impl Into<String>, size_gb: u32) -> Self {
        Self {
            storage_type: storage_type.into(),
            size_gb,
        }
    }
}

/// Everything needed to create a VM on the emulated host.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VmCreateConfig {
    pub name: String,
    /// Guest hostname; sanitized into the ARM `computerName`.
    pub hostname: String,
    pub image_id: String,
    /// Explicit VM size. When absent every size matching `cpu`/`memory_mb`
    /// is tried in turn.
    #[serde(default)]
    pub instance_type: Option<String>,
    pub cpu: u32,
    pub memory_mb: u64,
    pub sys_disk: DiskConfig,
    #[serde(default)]
    pub data_disks: Vec<DiskConfig>,
    /// Subnet the NIC is placed on.
    pub network_id: String,
    /// Static private IP; dynamic allocation when absent.
    #[serde(default)]
    pub ip_addr: Option<String>,
    #[serde(default)]
    pub password: Option<String>,
    #[serde(default)]
    pub public_key: Option<String>,
    #[serde(default)]
    pub user_data: Option<String>,
    #[serde(default)]
    pub security_group_ids: Vec<String>,
    /// Target resource group; `Default` when absent.
    #[serde(default)]
    pub resource_group: Option<String>,
    #[serde(default)]
    pub tags: HashMap<String, String>,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn os_type_parses_case_insensitively() {
        assert_eq!("windows".parse::<OsType>().unwrap(), OsType::Windows);
        assert_eq!("LINUX".parse::<OsType>().unwrap(), OsType::Linux);
        assert_eq!(OsType::Windows.to_string(), "Windows");
    }

    #[test]
    fn status_renders_snake_case() {
        assert_eq!(VmStatus::Ready.to_string(), "ready");
        assert_eq!(
            serde_json::to_string(&VmStatus::Stopping).unwrap(),
            "\"stopping\""
        );
    }
}
