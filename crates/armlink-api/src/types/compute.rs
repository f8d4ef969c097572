// Microsoft.Compute payloads: virtual machines, sizes, and images.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::common::SubResource;

// ── Virtual machines ────────────────────────────────────────────────

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct VirtualMachine {
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default, rename = "type")]
    pub resource_type: String,
    #[serde(default)]
    pub location: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tags: Option<HashMap<String, String>>,
    #[serde(default)]
    pub properties: VirtualMachineProperties,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VirtualMachineProperties {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hardware_profile: Option<HardwareProfile>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub storage_profile: Option<StorageProfile>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub os_profile: Option<OsProfile>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub network_profile: Option<NetworkProfile>,
    #[serde(default, skip_serializing)]
    pub instance_view: Option<InstanceView>,
    #[serde(default, skip_serializing)]
    pub provisioning_state: String,
    #[serde(default, skip_serializing)]
    pub vm_id: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HardwareProfile {
    pub vm_size: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StorageProfile {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_reference: Option<ImageReference>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub os_disk: Option<OsDisk>,
    #[serde(default)]
    pub data_disks: Vec<DataDisk>,
}

/// Either a private image (`id`) or a marketplace coordinate.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageReference {
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub id: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub publisher: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub offer: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub sku: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub version: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OsDisk {
    #[serde(default)]
    pub name: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub os_type: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub caching: String,
    #[serde(default)]
    pub create_option: String,
    #[serde(
        default,
        rename = "diskSizeGB",
        skip_serializing_if = "Option::is_none"
    )]
    pub disk_size_gb: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub managed_disk: Option<ManagedDisk>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DataDisk {
    #[serde(default)]
    pub name: String,
    pub lun: u32,
    #[serde(
        default,
        rename = "diskSizeGB",
        skip_serializing_if = "Option::is_none"
    )]
    pub disk_size_gb: Option<u32>,
    #[serde(default)]
    pub create_option: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub managed_disk: Option<ManagedDisk>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ManagedDisk {
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub id: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub storage_account_type: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OsProfile {
    #[serde(default)]
    pub computer_name: String,
    #[serde(default)]
    pub admin_username: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub admin_password: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub custom_data: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub linux_configuration: Option<LinuxConfiguration>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LinuxConfiguration {
    #[serde(default)]
    pub disable_password_authentication: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ssh: Option<SshConfiguration>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SshConfiguration {
    #[serde(default)]
    pub public_keys: Vec<SshPublicKey>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SshPublicKey {
    pub path: String,
    pub key_data: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NetworkProfile {
    #[serde(default)]
    pub network_interfaces: Vec<NetworkInterfaceReference>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NetworkInterfaceReference {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub properties: Option<NetworkInterfaceReferenceProperties>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NetworkInterfaceReferenceProperties {
    #[serde(default)]
    pub primary: bool,
}

impl From<SubResource> for NetworkInterfaceReference {
    fn from(value: SubResource) -> Self {
        Self {
            id: value.id,
            properties: None,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct InstanceView {
    #[serde(default)]
    pub statuses: Vec<InstanceViewStatus>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InstanceViewStatus {
    #[serde(default)]
    pub code: String,
    #[serde(default)]
    pub level: String,
    #[serde(default)]
    pub display_status: String,
    #[serde(default)]
    pub message: Option<String>,
}

impl InstanceView {
    /// The `PowerState/<state>` suffix, if reported.
    pub fn power_state(&self) -> Option<&str> {
        self.statuses
            .iter()
            .find_map(|s| s.code.strip_prefix("PowerState/"))
    }
}

// ── Sizes ───────────────────────────────────────────────────────────

/// One entry of `locations/{loc}/vmSizes`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VmSize {
    pub name: String,
    #[serde(default)]
    pub number_of_cores: u32,
    #[serde(default, rename = "memoryInMB")]
    pub memory_in_mb: u64,
    #[serde(default, rename = "osDiskSizeInMB")]
    pub os_disk_size_in_mb: u64,
    #[serde(default, rename = "resourceDiskSizeInMB")]
    pub resource_disk_size_in_mb: u64,
    #[serde(default)]
    pub max_data_disk_count: u32,
}

// ── Images ──────────────────────────────────────────────────────────

/// A private (`Microsoft.Compute/images`) image.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Image {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub location: String,
    #[serde(default)]
    pub tags: Option<HashMap<String, String>>,
    #[serde(default)]
    pub properties: ImageProperties,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageProperties {
    #[serde(default)]
    pub provisioning_state: String,
    #[serde(default)]
    pub storage_profile: Option<ImageStorageProfile>,
    #[serde(default)]
    pub hyper_v_generation: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageStorageProfile {
    #[serde(default)]
    pub os_disk: Option<ImageOsDisk>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageOsDisk {
    #[serde(default)]
    pub os_type: String,
    #[serde(default)]
    pub os_state: String,
    #[serde(default, rename = "diskSizeGB")]
    pub disk_size_gb: Option<u32>,
}

/// A marketplace image version under `publishers/{p}/artifacttypes/vmimage`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct VmImageVersion {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub location: String,
    #[serde(default)]
    pub properties: VmImageVersionProperties,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VmImageVersionProperties {
    #[serde(default)]
    pub os_disk_image: Option<OsDiskImage>,
    #[serde(default)]
    pub hyper_v_generation: Option<String>,
    #[serde(flatten)]
    pub extra: HashMap<String, Value>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OsDiskImage {
    #[serde(default)]
    pub operating_system: String,
    #[serde(default)]
    pub size_in_gb: Option<u32>,
}

/// Bare `{id, name, location}` entry returned by publisher/offer/sku listings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ImageArtifact {
    #[serde(default)]
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub location: String,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn power_state_is_read_from_instance_view() {
        let vm: VirtualMachine = serde_json::from_value(json!({
            "name": "vm1",
            "properties": {
                "provisioningState": "Succeeded",
                "instanceView": {"statuses": [
                    {"code": "ProvisioningState/succeeded"},
                    {"code": "PowerState/deallocated", "displayStatus": "VM deallocated"}
                ]}
            }
        }))
        .unwrap();
        let view = vm.properties.instance_view.unwrap();
        assert_eq!(view.power_state(), Some("deallocated"));
    }

    #[test]
    fn create_payload_omits_read_only_fields() {
        let vm = VirtualMachine {
            name: "vm1".into(),
            resource_type: "Microsoft.Compute/virtualMachines".into(),
            location: "eastus".into(),
            properties: VirtualMachineProperties {
                hardware_profile: Some(HardwareProfile {
                    vm_size: "Standard_B1s".into(),
                }),
                provisioning_state: "Creating".into(),
                ..Default::default()
            },
            ..Default::default()
        };
        let out = serde_json::to_value(&vm).unwrap();
        assert_eq!(out["properties"]["hardwareProfile"]["vmSize"], "Standard_B1s");
        assert!(out["properties"].get("provisioningState").is_none());
        assert!(out["properties"].get("instanceView").is_none());
    }

    #[test]
    fn vm_size_field_casing() {
        let size: VmSize = serde_json::from_value(json!({
            "name": "Standard_D2s_v3",
            "numberOfCores": 2,
            "memoryInMB": 8192,
            "maxDataDiskCount": 4
        }))
        .unwrap();
        assert_eq!(size.number_of_cores, 2);
        assert_eq!(size.memory_in_mb, 8192);
    }
}
