// ── VM provisioning ──
//
// Creating a VM is a NIC PUT followed by one VM PUT per candidate size. The
// NIC exists before anything can fail in the VM step, so every failure after
// it is created removes it again before the error is returned.

use armlink_api::types::{
    DataDisk, HardwareProfile, ImageReference, LinuxConfiguration, ManagedDisk, NetworkInterface,
    NetworkInterfaceReference, NetworkProfile, OsDisk, OsProfile, SshConfiguration, SshPublicKey,
    StorageProfile, VirtualMachine, VirtualMachineProperties,
};
use rand::Rng;
use rand::seq::SliceRandom;
use tracing::{info, warn};

use crate::cloud::{Image, ImageKind, Instance, parse_marketplace_id};
use crate::error::CoreError;
use crate::model::{OsType, VmCreateConfig};
use crate::naming;
use crate::region::Region;
use crate::registry::{NicRequest, VM_TYPE};

const PASSWORD_LEN: usize = 12;
const LOWER: &[u8] = b"abcdefghijklmnopqrstuvwxyz";
const UPPER: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ";
const DIGITS: &[u8] = b"0123456789";

/// ARM codes that no other VM size can fix.
const FATAL_CODES: [&str; 2] = ["InvalidParameter", "NicInUse"];

/// Random password with at least one lowercase, uppercase and digit.
pub fn generate_password() -> String {
    let mut rng = rand::thread_rng();
    let mut pick = |set: &[u8]| char::from(set[rng.gen_range(0..set.len())]);
    let mut chars = vec![pick(LOWER), pick(UPPER), pick(DIGITS)];
    let all: Vec<u8> = [LOWER, UPPER, DIGITS].concat();
    while chars.len() < PASSWORD_LEN {
        chars.push(pick(&all));
    }
    chars.shuffle(&mut rng);
    chars.into_iter().collect()
}

fn os_disk_name(vm_name: &str) -> String {
    let nanos = chrono::Utc::now().timestamp_nanos_opt().unwrap_or_default();
    format!("vdisk_{vm_name}_{nanos}")
}

fn nonempty(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.trim().is_empty())
}

fn image_reference(image: &Image) -> ImageReference {
    match (image.kind, parse_marketplace_id(&image.id)) {
        (ImageKind::Marketplace, Some([publisher, offer, sku, version])) => ImageReference {
            publisher: publisher.to_owned(),
            offer: offer.to_owned(),
            sku: sku.to_owned(),
            version: version.to_owned(),
            ..Default::default()
        },
        _ => ImageReference {
            id: image.id.clone(),
            ..Default::default()
        },
    }
}

fn os_profile(config: &VmCreateConfig, os_type: OsType, user: &str, password: String) -> OsProfile {
    let hostname = if config.hostname.is_empty() {
        &config.name
    } else {
        &config.hostname
    };
    let linux_configuration = match nonempty(config.public_key.as_deref()) {
        Some(key) if os_type == OsType::Linux => Some(LinuxConfiguration {
            disable_password_authentication: false,
            ssh: Some(SshConfiguration {
                public_keys: vec![SshPublicKey {
                    path: format!("/home/{user}/.ssh/authorized_keys"),
                    key_data: key.to_owned(),
                }],
            }),
        }),
        _ => None,
    };
    OsProfile {
        computer_name: naming::computer_name(hostname),
        admin_username: user.to_owned(),
        admin_password: Some(password),
        custom_data: nonempty(config.user_data.as_deref()).map(str::to_owned),
        linux_configuration,
    }
}

fn storage_profile(config: &VmCreateConfig, image: &Image) -> StorageProfile {
    let managed = |storage_type: &str| {
        Some(ManagedDisk {
            storage_account_type: storage_type.to_owned(),
            ..Default::default()
        })
    };
    let disk_name = os_disk_name(&config.name);
    StorageProfile {
        image_reference: Some(image_reference(image)),
        os_disk: Some(OsDisk {
            name: disk_name.clone(),
            os_type: image.os_type.to_string(),
            caching: "ReadWrite".into(),
            create_option: "FromImage".into(),
            disk_size_gb: Some(config.sys_disk.size_gb).filter(|s| *s > 0),
            managed_disk: managed(&config.sys_disk.storage_type),
        }),
        data_disks: config
            .data_disks
            .iter()
            .zip(0u32..)
            .map(|(disk, lun)| DataDisk {
                name: format!("{disk_name}_{lun}"),
                lun,
                disk_size_gb: Some(disk.size_gb),
                create_option: "Empty".into(),
                managed_disk: managed(&disk.storage_type),
            })
            .collect(),
    }
}

/// The VM document minus its hardware profile.
pub(crate) fn vm_document(
    config: &VmCreateConfig,
    image: &Image,
    nic: &NetworkInterface,
    login_user: &str,
    password: String,
) -> VirtualMachine {
    VirtualMachine {
        name: config.name.clone(),
        resource_type: VM_TYPE.to_owned(),
        tags: Some(config.tags.clone()).filter(|t| !t.is_empty()),
        properties: VirtualMachineProperties {
            storage_profile: Some(storage_profile(config, image)),
            os_profile: Some(os_profile(config, image.os_type, login_user, password)),
            network_profile: Some(NetworkProfile {
                network_interfaces: vec![NetworkInterfaceReference {
                    id: nic.id.clone(),
                    properties: None,
                }],
            }),
            ..Default::default()
        },
        ..Default::default()
    }
}

/// Create a VM on the region's host.
pub(crate) async fn create_vm(region: &Region, config: &VmCreateConfig) -> Result<Instance, CoreError> {
    let group = config.resource_group.as_deref().unwrap_or_default();
    let nic_name = format!("{}-ipconfig", config.name);
    let nic = region
        .create_network_interface(&NicRequest {
            name: &nic_name,
            subnet_id: &config.network_id,
            private_ip: config.ip_addr.as_deref(),
            security_group_id: config.security_group_ids.first().map(String::as_str),
            resource_group: group,
        })
        .await?;

    match create_on_nic(region, config, group, &nic).await {
        Ok(instance) => Ok(instance),
        Err(e) => {
            if let Err(cleanup) = region.delete_network_interface(&nic.id).await {
                warn!(nic = %nic.id, error = %cleanup, "failed to remove network interface");
            }
            Err(e)
        }
    }
}

async fn create_on_nic(
    region: &Region,
    config: &VmCreateConfig,
    group: &str,
    nic: &NetworkInterface,
) -> Result<Instance, CoreError> {
    let image = region.get_image(&config.image_id).await?;
    if !image.is_available() {
        return Err(CoreError::ImageUnavailable {
            image_id: config.image_id.clone(),
            state: image.state,
        });
    }

    let password = nonempty(config.password.as_deref())
        .map_or_else(generate_password, str::to_owned);
    let mut doc = vm_document(config, &image, nic, region.default_login_user(), password);

    let explicit = nonempty(config.instance_type.as_deref());
    let sizes = match explicit {
        Some(size) => vec![size.to_owned()],
        None => region.hardware_profiles(config.cpu, config.memory_mb).await?,
    };

    for size in sizes {
        doc.properties.hardware_profile = Some(HardwareProfile { vm_size: size.clone() });
        let body = serde_json::to_value(&doc)
            .map_err(|e| CoreError::Internal(format!("encode vm {}: {e}", config.name)))?;
        match region.create_resource::<VirtualMachine>(group, body).await {
            Ok(created) => {
                info!(vm = %created.id, size = %size, "vm created");
                return Ok(Instance::new(region.clone(), created));
            }
            Err(e) if explicit.is_some() || FATAL_CODES.iter().any(|c| e.has_arm_code(c)) => {
                return Err(e);
            }
            Err(e) => warn!(size = %size, error = %e, "vm size rejected, trying next"),
        }
    }

    Err(CoreError::InstanceTypeUnavailable {
        cpu: config.cpu,
        memory_mb: config.memory_mb,
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::collections::HashMap;

    use super::*;
    use crate::model::DiskConfig;

    fn config() -> VmCreateConfig {
        VmCreateConfig {
            name: "web".into(),
            hostname: "my.web-host!@01234567".into(),
            image_id: "Canonical/UbuntuServer/18.04-LTS/latest".into(),
            instance_type: None,
            cpu: 1,
            memory_mb: 1024,
            sys_disk: DiskConfig::new("Standard_LRS", 30),
            data_disks: vec![DiskConfig::new("Premium_LRS", 64), DiskConfig::new("Standard_LRS", 128)],
            network_id: "/subscriptions/s/resourceGroups/rg/providers/Microsoft.Network/virtualNetworks/v/subnets/default".into(),
            ip_addr: None,
            password: None,
            public_key: Some("ssh-rsa AAAA".into()),
            user_data: Some(String::new()),
            security_group_ids: Vec::new(),
            resource_group: None,
            tags: HashMap::new(),
        }
    }

    #[test]
    fn generated_password_mixes_classes() {
        for _ in 0..50 {
            let pw = generate_password();
            assert_eq!(pw.len(), PASSWORD_LEN);
            assert!(pw.chars().any(|c| c.is_ascii_lowercase()));
            assert!(pw.chars().any(|c| c.is_ascii_uppercase()));
            assert!(pw.chars().any(|c| c.is_ascii_digit()));
        }
    }

    #[test]
    fn document_for_marketplace_linux_image() {
        let cfg = config();
        let parts = parse_marketplace_id(&cfg.image_id).unwrap();
        let image = Image::marketplace(&cfg.image_id, parts, None);
        let nic = NetworkInterface {
            id: "/nic/web-ipconfig".into(),
            ..Default::default()
        };
        let doc = vm_document(&cfg, &image, &nic, "azureuser", "Secret123abc".into());
        let value = serde_json::to_value(&doc).unwrap();
        let props = &value["properties"];

        assert_eq!(value["type"], VM_TYPE);
        assert!(value.get("tags").is_none());
        assert_eq!(props["osProfile"]["computerName"], "mywebhost012345");
        assert_eq!(props["osProfile"]["adminUsername"], "azureuser");
        assert!(props["osProfile"].get("customData").is_none());
        let ssh = &props["osProfile"]["linuxConfiguration"];
        assert_eq!(ssh["disablePasswordAuthentication"], false);
        assert_eq!(
            ssh["ssh"]["publicKeys"][0]["path"],
            "/home/azureuser/.ssh/authorized_keys"
        );

        let storage = &props["storageProfile"];
        assert_eq!(storage["imageReference"]["publisher"], "Canonical");
        assert!(storage["imageReference"].get("id").is_none());
        assert!(storage["osDisk"]["name"].as_str().unwrap().starts_with("vdisk_web_"));
        assert_eq!(storage["osDisk"]["caching"], "ReadWrite");
        assert_eq!(storage["osDisk"]["createOption"], "FromImage");
        assert_eq!(storage["osDisk"]["diskSizeGB"], 30);
        assert_eq!(storage["osDisk"]["osType"], "Linux");
        assert_eq!(storage["dataDisks"][1]["lun"], 1);
        assert_eq!(storage["dataDisks"][1]["createOption"], "Empty");
        assert_eq!(storage["dataDisks"][0]["managedDisk"]["storageAccountType"], "Premium_LRS");

        assert_eq!(props["networkProfile"]["networkInterfaces"][0]["id"], "/nic/web-ipconfig");
        assert!(props.get("hardwareProfile").is_none());
    }

    #[test]
    fn windows_image_gets_no_ssh_config() {
        let mut cfg = config();
        cfg.image_id = "MicrosoftWindowsServer/WindowsServer/2019-Datacenter/latest".into();
        let parts = parse_marketplace_id(&cfg.image_id).unwrap();
        let image = Image::marketplace(&cfg.image_id, parts, None);
        let doc = vm_document(&cfg, &image, &NetworkInterface::default(), "azureuser", "x".into());
        let os = doc.properties.os_profile.unwrap();
        assert!(os.linux_configuration.is_none());
    }
}
