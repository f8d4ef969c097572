//! Provider-agnostic capability traits.
//!
//! These are the seams higher layers program against. Every ARM-backed
//! entity reports `global_id() == id().to_lowercase()`; the synthetic zone,
//! host and wire report `is_emulated() == true` and carry stable synthesized
//! ids instead.

use async_trait::async_trait;

use crate::error::CoreError;
use crate::model::{
    AppBackup, AppBackupConfig, AppCertificate, AppDomain, OsType, SecurityRuleSpec,
    VmCreateConfig, VmStatus, project_id,
};

/// Identity shared by every projected entity.
pub trait CloudResource: Send + Sync {
    fn id(&self) -> String;

    fn name(&self) -> String;

    fn global_id(&self) -> String {
        self.id().to_lowercase()
    }

    fn status(&self) -> String;

    fn is_emulated(&self) -> bool {
        false
    }

    /// Lowercased resource group, empty for entities outside one.
    fn project_id(&self) -> String {
        project_id(&self.id())
    }
}

#[async_trait]
pub trait CloudRegion: CloudResource {
    fn geography(&self) -> Option<(f64, f64)>;

    async fn zones(&self) -> Result<Vec<Box<dyn CloudZone>>, CoreError>;

    async fn vpcs(&self) -> Result<Vec<Box<dyn CloudVpc>>, CoreError>;

    async fn security_groups(&self) -> Result<Vec<Box<dyn CloudSecurityGroup>>, CoreError>;

    async fn apps(&self) -> Result<Vec<Box<dyn CloudApp>>, CoreError>;
}

#[async_trait]
pub trait CloudZone: CloudResource {
    async fn hosts(&self) -> Result<Vec<Box<dyn CloudHost>>, CoreError>;

    async fn wires(&self) -> Result<Vec<Box<dyn CloudWire>>, CoreError>;
}

#[async_trait]
pub trait CloudHost: CloudResource {
    /// Physical capacity is not exposed by Azure; these stay zero.
    fn cpu_count(&self) -> u32 {
        0
    }

    fn mem_size_mb(&self) -> u64 {
        0
    }

    fn storage_size_gb(&self) -> u64 {
        0
    }

    async fn vms(&self) -> Result<Vec<Box<dyn CloudVm>>, CoreError>;

    async fn vm(&self, id: &str) -> Result<Box<dyn CloudVm>, CoreError>;

    async fn create_vm(&self, config: &VmCreateConfig) -> Result<Box<dyn CloudVm>, CoreError>;
}

#[async_trait]
pub trait CloudWire: CloudResource {
    /// Mbps.
    fn bandwidth(&self) -> u32;

    fn vpc_id(&self) -> String;

    async fn networks(&self) -> Result<Vec<Box<dyn CloudNetwork>>, CoreError>;

    async fn create_network(
        &self,
        name: &str,
        cidr: &str,
    ) -> Result<Box<dyn CloudNetwork>, CoreError>;
}

#[async_trait]
pub trait CloudVpc: CloudResource {
    /// First prefix of the address space.
    fn cidr(&self) -> String;

    fn is_classic(&self) -> bool;

    async fn wires(&self) -> Result<Vec<Box<dyn CloudWire>>, CoreError>;

    async fn networks(&self) -> Result<Vec<Box<dyn CloudNetwork>>, CoreError>;

    async fn delete(&self) -> Result<(), CoreError>;
}

#[async_trait]
pub trait CloudNetwork: CloudResource {
    fn cidr(&self) -> String;

    fn gateway(&self) -> String;

    fn ip_start(&self) -> String;

    fn ip_end(&self) -> String;

    fn mask(&self) -> u8;

    fn wire_id(&self) -> String;

    /// Seconds callers should wait for an address allocation on this subnet.
    fn allocation_timeout_secs(&self) -> u64 {
        120
    }

    async fn delete(&self) -> Result<(), CoreError>;
}

#[async_trait]
pub trait CloudSecurityGroup: CloudResource {
    fn rules(&self) -> Vec<SecurityRuleSpec>;

    async fn create_rule(&self, rule: &SecurityRuleSpec) -> Result<(), CoreError>;

    async fn update_rule(&self, name: &str, rule: &SecurityRuleSpec) -> Result<(), CoreError>;

    async fn delete_rule(&self, name: &str) -> Result<(), CoreError>;

    async fn delete(&self) -> Result<(), CoreError>;
}

#[async_trait]
pub trait CloudVm: CloudResource {
    fn instance_type(&self) -> String;

    fn vm_status(&self) -> VmStatus;

    fn os_type(&self) -> OsType;

    async fn start(&self) -> Result<(), CoreError>;

    async fn stop(&self) -> Result<(), CoreError>;

    async fn delete(&self) -> Result<(), CoreError>;

    async fn security_group_ids(&self) -> Result<Vec<String>, CoreError>;

    async fn attach_security_group(&self, group_id: &str) -> Result<(), CoreError>;
}

#[async_trait]
pub trait CloudApp: CloudResource {
    async fn tech_stack(&self) -> String;

    async fn os_type(&self) -> OsType;

    async fn plan_name(&self) -> String;

    async fn backups(&self) -> Result<Vec<AppBackup>, CoreError>;

    async fn backup_config(&self) -> Result<AppBackupConfig, CoreError>;

    async fn domains(&self) -> Result<Vec<AppDomain>, CoreError>;

    async fn certificates(&self) -> Result<Vec<AppCertificate>, CoreError>;

    async fn environments(&self) -> Result<Vec<Box<dyn CloudAppEnvironment>>, CoreError>;
}

pub trait CloudAppEnvironment: CloudResource {}
