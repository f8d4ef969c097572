//! Provider-agnostic projection of Azure Resource Manager resources.
//!
//! `armlink-core` sits between the raw [`armlink_api::ArmClient`] and
//! consumers that want one object model across clouds. It provides:
//!
//! - **[`Provider`]**: one per subscription; hands out [`Region`] handles.
//! - **[`Region`]**: the gateway to ARM for one location. Typed listings and
//!   lookups (`list_vpcs`, `get_instance`, `list_app_sites`, ...), resource
//!   creation, and the per-region app-service-plan cache.
//! - **[`cloud`]**: projected entities (VPCs, subnets, wires, hosts, VMs,
//!   security groups, web apps) that keep a handle to their region.
//! - **[`capability`]**: the `Cloud*` traits those entities implement.
//! - **Derivations**: CIDR arithmetic ([`cidr`]), rule and computer naming
//!   ([`naming`]), and the marketplace publisher catalog ([`publisher`]).
//!
//! Every operation is an `async fn` that runs to completion on the caller's
//! task; nothing is spawned in the background.

pub mod capability;
pub mod cidr;
pub mod cloud;
pub mod config;
pub mod convert;
pub mod error;
pub mod model;
pub mod naming;
pub mod provider;
pub mod publisher;
pub mod region;

mod plan_cache;
mod provision;
mod registry;

// ── Primary re-exports ───────────────────────────────────────────────

pub use config::{AccountConfig, DEFAULT_LOGIN_USER};
pub use error::CoreError;
pub use provider::Provider;
pub use region::{DEFAULT_RESOURCE_GROUP, Region};
pub use registry::{NicRequest, is_classic_id};

pub use cloud::{
    AppEnvironment, AppSite, ClassicVpc, Host, Image, ImageKind, Instance, Network,
    SecurityGroup, Vpc, Wire, Zone,
};
pub use model::{
    AppBackup, AppBackupConfig, AppCertificate, AppDomain, BackupKind, Direction, DiskConfig,
    DomainStatus, OsType, ResourceId, RuleAction, SecurityRuleSpec, VmCreateConfig, VmStatus,
};
pub use provision::generate_password;

// Transport-layer types consumers need alongside the facade.
pub use armlink_api::{CloudEnvironment, PollConfig, TagMode, TlsMode, TransportConfig};
