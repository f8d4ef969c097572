// ── Domain model ──
//
// Caller-facing value types that are not ARM payloads: identities parsed
// from resource ids, rule and VM creation requests, and the leaf
// projections of web-app introspection.

pub mod app;
pub mod resource_id;
pub mod rule;
pub mod vm;

pub use app::{AppBackup, AppBackupConfig, AppCertificate, AppDomain, BackupKind, DomainStatus};
pub use resource_id::{ResourceId, global_id, project_id};
pub use rule::{Direction, RuleAction, SecurityRuleSpec};
pub use vm::{DiskConfig, OsType, VmCreateConfig, VmStatus};
