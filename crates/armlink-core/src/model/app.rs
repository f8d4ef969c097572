// ── Web app leaf projections ──

use serde::{Deserialize, Serialize};
use strum::Display;

/// Where a backup came from. Written over ARM's own `type`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum BackupKind {
    /// `<site>/backups`.
    Manual,
    /// `<site>/snapshots`.
    Auto,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppBackup {
    pub id: String,
    pub name: String,
    pub kind: BackupKind,
    pub status: Option<String>,
    pub blob_name: Option<String>,
    pub storage_account_url: Option<String>,
    pub size_bytes: Option<u64>,
    pub created: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppBackupConfig {
    pub name: String,
    pub enabled: bool,
    pub storage_account_url: Option<String>,
    pub frequency_interval: Option<u32>,
    pub frequency_unit: Option<String>,
    pub retention_days: Option<u32>,
    pub keep_at_least_one_backup: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppCertificate {
    pub id: String,
    pub name: String,
    pub subject_name: Option<String>,
    pub issuer: Option<String>,
    pub thumbprint: Option<String>,
    pub issue_date: Option<String>,
    pub expiration_date: Option<String>,
    pub host_names: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum DomainStatus {
    Available,
    NoBind,
}

/// A host name bound to a site.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppDomain {
    pub name: String,
    pub status: DomainStatus,
    pub ssl_state: Option<String>,
}
