//! Web App command handlers.

use serde::Serialize;
use tabled::Tabled;

use armlink_api::types::AppServicePlan;
use armlink_core::capability::CloudResource;
use armlink_core::{AppBackup, AppCertificate, AppDomain, AppSite, Region};

use crate::cli::{AppsArgs, AppsCommand, GlobalOpts};
use crate::error::CliError;
use crate::output;

use super::util;

// ── Views ───────────────────────────────────────────────────────────

#[derive(Serialize)]
struct AppInfo {
    id: String,
    name: String,
    kind: String,
    location: String,
    status: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    tech_stack: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    os_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    plan: Option<String>,
}

impl From<&AppSite> for AppInfo {
    fn from(site: &AppSite) -> Self {
        Self {
            id: site.id().to_owned(),
            name: site.name().to_owned(),
            kind: site.kind().to_owned(),
            location: site.location().to_owned(),
            status: site.status(),
            tech_stack: None,
            os_type: None,
            plan: None,
        }
    }
}

impl AppInfo {
    /// Summary plus the probed stack, OS and plan. Probes never fail; an
    /// unknown value comes back empty.
    async fn introspect(site: &AppSite) -> Self {
        Self {
            tech_stack: Some(site.tech_stack().await),
            os_type: Some(site.os_type().await.to_string()),
            plan: Some(site.plan_name().await),
            ..Self::from(site)
        }
    }
}

#[derive(Tabled)]
struct AppRow {
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Kind")]
    kind: String,
    #[tabled(rename = "Location")]
    location: String,
    #[tabled(rename = "Status")]
    status: String,
}

impl From<&AppInfo> for AppRow {
    fn from(a: &AppInfo) -> Self {
        Self {
            name: a.name.clone(),
            kind: a.kind.clone(),
            location: a.location.clone(),
            status: a.status.clone(),
        }
    }
}

fn detail(a: &AppInfo) -> String {
    output::detail_lines(&[
        ("ID", output::dim(&a.id)),
        ("Name", a.name.clone()),
        ("Kind", a.kind.clone()),
        ("Location", a.location.clone()),
        ("Status", output::paint_status(&a.status)),
        ("Stack", util::or_dash(a.tech_stack.as_deref())),
        ("OS", util::or_dash(a.os_type.as_deref())),
        ("Plan", util::or_dash(a.plan.as_deref())),
    ])
}

#[derive(Tabled)]
struct BackupRow {
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Kind")]
    kind: String,
    #[tabled(rename = "Status")]
    status: String,
    #[tabled(rename = "Size")]
    size: String,
    #[tabled(rename = "Created")]
    created: String,
}

impl From<&AppBackup> for BackupRow {
    fn from(b: &AppBackup) -> Self {
        Self {
            name: b.name.clone(),
            kind: b.kind.to_string(),
            status: util::or_dash(b.status.as_deref()),
            size: b.size_bytes.map_or_else(|| "-".into(), |s| s.to_string()),
            created: util::or_dash(b.created.as_deref()),
        }
    }
}

#[derive(Tabled)]
struct DomainRow {
    #[tabled(rename = "Host Name")]
    name: String,
    #[tabled(rename = "Status")]
    status: String,
    #[tabled(rename = "SSL")]
    ssl: String,
}

impl From<&AppDomain> for DomainRow {
    fn from(d: &AppDomain) -> Self {
        Self {
            name: d.name.clone(),
            status: d.status.to_string(),
            ssl: util::or_dash(d.ssl_state.as_deref()),
        }
    }
}

#[derive(Tabled)]
struct CertRow {
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Subject")]
    subject: String,
    #[tabled(rename = "Thumbprint")]
    thumbprint: String,
    #[tabled(rename = "Expires")]
    expires: String,
}

impl From<&AppCertificate> for CertRow {
    fn from(c: &AppCertificate) -> Self {
        Self {
            name: c.name.clone(),
            subject: util::or_dash(c.subject_name.as_deref()),
            thumbprint: util::or_dash(c.thumbprint.as_deref()),
            expires: util::or_dash(c.expiration_date.as_deref()),
        }
    }
}

#[derive(Serialize, Tabled)]
struct SlotRow {
    #[tabled(rename = "Slot")]
    name: String,
    #[tabled(rename = "Status")]
    status: String,
    #[tabled(rename = "ID")]
    id: String,
}

#[derive(Serialize)]
struct PlanInfo {
    id: String,
    name: String,
    kind: String,
    location: String,
    sku: String,
    status: String,
    sites: u32,
}

impl From<&AppServicePlan> for PlanInfo {
    fn from(p: &AppServicePlan) -> Self {
        Self {
            id: p.id.clone(),
            name: p.name.clone(),
            kind: p.kind.clone(),
            location: p.location.clone(),
            sku: p
                .sku
                .as_ref()
                .map(|s| format!("{} ({})", s.name, s.tier))
                .unwrap_or_default(),
            status: p.properties.status.clone(),
            sites: p.properties.number_of_sites,
        }
    }
}

#[derive(Tabled)]
struct PlanRow {
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "SKU")]
    sku: String,
    #[tabled(rename = "Sites")]
    sites: u32,
    #[tabled(rename = "Status")]
    status: String,
}

impl From<&PlanInfo> for PlanRow {
    fn from(p: &PlanInfo) -> Self {
        Self {
            name: p.name.clone(),
            sku: p.sku.clone(),
            sites: p.sites,
            status: p.status.clone(),
        }
    }
}

// ── Handler ─────────────────────────────────────────────────────────

pub async fn handle(region: &Region, args: AppsArgs, global: &GlobalOpts) -> Result<(), CliError> {
    let out = match args.command {
        AppsCommand::List => {
            let apps: Vec<AppInfo> = region
                .list_app_sites()
                .await?
                .iter()
                .map(AppInfo::from)
                .collect();
            output::render_list(&global.output, &apps, |a| AppRow::from(a), |a| a.id.clone())?
        }

        AppsCommand::Show { id } => {
            let site = region.get_app_site(&id).await?;
            let info = AppInfo::introspect(&site).await;
            output::render_single(&global.output, &info, detail, |a| a.id.clone())?
        }

        AppsCommand::Backups { id } => {
            let backups = region.get_app_site(&id).await?.backups().await?;
            output::render_list(
                &global.output,
                &backups,
                |b| BackupRow::from(b),
                |b| b.id.clone(),
            )?
        }

        AppsCommand::BackupConfig { id } => {
            let config = region.get_app_site(&id).await?.backup_config().await?;
            output::render_single(
                &global.output,
                &config,
                |c| {
                    output::detail_lines(&[
                        ("Name", c.name.clone()),
                        ("Enabled", c.enabled.to_string()),
                        ("Storage", util::or_dash(c.storage_account_url.as_deref())),
                        (
                            "Frequency",
                            match (c.frequency_interval, c.frequency_unit.as_deref()) {
                                (Some(n), Some(unit)) => format!("every {n} {unit}"),
                                _ => "-".into(),
                            },
                        ),
                        (
                            "Retention",
                            c.retention_days
                                .map_or_else(|| "-".into(), |d| format!("{d} days")),
                        ),
                        ("Keep One", c.keep_at_least_one_backup.to_string()),
                    ])
                },
                |c| c.name.clone(),
            )?
        }

        AppsCommand::Domains { id } => {
            let domains = region.get_app_site(&id).await?.domains().await?;
            output::render_list(
                &global.output,
                &domains,
                |d| DomainRow::from(d),
                |d| d.name.clone(),
            )?
        }

        AppsCommand::Certs { id } => {
            let certs = region.get_app_site(&id).await?.certificates().await?;
            output::render_list(&global.output, &certs, |c| CertRow::from(c), |c| c.id.clone())?
        }

        AppsCommand::Slots { id } => {
            let slots: Vec<SlotRow> = region
                .get_app_site(&id)
                .await?
                .environments()
                .await?
                .iter()
                .map(|env| SlotRow {
                    name: env.name().to_owned(),
                    status: env.status(),
                    id: env.id().to_owned(),
                })
                .collect();
            output::render_list(
                &global.output,
                &slots,
                |s| SlotRow {
                    name: s.name.clone(),
                    status: s.status.clone(),
                    id: s.id.clone(),
                },
                |s| s.id.clone(),
            )?
        }

        AppsCommand::Plans => {
            let plans: Vec<PlanInfo> = region
                .list_app_service_plans()
                .await?
                .iter()
                .map(PlanInfo::from)
                .collect();
            output::render_list(&global.output, &plans, |p| PlanRow::from(p), |p| p.id.clone())?
        }
    };
    output::print_output(&out, global.quiet);
    Ok(())
}
