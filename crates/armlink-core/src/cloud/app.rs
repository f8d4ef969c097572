// ── Web apps and deployment slots ──
//
// Listings return sites with their properties inline; a site fetched some
// other way may arrive without them. Properties are hydrated at most once per
// `AppSite` value. Stack, OS type and plan name are best-effort probes: a
// failing probe logs at debug and yields a fallback instead of an error.

use armlink_api::api_version;
use armlink_api::types::{
    BackupItem, BackupRequest, Site, SiteConfigResource, SiteMetadata, SiteProperties,
};
use async_trait::async_trait;
use serde_json::json;
use tokio::sync::OnceCell;
use tracing::debug;

use super::STATUS_AVAILABLE;
use crate::capability::{CloudApp, CloudAppEnvironment, CloudResource};
use crate::convert;
use crate::error::CoreError;
use crate::model::{AppBackup, AppBackupConfig, AppCertificate, AppDomain, BackupKind, OsType};
use crate::region::Region;

const DOCKER_CONTAINER: &str = "Docker container";

fn site_status(props: Option<&SiteProperties>) -> String {
    props
        .map(|p| p.state.to_lowercase())
        .filter(|s| !s.is_empty())
        .unwrap_or_else(|| STATUS_AVAILABLE.to_owned())
}

/// A `Microsoft.Web/sites` resource.
#[derive(Debug, Clone)]
pub struct AppSite {
    region: Region,
    site: Site,
    props: OnceCell<SiteProperties>,
}

impl AppSite {
    pub(crate) fn new(region: Region, mut site: Site) -> Self {
        let props = OnceCell::new_with(site.properties.take());
        Self {
            region,
            site,
            props,
        }
    }

    pub fn region(&self) -> &Region {
        &self.region
    }

    pub fn id(&self) -> &str {
        &self.site.id
    }

    pub fn name(&self) -> &str {
        &self.site.name
    }

    /// ARM `kind`, e.g. `app`, `app,linux` or `app,linux,container`.
    pub fn kind(&self) -> &str {
        &self.site.kind
    }

    pub fn location(&self) -> &str {
        &self.site.location
    }

    fn path(&self, suffix: &str) -> String {
        format!("{}/{suffix}", self.id().trim_end_matches('/'))
    }

    /// Site properties, fetched on first use when the listing left them out.
    pub async fn properties(&self) -> Result<&SiteProperties, CoreError> {
        self.props
            .get_or_try_init(|| async {
                debug!(site = %self.id(), "hydrating site properties");
                let site: Site = self
                    .region
                    .client()
                    .show(self.id(), api_version::WEB)
                    .await
                    .map_err(|e| CoreError::request("get site", self.id(), e))?;
                Ok::<_, CoreError>(site.properties.unwrap_or_default())
            })
            .await
    }

    pub async fn server_farm_id(&self) -> Result<String, CoreError> {
        Ok(self.properties().await?.server_farm_id.clone())
    }

    async fn configs(&self) -> Result<Vec<SiteConfigResource>, CoreError> {
        let path = self.path("config");
        self.region
            .client()
            .list_v2(&path, api_version::WEB, &[])
            .await
            .map_err(|e| CoreError::request("list site config", &path, e))
    }

    async fn metadata_stack(&self) -> Result<Option<&'static str>, CoreError> {
        let path = self.path("config/metadata/list");
        let meta: SiteMetadata = self
            .region
            .client()
            .post_v2(&path, api_version::WEB, &json!({}))
            .await
            .map_err(|e| CoreError::request("read site metadata", &path, e))?;
        Ok(meta
            .properties
            .current_stack
            .as_deref()
            .and_then(convert::stack_display_name))
    }

    /// Technology stack display name; empty when nothing identifies it.
    pub async fn tech_stack(&self) -> String {
        match self.metadata_stack().await {
            Ok(Some(stack)) => return stack.to_owned(),
            Ok(None) => {}
            Err(e) => debug!(site = %self.id(), error = %e, "stack metadata probe failed"),
        }
        if self.kind().to_ascii_lowercase().contains("container") {
            return DOCKER_CONTAINER.to_owned();
        }
        match self.configs().await {
            Ok(configs) => configs
                .iter()
                .find_map(|c| convert::stack_from_config(&c.properties))
                .unwrap_or_default()
                .to_owned(),
            Err(e) => {
                debug!(site = %self.id(), error = %e, "stack config probe failed");
                String::new()
            }
        }
    }

    pub async fn os_type(&self) -> OsType {
        match self.configs().await {
            Ok(configs) => configs
                .first()
                .map_or(OsType::Windows, |c| convert::os_type_from_config(&c.properties)),
            Err(e) => {
                debug!(site = %self.id(), error = %e, "os type probe failed");
                OsType::Linux
            }
        }
    }

    /// Name of the hosting plan, resolved through the region's plan cache.
    pub async fn plan_name(&self) -> String {
        let resolved = async {
            let farm_id = self.server_farm_id().await?;
            self.region.app_service_plan(&farm_id).await
        }
        .await;
        match resolved {
            Ok(plan) => plan.name,
            Err(e) => {
                debug!(site = %self.id(), error = %e, "plan name probe failed");
                String::new()
            }
        }
    }

    async fn list_backup_items(&self, suffix: &str) -> Result<Vec<BackupItem>, CoreError> {
        let path = self.path(suffix);
        self.region
            .client()
            .list_v2(&path, api_version::WEB, &[])
            .await
            .map_err(|e| CoreError::request("list backups", &path, e))
    }

    /// Manual backups followed by automatic snapshots.
    pub async fn backups(&self) -> Result<Vec<AppBackup>, CoreError> {
        let mut backups: Vec<AppBackup> = self
            .list_backup_items("backups")
            .await?
            .into_iter()
            .map(|item| convert::backup(item, BackupKind::Manual))
            .collect();
        backups.extend(
            self.list_backup_items("snapshots")
                .await?
                .into_iter()
                .map(|item| convert::backup(item, BackupKind::Auto)),
        );
        Ok(backups)
    }

    pub async fn backup_config(&self) -> Result<AppBackupConfig, CoreError> {
        let path = self.path("config/backup/list");
        let request: BackupRequest = self
            .region
            .client()
            .post_v2(&path, api_version::WEB, &json!({}))
            .await
            .map_err(|e| CoreError::request("read backup config", &path, e))?;
        Ok(request.into())
    }

    pub async fn domains(&self) -> Result<Vec<AppDomain>, CoreError> {
        Ok(convert::domains(self.properties().await?))
    }

    /// Certificates bound to the site's plan.
    pub async fn certificates(&self) -> Result<Vec<AppCertificate>, CoreError> {
        let farm_id = self.server_farm_id().await?;
        self.region.list_app_certificates(&farm_id).await
    }

    /// Deployment slots.
    pub async fn environments(&self) -> Result<Vec<AppEnvironment>, CoreError> {
        let path = self.path("slots");
        let slots: Vec<Site> = self
            .region
            .client()
            .list_v2(&path, api_version::WEB, &[])
            .await
            .map_err(|e| CoreError::request("list slots", &path, e))?;
        Ok(slots.into_iter().map(AppEnvironment::new).collect())
    }
}

impl CloudResource for AppSite {
    fn id(&self) -> String {
        self.site.id.clone()
    }

    fn name(&self) -> String {
        self.site.name.clone()
    }

    fn status(&self) -> String {
        site_status(self.props.get())
    }
}

#[async_trait]
impl CloudApp for AppSite {
    async fn tech_stack(&self) -> String {
        AppSite::tech_stack(self).await
    }

    async fn os_type(&self) -> OsType {
        AppSite::os_type(self).await
    }

    async fn plan_name(&self) -> String {
        AppSite::plan_name(self).await
    }

    async fn backups(&self) -> Result<Vec<AppBackup>, CoreError> {
        AppSite::backups(self).await
    }

    async fn backup_config(&self) -> Result<AppBackupConfig, CoreError> {
        AppSite::backup_config(self).await
    }

    async fn domains(&self) -> Result<Vec<AppDomain>, CoreError> {
        AppSite::domains(self).await
    }

    async fn certificates(&self) -> Result<Vec<AppCertificate>, CoreError> {
        AppSite::certificates(self).await
    }

    async fn environments(&self) -> Result<Vec<Box<dyn CloudAppEnvironment>>, CoreError> {
        Ok(AppSite::environments(self)
            .await?
            .into_iter()
            .map(|env| Box::new(env) as Box<dyn CloudAppEnvironment>)
            .collect())
    }
}

// ── Slots ───────────────────────────────────────────────────────────

/// A deployment slot of a site.
#[derive(Debug, Clone)]
pub struct AppEnvironment {
    slot: Site,
}

impl AppEnvironment {
    fn new(slot: Site) -> Self {
        Self { slot }
    }

    pub fn id(&self) -> &str {
        &self.slot.id
    }

    /// Slot name without the `<site>/` prefix ARM puts in front.
    pub fn name(&self) -> &str {
        self.slot
            .name
            .rsplit_once('/')
            .map_or(self.slot.name.as_str(), |(_, slot)| slot)
    }
}

impl CloudResource for AppEnvironment {
    fn id(&self) -> String {
        self.slot.id.clone()
    }

    fn name(&self) -> String {
        AppEnvironment::name(self).to_owned()
    }

    fn status(&self) -> String {
        site_status(self.slot.properties.as_ref())
    }
}

impl CloudAppEnvironment for AppEnvironment {}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn slot_name_drops_site_prefix() {
        let env = AppEnvironment::new(Site {
            id: "/subscriptions/s/resourceGroups/rg/providers/Microsoft.Web/sites/app/slots/staging".into(),
            name: "app/staging".into(),
            ..Default::default()
        });
        assert_eq!(AppEnvironment::name(&env), "staging");
        assert_eq!(env.status(), "available");
        assert_eq!(env.project_id(), "rg");
    }

    #[test]
    fn site_status_reads_state() {
        let props = SiteProperties {
            state: "Running".into(),
            ..Default::default()
        };
        assert_eq!(site_status(Some(&props)), "running");
        assert_eq!(site_status(None), "available");
    }
}
