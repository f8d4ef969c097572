// ── Region handle ──
//
// A `Region` is the gateway to ARM for everything located in one Azure
// location. It owns the client, the region's identity and the lazily built
// app-service-plan cache. Entities keep a clone of their region instead of
// a parent pointer, so traversals never form ownership cycles.

use std::sync::Arc;

use armlink_api::types::{Location, ResourceGroup};
use armlink_api::{ArmClient, CloudEnvironment};
use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::info;

use crate::capability::{
    CloudApp, CloudRegion, CloudResource, CloudSecurityGroup, CloudVpc, CloudZone,
};
use crate::cloud::{Host, STATUS_AVAILABLE, Zone};
use crate::error::CoreError;
use crate::plan_cache::PlanCache;

/// Resource group used when a caller does not name one.
pub const DEFAULT_RESOURCE_GROUP: &str = "Default";

/// Cheaply cloneable handle to one Azure region.
#[derive(Clone)]
pub struct Region {
    inner: Arc<RegionInner>,
}

struct RegionInner {
    client: ArmClient,
    location: Location,
    environment: CloudEnvironment,
    tenant_id: Option<String>,
    default_login_user: String,
    plans: PlanCache,
}

impl std::fmt::Debug for Region {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Region")
            .field("name", &self.inner.location.name)
            .field("environment", &self.inner.environment)
            .finish_non_exhaustive()
    }
}

/// Normalize an ARM `location` for comparison: lowercase, no spaces.
fn location_key(location: &str) -> String {
    location
        .chars()
        .filter(|c| !c.is_whitespace())
        .collect::<String>()
        .to_lowercase()
}

/// Keep only the characters of a coordinate: digits, `.` and `-`.
fn coordinate(raw: Option<&str>) -> Option<f64> {
    let trimmed: String = raw?
        .chars()
        .filter(|c| c.is_ascii_digit() || matches!(c, '.' | '-'))
        .collect();
    trimmed.parse().ok()
}

impl Region {
    pub(crate) fn new(
        client: ArmClient,
        location: Location,
        environment: CloudEnvironment,
        tenant_id: Option<String>,
        default_login_user: String,
    ) -> Self {
        Self {
            inner: Arc::new(RegionInner {
                client,
                location,
                environment,
                tenant_id,
                default_login_user,
                plans: PlanCache::new(),
            }),
        }
    }

    pub(crate) fn client(&self) -> &ArmClient {
        &self.inner.client
    }

    pub(crate) fn plans(&self) -> &PlanCache {
        &self.inner.plans
    }

    // ── Identity ─────────────────────────────────────────────────────

    /// Region name as ARM spells it, e.g. `eastus`.
    pub fn name(&self) -> &str {
        &self.inner.location.name
    }

    /// Region id: its name.
    pub fn id(&self) -> &str {
        self.name()
    }

    /// `<access-env>/<region-name>`, lowercased.
    pub fn global_id(&self) -> String {
        format!("{}/{}", self.inner.environment.access_env(), self.name()).to_lowercase()
    }

    pub fn display_name(&self) -> &str {
        if self.inner.location.display_name.is_empty() {
            self.name()
        } else {
            &self.inner.location.display_name
        }
    }

    pub fn subscription_id(&self) -> &str {
        self.inner.client.subscription_id()
    }

    pub fn tenant_id(&self) -> Option<&str> {
        self.inner.tenant_id.as_deref()
    }

    pub fn environment(&self) -> CloudEnvironment {
        self.inner.environment
    }

    pub fn default_login_user(&self) -> &str {
        &self.inner.default_login_user
    }

    /// `(latitude, longitude)` when ARM reports both.
    pub fn geography(&self) -> Option<(f64, f64)> {
        let loc = &self.inner.location;
        Some((
            coordinate(loc.latitude.as_deref())?,
            coordinate(loc.longitude.as_deref())?,
        ))
    }

    /// Whether a resource with this `location` belongs here. Resources
    /// without a location are global and belong to every region.
    pub fn in_region(&self, location: &str) -> bool {
        location.is_empty() || location_key(location) == location_key(self.name())
    }

    // ── Synthetic children ───────────────────────────────────────────

    /// The region's single zone.
    pub fn zone(&self) -> Zone {
        Zone::new(self.clone())
    }

    pub fn zones(&self) -> Vec<Zone> {
        vec![self.zone()]
    }

    /// The emulated host of the region's zone.
    pub fn host(&self) -> Host {
        self.zone().host()
    }

    // ── Creation plumbing ────────────────────────────────────────────

    /// Find a resource group by name, case-insensitively, creating it in
    /// this region when missing.
    pub async fn ensure_resource_group(&self, name: &str) -> Result<ResourceGroup, CoreError> {
        let name = if name.is_empty() {
            DEFAULT_RESOURCE_GROUP
        } else {
            name
        };
        let groups = self
            .client()
            .list_resource_groups()
            .await
            .map_err(|e| CoreError::request("list resource groups", self.subscription_id(), e))?;
        if let Some(group) = groups
            .into_iter()
            .find(|g| g.name.eq_ignore_ascii_case(name))
        {
            return Ok(group);
        }
        self.client()
            .create_resource_group(name, self.name())
            .await
            .map_err(|e| CoreError::request("create resource group", name, e))
    }

    /// Create a resource from a body carrying `name` and `type`.
    ///
    /// Ensures the resource group, makes the name unique within it and pins
    /// the body's `location` to this region before the PUT.
    pub(crate) async fn create_resource<T: DeserializeOwned>(
        &self,
        resource_group: &str,
        mut body: Value,
    ) -> Result<T, CoreError> {
        let group = self.ensure_resource_group(resource_group).await?;
        let resource_type = body
            .get("type")
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_owned();
        let requested = body
            .get("name")
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_owned();
        if resource_type.is_empty() || requested.is_empty() {
            return Err(CoreError::InvalidInput {
                message: "resource body needs both name and type".into(),
            });
        }

        let name = self
            .client()
            .unique_name(&group.name, &resource_type, &requested)
            .await
            .map_err(|e| CoreError::request("pick unique name", &requested, e))?;
        body["name"] = Value::String(name.clone());
        body["location"] = Value::String(self.name().to_owned());

        let created = self
            .client()
            .create(&group.name, &body)
            .await
            .map_err(|e| CoreError::request(format!("create {resource_type}"), &name, e))?;
        info!(resource_type = %resource_type, name = %name, group = %group.name, "resource created");
        Ok(created)
    }
}

// ── Capability facade ────────────────────────────────────────────────

impl CloudResource for Region {
    fn id(&self) -> String {
        self.name().to_owned()
    }

    fn name(&self) -> String {
        self.name().to_owned()
    }

    fn global_id(&self) -> String {
        Region::global_id(self)
    }

    fn status(&self) -> String {
        STATUS_AVAILABLE.to_owned()
    }

    fn project_id(&self) -> String {
        String::new()
    }
}

#[async_trait]
impl CloudRegion for Region {
    fn geography(&self) -> Option<(f64, f64)> {
        Region::geography(self)
    }

    async fn zones(&self) -> Result<Vec<Box<dyn CloudZone>>, CoreError> {
        Ok(self
            .zones()
            .into_iter()
            .map(|z| Box::new(z) as Box<dyn CloudZone>)
            .collect())
    }

    async fn vpcs(&self) -> Result<Vec<Box<dyn CloudVpc>>, CoreError> {
        let mut vpcs: Vec<Box<dyn CloudVpc>> = self
            .list_vpcs()
            .await?
            .into_iter()
            .map(|v| Box::new(v) as Box<dyn CloudVpc>)
            .collect();
        vpcs.extend(
            self.list_classic_vpcs()
                .await?
                .into_iter()
                .map(|v| Box::new(v) as Box<dyn CloudVpc>),
        );
        Ok(vpcs)
    }

    async fn security_groups(&self) -> Result<Vec<Box<dyn CloudSecurityGroup>>, CoreError> {
        Ok(self
            .list_security_groups()
            .await?
            .into_iter()
            .map(|g| Box::new(g) as Box<dyn CloudSecurityGroup>)
            .collect())
    }

    async fn apps(&self) -> Result<Vec<Box<dyn CloudApp>>, CoreError> {
        Ok(self
            .list_app_sites()
            .await?
            .into_iter()
            .map(|a| Box::new(a) as Box<dyn CloudApp>)
            .collect())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn region(env: CloudEnvironment, lat: Option<&str>) -> Region {
        let client = ArmClient::from_reqwest("http://127.0.0.1:1", "sub", reqwest::Client::new()).unwrap();
        let location = Location {
            name: "eastus2".into(),
            display_name: "East US 2".into(),
            latitude: lat.map(str::to_owned),
            longitude: Some("-78.3889".into()),
            ..Default::default()
        };
        Region::new(client, location, env, None, "azureuser".into())
    }

    #[test]
    fn global_id_uses_access_env() {
        assert_eq!(region(CloudEnvironment::Public, None).global_id(), "azure-int/eastus2");
        assert_eq!(region(CloudEnvironment::China, None).global_id(), "azure-cn/eastus2");
    }

    #[test]
    fn location_filter_ignores_case_and_spaces() {
        let r = region(CloudEnvironment::Public, None);
        assert!(r.in_region("East US 2"));
        assert!(r.in_region("EASTUS2"));
        assert!(r.in_region(""));
        assert!(!r.in_region("westus"));
    }

    #[test]
    fn geography_trims_coordinates() {
        let r = region(CloudEnvironment::Public, Some("36.6681°"));
        assert_eq!(r.geography(), Some((36.6681, -78.3889)));
        assert_eq!(region(CloudEnvironment::Public, None).geography(), None);
    }
}
