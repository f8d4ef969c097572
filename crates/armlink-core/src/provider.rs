// ── Provider facade ──
//
// Entry point for consumers: one `Provider` per subscription. Builds the
// ARM client from an `AccountConfig` and hands out `Region` handles.

use std::sync::Arc;

use armlink_api::types::{Location, ResourceGroup};
use armlink_api::{ArmClient, CloudEnvironment};
use tracing::debug;

use crate::config::AccountConfig;
use crate::error::CoreError;
use crate::region::Region;

/// Cheaply cloneable handle to one Azure subscription.
#[derive(Clone)]
pub struct Provider {
    inner: Arc<ProviderInner>,
}

struct ProviderInner {
    client: ArmClient,
    environment: CloudEnvironment,
    tenant_id: Option<String>,
    default_login_user: String,
}

impl std::fmt::Debug for Provider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Provider")
            .field("subscription_id", &self.subscription_id())
            .field("environment", &self.inner.environment)
            .finish_non_exhaustive()
    }
}

impl Provider {
    /// Build the ARM client for an account. Does not touch the network.
    pub fn connect(config: &AccountConfig) -> Result<Self, CoreError> {
        let client = ArmClient::from_token(
            config.resource_manager_endpoint(),
            config.subscription_id.clone(),
            &config.token,
            &config.transport,
        )?
        .with_poll_config(config.poll.clone());
        Ok(Self::with_client(client, config))
    }

    /// Wrap an existing client; the account supplies identity and defaults.
    pub fn with_client(client: ArmClient, config: &AccountConfig) -> Self {
        Self {
            inner: Arc::new(ProviderInner {
                client,
                environment: config.environment,
                tenant_id: config.tenant_id.clone(),
                default_login_user: config.default_login_user.clone(),
            }),
        }
    }

    pub fn client(&self) -> &ArmClient {
        &self.inner.client
    }

    pub fn subscription_id(&self) -> &str {
        self.inner.client.subscription_id()
    }

    pub fn environment(&self) -> CloudEnvironment {
        self.inner.environment
    }

    /// Region handle for an already known location.
    pub fn region_for(&self, location: Location) -> Region {
        Region::new(
            self.inner.client.clone(),
            location,
            self.inner.environment,
            self.inner.tenant_id.clone(),
            self.inner.default_login_user.clone(),
        )
    }

    /// Every region the subscription can deploy to.
    pub async fn regions(&self) -> Result<Vec<Region>, CoreError> {
        let locations = self
            .inner
            .client
            .list_locations()
            .await
            .map_err(|e| CoreError::request("list locations", self.subscription_id(), e))?;
        debug!(count = locations.len(), "locations listed");
        Ok(locations.into_iter().map(|l| self.region_for(l)).collect())
    }

    /// Look up a region by name or global id, case-insensitively.
    pub async fn region(&self, id: &str) -> Result<Region, CoreError> {
        let wanted = id.to_lowercase();
        self.regions()
            .await?
            .into_iter()
            .find(|r| r.name().to_lowercase() == wanted || r.global_id() == wanted)
            .ok_or_else(|| CoreError::not_found("region", id))
    }

    pub async fn resource_groups(&self) -> Result<Vec<ResourceGroup>, CoreError> {
        self.inner
            .client
            .list_resource_groups()
            .await
            .map_err(|e| CoreError::request("list resource groups", self.subscription_id(), e))
    }
}
