use async_trait::async_trait;

use super::{Instance, STATUS_AVAILABLE, Zone};
use crate::capability::{CloudHost, CloudResource, CloudVm};
use crate::error::CoreError;
use crate::model::VmCreateConfig;
use crate::provision;
use crate::region::Region;

/// Emulated host aggregating every VM in the region.
#[derive(Debug, Clone)]
pub struct Host {
    zone: Zone,
}

impl Host {
    pub(crate) fn new(zone: Zone) -> Self {
        Self { zone }
    }

    pub fn zone(&self) -> &Zone {
        &self.zone
    }

    pub fn region(&self) -> &Region {
        self.zone.region()
    }

    /// `<region-global-id>/<subscription>`.
    pub fn id(&self) -> String {
        let region = self.region();
        format!("{}/{}", region.global_id(), region.subscription_id())
    }

    pub async fn vms(&self) -> Result<Vec<Instance>, CoreError> {
        self.region().list_instances().await
    }

    pub async fn vm(&self, id: &str) -> Result<Instance, CoreError> {
        self.region().get_instance(id).await
    }

    /// Create a VM: NIC, image check, payload, then one PUT per candidate
    /// size. The NIC is removed again if no VM comes out of it.
    pub async fn create_vm(&self, config: &VmCreateConfig) -> Result<Instance, CoreError> {
        provision::create_vm(self.region(), config).await
    }
}

impl CloudResource for Host {
    fn id(&self) -> String {
        Host::id(self)
    }

    fn name(&self) -> String {
        format!("{}/{}", self.region().name(), self.region().subscription_id())
    }

    fn status(&self) -> String {
        STATUS_AVAILABLE.to_owned()
    }

    fn is_emulated(&self) -> bool {
        true
    }
}

#[async_trait]
impl CloudHost for Host {
    async fn vms(&self) -> Result<Vec<Box<dyn CloudVm>>, CoreError> {
        Ok(Host::vms(self)
            .await?
            .into_iter()
            .map(|vm| Box::new(vm) as Box<dyn CloudVm>)
            .collect())
    }

    async fn vm(&self, id: &str) -> Result<Box<dyn CloudVm>, CoreError> {
        Ok(Box::new(Host::vm(self, id).await?))
    }

    async fn create_vm(&self, config: &VmCreateConfig) -> Result<Box<dyn CloudVm>, CoreError> {
        Ok(Box::new(Host::create_vm(self, config).await?))
    }
}
