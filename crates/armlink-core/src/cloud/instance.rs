use armlink_api::types::VirtualMachine;
use async_trait::async_trait;
use serde_json::{Value, json};
use tracing::info;

use super::provisioning_status;
use crate::capability::{CloudResource, CloudVm};
use crate::convert::vm_status;
use crate::error::CoreError;
use crate::model::{OsType, VmStatus};
use crate::region::Region;

/// A `Microsoft.Compute/virtualMachines` resource.
#[derive(Debug, Clone)]
pub struct Instance {
    region: Region,
    doc: VirtualMachine,
}

impl Instance {
    pub(crate) fn new(region: Region, doc: VirtualMachine) -> Self {
        Self { region, doc }
    }

    pub fn region(&self) -> &Region {
        &self.region
    }

    pub fn id(&self) -> &str {
        &self.doc.id
    }

    pub fn name(&self) -> &str {
        &self.doc.name
    }

    pub fn location(&self) -> &str {
        &self.doc.location
    }

    pub fn document(&self) -> &VirtualMachine {
        &self.doc
    }

    /// The VM size, e.g. `Standard_B1s`.
    pub fn instance_type(&self) -> &str {
        self.doc
            .properties
            .hardware_profile
            .as_ref()
            .map_or("", |h| h.vm_size.as_str())
    }

    pub fn power_state(&self) -> Option<&str> {
        self.doc
            .properties
            .instance_view
            .as_ref()
            .and_then(|view| view.power_state())
    }

    pub fn vm_status(&self) -> VmStatus {
        vm_status(self.power_state())
    }

    pub fn os_type(&self) -> OsType {
        self.doc
            .properties
            .storage_profile
            .as_ref()
            .and_then(|s| s.os_disk.as_ref())
            .and_then(|disk| disk.os_type.parse().ok())
            .unwrap_or_default()
    }

    /// Ids of the NICs in the network profile.
    pub fn nic_ids(&self) -> Vec<String> {
        self.doc
            .properties
            .network_profile
            .as_ref()
            .map(|p| p.network_interfaces.iter().map(|n| n.id.clone()).collect())
            .unwrap_or_default()
    }

    async fn action(&self, action: &str) -> Result<(), CoreError> {
        self.region
            .client()
            .perform::<Value>(self.id(), action, &json!({}))
            .await
            .map_err(|e| CoreError::request(action, self.id(), e))?;
        info!(vm = %self.id(), action, "vm action completed");
        Ok(())
    }

    pub async fn start(&self) -> Result<(), CoreError> {
        self.action("start").await
    }

    /// Deallocate, so compute is no longer billed.
    pub async fn stop(&self) -> Result<(), CoreError> {
        self.action("deallocate").await
    }

    pub async fn delete(&self) -> Result<(), CoreError> {
        self.region
            .client()
            .del(self.id())
            .await
            .map_err(|e| CoreError::request("delete vm", self.id(), e))?;
        info!(vm = %self.id(), "vm deleted");
        Ok(())
    }

    /// Lowercased ids of the security groups on this VM's NICs.
    pub async fn security_group_ids(&self) -> Result<Vec<String>, CoreError> {
        let mut ids = Vec::new();
        for nic_id in self.nic_ids() {
            let nic = self.region.get_network_interface(&nic_id).await?;
            if let Some(group) = nic.properties.network_security_group {
                let id = group.id.to_lowercase();
                if !ids.contains(&id) {
                    ids.push(id);
                }
            }
        }
        Ok(ids)
    }

    pub async fn attach_security_group(&self, group_id: &str) -> Result<(), CoreError> {
        self.region
            .get_security_group(group_id)
            .await?
            .attach_to_instance(self.id())
            .await
    }
}

impl CloudResource for Instance {
    fn id(&self) -> String {
        self.doc.id.clone()
    }

    fn name(&self) -> String {
        self.doc.name.clone()
    }

    fn status(&self) -> String {
        match self.vm_status() {
            VmStatus::Unknown => provisioning_status(&self.doc.properties.provisioning_state),
            status => status.to_string(),
        }
    }
}

#[async_trait]
impl CloudVm for Instance {
    fn instance_type(&self) -> String {
        Instance::instance_type(self).to_owned()
    }

    fn vm_status(&self) -> VmStatus {
        Instance::vm_status(self)
    }

    fn os_type(&self) -> OsType {
        Instance::os_type(self)
    }

    async fn start(&self) -> Result<(), CoreError> {
        Instance::start(self).await
    }

    async fn stop(&self) -> Result<(), CoreError> {
        Instance::stop(self).await
    }

    async fn delete(&self) -> Result<(), CoreError> {
        Instance::delete(self).await
    }

    async fn security_group_ids(&self) -> Result<Vec<String>, CoreError> {
        Instance::security_group_ids(self).await
    }

    async fn attach_security_group(&self, group_id: &str) -> Result<(), CoreError> {
        Instance::attach_security_group(self, group_id).await
    }
}
