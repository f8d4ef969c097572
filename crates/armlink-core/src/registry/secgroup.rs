// ── Security groups and network interfaces ──

use armlink_api::types::{NetworkInterface, NetworkSecurityGroup};
use serde_json::{Value, json};
use tracing::info;

use crate::cloud::SecurityGroup;
use crate::error::CoreError;
use crate::region::Region;

pub(crate) const NSG_TYPE: &str = "Microsoft.Network/networkSecurityGroups";
pub(crate) const NIC_TYPE: &str = "Microsoft.Network/networkInterfaces";

/// Request for a NIC with one IP configuration.
#[derive(Debug, Clone, Copy)]
pub struct NicRequest<'a> {
    pub name: &'a str,
    pub subnet_id: &'a str,
    /// Static private address; dynamic allocation when `None`.
    pub private_ip: Option<&'a str>,
    pub security_group_id: Option<&'a str>,
    pub resource_group: &'a str,
}

fn nic_body(req: &NicRequest<'_>) -> Value {
    let mut ip_config = json!({
        "name": req.name,
        "properties": {
            "subnet": { "id": req.subnet_id },
            "privateIPAllocationMethod": "Dynamic",
        }
    });
    if let Some(ip) = req.private_ip.filter(|ip| !ip.is_empty()) {
        ip_config["properties"]["privateIPAllocationMethod"] = json!("Static");
        ip_config["properties"]["privateIPAddress"] = json!(ip);
    }
    let mut body = json!({
        "name": req.name,
        "type": NIC_TYPE,
        "properties": { "ipConfigurations": [ip_config] }
    });
    if let Some(group) = req.security_group_id.filter(|g| !g.is_empty()) {
        body["properties"]["networkSecurityGroup"] = json!({ "id": group });
    }
    body
}

impl Region {
    pub async fn list_security_groups(&self) -> Result<Vec<SecurityGroup>, CoreError> {
        let docs: Vec<NetworkSecurityGroup> = self.list_located(NSG_TYPE, &[]).await?;
        Ok(docs
            .into_iter()
            .map(|doc| SecurityGroup::new(self.clone(), doc))
            .collect())
    }

    pub async fn get_security_group(&self, id: &str) -> Result<SecurityGroup, CoreError> {
        let doc: NetworkSecurityGroup = self
            .client()
            .get(id, &[])
            .await
            .map_err(|e| CoreError::request("get security group", id, e))?;
        Ok(SecurityGroup::new(self.clone(), doc))
    }

    /// Create an empty security group; only the platform default rules apply.
    pub async fn create_security_group(
        &self,
        name: &str,
        resource_group: &str,
    ) -> Result<SecurityGroup, CoreError> {
        let body = json!({
            "name": name,
            "type": NSG_TYPE,
            "properties": { "securityRules": [] }
        });
        let doc: NetworkSecurityGroup = self.create_resource(resource_group, body).await?;
        Ok(SecurityGroup::new(self.clone(), doc))
    }

    pub async fn get_network_interface(&self, id: &str) -> Result<NetworkInterface, CoreError> {
        self.client()
            .get(id, &[])
            .await
            .map_err(|e| CoreError::request("get network interface", id, e))
    }

    pub async fn create_network_interface(
        &self,
        req: &NicRequest<'_>,
    ) -> Result<NetworkInterface, CoreError> {
        self.create_resource(req.resource_group, nic_body(req)).await
    }

    pub async fn delete_network_interface(&self, id: &str) -> Result<(), CoreError> {
        self.client()
            .del(id)
            .await
            .map_err(|e| CoreError::request("delete network interface", id, e))?;
        info!(nic = id, "network interface deleted");
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn request(ip: Option<&'static str>, group: Option<&'static str>) -> Value {
        nic_body(&NicRequest {
            name: "web-ipconfig",
            subnet_id: "/sub/vnet/subnets/default",
            private_ip: ip,
            security_group_id: group,
            resource_group: "rg",
        })
    }

    #[test]
    fn dynamic_nic_without_group() {
        let body = request(None, None);
        let cfg = &body["properties"]["ipConfigurations"][0]["properties"];
        assert_eq!(cfg["privateIPAllocationMethod"], "Dynamic");
        assert!(cfg.get("privateIPAddress").is_none());
        assert_eq!(cfg["subnet"]["id"], "/sub/vnet/subnets/default");
        assert!(body["properties"].get("networkSecurityGroup").is_none());
    }

    #[test]
    fn static_nic_with_group() {
        let body = request(Some("10.0.0.9"), Some("/sub/nsg/web"));
        let cfg = &body["properties"]["ipConfigurations"][0]["properties"];
        assert_eq!(cfg["privateIPAllocationMethod"], "Static");
        assert_eq!(cfg["privateIPAddress"], "10.0.0.9");
        assert_eq!(body["properties"]["networkSecurityGroup"]["id"], "/sub/nsg/web");
        assert_eq!(body["type"], NIC_TYPE);
    }
}
