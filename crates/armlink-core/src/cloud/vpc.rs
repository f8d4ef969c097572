// Modern and classic virtual networks. Their documents differ (classic
// subnets carry no id, classic networks report `status` instead of a
// provisioning state), so each keeps its own payload and both implement
// `CloudVpc`.

use armlink_api::types::{ClassicVirtualNetwork, VirtualNetwork};
use async_trait::async_trait;
use tracing::debug;

use super::{Network, Wire, provisioning_status};
use crate::capability::{CloudNetwork, CloudResource, CloudVpc, CloudWire};
use crate::error::CoreError;
use crate::region::Region;

fn boxed_networks(networks: Vec<Network>) -> Vec<Box<dyn CloudNetwork>> {
    networks
        .into_iter()
        .map(|n| Box::new(n) as Box<dyn CloudNetwork>)
        .collect()
}

// ── Modern ──────────────────────────────────────────────────────────

/// A `Microsoft.Network/virtualNetworks` resource.
#[derive(Debug, Clone)]
pub struct Vpc {
    region: Region,
    doc: VirtualNetwork,
}

impl Vpc {
    pub(crate) fn new(region: Region, doc: VirtualNetwork) -> Self {
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

    pub fn document(&self) -> &VirtualNetwork {
        &self.doc
    }

    pub fn address_prefixes(&self) -> &[String] {
        &self.doc.properties.address_space.address_prefixes
    }

    pub fn cidr(&self) -> &str {
        self.address_prefixes().first().map_or("", String::as_str)
    }

    pub fn wire(&self) -> Wire {
        Wire::modern(self.clone())
    }

    /// Subnets with an IPv4 prefix. IPv6-only subnets are skipped.
    pub fn networks(&self) -> Result<Vec<Network>, CoreError> {
        self.doc
            .properties
            .subnets
            .iter()
            .filter(|subnet| {
                let v4 = subnet.properties.ipv4_prefix().is_some();
                if !v4 {
                    debug!(subnet = %subnet.id, "skipping subnet without an IPv4 prefix");
                }
                v4
            })
            .map(|subnet| Network::from_subnet(self, subnet))
            .collect()
    }

    pub async fn delete(&self) -> Result<(), CoreError> {
        self.region.delete_vpc(self.id()).await
    }
}

impl CloudResource for Vpc {
    fn id(&self) -> String {
        self.doc.id.clone()
    }

    fn name(&self) -> String {
        self.doc.name.clone()
    }

    fn status(&self) -> String {
        provisioning_status(&self.doc.properties.provisioning_state)
    }
}

#[async_trait]
impl CloudVpc for Vpc {
    fn cidr(&self) -> String {
        Vpc::cidr(self).to_owned()
    }

    fn is_classic(&self) -> bool {
        false
    }

    async fn wires(&self) -> Result<Vec<Box<dyn CloudWire>>, CoreError> {
        Ok(vec![Box::new(self.wire())])
    }

    async fn networks(&self) -> Result<Vec<Box<dyn CloudNetwork>>, CoreError> {
        Ok(boxed_networks(Vpc::networks(self)?))
    }

    async fn delete(&self) -> Result<(), CoreError> {
        Vpc::delete(self).await
    }
}

// ── Classic ─────────────────────────────────────────────────────────

/// A `Microsoft.ClassicNetwork/virtualNetworks` resource.
#[derive(Debug, Clone)]
pub struct ClassicVpc {
    region: Region,
    doc: ClassicVirtualNetwork,
}

impl ClassicVpc {
    pub(crate) fn new(region: Region, doc: ClassicVirtualNetwork) -> Self {
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

    pub fn document(&self) -> &ClassicVirtualNetwork {
        &self.doc
    }

    pub fn cidr(&self) -> &str {
        self.doc
            .properties
            .address_space
            .address_prefixes
            .first()
            .map_or("", String::as_str)
    }

    pub fn wire(&self) -> Wire {
        Wire::classic(self.clone())
    }

    /// Subnets get synthesized ids `<vpc-id>/<name>`.
    pub fn networks(&self) -> Result<Vec<Network>, CoreError> {
        self.doc
            .properties
            .subnets
            .iter()
            .map(|subnet| Network::from_classic(self, subnet))
            .collect()
    }
}

impl CloudResource for ClassicVpc {
    fn id(&self) -> String {
        self.doc.id.clone()
    }

    fn name(&self) -> String {
        self.doc.name.clone()
    }

    fn status(&self) -> String {
        let p = &self.doc.properties;
        let state = if p.status.is_empty() {
            &p.provisioning_state
        } else {
            &p.status
        };
        provisioning_status(state)
    }
}

#[async_trait]
impl CloudVpc for ClassicVpc {
    fn cidr(&self) -> String {
        ClassicVpc::cidr(self).to_owned()
    }

    fn is_classic(&self) -> bool {
        true
    }

    async fn wires(&self) -> Result<Vec<Box<dyn CloudWire>>, CoreError> {
        Ok(vec![Box::new(self.wire())])
    }

    async fn networks(&self) -> Result<Vec<Box<dyn CloudNetwork>>, CoreError> {
        Ok(boxed_networks(ClassicVpc::networks(self)?))
    }

    async fn delete(&self) -> Result<(), CoreError> {
        Err(CoreError::NotSupported {
            operation: "delete classic vpc".into(),
        })
    }
}
