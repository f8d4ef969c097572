// ── Virtual networks and subnets ──

use armlink_api::types::{ClassicVirtualNetwork, Subnet, VirtualNetwork};
use serde_json::json;
use tracing::{debug, info};

use crate::cidr::SubnetRange;
use crate::cloud::{ClassicVpc, Network, Vpc};
use crate::error::CoreError;
use crate::model::ResourceId;
use crate::region::Region;

pub(crate) const VNET_TYPE: &str = "Microsoft.Network/virtualNetworks";
pub(crate) const CLASSIC_VNET_TYPE: &str = "Microsoft.ClassicNetwork/virtualNetworks";

/// Whether an id belongs to a classic network or one of its subnets.
pub fn is_classic_id(id: &str) -> bool {
    id.to_ascii_lowercase()
        .contains("/providers/microsoft.classicnetwork/")
}

impl Region {
    // ── Modern ───────────────────────────────────────────────────────

    pub async fn list_vpcs(&self) -> Result<Vec<Vpc>, CoreError> {
        let docs: Vec<VirtualNetwork> = self.list_located(VNET_TYPE, &[]).await?;
        Ok(docs.into_iter().map(|doc| Vpc::new(self.clone(), doc)).collect())
    }

    pub async fn get_vpc(&self, id: &str) -> Result<Vpc, CoreError> {
        let doc: VirtualNetwork = self
            .client()
            .get(id, &[])
            .await
            .map_err(|e| CoreError::request("get vpc", id, e))?;
        Ok(Vpc::new(self.clone(), doc))
    }

    /// Create a virtual network with a single address prefix.
    pub async fn create_vpc(
        &self,
        name: &str,
        cidr: &str,
        resource_group: &str,
    ) -> Result<Vpc, CoreError> {
        cidr.parse::<SubnetRange>()?;
        let body = json!({
            "name": name,
            "location": self.name(),
            "type": VNET_TYPE,
            "properties": {
                "addressSpace": { "addressPrefixes": [cidr] }
            }
        });
        let doc: VirtualNetwork = self.create_resource(resource_group, body).await?;
        Ok(Vpc::new(self.clone(), doc))
    }

    pub async fn delete_vpc(&self, id: &str) -> Result<(), CoreError> {
        self.client()
            .del(id)
            .await
            .map_err(|e| CoreError::request("delete vpc", id, e))?;
        info!(vpc = id, "vpc deleted");
        Ok(())
    }

    /// Add a subnet to an existing virtual network.
    pub async fn create_subnet(
        &self,
        vpc_id: &str,
        name: &str,
        cidr: &str,
    ) -> Result<Network, CoreError> {
        cidr.parse::<SubnetRange>()?;
        let vpc = self.get_vpc(vpc_id).await?;
        let path = format!("{}/subnets/{name}", vpc_id.trim_end_matches('/'));
        let body = json!({
            "name": name,
            "properties": { "addressPrefix": cidr }
        });
        let subnet: Subnet = self
            .client()
            .put(&path, &body)
            .await
            .map_err(|e| CoreError::request("create subnet", &path, e))?;
        info!(subnet = %subnet.id, "subnet created");
        Network::from_subnet(&vpc, &subnet)
    }

    // ── Classic ──────────────────────────────────────────────────────

    /// Classic networks; a subscription without the classic provider
    /// registered has none.
    pub async fn list_classic_vpcs(&self) -> Result<Vec<ClassicVpc>, CoreError> {
        match self
            .list_located::<ClassicVirtualNetwork>(CLASSIC_VNET_TYPE, &[])
            .await
        {
            Ok(docs) => Ok(docs
                .into_iter()
                .map(|doc| ClassicVpc::new(self.clone(), doc))
                .collect()),
            Err(e) if e.is_not_found() => {
                debug!("classic network provider unavailable");
                Ok(Vec::new())
            }
            Err(e) => Err(e),
        }
    }

    pub async fn get_classic_vpc(&self, id: &str) -> Result<ClassicVpc, CoreError> {
        let doc: ClassicVirtualNetwork = self
            .client()
            .get(id, &[])
            .await
            .map_err(|e| CoreError::request("get classic vpc", id, e))?;
        Ok(ClassicVpc::new(self.clone(), doc))
    }

    // ── Subnets ──────────────────────────────────────────────────────

    /// Resolve a subnet id, modern (`.../subnets/<name>`) or classic
    /// (`<vpc-id>/<name>`), through its owning network.
    pub async fn get_subnet(&self, id: &str) -> Result<Network, CoreError> {
        let networks = if is_classic_id(id) {
            let (vpc_id, _) = id
                .rsplit_once('/')
                .ok_or_else(|| CoreError::not_found("network", id))?;
            self.get_classic_vpc(vpc_id).await?.networks()?
        } else {
            let vpc_id = id
                .parse::<ResourceId>()?
                .parent()
                .ok_or_else(|| CoreError::not_found("network", id))?;
            self.get_vpc(&vpc_id).await?.networks()?
        };
        let wanted = id.to_lowercase();
        networks
            .into_iter()
            .find(|n| n.global_id() == wanted)
            .ok_or_else(|| CoreError::not_found("network", id))
    }
}
