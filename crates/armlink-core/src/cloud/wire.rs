use async_trait::async_trait;

use super::{ClassicVpc, Network, STATUS_AVAILABLE, Vpc};
use crate::capability::{CloudNetwork, CloudResource, CloudWire};
use crate::error::CoreError;

/// Nominal wire bandwidth in Mbps.
pub const WIRE_BANDWIDTH_MBPS: u32 = 10_000;

/// Wire identity: `<region-global-id>/<subscription>/<vpc-name>[-classic]`.
pub fn wire_id(region_global_id: &str, subscription_id: &str, vpc_name: &str, classic: bool) -> String {
    let suffix = if classic { "-classic" } else { "" };
    format!("{region_global_id}/{subscription_id}/{vpc_name}{suffix}")
}

#[derive(Debug, Clone)]
enum Backing {
    Modern(Vpc),
    Classic(ClassicVpc),
}

/// Synthetic link between a virtual network and the region's zone.
#[derive(Debug, Clone)]
pub struct Wire {
    vpc: Backing,
}

impl Wire {
    pub(crate) fn modern(vpc: Vpc) -> Self {
        Self {
            vpc: Backing::Modern(vpc),
        }
    }

    pub(crate) fn classic(vpc: ClassicVpc) -> Self {
        Self {
            vpc: Backing::Classic(vpc),
        }
    }

    pub fn is_classic(&self) -> bool {
        matches!(self.vpc, Backing::Classic(_))
    }

    pub fn vpc_id(&self) -> &str {
        match &self.vpc {
            Backing::Modern(v) => v.id(),
            Backing::Classic(v) => v.id(),
        }
    }

    pub fn vpc_name(&self) -> &str {
        match &self.vpc {
            Backing::Modern(v) => v.name(),
            Backing::Classic(v) => v.name(),
        }
    }

    pub fn id(&self) -> String {
        let region = match &self.vpc {
            Backing::Modern(v) => v.region(),
            Backing::Classic(v) => v.region(),
        };
        wire_id(
            &region.global_id(),
            region.subscription_id(),
            self.vpc_name(),
            self.is_classic(),
        )
    }

    pub fn networks(&self) -> Result<Vec<Network>, CoreError> {
        match &self.vpc {
            Backing::Modern(v) => v.networks(),
            Backing::Classic(v) => v.networks(),
        }
    }

    /// Add a subnet to the backing network. Classic networks cannot grow
    /// through ARM.
    pub async fn create_network(&self, name: &str, cidr: &str) -> Result<Network, CoreError> {
        match &self.vpc {
            Backing::Modern(v) => v.region().create_subnet(v.id(), name, cidr).await,
            Backing::Classic(_) => Err(CoreError::NotImplemented {
                operation: "create subnet on classic wire".into(),
            }),
        }
    }
}

impl CloudResource for Wire {
    fn id(&self) -> String {
        Wire::id(self)
    }

    fn name(&self) -> String {
        self.vpc_name().to_owned()
    }

    fn status(&self) -> String {
        STATUS_AVAILABLE.to_owned()
    }

    fn is_emulated(&self) -> bool {
        true
    }
}

#[async_trait]
impl CloudWire for Wire {
    fn bandwidth(&self) -> u32 {
        WIRE_BANDWIDTH_MBPS
    }

    fn vpc_id(&self) -> String {
        Wire::vpc_id(self).to_owned()
    }

    async fn networks(&self) -> Result<Vec<Box<dyn CloudNetwork>>, CoreError> {
        Ok(Wire::networks(self)?
            .into_iter()
            .map(|n| Box::new(n) as Box<dyn CloudNetwork>)
            .collect())
    }

    async fn create_network(
        &self,
        name: &str,
        cidr: &str,
    ) -> Result<Box<dyn CloudNetwork>, CoreError> {
        Ok(Box::new(Wire::create_network(self, name, cidr).await?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wire_id_is_pure() {
        let a = wire_id("azure-int/eastus", "sub-1", "vnet1", false);
        assert_eq!(a, "azure-int/eastus/sub-1/vnet1");
        assert_eq!(a, wire_id("azure-int/eastus", "sub-1", "vnet1", false));
        assert_eq!(
            wire_id("azure-int/eastus", "sub-1", "vnet1", true),
            "azure-int/eastus/sub-1/vnet1-classic"
        );
    }
}
