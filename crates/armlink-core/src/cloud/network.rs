use armlink_api::types::{ClassicSubnet, Subnet};
use async_trait::async_trait;
use tracing::info;

use super::{ClassicVpc, Vpc, provisioning_status, wire_id};
use crate::capability::{CloudNetwork, CloudResource};
use crate::cidr::SubnetRange;
use crate::error::CoreError;
use crate::region::Region;

/// Seconds to wait for an IP allocation on a subnet.
pub const ALLOCATION_TIMEOUT_SECS: u64 = 120;

/// A subnet of a modern or classic virtual network.
#[derive(Debug, Clone)]
pub struct Network {
    region: Region,
    id: String,
    name: String,
    cidr: String,
    range: SubnetRange,
    status: String,
    vpc_id: String,
    vpc_name: String,
    classic: bool,
    security_group_id: Option<String>,
}

impl Network {
    pub(crate) fn from_subnet(vpc: &Vpc, subnet: &Subnet) -> Result<Self, CoreError> {
        let cidr = subnet
            .properties
            .ipv4_prefix()
            .ok_or_else(|| CoreError::InvalidInput {
                message: format!("subnet '{}' has no IPv4 prefix", subnet.name),
            })?
            .to_owned();
        Ok(Self {
            region: vpc.region().clone(),
            id: subnet.id.clone(),
            name: subnet.name.clone(),
            range: cidr.parse()?,
            cidr,
            status: provisioning_status(&subnet.properties.provisioning_state),
            vpc_id: vpc.id().to_owned(),
            vpc_name: vpc.name().to_owned(),
            classic: false,
            security_group_id: subnet
                .properties
                .network_security_group
                .as_ref()
                .map(|sg| sg.id.to_lowercase()),
        })
    }

    pub(crate) fn from_classic(vpc: &ClassicVpc, subnet: &ClassicSubnet) -> Result<Self, CoreError> {
        Ok(Self {
            region: vpc.region().clone(),
            id: format!("{}/{}", vpc.id(), subnet.name),
            name: subnet.name.clone(),
            range: subnet.address_prefix.parse()?,
            cidr: subnet.address_prefix.clone(),
            status: super::STATUS_AVAILABLE.to_owned(),
            vpc_id: vpc.id().to_owned(),
            vpc_name: vpc.name().to_owned(),
            classic: true,
            security_group_id: None,
        })
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn global_id(&self) -> String {
        self.id.to_lowercase()
    }

    pub fn cidr(&self) -> &str {
        &self.cidr
    }

    pub fn range(&self) -> &SubnetRange {
        &self.range
    }

    pub fn vpc_id(&self) -> &str {
        &self.vpc_id
    }

    pub fn is_classic(&self) -> bool {
        self.classic
    }

    /// Lowercased id of the attached security group, modern subnets only.
    pub fn security_group_id(&self) -> Option<&str> {
        self.security_group_id.as_deref()
    }

    pub fn wire_id(&self) -> String {
        wire_id(
            &self.region.global_id(),
            self.region.subscription_id(),
            &self.vpc_name,
            self.classic,
        )
    }

    pub async fn delete(&self) -> Result<(), CoreError> {
        if self.classic {
            return Err(CoreError::NotImplemented {
                operation: "delete classic subnet".into(),
            });
        }
        self.region
            .client()
            .del(&self.id)
            .await
            .map_err(|e| CoreError::request("delete subnet", &self.id, e))?;
        info!(subnet = %self.id, "subnet deleted");
        Ok(())
    }
}

impl CloudResource for Network {
    fn id(&self) -> String {
        self.id.clone()
    }

    fn name(&self) -> String {
        self.name.clone()
    }

    fn status(&self) -> String {
        self.status.clone()
    }
}

#[async_trait]
impl CloudNetwork for Network {
    fn cidr(&self) -> String {
        self.cidr.clone()
    }

    fn gateway(&self) -> String {
        self.range.gateway.to_string()
    }

    fn ip_start(&self) -> String {
        self.range.ip_start.to_string()
    }

    fn ip_end(&self) -> String {
        self.range.ip_end.to_string()
    }

    fn mask(&self) -> u8 {
        self.range.mask
    }

    fn wire_id(&self) -> String {
        Network::wire_id(self)
    }

    fn allocation_timeout_secs(&self) -> u64 {
        ALLOCATION_TIMEOUT_SECS
    }

    async fn delete(&self) -> Result<(), CoreError> {
        Network::delete(self).await
    }
}
