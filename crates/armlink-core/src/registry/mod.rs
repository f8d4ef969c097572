// ── Resource registry ──
//
// Typed listings and single-id lookups per resource family, as `impl Region`
// blocks. Listings keep only entries located in the region (or carrying no
// location); the entities returned hold a clone of the region so later
// calls need no extra context.

mod compute;
mod network;
mod project;
mod secgroup;
mod web;

pub(crate) use compute::VM_TYPE;
pub use network::is_classic_id;
pub use secgroup::NicRequest;

use armlink_api::types::{
    AppServicePlan, ClassicVirtualNetwork, Image, NetworkSecurityGroup, Site, VirtualMachine,
    VirtualNetwork,
};
use serde::de::DeserializeOwned;

use crate::error::CoreError;
use crate::region::Region;

/// ARM documents that carry a `location`.
pub(crate) trait Located {
    fn location(&self) -> &str;
}

macro_rules! located {
    ($($ty:ty),+ $(,)?) => {
        $(impl Located for $ty {
            fn location(&self) -> &str {
                &self.location
            }
        })+
    };
}

located!(
    VirtualNetwork,
    ClassicVirtualNetwork,
    NetworkSecurityGroup,
    VirtualMachine,
    Image,
    AppServicePlan,
    Site,
);

impl Region {
    /// List a resource type and keep the entries belonging to this region.
    pub(crate) async fn list_located<T>(
        &self,
        resource: &str,
        params: &[(&str, &str)],
    ) -> Result<Vec<T>, CoreError>
    where
        T: DeserializeOwned + Located,
    {
        let items: Vec<T> = self
            .client()
            .list(resource, params)
            .await
            .map_err(|e| CoreError::request("list", resource, e))?;
        Ok(items
            .into_iter()
            .filter(|item| self.in_region(item.location()))
            .collect())
    }
}
