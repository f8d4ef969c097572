// ── Resource groups and tags ──

use std::collections::HashMap;

use armlink_api::TagMode;
use armlink_api::types::ResourceGroup;

use crate::error::CoreError;
use crate::region::Region;

impl Region {
    /// Resource groups located in this region.
    pub async fn list_resource_groups(&self) -> Result<Vec<ResourceGroup>, CoreError> {
        let groups = self
            .client()
            .list_resource_groups()
            .await
            .map_err(|e| CoreError::request("list resource groups", self.subscription_id(), e))?;
        Ok(groups
            .into_iter()
            .filter(|g| self.in_region(&g.location))
            .collect())
    }

    pub async fn get_tags(&self, id: &str) -> Result<HashMap<String, String>, CoreError> {
        self.client()
            .get_tags(id)
            .await
            .map_err(|e| CoreError::request("get tags", id, e))
    }

    /// Write tags and return the resulting set.
    pub async fn set_tags(
        &self,
        id: &str,
        tags: &HashMap<String, String>,
        mode: TagMode,
    ) -> Result<HashMap<String, String>, CoreError> {
        self.client()
            .set_tags(id, tags, mode)
            .await
            .map_err(|e| CoreError::request("set tags", id, e))
    }
}
