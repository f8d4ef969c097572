// Subscription-level operations: locations, resource groups, and names.

use serde_json::json;
use tracing::{debug, info};

use crate::types::{Location, NameAvailability, ResourceGroup};
use crate::{ArmClient, Error};

const UNIQUE_NAME_ATTEMPTS: usize = 20;

/// Next candidate in the `name`, `name-1`, `name-2`, ... sequence.
fn next_candidate(name: &str) -> String {
    match name.rsplit_once('-') {
        Some((stem, n)) => match n.parse::<u64>() {
            Ok(n) => format!("{stem}-{}", n + 1),
            Err(_) => format!("{name}-1"),
        },
        None => format!("{name}-1"),
    }
}

impl ArmClient {
    /// Every location visible to the subscription.
    pub async fn list_locations(&self) -> Result<Vec<Location>, Error> {
        self.list("locations", &[]).await
    }

    pub async fn list_resource_groups(&self) -> Result<Vec<ResourceGroup>, Error> {
        self.list("resourcegroups", &[]).await
    }

    pub async fn get_resource_group(&self, name: &str) -> Result<ResourceGroup, Error> {
        let path = format!(
            "subscriptions/{}/resourcegroups/{name}",
            self.subscription_id()
        );
        self.get(&path, &[]).await
    }

    /// Create (or update) a resource group in `location`.
    pub async fn create_resource_group(
        &self,
        name: &str,
        location: &str,
    ) -> Result<ResourceGroup, Error> {
        let path = format!(
            "subscriptions/{}/resourcegroups/{name}",
            self.subscription_id()
        );
        let group = self.put(&path, &json!({ "location": location })).await?;
        info!("created resource group {name} in {location}");
        Ok(group)
    }

    /// Ask the owning provider whether `name` is free for `resource_type`.
    ///
    /// Only an `AlreadyExists` reason counts as taken; other refusals (such
    /// as `Invalid`) are left for the create call to report.
    pub async fn check_name_availability(
        &self,
        resource_type: &str,
        name: &str,
    ) -> Result<bool, Error> {
        let namespace = resource_type.split('/').next().unwrap_or(resource_type);
        let path = format!(
            "subscriptions/{}/providers/{namespace}/checkNameAvailability",
            self.subscription_id()
        );
        let body = json!({ "Name": name, "Type": resource_type });
        let output: NameAvailability = self.post(&path, &body).await?;
        Ok(output.name_available || output.reason.as_deref() != Some("AlreadyExists"))
    }

    /// Find a name not yet used in `resource_group`, trying `name`, then
    /// `name-1`, `name-2`, and so on.
    pub async fn unique_name(
        &self,
        resource_group: &str,
        resource_type: &str,
        name: &str,
    ) -> Result<String, Error> {
        let prefix = format!(
            "subscriptions/{}/resourceGroups/{resource_group}/providers/{resource_type}",
            self.subscription_id()
        );
        let mut candidate = name.to_owned();
        for _ in 0..UNIQUE_NAME_ATTEMPTS {
            match self
                .get::<serde_json::Value>(&format!("{prefix}/{candidate}"), &[])
                .await
            {
                Err(e) if e.is_not_found() => return Ok(candidate),
                Err(e) => return Err(e),
                Ok(_) => {
                    debug!("{resource_type} {candidate} exists in {resource_group}");
                    candidate = next_candidate(&candidate);
                }
            }
        }
        Err(Error::InvalidRequest {
            message: format!("no unique name found for {resource_type} [{name}]"),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn candidate_sequence() {
        assert_eq!(next_candidate("web"), "web-1");
        assert_eq!(next_candidate("web-1"), "web-2");
        assert_eq!(next_candidate("web-09"), "web-10");
        assert_eq!(next_candidate("my-web"), "my-web-1");
    }
}
