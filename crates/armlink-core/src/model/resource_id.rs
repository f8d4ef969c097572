// ── ARM resource identities ──
//
// ARM ids are hierarchical paths:
// `/subscriptions/{sub}/resourceGroups/{rg}/providers/{ns}/{type}/{name}[/{child}/{name}...]`.
// Segment keys are case-insensitive on the wire, so lookups compare them
// lowercased while values keep their original casing.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// Capability-boundary identity: the lowercased ARM id.
pub fn global_id(id: &str) -> String {
    id.to_lowercase()
}

/// Lowercased resource group of an ARM id, empty when the id has none.
pub fn project_id(id: &str) -> String {
    segment_after(id, "resourcegroups")
        .map(str::to_lowercase)
        .unwrap_or_default()
}

fn segment_after<'a>(id: &'a str, key: &str) -> Option<&'a str> {
    let mut segments = id.split('/').filter(|s| !s.is_empty());
    while let Some(segment) = segments.next() {
        if segment.eq_ignore_ascii_case(key) {
            return segments.next();
        }
    }
    None
}

/// A parsed ARM resource id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceId {
    pub subscription_id: String,
    pub resource_group: Option<String>,
    /// Provider namespace, e.g. `Microsoft.Network`.
    pub namespace: Option<String>,
    /// Type path below the namespace, e.g. `virtualNetworks/subnets`.
    pub resource_type: Option<String>,
    /// Last name segment.
    pub name: Option<String>,
    raw: String,
}

impl ResourceId {
    pub fn as_str(&self) -> &str {
        &self.raw
    }

    pub fn global_id(&self) -> String {
        global_id(&self.raw)
    }

    /// Id of the enclosing resource, `None` for top-level resources.
    ///
    /// `.../virtualNetworks/vnet/subnets/a` → `.../virtualNetworks/vnet`.
    pub fn parent(&self) -> Option<String> {
        let type_depth = self.resource_type.as_deref()?.split('/').count();
        if type_depth < 2 {
            return None;
        }
        let trimmed = self.raw.trim_end_matches('/');
        let mut cut = trimmed.len();
        for _ in 0..2 {
            cut = trimmed[..cut].rfind('/')?;
        }
        Some(trimmed[..cut].to_owned())
    }
}

impl fmt::Display for ResourceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}

impl FromStr for ResourceId {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || CoreError::InvalidInput {
            message: format!("'{s}' is not an ARM resource id"),
        };
        let segments: Vec<&str> = s.split('/').filter(|seg| !seg.is_empty()).collect();
        let (key, subscription_id) = match segments.as_slice() {
            [key, sub, ..] => (*key, *sub),
            _ => return Err(invalid()),
        };
        if !key.eq_ignore_ascii_case("subscriptions") {
            return Err(invalid());
        }

        let resource_group = segment_after(s, "resourcegroups").map(str::to_owned);
        let mut namespace = None;
        let mut resource_type = None;
        let mut name = None;

        if let Some(pos) = segments
            .iter()
            .position(|seg| seg.eq_ignore_ascii_case("providers"))
        {
            let rest = segments.get(pos + 1..).unwrap_or_default();
            if let Some((ns, pairs)) = rest.split_first() {
                namespace = Some((*ns).to_owned());
                let types: Vec<&str> = pairs.iter().step_by(2).copied().collect();
                if !types.is_empty() {
                    resource_type = Some(types.join("/"));
                }
                name = pairs.iter().skip(1).step_by(2).last().map(|n| (*n).to_owned());
            }
        } else if resource_group.is_some() {
            name.clone_from(&resource_group);
        }

        Ok(Self {
            subscription_id: subscription_id.to_owned(),
            resource_group,
            namespace,
            resource_type,
            name,
            raw: s.to_owned(),
        })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    const SUBNET: &str = "/subscriptions/sub-1/resourceGroups/Net-RG/providers/Microsoft.Network/virtualNetworks/vnet1/subnets/Front";

    #[test]
    fn project_id_is_lowercased_group() {
        assert_eq!(project_id(SUBNET), "net-rg");
        assert_eq!(
            project_id("/subscriptions/s/resourcegroups/Other/providers/x/y/z"),
            "other"
        );
        assert_eq!(project_id("/subscriptions/s/providers/Microsoft.Web/sites"), "");
    }

    #[test]
    fn global_id_folds_case() {
        assert_eq!(
            global_id(SUBNET),
            "/subscriptions/sub-1/resourcegroups/net-rg/providers/microsoft.network/virtualnetworks/vnet1/subnets/front"
        );
    }

    #[test]
    fn parses_nested_id() {
        let id: ResourceId = SUBNET.parse().unwrap();
        assert_eq!(id.subscription_id, "sub-1");
        assert_eq!(id.resource_group.as_deref(), Some("Net-RG"));
        assert_eq!(id.namespace.as_deref(), Some("Microsoft.Network"));
        assert_eq!(id.resource_type.as_deref(), Some("virtualNetworks/subnets"));
        assert_eq!(id.name.as_deref(), Some("Front"));
        assert_eq!(
            id.parent().as_deref(),
            Some("/subscriptions/sub-1/resourceGroups/Net-RG/providers/Microsoft.Network/virtualNetworks/vnet1")
        );
    }

    #[test]
    fn top_level_has_no_parent() {
        let id: ResourceId = "/subscriptions/s/resourceGroups/rg/providers/Microsoft.Network/networkSecurityGroups/g"
            .parse()
            .unwrap();
        assert_eq!(id.parent(), None);
        assert_eq!(id.name.as_deref(), Some("g"));
    }

    #[test]
    fn rejects_foreign_paths() {
        assert!("/tenants/t/providers/x".parse::<ResourceId>().is_err());
        assert!("".parse::<ResourceId>().is_err());
    }
}
