// Resource tags via the `Microsoft.Resources/tags` extension resource.

use std::collections::HashMap;

use serde_json::Value;
use tracing::debug;

use crate::types::{TagProperties, TagsResource};
use crate::{ArmClient, Error};

const RESERVED_PREFIXES: [&str; 3] = ["microsoft", "azure", "windows"];

/// How `set_tags` combines new tags with existing ones.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum TagMode {
    /// The given map becomes the complete tag set.
    #[default]
    Replace,
    /// Existing tags are kept unless overridden.
    Merge,
}

fn tags_path(id: &str) -> String {
    format!(
        "{}/providers/Microsoft.Resources/tags/default",
        id.trim_end_matches('/')
    )
}

fn check_reserved(tags: &HashMap<String, String>) -> Result<(), Error> {
    match tags.keys().find(|k| {
        let lowered = k.to_ascii_lowercase();
        RESERVED_PREFIXES.iter().any(|p| lowered.starts_with(p))
    }) {
        Some(key) => Err(Error::ReservedTagKey { key: key.clone() }),
        None => Ok(()),
    }
}

impl ArmClient {
    /// Read the tags of a resource.
    pub async fn get_tags(&self, id: &str) -> Result<HashMap<String, String>, Error> {
        let doc: TagsResource = self.get(&tags_path(id), &[]).await?;
        Ok(doc.properties.tags)
    }

    /// Write the tags of a resource and return the resulting set.
    pub async fn set_tags(
        &self,
        id: &str,
        tags: &HashMap<String, String>,
        mode: TagMode,
    ) -> Result<HashMap<String, String>, Error> {
        check_reserved(tags)?;

        let combined = match mode {
            TagMode::Replace => tags.clone(),
            TagMode::Merge => {
                let mut existing = match self.get_tags(id).await {
                    Ok(existing) => existing,
                    Err(e) if e.is_not_found() => HashMap::new(),
                    Err(e) => return Err(e),
                };
                existing.extend(tags.iter().map(|(k, v)| (k.clone(), v.clone())));
                existing
            }
        };

        let path = tags_path(id);
        if combined.is_empty() {
            debug!("clearing tags on {id}");
            self.del(&path).await?;
            return Ok(combined);
        }

        let body = TagsResource {
            operation: "replace".into(),
            properties: TagProperties { tags: combined },
        };
        let resp: Value = self.patch(&path, &body).await?;
        let written = serde_json::from_value::<TagsResource>(resp)
            .map(|doc| doc.properties.tags)
            .unwrap_or_default();
        if written.is_empty() {
            Ok(body.properties.tags)
        } else {
            Ok(written)
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn reserved_prefixes_rejected() {
        let tags = HashMap::from([("Azure-owner".to_owned(), "x".to_owned())]);
        let err = check_reserved(&tags).unwrap_err();
        assert!(matches!(err, Error::ReservedTagKey { key } if key == "Azure-owner"));

        let ok = HashMap::from([("team".to_owned(), "net".to_owned())]);
        assert!(check_reserved(&ok).is_ok());
    }

    #[test]
    fn tags_path_is_relative_to_resource() {
        assert_eq!(
            tags_path("/subscriptions/s/resourceGroups/rg/providers/Microsoft.Network/virtualNetworks/v/"),
            "/subscriptions/s/resourceGroups/rg/providers/Microsoft.Network/virtualNetworks/v/providers/Microsoft.Resources/tags/default"
        );
    }
}
