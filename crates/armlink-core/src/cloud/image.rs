use armlink_api::types::{Image as PrivateImage, VmImageVersion};
use serde::Serialize;
use strum::Display;

use super::STATUS_AVAILABLE;
use crate::capability::CloudResource;
use crate::model::OsType;
use crate::publisher::{self, ImageInfo};

const SUCCEEDED: &str = "Succeeded";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Display)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum ImageKind {
    /// A `Microsoft.Compute/images` resource in the subscription.
    Private,
    /// A `publisher/offer/sku/version` marketplace coordinate.
    Marketplace,
}

/// Split a marketplace id, `publisher/offer/sku/version` or the
/// `publisher:offer:sku:version` URN form.
pub fn parse_marketplace_id(id: &str) -> Option<[&str; 4]> {
    let sep = if id.contains(':') { ':' } else { '/' };
    let mut parts = id.split(sep);
    let out = [parts.next()?, parts.next()?, parts.next()?, parts.next()?];
    (parts.next().is_none() && out.iter().all(|p| !p.is_empty())).then_some(out)
}

/// Whether an image id names a private image resource.
pub fn is_private_id(id: &str) -> bool {
    id.trim_start_matches('/')
        .to_ascii_lowercase()
        .starts_with("subscriptions/")
}

/// A bootable image, private or marketplace.
#[derive(Debug, Clone, Serialize)]
pub struct Image {
    pub id: String,
    pub name: String,
    pub kind: ImageKind,
    pub os_type: OsType,
    /// Provisioning state for private images; always `Succeeded` for
    /// marketplace ones.
    pub state: String,
    pub size_gb: Option<u32>,
    /// Distribution metadata, marketplace images only.
    pub info: Option<ImageInfo>,
}

impl Image {
    pub(crate) fn private(doc: PrivateImage) -> Self {
        let os_disk = doc
            .properties
            .storage_profile
            .as_ref()
            .and_then(|s| s.os_disk.as_ref());
        Self {
            os_type: os_disk
                .and_then(|d| d.os_type.parse().ok())
                .unwrap_or_default(),
            size_gb: os_disk.and_then(|d| d.disk_size_gb),
            state: doc.properties.provisioning_state,
            kind: ImageKind::Private,
            id: doc.id,
            name: doc.name,
            info: None,
        }
    }

    /// A marketplace image, enriched from its version resource when known.
    pub(crate) fn marketplace(id: &str, parts: [&str; 4], detail: Option<&VmImageVersion>) -> Self {
        let [publisher, offer, sku, version] = parts;
        let info = publisher::describe(publisher, offer, sku, version);
        let disk = detail.and_then(|d| d.properties.os_disk_image.as_ref());
        Self {
            id: id.to_owned(),
            name: info.name.clone(),
            kind: ImageKind::Marketplace,
            os_type: disk
                .and_then(|d| d.operating_system.parse().ok())
                .unwrap_or(info.os_type),
            state: SUCCEEDED.to_owned(),
            size_gb: disk.and_then(|d| d.size_in_gb),
            info: Some(info),
        }
    }

    pub fn is_available(&self) -> bool {
        self.kind == ImageKind::Marketplace || self.state.eq_ignore_ascii_case(SUCCEEDED)
    }
}

impl CloudResource for Image {
    fn id(&self) -> String {
        self.id.clone()
    }

    fn name(&self) -> String {
        self.name.clone()
    }

    fn status(&self) -> String {
        if self.is_available() {
            STATUS_AVAILABLE.to_owned()
        } else {
            self.state.to_lowercase()
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use armlink_api::types::{ImageOsDisk, ImageProperties, ImageStorageProfile};

    use super::*;

    fn private(state: &str) -> Image {
        Image::private(PrivateImage {
            id: "/subscriptions/s/resourceGroups/rg/providers/Microsoft.Compute/images/golden".into(),
            name: "golden".into(),
            properties: ImageProperties {
                provisioning_state: state.into(),
                storage_profile: Some(ImageStorageProfile {
                    os_disk: Some(ImageOsDisk {
                        os_type: "Windows".into(),
                        disk_size_gb: Some(127),
                        ..Default::default()
                    }),
                }),
                ..Default::default()
            },
            ..Default::default()
        })
    }

    #[test]
    fn private_image_available_only_when_succeeded() {
        let ready = private("Succeeded");
        assert!(ready.is_available());
        assert_eq!(ready.os_type, OsType::Windows);
        assert_eq!(ready.size_gb, Some(127));
        assert_eq!(ready.status(), "available");

        let pending = private("Creating");
        assert!(!pending.is_available());
        assert_eq!(pending.status(), "creating");
    }

    #[test]
    fn marketplace_image_is_always_available() {
        let id = "Canonical/UbuntuServer/18.04-LTS/latest";
        let parts = parse_marketplace_id(id).unwrap();
        let image = Image::marketplace(id, parts, None);
        assert!(image.is_available());
        assert_eq!(image.kind, ImageKind::Marketplace);
        assert_eq!(image.os_type, OsType::Linux);
        assert_eq!(image.global_id(), id.to_lowercase());
    }

    #[test]
    fn marketplace_id_forms() {
        assert_eq!(
            parse_marketplace_id("RedHat:RHEL:8:latest"),
            Some(["RedHat", "RHEL", "8", "latest"])
        );
        assert!(parse_marketplace_id("RedHat/RHEL/8").is_none());
        assert!(parse_marketplace_id("a/b//c").is_none());
        assert!(is_private_id("/subscriptions/s/resourceGroups/rg"));
        assert!(!is_private_id("RedHat/RHEL/8/latest"));
    }
}
