// ── Virtual machines, sizes and images ──

use armlink_api::types::{Image as PrivateImage, ImageArtifact, VirtualMachine, VmImageVersion, VmSize};
use tracing::debug;

use crate::cloud::{Image, Instance, is_private_id, parse_marketplace_id};
use crate::error::CoreError;
use crate::region::Region;

pub(crate) const VM_TYPE: &str = "Microsoft.Compute/virtualMachines";
pub(crate) const IMAGE_TYPE: &str = "Microsoft.Compute/images";

const EXPAND_INSTANCE_VIEW: [(&str, &str); 1] = [("$expand", "instanceView")];

impl Region {
    fn compute_location_path(&self, suffix: &str) -> String {
        format!("Microsoft.Compute/locations/{}/{suffix}", self.name())
    }

    fn image_catalog_path(&self, suffix: &str) -> String {
        format!(
            "subscriptions/{}/providers/{}",
            self.subscription_id(),
            self.compute_location_path(&format!("publishers{suffix}"))
        )
    }

    /// Wrap a VM document, fetching its instance view when the listing left
    /// it out. `None` when the VM was deleted since the listing; any other
    /// refetch failure keeps the listed document.
    async fn instance_with_view(&self, doc: VirtualMachine) -> Option<Instance> {
        if doc.properties.instance_view.is_some() {
            return Some(Instance::new(self.clone(), doc));
        }
        match self.get_instance(&doc.id).await {
            Ok(instance) => Some(instance),
            Err(e) if e.is_not_found() => {
                debug!(vm = %doc.id, "vm disappeared after listing");
                None
            }
            Err(e) => {
                debug!(vm = %doc.id, error = %e, "instance view unavailable");
                Some(Instance::new(self.clone(), doc))
            }
        }
    }

    // ── Instances ────────────────────────────────────────────────────

    pub async fn list_instances(&self) -> Result<Vec<Instance>, CoreError> {
        let docs: Vec<VirtualMachine> = self
            .list_located(&self.compute_location_path("virtualMachines"), &[])
            .await?;
        let mut instances = Vec::with_capacity(docs.len());
        for doc in docs {
            if let Some(instance) = self.instance_with_view(doc).await {
                instances.push(instance);
            }
        }
        Ok(instances)
    }

    pub async fn get_instance(&self, id: &str) -> Result<Instance, CoreError> {
        let doc: VirtualMachine = self
            .client()
            .get(id, &EXPAND_INSTANCE_VIEW)
            .await
            .map_err(|e| CoreError::request("get vm", id, e))?;
        Ok(Instance::new(self.clone(), doc))
    }

    // ── Sizes ────────────────────────────────────────────────────────

    pub async fn list_vm_sizes(&self) -> Result<Vec<VmSize>, CoreError> {
        let path = self.compute_location_path("vmSizes");
        self.client()
            .list(&path, &[])
            .await
            .map_err(|e| CoreError::request("list vm sizes", &path, e))
    }

    /// Names of the VM sizes with exactly `cpu` cores and `memory_mb` memory.
    pub async fn hardware_profiles(&self, cpu: u32, memory_mb: u64) -> Result<Vec<String>, CoreError> {
        Ok(self
            .list_vm_sizes()
            .await?
            .into_iter()
            .filter(|s| s.number_of_cores == cpu && s.memory_in_mb == memory_mb)
            .map(|s| s.name)
            .collect())
    }

    // ── Images ───────────────────────────────────────────────────────

    /// Private images located in this region.
    pub async fn list_images(&self) -> Result<Vec<Image>, CoreError> {
        let docs: Vec<PrivateImage> = self.list_located(IMAGE_TYPE, &[]).await?;
        Ok(docs.into_iter().map(Image::private).collect())
    }

    /// Resolve a private image id or a marketplace coordinate.
    pub async fn get_image(&self, id: &str) -> Result<Image, CoreError> {
        if is_private_id(id) {
            let doc: PrivateImage = self
                .client()
                .get(id, &[])
                .await
                .map_err(|e| CoreError::request("get image", id, e))?;
            return Ok(Image::private(doc));
        }

        let parts = parse_marketplace_id(id).ok_or_else(|| CoreError::InvalidInput {
            message: format!("image id '{id}' is neither a resource id nor publisher/offer/sku/version"),
        })?;
        let [publisher, offer, sku, version] = parts;
        let path = self.image_catalog_path(&format!(
            "/{publisher}/artifacttypes/vmimage/offers/{offer}/skus/{sku}/versions/{version}"
        ));
        let detail = match self.client().get::<VmImageVersion>(&path, &[]).await {
            Ok(detail) => Some(detail),
            Err(e) => {
                debug!(image = id, error = %e, "marketplace image detail unavailable");
                None
            }
        };
        Ok(Image::marketplace(id, parts, detail.as_ref()))
    }

    async fn list_catalog(&self, suffix: &str) -> Result<Vec<String>, CoreError> {
        let path = self.image_catalog_path(suffix);
        let artifacts: Vec<ImageArtifact> = self
            .client()
            .list(&path, &[])
            .await
            .map_err(|e| CoreError::request("list image catalog", &path, e))?;
        Ok(artifacts.into_iter().map(|a| a.name).collect())
    }

    pub async fn list_image_publishers(&self) -> Result<Vec<String>, CoreError> {
        self.list_catalog("").await
    }

    pub async fn list_image_offers(&self, publisher: &str) -> Result<Vec<String>, CoreError> {
        self.list_catalog(&format!("/{publisher}/artifacttypes/vmimage/offers"))
            .await
    }

    pub async fn list_image_skus(&self, publisher: &str, offer: &str) -> Result<Vec<String>, CoreError> {
        self.list_catalog(&format!(
            "/{publisher}/artifacttypes/vmimage/offers/{offer}/skus"
        ))
        .await
    }

    pub async fn list_image_versions(
        &self,
        publisher: &str,
        offer: &str,
        sku: &str,
    ) -> Result<Vec<String>, CoreError> {
        self.list_catalog(&format!(
            "/{publisher}/artifacttypes/vmimage/offers/{offer}/skus/{sku}/versions"
        ))
        .await
    }
}
