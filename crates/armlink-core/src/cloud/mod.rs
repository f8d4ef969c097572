// ── Projected entities ──
//
// Value objects lifted from ARM documents, each holding a clone of its
// region. Zone, host and wire are synthetic: Azure has no resource behind
// them, so their ids are derived from the region and subscription.

mod app;
mod host;
mod image;
mod instance;
mod network;
mod secgroup;
mod vpc;
mod wire;
mod zone;

pub use app::{AppEnvironment, AppSite};
pub use host::Host;
pub use image::{Image, ImageKind, is_private_id, parse_marketplace_id};
pub use instance::Instance;
pub use network::Network;
pub use secgroup::SecurityGroup;
pub use vpc::{ClassicVpc, Vpc};
pub use wire::{Wire, WIRE_BANDWIDTH_MBPS, wire_id};
pub use zone::Zone;

/// Entity status for a provisioning state ARM reports as settled.
pub(crate) const STATUS_AVAILABLE: &str = "available";

/// Map an ARM provisioning state to an entity status.
pub(crate) fn provisioning_status(state: &str) -> String {
    match state.to_ascii_lowercase().as_str() {
        "" | "succeeded" | "created" => STATUS_AVAILABLE.to_owned(),
        other => other.to_owned(),
    }
}
