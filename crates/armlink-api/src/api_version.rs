// `api-version` routing.
//
// Every ARM call carries an `api-version` query parameter. Callers may pass
// one explicitly; otherwise it is derived from the provider namespace and
// resource type segments of the path.

/// Fallback for paths outside any routed namespace (locations, resource groups).
pub const DEFAULT: &str = "2016-02-01";
/// Network, compute and legacy web paths.
pub const NETWORK: &str = "2019-08-01";
/// Modern web operations (sites, slots, certificates, backups, config).
pub const WEB: &str = "2023-12-01";
/// Legacy web paths (server farms, site listings).
pub const WEB_LEGACY: &str = "2019-08-01";
/// Classic (ASM-backed) compute and network providers.
pub const CLASSIC: &str = "2016-04-01";
/// `Microsoft.Resources/tags` extension resource.
pub const TAGS: &str = "2020-06-01";

const COMPUTE: &str = "2019-07-01";
const COMPUTE_VIRTUAL_MACHINES: &str = "2021-11-01";
const COMPUTE_PUBLISHERS: &str = "2020-06-01";
const COMPUTE_SKUS: &str = "2019-04-01";
const STORAGE: &str = "2019-04-01";

/// Pick the `api-version` for a resource path or type.
///
/// Matching is on whole lowercased path segments, so both
/// `Microsoft.Network/virtualNetworks` and a full resource id route the same.
pub fn resolve(resource: &str) -> &'static str {
    let lowered = resource.to_ascii_lowercase();
    let segments: Vec<&str> = lowered.split('/').collect();
    let has = |s: &str| segments.contains(&s);

    if has("microsoft.resources") && has("tags") {
        TAGS
    } else if has("microsoft.compute") {
        if has("virtualmachines") {
            COMPUTE_VIRTUAL_MACHINES
        } else if has("publishers") {
            COMPUTE_PUBLISHERS
        } else if has("skus") {
            COMPUTE_SKUS
        } else {
            COMPUTE
        }
    } else if has("microsoft.classiccompute") || has("microsoft.classicnetwork") {
        CLASSIC
    } else if has("microsoft.network") {
        NETWORK
    } else if has("microsoft.web") {
        WEB_LEGACY
    } else if has("microsoft.storage") {
        STORAGE
    } else {
        DEFAULT
    }
}
