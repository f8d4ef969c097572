//! Marketplace image publisher catalog.
//!
//! Marketplace image ids are `publisher/offer/sku/version` tuples whose parts
//! mean different things per publisher. Each known publisher gets a
//! [`PublisherDriver`] that turns the tuple into OS metadata; unknown
//! publishers use [`describe`]'s generic fallback.
//!
//! The table is built once on first use and never mutated.

use std::collections::HashMap;
use std::sync::LazyLock;

use serde::Serialize;

use crate::model::OsType;

const ARCH_X86_64: &str = "x86_64";
const ARCH_AARCH64: &str = "aarch64";

/// OS metadata derived from a marketplace image tuple.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ImageInfo {
    pub os_type: OsType,
    pub name: String,
    pub dist: String,
    pub version: String,
    pub arch: String,
}

/// Per-publisher knowledge about offers, SKUs and how to read them.
pub struct PublisherDriver {
    /// Publisher name as ARM spells it.
    pub publisher: &'static str,
    pub os_type: OsType,
    /// Distribution display name.
    pub dist: &'static str,
    offers: &'static [&'static str],
    skus: &'static [(&'static str, &'static [&'static str])],
    version: fn(offer: &str, sku: &str, version: &str) -> String,
}

impl PublisherDriver {
    pub fn offers(&self) -> &'static [&'static str] {
        self.offers
    }

    /// Known SKUs of an offer; empty for offers this driver does not list.
    pub fn skus(&self, offer: &str) -> &'static [&'static str] {
        self.skus
            .iter()
            .find(|(o, _)| o.eq_ignore_ascii_case(offer))
            .map(|(_, skus)| *skus)
            .unwrap_or(&[])
    }

    pub fn os_dist(&self, _offer: &str, _sku: &str, _version: &str) -> String {
        self.dist.to_owned()
    }

    pub fn os_version(&self, offer: &str, sku: &str, version: &str) -> String {
        (self.version)(offer, sku, version)
    }

    pub fn os_arch(&self, offer: &str, sku: &str, _version: &str) -> String {
        arch_of(offer, sku).to_owned()
    }

    pub fn name(&self, offer: &str, sku: &str, version: &str) -> String {
        format!(
            "{} {} {}",
            self.os_dist(offer, sku, version),
            self.os_version(offer, sku, version),
            self.os_arch(offer, sku, version)
        )
    }

    fn describe(&self, offer: &str, sku: &str, version: &str) -> ImageInfo {
        ImageInfo {
            os_type: self.os_type,
            name: self.name(offer, sku, version),
            dist: self.os_dist(offer, sku, version),
            version: self.os_version(offer, sku, version),
            arch: self.os_arch(offer, sku, version),
        }
    }
}

impl std::fmt::Debug for PublisherDriver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PublisherDriver")
            .field("publisher", &self.publisher)
            .field("os_type", &self.os_type)
            .finish_non_exhaustive()
    }
}

fn arch_of(offer: &str, sku: &str) -> &'static str {
    let arm = |s: &str| {
        let s = s.to_ascii_lowercase();
        s.contains("arm64") || s.contains("aarch64")
    };
    if arm(offer) || arm(sku) {
        ARCH_AARCH64
    } else {
        ARCH_X86_64
    }
}

// ── Version readers ─────────────────────────────────────────────────

/// `2019-Datacenter` → `2019`.
fn leading_token(_offer: &str, sku: &str, _version: &str) -> String {
    sku.split(['-', '_']).next().unwrap_or(sku).to_owned()
}

/// `7_9` → `7.9`, `8-lvm-gen2` → `8`.
fn dotted_sku(_offer: &str, sku: &str, _version: &str) -> String {
    sku.split('-').next().unwrap_or(sku).replace('_', ".")
}

/// Ubuntu SKUs: `18.04-LTS`, `22_04-lts-gen2`, `20_04-lts-arm64`.
fn ubuntu(offer: &str, sku: &str, version: &str) -> String {
    let head = dotted_sku(offer, sku, version);
    if head.contains('.') {
        return head;
    }
    // Newer offers carry the release codename instead.
    let lowered = offer.to_ascii_lowercase();
    [("focal", "20.04"), ("jammy", "22.04"), ("noble", "24.04")]
        .iter()
        .find(|(codename, _)| lowered.contains(codename))
        .map_or(head, |(_, release)| (*release).to_owned())
}

/// SLES encodes the release in the offer (`sles-15-sp5`) or the SKU (`12-SP5`).
fn sles(offer: &str, sku: &str, _version: &str) -> String {
    let lowered = offer.to_ascii_lowercase();
    match lowered.strip_prefix("sles-") {
        Some(release) => release.replace("-byos", ""),
        None => sku.to_ascii_lowercase(),
    }
}

/// CoreOS channels move; the image version is the only stable identifier.
fn image_version(_offer: &str, _sku: &str, version: &str) -> String {
    version.to_owned()
}

// ── Catalog ─────────────────────────────────────────────────────────

static DRIVERS: &[PublisherDriver] = &[
    PublisherDriver {
        publisher: "MicrosoftWindowsServer",
        os_type: OsType::Windows,
        dist: "Windows Server",
        // "2019-Datacenter" is a SKU, kept for callers that already rely on it.
        offers: &["WindowsServer", "2019-Datacenter"],
        skus: &[(
            "WindowsServer",
            &[
                "2012-R2-Datacenter",
                "2016-Datacenter",
                "2019-Datacenter",
                "2022-datacenter",
                "2022-datacenter-azure-edition",
            ],
        )],
        version: leading_token,
    },
    PublisherDriver {
        publisher: "RedHat",
        os_type: OsType::Linux,
        dist: "RHEL",
        offers: &["RHEL"],
        skus: &[("RHEL", &["7-LVM", "7_9", "8-lvm-gen2", "8_6", "9-lvm-gen2"])],
        version: dotted_sku,
    },
    PublisherDriver {
        publisher: "Canonical",
        os_type: OsType::Linux,
        dist: "Ubuntu",
        offers: &[
            "UbuntuServer",
            "0001-com-ubuntu-server-focal",
            "0001-com-ubuntu-server-jammy",
        ],
        skus: &[
            ("UbuntuServer", &["16.04-LTS", "18.04-LTS", "18_04-lts-gen2"]),
            (
                "0001-com-ubuntu-server-focal",
                &["20_04-lts", "20_04-lts-gen2", "20_04-lts-arm64"],
            ),
            (
                "0001-com-ubuntu-server-jammy",
                &["22_04-lts", "22_04-lts-gen2", "22_04-lts-arm64"],
            ),
        ],
        version: ubuntu,
    },
    PublisherDriver {
        publisher: "OpenLogic",
        os_type: OsType::Linux,
        dist: "CentOS",
        offers: &["CentOS"],
        skus: &[("CentOS", &["7.5", "7_9", "7_9-gen2", "8_5", "8_5-gen2"])],
        version: dotted_sku,
    },
    PublisherDriver {
        publisher: "SUSE",
        os_type: OsType::Linux,
        dist: "SUSE",
        offers: &["SLES", "sles-15-sp5", "sles-15-sp5-byos"],
        skus: &[
            ("SLES", &["12-SP5", "15-SP4"]),
            ("sles-15-sp5", &["gen1", "gen2"]),
            ("sles-15-sp5-byos", &["gen1", "gen2"]),
        ],
        version: sles,
    },
    PublisherDriver {
        publisher: "CoreOS",
        os_type: OsType::Linux,
        dist: "CoreOS",
        offers: &["CoreOS"],
        skus: &[("CoreOS", &["Stable", "Beta", "Alpha"])],
        version: image_version,
    },
    PublisherDriver {
        publisher: "credativ",
        os_type: OsType::Linux,
        dist: "Debian",
        offers: &["Debian"],
        skus: &[("Debian", &["8", "9", "9-backports"])],
        version: leading_token,
    },
    PublisherDriver {
        publisher: "MicrosoftOSTC",
        os_type: OsType::Linux,
        dist: "FreeBSD",
        offers: &["FreeBSD"],
        skus: &[("FreeBSD", &["10.4", "11.2", "12.0"])],
        version: dotted_sku,
    },
];

static CATALOG: LazyLock<HashMap<String, &'static PublisherDriver>> = LazyLock::new(|| {
    DRIVERS
        .iter()
        .map(|driver| (driver.publisher.to_lowercase(), driver))
        .collect()
});

/// Driver for a publisher, case-insensitively.
pub fn lookup(publisher: &str) -> Option<&'static PublisherDriver> {
    CATALOG.get(&publisher.to_lowercase()).copied()
}

/// Every shipped driver, in catalog order.
pub fn drivers() -> &'static [PublisherDriver] {
    DRIVERS
}

/// OS metadata for an image tuple, falling back to generic Linux details
/// for publishers without a driver.
pub fn describe(publisher: &str, offer: &str, sku: &str, version: &str) -> ImageInfo {
    match lookup(publisher) {
        Some(driver) => driver.describe(offer, sku, version),
        None => ImageInfo {
            os_type: OsType::Linux,
            name: format!("{offer}-{sku}-{version}"),
            dist: offer.to_owned(),
            version: sku.to_owned(),
            arch: ARCH_X86_64.to_owned(),
        },
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn eight_drivers() {
        assert_eq!(drivers().len(), 8);
        assert_eq!(CATALOG.len(), 8);
    }

    #[test]
    fn lookup_by_lowercased_key_keeps_os_type() {
        for driver in drivers() {
            let found = lookup(&driver.publisher.to_lowercase()).unwrap();
            assert_eq!(found.os_type, driver.os_type, "{}", driver.publisher);
        }
        assert_eq!(lookup("MICROSOFTWINDOWSSERVER").unwrap().os_type, OsType::Windows);
    }

    #[test]
    fn windows_offer_list_is_preserved() {
        let driver = lookup("microsoftwindowsserver").unwrap();
        assert_eq!(driver.offers(), &["WindowsServer", "2019-Datacenter"]);
        assert!(driver.skus("windowsserver").contains(&"2019-Datacenter"));
        assert!(driver.skus("2019-Datacenter").is_empty());
    }

    #[test]
    fn unknown_publisher_falls_back() {
        let info = describe("bitnami", "wordpress", "4-4", "1.0.0");
        assert_eq!(
            info,
            ImageInfo {
                os_type: OsType::Linux,
                name: "wordpress-4-4-1.0.0".into(),
                dist: "wordpress".into(),
                version: "4-4".into(),
                arch: "x86_64".into(),
            }
        );
    }

    #[test]
    fn drivers_read_versions() {
        let ubuntu = describe("Canonical", "0001-com-ubuntu-server-jammy", "22_04-lts-arm64", "latest");
        assert_eq!(ubuntu.dist, "Ubuntu");
        assert_eq!(ubuntu.version, "22.04");
        assert_eq!(ubuntu.arch, "aarch64");

        assert_eq!(describe("Canonical", "UbuntuServer", "18.04-LTS", "latest").version, "18.04");
        assert_eq!(describe("OpenLogic", "CentOS", "7_9", "latest").version, "7.9");
        assert_eq!(describe("SUSE", "sles-15-sp5", "gen2", "latest").version, "15-sp5");
        assert_eq!(describe("CoreOS", "CoreOS", "Stable", "2345.3.0").version, "2345.3.0");

        let windows = describe("MicrosoftWindowsServer", "WindowsServer", "2019-Datacenter", "latest");
        assert_eq!(windows.os_type, OsType::Windows);
        assert_eq!(windows.name, "Windows Server 2019 x86_64");
    }
}
