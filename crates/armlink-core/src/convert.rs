// ── ARM-to-domain conversions ──
//
// Bridges raw `armlink_api::types` payloads into `crate::model` values and
// back. Each function normalizes ARM spellings, fills the defaults ARM
// expects on writes, and never performs I/O.

use armlink_api::types::{
    BackupItem, BackupRequest, Certificate, SecurityRule, SecurityRuleProperties, SiteConfig,
    SiteProperties,
};

use crate::model::{
    AppBackup, AppBackupConfig, AppCertificate, AppDomain, BackupKind, Direction, DomainStatus,
    OsType, RuleAction, SecurityRuleSpec, VmStatus,
};
use crate::naming;

const WILDCARD: &str = "*";
const SNI_ENABLED: &str = "SniEnabled";

// ── VM status ──────────────────────────────────────────────────────

/// Map the suffix of a `PowerState/<state>` code.
pub fn vm_status(power_state: Option<&str>) -> VmStatus {
    match power_state.map(str::to_ascii_lowercase).as_deref() {
        Some("running") => VmStatus::Running,
        Some("stopped" | "deallocated") => VmStatus::Ready,
        Some("starting") => VmStatus::Starting,
        Some("stopping" | "deallocating") => VmStatus::Stopping,
        Some("deleting") => VmStatus::Deleting,
        _ => VmStatus::Unknown,
    }
}

// ── Security rules ─────────────────────────────────────────────────

fn or_wildcard(value: &str) -> String {
    let value = value.trim();
    if value.is_empty() || value.eq_ignore_ascii_case("any") {
        WILDCARD.to_owned()
    } else {
        value.to_owned()
    }
}

/// ARM protocol spelling: `*`, `Tcp`, `Udp`, `Icmp`, ...
fn arm_protocol(protocol: &str) -> String {
    let protocol = or_wildcard(protocol);
    let mut chars = protocol.chars();
    match chars.next() {
        Some(first) => first.to_ascii_uppercase().to_string() + &chars.as_str().to_ascii_lowercase(),
        None => protocol,
    }
}

/// Build the ARM rule for a `SecurityRuleSpec`. The name is kept when it came from
/// ARM, otherwise derived from the descriptor and priority.
pub fn rule_to_arm(spec: &SecurityRuleSpec) -> SecurityRule {
    let name = spec
        .name
        .clone()
        .unwrap_or_else(|| naming::rule_name(spec));
    let cidr = or_wildcard(&spec.cidr);
    let (source, destination) = match spec.direction {
        Direction::In => (cidr, WILDCARD.to_owned()),
        Direction::Out => (WILDCARD.to_owned(), cidr),
    };

    SecurityRule {
        id: String::new(),
        name,
        properties: SecurityRuleProperties {
            description: spec.description.clone(),
            protocol: arm_protocol(&spec.protocol),
            source_port_range: WILDCARD.to_owned(),
            destination_port_range: or_wildcard(&spec.ports),
            source_address_prefix: source,
            destination_address_prefix: destination,
            access: spec.action.arm_name().to_owned(),
            priority: spec.priority,
            direction: spec.direction.arm_name().to_owned(),
            ..Default::default()
        },
    }
}

fn first_of(single: &str, many: &[String]) -> String {
    if single.is_empty() {
        many.join(",")
    } else {
        single.to_owned()
    }
}

/// Lift an ARM rule into a spec. Wildcards read back as `any` / empty ports.
pub fn rule_from_arm(rule: &SecurityRule) -> SecurityRuleSpec {
    let p = &rule.properties;
    let direction = Direction::from_arm(&p.direction);
    let cidr = match direction {
        Direction::In => first_of(&p.source_address_prefix, &p.source_address_prefixes),
        Direction::Out => first_of(&p.destination_address_prefix, &p.destination_address_prefixes),
    };
    let ports = first_of(&p.destination_port_range, &p.destination_port_ranges);
    let protocol = if p.protocol == WILDCARD || p.protocol.is_empty() {
        "any".to_owned()
    } else {
        p.protocol.to_ascii_lowercase()
    };

    SecurityRuleSpec {
        name: Some(rule.name.clone()),
        direction,
        action: RuleAction::from_arm(&p.access),
        protocol,
        cidr: if cidr == WILDCARD { "0.0.0.0/0".to_owned() } else { cidr },
        ports: if ports == WILDCARD { String::new() } else { ports },
        priority: p.priority,
        description: p.description.clone(),
    }
}

// ── Web app introspection ──────────────────────────────────────────

/// Display name for a `CURRENT_STACK` token.
pub fn stack_display_name(token: &str) -> Option<&'static str> {
    let name = match token.trim().to_ascii_lowercase().as_str() {
        "dotnet" => ".NET",
        "dotnetcore" => ".NET Core",
        "aspdotnet" => "ASP.NET",
        "node" => "Node",
        "python" => "Python",
        "php" => "PHP",
        "ruby" => "Ruby",
        "java" => "Java",
        "javacontainers" => "Java Containers",
        _ => return None,
    };
    Some(name)
}

fn present(value: Option<&str>) -> bool {
    value.is_some_and(|v| !v.trim().is_empty())
}

/// Stack inferred from the first language version a site config sets.
pub fn stack_from_config(config: &SiteConfig) -> Option<&'static str> {
    [
        (&config.php_version, "PHP"),
        (&config.python_version, "Python"),
        (&config.node_version, "Node"),
        (&config.power_shell_version, "PowerShell"),
        (&config.java_version, "Java"),
    ]
    .into_iter()
    .find(|(version, _)| present(version.as_deref()))
    .map(|(_, name)| name)
}

/// `linuxFxVersion` wins, then `windowsFxVersion`; Windows otherwise.
pub fn os_type_from_config(config: &SiteConfig) -> OsType {
    if present(config.linux_fx_version.as_deref()) {
        OsType::Linux
    } else {
        OsType::Windows
    }
}

/// Host names present in both `hostNames` and `hostNameSslStates`.
pub fn domains(props: &SiteProperties) -> Vec<AppDomain> {
    props
        .host_name_ssl_states
        .iter()
        .filter(|state| {
            props
                .host_names
                .iter()
                .any(|name| name.eq_ignore_ascii_case(&state.name))
        })
        .map(|state| {
            let bound = state.name.eq_ignore_ascii_case(&props.default_host_name)
                || state.ssl_state == SNI_ENABLED;
            AppDomain {
                name: state.name.clone(),
                status: if bound {
                    DomainStatus::Available
                } else {
                    DomainStatus::NoBind
                },
                ssl_state: Some(state.ssl_state.clone()).filter(|s| !s.is_empty()),
            }
        })
        .collect()
}

pub fn backup(item: BackupItem, kind: BackupKind) -> AppBackup {
    let p = item.properties;
    AppBackup {
        id: item.id,
        name: item.name,
        kind,
        status: p.status,
        blob_name: p.blob_name,
        storage_account_url: p.storage_account_url,
        size_bytes: p.size_in_bytes,
        created: p.created.or(p.time),
    }
}

impl From<BackupRequest> for AppBackupConfig {
    fn from(req: BackupRequest) -> Self {
        let p = req.properties;
        let schedule = p.backup_schedule;
        Self {
            name: p.backup_name.unwrap_or(req.name),
            enabled: p.enabled.unwrap_or(false),
            storage_account_url: p.storage_account_url,
            frequency_interval: schedule.as_ref().map(|s| s.frequency_interval),
            frequency_unit: schedule.as_ref().map(|s| s.frequency_unit.clone()),
            retention_days: schedule.as_ref().map(|s| s.retention_period_in_days),
            keep_at_least_one_backup: schedule.is_some_and(|s| s.keep_at_least_one_backup),
        }
    }
}

impl From<Certificate> for AppCertificate {
    fn from(cert: Certificate) -> Self {
        let p = cert.properties;
        let nonempty = |s: String| Some(s).filter(|s| !s.is_empty());
        Self {
            id: cert.id,
            name: cert.name,
            subject_name: nonempty(p.subject_name),
            issuer: nonempty(p.issuer),
            thumbprint: nonempty(p.thumbprint),
            issue_date: p.issue_date,
            expiration_date: p.expiration_date,
            host_names: p.host_names,
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use armlink_api::types::HostNameSslState;
    use pretty_assertions::assert_eq;

    #[test]
    fn power_states_map_to_status() {
        assert_eq!(vm_status(Some("running")), VmStatus::Running);
        assert_eq!(vm_status(Some("stopped")), VmStatus::Ready);
        assert_eq!(vm_status(Some("deallocated")), VmStatus::Ready);
        assert_eq!(vm_status(Some("stopping")), VmStatus::Stopping);
        assert_eq!(vm_status(Some("starting")), VmStatus::Starting);
        assert_eq!(vm_status(Some("deleting")), VmStatus::Deleting);
        assert_eq!(vm_status(Some("hibernated")), VmStatus::Unknown);
        assert_eq!(vm_status(None), VmStatus::Unknown);
    }

    // ── Rules ───────────────────────────────────────────────────────

    #[test]
    fn inbound_rule_defaults() {
        let spec = SecurityRuleSpec::new(Direction::In, RuleAction::Allow, 100).ports("22");
        let rule = rule_to_arm(&spec);
        assert_eq!(rule.name, "in_allow_0_0_0_0_0_any_22_100");
        let p = &rule.properties;
        assert_eq!(p.protocol, "*");
        assert_eq!(p.direction, "Inbound");
        assert_eq!(p.access, "Allow");
        assert_eq!(p.source_address_prefix, "0.0.0.0/0");
        assert_eq!(p.destination_address_prefix, "*");
        assert_eq!(p.source_port_range, "*");
        assert_eq!(p.destination_port_range, "22");
    }

    #[test]
    fn outbound_rule_puts_cidr_on_destination() {
        let spec = SecurityRuleSpec::new(Direction::Out, RuleAction::Deny, 300)
            .protocol("udp")
            .cidr("10.1.0.0/16");
        let p = rule_to_arm(&spec).properties;
        assert_eq!(p.protocol, "Udp");
        assert_eq!(p.direction, "Outbound");
        assert_eq!(p.destination_address_prefix, "10.1.0.0/16");
        assert_eq!(p.source_address_prefix, "*");
        assert_eq!(p.destination_port_range, "*");
    }

    #[test]
    fn arm_rule_reads_back_as_spec() {
        let spec = SecurityRuleSpec::new(Direction::In, RuleAction::Deny, 210)
            .protocol("tcp")
            .cidr("192.168.0.0/24")
            .ports("80-90");
        let back = rule_from_arm(&rule_to_arm(&spec));
        assert_eq!(back.name.as_deref(), Some("in_deny_192_168_0_0_24_tcp_80-90_210"));
        assert_eq!(SecurityRuleSpec { name: None, ..back }, spec);
    }

    // ── Sites ───────────────────────────────────────────────────────

    #[test]
    fn stack_tokens() {
        assert_eq!(stack_display_name("dotnetcore"), Some(".NET Core"));
        assert_eq!(stack_display_name("JAVACONTAINERS"), Some("Java Containers"));
        assert_eq!(stack_display_name("cobol"), None);
    }

    #[test]
    fn config_stack_uses_first_set_version() {
        let config = SiteConfig {
            php_version: Some(String::new()),
            node_version: Some("~18".into()),
            java_version: Some("17".into()),
            ..Default::default()
        };
        assert_eq!(stack_from_config(&config), Some("Node"));
        assert_eq!(stack_from_config(&SiteConfig::default()), None);
    }

    #[test]
    fn os_type_from_fx_versions() {
        let linux = SiteConfig {
            linux_fx_version: Some("PYTHON|3.11".into()),
            ..Default::default()
        };
        let windows = SiteConfig {
            windows_fx_version: Some("DOCKER|img".into()),
            ..Default::default()
        };
        assert_eq!(os_type_from_config(&linux), OsType::Linux);
        assert_eq!(os_type_from_config(&windows), OsType::Windows);
        assert_eq!(os_type_from_config(&SiteConfig::default()), OsType::Windows);
    }

    #[test]
    fn domains_need_both_lists() {
        let state = |name: &str, ssl: &str| HostNameSslState {
            name: name.into(),
            ssl_state: ssl.into(),
            ..Default::default()
        };
        let props = SiteProperties {
            default_host_name: "app.azurewebsites.net".into(),
            host_names: vec!["app.azurewebsites.net".into(), "www.example.com".into(), "api.example.com".into()],
            host_name_ssl_states: vec![
                state("app.azurewebsites.net", "Disabled"),
                state("app.scm.azurewebsites.net", "Disabled"),
                state("www.example.com", "SniEnabled"),
                state("api.example.com", "Disabled"),
            ],
            ..Default::default()
        };
        let got: Vec<(String, DomainStatus)> = domains(&props)
            .into_iter()
            .map(|d| (d.name, d.status))
            .collect();
        assert_eq!(
            got,
            vec![
                ("app.azurewebsites.net".into(), DomainStatus::Available),
                ("www.example.com".into(), DomainStatus::Available),
                ("api.example.com".into(), DomainStatus::NoBind),
            ]
        );
    }
}
