//! Name derivations ARM imposes on user input.
//!
//! Security rule names must start with a letter or digit, end with a letter,
//! digit or `_`, and contain only letters, digits, `_`, `-` and `.`. Rule
//! names produced here also never contain `.`. VM computer names are capped
//! at 15 characters and drop punctuation.

use crate::model::SecurityRuleSpec;

const COMPUTER_NAME_MAX: usize = 15;
const COMPUTER_NAME_STRIP: &str = "`~!@#$%^&*()=+_[]{}\\|;:.'\",<>/?-";

/// Rewrite an arbitrary string into a valid security rule name.
pub fn normalize_rule_name(name: &str) -> String {
    let mut out: String = name
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '_' | '-') {
                c
            } else {
                '_'
            }
        })
        .collect();

    if !out.starts_with(|c: char| c.is_ascii_alphanumeric()) {
        out.insert_str(0, "r_");
    }
    if !out.ends_with(|c: char| c.is_ascii_alphanumeric() || c == '_') {
        out.push('_');
    }
    out
}

/// Canonical human-readable form of a rule, e.g. `in:allow 0.0.0.0/0 tcp 80-90`.
pub fn rule_descriptor(rule: &SecurityRuleSpec) -> String {
    let ports = if rule.ports.trim().is_empty() {
        "any"
    } else {
        rule.ports.trim()
    };
    format!(
        "{}:{} {} {} {}",
        rule.direction,
        rule.action,
        rule.cidr,
        rule.protocol.to_ascii_lowercase(),
        ports
    )
}

/// ARM rule name: the descriptor joined with the priority, then normalized.
pub fn rule_name(rule: &SecurityRuleSpec) -> String {
    normalize_rule_name(&format!("{}_{}", rule_descriptor(rule), rule.priority))
}

/// Sanitize a hostname into an ARM `computerName`.
pub fn computer_name(hostname: &str) -> String {
    hostname
        .chars()
        .filter(|c| !COMPUTER_NAME_STRIP.contains(*c))
        .take(COMPUTER_NAME_MAX)
        .collect()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::model::{Direction, RuleAction};

    fn is_valid_rule_name(name: &str) -> bool {
        name.starts_with(|c: char| c.is_ascii_alphanumeric())
            && name.ends_with(|c: char| c.is_ascii_alphanumeric() || c == '_')
            && name
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
    }

    // ── Rule names ──────────────────────────────────────────────────

    #[test]
    fn descriptor_with_priority() {
        let rule = SecurityRuleSpec::new(Direction::In, RuleAction::Allow, 100)
            .protocol("tcp")
            .ports("80-90");
        assert_eq!(rule_descriptor(&rule), "in:allow 0.0.0.0/0 tcp 80-90");
        insta::assert_snapshot!(rule_name(&rule), @"in_allow_0_0_0_0_0_tcp_80-90_100");
    }

    #[test]
    fn empty_ports_read_as_any() {
        let rule = SecurityRuleSpec::new(Direction::Out, RuleAction::Deny, 4096).cidr("10.0.0.0/8");
        insta::assert_snapshot!(rule_name(&rule), @"out_deny_10_0_0_0_8_any_any_4096");
    }

    #[test]
    fn free_form_input_is_normalized() {
        let name = normalize_rule_name("allow tcp 80-90 0.0.0.0/0_100");
        insta::assert_snapshot!(name, @"allow_tcp_80-90_0_0_0_0_0_100");
        assert!(is_valid_rule_name(&name));

        let name = normalize_rule_name("in_tcp_80_any_allow_200");
        assert_eq!(name, "in_tcp_80_any_allow_200");
        assert!(!name.contains('.'));
    }

    #[test]
    fn edges_get_padded() {
        insta::assert_snapshot!(normalize_rule_name("-web-"), @"r_-web-_");
        insta::assert_snapshot!(normalize_rule_name(".ssh"), @"r__ssh");
        insta::assert_snapshot!(normalize_rule_name(""), @"r_");
    }

    #[test]
    fn normalized_names_are_always_valid() {
        for input in ["", "a", "*", "ü-rule", "x.y.z", "allow all!", "__", "9-"] {
            let name = normalize_rule_name(input);
            assert!(is_valid_rule_name(&name), "{input:?} -> {name:?}");
        }
    }

    // ── Computer names ──────────────────────────────────────────────

    #[test]
    fn computer_name_strips_and_truncates() {
        assert_eq!(computer_name("my.web-host!@01234567"), "mywebhost012345");
        assert_eq!(computer_name("db_01"), "db01");
        assert_eq!(computer_name("short"), "short");
    }
}
