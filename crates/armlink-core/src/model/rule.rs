// ── Security rule requests ──

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// Traffic direction of a rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum Direction {
    #[strum(to_string = "in", serialize = "inbound")]
    In,
    #[strum(to_string = "out", serialize = "outbound")]
    Out,
}

impl Direction {
    /// ARM spelling: `Inbound` / `Outbound`.
    pub fn arm_name(self) -> &'static str {
        match self {
            Self::In => "Inbound",
            Self::Out => "Outbound",
        }
    }

    pub fn from_arm(value: &str) -> Self {
        if value.eq_ignore_ascii_case("outbound") {
            Self::Out
        } else {
            Self::In
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum RuleAction {
    Allow,
    Deny,
}

impl RuleAction {
    pub fn arm_name(self) -> &'static str {
        match self {
            Self::Allow => "Allow",
            Self::Deny => "Deny",
        }
    }

    pub fn from_arm(value: &str) -> Self {
        if value.eq_ignore_ascii_case("deny") {
            Self::Deny
        } else {
            Self::Allow
        }
    }
}

/// A provider-agnostic security rule, as callers describe it.
///
/// `cidr` is the remote side: the source prefix for inbound rules and the
/// destination prefix for outbound ones. `protocol` is `any`, `tcp`, `udp`,
/// `icmp` or an ARM protocol name; `ports` is a single port, a `lo-hi`
/// range, or empty for all ports.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SecurityRuleSpec {
    /// Existing ARM rule name, set when the rule came from ARM.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    pub direction: Direction,
    pub action: RuleAction,
    pub protocol: String,
    pub cidr: String,
    #[serde(default)]
    pub ports: String,
    pub priority: u32,
    #[serde(default)]
    pub description: String,
}

impl SecurityRuleSpec {
    pub fn new(direction: Direction, action: RuleAction, priority: u32) -> Self {
        Self {
            name: None,
            direction,
            action,
            protocol: "any".into(),
            cidr: "0.0.0.0/0".into(),
            ports: String::new(),
            priority,
            description: String::new(),
        }
    }

    #[must_use]
    pub fn protocol(mut self, protocol: impl Into<String>) -> Self {
        self.protocol = protocol.into();
        self
    }

    #[must_use]
    pub fn cidr(mut self, cidr: impl Into<String>) -> Self {
        self.cidr = cidr.into();
        self
    }

    #[must_use]
    pub fn ports(mut self, ports: impl Into<String>) -> Self {
        self.ports = ports.into();
        self
    }

    #[must_use]
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn direction_parses_short_and_long_forms() {
        assert_eq!("in".parse::<Direction>().unwrap(), Direction::In);
        assert_eq!("Outbound".parse::<Direction>().unwrap(), Direction::Out);
        assert_eq!(Direction::In.to_string(), "in");
        assert_eq!(Direction::Out.arm_name(), "Outbound");
    }

    #[test]
    fn action_round_trips_through_arm_names() {
        for action in [RuleAction::Allow, RuleAction::Deny] {
            assert_eq!(RuleAction::from_arm(action.arm_name()), action);
        }
        assert_eq!("DENY".parse::<RuleAction>().unwrap(), RuleAction::Deny);
    }
}
