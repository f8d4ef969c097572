//! Security group command handlers.

use serde::Serialize;
use tabled::Tabled;

use armlink_core::capability::CloudResource;
use armlink_core::{Region, SecurityGroup, SecurityRuleSpec};

use crate::cli::{GlobalOpts, RuleArgs, SecgroupsArgs, SecgroupsCommand};
use crate::error::CliError;
use crate::output;

use super::util;

// ── Views ───────────────────────────────────────────────────────────

#[derive(Serialize)]
struct GroupInfo {
    id: String,
    name: String,
    location: String,
    status: String,
    rules: Vec<SecurityRuleSpec>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    default_rules: Vec<SecurityRuleSpec>,
}

impl GroupInfo {
    fn new(group: &SecurityGroup, with_defaults: bool) -> Self {
        Self {
            id: group.id().to_owned(),
            name: group.name().to_owned(),
            location: group.location().to_owned(),
            status: group.status(),
            rules: group.rules(),
            default_rules: if with_defaults {
                group.default_rules()
            } else {
                Vec::new()
            },
        }
    }
}

#[derive(Tabled)]
struct GroupRow {
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Location")]
    location: String,
    #[tabled(rename = "Rules")]
    rules: usize,
    #[tabled(rename = "Status")]
    status: String,
}

impl From<&GroupInfo> for GroupRow {
    fn from(g: &GroupInfo) -> Self {
        Self {
            name: g.name.clone(),
            location: g.location.clone(),
            rules: g.rules.len(),
            status: g.status.clone(),
        }
    }
}

#[derive(Tabled)]
struct RuleRow {
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Dir")]
    direction: String,
    #[tabled(rename = "Action")]
    action: String,
    #[tabled(rename = "Proto")]
    protocol: String,
    #[tabled(rename = "Remote")]
    cidr: String,
    #[tabled(rename = "Ports")]
    ports: String,
    #[tabled(rename = "Priority")]
    priority: u32,
}

impl From<&SecurityRuleSpec> for RuleRow {
    fn from(r: &SecurityRuleSpec) -> Self {
        Self {
            name: util::or_dash(r.name.as_deref()),
            direction: r.direction.to_string(),
            action: r.action.to_string(),
            protocol: r.protocol.clone(),
            cidr: r.cidr.clone(),
            ports: if r.ports.is_empty() {
                "all".into()
            } else {
                r.ports.clone()
            },
            priority: r.priority,
        }
    }
}

fn rule_table(rules: &[SecurityRuleSpec]) -> String {
    tabled::Table::new(rules.iter().map(RuleRow::from))
        .with(tabled::settings::Style::rounded())
        .to_string()
}

fn detail(g: &GroupInfo) -> String {
    let mut out = output::detail_lines(&[
        ("ID", output::dim(&g.id)),
        ("Name", g.name.clone()),
        ("Location", g.location.clone()),
        ("Status", output::paint_status(&g.status)),
    ]);
    out.push_str("\n\nRules\n");
    out.push_str(&rule_table(&g.rules));
    if !g.default_rules.is_empty() {
        out.push_str("\n\nDefault rules\n");
        out.push_str(&rule_table(&g.default_rules));
    }
    out
}

fn rule_spec(args: RuleArgs) -> SecurityRuleSpec {
    SecurityRuleSpec::new(args.direction, args.action, args.priority)
        .protocol(args.protocol)
        .cidr(args.cidr)
        .ports(args.ports)
        .description(args.description)
}

// ── Handler ─────────────────────────────────────────────────────────

pub async fn handle(
    region: &Region,
    args: SecgroupsArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    match args.command {
        SecgroupsCommand::List => {
            let groups: Vec<GroupInfo> = region
                .list_security_groups()
                .await?
                .iter()
                .map(|g| GroupInfo::new(g, false))
                .collect();
            let out = output::render_list(
                &global.output,
                &groups,
                |g| GroupRow::from(g),
                |g| g.id.clone(),
            )?;
            output::print_output(&out, global.quiet);
            Ok(())
        }

        SecgroupsCommand::Show { id, defaults } => {
            let group = region.get_security_group(&id).await?;
            let info = GroupInfo::new(&group, defaults);
            let out = output::render_single(&global.output, &info, detail, |g| g.id.clone())?;
            output::print_output(&out, global.quiet);
            Ok(())
        }

        SecgroupsCommand::Create { name, group } => {
            let created = region.create_security_group(&name, &group).await?;
            util::report(global.quiet, &format!("Security group created: {}", created.id()));
            let info = GroupInfo::new(&created, false);
            let out = output::render_single(&global.output, &info, detail, |g| g.id.clone())?;
            output::print_output(&out, global.quiet);
            Ok(())
        }

        SecgroupsCommand::Delete { id } => {
            let group = region.get_security_group(&id).await?;
            if !util::confirm(
                &format!(
                    "Detach security group '{}' from every NIC and subnet, then delete it?",
                    group.name()
                ),
                global.yes,
            )? {
                return Ok(());
            }
            group.delete().await?;
            util::report(global.quiet, "Security group deleted");
            Ok(())
        }

        SecgroupsCommand::AddRule { id, rule } => {
            let group = region.get_security_group(&id).await?;
            group.create_rule(&rule_spec(rule)).await?;
            util::report(global.quiet, "Rule added");
            Ok(())
        }

        SecgroupsCommand::UpdateRule { id, name, rule } => {
            let group = region.get_security_group(&id).await?;
            group.update_rule(&name, &rule_spec(rule)).await?;
            util::report(global.quiet, &format!("Rule '{name}' updated"));
            Ok(())
        }

        SecgroupsCommand::RemoveRule { id, name } => {
            let group = region.get_security_group(&id).await?;
            if !util::confirm(&format!("Remove rule '{name}'?"), global.yes)? {
                return Ok(());
            }
            group.delete_rule(&name).await?;
            util::report(global.quiet, &format!("Rule '{name}' removed"));
            Ok(())
        }

        SecgroupsCommand::Attach { id, vm } => {
            let group = region.get_security_group(&id).await?;
            group.attach_to_instance(&vm).await?;
            util::report(global.quiet, &format!("Security group attached to {vm}"));
            Ok(())
        }
    }
}
