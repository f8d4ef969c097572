//! Subnet command handlers.

use serde::Serialize;
use tabled::Tabled;

use armlink_core::capability::{CloudNetwork, CloudResource};
use armlink_core::{Network, Region, Wire, is_classic_id};

use crate::cli::{GlobalOpts, NetworksArgs, NetworksCommand};
use crate::error::CliError;
use crate::output;

use super::{util, vpcs};

// ── Views ───────────────────────────────────────────────────────────

#[derive(Serialize)]
pub struct NetworkInfo {
    pub id: String,
    pub name: String,
    pub cidr: String,
    pub gateway: String,
    pub ip_start: String,
    pub ip_end: String,
    pub mask: u8,
    pub wire_id: String,
    pub status: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub security_group_id: Option<String>,
}

impl NetworkInfo {
    pub fn from_dyn(n: &dyn CloudNetwork) -> Self {
        Self {
            id: n.id(),
            name: n.name(),
            cidr: n.cidr(),
            gateway: n.gateway(),
            ip_start: n.ip_start(),
            ip_end: n.ip_end(),
            mask: n.mask(),
            wire_id: n.wire_id(),
            status: n.status(),
            security_group_id: None,
        }
    }
}

impl From<&Network> for NetworkInfo {
    fn from(n: &Network) -> Self {
        Self {
            security_group_id: n.security_group_id().map(str::to_owned),
            ..Self::from_dyn(n)
        }
    }
}

#[derive(Tabled)]
struct NetworkRow {
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "CIDR")]
    cidr: String,
    #[tabled(rename = "Gateway")]
    gateway: String,
    #[tabled(rename = "Range")]
    range: String,
    #[tabled(rename = "Status")]
    status: String,
}

impl From<&NetworkInfo> for NetworkRow {
    fn from(n: &NetworkInfo) -> Self {
        Self {
            name: n.name.clone(),
            cidr: n.cidr.clone(),
            gateway: n.gateway.clone(),
            range: format!("{} - {}", n.ip_start, n.ip_end),
            status: n.status.clone(),
        }
    }
}

fn detail(n: &NetworkInfo) -> String {
    output::detail_lines(&[
        ("ID", output::dim(&n.id)),
        ("Name", n.name.clone()),
        ("CIDR", n.cidr.clone()),
        ("Mask", n.mask.to_string()),
        ("Gateway", n.gateway.clone()),
        ("First IP", n.ip_start.clone()),
        ("Last IP", n.ip_end.clone()),
        ("Wire", output::dim(&n.wire_id)),
        ("Security Group", util::or_dash(n.security_group_id.as_deref())),
        ("Status", output::paint_status(&n.status)),
    ])
}

/// The wire of a VPC, which is where subnets are added.
async fn wire_of(region: &Region, vpc_id: &str) -> Result<Wire, CliError> {
    if is_classic_id(vpc_id) {
        Ok(region.get_classic_vpc(vpc_id).await?.wire())
    } else {
        Ok(region.get_vpc(vpc_id).await?.wire())
    }
}

// ── Handler ─────────────────────────────────────────────────────────

pub async fn handle(
    region: &Region,
    args: NetworksArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    match args.command {
        NetworksCommand::List { vpc } => {
            let networks: Vec<NetworkInfo> = match vpc {
                Some(vpc_id) => wire_of(region, &vpc_id)
                    .await?
                    .networks()?
                    .iter()
                    .map(NetworkInfo::from)
                    .collect(),
                None => vpcs::all_networks(region)
                    .await?
                    .iter()
                    .map(|n| NetworkInfo::from_dyn(n.as_ref()))
                    .collect(),
            };
            let out = output::render_list(
                &global.output,
                &networks,
                |n| NetworkRow::from(n),
                |n| n.id.clone(),
            )?;
            output::print_output(&out, global.quiet);
            Ok(())
        }

        NetworksCommand::Show { id } => {
            let network = region.get_subnet(&id).await?;
            let info = NetworkInfo::from(&network);
            let out = output::render_single(&global.output, &info, detail, |n| n.id.clone())?;
            output::print_output(&out, global.quiet);
            Ok(())
        }

        NetworksCommand::Create { vpc, name, cidr } => {
            let network = wire_of(region, &vpc)
                .await?
                .create_network(&name, &cidr)
                .await?;
            util::report(global.quiet, &format!("Subnet created: {}", network.id()));
            let info = NetworkInfo::from(&network);
            let out = output::render_single(&global.output, &info, detail, |n| n.id.clone())?;
            output::print_output(&out, global.quiet);
            Ok(())
        }

        NetworksCommand::Delete { id } => {
            let network = region.get_subnet(&id).await?;
            if !util::confirm(&format!("Delete subnet '{}'?", network.name()), global.yes)? {
                return Ok(());
            }
            network.delete().await?;
            util::report(global.quiet, "Subnet deleted");
            Ok(())
        }
    }
}
