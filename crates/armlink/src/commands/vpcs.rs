//! Virtual network command handlers.

use serde::Serialize;
use tabled::Tabled;

use armlink_core::capability::{CloudNetwork, CloudRegion, CloudResource, CloudVpc};
use armlink_core::{Region, is_classic_id};

use crate::cli::{GlobalOpts, VpcsArgs, VpcsCommand};
use crate::error::CliError;
use crate::output;

use super::networks::NetworkInfo;
use super::util;

// ── Views ───────────────────────────────────────────────────────────

#[derive(Serialize)]
struct VpcInfo {
    id: String,
    name: String,
    cidr: String,
    classic: bool,
    status: String,
    resource_group: String,
    networks: Vec<NetworkInfo>,
}

impl VpcInfo {
    async fn load(vpc: &dyn CloudVpc) -> Result<Self, CliError> {
        let networks = vpc
            .networks()
            .await?
            .iter()
            .map(|n| NetworkInfo::from_dyn(n.as_ref()))
            .collect();
        Ok(Self {
            id: vpc.id(),
            name: vpc.name(),
            cidr: vpc.cidr(),
            classic: vpc.is_classic(),
            status: vpc.status(),
            resource_group: vpc.project_id(),
            networks,
        })
    }
}

#[derive(Tabled)]
struct VpcRow {
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "CIDR")]
    cidr: String,
    #[tabled(rename = "Kind")]
    kind: &'static str,
    #[tabled(rename = "Subnets")]
    subnets: usize,
    #[tabled(rename = "Status")]
    status: String,
    #[tabled(rename = "Group")]
    group: String,
}

impl From<&VpcInfo> for VpcRow {
    fn from(v: &VpcInfo) -> Self {
        Self {
            name: v.name.clone(),
            cidr: v.cidr.clone(),
            kind: if v.classic { "classic" } else { "modern" },
            subnets: v.networks.len(),
            status: v.status.clone(),
            group: v.resource_group.clone(),
        }
    }
}

fn detail(v: &VpcInfo) -> String {
    let mut out = output::detail_lines(&[
        ("ID", output::dim(&v.id)),
        ("Name", v.name.clone()),
        ("CIDR", v.cidr.clone()),
        ("Kind", if v.classic { "classic" } else { "modern" }.into()),
        ("Status", output::paint_status(&v.status)),
        ("Group", v.resource_group.clone()),
    ]);
    for n in &v.networks {
        out.push_str(&format!(
            "\n  subnet {:<20} {:<18} gw {}",
            n.name, n.cidr, n.gateway
        ));
    }
    out
}

/// Fetch a VPC by id, modern or classic.
async fn fetch(region: &Region, id: &str) -> Result<Box<dyn CloudVpc>, CliError> {
    if is_classic_id(id) {
        Ok(Box::new(region.get_classic_vpc(id).await?))
    } else {
        Ok(Box::new(region.get_vpc(id).await?))
    }
}

// ── Handler ─────────────────────────────────────────────────────────

pub async fn handle(region: &Region, args: VpcsArgs, global: &GlobalOpts) -> Result<(), CliError> {
    match args.command {
        VpcsCommand::List => {
            let mut vpcs = Vec::new();
            for vpc in CloudRegion::vpcs(region).await? {
                vpcs.push(VpcInfo::load(vpc.as_ref()).await?);
            }
            let out = output::render_list(
                &global.output,
                &vpcs,
                |v| VpcRow::from(v),
                |v| v.id.clone(),
            )?;
            output::print_output(&out, global.quiet);
            Ok(())
        }

        VpcsCommand::Show { id } => {
            let vpc = fetch(region, &id).await?;
            let info = VpcInfo::load(vpc.as_ref()).await?;
            let out = output::render_single(&global.output, &info, detail, |v| v.id.clone())?;
            output::print_output(&out, global.quiet);
            Ok(())
        }

        VpcsCommand::Create { name, cidr, group } => {
            let vpc = region.create_vpc(&name, &cidr, &group).await?;
            util::report(global.quiet, &format!("VPC created: {}", vpc.id()));
            let info = VpcInfo::load(&vpc).await?;
            let out = output::render_single(&global.output, &info, detail, |v| v.id.clone())?;
            output::print_output(&out, global.quiet);
            Ok(())
        }

        VpcsCommand::Delete { id } => {
            let vpc = fetch(region, &id).await?;
            if !util::confirm(
                &format!("Delete VPC '{}' and all its subnets?", vpc.name()),
                global.yes,
            )? {
                return Ok(());
            }
            vpc.delete().await?;
            util::report(global.quiet, "VPC deleted");
            Ok(())
        }
    }
}

/// Subnets of every VPC in the region, through their wires.
pub async fn all_networks(region: &Region) -> Result<Vec<Box<dyn CloudNetwork>>, CliError> {
    let mut networks = Vec::new();
    for vpc in CloudRegion::vpcs(region).await? {
        for wire in vpc.wires().await? {
            networks.extend(wire.networks().await?);
        }
    }
    Ok(networks)
}
