//! Region command handlers.
//!
//! `show` walks the region through the capability traits, the same way a
//! provider-agnostic caller would see it.

use serde::Serialize;
use tabled::Tabled;

use armlink_core::capability::{CloudRegion, CloudResource};
use armlink_core::{Provider, Region};

use crate::cli::{GlobalOpts, RegionsArgs, RegionsCommand};
use crate::error::CliError;
use crate::output;

use super::util;

// ── Views ───────────────────────────────────────────────────────────

#[derive(Serialize)]
struct RegionInfo {
    name: String,
    display_name: String,
    global_id: String,
    latitude: Option<f64>,
    longitude: Option<f64>,
}

impl From<&Region> for RegionInfo {
    fn from(r: &Region) -> Self {
        let geo = r.geography();
        Self {
            name: r.name().to_owned(),
            display_name: r.display_name().to_owned(),
            global_id: r.global_id(),
            latitude: geo.map(|(lat, _)| lat),
            longitude: geo.map(|(_, lon)| lon),
        }
    }
}

#[derive(Tabled)]
struct RegionRow {
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Display Name")]
    display_name: String,
    #[tabled(rename = "Global ID")]
    global_id: String,
    #[tabled(rename = "Geography")]
    geography: String,
}

impl From<&RegionInfo> for RegionRow {
    fn from(r: &RegionInfo) -> Self {
        Self {
            name: r.name.clone(),
            display_name: r.display_name.clone(),
            global_id: r.global_id.clone(),
            geography: match (r.latitude, r.longitude) {
                (Some(lat), Some(lon)) => format!("{lat:.2}, {lon:.2}"),
                _ => "-".into(),
            },
        }
    }
}

#[derive(Serialize)]
struct ZoneInfo {
    id: String,
    global_id: String,
    hosts: Vec<String>,
    wires: Vec<WireInfo>,
}

#[derive(Serialize)]
struct WireInfo {
    id: String,
    vpc_id: String,
    bandwidth_mbps: u32,
}

#[derive(Serialize)]
struct RegionDetail {
    #[serde(flatten)]
    region: RegionInfo,
    status: String,
    zones: Vec<ZoneInfo>,
}

fn detail(d: &RegionDetail) -> String {
    let mut lines = output::detail_lines(&[
        ("Name", d.region.name.clone()),
        ("Display Name", d.region.display_name.clone()),
        ("Global ID", output::dim(&d.region.global_id)),
        ("Status", output::paint_status(&d.status)),
    ]);
    for zone in &d.zones {
        lines.push_str(&format!("\n\nZone {}", zone.id));
        for host in &zone.hosts {
            lines.push_str(&format!("\n  host  {host}"));
        }
        for wire in &zone.wires {
            lines.push_str(&format!(
                "\n  wire  {} ({} Mbps)",
                wire.id, wire.bandwidth_mbps
            ));
        }
    }
    lines
}

async fn describe(region: &Region) -> Result<RegionDetail, CliError> {
    let mut zones = Vec::new();
    for zone in CloudRegion::zones(region).await? {
        let hosts = zone.hosts().await?.iter().map(|h| h.id()).collect();
        let wires = zone
            .wires()
            .await?
            .iter()
            .map(|w| WireInfo {
                id: w.id(),
                vpc_id: w.vpc_id(),
                bandwidth_mbps: w.bandwidth(),
            })
            .collect();
        zones.push(ZoneInfo {
            id: zone.id(),
            global_id: zone.global_id(),
            hosts,
            wires,
        });
    }
    Ok(RegionDetail {
        region: RegionInfo::from(region),
        status: CloudResource::status(region),
        zones,
    })
}

// ── Handler ─────────────────────────────────────────────────────────

pub async fn handle(
    provider: &Provider,
    args: RegionsArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    match args.command {
        RegionsCommand::List => {
            let regions: Vec<RegionInfo> =
                provider.regions().await?.iter().map(RegionInfo::from).collect();
            let out = output::render_list(
                &global.output,
                &regions,
                |r| RegionRow::from(r),
                |r| r.name.clone(),
            )?;
            output::print_output(&out, global.quiet);
            Ok(())
        }

        RegionsCommand::Show { region } => {
            let region = util::resolve_region(provider, Some(&region)).await?;
            let info = describe(&region).await?;
            let out =
                output::render_single(&global.output, &info, detail, |d| d.region.name.clone())?;
            output::print_output(&out, global.quiet);
            Ok(())
        }
    }
}
