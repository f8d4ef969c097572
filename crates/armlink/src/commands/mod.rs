//! Command dispatch: bridges CLI args -> core facade -> output formatting.

pub mod apps;
pub mod config_cmd;
pub mod groups;
pub mod images;
pub mod networks;
pub mod regions;
pub mod secgroups;
pub mod tags;
pub mod util;
pub mod vms;
pub mod vpcs;

use armlink_core::Provider;

use crate::cli::{Command, GlobalOpts};
use crate::error::CliError;

/// Dispatch an ARM-bound command to the appropriate handler.
///
/// Everything except `regions` runs against one region, resolved from
/// `region_name` before the handler is called.
pub async fn dispatch(
    cmd: Command,
    provider: &Provider,
    region_name: Option<&str>,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    if let Command::Regions(args) = cmd {
        return regions::handle(provider, args, global).await;
    }

    let region = util::resolve_region(provider, region_name).await?;
    match cmd {
        Command::Vpcs(args) => vpcs::handle(&region, args, global).await,
        Command::Networks(args) => networks::handle(&region, args, global).await,
        Command::Secgroups(args) => secgroups::handle(&region, args, global).await,
        Command::Vms(args) => vms::handle(&region, args, global).await,
        Command::Apps(args) => apps::handle(&region, args, global).await,
        Command::Images(args) => images::handle(&region, args, global).await,
        Command::Tags(args) => tags::handle(&region, args, global).await,
        Command::Groups => groups::handle(&region, global).await,
        // Regions, Config and Completions are handled before this point
        Command::Regions(_) | Command::Config(_) | Command::Completions(_) => unreachable!(),
    }
}
