//! Resource group listing.

use serde::Serialize;
use tabled::Tabled;

use armlink_core::Region;

use crate::cli::GlobalOpts;
use crate::error::CliError;
use crate::output;

use super::util;

#[derive(Serialize)]
struct GroupInfo {
    id: String,
    name: String,
    location: String,
    state: String,
    tags: Vec<String>,
}

#[derive(Tabled)]
struct GroupRow {
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Location")]
    location: String,
    #[tabled(rename = "State")]
    state: String,
    #[tabled(rename = "Tags")]
    tags: String,
}

impl From<&GroupInfo> for GroupRow {
    fn from(g: &GroupInfo) -> Self {
        Self {
            name: g.name.clone(),
            location: g.location.clone(),
            state: g.state.clone(),
            tags: util::join_or_dash(&g.tags),
        }
    }
}

pub async fn handle(region: &Region, global: &GlobalOpts) -> Result<(), CliError> {
    let groups: Vec<GroupInfo> = region
        .list_resource_groups()
        .await?
        .into_iter()
        .map(|g| {
            let mut tags: Vec<String> = g
                .tags
                .unwrap_or_default()
                .into_iter()
                .map(|(k, v)| format!("{k}={v}"))
                .collect();
            tags.sort();
            GroupInfo {
                id: g.id,
                name: g.name,
                location: g.location,
                state: g.properties.provisioning_state,
                tags,
            }
        })
        .collect();
    let out = output::render_list(
        &global.output,
        &groups,
        |g| GroupRow::from(g),
        |g| g.name.clone(),
    )?;
    output::print_output(&out, global.quiet);
    Ok(())
}
