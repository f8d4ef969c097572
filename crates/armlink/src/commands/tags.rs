//! Resource tag command handlers.

use std::collections::{BTreeMap, HashMap};

use serde::Serialize;
use tabled::Tabled;

use armlink_core::{Region, TagMode};

use crate::cli::{GlobalOpts, TagsArgs, TagsCommand};
use crate::error::CliError;
use crate::output;

use super::util;

#[derive(Serialize, Tabled)]
struct TagRow {
    #[tabled(rename = "Key")]
    key: String,
    #[tabled(rename = "Value")]
    value: String,
}

/// Sorted rows, so table output is stable.
fn rows(tags: HashMap<String, String>) -> Vec<TagRow> {
    tags.into_iter()
        .collect::<BTreeMap<_, _>>()
        .into_iter()
        .map(|(key, value)| TagRow { key, value })
        .collect()
}

fn render(tags: HashMap<String, String>, global: &GlobalOpts) -> Result<String, CliError> {
    let rows = rows(tags);
    output::render_list(
        &global.output,
        &rows,
        |r| TagRow {
            key: r.key.clone(),
            value: r.value.clone(),
        },
        |r| format!("{}={}", r.key, r.value),
    )
}

pub async fn handle(region: &Region, args: TagsArgs, global: &GlobalOpts) -> Result<(), CliError> {
    let out = match args.command {
        TagsCommand::Get { id } => render(region.get_tags(&id).await?, global)?,
        TagsCommand::Set { id, tags, merge } => {
            let tags = util::parse_tags(&tags)?;
            let mode = if merge { TagMode::Merge } else { TagMode::Replace };
            let written = region.set_tags(&id, &tags, mode).await?;
            util::report(global.quiet, "Tags updated");
            render(written, global)?
        }
    };
    output::print_output(&out, global.quiet);
    Ok(())
}
