//! Image command handlers: private images and the marketplace catalog.

use serde::Serialize;
use tabled::Tabled;

use armlink_core::capability::CloudResource;
use armlink_core::{Image, Region};

use crate::cli::{GlobalOpts, ImagesArgs, ImagesCommand};
use crate::error::CliError;
use crate::output;

// ── Views ───────────────────────────────────────────────────────────

#[derive(Tabled)]
struct ImageRow {
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Kind")]
    kind: String,
    #[tabled(rename = "OS")]
    os: String,
    #[tabled(rename = "Size (GB)")]
    size: String,
    #[tabled(rename = "Status")]
    status: String,
}

impl From<&Image> for ImageRow {
    fn from(i: &Image) -> Self {
        Self {
            name: i.name.clone(),
            kind: i.kind.to_string(),
            os: i.os_type.to_string(),
            size: i.size_gb.map_or_else(|| "-".into(), |s| s.to_string()),
            status: i.status(),
        }
    }
}

fn detail(i: &Image) -> String {
    let mut pairs = vec![
        ("ID", output::dim(&i.id)),
        ("Name", i.name.clone()),
        ("Kind", i.kind.to_string()),
        ("OS", i.os_type.to_string()),
        ("Size (GB)", i.size_gb.map_or_else(|| "-".into(), |s| s.to_string())),
        ("Status", output::paint_status(&i.status())),
    ];
    if let Some(info) = &i.info {
        pairs.push(("Distribution", info.dist.clone()));
        pairs.push(("Version", info.version.clone()));
        pairs.push(("Arch", info.arch.clone()));
    }
    output::detail_lines(&pairs)
}

/// One catalog entry: a publisher, offer, SKU or version name.
#[derive(Serialize, Tabled)]
struct CatalogRow {
    #[tabled(rename = "Name")]
    name: String,
}

fn render_catalog(names: Vec<String>, global: &GlobalOpts) -> Result<String, CliError> {
    let rows: Vec<CatalogRow> = names.into_iter().map(|name| CatalogRow { name }).collect();
    output::render_list(
        &global.output,
        &rows,
        |r| CatalogRow {
            name: r.name.clone(),
        },
        |r| r.name.clone(),
    )
}

// ── Handler ─────────────────────────────────────────────────────────

pub async fn handle(region: &Region, args: ImagesArgs, global: &GlobalOpts) -> Result<(), CliError> {
    let out = match args.command {
        ImagesCommand::List => {
            let images = region.list_images().await?;
            output::render_list(
                &global.output,
                &images,
                |i| ImageRow::from(i),
                |i| i.id.clone(),
            )?
        }
        ImagesCommand::Show { id } => {
            let image = region.get_image(&id).await?;
            output::render_single(&global.output, &image, detail, |i| i.id.clone())?
        }
        ImagesCommand::Publishers => render_catalog(region.list_image_publishers().await?, global)?,
        ImagesCommand::Offers { publisher } => {
            render_catalog(region.list_image_offers(&publisher).await?, global)?
        }
        ImagesCommand::Skus { publisher, offer } => {
            render_catalog(region.list_image_skus(&publisher, &offer).await?, global)?
        }
        ImagesCommand::Versions {
            publisher,
            offer,
            sku,
        } => render_catalog(
            region.list_image_versions(&publisher, &offer, &sku).await?,
            global,
        )?,
    };
    output::print_output(&out, global.quiet);
    Ok(())
}
