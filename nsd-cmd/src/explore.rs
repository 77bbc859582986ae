//! Watershed lookup and exploration commands.

use log::info;
use nsd_data::watershed::reference_watersheds;
use nsd_data::{
    compose_overview, Composition, DatasetBundle, Explorer, Location, MapClick, Report, Selector,
    Session,
};

use crate::source::CatalogArgs;

/// Location from `--click` JSON, or from the longitude/latitude fields.
pub fn parse_location(lon: f64, lat: f64, click: Option<&str>) -> anyhow::Result<Location> {
    let location = match click {
        Some(json) => {
            let click: MapClick = serde_json::from_str(json)?;
            Location::try_from(click)?
        }
        None => Location::new(lon, lat)?,
    };
    Ok(location)
}

fn print_bundle(bundle: &DatasetBundle) {
    let generic = bundle.generic();
    println!("Depressions (10-m): {}", generic.depressions);
    println!("NWI wetlands:       {}", generic.wetlands);
    if let DatasetBundle::Enhanced { enhanced, .. } = bundle {
        println!("Enhanced LiDAR bundle:");
        for id in enhanced.ids() {
            println!("  {}", id);
        }
    }
}

fn print_composition(composition: &Composition) {
    for (i, layer) in composition.layers.iter().enumerate() {
        let visibility = if layer.shown { "on" } else { "off" };
        println!("  {:>2}. {:<22} [{}]", i + 1, layer.name, visibility);
    }
    let viewport = composition.viewport;
    println!(
        "Center: ({}, {}) zoom {}",
        viewport.lon, viewport.lat, viewport.zoom
    );
}

fn print_report(report: &Report) {
    let watershed = &report.watershed;
    match &watershed.name {
        Some(name) => println!("HUC8 {} ({})", watershed.huc8, name),
        None => println!("HUC8 {}", watershed.huc8),
    }
    println!("HUC8 Area: {} km2", watershed.area_sqkm);
    print_bundle(&report.bundle);

    println!("Layers:");
    for (i, entry) in report.layers.iter().enumerate() {
        let visibility = if entry.layer.shown { "on" } else { "off" };
        let status = match &entry.status {
            nsd_data::LayerStatus::Ready => String::new(),
            nsd_data::LayerStatus::Missing { reason } => format!(" missing: {}", reason),
        };
        println!("  {:>2}. {:<22} [{}]{}", i + 1, entry.layer.name, visibility, status);
    }

    if !report.wetlands.is_empty() {
        println!("NWI Wetland Type:");
        for category in report.wetlands.iter().filter(|c| c.count > 0) {
            println!("  {:<34} {} {}", category.name, category.color, category.count);
        }
    }

    match &report.summary {
        Some(summary) => {
            println!("Depression Count: {}", summary.depression_count);
            println!("Depression Area (sqkm): {:.4}", summary.total_area_sqkm);
            println!("Depression Volume (km3): {:.6}", summary.total_volume_km3);
            println!("Depression Share: {:.2}%", summary.depression_percent());
            match summary.sample() {
                Ok(_) => {
                    if let Some(table) = &report.sample_table {
                        println!("First depression:\n{}", table.trim_end());
                    }
                }
                Err(e) => println!("{}", e),
            }
        }
        None => println!("No depression data"),
    }

    for issue in &report.issues {
        println!("warning: {}: {}", issue.dataset, issue.message);
    }
}

/// Resolve a location to its watershed and print the dataset bundle.
pub async fn run_resolve(args: &CatalogArgs, location: Location) -> anyhow::Result<()> {
    let explorer = Explorer::new(args.open()?, args.config()?);
    let watershed = explorer.resolve(location).await?;
    match nsd_utils::huc::region(&watershed.huc8) {
        Some(region) => println!("HUC8 {} (region {})", watershed.huc8, region),
        None => println!("HUC8 {}", watershed.huc8),
    }
    print_bundle(&explorer.selector().select(&watershed.huc8));
    Ok(())
}

/// Print the bundle of a HUC8 code without touching the catalog.
pub fn run_select(args: &CatalogArgs, huc8: &str) -> anyhow::Result<()> {
    let huc8 = nsd_utils::huc::parse_huc8(huc8)?;
    let config = args.config()?;
    let selector = Selector::new(&config.namespace, &config.reserved_huc8);
    print_bundle(&selector.select(&huc8));
    Ok(())
}

/// Run the full pipeline and optionally export layers and the attribute table.
pub async fn run_explore(
    args: &CatalogArgs,
    location: Location,
    layers_json: Option<&str>,
    table_csv: Option<&str>,
) -> anyhow::Result<()> {
    let explorer = Explorer::new(args.open()?, args.config()?);
    let mut session = Session::new();
    let selection = session.submit(&explorer, location).await?;
    let report = &selection.report;
    info!(
        "Explored ({}, {}) at {}",
        location.lon(),
        location.lat(),
        selection.resolved_at
    );
    print_report(report);

    if let Some(path) = layers_json {
        let layers: Vec<_> = report.ready_layers().collect();
        let document = serde_json::json!({
            "viewport": report.viewport,
            "layers": layers,
        });
        std::fs::write(path, serde_json::to_string_pretty(&document)?)?;
        info!("Wrote {} layers to {}", layers.len(), path);
    }
    if let Some(path) = table_csv {
        std::fs::write(path, &report.watershed_table)?;
        info!("Wrote watershed attributes to {}", path);
    }
    Ok(())
}

/// Print the selection map layers. Needs no catalog.
pub fn run_overview(args: &CatalogArgs, layers_json: Option<&str>) -> anyhow::Result<()> {
    let config = args.config()?;
    let watersheds = reference_watersheds(&config.watershed_collection, config.extent);
    let selector = Selector::new(&config.namespace, &config.reserved_huc8);
    let composition = compose_overview(selector.namespace(), &watersheds);
    println!("Selection map:");
    print_composition(&composition);
    if let Some(path) = layers_json {
        std::fs::write(path, serde_json::to_string_pretty(&composition)?)?;
        info!("Wrote overview layers to {}", path);
    }
    Ok(())
}

/// Print the NWI wetland legend.
pub fn run_legend() -> anyhow::Result<()> {
    println!("NWI Wetland Type");
    for (name, color) in nsd_data::style::legend() {
        println!("  {:<34} {}", name, color);
    }
    Ok(())
}
