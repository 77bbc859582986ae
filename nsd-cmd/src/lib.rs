//! Command implementations for the depression explorer CLI.
//!
//! Provides subcommands for resolving watersheds, exploring depression and
//! wetland datasets, and printing the selection map and wetland legend.

use clap::Subcommand;
use nsd_data::location::{DEFAULT_LAT, DEFAULT_LON};

pub mod explore;
pub mod source;

pub use source::{AnyCatalog, CatalogArgs};

#[derive(Subcommand)]
pub enum Command {
    /// Find the HUC8 watershed containing a point
    Resolve {
        /// Longitude in degrees
        #[arg(long, default_value_t = DEFAULT_LON, allow_negative_numbers = true)]
        lon: f64,

        /// Latitude in degrees
        #[arg(long, default_value_t = DEFAULT_LAT, allow_negative_numbers = true)]
        lat: f64,
    },

    /// Show the dataset bundle of a HUC8 code
    Select {
        /// 8-digit watershed code
        #[arg(long)]
        huc8: String,
    },

    /// Resolve a point, compose its layers and summarize its depressions
    Explore {
        /// Longitude in degrees
        #[arg(long, default_value_t = DEFAULT_LON, allow_negative_numbers = true)]
        lon: f64,

        /// Latitude in degrees
        #[arg(long, default_value_t = DEFAULT_LAT, allow_negative_numbers = true)]
        lat: f64,

        /// Map click event as JSON (`{"lng": .., "lat": ..}`), overrides --lon/--lat
        #[arg(long)]
        click: Option<String>,

        /// Output path for the drawable layers as JSON
        #[arg(short = 'l', long)]
        layers_json: Option<String>,

        /// Output path for the watershed attribute CSV
        #[arg(short = 't', long)]
        table_csv: Option<String>,
    },

    /// Print the NWI wetland legend
    Legend,

    /// Print the watershed selection map layers
    Overview {
        /// Output path for the layers as JSON
        #[arg(short = 'l', long)]
        layers_json: Option<String>,
    },
}

pub async fn run(command: Command, catalog: &CatalogArgs) -> anyhow::Result<()> {
    match command {
        Command::Resolve { lon, lat } => {
            let location = explore::parse_location(lon, lat, None)?;
            explore::run_resolve(catalog, location).await
        }
        Command::Select { huc8 } => explore::run_select(catalog, &huc8),
        Command::Explore {
            lon,
            lat,
            click,
            layers_json,
            table_csv,
        } => {
            let location = explore::parse_location(lon, lat, click.as_deref())?;
            explore::run_explore(
                catalog,
                location,
                layers_json.as_deref(),
                table_csv.as_deref(),
            )
            .await
        }
        Command::Legend => explore::run_legend(),
        Command::Overview { layers_json } => explore::run_overview(catalog, layers_json.as_deref()),
    }
}
