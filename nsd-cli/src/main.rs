//! NSD CLI - Command line tool for exploring surface depressions by watershed.

use clap::Parser;

#[derive(Parser)]
#[command(
    name = "nsd-cli",
    version,
    about = "Surface depression and wetland explorer for HUC8 watersheds"
)]
struct Cli {
    #[command(subcommand)]
    command: nsd_cmd::Command,

    #[command(flatten)]
    catalog: nsd_cmd::CatalogArgs,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    env_logger::init();
    let cli = Cli::parse();
    log::debug!("Catalog options: {:?}", cli.catalog);
    nsd_cmd::run(cli.command, &cli.catalog).await
}
