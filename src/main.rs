/*!
 * Holonet CLI - browse the catalog from a terminal
 */

use anyhow::Context;
use clap::{Parser, Subcommand};
use comfy_table::{presets, Attribute, Cell, Color, ContentArrangement, Table};
use holonet::{
    error::{HolonetError, EXIT_FATAL, EXIT_PARTIAL, EXIT_SUCCESS},
    logging, ClientConfig, DetailAggregator, DetailOutcome, DisplayItem, NameAccumulator,
    PageOutcome, Projection, ResourceKind,
};
use holonet_connect::HttpGateway;
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Parser)]
#[command(name = "holonet")]
#[command(version, about = "Browse a paginated REST catalog with resolved relations", long_about = None)]
struct Cli {
    /// Configuration file (TOML)
    #[arg(short = 'c', long = "config", value_name = "FILE", global = true)]
    config: Option<PathBuf>,

    /// Catalog root URL, overrides the config file
    #[arg(long = "base-url", value_name = "URL", global = true)]
    base_url: Option<String>,

    /// Verbose logging
    #[arg(short = 'v', long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show one entity with every relation resolved to names
    Details {
        /// Resource kind (film, person, planet, species, starship, vehicle)
        kind: ResourceKind,

        /// Numeric id
        id: u32,

        /// Print JSON instead of a table
        #[arg(long)]
        json: bool,
    },

    /// List entity names page by page
    List {
        /// Resource kind (film, person, planet, species, starship, vehicle)
        kind: ResourceKind,

        /// Maximum number of pages to load
        #[arg(long, default_value_t = 1)]
        pages: u32,
    },
}

fn main() {
    let code = match run() {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            e.downcast_ref::<HolonetError>()
                .map(HolonetError::exit_code)
                .unwrap_or(EXIT_FATAL)
        }
    };
    std::process::exit(code);
}

fn run() -> anyhow::Result<i32> {
    let cli = Cli::parse();

    let mut config = match cli.config {
        Some(ref path) => ClientConfig::from_file(path)?,
        None => ClientConfig::default(),
    };
    if let Some(base_url) = cli.base_url {
        config.base_url = base_url;
    }
    if cli.verbose {
        config.verbose = true;
    }

    logging::init_logging(&config)?;

    let gateway = HttpGateway::new(config.gateway_config())
        .map_err(|e| HolonetError::Config(format!("Failed to build the HTTP gateway: {}", e)))?;

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .context("Failed to start the async runtime")?;

    runtime.block_on(async move {
        let gateway = Arc::new(gateway);
        match cli.command {
            Commands::Details { kind, id, json } => show_details(gateway, kind, id, json).await,
            Commands::List { kind, pages } => list_names(gateway, kind, pages).await,
        }
    })
}

async fn show_details(
    gateway: Arc<HttpGateway>,
    kind: ResourceKind,
    id: u32,
    json: bool,
) -> anyhow::Result<i32> {
    let aggregator = DetailAggregator::new(gateway, kind);

    if aggregator.get_details(id).await != DetailOutcome::Applied {
        eprintln!("Could not load {} {}", kind, id);
        return Ok(EXIT_PARTIAL);
    }

    let Some(projection) = aggregator.state().projection else {
        return Ok(EXIT_PARTIAL);
    };

    if json {
        println!("{}", serde_json::to_string_pretty(projection.as_ref())?);
    } else {
        println!("{}", projection_table(&projection));
    }
    Ok(EXIT_SUCCESS)
}

async fn list_names(
    gateway: Arc<HttpGateway>,
    kind: ResourceKind,
    pages: u32,
) -> anyhow::Result<i32> {
    let mut accumulator = NameAccumulator::new(gateway, kind);
    let mut code = EXIT_SUCCESS;

    for _ in 0..pages {
        match accumulator.load_next().await {
            PageOutcome::Loaded { exhausted: true, .. } => break,
            PageOutcome::Loaded { .. } => {}
            PageOutcome::Failed => {
                code = EXIT_PARTIAL;
                break;
            }
        }
    }

    let mut table = Table::new();
    table
        .load_preset(presets::UTF8_NO_BORDERS)
        .set_content_arrangement(ContentArrangement::Dynamic);

    for item in accumulator.items() {
        match item {
            DisplayItem::NamedEntry { id, name } => {
                table.add_row(vec![Cell::new(id).fg(Color::Cyan), Cell::new(name)]);
            }
            DisplayItem::Loading => {}
            DisplayItem::Error => {
                table.add_row(vec![
                    Cell::new("!").fg(Color::Red),
                    Cell::new("failed to load page").fg(Color::Red),
                ]);
            }
        }
    }
    println!("{}", table);

    if !accumulator.is_exhausted() && code == EXIT_SUCCESS {
        println!("More available from page {}", accumulator.next_page());
    }
    Ok(code)
}

fn projection_table(projection: &Projection) -> Table {
    let mut table = Table::new();
    table
        .load_preset(presets::UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic);

    for (label, value) in projection.iter() {
        table.add_row(vec![
            Cell::new(label).fg(Color::Cyan).add_attribute(Attribute::Bold),
            Cell::new(value),
        ]);
    }
    table
}
