use anyhow::Result;
use catalog_search::{config::Config, CatalogSearch, Format, SearchQuery};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing::info;

#[derive(Parser)]
#[command(name = "catalog-search", version)]
#[command(about = "Search CSW, WMS and WMTS catalogs", long_about = None)]
struct Cli {
    /// Path to configuration file (defaults apply when omitted)
    #[arg(long)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Search a catalog and print the result as JSON
    Search {
        /// Catalog protocol: csw, wms or wmts
        #[arg(long)]
        format: Format,

        /// Service URL; existing query parameters are kept
        #[arg(long)]
        url: String,

        /// 1-based position of the first record
        #[arg(long, default_value = "1")]
        start: u32,

        /// Page size (default from config)
        #[arg(long)]
        max: Option<u32>,

        /// Free-text filter
        #[arg(long)]
        text: Option<String>,
    },
    /// Describe WMS layers (associated WFS/WCS services)
    Describe {
        /// WMS service URL
        #[arg(long)]
        url: String,

        /// Comma-separated layer names
        #[arg(long, value_delimiter = ',', required = true)]
        layers: Vec<String>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    let config = Config::load_or_default(cli.config.as_deref())?;
    let search = CatalogSearch::from_config(&config)?;

    match cli.command {
        Commands::Search {
            format,
            url,
            start,
            max,
            text,
        } => {
            let max = max.unwrap_or(config.search.default_max_records);
            let outcome = match text {
                Some(text) => search.text_search(format, &url, start, max, &text).await?,
                None => {
                    search
                        .get_records(&SearchQuery::new(format, &url, start, max))
                        .await?
                }
            };
            let result = outcome.into_result_shape();
            info!(
                "{} of {} records returned",
                result.number_of_records_returned, result.number_of_records_matched
            );
            println!("{}", serde_json::to_string_pretty(&result)?);
        }
        Commands::Describe { url, layers } => {
            let descriptions = search.wms().describe_layers(&url, &layers).await?;
            println!("{}", serde_json::to_string_pretty(&descriptions)?);
        }
    }
    Ok(())
}
