mod commands;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "dscvr-cli")]
#[command(about = "dscvr venue discovery command line interface")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Search venues around a coordinate and print them ranked, as JSON
    Search {
        /// Latitude of the search origin
        #[arg(long, allow_negative_numbers = true)]
        lat: f64,
        /// Longitude of the search origin
        #[arg(long, allow_negative_numbers = true)]
        lng: f64,
        /// Search radius in meters (defaults to DSCVR_SEARCH_RADIUS_METERS)
        #[arg(long)]
        radius: Option<u32>,
        /// Comma-separated provider category types, e.g. restaurant,bar
        #[arg(long, value_delimiter = ',')]
        types: Vec<String>,
        /// Free-text keyword passed to the provider
        #[arg(long)]
        keyword: Option<String>,
        /// Mood filter; "romantic" adds Date Night tags
        #[arg(long)]
        vibe: Option<String>,
    },
    /// Print merged first-party and vendor reviews for a place, as JSON
    Reviews {
        /// Provider place identifier
        place_id: String,
    },
    /// Apply pending database migrations
    Migrate,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    let Some(command) = cli.command else {
        println!("dscvr-cli: run with --help to list commands");
        return Ok(());
    };

    let config = dscvr_core::load_app_config()?;
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();

    match command {
        Commands::Search {
            lat,
            lng,
            radius,
            types,
            keyword,
            vibe,
        } => {
            let args = commands::SearchArgs {
                lat,
                lng,
                radius,
                types,
                keyword,
                vibe,
            };
            commands::run_search(&config, args).await?;
        }
        Commands::Reviews { place_id } => commands::run_reviews(&config, &place_id).await?,
        Commands::Migrate => commands::run_migrate(&config).await?,
    }

    Ok(())
}
