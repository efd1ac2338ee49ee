mod resolve;

use clap::{Parser, Subcommand};
use donorlink_geocode::{GeocodeSettings, GeocodingClient};
use tracing_subscriber::EnvFilter;
use uuid::Uuid;

#[derive(Debug, Parser)]
#[command(name = "donorlink-cli")]
#[command(about = "Donorlink operator command line interface")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Apply pending database migrations
    Migrate,
    /// Re-run reverse geocoding for one donation request
    Resolve {
        /// Donation request id
        id: Uuid,
    },
    /// Re-run reverse geocoding for every request still showing coordinates
    ResolvePending {
        /// Maximum number of requests to process
        #[arg(long, default_value = "100")]
        limit: u32,
        /// Parallel lookups; defaults to DONORLINK_RESOLVE_CONCURRENCY
        #[arg(long)]
        concurrency: Option<usize>,
        /// List the requests that would be resolved without calling the provider
        #[arg(long)]
        dry_run: bool,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    let Some(command) = cli.command else {
        println!("donorlink-cli: no command given; see --help");
        return Ok(());
    };

    let config = donorlink_core::load_app_config()?;
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    let pool = donorlink_db::connect_pool_from_config(&config).await?;

    match command {
        Commands::Migrate => {
            let applied = donorlink_db::run_migrations(&pool).await?;
            println!("applied {applied} migration(s)");
        }
        Commands::Resolve { id } => {
            let geocoder = GeocodingClient::new(GeocodeSettings::from_app_config(&config))?;
            resolve::run_resolve_one(&pool, &geocoder, id).await?;
        }
        Commands::ResolvePending {
            limit,
            concurrency,
            dry_run,
        } => {
            let geocoder = GeocodingClient::new(GeocodeSettings::from_app_config(&config))?;
            let concurrency = concurrency.unwrap_or(config.resolve_concurrency);
            resolve::run_resolve_pending(&pool, &geocoder, i64::from(limit), concurrency, dry_run)
                .await?;
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests;
