mod analytics;
mod collect;
mod creators;
mod db;

use clap::{CommandFactory, Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use analytics::AnalyticsCommands;
use creators::CreatorCommands;
use db::DbCommands;

#[derive(Debug, Parser)]
#[command(name = "tokscope")]
#[command(about = "Track short-video creators and their engagement")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Database maintenance
    Db {
        #[command(subcommand)]
        command: DbCommands,
    },
    /// Manage tracked creators
    Creators {
        #[command(subcommand)]
        command: CreatorCommands,
    },
    /// Scrape one creator and store the result
    Scrape {
        username: String,

        /// Maximum number of videos to keep from the scrape
        #[arg(long)]
        limit: Option<usize>,

        /// Print the scrape summary without writing to the database
        #[arg(long)]
        dry_run: bool,
    },
    /// Scrape every tracked creator
    Collect {
        /// Restrict collection to a single creator
        #[arg(long)]
        creator: Option<String>,
    },
    /// Engagement analytics over stored videos (JSON output)
    Analytics {
        #[command(subcommand)]
        command: AnalyticsCommands,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    let Some(command) = cli.command else {
        Cli::command().print_help()?;
        return Ok(());
    };

    let config = tokscope_core::load_app_config_from_env()?;

    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt().with_env_filter(env_filter).init();
    tracing::debug!(env = %config.env, "configuration loaded");

    let pool = tokscope_db::connect_pool(
        &config.database_url,
        tokscope_db::PoolConfig::from_app_config(&config),
    )
    .await?;

    match command {
        Commands::Db { command } => db::run(&pool, &config, command).await,
        Commands::Creators { command } => creators::run(&pool, &config, command).await,
        Commands::Scrape {
            username,
            limit,
            dry_run,
        } => {
            let limit = limit.unwrap_or(config.scraper_video_limit);
            collect::run_scrape(&pool, &config, &username, limit, dry_run).await
        }
        Commands::Collect { creator } => {
            collect::run_collect(&pool, &config, creator.as_deref()).await
        }
        Commands::Analytics { command } => analytics::run(&pool, command).await,
    }
}
