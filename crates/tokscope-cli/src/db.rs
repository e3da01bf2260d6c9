use clap::Subcommand;

#[derive(Debug, Subcommand)]
pub enum DbCommands {
    /// Verify the database is reachable
    Ping,
    /// Apply pending migrations
    Migrate,
    /// Upsert creators from the seed file (TOKSCOPE_CREATORS_PATH)
    Seed,
}

pub(crate) async fn run(
    pool: &sqlx::PgPool,
    config: &tokscope_core::AppConfig,
    command: DbCommands,
) -> anyhow::Result<()> {
    match command {
        DbCommands::Ping => {
            tokscope_db::health_check(pool).await?;
            println!("database ok");
        }
        DbCommands::Migrate => {
            let applied = tokscope_db::run_migrations(pool).await?;
            println!("applied {applied} migrations");
        }
        DbCommands::Seed => {
            let creators_file = tokscope_core::load_creators(&config.creators_path)?;
            let count = tokscope_db::seed_creators(pool, &creators_file.creators).await?;
            tracing::info!(count, path = %config.creators_path.display(), "creators seeded");
            println!("seeded {count} creators");
        }
    }
    Ok(())
}
