use glazier_api::db::{establish_connection_with_config, DbConfig};
use migrations::Migrator;
use sea_orm_migration::MigratorTrait;
use tracing::{error, info};

/// `migration [up|down|fresh|status]`, defaulting to `up`.
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::INFO)
        .init();

    let database_url = std::env::var("APP__DATABASE_URL")
        .or_else(|_| std::env::var("DATABASE_URL"))
        .unwrap_or_else(|_| "sqlite://glazier.db?mode=rwc".to_string());
    let command = std::env::args().nth(1).unwrap_or_else(|| "up".to_string());

    info!(command = %command, "Starting database migration");

    let db = establish_connection_with_config(&DbConfig {
        url: database_url,
        max_connections: 2,
        ..Default::default()
    })
    .await?;

    let result = match command.as_str() {
        "up" => Migrator::up(&db, None).await,
        "down" => Migrator::down(&db, Some(1)).await,
        "fresh" => Migrator::fresh(&db).await,
        "status" => Migrator::status(&db).await,
        other => {
            error!(command = %other, "Unknown migration command");
            anyhow::bail!("unknown command '{other}', expected up, down, fresh or status");
        }
    };

    if let Err(e) = result {
        error!(error = %e, "Migration failed");
        return Err(e.into());
    }

    info!("Migration completed successfully");
    Ok(())
}
