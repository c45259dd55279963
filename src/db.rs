use migration::{Migrator, MigratorTrait};
use sea_orm::{ConnectOptions, Database, DatabaseConnection, DbErr};
use std::time::Duration;

/// Connect to the configured database and bring the schema up to date.
pub async fn connect(database_url: &str) -> Result<DatabaseConnection, DbErr> {
    let backend = if database_url.starts_with("postgres") {
        "PostgreSQL"
    } else {
        "SQLite"
    };
    tracing::info!("Connecting to database ({})", backend);

    let mut opt = ConnectOptions::new(database_url.to_owned());
    opt.connect_timeout(Duration::from_secs(8))
        .acquire_timeout(Duration::from_secs(8))
        .sqlx_logging(false);

    // Every pooled connection to an in-memory SQLite database is a separate database
    if database_url.contains(":memory:") {
        opt.max_connections(1).min_connections(1);
    }

    let db = Database::connect(opt).await?;
    Migrator::up(&db, None).await?;
    tracing::info!("Database schema is up to date");

    Ok(db)
}
