#![cfg(test)]
use tokio::sync::OnceCell;
use sea_orm::DatabaseConnection;
use migration::MigratorTrait;
use models::db::connect_with_config;

// Ensure migrations run only once across the entire test process
static MIGRATED: OnceCell<bool> = OnceCell::const_new();

fn test_config() -> configs::DatabaseConfig {
    let mut cfg = configs::AppConfig::load_and_validate()
        .map(|c| c.database)
        .unwrap_or_default();
    cfg.min_connections = cfg.min_connections.min(1);
    cfg.connect_timeout_secs = cfg.connect_timeout_secs.min(5);
    cfg.acquire_timeout_secs = cfg.acquire_timeout_secs.min(10);
    cfg
}

/// Connection for DB-backed tests, or `None` when `SKIP_DB_TESTS` is set
/// or Postgres cannot be reached.
pub async fn get_db() -> Result<Option<DatabaseConnection>, anyhow::Error> {
    if std::env::var("SKIP_DB_TESTS").is_ok() {
        return Ok(None);
    }
    let migrated = *MIGRATED
        .get_or_init(|| async {
            let db = match connect_with_config(&test_config()).await {
                Ok(db) => db,
                Err(e) => {
                    eprintln!("skip: cannot connect to db: {}", e);
                    return false;
                }
            };
            if let Err(e) = migration::Migrator::up(&db, None).await {
                eprintln!("skip: migrate up failed: {}", e);
                return false;
            }
            true
        })
        .await;
    if !migrated {
        return Ok(None);
    }

    // Fresh connection for the current test's runtime
    let db = connect_with_config(&test_config()).await?;
    Ok(Some(db))
}
