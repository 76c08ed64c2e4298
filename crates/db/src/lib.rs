//! Connection pool factory and migration runner.

mod applied;

use std::time::Duration;

use anyhow::Context;
use bookshelf_kernel::{settings::DatabaseSettings, Migration};
use sea_orm::{
    ActiveModelTrait, ConnectOptions, ConnectionTrait, Database, DatabaseConnection, EntityTrait,
    Schema, Set, TransactionTrait,
};

/// Open a pooled connection described by `settings`.
///
/// The backend is picked from the URL scheme.
pub async fn connect(settings: &DatabaseSettings) -> anyhow::Result<DatabaseConnection> {
    let mut options = ConnectOptions::new(settings.url.clone());
    options
        .max_connections(settings.max_connections)
        .min_connections(settings.min_connections.min(settings.max_connections))
        .connect_timeout(Duration::from_secs(settings.connect_timeout_secs))
        .sqlx_logging(settings.log_statements);

    let db = Database::connect(options)
        .await
        .context("failed to connect to database")?;

    db.ping().await.context("database did not answer ping")?;

    tracing::info!(
        target: "bookshelf-db",
        backend = ?db.get_database_backend(),
        max_connections = settings.max_connections,
        "database connected"
    );

    Ok(db)
}

async fn ensure_bookkeeping_table(db: &DatabaseConnection) -> anyhow::Result<()> {
    let backend = db.get_database_backend();
    let mut create = Schema::new(backend).create_table_from_entity(applied::Entity);
    create.if_not_exists();

    db.execute(backend.build(&create))
        .await
        .context("failed to create migrations table")?;

    Ok(())
}

/// Migration keys that have already been recorded.
pub async fn applied_migrations(db: &DatabaseConnection) -> anyhow::Result<Vec<String>> {
    ensure_bookkeeping_table(db).await?;

    let rows = applied::Entity::find()
        .all(db)
        .await
        .context("failed to read applied migrations")?;

    Ok(rows.into_iter().map(|row| row.id).collect())
}

/// Apply every migration not yet recorded, each in its own transaction.
///
/// Returns how many migrations ran.
pub async fn migrate(
    db: &DatabaseConnection,
    migrations: &[(String, Migration)],
) -> anyhow::Result<usize> {
    let done = applied_migrations(db).await?;
    let mut count = 0;

    for (module, migration) in migrations {
        let key = format!("{}/{}", module, migration.id);
        if done.contains(&key) {
            tracing::debug!(target: "bookshelf-db", migration = %key, "already applied, skipping");
            continue;
        }

        tracing::info!(target: "bookshelf-db", migration = %key, "applying migration");

        let txn = db.begin().await?;
        txn.execute_unprepared(migration.up)
            .await
            .with_context(|| format!("failed to execute migration {}", key))?;
        applied::ActiveModel {
            id: Set(key.clone()),
            applied_at: Set(chrono::Utc::now()),
        }
        .insert(&txn)
        .await
        .with_context(|| format!("failed to record migration {}", key))?;
        txn.commit().await?;

        count += 1;
    }

    tracing::info!(target: "bookshelf-db", applied = count, "migrations complete");
    Ok(count)
}
