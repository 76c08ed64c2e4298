//! Bookshelf application library
//!
//! Wires the project modules into the kernel registry and drives the server
//! lifecycle: connect, init, migrate, start, serve, stop.

pub mod modules;

use anyhow::Context;
use bookshelf_kernel::{settings::Settings, InitCtx, ModuleRegistry};
use sea_orm::DatabaseConnection;

/// Registry holding every project module in mount order
pub fn registry() -> ModuleRegistry {
    let mut registry = ModuleRegistry::new();
    modules::register_all(&mut registry);
    registry
}

/// Apply every pending migration contributed by the registered modules
pub async fn migrate(registry: &ModuleRegistry, db: &DatabaseConnection) -> anyhow::Result<usize> {
    bookshelf_db::migrate(db, &registry.collect_migrations())
        .await
        .context("failed to apply migrations")
}

/// Boot the application and serve until Ctrl-C
pub async fn run(settings: Settings) -> anyhow::Result<()> {
    tracing::info!(
        env = ?settings.environment,
        port = settings.server.port,
        "bookshelf-app bootstrap starting"
    );

    let db = bookshelf_db::connect(&settings.database).await?;
    let registry = registry();
    let ctx = InitCtx {
        settings: &settings,
        db: &db,
    };

    registry.init_modules(&ctx).await?;

    if settings.database.auto_migrate {
        let applied = migrate(&registry, &db).await?;
        tracing::info!(applied, "schema up to date");
    } else {
        tracing::info!("auto_migrate disabled, skipping migrations");
    }

    registry.start_modules(&ctx).await?;

    let served = bookshelf_http::start_server(&registry, &ctx).await;

    registry.stop_modules().await?;
    db.close().await.context("failed to close database pool")?;

    served
}
