//! Books and the reading notes attached to them.

pub mod entity;
pub mod handlers;
pub mod models;
pub mod openapi;
pub mod repository;

use std::sync::Arc;

use async_trait::async_trait;
use axum::{routing::get, Router};
use bookshelf_kernel::{InitCtx, Migration, Module};
use sea_orm::ConnectionTrait;

use repository::Library;

/// Library module: book CRUD plus per-book notes
pub struct LibraryModule;

impl LibraryModule {
    pub const fn new() -> Self {
        Self
    }
}

impl Default for LibraryModule {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Module for LibraryModule {
    fn name(&self) -> &'static str {
        "books"
    }

    async fn init(&self, ctx: &InitCtx<'_>) -> anyhow::Result<()> {
        tracing::info!(
            module = self.name(),
            environment = ?ctx.settings.environment,
            backend = ?ctx.db.get_database_backend(),
            "books module initialized"
        );
        Ok(())
    }

    fn routes(&self, ctx: &InitCtx<'_>) -> Router {
        Router::new()
            .route("/", get(handlers::list_books).post(handlers::create_book))
            .route(
                "/{id}",
                get(handlers::get_book)
                    .put(handlers::update_book)
                    .delete(handlers::delete_book),
            )
            .route(
                "/{id}/notes",
                get(handlers::list_notes).post(handlers::create_note),
            )
            .with_state(Library::new(ctx.db.clone()))
    }

    fn openapi(&self) -> Option<serde_json::Value> {
        Some(openapi::fragment())
    }

    fn migrations(&self) -> Vec<Migration> {
        vec![
            Migration {
                id: "001_create_books",
                up: r#"
                    CREATE TABLE IF NOT EXISTS books (
                        id          VARCHAR(36)  PRIMARY KEY,
                        title       VARCHAR(300) NOT NULL,
                        author      VARCHAR(30)  NOT NULL,
                        status      VARCHAR(20)  NOT NULL
                            CHECK (status IN ('not_started', 'in_progress', 'finished')),
                        created_at  TIMESTAMPTZ  NOT NULL
                    )
                "#,
            },
            Migration {
                id: "002_create_notes",
                up: r#"
                    CREATE TABLE IF NOT EXISTS notes (
                        id          VARCHAR(36)  PRIMARY KEY,
                        book_id     VARCHAR(36)  NOT NULL REFERENCES books (id),
                        content     VARCHAR(500) NOT NULL,
                        created_at  TIMESTAMPTZ  NOT NULL
                    )
                "#,
            },
            Migration {
                id: "003_index_notes_book_id",
                up: "CREATE INDEX IF NOT EXISTS notes_book_id_idx ON notes (book_id)",
            },
        ]
    }

    async fn start(&self, _ctx: &InitCtx<'_>) -> anyhow::Result<()> {
        tracing::info!(module = self.name(), "books module started");
        Ok(())
    }

    async fn stop(&self) -> anyhow::Result<()> {
        tracing::info!(module = self.name(), "books module stopped");
        Ok(())
    }
}

/// Create a new instance of the books module
pub fn create_module() -> Arc<dyn Module> {
    Arc::new(LibraryModule::new())
}
