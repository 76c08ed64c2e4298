#![allow(dead_code)]

use axum::{
    body::Body,
    http::{header, Method, Request, StatusCode},
    Router,
};
use bookshelf_kernel::{
    settings::{DatabaseSettings, Settings},
    InitCtx,
};
use sea_orm::DatabaseConnection;
use serde_json::Value;
use tower::ServiceExt;

/// Full application router over a fresh in-memory SQLite database.
pub struct TestApp {
    pub router: Router,
    pub db: DatabaseConnection,
}

impl TestApp {
    pub async fn new() -> Self {
        let settings = Settings {
            database: DatabaseSettings {
                url: "sqlite::memory:".to_string(),
                max_connections: 1,
                min_connections: 1,
                ..DatabaseSettings::default()
            },
            ..Settings::default()
        };

        let db = bookshelf_db::connect(&settings.database).await.unwrap();
        let registry = bookshelf_app::registry();
        let ctx = InitCtx {
            settings: &settings,
            db: &db,
        };

        registry.init_modules(&ctx).await.unwrap();
        bookshelf_app::migrate(&registry, &db).await.unwrap();
        registry.start_modules(&ctx).await.unwrap();

        let router = bookshelf_http::build_router(&registry, &ctx);
        Self { router, db }
    }

    pub async fn request(&self, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        let body = match body {
            Some(json) => {
                builder = builder.header(header::CONTENT_TYPE, "application/json");
                Body::from(json.to_string())
            }
            None => Body::empty(),
        };

        let response = self
            .router
            .clone()
            .oneshot(builder.body(body).unwrap())
            .await
            .unwrap();

        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let json = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or(Value::Null)
        };

        (status, json)
    }

    pub async fn get(&self, uri: &str) -> (StatusCode, Value) {
        self.request(Method::GET, uri, None).await
    }

    pub async fn post(&self, uri: &str, body: Value) -> (StatusCode, Value) {
        self.request(Method::POST, uri, Some(body)).await
    }

    pub async fn put(&self, uri: &str, body: Value) -> (StatusCode, Value) {
        self.request(Method::PUT, uri, Some(body)).await
    }

    pub async fn delete(&self, uri: &str) -> (StatusCode, Value) {
        self.request(Method::DELETE, uri, None).await
    }

    /// Create a book and return its id.
    pub async fn create_book(&self, title: &str, author: &str, status: &str) -> String {
        let (code, book) = self
            .post(
                "/api/books",
                serde_json::json!({ "title": title, "author": author, "status": status }),
            )
            .await;
        assert_eq!(code, StatusCode::CREATED, "create failed: {book}");
        book["id"].as_str().unwrap().to_string()
    }
}

/// Field names listed in a validation error body, in response order.
pub fn error_fields(body: &Value) -> Vec<String> {
    body["error"]["details"]
        .as_array()
        .unwrap()
        .iter()
        .map(|detail| detail["field"].as_str().unwrap().to_string())
        .collect()
}
