//! Typed client for the bookshelf REST API.
//!
//! One method per endpoint; responses are decoded 1:1 and error bodies are
//! surfaced as [`ClientError::Api`].

use std::time::Duration;

use chrono::{DateTime, Utc};
use reqwest::{Method, RequestBuilder, Response, Url};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use thiserror::Error;

const USER_AGENT: &str = concat!("bookshelf-client/", env!("CARGO_PKG_VERSION"));

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Book {
    pub id: String,
    pub title: String,
    pub author: String,
    pub status: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Note {
    pub id: String,
    pub book_id: String,
    pub content: String,
    pub created_at: DateTime<Utc>,
}

/// Body for creating or replacing a book.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookInput {
    pub title: String,
    pub author: String,
    pub status: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NoteInput {
    pub content: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeleteAck {
    pub message: String,
}

#[derive(Debug, Error)]
pub enum ClientError {
    /// The server answered with a non-2xx status.
    #[error("API error {status} ({code}): {message}")]
    Api {
        status: u16,
        code: String,
        message: String,
        details: Vec<serde_json::Value>,
    },

    #[error("invalid base URL {0:?}")]
    InvalidBaseUrl(String),

    #[error("request failed: {0}")]
    Transport(#[source] reqwest::Error),

    #[error("could not decode response: {0}")]
    Decode(#[source] reqwest::Error),
}

impl ClientError {
    /// HTTP status of an API error, if the server answered at all.
    pub fn status(&self) -> Option<u16> {
        match self {
            ClientError::Api { status, .. } => Some(*status),
            _ => None,
        }
    }
}

#[derive(Deserialize)]
struct ErrorEnvelope {
    error: ErrorBody,
}

#[derive(Deserialize)]
struct ErrorBody {
    code: String,
    message: String,
    #[serde(default)]
    details: Vec<serde_json::Value>,
}

/// Client bound to one API base URL, e.g. `http://127.0.0.1:8080/api`.
#[derive(Debug, Clone)]
pub struct BookshelfClient {
    http: reqwest::Client,
    base_url: Url,
}

impl BookshelfClient {
    pub fn new(base_url: &str) -> Result<Self, ClientError> {
        let http = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(Duration::from_secs(30))
            .build()
            .map_err(ClientError::Transport)?;

        Self::with_http(http, base_url)
    }

    /// Use a preconfigured `reqwest::Client`.
    pub fn with_http(http: reqwest::Client, base_url: &str) -> Result<Self, ClientError> {
        let mut parsed =
            Url::parse(base_url).map_err(|_| ClientError::InvalidBaseUrl(base_url.to_string()))?;

        // Trailing slash dropped; URLs like `mailto:` have no path to extend.
        parsed
            .path_segments_mut()
            .map_err(|_| ClientError::InvalidBaseUrl(base_url.to_string()))?
            .pop_if_empty();

        Ok(Self {
            http,
            base_url: parsed,
        })
    }

    pub fn base_url(&self) -> &str {
        self.base_url.as_str()
    }

    pub async fn list_books(&self) -> Result<Vec<Book>, ClientError> {
        self.send(self.request(Method::GET, &["books"])).await
    }

    pub async fn create_book(&self, input: &BookInput) -> Result<Book, ClientError> {
        self.send(self.request(Method::POST, &["books"]).json(input))
            .await
    }

    pub async fn get_book(&self, id: &str) -> Result<Book, ClientError> {
        self.send(self.request(Method::GET, &["books", id])).await
    }

    pub async fn update_book(&self, id: &str, input: &BookInput) -> Result<Book, ClientError> {
        self.send(self.request(Method::PUT, &["books", id]).json(input))
            .await
    }

    pub async fn delete_book(&self, id: &str) -> Result<DeleteAck, ClientError> {
        self.send(self.request(Method::DELETE, &["books", id]))
            .await
    }

    pub async fn list_notes(&self, book_id: &str) -> Result<Vec<Note>, ClientError> {
        self.send(self.request(Method::GET, &["books", book_id, "notes"]))
            .await
    }

    pub async fn create_note(&self, book_id: &str, input: &NoteInput) -> Result<Note, ClientError> {
        self.send(
            self.request(Method::POST, &["books", book_id, "notes"])
                .json(input),
        )
        .await
    }

    /// Endpoint URL under the base; each segment is percent-encoded.
    fn url(&self, segments: &[&str]) -> Url {
        let mut url = self.base_url.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }

    fn request(&self, method: Method, segments: &[&str]) -> RequestBuilder {
        let url = self.url(segments);
        tracing::debug!(method = method.as_str(), url = url.as_str(), "bookshelf request");
        self.http.request(method, url)
    }

    async fn send<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T, ClientError> {
        let response = request.send().await.map_err(ClientError::Transport)?;

        if !response.status().is_success() {
            return Err(api_error(response).await);
        }

        response.json::<T>().await.map_err(ClientError::Decode)
    }
}

async fn api_error(response: Response) -> ClientError {
    let status = response.status().as_u16();

    let text = match response.text().await {
        Ok(text) => text,
        Err(e) => return ClientError::Transport(e),
    };

    match serde_json::from_str::<ErrorEnvelope>(&text) {
        Ok(ErrorEnvelope { error }) => ClientError::Api {
            status,
            code: error.code,
            message: error.message,
            details: error.details,
        },
        Err(_) => ClientError::Api {
            status,
            code: "unknown".to_string(),
            message: text,
            details: vec![],
        },
    }
}
