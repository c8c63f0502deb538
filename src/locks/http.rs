//! locks::http
//!
//! Lock registry client speaking the large-file locking HTTP API.
//!
//! # Design
//!
//! A search is a single `GET <endpoint>/locks` request. Pagination cursors
//! in the answer are not followed: a push is admitted against exactly one
//! registry round-trip, so an answer carrying a `next_cursor` is refused as
//! incomplete.
//!
//! # Example
//!
//! ```ignore
//! use lfsgate::locks::{HttpLockClient, LockClient, LockFilter};
//!
//! let client = HttpLockClient::new("https://lfs.example.com/repo.git/info/lfs", None);
//! let locks = client.search_locks(&LockFilter::default(), 0, true).await?;
//! ```

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, AUTHORIZATION, USER_AGENT};
use reqwest::{Client, Response, StatusCode};
use serde::Deserialize;

use super::traits::{LockClient, LockError, LockFilter};
use crate::core::locks::LockRecord;

/// Media type of the locking API.
const MEDIA_TYPE: &str = "application/vnd.git-lfs+json";

/// User-Agent header value for registry requests.
const USER_AGENT_VALUE: &str = concat!("lfsgate/", env!("CARGO_PKG_VERSION"));

/// HTTP lock registry client.
pub struct HttpLockClient {
    /// HTTP client for making requests
    client: Client,
    /// Registry endpoint, without the trailing `/locks`
    endpoint: String,
    /// Bearer token, if one was configured
    token: Option<String>,
}

// Custom Debug to avoid exposing the token
impl std::fmt::Debug for HttpLockClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpLockClient")
            .field("endpoint", &self.endpoint)
            .field("has_token", &self.token.is_some())
            .finish()
    }
}

impl HttpLockClient {
    /// Create a client for the given endpoint.
    pub fn new(endpoint: impl Into<String>, token: Option<String>) -> Self {
        let endpoint = endpoint.into().trim_end_matches('/').to_string();
        Self {
            client: Client::new(),
            endpoint,
            token,
        }
    }

    /// The registry endpoint.
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    fn locks_url(&self) -> String {
        format!("{}/locks", self.endpoint)
    }

    fn headers(&self) -> Result<HeaderMap, LockError> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static(MEDIA_TYPE));
        headers.insert(USER_AGENT, HeaderValue::from_static(USER_AGENT_VALUE));
        if let Some(token) = &self.token {
            let value = HeaderValue::from_str(&format!("Bearer {}", token))
                .map_err(|_| LockError::AuthFailed("token is not a valid header value".into()))?;
            headers.insert(AUTHORIZATION, value);
        }
        Ok(headers)
    }

    fn query(filter: &LockFilter, limit: usize) -> Vec<(&'static str, String)> {
        let mut query = Vec::new();
        if let Some(path) = &filter.path {
            query.push(("path", path.clone()));
        }
        if let Some(id) = &filter.id {
            query.push(("id", id.clone()));
        }
        if limit > 0 {
            query.push(("limit", limit.to_string()));
        }
        query
    }

    /// Map a non-success response onto a `LockError`.
    async fn error_from_response(response: Response) -> LockError {
        let status = response.status();
        let message = match response.json::<ApiErrorBody>().await {
            Ok(body) => body.message,
            Err(_) => "Unknown error".to_string(),
        };

        match status {
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => LockError::AuthFailed(message),
            StatusCode::NOT_FOUND => LockError::NotFound(message),
            StatusCode::TOO_MANY_REQUESTS => LockError::RateLimited,
            _ if status.is_server_error() => LockError::ApiError {
                status: status.as_u16(),
                message: format!("lock registry server error: {}", message),
            },
            _ => LockError::ApiError {
                status: status.as_u16(),
                message,
            },
        }
    }
}

#[async_trait]
impl LockClient for HttpLockClient {
    fn name(&self) -> &'static str {
        "http"
    }

    async fn search_locks(
        &self,
        filter: &LockFilter,
        limit: usize,
        include_remote: bool,
    ) -> Result<Vec<LockRecord>, LockError> {
        if !include_remote {
            return Err(LockError::LocalCacheUnavailable);
        }

        let response = self
            .client
            .get(self.locks_url())
            .headers(self.headers()?)
            .query(&Self::query(filter, limit))
            .send()
            .await
            .map_err(|e| LockError::NetworkError(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(Self::error_from_response(response).await);
        }

        let body: LockListBody = response.json().await.map_err(|e| LockError::ApiError {
            status: status.as_u16(),
            message: format!("Failed to parse response: {}", e),
        })?;

        body.into_records()
    }
}

// =============================================================================
// Wire types
// =============================================================================

#[derive(Debug, Deserialize)]
struct LockListBody {
    #[serde(default)]
    locks: Vec<ApiLock>,
    #[serde(default)]
    next_cursor: Option<String>,
}

impl LockListBody {
    /// Convert the page into records, refusing a page that has successors.
    fn into_records(self) -> Result<Vec<LockRecord>, LockError> {
        match self.next_cursor {
            Some(cursor) if !cursor.is_empty() => Err(LockError::IncompleteSnapshot(cursor)),
            _ => Ok(self.locks.into_iter().map(LockRecord::from).collect()),
        }
    }
}

#[derive(Debug, Deserialize)]
struct ApiLock {
    #[serde(default)]
    id: String,
    path: String,
    #[serde(default)]
    locked_at: Option<DateTime<Utc>>,
    #[serde(default)]
    owner: Option<ApiOwner>,
}

#[derive(Debug, Default, Deserialize)]
struct ApiOwner {
    #[serde(default)]
    name: String,
    #[serde(default)]
    email: String,
}

#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    message: String,
}

impl From<ApiLock> for LockRecord {
    fn from(lock: ApiLock) -> Self {
        let owner = lock.owner.unwrap_or_default();
        LockRecord {
            id: lock.id,
            path: lock.path,
            owner_name: owner.name,
            owner_email: owner.email,
            locked_at: lock.locked_at,
        }
    }
}
