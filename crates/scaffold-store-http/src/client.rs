// crates/scaffold-store-http/src/client.rs
// ============================================================================
// Module: HTTP Record Store Client
// Description: reqwest-backed implementation of the RecordStore interface.
// Purpose: Issue container, database, and schema-patch calls over HTTP.
// Dependencies: async-trait, reqwest, scaffold-core, serde, serde_json
// ============================================================================

//! ## Overview
//! [`HttpRecordStore`] wraps a [`reqwest::Client`] configured with bounded
//! timeouts and optional bearer authentication. It translates the three
//! provisioning operations into the store's HTTP endpoints and classifies
//! every failure into the [`StoreError`] taxonomy. Throttling responses
//! carry the `Retry-After` header parsed as whole seconds; a missing or
//! non-numeric value degrades to no hint, leaving backoff to the pacer.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use reqwest::RequestBuilder;
use reqwest::Response;
use reqwest::StatusCode;
use reqwest::header::RETRY_AFTER;
use scaffold_core::ContainerId;
use scaffold_core::CreatedDatabase;
use scaffold_core::DataSourceId;
use scaffold_core::DatabaseId;
use scaffold_core::RecordStore;
use scaffold_core::StoreError;
use serde::Deserialize;
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Map;
use serde_json::Value;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Default connect timeout for store requests.
const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(1);
/// Default full-request timeout for store requests.
const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(15);
/// Default user agent for outbound requests.
const DEFAULT_USER_AGENT: &str = "scaffold/0.1";

// ============================================================================
// SECTION: Configuration
// ============================================================================

/// Configuration for the HTTP record-store client.
///
/// # Invariants
/// - `base_url` is used with its trailing slash stripped.
/// - `request_timeout` bounds the full request lifecycle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpRecordStoreConfig {
    /// Base URL of the record store API.
    pub base_url: String,
    /// Optional bearer token for authenticated requests.
    pub auth_token: Option<String>,
    /// Connect timeout for outbound requests.
    pub connect_timeout: Duration,
    /// Full-request timeout for outbound requests.
    pub request_timeout: Duration,
    /// User agent string for outbound requests.
    pub user_agent: String,
}

impl Default for HttpRecordStoreConfig {
    fn default() -> Self {
        Self {
            base_url: String::new(),
            auth_token: None,
            connect_timeout: DEFAULT_CONNECT_TIMEOUT,
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
            user_agent: DEFAULT_USER_AGENT.to_string(),
        }
    }
}

// ============================================================================
// SECTION: Wire Types
// ============================================================================

/// Container creation request body.
#[derive(Debug, Serialize)]
struct CreateContainerRequest<'a> {
    /// Container display title.
    title: &'a str,
    /// Optional container icon.
    #[serde(skip_serializing_if = "Option::is_none")]
    icon: Option<&'a str>,
}

/// Database creation request body.
#[derive(Debug, Serialize)]
struct CreateDatabaseRequest<'a> {
    /// Parent container identifier.
    parent_id: &'a str,
    /// Database display title.
    title: &'a str,
    /// Optional database icon.
    #[serde(skip_serializing_if = "Option::is_none")]
    icon: Option<&'a str>,
    /// Initial (non-relation) property payloads keyed by name.
    properties: &'a Map<String, Value>,
}

/// Schema patch request body.
#[derive(Debug, Serialize)]
struct PatchDatabaseRequest<'a> {
    /// Property payloads to add, keyed by name.
    properties: &'a Map<String, Value>,
}

/// Container creation response body.
#[derive(Debug, Deserialize)]
struct ContainerCreated {
    /// Assigned container identifier.
    id: String,
}

/// Database creation response body.
#[derive(Debug, Deserialize)]
struct DatabaseCreated {
    /// Assigned database identifier.
    id: String,
    /// Assigned data source identifier, when distinct.
    #[serde(default)]
    data_source_id: Option<String>,
}

// ============================================================================
// SECTION: Client
// ============================================================================

/// HTTP implementation of the record-store interface.
///
/// # Invariants
/// - Base URL is normalized without a trailing slash.
/// - The client never retries; throttling surfaces as [`StoreError::Throttled`].
pub struct HttpRecordStore {
    /// Record store base URL (no trailing slash).
    base_url: String,
    /// Optional bearer token for outbound requests.
    auth_token: Option<String>,
    /// HTTP client configured with timeouts.
    client: Client,
}

impl HttpRecordStore {
    /// Builds a new HTTP record-store client.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Transport`] when the HTTP client cannot be built.
    pub fn new(config: HttpRecordStoreConfig) -> Result<Self, StoreError> {
        let client = Client::builder()
            .connect_timeout(config.connect_timeout)
            .timeout(config.request_timeout)
            .user_agent(config.user_agent.clone())
            .build()
            .map_err(|err| StoreError::Transport(err.to_string()))?;
        let mut base_url = config.base_url;
        let trimmed_len = base_url.trim_end_matches('/').len();
        base_url.truncate(trimmed_len);
        Ok(Self {
            base_url,
            auth_token: config.auth_token,
            client,
        })
    }

    /// Attaches bearer authentication when a token is configured.
    fn authorize(&self, request: RequestBuilder) -> RequestBuilder {
        match &self.auth_token {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }

    /// Sends a request and classifies non-success statuses.
    async fn send(&self, request: RequestBuilder) -> Result<Response, StoreError> {
        let response = self
            .authorize(request)
            .send()
            .await
            .map_err(|err| StoreError::Transport(err.to_string()))?;
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        if status == StatusCode::TOO_MANY_REQUESTS {
            let hint = response.headers().get(RETRY_AFTER).and_then(|value| value.to_str().ok());
            return Err(StoreError::Throttled {
                retry_after: parse_retry_after(hint),
            });
        }
        let body = response.text().await.unwrap_or_default();
        Err(StoreError::Rejected {
            status: status.as_u16(),
            message: extract_message(&body),
        })
    }

    /// Decodes a success response body.
    async fn decode<T: DeserializeOwned>(response: Response) -> Result<T, StoreError> {
        response.json::<T>().await.map_err(|err| StoreError::InvalidResponse(err.to_string()))
    }
}

#[async_trait]
impl RecordStore for HttpRecordStore {
    async fn create_container(
        &self,
        title: &str,
        icon: Option<&str>,
    ) -> Result<ContainerId, StoreError> {
        let url = format!("{}/v1/containers", self.base_url);
        let request = self.client.post(url).json(&CreateContainerRequest {
            title,
            icon,
        });
        let response = self.send(request).await?;
        let created: ContainerCreated = Self::decode(response).await?;
        Ok(ContainerId::new(created.id))
    }

    async fn create_database(
        &self,
        parent: &ContainerId,
        title: &str,
        icon: Option<&str>,
        properties: &Map<String, Value>,
    ) -> Result<CreatedDatabase, StoreError> {
        let url = format!("{}/v1/databases", self.base_url);
        let request = self.client.post(url).json(&CreateDatabaseRequest {
            parent_id: parent.as_str(),
            title,
            icon,
            properties,
        });
        let response = self.send(request).await?;
        let created: DatabaseCreated = Self::decode(response).await?;
        Ok(CreatedDatabase {
            database_id: DatabaseId::new(created.id),
            data_source_id: created.data_source_id.map(DataSourceId::new),
        })
    }

    async fn patch_database_schema(
        &self,
        database_id: &DatabaseId,
        properties: &Map<String, Value>,
    ) -> Result<(), StoreError> {
        let url = format!("{}/v1/databases/{}", self.base_url, database_id);
        let request = self.client.patch(url).json(&PatchDatabaseRequest {
            properties,
        });
        self.send(request).await?;
        Ok(())
    }
}

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Parses a `Retry-After` header value as whole seconds.
///
/// Missing or non-numeric values yield `None`, deferring to exponential
/// backoff downstream.
pub(crate) fn parse_retry_after(value: Option<&str>) -> Option<Duration> {
    value.and_then(|value| value.trim().parse::<u64>().ok()).map(Duration::from_secs)
}

/// Extracts a human-readable message from an error response body.
pub(crate) fn extract_message(body: &str) -> String {
    if let Ok(value) = serde_json::from_str::<Value>(body)
        && let Some(message) = value.get("message").and_then(Value::as_str)
    {
        return message.to_string();
    }
    let trimmed = body.trim();
    if trimmed.is_empty() {
        "no error detail".to_string()
    } else {
        trimmed.to_string()
    }
}
