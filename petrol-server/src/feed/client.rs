//! Baserow table client for station rows.

use std::time::Duration;

use reqwest::header::{AUTHORIZATION, HeaderMap, HeaderValue};
use serde::Deserialize;
use serde_json::Value;
use tracing::debug;

use super::error::FeedError;

/// Rows requested per page (Baserow's maximum).
const PAGE_SIZE: u32 = 200;

/// Stop following `next` after this many pages.
const MAX_PAGES: u32 = 500;

/// One page of the Baserow list-rows endpoint.
#[derive(Debug, Deserialize)]
struct RowsPage {
    #[serde(default)]
    next: Option<String>,
    #[serde(default)]
    results: Vec<Value>,
}

/// Either the paginated envelope or a bare array of rows.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum RowsBody {
    Page(RowsPage),
    Rows(Vec<Value>),
}

/// Configuration for the feed client.
#[derive(Debug, Clone)]
pub struct FeedClientConfig {
    /// Base URL of the Baserow instance, e.g. `https://api.baserow.io`
    pub base_url: String,
    pub table_id: String,
    /// Database token, sent as `Authorization: Token ..`
    pub token: Option<String>,
    /// Request timeout in seconds
    pub timeout_secs: u64,
}

impl FeedClientConfig {
    pub fn new(base_url: impl Into<String>, table_id: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            table_id: table_id.into(),
            token: None,
            timeout_secs: 30,
        }
    }

    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    pub fn with_timeout_secs(mut self, secs: u64) -> Self {
        self.timeout_secs = secs;
        self
    }

    /// Set a custom base URL (for testing).
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }
}

/// Client for the station table.
#[derive(Debug, Clone)]
pub struct FeedClient {
    http: reqwest::Client,
    rows_url: String,
}

impl FeedClient {
    /// Create a new feed client.
    pub fn new(config: FeedClientConfig) -> Result<Self, FeedError> {
        if config.table_id.trim().is_empty() {
            return Err(FeedError::NotConfigured("table id is empty".to_string()));
        }

        let mut headers = HeaderMap::new();
        if let Some(token) = &config.token {
            let value = HeaderValue::from_str(&format!("Token {token}")).map_err(|_| {
                FeedError::NotConfigured("token contains invalid header characters".to_string())
            })?;
            headers.insert(AUTHORIZATION, value);
        }

        let http = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        let rows_url = format!(
            "{}/api/database/rows/table/{}/",
            config.base_url.trim_end_matches('/'),
            config.table_id.trim()
        );

        Ok(Self { http, rows_url })
    }

    /// The rows endpoint, which also identifies the table.
    pub fn rows_url(&self) -> &str {
        &self.rows_url
    }

    /// Fetch every row of the table, following pagination.
    pub async fn fetch_all(&self) -> Result<Vec<Value>, FeedError> {
        let mut rows = Vec::new();

        for page in 1..=MAX_PAGES {
            match self.fetch_page(page).await? {
                RowsBody::Rows(all) => {
                    rows.extend(all);
                    break;
                }
                RowsBody::Page(RowsPage { next, results }) => {
                    debug!(page, count = results.len(), "fetched station rows");
                    let exhausted = results.is_empty() || next.is_none();
                    rows.extend(results);
                    if exhausted {
                        break;
                    }
                }
            }
        }

        Ok(rows)
    }

    async fn fetch_page(&self, page: u32) -> Result<RowsBody, FeedError> {
        let response = self
            .http
            .get(&self.rows_url)
            .query(&[
                ("user_field_names", "true".to_string()),
                ("size", PAGE_SIZE.to_string()),
                ("page", page.to_string()),
            ])
            .send()
            .await?;
        let status = response.status();

        if status == reqwest::StatusCode::UNAUTHORIZED || status == reqwest::StatusCode::FORBIDDEN {
            return Err(FeedError::Unauthorized);
        }

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(FeedError::Api {
                status: status.as_u16(),
                message: body,
            });
        }

        let body = response.text().await?;

        serde_json::from_str(&body).map_err(|e| FeedError::Json {
            message: e.to_string(),
        })
    }
}
