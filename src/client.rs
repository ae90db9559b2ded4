//! Alby API client
//!
//! Issues authenticated requests against the incoming-invoices endpoint and
//! turns each HTTP response into a [`Page`] or an [`ApiError`].
//!
//! Response handling follows a fixed ladder:
//! - 2xx: the body must decode as an invoice list, pagination headers are read
//! - 404: [`ApiError::NotFound`], whatever the body says
//! - anything else: the body is first tried as an invoice list (some servers
//!   flag errors through the status only), then as an [`ErrorResponse`]

use crate::config::ApiConfig;
use crate::error::ApiError;
use crate::models::{ErrorResponse, InvoiceRecord, Page};
use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use reqwest::header::{HeaderMap, AUTHORIZATION};
use reqwest::{Client, StatusCode};
use std::time::Duration;
use tracing::{debug, warn};

pub const DEFAULT_BASE_URL: &str = "https://api.getalby.com";
pub const INVOICES_PATH: &str = "/invoices/incoming";
pub const CURRENT_PAGE_HEADER: &str = "x-pagination-current-page";
pub const PAGE_COUNT_HEADER: &str = "x-pagination-page-count";

#[derive(Debug, Clone)]
pub struct AlbyClient {
    http: Client,
    base_url: String,
}

impl AlbyClient {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self> {
        let http = Client::builder()
            .timeout(timeout)
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    pub fn from_config(config: &ApiConfig) -> Result<Self> {
        Self::new(&config.base_url, Duration::from_secs(config.timeout_secs))
    }

    /// Fetch one page of incoming invoices created after `created_after`.
    pub async fn fetch_invoice_page(
        &self,
        token: &str,
        page: u32,
        page_size: u32,
        created_after: Option<DateTime<Utc>>,
    ) -> Result<Page<Vec<InvoiceRecord>>, ApiError> {
        let url = format!("{}{}", self.base_url, INVOICES_PATH);
        let query = invoice_query(page, page_size, created_after);

        debug!(%url, page, page_size, "Requesting invoice page");

        let response = self
            .http
            .get(&url)
            .header(AUTHORIZATION, format!("Bearer {token}"))
            .query(&query)
            .send()
            .await
            .map_err(|e| {
                warn!(error = %e, page, "Invoice request failed");
                ApiError::Unknown
            })?;

        let status = response.status();
        let headers = response.headers().clone();
        let body = response.bytes().await.map_err(|e| {
            warn!(error = %e, page, "Failed to read invoice response body");
            ApiError::Unknown
        })?;

        debug!(status = status.as_u16(), bytes = body.len(), "Received invoice page");

        interpret_response(status, &headers, &body)
    }
}

/// Query parameters for one invoice page request.
pub fn invoice_query(
    page: u32,
    page_size: u32,
    created_after: Option<DateTime<Utc>>,
) -> Vec<(&'static str, String)> {
    let mut query = vec![("page", page.to_string()), ("items", page_size.to_string())];
    if let Some(after) = created_after {
        query.push(("q[created_at_gt]", after.timestamp().to_string()));
    }
    query
}

pub fn interpret_response(
    status: StatusCode,
    headers: &HeaderMap,
    body: &[u8],
) -> Result<Page<Vec<InvoiceRecord>>, ApiError> {
    if status.is_success() {
        let items: Vec<InvoiceRecord> = serde_json::from_slice(body)?;
        return Ok(Page {
            items,
            current_page: header_number(headers, CURRENT_PAGE_HEADER),
            page_count: header_number(headers, PAGE_COUNT_HEADER),
        });
    }

    if status == StatusCode::NOT_FOUND {
        return Err(ApiError::NotFound);
    }

    if let Ok(items) = serde_json::from_slice::<Vec<InvoiceRecord>>(body) {
        warn!(status = status.as_u16(), "Accepting invoice list from non-success response");
        return Ok(Page::new(items));
    }

    let error: ErrorResponse = serde_json::from_slice(body)?;
    Err(ApiError::Remote(error))
}

fn header_number(headers: &HeaderMap, name: &str) -> Option<u32> {
    headers
        .get(name)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.trim().parse().ok())
}
