//! Pagination driver
//!
//! Walks the invoice list one page at a time until the server returns a short
//! page. The page-count header is not consulted: a page holding fewer items
//! than requested is the only end-of-data signal. Each request is awaited
//! before the next one is issued, so pages are accumulated in server order and
//! never overlap.

use crate::client::AlbyClient;
use crate::error::ApiError;
use crate::models::{InvoiceRecord, Page};
use chrono::{DateTime, Utc};
use tracing::{debug, info};

pub const DEFAULT_PAGE_SIZE: u32 = 25;

/// Anything that can hand out one page of incoming invoices.
#[allow(async_fn_in_trait)]
pub trait InvoiceSource {
    async fn fetch_invoice_page(
        &self,
        token: &str,
        page: u32,
        page_size: u32,
        created_after: Option<DateTime<Utc>>,
    ) -> Result<Page<Vec<InvoiceRecord>>, ApiError>;
}

impl InvoiceSource for AlbyClient {
    async fn fetch_invoice_page(
        &self,
        token: &str,
        page: u32,
        page_size: u32,
        created_after: Option<DateTime<Utc>>,
    ) -> Result<Page<Vec<InvoiceRecord>>, ApiError> {
        AlbyClient::fetch_invoice_page(self, token, page, page_size, created_after).await
    }
}

pub struct Paginator<S> {
    source: S,
    page_size: u32,
}

impl<S: InvoiceSource> Paginator<S> {
    /// `page_size` must be non-zero; a zero page size is bumped to one.
    pub fn new(source: S, page_size: u32) -> Self {
        Self {
            source,
            page_size: page_size.max(1),
        }
    }

    pub fn page_size(&self) -> u32 {
        self.page_size
    }

    pub async fn fetch_all(
        &self,
        token: &str,
        created_after: Option<DateTime<Utc>>,
    ) -> Result<Vec<InvoiceRecord>, ApiError> {
        self.fetch_all_with(token, created_after, |_, _| {}).await
    }

    /// Like [`Paginator::fetch_all`], reporting every fetched page to `on_page`
    /// before moving on to the next one.
    pub async fn fetch_all_with<F>(
        &self,
        token: &str,
        created_after: Option<DateTime<Utc>>,
        mut on_page: F,
    ) -> Result<Vec<InvoiceRecord>, ApiError>
    where
        F: FnMut(u32, &[InvoiceRecord]),
    {
        let mut page = 1;
        let mut invoices = Vec::new();

        loop {
            info!(page, "Loading more transactions");
            let response = self
                .source
                .fetch_invoice_page(token, page, self.page_size, created_after)
                .await?;

            let fetched = response.items.len();
            debug!(
                page,
                fetched,
                server_page = ?response.current_page,
                server_page_count = ?response.page_count,
                "Fetched invoice page"
            );

            on_page(page, &response.items);
            invoices.extend(response.items);

            if fetched < self.page_size as usize {
                break;
            }
            page += 1;
        }

        info!(pages = page, invoices = invoices.len(), "Finished loading transactions");
        Ok(invoices)
    }
}

/// Fetch every incoming invoice created after `created_after` using the
/// default page size.
pub async fn fetch_all_invoices<S: InvoiceSource>(
    source: S,
    token: &str,
    created_after: Option<DateTime<Utc>>,
) -> Result<Vec<InvoiceRecord>, ApiError> {
    Paginator::new(source, DEFAULT_PAGE_SIZE)
        .fetch_all(token, created_after)
        .await
}
