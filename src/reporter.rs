//! Report orchestration
//!
//! [`BoostReporter`] runs one report end to end:
//!
//! 1. **Fetch**: walk the invoice pages through the [`Paginator`]
//! 2. **File**: fold every invoice into the [`ListenerBook`], printing the
//!    transaction log line for each attributed invoice in verbose mode
//! 3. **Display**: hand the listeners to the [`ReportDisplayManager`]
//!
//! A failed page aborts the run before anything is displayed.

use crate::aggregate::{Listener, ListenerBook};
use crate::client::AlbyClient;
use crate::config::Config;
use crate::display::ReportDisplayManager;
use crate::error::ApiError;
use crate::models::InvoiceRecord;
use crate::pagination::{InvoiceSource, Paginator};
use anyhow::Result;
use chrono::{DateTime, Utc};
use tracing::{info, warn, Instrument};

#[derive(Debug, Clone)]
pub struct ReportOptions {
    pub created_after: Option<DateTime<Utc>>,
    pub verbose: bool,
    pub json_output: bool,
}

pub struct BoostReporter<S> {
    paginator: Paginator<S>,
    display_manager: ReportDisplayManager,
}

impl BoostReporter<AlbyClient> {
    pub fn from_config(config: &Config) -> Result<Self> {
        let client = AlbyClient::from_config(&config.api)?;
        Ok(Self::new(
            client,
            config.api.page_size,
            ReportDisplayManager::new(config.report.timestamp_format.clone()),
        ))
    }
}

impl<S: InvoiceSource> BoostReporter<S> {
    pub fn new(source: S, page_size: u32, display_manager: ReportDisplayManager) -> Self {
        Self {
            paginator: Paginator::new(source, page_size),
            display_manager,
        }
    }

    /// Fetch every page, reporting progress on stderr unless JSON is requested.
    pub async fn fetch(&self, token: &str, options: &ReportOptions) -> Result<Vec<InvoiceRecord>, ApiError> {
        let show_progress = !options.json_output;
        let verbose = options.verbose && show_progress;

        self.paginator
            .fetch_all_with(token, options.created_after, |page, invoices| {
                if show_progress {
                    eprintln!("Loading more transactions... (page {page})");
                }
                if verbose {
                    for invoice in invoices {
                        eprintln!(
                            "id: {} - created at: {} - by: {}",
                            invoice.identifier,
                            invoice.created_at.as_deref().unwrap_or("?"),
                            invoice
                                .boostagram
                                .as_ref()
                                .and_then(|b| b.sender_name.as_deref())
                                .unwrap_or("?")
                        );
                    }
                    eprintln!("-------------------");
                }
            })
            .await
    }

    /// Group invoices by listener and episode, returning the transaction log
    /// lines for every attributed invoice alongside.
    pub fn file_invoices(&self, invoices: &[InvoiceRecord]) -> (Vec<Listener>, Vec<String>) {
        let mut book = ListenerBook::new();
        let mut log = Vec::new();

        for invoice in invoices {
            if let Some(payment) = book.record(invoice) {
                log.push(self.display_manager.transaction_line(invoice, payment));
            }
        }

        (book.into_listeners(), log)
    }

    pub async fn run(&self, token: &str, options: &ReportOptions) -> Result<Vec<Listener>, ApiError> {
        let span = crate::logging::report_span();

        async {
            let invoices = self.fetch(token, options).await?;
            let (listeners, log) = self.file_invoices(&invoices);

            info!(
                invoices = invoices.len(),
                listeners = listeners.len(),
                attributed = log.len(),
                "Invoices filed"
            );
            if log.is_empty() && !invoices.is_empty() {
                warn!("None of the fetched invoices carried boostagram metadata");
            }

            if options.verbose && !options.json_output {
                for line in &log {
                    println!("{line}");
                }
            }

            self.display_manager
                .display(&listeners, options.verbose, options.json_output);

            Ok::<_, ApiError>(listeners)
        }
        .instrument(span)
        .await
    }
}
