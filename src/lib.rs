//! Boost Report Library
//!
//! Fetches incoming Lightning invoices from the Alby API, attributes the ones
//! carrying boostagram metadata to listeners and podcast episodes, and renders
//! a per-listener support report.
//!
//! ## Architecture Overview
//!
//! - [`currency`] - [`Bitcoin`] amounts backed by an exact satoshi count
//! - [`models`] - Wire shapes of the invoices endpoint
//! - [`error`] - [`ApiError`], the typed failure of a page fetch
//! - [`client`] - HTTP client for `/invoices/incoming`
//! - [`pagination`] - Sequential page walker that stops on the first short page
//! - [`aggregate`] - Listener → episode → payment grouping with derived totals
//! - [`display`] - Text and JSON rendering of the report
//! - [`reporter`] - Orchestrates fetch, grouping and display for one run
//! - [`credentials`] - Bearer token storage
//! - [`dates`] - Date window parsing and playback time formatting
//! - [`config`] - Configuration with file and environment overrides
//! - [`logging`] - Structured logging setup
//!
//! ## Usage Example
//!
//! ```no_run
//! use boost_report::{AlbyClient, Paginator, aggregate};
//! use std::time::Duration;
//!
//! # async fn example() -> anyhow::Result<()> {
//! let client = AlbyClient::new("https://api.getalby.com", Duration::from_secs(15))?;
//! let invoices = Paginator::new(client, 25).fetch_all("token", None).await?;
//! for listener in aggregate(&invoices) {
//!     println!("{}: {}", listener.name, listener.stream_total());
//! }
//! # Ok(())
//! # }
//! ```

pub mod aggregate;
pub mod client;
pub mod config;
pub mod credentials;
pub mod currency;
pub mod dates;
pub mod display;
pub mod error;
pub mod logging;
pub mod models;
pub mod pagination;
pub mod reporter;

pub use aggregate::{aggregate, Episode, Listener, ListenerBook, Payment};
pub use client::AlbyClient;
pub use currency::Bitcoin;
pub use error::ApiError;
pub use models::*;
pub use pagination::{fetch_all_invoices, InvoiceSource, Paginator};
pub use reporter::{BoostReporter, ReportOptions};
