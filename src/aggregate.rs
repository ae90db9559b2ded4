//! Listener / episode / payment aggregation
//!
//! Folds the flat invoice list into a two-level grouping: every listener
//! (identified by sender name) owns the episodes they paid for, and every
//! episode owns its payments in arrival order. Invoices without boostagram
//! metadata are not attributable and are skipped.
//!
//! Totals are always computed from the payment lists on demand, so they can
//! never drift from the payments they summarize.

use crate::currency::Bitcoin;
use crate::models::{ActionType, Boostagram, InvoiceRecord};
use chrono::{DateTime, Utc};

pub const ANONYMOUS_LISTENER: &str = "Anonymous";
pub const MISSING_GUID: &str = "No guid";

#[derive(Debug, Clone, PartialEq)]
pub struct Payment {
    pub kind: ActionType,
    pub amount: Bitcoin,
    pub date: DateTime<Utc>,
    pub message: Option<String>,
    /// Playback position in seconds.
    pub timestamp: Option<i64>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Episode {
    pub title: Option<String>,
    pub guid: String,
    /// Date of the first payment seen for this episode.
    pub date: DateTime<Utc>,
    pub payments: Vec<Payment>,
}

impl Episode {
    fn new(title: Option<String>, guid: Option<String>, date: DateTime<Utc>) -> Self {
        Self {
            title,
            guid: guid.unwrap_or_else(|| MISSING_GUID.to_string()),
            date,
            payments: Vec::new(),
        }
    }

    /// Title if known, otherwise the episode GUID.
    pub fn display_title(&self) -> &str {
        self.title.as_deref().unwrap_or(&self.guid)
    }

    fn matches(&self, boost: &Boostagram) -> bool {
        boost.episode_guid.as_deref() == Some(self.guid.as_str()) || self.title == boost.episode
    }

    pub fn payments_of(&self, kind: ActionType) -> impl Iterator<Item = &Payment> {
        self.payments.iter().filter(move |p| p.kind == kind)
    }

    pub fn stream_payments(&self) -> impl Iterator<Item = &Payment> {
        self.payments_of(ActionType::Stream)
    }

    pub fn boost_payments(&self) -> impl Iterator<Item = &Payment> {
        self.payments_of(ActionType::Boost)
    }

    pub fn stream_total(&self) -> Bitcoin {
        self.stream_payments().map(|p| p.amount).sum()
    }

    pub fn boost_total(&self) -> Bitcoin {
        self.boost_payments().map(|p| p.amount).sum()
    }

    pub fn has_boosts(&self) -> bool {
        self.boost_payments().next().is_some()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Listener {
    pub name: String,
    pub episodes: Vec<Episode>,
}

impl Listener {
    fn new(name: String) -> Self {
        Self {
            name,
            episodes: Vec::new(),
        }
    }

    pub fn stream_total(&self) -> Bitcoin {
        self.episodes.iter().map(Episode::stream_total).sum()
    }

    pub fn boost_total(&self) -> Bitcoin {
        self.episodes.iter().map(Episode::boost_total).sum()
    }

    pub fn payment_count(&self) -> usize {
        self.episodes.iter().map(|e| e.payments.len()).sum()
    }

    fn episode_for(&mut self, boost: &Boostagram, date: DateTime<Utc>) -> &mut Episode {
        let index = match self.episodes.iter().position(|e| e.matches(boost)) {
            Some(index) => index,
            None => {
                self.episodes
                    .push(Episode::new(boost.episode.clone(), boost.episode_guid.clone(), date));
                self.episodes.len() - 1
            }
        };
        &mut self.episodes[index]
    }
}

/// Amount actually paid: the millisat total from the boostagram when present,
/// otherwise the invoice amount.
pub fn effective_amount(invoice: &InvoiceRecord, boost: &Boostagram) -> Bitcoin {
    match boost.value_msat_total {
        Some(msats) => Bitcoin::from_sats(msats / 1000),
        None => Bitcoin::from_sats(invoice.amount),
    }
}

/// Sender name, or [`ANONYMOUS_LISTENER`] when absent or blank.
pub fn listener_name(boost: &Boostagram) -> &str {
    match boost.sender_name.as_deref() {
        Some(name) if !name.is_empty() => name,
        _ => ANONYMOUS_LISTENER,
    }
}

/// Incremental builder for the listener grouping.
#[derive(Debug, Default)]
pub struct ListenerBook {
    listeners: Vec<Listener>,
}

impl ListenerBook {
    pub fn new() -> Self {
        Self::default()
    }

    /// File one invoice under its listener and episode. Returns the payment
    /// that was recorded, or `None` when the invoice carries no boostagram.
    pub fn record(&mut self, invoice: &InvoiceRecord) -> Option<&Payment> {
        let boost = invoice.boostagram.as_ref()?;

        let payment = Payment {
            kind: boost.action,
            amount: effective_amount(invoice, boost),
            date: invoice.creation_date,
            message: boost.message.clone(),
            timestamp: boost.ts,
        };

        let episode = self
            .listener_for(listener_name(boost))
            .episode_for(boost, invoice.creation_date);
        episode.payments.push(payment);
        episode.payments.last()
    }

    fn listener_for(&mut self, name: &str) -> &mut Listener {
        let index = match self.listeners.iter().position(|l| l.name == name) {
            Some(index) => index,
            None => {
                self.listeners.push(Listener::new(name.to_string()));
                self.listeners.len() - 1
            }
        };
        &mut self.listeners[index]
    }

    pub fn listeners(&self) -> &[Listener] {
        &self.listeners
    }

    pub fn into_listeners(self) -> Vec<Listener> {
        self.listeners
    }
}

pub fn aggregate(invoices: &[InvoiceRecord]) -> Vec<Listener> {
    let mut book = ListenerBook::new();
    for invoice in invoices {
        book.record(invoice);
    }
    book.into_listeners()
}
