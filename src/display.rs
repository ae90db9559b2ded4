//! Report Formatting and Display
//!
//! Turns the listener grouping into the console report. Every section is
//! rendered to a `String` first, so the same text can be printed, logged or
//! asserted on.
//!
//! ## Sections
//!
//! - **Transaction log** (verbose): one line per attributed invoice, emitted
//!   while invoices are being filed
//! - **General report** (verbose): per listener, the streamed total of every
//!   episode followed by its boosts
//! - **Streamers**: every listener with their streamed total
//! - **Boost**: listeners who boosted, their boosted episodes and each boost
//!   with its message and playback position
//!
//! With `json_output` the streamers and boost sections are emitted as one
//! JSON document instead:
//!
//! ```json
//! {
//!   "streamers": [{ "name": "alice", "streamTotal": 1000 }],
//!   "boosts": [
//!     {
//!       "name": "alice",
//!       "boostTotal": 500,
//!       "episodes": [
//!         {
//!           "title": "E1",
//!           "boosts": [{ "amount": 500, "message": "nice", "playback": "unknown", "date": "..." }]
//!         }
//!       ]
//!     }
//!   ]
//! }
//! ```

use crate::aggregate::{Listener, Payment};
use crate::dates::format_playback_time;
use crate::models::InvoiceRecord;
use chrono::{DateTime, Local, Utc};
use colored::Colorize;
use serde::Serialize;
use std::fmt::Write;

pub const NO_MESSAGE: &str = "No message";
pub const UNKNOWN_PLAYBACK: &str = "unknown";

#[derive(Debug, Clone, Serialize)]
pub struct StreamerSummary {
    pub name: String,
    #[serde(rename = "streamTotal")]
    pub stream_total: i64,
}

#[derive(Debug, Clone, Serialize)]
pub struct BoostEntry {
    pub amount: i64,
    pub message: Option<String>,
    pub playback: String,
    pub date: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize)]
pub struct BoostedEpisode {
    pub title: String,
    pub guid: String,
    pub boosts: Vec<BoostEntry>,
}

#[derive(Debug, Clone, Serialize)]
pub struct BoosterSummary {
    pub name: String,
    #[serde(rename = "boostTotal")]
    pub boost_total: i64,
    pub episodes: Vec<BoostedEpisode>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ReportData {
    pub streamers: Vec<StreamerSummary>,
    pub boosts: Vec<BoosterSummary>,
}

pub struct ReportDisplayManager {
    timestamp_format: String,
}

impl Default for ReportDisplayManager {
    fn default() -> Self {
        Self::new("%b %e, %Y at %H:%M")
    }
}

impl ReportDisplayManager {
    pub fn new(timestamp_format: impl Into<String>) -> Self {
        Self {
            timestamp_format: timestamp_format.into(),
        }
    }

    /// Print the report sections to stdout.
    pub fn display(&self, listeners: &[Listener], verbose: bool, json_output: bool) {
        if json_output {
            match serde_json::to_string_pretty(&self.report_data(listeners)) {
                Ok(json_str) => println!("{}", json_str),
                Err(e) => eprintln!("Error serializing report to JSON: {}", e),
            }
            return;
        }

        if verbose {
            print!("{}", self.general_report(listeners));
        }
        print!("{}", self.streamers_section(listeners));
        print!("{}", self.boost_section(listeners));
    }

    pub fn transaction_line(&self, invoice: &InvoiceRecord, payment: &Payment) -> String {
        let boost = invoice.boostagram.as_ref();
        format!(
            "Transaction {} - {} - {} - from: {} - for episode: {} - timestamp: {}",
            self.format_date(payment.date),
            payment.kind,
            payment.amount.to_string().bright_green(),
            boost.and_then(|b| b.sender_name.as_deref()).unwrap_or("?"),
            boost.and_then(|b| b.episode.as_deref()).unwrap_or("?"),
            playback(payment.timestamp),
        )
    }

    pub fn general_report(&self, listeners: &[Listener]) -> String {
        let mut out = String::new();
        let _ = writeln!(out, "{}\n", "GENERAL REPORT".bright_white().bold());

        for listener in listeners {
            let _ = writeln!(out, "{}", listener.name.bright_cyan().bold());
            for episode in &listener.episodes {
                let _ = writeln!(
                    out,
                    "\t{} streamed - {}",
                    episode.stream_total().to_string().bright_green(),
                    episode.display_title()
                );
                for payment in episode.boost_payments() {
                    let _ = writeln!(out, "\tBoost: {}", boost_detail(payment));
                }
            }
            let _ = writeln!(out, "\n");
        }
        out
    }

    pub fn streamers_section(&self, listeners: &[Listener]) -> String {
        let mut out = String::new();
        let _ = writeln!(out, "\n{}\n", "STREAMERS".bright_white().bold());
        for listener in listeners {
            let _ = writeln!(
                out,
                "{}\t{}",
                listener.name.bright_cyan(),
                listener.stream_total().to_string().bright_green()
            );
        }
        out
    }

    pub fn boost_section(&self, listeners: &[Listener]) -> String {
        let mut out = String::new();
        let _ = writeln!(out, "\n{}", "BOOST".bright_white().bold());
        for listener in listeners.iter().filter(|l| l.boost_total().to_sats() > 0) {
            let _ = writeln!(out, "\n{}", listener.name.bright_cyan().bold());
            for episode in listener.episodes.iter().filter(|e| e.has_boosts()) {
                let _ = writeln!(out, "\t{}", episode.display_title().bright_white());
                for payment in episode.boost_payments() {
                    let _ = writeln!(out, "\t\t{}", boost_detail(payment));
                }
            }
        }
        out
    }

    pub fn report_data(&self, listeners: &[Listener]) -> ReportData {
        let streamers = listeners
            .iter()
            .map(|listener| StreamerSummary {
                name: listener.name.clone(),
                stream_total: listener.stream_total().to_sats(),
            })
            .collect();

        let boosts = listeners
            .iter()
            .filter(|l| l.boost_total().to_sats() > 0)
            .map(|listener| BoosterSummary {
                name: listener.name.clone(),
                boost_total: listener.boost_total().to_sats(),
                episodes: listener
                    .episodes
                    .iter()
                    .filter(|e| e.has_boosts())
                    .map(|episode| BoostedEpisode {
                        title: episode.display_title().to_string(),
                        guid: episode.guid.clone(),
                        boosts: episode
                            .boost_payments()
                            .map(|payment| BoostEntry {
                                amount: payment.amount.to_sats(),
                                message: payment.message.clone(),
                                playback: playback(payment.timestamp),
                                date: payment.date,
                            })
                            .collect(),
                    })
                    .collect(),
            })
            .collect();

        ReportData { streamers, boosts }
    }

    fn format_date(&self, date: DateTime<Utc>) -> String {
        date.with_timezone(&Local).format(&self.timestamp_format).to_string()
    }
}

fn boost_detail(payment: &Payment) -> String {
    format!(
        "{} - {} - timestamp: {}",
        payment.amount.to_string().bright_green(),
        payment.message.as_deref().unwrap_or(NO_MESSAGE),
        playback(payment.timestamp)
    )
}

fn playback(timestamp: Option<i64>) -> String {
    timestamp
        .map(format_playback_time)
        .unwrap_or_else(|| UNKNOWN_PLAYBACK.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aggregate::aggregate;
    use serde_json::json;

    fn invoice(amount: i64, boostagram: serde_json::Value) -> InvoiceRecord {
        serde_json::from_value(json!({
            "amount": amount,
            "boostagram": boostagram,
            "creation_date": 1_700_000_000,
            "identifier": "inv",
        }))
        .unwrap()
    }

    fn plain() -> ReportDisplayManager {
        colored::control::set_override(false);
        ReportDisplayManager::default()
    }

    #[test]
    fn test_streamer_only_listener_is_left_out_of_boosts() {
        let display = plain();
        let listeners = aggregate(&[
            invoice(300, json!({"action": "stream", "sender_name": "gus", "episode": "Ep"})),
            invoice(5, json!({"action": "boost", "sender_name": "hal", "episode": "Ep"})),
        ]);

        let streamers = display.streamers_section(&listeners);
        assert!(streamers.contains("gus\t300 sats"));
        assert!(streamers.contains("hal\t0 sats"));

        let boosts = display.boost_section(&listeners);
        assert!(!boosts.contains("gus"));
        assert!(boosts.contains("\nhal\n\tEp\n\t\t5 sats - No message - timestamp: unknown\n"));
    }

    #[test]
    fn test_boost_section_skips_episodes_without_boosts() {
        let display = plain();
        let listeners = aggregate(&[
            invoice(10, json!({"action": "stream", "sender_name": "ivy", "episode": "Quiet", "episode_guid": "Q"})),
            invoice(1, json!({"action": "boost", "sender_name": "ivy", "episode": "Loud", "episode_guid": "L", "message": "yay", "ts": 65})),
        ]);

        let boosts = display.boost_section(&listeners);
        assert!(!boosts.contains("Quiet"));
        assert!(boosts.contains("\tLoud\n\t\t1 sat - yay - timestamp: 00:01:05\n"));
    }

    #[test]
    fn test_episode_without_title_shows_guid() {
        let display = plain();
        let listeners = aggregate(&[invoice(
            2,
            json!({"action": "boost", "sender_name": "jo", "episode_guid": "guid-7"}),
        )]);
        assert!(display.boost_section(&listeners).contains("\tguid-7\n"));
    }

    #[test]
    fn test_general_report_lists_streamed_totals_and_boosts() {
        let display = plain();
        let listeners = aggregate(&[
            invoice(40, json!({"action": "stream", "sender_name": "kim", "episode": "Ep"})),
            invoice(9, json!({"action": "boost", "sender_name": "kim", "episode": "Ep", "message": "gm"})),
        ]);

        let report = display.general_report(&listeners);
        assert!(report.starts_with("GENERAL REPORT\n"));
        assert!(report.contains("kim\n\t40 sats streamed - Ep\n\tBoost: 9 sats - gm - timestamp: unknown\n"));
    }

    #[test]
    fn test_transaction_line() {
        let display = plain();
        let record = invoice(
            21,
            json!({"action": "boost", "sender_name": "lee", "episode": "Ep", "ts": 3600}),
        );
        let mut book = crate::aggregate::ListenerBook::new();
        let payment = book.record(&record).unwrap().clone();

        let line = display.transaction_line(&record, &payment);
        assert!(line.starts_with("Transaction "));
        assert!(line.ends_with("- boost - 21 sats - from: lee - for episode: Ep - timestamp: 01:00:00"));

        let anonymous = invoice(3, json!({"action": "stream"}));
        let payment = book.record(&anonymous).unwrap().clone();
        let line = display.transaction_line(&anonymous, &payment);
        assert!(line.contains("from: ? - for episode: ? - timestamp: unknown"));
    }

    #[test]
    fn test_report_data_serializes_sat_counts() {
        let display = plain();
        let listeners = aggregate(&[
            invoice(1000, json!({"action": "stream", "sender_name": "max", "episode_guid": "E1"})),
            invoice(500, json!({"action": "boost", "sender_name": "max", "episode_guid": "E1", "message": "nice"})),
        ]);

        let value = serde_json::to_value(display.report_data(&listeners)).unwrap();
        assert_eq!(value["streamers"][0]["name"], "max");
        assert_eq!(value["streamers"][0]["streamTotal"], 1000);
        assert_eq!(value["boosts"][0]["boostTotal"], 500);
        assert_eq!(value["boosts"][0]["episodes"][0]["title"], "E1");
        assert_eq!(value["boosts"][0]["episodes"][0]["boosts"][0]["message"], "nice");
        assert_eq!(value["boosts"][0]["episodes"][0]["boosts"][0]["playback"], "unknown");
    }
}
