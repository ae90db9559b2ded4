use anyhow::{Context, Result};
use boost_report::config::Config;
use boost_report::credentials::{acquire_token, prompt_stdin, FileTokenStore};
use boost_report::dates::{default_lower_bound, parse_short_date};
use boost_report::logging::init_logging;
use boost_report::{BoostReporter, ReportOptions};
use chrono::{DateTime, Utc};
use clap::Parser;
use std::process;
use tracing::error;

#[derive(Parser)]
#[command(name = "boost-report")]
#[command(about = "Per-listener and per-episode boostagram report for your Alby wallet")]
#[command(version)]
struct Cli {
    /// The date of the oldest transaction to retrieve (YYYY-MM-DD or MM/DD/YY). Leave empty for the last 7 days.
    #[arg(short, long, value_parser = parse_date_arg)]
    date: Option<DateTime<Utc>>,

    /// Print every transaction and a per-episode general report
    #[arg(short, long)]
    verbose: bool,

    /// Discard the stored Alby token and ask for a new one
    #[arg(short, long)]
    forget_token: bool,

    /// Output the report in JSON format
    #[arg(long)]
    json: bool,
}

fn parse_date_arg(value: &str) -> Result<DateTime<Utc>, String> {
    parse_short_date(value).map_err(|e| e.to_string())
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = match Config::load() {
        Ok(config) => config,
        Err(e) => handle_error(e.context("Failed to load configuration"), cli.json),
    };
    let _log_guard = init_logging(&config.logging, &config.paths);

    match run(&cli, &config).await {
        Ok(()) => Ok(()),
        Err(e) => handle_error(e, cli.json),
    }
}

async fn run(cli: &Cli, config: &Config) -> Result<()> {
    let store = FileTokenStore::new(&config.paths.token_file);
    let token = acquire_token(&store, cli.forget_token, prompt_stdin)?;

    let created_after = cli
        .date
        .unwrap_or_else(|| default_lower_bound(Utc::now(), config.report.lookback_days));

    let reporter = BoostReporter::from_config(config)?;
    let options = ReportOptions {
        created_after: Some(created_after),
        verbose: cli.verbose,
        json_output: cli.json,
    };

    reporter
        .run(&token, &options)
        .await
        .context("Failed to load transactions from Alby")?;

    Ok(())
}

fn handle_error(e: anyhow::Error, json: bool) -> ! {
    error!(error = %format!("{e:#}"), "Report failed");
    if json {
        println!("{}", serde_json::json!({ "error": format!("{e:#}") }));
    } else {
        eprintln!("Error: {e:#}");
    }
    process::exit(1);
}
