//! Access log analysis: requests per IP, the most accessed endpoint and
//! IPs that look like they are brute-forcing a login, with a CSV summary.
//!
//! The log is read once and every stage scans the same immutable text.

pub mod analyzer;
pub mod config;
pub mod error;
pub mod export;
pub mod loader;
pub mod logging;
pub mod report;
pub mod scanner;

use analyzer::{RankedList, SuspiciousSet};
use config::Config;
use error::AnalyzerError;
use export::EndpointRows;
use std::io::Write;
use tracing::info;

/// Results of the three independent passes over one log
#[derive(Debug)]
pub struct Analysis<'t> {
    pub ip_counts: RankedList<&'t str>,
    pub endpoint_counts: RankedList<&'t str>,
    pub suspicious: SuspiciousSet<&'t str>,
}

/// Run every extraction pass over `text`.
pub fn analyze(text: &str, failure_threshold: usize) -> Analysis<'_> {
    Analysis {
        ip_counts: analyzer::extract_ip_counts(text),
        endpoint_counts: analyzer::extract_endpoint_counts(text),
        suspicious: analyzer::detect_brute_force(text, failure_threshold),
    }
}

/// Load the log, print each stage's table to `out` and write the CSV report.
pub fn run(config: &Config, out: &mut dyn Write) -> Result<(), AnalyzerError> {
    let log = loader::load(&config.log_file)?;
    info!(path = %log.path().display(), "analyzing log");

    let Analysis {
        ip_counts,
        endpoint_counts,
        suspicious,
    } = analyze(log.as_str(), config.failure_threshold);

    writeln!(out)?;
    report::print_ip_counts(out, &ip_counts)?;
    writeln!(out)?;
    report::print_top_endpoint(out, &endpoint_counts)?;
    writeln!(out)?;
    report::print_suspicious(out, &suspicious)?;
    writeln!(out)?;

    let rows = if config.all_endpoints {
        EndpointRows::All
    } else {
        EndpointRows::Top
    };
    export::write_report(&config.output, &ip_counts, &endpoint_counts, &suspicious, rows)?;
    info!(
        ips = ip_counts.len(),
        endpoints = endpoint_counts.len(),
        flagged = suspicious.len(),
        "analysis complete"
    );
    Ok(())
}
