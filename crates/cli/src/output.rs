use crate::{config::RefresherConfig, error::CliError};
use model::{events::RefreshEvent, report::RunReport};
use serde::Serialize;
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::warn;

const BAR_WIDTH: usize = 30;

/// Prints run events until the bus is cleared.
pub async fn render_events(mut events: mpsc::Receiver<Arc<RefreshEvent>>, as_json: bool) {
    while let Some(event) = events.recv().await {
        if as_json {
            match serde_json::to_string(event.as_ref()) {
                Ok(line) => println!("{line}"),
                Err(err) => warn!("Failed to serialize event: {err}"),
            }
            continue;
        }

        match event.as_ref() {
            RefreshEvent::Started { collection, .. } => {
                println!("Started refreshing metadata of {collection} on OpenSea.");
            }
            RefreshEvent::Progress {
                processed,
                total,
                percentage,
            } => println!("{}", progress_line(*processed, *total, *percentage)),
            RefreshEvent::Finished { ok: true, message } => println!("{message}"),
            RefreshEvent::Finished { ok: false, message } => eprintln!("Error: {message}"),
        }
    }
}

pub fn progress_line(processed: u64, total: u64, percentage: u8) -> String {
    let filled = usize::from(percentage.min(100)) * BAR_WIDTH / 100;
    format!(
        "Updated {processed} of {total} [{}{}] {percentage}%",
        "#".repeat(filled),
        "-".repeat(BAR_WIDTH - filled)
    )
}

pub fn print_summary(report: &RunReport) {
    println!(
        "Refreshed {} of {} tokens of {} in {:.1}s",
        report.refreshed,
        report.total,
        report.collection,
        report.elapsed_ms as f64 / 1000.0
    );
    if !report.all_refreshed() {
        let skipped: Vec<String> = report.skipped.iter().map(ToString::to_string).collect();
        println!("Skipped after retry: {}", skipped.join(", "));
    }
}

/// Writes `value` as pretty JSON to `path`, or to stdout when no path is given.
pub async fn write_json<T: Serialize>(value: &T, path: Option<&str>) -> Result<(), CliError> {
    let json = serde_json::to_string_pretty(value)?;
    match path {
        Some(path) => tokio::fs::write(path, json).await?,
        None => println!("{json}"),
    }
    Ok(())
}

pub fn print_config(config: &RefresherConfig) {
    println!("Effective configuration:");
    println!("-----------------------------");
    for (setting, value) in config.describe() {
        println!("{setting:<16} {value}");
    }
}
