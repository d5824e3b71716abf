//! bucketwatch CLI
//!
//! Scans S3 buckets for anomalous files and publishes one report per run.

use bw_cli_common::{format_duration, format_number, init_logging};
use bw_scanner::{Delivery, DispatchOutcome};
use clap::Parser;

mod args;
mod run;

use args::{Cli, SummaryFormat};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Cli::parse();

    // Logs and dry-run reports go to stderr; stdout only carries the JSON summary
    init_logging(args.log_level)?;

    let summary_format = args.summary_format;
    let outcome = run::execute(args).await?;

    match summary_format {
        SummaryFormat::Text => print_summary(&outcome),
        SummaryFormat::Json => println!("{}", serde_json::to_string_pretty(&outcome)?),
    }

    if outcome.has_errors() {
        std::process::exit(4); // Partial failure
    }

    Ok(())
}

/// Print a human-readable run summary to stderr.
fn print_summary(outcome: &DispatchOutcome) {
    let stats = &outcome.stats;

    eprintln!();
    eprintln!("Scan completed:");
    eprintln!("  Buckets scanned:  {}", stats.buckets_scanned);
    eprintln!("  Buckets failed:   {}", stats.buckets_failed);
    eprintln!("  Prefixes visited: {}", format_number(stats.prefixes_visited as u64));
    eprintln!("  List calls:       {}", format_number(stats.list_calls as u64));
    eprintln!("  Objects seen:     {}", format_number(stats.objects_seen as u64));
    eprintln!("  Anomalous files:  {}", format_number(stats.matches as u64));

    for (extension, count) in &stats.matches_by_extension {
        eprintln!("    {extension:<12} {count}");
    }

    match &outcome.delivery {
        Delivery::Sent { message_id: Some(id) } => eprintln!("  Report:           sent ({id})"),
        Delivery::Sent { message_id: None } => eprintln!("  Report:           sent"),
        Delivery::Suppressed => eprintln!("  Report:           suppressed (nothing found)"),
        Delivery::Failed { error } => eprintln!("  Report:           failed ({error})"),
    }

    if let Some(duration) = stats.duration().and_then(|d| d.to_std().ok()) {
        eprintln!("  Duration:         {}", format_duration(duration));

        if let Some(ops) = stats.objects_per_second() {
            eprintln!("  Throughput:       {:.1} objects/sec", ops);
        }
    }

    for error in &stats.errors {
        eprintln!("  Error: {}", error);
    }
}
