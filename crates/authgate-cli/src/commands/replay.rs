//! Run a stream file through an in-process engine.

use std::path::PathBuf;

use clap::Args;
use serde::Serialize;
use tabled::Tabled;

use authgate_core::config::RebindFailurePolicy;
use authgate_core::error::AppError;
use authgate_dispatch::{Engine, ShutdownReport, ShutdownTrigger};
use authgate_ingest::parse_file;

use crate::output::{self, OutputFormat};

/// Arguments for the replay command
#[derive(Debug, Args)]
pub struct ReplayArgs {
    /// Path to the stream file
    pub file: PathBuf,

    /// Override the admission capacity
    #[arg(long)]
    pub max_streams: Option<usize>,

    /// Override the failed-rebind policy
    #[arg(long, value_parser = parse_policy)]
    pub rebind_policy: Option<RebindFailurePolicy>,
}

/// Admission row
#[derive(Debug, Serialize, Tabled)]
pub struct AdmissionRow {
    /// Stream ID
    pub stream_id: String,
    /// Accepted or rejection reason
    pub result: String,
}

/// Outcome counter row
#[derive(Debug, Serialize, Tabled)]
pub struct OutcomeRow {
    /// Outcome
    pub outcome: String,
    /// Count
    pub count: u64,
}

#[derive(Debug, Serialize)]
struct ReplayOutput {
    admissions: Vec<AdmissionRow>,
    report: ShutdownReport,
}

/// Execute the replay command
pub async fn execute(
    args: &ReplayArgs,
    config_path: Option<&str>,
    format: OutputFormat,
) -> Result<(), AppError> {
    let mut config = super::load_config(config_path)?;
    if let Some(max_streams) = args.max_streams {
        config.dispatch.max_streams = max_streams;
    }
    if let Some(policy) = args.rebind_policy {
        config.auth.rebind_failure_policy = policy;
    }
    config.validate()?;

    let parsed = parse_file(&args.file)?;
    let engine = Engine::new(&config);

    let mut admissions = Vec::with_capacity(parsed.streams.len());
    for stream in parsed.streams {
        let stream_id = stream.id().to_string();
        let result = match engine.dispatcher().admit(stream).await {
            Ok(admission) => format!("accepted {}", admission.count_label()),
            Err(rejection) => rejection.to_string(),
        };
        admissions.push(AdmissionRow { stream_id, result });
    }

    // Input exhausted: nothing more can arrive.
    let trigger = if engine.coordinator().is_capacity_reached() {
        ShutdownTrigger::CapacityReached
    } else {
        ShutdownTrigger::External
    };
    let report = engine.shutdown(trigger).await;

    match format {
        OutputFormat::Json => output::print_json(&ReplayOutput { admissions, report }),
        OutputFormat::Table => print_report(&admissions, &report, format),
    }
    Ok(())
}

fn print_report(admissions: &[AdmissionRow], report: &ShutdownReport, format: OutputFormat) {
    output::print_list(admissions, format);

    output::print_heading("Outcomes", format);
    let outcomes: Vec<OutcomeRow> = report
        .outcomes
        .counts
        .iter()
        .filter(|(_, count)| **count > 0)
        .map(|(outcome, count)| OutcomeRow {
            outcome: outcome.clone(),
            count: *count,
        })
        .collect();
    output::print_list(&outcomes, format);

    output::print_heading("Summary", format);
    output::print_kv("Accepted", &format!("{}/{}", report.accepted, report.capacity));
    output::print_kv("Completed", &report.completed.to_string());
    output::print_kv("Failed", &report.failed.to_string());
    output::print_kv("Total time", &format!("{:?}", report.durations.total()));
    output::print_kv("Average time", &format!("{:?}", report.durations.average()));
}

fn parse_policy(value: &str) -> Result<RebindFailurePolicy, String> {
    match value {
        "keep_prior" => Ok(RebindFailurePolicy::KeepPrior),
        "drop_tracking" => Ok(RebindFailurePolicy::DropTracking),
        other => Err(format!(
            "unknown policy '{}', expected keep_prior or drop_tracking",
            other
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_policy() {
        assert_eq!(parse_policy("keep_prior"), Ok(RebindFailurePolicy::KeepPrior));
        assert_eq!(
            parse_policy("drop_tracking"),
            Ok(RebindFailurePolicy::DropTracking)
        );
        assert!(parse_policy("forget").is_err());
    }
}
