//! Sync metrics.
//!
//! Recorded through the `metrics` facade; without an installed recorder
//! every call is a no-op.

use std::time::Duration;

use ::metrics::{counter, histogram};

use crate::error::SyncError;
use crate::sync::PollReport;

pub const POLLS_TOTAL: &str = "tributary_polls_total";
pub const PULLS_TOTAL: &str = "tributary_pulls_total";
pub const PULL_FAILURES_TOTAL: &str = "tributary_pull_failures_total";
pub const POLL_DURATION_SECONDS: &str = "tributary_poll_duration_seconds";

/// Registers metric descriptions.
pub fn describe() {
    ::metrics::describe_counter!(POLLS_TOTAL, "Total number of repository polls");
    ::metrics::describe_counter!(PULLS_TOTAL, "Total number of successful branch pulls");
    ::metrics::describe_counter!(PULL_FAILURES_TOTAL, "Total number of failed branch pulls");
    ::metrics::describe_histogram!(
        POLL_DURATION_SECONDS,
        "Duration of a repository poll in seconds"
    );
}

/// Records one poll of a repository.
pub(crate) fn record_poll(
    repository: &str,
    result: &Result<PollReport, SyncError>,
    elapsed: Duration,
) {
    let outcome = match result {
        Ok(report) => report.outcome(),
        Err(_) => "failed",
    };

    counter!(
        POLLS_TOTAL,
        "repository" => repository.to_string(),
        "outcome" => outcome
    )
    .increment(1);

    histogram!(POLL_DURATION_SECONDS, "repository" => repository.to_string())
        .record(elapsed.as_secs_f64());

    let Ok(report) = result else {
        return;
    };

    for synced in report.synced() {
        counter!(
            PULLS_TOTAL,
            "repository" => repository.to_string(),
            "branch" => synced.branch.clone(),
            "analysis" => synced.analysis.as_str()
        )
        .increment(1);
    }

    for failure in report.failures() {
        counter!(
            PULL_FAILURES_TOTAL,
            "repository" => repository.to_string(),
            "branch" => failure.branch.clone()
        )
        .increment(1);
    }
}
