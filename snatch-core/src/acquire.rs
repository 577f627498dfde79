//! The per-target acquisition loop.
//!
//! One target at a time: attempt, retry with linear backoff on any failure,
//! persist the capture under a collision-free name on success, and keep
//! going regardless of how a target ends. No target's failure is fatal to
//! the run.

use crate::naming::{dedup_path, safe_filename_from_url};
use crate::retry::RetryPolicy;
use anyhow::Context;
use async_trait::async_trait;
use snatch_common::{AttemptError, CapturedDownload};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tokio::time::sleep;
use tracing::{error, info, warn};

/// One attempt at a single target: navigate, trigger the action control,
/// hand back the captured transfer. Backed by a live browser in the binary
/// and by scripted fixtures in tests.
#[async_trait]
pub trait Acquire {
    async fn acquire(&mut self, url: &str) -> Result<CapturedDownload, AttemptError>;
}

/// Terminal state for one target.
#[derive(Debug)]
pub enum TargetOutcome {
    Succeeded { url: String, file: PathBuf },
    Failed { url: String, attempts: u32 },
}

impl TargetOutcome {
    pub fn url(&self) -> &str {
        match self {
            TargetOutcome::Succeeded { url, .. } | TargetOutcome::Failed { url, .. } => url,
        }
    }
}

/// Per-run tally of target outcomes, in input order.
#[derive(Debug, Default)]
pub struct RunReport {
    pub outcomes: Vec<TargetOutcome>,
}

impl RunReport {
    pub fn succeeded(&self) -> usize {
        self.outcomes
            .iter()
            .filter(|o| matches!(o, TargetOutcome::Succeeded { .. }))
            .count()
    }

    pub fn failed(&self) -> usize {
        self.outcomes.len() - self.succeeded()
    }
}

/// Process every URL in order, sleeping `request_delay` between targets.
///
/// The only errors that escape are setup failures (the output directory
/// cannot be created); per-target failures end up in the report.
pub async fn run_targets<A: Acquire>(
    fetcher: &mut A,
    urls: &[String],
    policy: &RetryPolicy,
    output_dir: &Path,
    default_extension: &str,
    request_delay: Duration,
) -> anyhow::Result<RunReport> {
    std::fs::create_dir_all(output_dir).with_context(|| {
        format!("failed to create output directory: {}", output_dir.display())
    })?;

    let mut report = RunReport::default();
    for url in urls {
        let outcome = acquire_one(fetcher, url, policy, output_dir, default_extension).await;
        report.outcomes.push(outcome);
        sleep(request_delay).await;
    }
    info!(
        target: "snatch.acquire",
        succeeded = report.succeeded(),
        failed = report.failed(),
        "all targets processed"
    );
    Ok(report)
}

async fn acquire_one<A: Acquire>(
    fetcher: &mut A,
    url: &str,
    policy: &RetryPolicy,
    output_dir: &Path,
    default_extension: &str,
) -> TargetOutcome {
    let budget = policy.attempt_budget();
    for attempt in 1..=budget {
        info!(target: "snatch.acquire", %url, attempt, "navigating");
        let failure = match fetcher.acquire(url).await {
            Ok(download) => {
                match persist(download, url, output_dir, default_extension) {
                    Ok(file) => {
                        info!(target: "snatch.acquire", %url, file = %file.display(), "saved");
                        return TargetOutcome::Succeeded {
                            url: url.to_string(),
                            file,
                        };
                    }
                    Err(e) => e,
                }
            }
            Err(e) => e,
        };

        match &failure {
            AttemptError::TransientTimeout(what) => {
                warn!(target: "snatch.acquire", %url, attempt, what = %what, "attempt timed out")
            }
            AttemptError::UnexpectedCondition(e) => {
                warn!(target: "snatch.acquire", %url, attempt, error = %e, "attempt failed")
            }
        }
        sleep(policy.backoff(attempt)).await;
    }

    error!(
        target: "snatch.acquire",
        %url,
        attempts = budget,
        "giving up after exhausting attempt budget"
    );
    TargetOutcome::Failed {
        url: url.to_string(),
        attempts: budget,
    }
}

/// Move the captured transfer into the output directory under a
/// collision-free name derived from the transfer or the URL.
fn persist(
    download: CapturedDownload,
    url: &str,
    output_dir: &Path,
    default_extension: &str,
) -> Result<PathBuf, AttemptError> {
    let name = match download.suggested_name {
        Some(n) if !n.is_empty() => n,
        _ => format!("{}{default_extension}", safe_filename_from_url(url)),
    };
    let target = dedup_path(output_dir, &name);

    // Scratch and output directories may sit on different filesystems.
    if std::fs::rename(&download.path, &target).is_err() {
        std::fs::copy(&download.path, &target).map_err(AttemptError::unexpected)?;
        let _ = std::fs::remove_file(&download.path);
    }
    Ok(target)
}
