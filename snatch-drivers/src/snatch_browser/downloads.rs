//! File-transfer capture via the scratch download directory.
//!
//! WebDriver has no download event, so the capture is observational: record
//! what is in the scratch directory before the click, then poll until a new,
//! fully written file appears.

use snatch_common::{AttemptError, CapturedDownload};
use std::collections::HashSet;
use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};
use tokio::time::sleep;
use tracing::debug;

const POLL_INTERVAL: Duration = Duration::from_millis(250);
/// Artifacts the browser creates while a transfer is still in flight.
const IN_PROGRESS_SUFFIXES: &[&str] = &[".crdownload", ".tmp", ".part"];

/// Watches the scratch download directory for one new completed file.
pub struct DownloadWatcher {
    dir: PathBuf,
    seen: HashSet<OsString>,
}

impl DownloadWatcher {
    /// Snapshot the directory so only files created after this point count.
    /// Call this before triggering the control.
    pub fn begin(dir: &Path) -> std::io::Result<Self> {
        let mut seen = HashSet::new();
        for entry in std::fs::read_dir(dir)? {
            seen.insert(entry?.file_name());
        }
        Ok(Self {
            dir: dir.to_path_buf(),
            seen,
        })
    }

    /// Wait for a new, fully written file, bounded by `timeout`.
    ///
    /// A candidate counts as complete once it carries no in-progress suffix
    /// and its size is unchanged across two consecutive polls.
    pub async fn capture(self, timeout: Duration) -> Result<CapturedDownload, AttemptError> {
        let deadline = Instant::now() + timeout;
        let mut last_observed: Option<(OsString, u64)> = None;

        loop {
            if let Some((name, size)) = self.new_candidate()? {
                match &last_observed {
                    Some((prev_name, prev_size)) if *prev_name == name && *prev_size == size => {
                        let path = self.dir.join(&name);
                        debug!(
                            target: "snatch.download",
                            file = %path.display(),
                            size,
                            "captured file transfer"
                        );
                        let suggested_name = name.to_str().map(str::to_string);
                        return Ok(CapturedDownload {
                            path,
                            suggested_name,
                        });
                    }
                    _ => last_observed = Some((name, size)),
                }
            }

            if Instant::now() >= deadline {
                return Err(AttemptError::TransientTimeout(
                    "capturing the file transfer".into(),
                ));
            }
            sleep(POLL_INTERVAL).await;
        }
    }

    /// First unseen completed-looking file in the directory, with its size.
    fn new_candidate(&self) -> Result<Option<(OsString, u64)>, AttemptError> {
        let entries = std::fs::read_dir(&self.dir).map_err(AttemptError::unexpected)?;
        for entry in entries {
            let entry = entry.map_err(AttemptError::unexpected)?;
            let name = entry.file_name();
            if self.seen.contains(&name) {
                continue;
            }
            if name.to_str().map(in_progress).unwrap_or(true) {
                continue;
            }
            let meta = entry.metadata().map_err(AttemptError::unexpected)?;
            if !meta.is_file() {
                continue;
            }
            return Ok(Some((name, meta.len())));
        }
        Ok(None)
    }
}

fn in_progress(name: &str) -> bool {
    name.starts_with('.') || IN_PROGRESS_SUFFIXES.iter().any(|s| name.ends_with(s))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn captures_a_new_stable_file() {
        let tmp = TempDir::new().unwrap();
        let watcher = DownloadWatcher::begin(tmp.path()).unwrap();

        std::fs::write(tmp.path().join("payload.torrent"), b"d8:announce0:e").unwrap();

        let captured = watcher.capture(Duration::from_secs(2)).await.unwrap();
        assert_eq!(captured.suggested_name.as_deref(), Some("payload.torrent"));
        assert_eq!(captured.path, tmp.path().join("payload.torrent"));
    }

    #[tokio::test]
    async fn ignores_preexisting_files() {
        let tmp = TempDir::new().unwrap();
        std::fs::write(tmp.path().join("old.torrent"), b"x").unwrap();

        let watcher = DownloadWatcher::begin(tmp.path()).unwrap();
        let err = watcher.capture(Duration::from_millis(300)).await.unwrap_err();
        assert!(matches!(err, AttemptError::TransientTimeout(_)));
    }

    #[tokio::test]
    async fn skips_in_progress_artifacts() {
        let tmp = TempDir::new().unwrap();
        let watcher = DownloadWatcher::begin(tmp.path()).unwrap();

        std::fs::write(tmp.path().join("payload.torrent.crdownload"), b"partial").unwrap();

        let err = watcher.capture(Duration::from_millis(300)).await.unwrap_err();
        assert!(matches!(err, AttemptError::TransientTimeout(_)));
    }

    #[test]
    fn in_progress_naming() {
        assert!(in_progress("x.torrent.crdownload"));
        assert!(in_progress("x.part"));
        assert!(in_progress(".com.google.Chrome.abc123"));
        assert!(!in_progress("x.torrent"));
    }
}
