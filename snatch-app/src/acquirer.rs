//! Browser-backed implementation of the acquisition seam.

use async_trait::async_trait;
use snatch_common::{AttemptError, CapturedDownload, Matcher};
use snatch_config::SnatchConfig;
use snatch_core::acquire::Acquire;
use snatch_drivers::snatch_browser::downloads::DownloadWatcher;
use snatch_drivers::snatch_browser::driver::SnatchDriver;
use snatch_drivers::snatch_browser::page::SnatchPage;
use std::path::PathBuf;
use std::time::Duration;

/// One attempt against the live browser: navigate, wait for the container,
/// resolve the control through the matcher list, click, capture the
/// transfer from the scratch directory.
pub struct BrowserAcquirer {
    page: SnatchPage,
    scratch: PathBuf,
    container_selector: String,
    matchers: Vec<Matcher>,
    nav_timeout: Duration,
    click_timeout: Duration,
    download_timeout: Duration,
}

impl BrowserAcquirer {
    pub fn new(driver: &SnatchDriver, cfg: &SnatchConfig, scratch: &std::path::Path) -> Self {
        Self {
            page: driver.page(),
            scratch: scratch.to_path_buf(),
            container_selector: cfg.site.container_selector.clone(),
            matchers: cfg.site.control_matchers.clone(),
            nav_timeout: cfg.nav_timeout(),
            click_timeout: cfg.click_timeout(),
            download_timeout: cfg.download_timeout(),
        }
    }
}

#[async_trait]
impl Acquire for BrowserAcquirer {
    async fn acquire(&mut self, url: &str) -> Result<CapturedDownload, AttemptError> {
        self.page.goto(url, self.nav_timeout).await?;
        self.page
            .wait_for(&self.container_selector, self.click_timeout)
            .await?;

        let control = self.page.find_control(&self.matchers).await?;

        // Snapshot before the click so only this click's transfer counts.
        let watcher =
            DownloadWatcher::begin(&self.scratch).map_err(AttemptError::unexpected)?;
        self.page.click(control, self.click_timeout).await?;
        watcher.capture(self.download_timeout).await
    }
}
