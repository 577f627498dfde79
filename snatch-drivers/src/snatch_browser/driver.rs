use crate::snatch_browser::page::SnatchPage;
use anyhow::Result;
use fantoccini::{Client, ClientBuilder};
use serde_json::json;
use std::collections::HashMap;
use std::path::Path;

/// Thin wrapper around a `fantoccini` WebDriver client, configured so that
/// clicked downloads land silently in a known scratch directory.
pub struct SnatchDriver {
    pub client: Client,
}

impl SnatchDriver {
    /// Create a new driver connected to a running WebDriver service
    /// (typically chromedriver on `http://localhost:9515`).
    ///
    /// `download_dir` must exist for the lifetime of the session; Chrome
    /// writes every triggered download there without prompting.
    pub async fn new(webdriver_url: &str, headless: bool, download_dir: &Path) -> Result<Self> {
        let mut caps = webdriver::capabilities::Capabilities::new();
        let mut chrome_opts = HashMap::new();

        let mut args = vec![
            "--disable-dev-shm-usage".to_string(),
            "--no-sandbox".to_string(),
        ];
        if headless {
            args.push("--headless=new".to_string());
            args.push("--disable-gpu".to_string());
        }
        chrome_opts.insert("args".to_string(), json!(args));
        chrome_opts.insert(
            "prefs".to_string(),
            json!({
                "download.default_directory": download_dir.display().to_string(),
                "download.prompt_for_download": false,
                "download.directory_upgrade": true,
            }),
        );
        caps.insert("goog:chromeOptions".to_string(), json!(chrome_opts));

        let client = ClientBuilder::native()
            .capabilities(caps)
            .connect(webdriver_url)
            .await?;

        Ok(Self { client })
    }

    /// Hand out a [`SnatchPage`] over the session's single logical page.
    ///
    /// The underlying client is shared; page state persists across targets
    /// by design so the injected session survives the whole run.
    pub fn page(&self) -> SnatchPage {
        SnatchPage::new(self.client.clone())
    }

    /// Close the underlying browser session.
    pub async fn close(self) -> Result<()> {
        self.client.close().await?;
        Ok(())
    }
}
