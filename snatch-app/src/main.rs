use anyhow::{Context, Result};
use clap::Parser;
use snatch_common::observability::{init_logging, LogConfig};
use snatch_config::{SnatchConfig, SnatchConfigLoader};
use snatch_core::acquire::run_targets;
use snatch_core::retry::RetryPolicy;
use snatch_core::targets::normalize_targets;
use snatch_drivers::snatch_browser::driver::SnatchDriver;
use std::path::PathBuf;
use tracing::info;

mod acquirer;
use acquirer::BrowserAcquirer;

/// Drive a browser through a list of detail pages and save each page's
/// download, retrying transiently and never overwriting existing files.
#[derive(Parser, Debug)]
#[command(name = "snatch", version, about)]
struct Cli {
    /// Path to the YAML run configuration.
    #[arg(short, long, default_value = "snatch.yaml")]
    config: PathBuf,

    /// Newline-separated extra target locators (URLs or bare identifiers),
    /// appended after the configured targets.
    #[arg(short, long)]
    targets: Option<PathBuf>,

    /// Force headless mode regardless of configuration.
    #[arg(long)]
    headless: bool,

    /// Override the configured output directory.
    #[arg(long)]
    output_dir: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut cfg: SnatchConfig = SnatchConfigLoader::new().with_file(&cli.config).load()?;
    if cli.headless {
        cfg.headless = true;
    }
    if let Some(dir) = cli.output_dir {
        cfg.output_dir = dir;
    }

    init_logging(LogConfig {
        emit_stderr: true,
        ..LogConfig::default()
    })?;

    let mut lines: Vec<String> = cfg.targets.clone();
    if let Some(path) = &cli.targets {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read target list: {}", path.display()))?;
        lines.extend(text.lines().map(str::to_string));
    }
    let urls = normalize_targets(
        lines.iter().map(String::as_str),
        &cfg.site.id_prefix,
        &cfg.site.url_prefix,
    );
    if urls.is_empty() {
        info!("no targets configured; nothing to do");
        return Ok(());
    }

    // Chrome drops every triggered download here; successful captures are
    // moved into the output directory, leftovers vanish with the tempdir.
    let scratch = tempfile::tempdir().context("failed to create scratch download directory")?;

    let driver = SnatchDriver::new(&cfg.webdriver_url, cfg.headless, scratch.path())
        .await
        .with_context(|| {
            format!(
                "failed to connect to WebDriver at {}; is chromedriver running?",
                cfg.webdriver_url
            )
        })?;
    driver
        .adopt_session(&cfg.site.base_url, &cfg.session)
        .await
        .context("failed to adopt session cookies")?;

    let mut acquirer = BrowserAcquirer::new(&driver, &cfg, scratch.path());
    let policy = RetryPolicy {
        retry_count: cfg.retry_count,
        ..RetryPolicy::default()
    };
    let report = run_targets(
        &mut acquirer,
        &urls,
        &policy,
        &cfg.output_dir,
        &cfg.default_extension,
        cfg.request_delay(),
    )
    .await?;

    driver.close().await?;

    // Per-target failures are reported above; the run itself still counts
    // as a success, so the exit status stays zero either way.
    info!(
        total = urls.len(),
        succeeded = report.succeeded(),
        failed = report.failed(),
        "done"
    );
    Ok(())
}
