//! Loader for the snatch run configuration with YAML + environment overlays.
//!
//! Session cookies are ordinary config data here so that live credentials can
//! be injected through `${VAR}` expansion or `SNATCH__`-prefixed environment
//! variables instead of being compiled into the binary.

use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use serde_json::Value;
use snatch_common::{Matcher, SessionCookie};
use std::path::{Path, PathBuf};
use std::time::Duration;

const MAXIMUM_ENV_EXPANSION_DEPTH: usize = 8;

/// Top-level run configuration, usually read from `snatch.yaml`.
#[derive(Debug, Clone, Deserialize)]
pub struct SnatchConfig {
    pub version: Option<String>,
    /// Directory the acquired files are persisted into.
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,
    #[serde(default = "default_headless")]
    pub headless: bool,
    /// Extra attempts after the first; the attempt budget is this plus one.
    #[serde(default = "default_retry_count")]
    pub retry_count: u32,
    #[serde(default = "default_nav_timeout_ms")]
    pub nav_timeout_ms: u64,
    /// Bound for element waits and the click itself.
    #[serde(default = "default_click_timeout_ms")]
    pub click_timeout_ms: u64,
    /// Bound for capturing the file transfer after the click.
    #[serde(default = "default_download_timeout_ms")]
    pub download_timeout_ms: u64,
    /// Polite pause between targets, successes and failures alike.
    #[serde(default = "default_request_delay_secs")]
    pub request_delay_secs: f64,
    #[serde(default = "default_webdriver_url")]
    pub webdriver_url: String,
    /// Appended to URL-derived names when the transfer has no usable name.
    #[serde(default = "default_extension")]
    pub default_extension: String,
    pub site: SiteConfig,
    /// Injected in order; later duplicates override earlier ones in the
    /// browser's jar.
    #[serde(default)]
    pub session: Vec<SessionCookie>,
    /// Target locators: full URLs or bare identifiers (see [`SiteConfig`]).
    #[serde(default)]
    pub targets: Vec<String>,
}

/// Everything specific to the site being visited.
#[derive(Debug, Clone, Deserialize)]
pub struct SiteConfig {
    /// Navigated once before cookie injection; WebDriver only accepts
    /// cookies for the current document's origin.
    pub base_url: String,
    /// Bare-identifier prefix, e.g. `torrentid=`.
    pub id_prefix: String,
    /// Prepended to the bare identifier to form a full detail-page URL.
    pub url_prefix: String,
    /// Waited for before looking up the action control.
    pub container_selector: String,
    /// Ordered control matchers; first hit wins.
    pub control_matchers: Vec<Matcher>,
}

impl SnatchConfig {
    pub fn nav_timeout(&self) -> Duration {
        Duration::from_millis(self.nav_timeout_ms)
    }

    pub fn click_timeout(&self) -> Duration {
        Duration::from_millis(self.click_timeout_ms)
    }

    pub fn download_timeout(&self) -> Duration {
        Duration::from_millis(self.download_timeout_ms)
    }

    pub fn request_delay(&self) -> Duration {
        Duration::from_secs_f64(self.request_delay_secs.max(0.0))
    }
}

fn default_output_dir() -> PathBuf {
    PathBuf::from("downloads")
}
fn default_headless() -> bool {
    true
}
fn default_retry_count() -> u32 {
    2
}
fn default_nav_timeout_ms() -> u64 {
    20_000
}
fn default_click_timeout_ms() -> u64 {
    10_000
}
fn default_download_timeout_ms() -> u64 {
    30_000
}
fn default_request_delay_secs() -> f64 {
    1.0
}
fn default_webdriver_url() -> String {
    "http://localhost:9515".into()
}
fn default_extension() -> String {
    ".torrent".into()
}

fn expand_env_in_value(v: &mut Value) {
    match v {
        Value::String(s) => {
            if s.contains('$') {
                let mut cur = std::mem::take(s);
                for _ in 0..MAXIMUM_ENV_EXPANSION_DEPTH {
                    let expanded = match shellexpand::env(&cur) {
                        Ok(cow) => cow.into_owned(),
                        Err(_) => cur.clone(),
                    };
                    if expanded == cur {
                        break;
                    }
                    cur = expanded;
                }
                *s = cur;
            }
        }
        Value::Array(arr) => arr.iter_mut().for_each(expand_env_in_value),
        Value::Object(obj) => obj.values_mut().for_each(expand_env_in_value),
        _ => {}
    }
}

/// Builder hiding the `config` crate wiring (YAML files + env overrides).
pub struct SnatchConfigLoader {
    builder: config::ConfigBuilder<config::builder::DefaultState>,
}

impl Default for SnatchConfigLoader {
    fn default() -> Self {
        Self::new()
    }
}

impl SnatchConfigLoader {
    pub fn new() -> Self {
        Self {
            builder: Config::builder(),
        }
    }

    /// Attach a YAML/TOML/JSON file; the `config` crate infers format by suffix.
    pub fn with_file<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.builder = self.builder.add_source(File::from(path.as_ref()).required(true));
        self
    }

    /// Merge an inline YAML snippet, handy for tests and scripted runs.
    pub fn with_yaml_str(mut self, yaml: &str) -> Self {
        self.builder = self
            .builder
            .add_source(File::from_str(yaml, config::FileFormat::Yaml));
        self
    }

    /// Merge all sources and deserialize into typed config.
    ///
    /// `SNATCH__`-prefixed environment variables are layered on last so they
    /// win over files, and `${VAR}` placeholders in any string value are
    /// expanded (depth-capped) before the typed structs are materialised.
    pub fn load(self) -> Result<SnatchConfig, ConfigError> {
        let cfg = self
            .builder
            .add_source(Environment::with_prefix("SNATCH").separator("__"))
            .build()?;

        let mut v: Value = cfg.try_deserialize()?;
        expand_env_in_value(&mut v);

        serde_json::from_value(v).map_err(|e| ConfigError::Message(e.to_string()))
    }
}
