//! Driver layer for browser automation.
//!
//! This crate wraps a WebDriver session for the acquisition run: launching
//! Chrome with a scratch download directory, injecting session cookies,
//! bounded navigation and element waits with ordered matcher fallback, and
//! capturing completed file transfers from the download directory.
//!
//! - [`snatch_browser::driver::SnatchDriver`]: WebDriver client wrapper
//! - [`snatch_browser::page::SnatchPage`]: bounded waits and control lookup
//! - [`snatch_browser::session`]: session-cookie adoption
//! - [`snatch_browser::downloads::DownloadWatcher`]: file-transfer capture
pub mod snatch_browser;
