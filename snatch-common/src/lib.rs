//! Common types and utilities shared across Snatch crates.
//!
//! This crate defines the small set of values that cross crate boundaries:
//! session cookies loaded from configuration, the matcher strategies used to
//! locate the page's action control, the captured-download value handed from
//! the browser layer to the acquisition loop, and the attempt-level error
//! type. It also hosts [`observability`], the centralised tracing setup.
//!
//! It is intentionally lightweight so that every other crate can depend on it
//! without heavy transitive costs.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

pub mod observability;

/// A credential token injected into the browsing context to impersonate an
/// already-authenticated user, without an interactive login.
///
/// Loaded once from configuration, injected before the first target
/// navigation, never mutated afterwards. Entries later in the list override
/// earlier ones with the same name/domain/path, per standard cookie-jar
/// semantics.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SessionCookie {
    pub name: String,
    pub value: String,
    pub domain: String,
    #[serde(default = "default_cookie_path")]
    pub path: String,
    #[serde(default)]
    pub secure: bool,
    #[serde(default)]
    pub http_only: bool,
    /// Expiry as unix seconds. `None` makes this a session cookie.
    #[serde(default)]
    pub expires: Option<i64>,
}

fn default_cookie_path() -> String {
    "/".to_string()
}

/// One strategy for locating the action control on a detail page.
///
/// Matchers are tried in order until one yields an element, so an exact CSS
/// selector can be listed first with a tolerant XPath fallback behind it.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Matcher {
    Css(String),
    XPath(String),
}

/// A completed file transfer, captured from the browser's scratch download
/// directory. Consumed immediately to produce the persisted output file.
#[derive(Debug, Clone)]
pub struct CapturedDownload {
    /// Where the browser left the file on disk.
    pub path: PathBuf,
    /// The name the transfer arrived under, when one was observable.
    pub suggested_name: Option<String>,
}

/// Error for a single acquisition attempt.
///
/// There are deliberately only two kinds: bounded operations that ran out of
/// time, and everything else. Both are handled identically by the retry loop.
#[derive(Debug, thiserror::Error)]
pub enum AttemptError {
    /// Navigation, an element wait, or transfer capture exceeded its bound.
    #[error("timed out while {0}")]
    TransientTimeout(String),

    /// Any other failure, including "action control not found".
    #[error("unexpected condition: {0}")]
    UnexpectedCondition(#[from] anyhow::Error),
}

impl AttemptError {
    /// Shorthand for wrapping an arbitrary error as an unexpected condition.
    pub fn unexpected<E>(err: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        Self::UnexpectedCondition(anyhow::Error::new(err))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn matcher_yaml_forms() {
        let yaml = r#"
- css: "input[name='download']"
- xpath: '//input[@type="submit"]'
"#;
        let matchers: Vec<Matcher> = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(
            matchers,
            vec![
                Matcher::Css("input[name='download']".into()),
                Matcher::XPath(r#"//input[@type="submit"]"#.into()),
            ]
        );
    }

    #[test]
    fn cookie_defaults() {
        let yaml = r#"
name: sid
value: abc123
domain: tracker.example.org
"#;
        let cookie: SessionCookie = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(cookie.path, "/");
        assert!(!cookie.secure);
        assert!(!cookie.http_only);
        assert_eq!(cookie.expires, None);
    }

    #[test]
    fn cookie_full_record() {
        let yaml = r#"
name: sid
value: abc123
domain: tracker.example.org
path: /latest
secure: true
http_only: true
expires: 1793992133
"#;
        let cookie: SessionCookie = serde_yaml::from_str(yaml).unwrap();
        assert!(cookie.secure);
        assert_eq!(cookie.expires, Some(1793992133));
    }
}
