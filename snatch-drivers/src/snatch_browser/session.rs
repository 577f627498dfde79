//! Session-cookie adoption.
//!
//! WebDriver only accepts cookies for the current document's origin, so the
//! driver first navigates to the site's base URL, then injects every
//! configured cookie in order. Injection order matters: a later entry with
//! the same name/domain/path overrides an earlier one in the browser's jar.

use crate::snatch_browser::driver::SnatchDriver;
use anyhow::{Context, Result};
use fantoccini::cookies::Cookie;
use snatch_common::SessionCookie;
use time::OffsetDateTime;
use tracing::info;

/// Build the browser-side cookie for a configured session record.
pub fn to_browser_cookie(record: &SessionCookie) -> Cookie<'static> {
    let mut builder = Cookie::build((record.name.clone(), record.value.clone()))
        .domain(record.domain.clone())
        .path(record.path.clone())
        .secure(record.secure)
        .http_only(record.http_only);

    if let Some(secs) = record.expires {
        if let Ok(when) = OffsetDateTime::from_unix_timestamp(secs) {
            builder = builder.expires(when);
        }
    }

    builder.build()
}

impl SnatchDriver {
    /// Navigate to `base_url` once and inject the session cookies, so every
    /// subsequent target navigation runs as the authenticated user.
    pub async fn adopt_session(&self, base_url: &str, cookies: &[SessionCookie]) -> Result<()> {
        if cookies.is_empty() {
            return Ok(());
        }

        self.client
            .goto(base_url)
            .await
            .with_context(|| format!("navigating to {base_url} before cookie injection"))?;

        for record in cookies {
            self.client
                .add_cookie(to_browser_cookie(record))
                .await
                .with_context(|| format!("injecting session cookie `{}`", record.name))?;
        }

        info!(
            target: "snatch.session",
            cookies = cookies.len(),
            "session adopted"
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn maps_all_fields() {
        let record = SessionCookie {
            name: "sessionhash".into(),
            value: "b4d66ce1".into(),
            domain: "tracker.example.org".into(),
            path: "/latest".into(),
            secure: true,
            http_only: true,
            expires: Some(1_793_992_133),
        };
        let cookie = to_browser_cookie(&record);
        assert_eq!(cookie.name(), "sessionhash");
        assert_eq!(cookie.value(), "b4d66ce1");
        assert_eq!(cookie.domain(), Some("tracker.example.org"));
        assert_eq!(cookie.path(), Some("/latest"));
        assert_eq!(cookie.secure(), Some(true));
        assert_eq!(cookie.http_only(), Some(true));
        assert!(cookie.expires_datetime().is_some());
    }

    #[test]
    fn session_cookie_has_no_expiry() {
        let record = SessionCookie {
            name: "sid".into(),
            value: "x".into(),
            domain: "tracker.example.org".into(),
            path: "/".into(),
            secure: false,
            http_only: false,
            expires: None,
        };
        let cookie = to_browser_cookie(&record);
        assert!(cookie.expires_datetime().is_none());
    }
}
