use anyhow::anyhow;
use fantoccini::elements::Element;
use fantoccini::error::CmdError;
use fantoccini::{Client, Locator};
use snatch_common::{AttemptError, Matcher};
use std::time::Duration;
use tracing::debug;

/// The run's single logical page: bounded navigation and waits, plus the
/// ordered-matcher lookup for the action control.
pub struct SnatchPage {
    client: Client,
}

impl SnatchPage {
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    /// Navigate to `url`, bounded by `timeout`.
    pub async fn goto(&self, url: &str, timeout: Duration) -> Result<(), AttemptError> {
        match tokio::time::timeout(timeout, self.client.goto(url)).await {
            Err(_) => Err(AttemptError::TransientTimeout(format!(
                "navigating to {url}"
            ))),
            Ok(Err(e)) => Err(cmd_error(e, "navigation")),
            Ok(Ok(())) => Ok(()),
        }
    }

    /// Wait for `selector` to appear, bounded by `timeout`.
    ///
    /// Waiting on the container rather than the control itself is more
    /// robust against late-rendering page furniture.
    pub async fn wait_for(&self, selector: &str, timeout: Duration) -> Result<(), AttemptError> {
        match self
            .client
            .wait()
            .at_most(timeout)
            .for_element(Locator::Css(selector))
            .await
        {
            Ok(_) => Ok(()),
            Err(CmdError::WaitTimeout) => Err(AttemptError::TransientTimeout(format!(
                "waiting for `{selector}`"
            ))),
            Err(e) => Err(AttemptError::UnexpectedCondition(e.into())),
        }
    }

    /// Resolve the action control by trying each matcher in order.
    ///
    /// A matcher that simply finds nothing moves on to the next one; only
    /// a transport-level failure aborts the lookup.
    pub async fn find_control(&self, matchers: &[Matcher]) -> Result<Element, AttemptError> {
        for matcher in matchers {
            let locator = match matcher {
                Matcher::Css(s) => Locator::Css(s.as_str()),
                Matcher::XPath(s) => Locator::XPath(s.as_str()),
            };
            match self.client.find(locator).await {
                Ok(element) => {
                    debug!(target: "snatch.selector", ?matcher, "matcher resolved the control");
                    return Ok(element);
                }
                Err(e) if e.is_no_such_element() => {
                    debug!(target: "snatch.selector", ?matcher, "matcher found nothing; trying next");
                }
                Err(e) => return Err(AttemptError::UnexpectedCondition(e.into())),
            }
        }
        Err(AttemptError::UnexpectedCondition(anyhow!(
            "no matcher resolved the action control"
        )))
    }

    /// Click the resolved control, bounded by `timeout`.
    pub async fn click(&self, control: Element, timeout: Duration) -> Result<(), AttemptError> {
        match tokio::time::timeout(timeout, control.click()).await {
            Err(_) => Err(AttemptError::TransientTimeout(
                "clicking the action control".into(),
            )),
            Ok(Err(e)) => Err(cmd_error(e, "clicking the action control")),
            Ok(Ok(_)) => Ok(()),
        }
    }
}

fn cmd_error(e: CmdError, what: &str) -> AttemptError {
    match e {
        CmdError::WaitTimeout => AttemptError::TransientTimeout(what.to_string()),
        other => AttemptError::UnexpectedCondition(other.into()),
    }
}
