use super::client::{Element, Session};
use super::locator::Locator;
use crate::error::{AppError, Result};
use std::time::Duration;
use tokio::time::{sleep, Instant};

/// 显式等待：在超时前按固定间隔轮询
#[derive(Debug, Clone, Copy)]
pub struct Wait {
    timeout: Duration,
    poll: Duration,
}

impl Wait {
    pub fn new(timeout: Duration, poll: Duration) -> Self {
        Self { timeout, poll }
    }

    /// 等待元素出现在 DOM 中
    pub async fn until_present(&self, session: &Session, locator: &Locator) -> Result<Element> {
        self.poll_until(locator, || check_present(session, locator)).await
    }

    /// 等待元素可见且可用
    pub async fn until_clickable(&self, session: &Session, locator: &Locator) -> Result<Element> {
        self.poll_until(locator, || check_clickable(session, locator)).await
    }

    async fn poll_until<F, Fut>(&self, locator: &Locator, mut check: F) -> Result<Element>
    where
        F: FnMut() -> Fut,
        Fut: std::future::Future<Output = Result<Option<Element>>>,
    {
        let deadline = Instant::now() + self.timeout;
        loop {
            if let Some(element) = check().await? {
                return Ok(element);
            }
            if Instant::now() + self.poll > deadline {
                tracing::warn!("Element {} not ready after {:?}", locator, self.timeout);
                return Err(AppError::ElementTimeout {
                    selector: locator.to_string(),
                    timeout_ms: self.timeout.as_millis() as u64,
                });
            }
            sleep(self.poll).await;
        }
    }
}

async fn check_present(session: &Session, locator: &Locator) -> Result<Option<Element>> {
    match session.find(locator).await {
        Ok(element) => Ok(Some(element)),
        Err(e) if e.is_no_such_element() => Ok(None),
        Err(e) => Err(e),
    }
}

async fn check_clickable(session: &Session, locator: &Locator) -> Result<Option<Element>> {
    let Some(element) = check_present(session, locator).await? else {
        return Ok(None);
    };
    if session.is_displayed(&element).await? && session.is_enabled(&element).await? {
        Ok(Some(element))
    } else {
        Ok(None)
    }
}
