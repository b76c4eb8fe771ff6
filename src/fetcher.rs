//! HTTP GET with user-agent, timeout, bounded retries, and backoff.

use std::sync::Arc;
use std::time::Duration;

use tokio::time::sleep;

use crate::robots::RobotsCache;

pub struct Fetcher {
    client: reqwest::Client,
    robots: Arc<RobotsCache>,
    request_timeout: Duration,
    retry_count: usize,
}

impl Fetcher {
    pub fn new(
        user_agent: &str,
        request_timeout_secs: u64,
        retry_count: usize,
    ) -> reqwest::Result<Self> {
        let client = reqwest::Client::builder().user_agent(user_agent).build()?;
        let robots = Arc::new(RobotsCache::new(client.clone(), user_agent));
        Ok(Self {
            client,
            robots,
            request_timeout: Duration::from_secs(request_timeout_secs),
            retry_count,
        })
    }

    /// Fetches `url`'s body, honoring robots.txt and retrying transient
    /// failures up to `retry_count` times with a one-second backoff sleep
    /// between attempts. Returns `None` on a robots disallow, a non-200
    /// response on the final attempt, or an exhausted retry budget.
    pub async fn fetch(&self, url: &str) -> Option<String> {
        let parsed = reqwest::Url::parse(url).ok()?;
        if !self.robots.can_fetch(&parsed).await {
            tracing::info!(%url, "blocked by robots.txt");
            return None;
        }

        for attempt in 0..self.retry_count {
            let result = tokio::time::timeout(self.request_timeout, self.client.get(url).send()).await;
            match result {
                Ok(Ok(response)) if response.status().is_success() => {
                    return response.text().await.ok();
                }
                Ok(Ok(response)) => {
                    tracing::warn!(%url, status = %response.status(), attempt, "non-200 response");
                }
                Ok(Err(err)) => {
                    tracing::warn!(%url, %err, attempt, "fetch error");
                }
                Err(_) => {
                    tracing::warn!(%url, attempt, "request timed out");
                }
            }
            if attempt + 1 < self.retry_count {
                sleep(Duration::from_secs(1)).await;
            }
        }

        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builds_with_valid_user_agent() {
        assert!(Fetcher::new("TestBot/1.0", 5, 2).is_ok());
    }

    #[tokio::test]
    async fn rejects_unparseable_urls() {
        let fetcher = Fetcher::new("TestBot/1.0", 1, 1).unwrap();
        assert!(fetcher.fetch("not a url").await.is_none());
    }
}
