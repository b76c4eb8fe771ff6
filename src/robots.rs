//! Per-host robots.txt cache and fetch-permission decisions.
//!
//! Keyed by `scheme://host`, continuing the crawler's own choice of
//! `indexmap::IndexMap` for the cache, now behind a `tokio::sync::RwLock`
//! so concurrent workers can all call `can_fetch` without contending on a
//! single mutex for the common (already cached) case.

use indexmap::IndexMap;
use robotstxt::DefaultMatcher;
use tokio::sync::RwLock;

/// Cached robots.txt state for one host. `None` means the host is treated
/// as allow-all, either because robots.txt was missing or fetching it
/// failed outright.
enum RobotsEntry {
    Parsed(String),
    AllowAll,
}

pub struct RobotsCache {
    client: reqwest::Client,
    user_agent: String,
    cache: RwLock<IndexMap<String, RobotsEntry>>,
}

impl RobotsCache {
    pub fn new(client: reqwest::Client, user_agent: impl Into<String>) -> Self {
        Self {
            client,
            user_agent: user_agent.into(),
            cache: RwLock::new(IndexMap::new()),
        }
    }

    fn host_key(url: &reqwest::Url) -> Option<String> {
        Some(format!("{}://{}", url.scheme(), url.host_str()?))
    }

    /// Fetches and caches `robots.txt` for `url`'s host on first access, then
    /// consults the cached parser (or allows unconditionally on error).
    pub async fn can_fetch(&self, url: &reqwest::Url) -> bool {
        let Some(key) = Self::host_key(url) else {
            return true;
        };

        {
            let cache = self.cache.read().await;
            if let Some(entry) = cache.get(&key) {
                return self.decide(entry, url.as_str());
            }
        }

        let entry = self.fetch_robots(&key).await;
        let allowed = self.decide(&entry, url.as_str());

        let mut cache = self.cache.write().await;
        cache.entry(key).or_insert(entry);
        allowed
    }

    fn decide(&self, entry: &RobotsEntry, url: &str) -> bool {
        match entry {
            RobotsEntry::AllowAll => true,
            RobotsEntry::Parsed(content) => DefaultMatcher::default()
                .one_agent_allowed_by_robots(content, &self.user_agent, url),
        }
    }

    async fn fetch_robots(&self, host_key: &str) -> RobotsEntry {
        let robots_url = format!("{host_key}/robots.txt");
        match self.client.get(&robots_url).send().await {
            Ok(response) => match response.text().await {
                Ok(body) => RobotsEntry::Parsed(body),
                Err(_) => RobotsEntry::AllowAll,
            },
            Err(_) => RobotsEntry::AllowAll,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn host_key_combines_scheme_and_host() {
        let url = reqwest::Url::parse("https://example.com/path").unwrap();
        assert_eq!(
            RobotsCache::host_key(&url),
            Some("https://example.com".to_string())
        );
    }

    #[tokio::test]
    async fn unreachable_host_is_allow_all() {
        let cache = RobotsCache::new(reqwest::Client::new(), "TestBot/1.0");
        let url = reqwest::Url::parse("http://127.0.0.1.invalid.test/page").unwrap();
        assert!(cache.can_fetch(&url).await);
    }
}
