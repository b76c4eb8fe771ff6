//! Dequeues a URL, fetches, parses, persists the page and its outlinks, and
//! enqueues newly discovered links.

use std::sync::Arc;
use std::time::Duration;

use tokio_util::sync::CancellationToken;

use crate::fetcher::Fetcher;
use crate::frontier::Frontier;
use crate::parser;
use crate::store::Store;

pub struct CrawlWorker {
    frontier: Arc<Frontier>,
    fetcher: Arc<Fetcher>,
    store: Arc<Store>,
    cancel: CancellationToken,
    delay: Duration,
    max_depth: usize,
}

impl CrawlWorker {
    pub fn new(
        frontier: Arc<Frontier>,
        fetcher: Arc<Fetcher>,
        store: Arc<Store>,
        cancel: CancellationToken,
        delay: Duration,
        max_depth: usize,
    ) -> Self {
        Self {
            frontier,
            fetcher,
            store,
            cancel,
            delay,
            max_depth,
        }
    }

    /// Runs until the cancellation token fires. A transiently empty frontier
    /// is not a shutdown signal: the worker loops and tries again.
    pub async fn run(self) {
        loop {
            if self.cancel.is_cancelled() {
                return;
            }

            let item = self.frontier.next(Duration::from_secs(1)).await;
            let Some((url, depth)) = item else {
                continue;
            };

            if let Err(err) = self.process(&url, depth).await {
                tracing::error!(%url, %err, "error processing url, continuing");
            }
            self.frontier.done();
        }
    }

    async fn process(&self, url: &str, depth: usize) -> anyhow::Result<()> {
        tokio::time::sleep(self.delay).await;

        tracing::info!(%url, depth, "crawling");
        let Some(html) = self.fetcher.fetch(url).await else {
            return Ok(());
        };

        let data = parser::parse(&html, url);
        let src_id = self.store.upsert_page(
            url,
            Some(&data.title),
            Some(&data.raw_content),
            Some(&data.cleaned_text),
        )?;

        for link in &data.links {
            if depth < self.max_depth {
                self.frontier.add(link.clone(), depth + 1).await;
            }

            let target_id = match self.store.get_page_id(link)? {
                Some(id) => id,
                None => self.store.upsert_page(link, None, None, None)?,
            };
            self.store.add_link(src_id, target_id)?;
        }

        Ok(())
    }
}
