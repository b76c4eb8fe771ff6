use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use crate::config::Config;
use crate::fetcher::Fetcher;
use crate::frontier::Frontier;
use crate::store::Store;
use crate::worker::CrawlWorker;

pub struct CrawlSession {
    frontier: Arc<Frontier>,
    cancel: CancellationToken,
    handles: Vec<JoinHandle<()>>,
}

impl CrawlSession {
    pub fn start(config: &Config, store: Arc<Store>) -> anyhow::Result<Self> {
        let frontier = Arc::new(Frontier::new(config.max_pages_to_crawl));
        let fetcher = Arc::new(Fetcher::new(
            &config.user_agent,
            config.request_timeout_secs,
            config.retry_count,
        )?);
        let cancel = CancellationToken::new();

        let seeds = config.seed_urls.clone();
        let frontier_for_seed = frontier.clone();
        let delay = Duration::from_secs(config.delay_between_requests_secs);
        let max_depth = config.max_depth;

        let mut handles = Vec::with_capacity(config.worker_count + 1);
        handles.push(tokio::spawn(async move {
            for url in seeds {
                frontier_for_seed.add(url, 0).await;
            }
        }));

        for _ in 0..config.worker_count {
            let worker = CrawlWorker::new(
                frontier.clone(),
                fetcher.clone(),
                store.clone(),
                cancel.clone(),
                delay,
                max_depth,
            );
            handles.push(tokio::spawn(worker.run()));
        }

        Ok(Self {
            frontier,
            cancel,
            handles,
        })
    }

    pub fn stop(&self) {
        self.cancel.cancel();
    }

    /// Does not itself stop the workers; call `stop` first for a bounded wait.
    pub async fn wait_for_frontier_drain(&self) {
        self.frontier.join().await;
    }

    pub async fn shutdown(mut self) {
        self.stop();
        for handle in self.handles.drain(..) {
            let _ = handle.await;
        }
    }
}
