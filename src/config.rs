const USER_AGENT: &str = "MiniGoogleBot/1.0";
const MAX_DEPTH: usize = 2;
const MAX_PAGES_TO_CRAWL: usize = 100;
const REQUEST_TIMEOUT_SECS: u64 = 10;
const RETRY_COUNT: usize = 3;
const DELAY_BETWEEN_REQUESTS_SECS: u64 = 1;
const USE_STEMMING: bool = true;
const DAMPING_FACTOR: f64 = 0.85;
const PAGERANK_ITERATIONS: usize = 20;
const PAGERANK_WEIGHT: f64 = 10.0;
const TFIDF_WEIGHT: f64 = 1.0;
const DATABASE_PATH: &str = "search_engine.db";
const WORKER_COUNT: usize = 5;

pub fn default_seed_urls() -> Vec<String> {
    vec![
        "https://www.python.org".to_string(),
        "https://en.wikipedia.org/wiki/Web_crawler".to_string(),
        "https://fastapi.tiangolo.com/".to_string(),
        "https://docs.docker.com/".to_string(),
    ]
}

#[derive(Debug, Clone)]
pub struct Config {
    pub user_agent: String,
    pub max_depth: usize,
    pub max_pages_to_crawl: usize,
    pub request_timeout_secs: u64,
    pub retry_count: usize,
    pub delay_between_requests_secs: u64,
    pub use_stemming: bool,
    pub damping_factor: f64,
    pub pagerank_iterations: usize,
    pub pagerank_weight: f64,
    pub tfidf_weight: f64,
    pub database_path: String,
    pub worker_count: usize,
    pub seed_urls: Vec<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            user_agent: USER_AGENT.into(),
            max_depth: MAX_DEPTH,
            max_pages_to_crawl: MAX_PAGES_TO_CRAWL,
            request_timeout_secs: REQUEST_TIMEOUT_SECS,
            retry_count: RETRY_COUNT,
            delay_between_requests_secs: DELAY_BETWEEN_REQUESTS_SECS,
            use_stemming: USE_STEMMING,
            damping_factor: DAMPING_FACTOR,
            pagerank_iterations: PAGERANK_ITERATIONS,
            pagerank_weight: PAGERANK_WEIGHT,
            tfidf_weight: TFIDF_WEIGHT,
            database_path: DATABASE_PATH.into(),
            worker_count: WORKER_COUNT,
            seed_urls: default_seed_urls(),
        }
    }
}

pub struct ConfigBuilder {
    config: Config,
}

impl Default for ConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl ConfigBuilder {
    pub fn new() -> Self {
        Self {
            config: Config::default(),
        }
    }

    pub fn with_user_agent<S: AsRef<str>>(mut self, user_agent: S) -> Self {
        self.config.user_agent = user_agent.as_ref().into();
        self
    }

    pub fn with_max_depth(mut self, depth: usize) -> Self {
        self.config.max_depth = depth;
        self
    }

    pub fn with_max_pages_to_crawl(mut self, pages: usize) -> Self {
        self.config.max_pages_to_crawl = pages;
        self
    }

    pub fn with_request_timeout_secs(mut self, secs: u64) -> Self {
        self.config.request_timeout_secs = secs;
        self
    }

    pub fn with_retry_count(mut self, count: usize) -> Self {
        self.config.retry_count = count;
        self
    }

    pub fn with_delay_between_requests_secs(mut self, secs: u64) -> Self {
        self.config.delay_between_requests_secs = secs;
        self
    }

    pub fn with_use_stemming(mut self, use_stemming: bool) -> Self {
        self.config.use_stemming = use_stemming;
        self
    }

    pub fn with_damping_factor(mut self, d: f64) -> Self {
        self.config.damping_factor = d;
        self
    }

    pub fn with_pagerank_iterations(mut self, iterations: usize) -> Self {
        self.config.pagerank_iterations = iterations;
        self
    }

    pub fn with_database_path<S: AsRef<str>>(mut self, path: S) -> Self {
        self.config.database_path = path.as_ref().into();
        self
    }

    pub fn with_worker_count(mut self, count: usize) -> Self {
        self.config.worker_count = count;
        self
    }

    pub fn with_seed_urls(mut self, urls: Vec<String>) -> Self {
        self.config.seed_urls = urls;
        self
    }

    pub fn build(self) -> Config {
        self.config
    }
}
