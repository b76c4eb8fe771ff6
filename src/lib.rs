//! A self-contained web search engine: bounded-region crawler, inverted
//! index + PageRank pipeline, and a term-at-a-time query ranker.

pub mod config;
pub mod crawl;
pub mod error;
pub mod fetcher;
pub mod frontier;
pub mod indexer;
pub mod pagerank;
pub mod parser;
pub mod ranker;
pub mod robots;
pub mod store;
pub mod text;
pub mod worker;

pub use config::{Config, ConfigBuilder};
pub use crawl::CrawlSession;
pub use error::{Result, SearchEngineError};
pub use ranker::SearchHit;
pub use store::Store;
