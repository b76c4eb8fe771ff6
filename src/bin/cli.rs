use clap::{Parser, Subcommand};
use serde::Deserialize;

#[derive(Parser)]
#[command(name = "search-engine-cli", about = "Drive a running search engine server")]
struct Cli {
    #[arg(long, default_value = "http://127.0.0.1:8000")]
    server: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Trigger a crawl session on the server.
    Crawl,
    /// Trigger an index + PageRank rebuild on the server.
    Index,
    /// Run a search query against the server.
    Search { query: String },
}

#[derive(Deserialize)]
struct MessageBody {
    message: String,
}

#[derive(Deserialize)]
struct SearchResult {
    url: String,
    title: String,
    snippet: String,
    score: f64,
    pagerank: f64,
}

#[derive(Deserialize)]
struct SearchResponseBody {
    query: String,
    count: usize,
    results: Vec<SearchResult>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let client = reqwest::Client::new();

    match cli.command {
        Command::Crawl => {
            let body: MessageBody = client
                .post(format!("{}/admin/crawl", cli.server))
                .send()
                .await?
                .json()
                .await?;
            println!("{}", body.message);
        }
        Command::Index => {
            let body: MessageBody = client
                .post(format!("{}/admin/index", cli.server))
                .send()
                .await?
                .json()
                .await?;
            println!("{}", body.message);
        }
        Command::Search { query } => {
            let body: SearchResponseBody = client
                .get(format!("{}/search", cli.server))
                .query(&[("q", query.as_str())])
                .send()
                .await?
                .json()
                .await?;
            println!("Query \"{}\" returned {} result(s):", body.query, body.count);
            for result in body.results {
                println!(
                    "  {} (score {:.3}, pagerank {:.3}) - {}\n    {}",
                    result.title, result.score, result.pagerank, result.url, result.snippet
                );
            }
        }
    }

    Ok(())
}
