use std::sync::Arc;

use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;
use tower_http::trace::TraceLayer;

use search_engine::error::SearchEngineError;
use search_engine::{indexer, pagerank, ranker, Config, ConfigBuilder, CrawlSession, Store};

struct AppState {
    store: Arc<Store>,
    config: Config,
    crawl: Mutex<Option<CrawlSession>>,
    admin_lock: Mutex<()>,
}

#[derive(Deserialize)]
struct SearchQuery {
    q: Option<String>,
}

#[derive(Serialize)]
struct SearchResponseBody {
    query: String,
    count: usize,
    results: Vec<ranker::SearchHit>,
}

#[derive(Serialize)]
struct MessageBody {
    message: String,
}

async fn search_handler(
    State(state): State<Arc<AppState>>,
    Query(params): Query<SearchQuery>,
) -> Response {
    let query = params.q.unwrap_or_default();
    match ranker::validated_search(
        &state.store,
        &query,
        state.config.use_stemming,
        state.config.tfidf_weight,
        state.config.pagerank_weight,
    ) {
        Ok(results) => Json(SearchResponseBody {
            query,
            count: results.len(),
            results,
        })
        .into_response(),
        Err(SearchEngineError::Validation(message)) => {
            (StatusCode::BAD_REQUEST, Json(MessageBody { message })).into_response()
        }
        Err(err) => {
            tracing::error!(%err, "search failed");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(MessageBody {
                    message: err.to_string(),
                }),
            )
                .into_response()
        }
    }
}

async fn trigger_crawl(State(state): State<Arc<AppState>>) -> Response {
    let mut crawl = state.crawl.lock().await;
    if crawl.is_some() {
        return Json(MessageBody {
            message: "Crawler already running".to_string(),
        })
        .into_response();
    }

    match CrawlSession::start(&state.config, state.store.clone()) {
        Ok(session) => {
            *crawl = Some(session);
            Json(MessageBody {
                message: "Crawler started in background".to_string(),
            })
            .into_response()
        }
        Err(err) => {
            tracing::error!(%err, "failed to start crawl session");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(MessageBody {
                    message: err.to_string(),
                }),
            )
                .into_response()
        }
    }
}

async fn trigger_index(State(state): State<Arc<AppState>>) -> Response {
    let _guard = state.admin_lock.lock().await;
    let store = state.store.clone();
    let config = state.config.clone();

    let result = tokio::task::spawn_blocking(move || {
        indexer::build_index(&store, config.use_stemming)?;
        pagerank::calculate(&store, config.damping_factor, config.pagerank_iterations)
    })
    .await;

    match result {
        Ok(Ok(())) => Json(MessageBody {
            message: "Indexing started in background".to_string(),
        })
        .into_response(),
        Ok(Err(err)) => {
            tracing::error!(%err, "rebuild failed, previous state preserved");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(MessageBody {
                    message: err.to_string(),
                }),
            )
                .into_response()
        }
        Err(join_err) => {
            tracing::error!(%join_err, "rebuild task panicked");
            (StatusCode::INTERNAL_SERVER_ERROR, Json(MessageBody {
                message: "internal error during rebuild".to_string(),
            }))
                .into_response()
        }
    }
}

async fn root() -> Json<MessageBody> {
    Json(MessageBody {
        message: "Welcome to Mini Google API. Use /search?q=query to search.".to_string(),
    })
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt().with_target(false).compact().init();

    let config = ConfigBuilder::new().build();
    let store = Arc::new(Store::open(&config.database_path)?);

    let state = Arc::new(AppState {
        store,
        config,
        crawl: Mutex::new(None),
        admin_lock: Mutex::new(()),
    });

    let app = Router::new()
        .route("/", get(root))
        .route("/search", get(search_handler))
        .route("/admin/crawl", post(trigger_crawl))
        .route("/admin/index", post(trigger_index))
        .with_state(state)
        .layer(TraceLayer::new_for_http());

    let addr = "0.0.0.0:8000";
    tracing::info!(%addr, "search engine listening");
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}
