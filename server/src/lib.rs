use anyhow::Result;
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use lexis_core::persist::{load_doc_sources, IndexPaths};
use lexis_core::tokenizer::tokenize;
use lexis_core::{DocId, Ranker, SearchIndex};
use serde::{Deserialize, Serialize};
use std::path::Path as FsPath;
use std::sync::Arc;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::trace::TraceLayer;

pub const MAX_K: usize = 100;

#[derive(Deserialize)]
pub struct SearchParams {
    pub q: String,
    #[serde(default = "default_k")]
    pub k: usize,
}
fn default_k() -> usize { 10 }

#[derive(Deserialize)]
pub struct BooleanParams {
    pub q: String,
}

#[derive(Serialize)]
pub struct SearchResponse {
    pub query: String,
    pub took_s: f64,
    pub total_hits: usize,
    pub results: Vec<SearchHit>,
}

#[derive(Serialize)]
pub struct SearchHit {
    pub doc_id: DocId,
    pub score: f64,
    pub source: Option<String>,
}

#[derive(Serialize)]
pub struct BooleanResponse {
    pub query: String,
    pub took_s: f64,
    pub total_hits: usize,
    pub doc_ids: Vec<DocId>,
}

#[derive(Serialize)]
pub struct DocTerm {
    pub term: String,
    pub tfidf: f64,
}

#[derive(Serialize)]
pub struct DocResponse {
    pub doc_id: DocId,
    pub source: Option<String>,
    pub terms: Vec<DocTerm>,
}

/// Error responses carry `{"error": message}`.
#[derive(Debug)]
pub enum ApiError {
    BadRequest(String),
    NotFound(String),
    Internal(String),
}

impl From<lexis_core::Error> for ApiError {
    fn from(e: lexis_core::Error) -> Self {
        use lexis_core::Error::*;
        match &e {
            UnknownTerm(_) | InvalidQuery(_) | InvalidOperation(_) => ApiError::BadRequest(e.to_string()),
            _ => ApiError::Internal(e.to_string()),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            ApiError::Internal(msg) => (StatusCode::INTERNAL_SERVER_ERROR, msg),
        };
        (status, Json(serde_json::json!({ "error": message }))).into_response()
    }
}

/// Read-only state shared by every request; no locks on the query path.
#[derive(Clone)]
pub struct AppState {
    pub index: Arc<SearchIndex>,
    pub sources: Arc<Vec<String>>,
}

impl AppState {
    fn source(&self, doc_id: DocId) -> Option<String> {
        self.sources.get(doc_id as usize).cloned()
    }
}

/// Prefers `snapshot.bin`, falling back to the text artifacts.
pub fn load_index(index_dir: &FsPath) -> Result<SearchIndex> {
    let paths = IndexPaths::new(index_dir);
    let snapshot = paths.snapshot();
    if snapshot.exists() {
        match SearchIndex::load_snapshot(&snapshot) {
            Ok(index) => return Ok(index),
            Err(e) => tracing::warn!(error = %e, "snapshot unreadable, loading text artifacts"),
        }
    }
    Ok(SearchIndex::load(&paths)?)
}

pub fn build_app(index_dir: String) -> Result<Router> {
    // Load the index once at startup
    let index = load_index(FsPath::new(&index_dir))?;
    let sources_path = IndexPaths::new(&index_dir).doc_sources();
    let sources = if sources_path.exists() { load_doc_sources(&sources_path)? } else { Vec::new() };
    tracing::info!(num_docs = index.num_docs(), num_terms = index.dictionary().len(), "index loaded");
    let app_state = AppState { index: Arc::new(index), sources: Arc::new(sources) };

    // CORS: read CORS_ALLOW_ORIGIN (comma-separated) or allow Any by default
    let cors = match std::env::var("CORS_ALLOW_ORIGIN") {
        Ok(val) => {
            let origins: Vec<_> = val
                .split(',')
                .filter_map(|s| s.trim().parse().ok())
                .collect();
            if origins.is_empty() {
                CorsLayer::new().allow_origin(Any).allow_methods(Any).allow_headers(Any)
            } else {
                CorsLayer::new().allow_origin(AllowOrigin::list(origins)).allow_methods(Any).allow_headers(Any)
            }
        }
        Err(_) => CorsLayer::new().allow_origin(Any).allow_methods(Any).allow_headers(Any),
    };

    let app = Router::new()
        .route("/health", get(|| async { "ok" }))
        .route("/search", get(search_handler))
        .route("/boolean", get(boolean_handler))
        .route("/doc/:doc_id", get(doc_handler))
        .with_state(app_state)
        .layer(cors)
        .layer(TraceLayer::new_for_http());
    Ok(app)
}

pub async fn search_handler(State(state): State<AppState>, Query(params): Query<SearchParams>) -> Json<SearchResponse> {
    let start = std::time::Instant::now();
    let terms = tokenize(&params.q);
    let k = params.k.clamp(1, MAX_K);
    let query = state.index.vectorize(&terms);
    let ranked = Ranker::rank(&query, state.index.tfidf());
    let total_hits = ranked.iter().filter(|hit| hit.score > 0.0).count();

    let results = ranked
        .into_iter()
        .take(k.min(total_hits))
        .map(|hit| SearchHit { doc_id: hit.doc_id, score: hit.score, source: state.source(hit.doc_id) })
        .collect();

    let elapsed = start.elapsed();
    Json(SearchResponse { query: params.q, took_s: elapsed.as_secs_f64(), total_hits, results })
}

pub async fn boolean_handler(
    State(state): State<AppState>,
    Query(params): Query<BooleanParams>,
) -> Result<Json<BooleanResponse>, ApiError> {
    let start = std::time::Instant::now();
    let doc_ids = state.index.boolean(&params.q)?.into_vec();
    let elapsed = start.elapsed();
    Ok(Json(BooleanResponse { query: params.q, took_s: elapsed.as_secs_f64(), total_hits: doc_ids.len(), doc_ids }))
}

pub async fn doc_handler(State(state): State<AppState>, Path(doc_id): Path<DocId>) -> Result<Json<DocResponse>, ApiError> {
    let row = state
        .index
        .tfidf()
        .row(doc_id)
        .ok_or_else(|| ApiError::NotFound(format!("document {doc_id} not found")))?;
    let dictionary = state.index.dictionary();
    let mut terms = Vec::with_capacity(row.nnz());
    for (term_id, tfidf) in row.iter() {
        let term = dictionary
            .term(term_id)
            .ok_or_else(|| ApiError::Internal(format!("term id {term_id} missing from dictionary")))?;
        terms.push(DocTerm { term: term.to_string(), tfidf });
    }
    terms.sort_by(|a, b| b.tfidf.partial_cmp(&a.tfidf).unwrap_or(std::cmp::Ordering::Equal));
    Ok(Json(DocResponse { doc_id, source: state.source(doc_id), terms }))
}
