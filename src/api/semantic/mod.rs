//! Semantic cache demo endpoints under `/api`

pub mod demo;
pub mod history;
pub mod query;
pub mod status;

use axum::{
    Router,
    routing::{get, post},
};

use super::state::AppState;

pub fn create_semantic_router() -> Router<AppState> {
    Router::new()
        .route("/status", get(status::get_status))
        .route("/query", post(query::run_query))
        .route("/demo/caching", post(demo::caching_demo))
        .route("/demo/similarity", post(demo::similarity_demo))
        .route("/history", get(history::list_history))
        .route("/history/clear", post(history::clear_history))
}
