//! HTTP API: probes, the query/demo/history endpoints and metrics

pub mod health;
pub mod router;
pub mod semantic;
pub mod state;
pub mod types;

pub use router::create_router;
pub use state::AppState;
