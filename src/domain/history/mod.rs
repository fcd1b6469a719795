//! Query history owned by the calling layer

mod log;
mod record;

pub use log::QueryHistory;
pub use record::{QueryOutcome, QueryRecord};
