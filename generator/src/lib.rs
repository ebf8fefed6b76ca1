pub mod batch;
pub mod client;
pub mod config;
pub mod error;
pub mod logging;

pub use batch::{run_batch, BatchSummary, RetryPolicy};
pub use config::GeneratorConfig;
pub use error::GeneratorError;
