pub mod config;
pub mod constants;
pub mod error;
pub mod logging;
pub mod metrics;
pub mod metrics_push;
pub mod pipeline;
pub mod types;

// Application layer (ports + use case) and its adapters
pub mod app;
pub mod infra;

pub use app::run_use_case::{RunReport, RunUseCase};
pub use config::Config;
pub use error::{PipelineError, Result, SchemaError};
pub use types::{HandoffRecord, PublishReceipt};
