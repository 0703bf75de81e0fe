//! CLI error types.

use analytics_core::market_data::MarketDataError;
use analytics_core::types::{
    DateError, DistributionError, LinalgError, SolverError, SpecialFunctionError,
};
use analytics_execution::ExecutionError;
use analytics_margin::MarginError;
use analytics_oms::OmsError;
use analytics_xva::XvaError;
use thiserror::Error;

use crate::config::ConfigError;

/// Errors surfaced by the `analytics` binary.
#[derive(Debug, Error)]
pub enum CliError {
    /// Configuration could not be built.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Argument outside the driver's domain.
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// Optimal execution failure.
    #[error("Execution error: {0}")]
    Execution(#[from] ExecutionError),

    /// SIMM failure.
    #[error("Margin error: {0}")]
    Margin(#[from] MarginError),

    /// Exposure or CSA failure.
    #[error("XVA error: {0}")]
    Xva(#[from] XvaError),

    /// Venue or reservation pricing failure.
    #[error("OMS error: {0}")]
    Oms(#[from] OmsError),

    /// Distribution or sampling failure.
    #[error("Distribution error: {0}")]
    Distribution(#[from] DistributionError),

    /// Linear algebra failure.
    #[error("Linear algebra error: {0}")]
    Linalg(#[from] LinalgError),

    /// Root finding or quadrature setup failure.
    #[error("Solver error: {0}")]
    Solver(#[from] SolverError),

    /// Special function failure.
    #[error("Special function error: {0}")]
    SpecialFunction(#[from] SpecialFunctionError),

    /// Curve or treasury lookup failure.
    #[error("Market data error: {0}")]
    MarketData(#[from] MarketDataError),

    /// Date parsing or arithmetic failure.
    #[error("Date error: {0}")]
    Date(#[from] DateError),

    /// JSON rendering failure.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for CLI operations
pub type Result<T> = std::result::Result<T, CliError>;
