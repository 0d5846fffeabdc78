pub mod analysis;
pub mod cost_structure;
pub mod error;
pub mod format;
pub mod input;
pub mod metric;
pub mod profitability;
pub mod targets;
pub mod types;

pub use error::ProfitabilityError;
pub use metric::Metric;
pub use types::*;

/// Standard result type for all profitability operations
pub type ProfitabilityResult<T> = Result<T, ProfitabilityError>;
