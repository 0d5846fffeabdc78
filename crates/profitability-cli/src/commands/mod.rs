pub mod business;
pub mod profitability;
pub mod targets;
