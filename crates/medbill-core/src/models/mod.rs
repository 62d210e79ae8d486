//! Data models: the extracted bill, its validation outcome, and configuration.

pub mod assessment;
pub mod bill;
pub mod config;
