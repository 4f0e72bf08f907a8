//! # erc20-api-core
//!
//! Configuration and audit logging shared by the gateway crates.

pub mod audit;
pub mod config;

pub use config::{Config, ConfigError};
