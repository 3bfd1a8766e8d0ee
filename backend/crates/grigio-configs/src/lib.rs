//! grigio-configs
//!
//! Table configuration types and loader for grigio key-value tables.

pub mod config;

pub use config::defaults;
pub use config::*;
