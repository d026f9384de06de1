//! Command-line driver for tsafe: reads a JSON request describing checked
//! types and syntax sites, runs the lint rules, and reports.

pub mod args;
pub mod driver;
pub mod reporter;
pub mod request;
pub mod tracing_config;
