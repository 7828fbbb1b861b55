//! Concrete implementations of the ports

pub mod demo;
pub mod duckdb;
pub mod http_analysis;
