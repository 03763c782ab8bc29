//! Data models for extracted statements and pipeline configuration.

pub mod config;
pub mod statement;
