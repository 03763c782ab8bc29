pub mod batch;
pub mod config;
pub mod headers;
pub mod input;
pub mod process;
