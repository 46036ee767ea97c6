pub mod app;
pub mod cache;
pub mod catalog;
pub mod config;
pub mod constants;
pub mod error;
pub mod infra;
pub mod observability;
pub mod scheduler;
pub mod selection;
pub mod server;
pub mod templates;
pub mod types;
