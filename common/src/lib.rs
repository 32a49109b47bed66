pub mod config;
pub mod context;
pub mod database;
pub mod http;
pub mod logging;
pub mod signal;
