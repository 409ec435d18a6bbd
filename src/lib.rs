// Public API for integration tests and the binaries

pub mod commands;
pub mod config;
pub mod error;
pub mod routes;
pub mod session;
pub mod state;
pub mod sweeper;
pub mod types;
pub mod words;
