//! Gateway error types
//!
//! `AppError` covers startup: configuration, exchange client construction
//! and the HTTP listener. Failures while serving a request stay
//! `ExchangeError`s and are turned into HTTP responses by the server.

use thiserror::Error;

use crate::adapters::errors::ExchangeError;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Exchange error: {0}")]
    Exchange(#[from] ExchangeError),

    #[error("Server error: {0}")]
    Server(#[from] std::io::Error),
}

/// Result type alias using AppError
pub type Result<T> = std::result::Result<T, AppError>;
