//! Crate-level error type

use crate::config::ConfigError;
use crate::graph::GraphError;
use thiserror::Error;

/// Errors that can occur while producing a report
#[derive(Error, Debug)]
pub enum MailnetError {
    /// Input files are missing, malformed or inconsistent
    #[error("Graph error: {0}")]
    Graph(#[from] GraphError),

    /// Report configuration could not be loaded or is invalid
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),
}

pub type MailnetResult<T> = Result<T, MailnetError>;
