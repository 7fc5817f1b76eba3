//! Error types for the CLI

use std::path::PathBuf;
use thiserror::Error;

/// Main CLI error type
#[derive(Error, Debug)]
pub enum CliError {
    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// The input file is already present and will not be replaced
    #[error("{} already exists", .0.display())]
    InputExists(PathBuf),

    /// The submission ended in an error that has already been printed
    #[error("Submission failed")]
    SubmissionFailed,

    /// HTTP client error
    #[error("{0}")]
    Client(#[from] aoc_client::ClientError),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
