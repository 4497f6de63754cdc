//! Error types shared across the client.

use std::path::PathBuf;

use thiserror::Error;

/// Errors returned by calls to the scoring backend.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum BackendError {
    #[error("request failed with status {0}")]
    HttpStatus(reqwest::StatusCode),
    #[error(transparent)]
    Http(#[from] reqwest::Error),
    #[error("unexpected response body: {0}")]
    Decode(#[from] serde_json::Error),
}

/// Submit was refused before anything was sent.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SubmitError {
    #[error("Please answer at least one question first!")]
    NoChoiceAnswers,
}

#[derive(Debug, Error)]
#[non_exhaustive]
pub enum QuizLoadError {
    #[error("cannot read quiz file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("quiz file {0} contains no questions")]
    Empty(String),
}

#[derive(Debug, Error)]
#[non_exhaustive]
pub enum PrefsError {
    #[error("cannot access preferences at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("corrupt preferences file: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

/// Errors that end the program.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum AppError {
    #[error(transparent)]
    QuizLoad(#[from] QuizLoadError),
    #[error(transparent)]
    Backend(#[from] BackendError),
    #[error("terminal error: {0}")]
    Terminal(#[from] std::io::Error),
    #[error("cannot start async runtime: {0}")]
    Runtime(String),
}
