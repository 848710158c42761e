use thiserror::Error;
use std::io;

#[derive(Error, Debug)]
pub enum LendSeerError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("Listing source error: {0}")]
    Source(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Report error: {0}")]
    Report(String),

    #[error("Validation error: {0}")]
    Validation(String),
}

impl LendSeerError {
    pub fn config_error(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    pub fn source_error(msg: impl Into<String>) -> Self {
        Self::Source(msg.into())
    }

    pub fn report_error(msg: impl Into<String>) -> Self {
        Self::Report(msg.into())
    }

    pub fn validation_error(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }
}

pub type Result<T> = std::result::Result<T, LendSeerError>;
