//! Errors raised by the service plumbing around the recorder.
//!
//! Recording itself never fails; only construction, configuration, logging
//! setup, serving, and exposition encoding can.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("metric registry error: {0}")]
    Metrics(#[from] prometheus::Error),

    #[error("configuration error: {0}")]
    Config(#[from] Box<figment::Error>),

    #[error("logging setup error: {0}")]
    Logging(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("metrics encoding error: {0}")]
    Encoding(String),
}

impl From<figment::Error> for Error {
    fn from(e: figment::Error) -> Self {
        Error::Config(Box::new(e))
    }
}

pub type Result<T> = std::result::Result<T, Error>;
