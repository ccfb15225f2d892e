use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("HTTP client error: {0}")]
    Client(#[from] reqwest::Error),

    #[error("DNS resolution error: {0}")]
    Resolve(#[from] trust_dns_resolver::error::ResolveError),

    #[error("{url} answered with status {status}")]
    UnexpectedStatus { url: String, status: u16 },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Invalid domain: {0:?}")]
    InvalidDomain(String),
}

pub type Result<T> = std::result::Result<T, Error>;
