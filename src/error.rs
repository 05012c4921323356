use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("HTTP transport error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("backend returned {status}: {message}")]
    Api { status: u16, message: String },
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("configuration error: {0}")]
    Config(String),
    #[error("session store error: {0}")]
    Session(String),
    #[error("validation error: {0}")]
    Validation(String),
}

pub type Result<T> = std::result::Result<T, AppError>;
