use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("config error: {0}")]
    Config(String),

    /// The market data source could not produce a usable snapshot this cycle.
    #[error("data unavailable: {0}")]
    DataUnavailable(String),

    /// The signal pipeline was handed rows that break the snapshot contract.
    #[error("invalid input: {0}")]
    InvalidInput(String),
}

impl From<reqwest::Error> for AppError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::DataUnavailable(format!("request timed out: {}", err))
        } else {
            Self::DataUnavailable(format!("HTTP error: {}", err))
        }
    }
}
