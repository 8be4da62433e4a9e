use thiserror::Error;

#[derive(Error, Debug)]
pub enum EngineError {
    /// Fresh account state could not be read; the cycle aborts and the next
    /// scheduled poll retries.
    #[error("Portfolio state error: {0}")]
    Portfolio(#[from] portfolio::PortfolioError),
}
