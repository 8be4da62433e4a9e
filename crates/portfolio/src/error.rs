use thiserror::Error;

#[derive(Error, Debug)]
pub enum PortfolioError {
    /// The gateway could not supply account or position data. This aborts the
    /// current cycle; the next scheduled poll retries from fresh state.
    #[error("Account data unavailable: {0}")]
    DataUnavailable(#[from] api_client::error::ApiError),
}
