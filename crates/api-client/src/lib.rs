use crate::auth::sign_request;
use crate::error::ApiError;
use async_trait::async_trait;
use configuration::ApiConfig;
use reqwest::Method;
use rust_decimal::Decimal;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::time::{SystemTime, UNIX_EPOCH};

mod auth;
pub mod error;
pub mod responses;

// --- Public API ---
pub use responses::{AccountResponse, ApiErrorResponse, OrderResponse, PositionResponse, TickerResponse};

/// The generic, abstract interface to the exchange account.
///
/// This trait is the contract the rebalancing engine uses, allowing the
/// underlying implementation (live or mock) to be swapped out. All calls are
/// plain request/response; the engine invokes them strictly sequentially.
#[async_trait]
pub trait Gateway: Send + Sync {
    /// Fetches total account equity in settlement currency. (Authenticated)
    async fn get_account_equity(&self) -> Result<Decimal, ApiError>;

    /// Fetches all current open positions. (Authenticated)
    async fn get_positions(&self) -> Result<Vec<PositionResponse>, ApiError>;

    /// Fetches the last traded price for a contract. Returns zero (not an
    /// error) when the exchange has no ticker for the contract, so planners
    /// can skip the asset gracefully.
    async fn get_price(&self, contract: &str) -> Result<Decimal, ApiError>;

    /// Sets the leverage for a given contract. (Authenticated)
    async fn set_leverage(&self, contract: &str, leverage: u8) -> Result<(), ApiError>;

    /// Places a market order sized in signed integer contracts. (Authenticated)
    async fn create_market_order(
        &self,
        contract: &str,
        size: i64,
        reduce_only: bool,
    ) -> Result<OrderResponse, ApiError>;
}

/// All endpoints used here are USDT-settled perpetuals.
const SETTLE: &str = "usdt";
const API_PREFIX: &str = "/api/v4";

/// The JSON body of a futures order. A market order carries `price = "0"`
/// with time-in-force `ioc`, per the Gate.io API contract.
#[derive(Debug, Serialize)]
struct FuturesOrderRequest<'a> {
    contract: &'a str,
    size: i64,
    price: &'a str,
    tif: &'a str,
    reduce_only: bool,
}

/// A concrete implementation of the `Gateway` for the Gate.io exchange.
#[derive(Clone)]
pub struct GateClient {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
    api_secret: String,
}

impl GateClient {
    pub fn new(api_config: &ApiConfig) -> Self {
        let base_url = if api_config.testnet {
            "https://fx-api-testnet.gateio.ws".to_string()
        } else {
            "https://fx-api.gateio.ws".to_string()
        };

        Self {
            client: reqwest::Client::new(),
            base_url,
            api_key: api_config.key.clone(),
            api_secret: api_config.secret.clone(),
        }
    }

    /// Sends a signed request and deserializes the response, mapping Gate's
    /// `{label, message}` error envelope into a typed `ApiError`.
    async fn request_signed<T: DeserializeOwned>(
        &self,
        method: Method,
        endpoint: &str,
        query: &str,
        body: String,
    ) -> Result<T, ApiError> {
        let path = format!("{API_PREFIX}{endpoint}");
        let timestamp = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map_err(|e| ApiError::InvalidData(format!("System clock before epoch: {e}")))?
            .as_secs()
            .to_string();

        let signature = sign_request(
            &self.api_secret,
            method.as_str(),
            &path,
            query,
            &body,
            &timestamp,
        );

        let mut url = format!("{}{}", self.base_url, path);
        if !query.is_empty() {
            url = format!("{url}?{query}");
        }

        let response = self
            .client
            .request(method, &url)
            .header("KEY", &self.api_key)
            .header("Timestamp", &timestamp)
            .header("SIGN", signature)
            .header("Content-Type", "application/json")
            .body(body)
            .send()
            .await?;

        let status = response.status();
        let text = response.text().await?;

        if status.is_success() {
            serde_json::from_str::<T>(&text).map_err(|e| ApiError::Deserialization(e.to_string()))
        } else {
            let api_error: ApiErrorResponse = serde_json::from_str(&text).map_err(|e| {
                ApiError::Deserialization(format!(
                    "Failed to deserialize error response: {}. Original text: {}",
                    e, text
                ))
            })?;
            Err(ApiError::Exchange {
                label: api_error.label,
                message: api_error.message,
            })
        }
    }

    /// Sends an unsigned request to a public endpoint.
    async fn request_public<T: DeserializeOwned>(
        &self,
        endpoint: &str,
        query: &[(&str, &str)],
    ) -> Result<T, ApiError> {
        let url = format!("{}{}{}", self.base_url, API_PREFIX, endpoint);
        let response = self.client.get(&url).query(query).send().await?;

        let status = response.status();
        let text = response.text().await?;

        if status.is_success() {
            serde_json::from_str::<T>(&text).map_err(|e| ApiError::Deserialization(e.to_string()))
        } else {
            let api_error: ApiErrorResponse = serde_json::from_str(&text).map_err(|e| {
                ApiError::Deserialization(format!(
                    "Failed to deserialize error response: {}. Original text: {}",
                    e, text
                ))
            })?;
            Err(ApiError::Exchange {
                label: api_error.label,
                message: api_error.message,
            })
        }
    }
}

#[async_trait]
impl Gateway for GateClient {
    async fn get_account_equity(&self) -> Result<Decimal, ApiError> {
        let account: AccountResponse = self
            .request_signed(
                Method::GET,
                &format!("/futures/{SETTLE}/accounts"),
                "",
                String::new(),
            )
            .await?;
        Ok(account.total)
    }

    async fn get_positions(&self) -> Result<Vec<PositionResponse>, ApiError> {
        self.request_signed(
            Method::GET,
            &format!("/futures/{SETTLE}/positions"),
            "",
            String::new(),
        )
        .await
    }

    async fn get_price(&self, contract: &str) -> Result<Decimal, ApiError> {
        let tickers: Vec<TickerResponse> = self
            .request_public(
                &format!("/futures/{SETTLE}/tickers"),
                &[("contract", contract)],
            )
            .await?;

        match tickers.first() {
            Some(ticker) => Ok(ticker.last),
            None => {
                tracing::warn!(contract, "No ticker data received; returning zero price");
                Ok(Decimal::ZERO)
            }
        }
    }

    async fn set_leverage(&self, contract: &str, leverage: u8) -> Result<(), ApiError> {
        if leverage < 1 {
            return Err(ApiError::InvalidData(
                "Leverage must be at least 1".to_string(),
            ));
        }
        // The response echoes the position; we only care that the call succeeded.
        let _: PositionResponse = self
            .request_signed(
                Method::POST,
                &format!("/futures/{SETTLE}/positions/{contract}/leverage"),
                &format!("leverage={leverage}"),
                String::new(),
            )
            .await?;
        tracing::info!(contract, leverage, "Leverage updated");
        Ok(())
    }

    async fn create_market_order(
        &self,
        contract: &str,
        size: i64,
        reduce_only: bool,
    ) -> Result<OrderResponse, ApiError> {
        if size == 0 {
            return Err(ApiError::InvalidData(format!(
                "Attempted to create a zero-size order for {contract}"
            )));
        }

        let order = FuturesOrderRequest {
            contract,
            size,
            // Market order: price "0" with immediate-or-cancel.
            price: "0",
            tif: "ioc",
            reduce_only,
        };
        let body = serde_json::to_string(&order)
            .map_err(|e| ApiError::InvalidData(format!("Failed to serialize order: {e}")))?;

        self.request_signed(
            Method::POST,
            &format!("/futures/{SETTLE}/orders"),
            "",
            body,
        )
        .await
    }
}
