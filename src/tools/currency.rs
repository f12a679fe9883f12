use std::collections::HashMap;
use std::sync::Arc;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use thiserror::Error;

use crate::settings::DEFAULT_EXCHANGE_RATE_BASE;
use super::Tool;

/// Amount and currency codes to convert. Codes are passed through as given.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConversionRequest {
    pub amount:        f64,
    pub from_currency: String,
    pub to_currency:   String,
}

/// A successful conversion. `Display` renders the sentence the agent sees.
#[derive(Debug, Clone, PartialEq)]
pub struct Conversion {
    pub amount:        f64,
    pub from_currency: String,
    pub to_currency:   String,
    pub rate:          f64,
    pub converted:     f64,
}

impl std::fmt::Display for Conversion {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "{} {} is equivalent to {:.2} {}.",
               self.amount, self.from_currency, self.converted, self.to_currency)
    }
}

#[derive(Debug, Error)]
pub enum ConversionError {
    /// The rate service answered with a non-success status.
    #[error("Failed to fetch exchange rates.")]
    RatesUnavailable { status: u16 },

    /// The target code is not in the service's rate table.
    #[error("Invalid currency code: {0}")]
    InvalidCurrency(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Exchange rate request failed: {0}")]
    Transport(String),

    #[error("Unreadable exchange rate response: {0}")]
    Decode(String),
}

/// Body of `GET /v6/{key}/latest/{base}`, reduced to the rate table.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RatesResponse {
    #[serde(default)]
    pub conversion_rates: HashMap<String, f64>,
}

/// Where current rates for a base currency come from.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait RateSource: Send + Sync {
    async fn latest(&self, base: &str) -> Result<RatesResponse, ConversionError>;
}

/// ExchangeRate-API v6 over reqwest. Library-default timeouts, no retries.
pub struct HttpRateSource {
    client:   reqwest::Client,
    base_url: String,
    api_key:  String,
}

impl HttpRateSource {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self::with_base_url(DEFAULT_EXCHANGE_RATE_BASE, api_key)
    }

    /// Point at another server, e.g. a local fixture.
    pub fn with_base_url(base_url: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            client:   reqwest::Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key:  api_key.into(),
        }
    }
}

#[async_trait]
impl RateSource for HttpRateSource {
    async fn latest(&self, base: &str) -> Result<RatesResponse, ConversionError> {
        let url = format!("{}/v6/{}/latest/{}", self.base_url, self.api_key, base);

        let response = self.client.get(&url)
            .send()
            .await
            .map_err(|e| ConversionError::Transport(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            tracing::warn!(status = status.as_u16(), base, "exchange rate service returned error status");
            return Err(ConversionError::RatesUnavailable { status: status.as_u16() });
        }

        response.json::<RatesResponse>()
            .await
            .map_err(|e| ConversionError::Decode(e.to_string()))
    }
}

/// Converts an amount between currencies at the current rate.
pub struct CurrencyConverterTool {
    source: Arc<dyn RateSource>,
}

impl CurrencyConverterTool {
    /// Uses the public ExchangeRate-API with the given key.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self::with_source(Arc::new(HttpRateSource::new(api_key)))
    }

    pub fn with_source(source: Arc<dyn RateSource>) -> Self {
        Self { source }
    }

    pub async fn convert(&self, request: &ConversionRequest) -> Result<Conversion, ConversionError> {
        let rates = self.source.latest(&request.from_currency).await?;

        let rate = *rates.conversion_rates.get(&request.to_currency)
            .ok_or_else(|| ConversionError::InvalidCurrency(request.to_currency.clone()))?;

        let conversion = Conversion {
            amount:        request.amount,
            from_currency: request.from_currency.clone(),
            to_currency:   request.to_currency.clone(),
            rate,
            converted:     request.amount * rate,
        };
        tracing::debug!(
            from = %conversion.from_currency,
            to   = %conversion.to_currency,
            rate,
            "currency converted"
        );
        Ok(conversion)
    }
}

#[async_trait]
impl Tool for CurrencyConverterTool {
    fn name(&self) -> &str { "currency_converter" }

    fn description(&self) -> &str {
        "Converts an amount from one currency to another using live exchange rates."
    }

    fn input_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "amount":        { "type": "number", "description": "Amount to convert" },
                "from_currency": { "type": "string", "description": "Source currency code, e.g. USD" },
                "to_currency":   { "type": "string", "description": "Target currency code, e.g. EUR" }
            },
            "required": ["amount", "from_currency", "to_currency"]
        })
    }

    async fn execute(&self, args: &HashMap<String, Value>) -> Result<String, String> {
        let object: serde_json::Map<String, Value> =
            args.iter().map(|(k, v)| (k.clone(), v.clone())).collect();
        let request: ConversionRequest = serde_json::from_value(Value::Object(object))
            .map_err(|e| ConversionError::InvalidInput(e.to_string()).to_string())?;

        self.convert(&request)
            .await
            .map(|c| c.to_string())
            .map_err(|e| e.to_string())
    }
}
