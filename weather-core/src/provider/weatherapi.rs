use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use std::error::Error as _;
use tracing::{debug, info, warn};

use crate::{FetchError, WeatherModel};

use super::WeatherClient;

/// Client for weatherapi.com's `current.json` endpoint.
#[derive(Debug, Clone)]
pub struct WeatherApiClient {
    base_url: String,
    http: Client,
}

impl WeatherApiClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_http(base_url, Client::new())
    }

    /// Use a preconfigured `reqwest::Client` (proxies, custom timeouts, ...).
    pub fn with_http(base_url: impl Into<String>, http: Client) -> Self {
        Self { base_url: base_url.into(), http }
    }

    fn current_url(&self) -> String {
        format!("{}/current.json", self.base_url.trim_end_matches('/'))
    }
}

#[async_trait]
impl WeatherClient for WeatherApiClient {
    async fn fetch_weather(&self, api_key: &str, city: &str) -> Result<WeatherModel, FetchError> {
        let url = self.current_url();
        debug!(%url, city, "sending current weather request");

        let res = self
            .http
            .get(&url)
            .query(&[("key", api_key), ("q", city)])
            .send()
            .await
            .map_err(transport_error)?;

        let status = res.status();
        let body = res.text().await.map_err(transport_error)?;

        if !status.is_success() {
            let message = provider_message(status, &body);
            warn!(status = status.as_u16(), %message, city, "weather provider rejected request");
            return Err(FetchError::HttpStatus { status: status.as_u16(), message });
        }

        let model = parse_body(&body)?;
        info!(city, location = %model.location.name, "received current weather");
        Ok(model)
    }
}

#[derive(Debug, Deserialize)]
struct WaErrorEnvelope {
    error: WaError,
}

#[derive(Debug, Deserialize)]
struct WaError {
    message: String,
}

/// Decode a success body. Empty or `null` means no payload; anything else
/// that fails to decode is a transport-level fault.
fn parse_body(body: &str) -> Result<WeatherModel, FetchError> {
    if body.trim().is_empty() {
        return Err(FetchError::EmptyBody);
    }

    match serde_json::from_str::<Option<WeatherModel>>(body) {
        Ok(Some(model)) => Ok(model),
        Ok(None) => Err(FetchError::EmptyBody),
        Err(err) => Err(FetchError::Transport(format!("Failed to parse weather response: {err}"))),
    }
}

/// Best human-readable reason for a non-success response.
fn provider_message(status: StatusCode, body: &str) -> String {
    if let Ok(envelope) = serde_json::from_str::<WaErrorEnvelope>(body) {
        return envelope.error.message;
    }

    match status.canonical_reason() {
        Some(reason) => reason.to_string(),
        None => truncate_body(body),
    }
}

/// The request URL carries the API key, so it is stripped before the
/// error is turned into text.
fn transport_error(err: reqwest::Error) -> FetchError {
    let err = err.without_url();
    let mut message = err.to_string();

    let mut source = err.source();
    while let Some(cause) = source {
        message.push_str(": ");
        message.push_str(&cause.to_string());
        source = cause.source();
    }

    FetchError::Transport(message)
}

fn truncate_body(body: &str) -> String {
    const MAX: usize = 200;
    if body.chars().count() > MAX {
        format!("{}...", body.chars().take(MAX).collect::<String>())
    } else {
        body.to_string()
    }
}
