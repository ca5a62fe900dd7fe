use crate::{Config, FetchError, WeatherModel, provider::weatherapi::WeatherApiClient};
use async_trait::async_trait;
use std::{fmt::Debug, sync::Arc};

pub mod weatherapi;

/// A source of current-weather snapshots.
///
/// One call is one outbound request: no retries, no caching.
#[async_trait]
pub trait WeatherClient: Send + Sync + Debug {
    async fn fetch_weather(&self, api_key: &str, city: &str) -> Result<WeatherModel, FetchError>;
}

/// Construct the weatherapi.com client described by `config`.
pub fn client_from_config(config: &Config) -> Arc<dyn WeatherClient> {
    Arc::new(WeatherApiClient::new(config.base_url.clone()))
}
