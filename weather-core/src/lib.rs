//! Core library for the `weather` CLI.
//!
//! This crate defines:
//! - Configuration (provider URL, API key, default city)
//! - The `WeatherClient` abstraction and its weatherapi.com implementation
//! - The observable request controller (`Unset` / `Loading` / `Success` / `Error`)
//!
//! It is used by `weather-cli`, but any front end can drive the controller and
//! render whatever state it publishes.

pub mod config;
pub mod controller;
pub mod error;
pub mod model;
pub mod provider;

pub use config::Config;
pub use controller::{CompletionOrder, ControllerSettings, RequestState, WeatherRequestController};
pub use error::FetchError;
pub use model::{Condition, Current, Location, WeatherModel, WeatherQuery};
pub use provider::{WeatherClient, client_from_config, weatherapi::WeatherApiClient};
pub use serde_json::Number;
