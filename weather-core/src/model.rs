use serde::{Deserialize, Serialize};
use serde_json::Number;

/// Input to a fetch. An empty city means "use the configured default".
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WeatherQuery {
    pub city: String,
}

impl WeatherQuery {
    pub fn new(city: impl Into<String>) -> Self {
        Self { city: city.into() }
    }

    /// Resolve the city to fetch, falling back to `default_city` when empty.
    pub fn resolve<'a>(&'a self, default_city: &'a str) -> &'a str {
        if self.city.is_empty() { default_city } else { &self.city }
    }
}

/// Snapshot of a provider's `current.json` response.
///
/// Values are kept exactly as the provider sent them; nothing is converted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeatherModel {
    pub location: Location,
    pub current: Current,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Location {
    pub name: String,
    pub country: String,
    /// Provider local time, e.g. "2024-10-01 14:30".
    pub localtime: String,
}

/// Numbers are kept as the provider wrote them, so `7.0` still prints as `7.0`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Current {
    pub temp_c: Number,
    pub condition: Condition,
    pub humidity: Number,
    pub wind_kph: Number,
    pub uv: Number,
    pub precip_mm: Number,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Condition {
    pub text: String,
    /// Protocol-relative icon path, e.g. "//cdn.weatherapi.com/weather/64x64/day/116.png".
    pub icon: String,
}

impl Condition {
    /// Absolute URL of the large (128x128) variant of the condition icon.
    pub fn large_icon_url(&self) -> Option<String> {
        if self.icon.is_empty() {
            return None;
        }

        let absolute = if self.icon.starts_with("//") {
            format!("https:{}", self.icon)
        } else {
            self.icon.clone()
        };

        Some(absolute.replace("64x64", "128x128"))
    }
}
