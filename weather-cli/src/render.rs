use chrono::NaiveDateTime;
use weather_core::{RequestState, WeatherModel};

/// Provider local time format, e.g. "2024-10-01 14:30".
const PROVIDER_LOCALTIME: &str = "%Y-%m-%d %H:%M";

/// Human-readable text for whatever the controller currently holds.
pub fn render(state: &RequestState) -> String {
    match state {
        RequestState::Unset => "Enter a city name to search.".to_string(),
        RequestState::Loading => "Loading...".to_string(),
        RequestState::Error(message) => {
            format!("Something went wrong: {message}\nSearch again (empty = default city) to retry.")
        }
        RequestState::Success(model) => render_weather(model),
    }
}

fn render_weather(model: &WeatherModel) -> String {
    let location = &model.location;
    let current = &model.current;

    let mut out = format!("{}, {}\n", location.name, location.country);
    out.push_str(&format!("  {}°  {}\n", current.temp_c, current.condition.text));
    if let Some(icon) = current.condition.large_icon_url() {
        out.push_str(&format!("  Icon:          {icon}\n"));
    }
    out.push_str(&format!("  Humidity:      {}\n", current.humidity));
    out.push_str(&format!("  Wind speed:    {} km/h\n", current.wind_kph));
    out.push_str(&format!("  UV:            {}\n", current.uv));
    out.push_str(&format!("  Precipitation: {} mm\n", current.precip_mm));
    out.push_str(&format!("  Local time:    {}", local_time(&location.localtime)));
    out
}

fn local_time(raw: &str) -> String {
    NaiveDateTime::parse_from_str(raw, PROVIDER_LOCALTIME)
        .map(|t| t.format("%a %d %b %Y, %H:%M").to_string())
        .unwrap_or_else(|_| raw.to_string())
}
