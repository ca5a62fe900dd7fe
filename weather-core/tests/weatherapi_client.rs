use serde_json::json;
use std::time::Duration;
use weather_core::{
    Config, FetchError, RequestState, WeatherApiClient, WeatherClient, WeatherRequestController,
};
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn hanoi_payload() -> serde_json::Value {
    json!({
        "location": {
            "name": "Hanoi",
            "region": "",
            "country": "Vietnam",
            "lat": 21.03,
            "lon": 105.85,
            "tz_id": "Asia/Bangkok",
            "localtime_epoch": 1727767800,
            "localtime": "2024-10-01 14:30"
        },
        "current": {
            "last_updated": "2024-10-01 14:30",
            "temp_c": 31.2,
            "is_day": 1,
            "condition": {
                "text": "Partly cloudy",
                "icon": "//cdn.weatherapi.com/weather/64x64/day/116.png",
                "code": 1003
            },
            "wind_kph": 11.2,
            "precip_mm": 0.03,
            "humidity": 66,
            "uv": 7.0
        }
    })
}

fn client_for(server: &MockServer) -> WeatherApiClient {
    WeatherApiClient::new(format!("{}/v1", server.uri()))
}

#[tokio::test]
async fn sends_key_and_city_and_parses_response() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v1/current.json"))
        .and(query_param("key", "SECRET"))
        .and(query_param("q", "Hanoi"))
        .respond_with(ResponseTemplate::new(200).set_body_json(hanoi_payload()))
        .expect(1)
        .mount(&server)
        .await;

    let model = client_for(&server).fetch_weather("SECRET", "Hanoi").await.expect("weather");

    assert_eq!(model.location.name, "Hanoi");
    assert_eq!(model.location.country, "Vietnam");
    assert_eq!(model.current.temp_c.as_f64(), Some(31.2));
    assert_eq!(model.current.humidity.as_u64(), Some(66));
    assert_eq!(model.current.uv.to_string(), "7.0");
}

#[tokio::test]
async fn provider_error_becomes_http_status() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v1/current.json"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({
            "error": { "code": 2006, "message": "API key is invalid." }
        })))
        .mount(&server)
        .await;

    let err = client_for(&server).fetch_weather("WRONG", "Hanoi").await.unwrap_err();

    assert_eq!(
        err,
        FetchError::HttpStatus { status: 401, message: "API key is invalid.".to_string() }
    );
}

#[tokio::test]
async fn status_without_provider_body_uses_reason_phrase() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let err = client_for(&server).fetch_weather("KEY", "Hanoi").await.unwrap_err();

    assert_eq!(
        err,
        FetchError::HttpStatus { status: 503, message: "Service Unavailable".to_string() }
    );
}

#[tokio::test]
async fn empty_success_body_is_empty_body() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200))
        .mount(&server)
        .await;

    let err = client_for(&server).fetch_weather("KEY", "Hanoi").await.unwrap_err();
    assert_eq!(err, FetchError::EmptyBody);
}

#[tokio::test]
async fn malformed_success_body_is_transport_error() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_string("{\"location\": 42}"))
        .mount(&server)
        .await;

    let err = client_for(&server).fetch_weather("KEY", "Hanoi").await.unwrap_err();
    assert!(matches!(err, FetchError::Transport(_)), "unexpected error: {err:?}");
}

#[tokio::test]
async fn timeout_is_transport_error_without_api_key() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(hanoi_payload())
                .set_delay(Duration::from_millis(500)),
        )
        .mount(&server)
        .await;

    let http = reqwest::Client::builder()
        .timeout(Duration::from_millis(50))
        .build()
        .expect("client builds");
    let client = WeatherApiClient::with_http(format!("{}/v1", server.uri()), http);

    let err = client.fetch_weather("SECRET", "Hanoi").await.unwrap_err();

    match err {
        FetchError::Transport(message) => assert!(!message.contains("SECRET"), "{message}"),
        other => panic!("expected transport error, got {other:?}"),
    }
}

#[tokio::test]
async fn unreachable_provider_is_transport_error() {
    let client = WeatherApiClient::new("http://127.0.0.1:1/v1");

    let err = client.fetch_weather("SECRET", "Hanoi").await.unwrap_err();
    assert!(matches!(err, FetchError::Transport(_)), "unexpected error: {err:?}");
}

#[tokio::test]
async fn controller_from_config_reaches_success_for_default_city() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v1/current.json"))
        .and(query_param("q", "Hanoi"))
        .respond_with(ResponseTemplate::new(200).set_body_json(hanoi_payload()))
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/v1/current.json"))
        .and(query_param("q", "Atlantis"))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({
            "error": { "code": 1006, "message": "No matching location found." }
        })))
        .mount(&server)
        .await;

    let config = Config {
        base_url: format!("{}/v1", server.uri()),
        api_key: "KEY".to_string(),
        ..Config::default()
    };
    let controller = WeatherRequestController::from_config(&config);

    match controller.settled().await {
        RequestState::Success(model) => assert_eq!(model.location.name, "Hanoi"),
        other => panic!("expected success, got {other:?}"),
    }

    controller.request_city("Atlantis").await.expect("request task");
    assert_eq!(
        controller.state(),
        RequestState::Error("Failed to load data: No matching location found.".to_string())
    );
}
