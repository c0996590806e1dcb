use axum::routing::{get, post};
use axum::Router;

use crate::services::openweather::OpenWeatherClient;

pub mod dashboard;
pub mod health;
pub mod lookup;
pub mod tools;

/// Shared application state for all endpoints.
#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) client: OpenWeatherClient,
}

/// All `/api/v1` routes, with state applied.
pub(crate) fn api_router(state: AppState) -> Router {
    Router::new()
        .route("/api/v1/health", get(health::health_check))
        .route("/api/v1/geocode", get(lookup::get_geocode))
        .route("/api/v1/air-quality", get(lookup::get_air_quality))
        .route("/api/v1/forecast", get(lookup::get_forecast))
        .route("/api/v1/tools", get(tools::list_tools))
        .route("/api/v1/tools/call", post(tools::call_tool))
        .route("/api/v1/report", get(dashboard::get_report))
        .route("/api/v1/dashboard", get(dashboard::get_dashboard))
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::openweather::tests::{air_pollution_body, client_for, forecast_body};
    use axum::body::{to_bytes, Body};
    use axum::http::{Request, StatusCode};
    use serde_json::{json, Value};
    use std::time::Duration;
    use tower::ServiceExt;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    async fn send(app: Router, request: Request<Body>) -> (StatusCode, String) {
        let response = app.oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, String::from_utf8(bytes.to_vec()).unwrap())
    }

    async fn get(app: Router, uri: &str) -> (StatusCode, String) {
        send(app, Request::get(uri).body(Body::empty()).unwrap()).await
    }

    async fn post_json(app: Router, uri: &str, body: &str) -> (StatusCode, String) {
        let request = Request::post(uri)
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap();
        send(app, request).await
    }

    async fn mocked_upstream() -> MockServer {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/geo/1.0/direct"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([
                { "name": "Tehran", "lat": 35.6892, "lon": 51.389, "country": "IR" }
            ])))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/data/2.5/air_pollution"))
            .respond_with(ResponseTemplate::new(200).set_body_json(air_pollution_body(25.0, 43.2)))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/data/2.5/forecast"))
            .respond_with(ResponseTemplate::new(200).set_body_json(forecast_body(40)))
            .mount(&server)
            .await;
        server
    }

    fn app_for(server: &MockServer) -> Router {
        api_router(AppState {
            client: client_for(server),
        })
    }

    fn app_without_key(server: &MockServer) -> Router {
        let client = OpenWeatherClient::new(&server.uri(), None, Duration::from_secs(5)).unwrap();
        api_router(AppState { client })
    }

    #[tokio::test]
    async fn test_health_reports_missing_credential() {
        let server = MockServer::start().await;
        let (status, body) = get(app_without_key(&server), "/api/v1/health").await;
        assert_eq!(status, StatusCode::OK);
        let json: Value = serde_json::from_str(&body).unwrap();
        assert_eq!(json["status"], "degraded");
        assert_eq!(json["credential_configured"], false);
    }

    #[tokio::test]
    async fn test_geocode_endpoint() {
        let server = mocked_upstream().await;
        let (status, body) = get(app_for(&server), "/api/v1/geocode?city=Tehran").await;
        assert_eq!(status, StatusCode::OK);
        let json: Value = serde_json::from_str(&body).unwrap();
        assert_eq!(json["city"], "Tehran");
        assert_eq!(json["latitude"], 35.6892);
    }

    #[tokio::test]
    async fn test_geocode_missing_key_is_503() {
        let server = MockServer::start().await;
        let (status, body) = get(app_without_key(&server), "/api/v1/geocode?city=Tehran").await;
        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
        assert!(body.contains("OPENWEATHER_KEY"));
    }

    #[tokio::test]
    async fn test_air_quality_endpoint() {
        let server = mocked_upstream().await;
        let (status, body) =
            get(app_for(&server), "/api/v1/air-quality?lat=35.6892&lon=51.389").await;
        assert_eq!(status, StatusCode::OK);
        let json: Value = serde_json::from_str(&body).unwrap();
        assert_eq!(json["us_aqi"], 78);
        assert_eq!(json["aqi_pm25"], 78);
        assert_eq!(json["aqi_pm10"], 40);
        assert_eq!(json["category"], "moderate");
        assert_eq!(json["components"]["o3"], 60.2);
    }

    #[tokio::test]
    async fn test_air_quality_rejects_bad_latitude() {
        let server = MockServer::start().await;
        let (status, _) = get(app_for(&server), "/api/v1/air-quality?lat=123&lon=0").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_forecast_endpoint() {
        let server = mocked_upstream().await;
        let (status, body) =
            get(app_for(&server), "/api/v1/forecast?lat=35.6892&lon=51.389").await;
        assert_eq!(status, StatusCode::OK);
        let json: Value = serde_json::from_str(&body).unwrap();
        assert_eq!(json["forecast"].as_array().unwrap().len(), 5);
    }

    #[tokio::test]
    async fn test_tool_call_success() {
        let server = mocked_upstream().await;
        let (status, body) = post_json(
            app_for(&server),
            "/api/v1/tools/call",
            r#"{"name":"get_air_quality","arguments":{"lat":35.6892,"lon":51.389}}"#,
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        let json: Value = serde_json::from_str(&body).unwrap();
        assert_eq!(json["us_aqi"], 78);
    }

    #[tokio::test]
    async fn test_tool_call_errors_are_objects() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/geo/1.0/direct"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
            .mount(&server)
            .await;

        let (status, body) = post_json(
            app_for(&server),
            "/api/v1/tools/call",
            r#"{"name":"geocode_city","arguments":{"city":"Atlantis"}}"#,
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        let json: Value = serde_json::from_str(&body).unwrap();
        assert_eq!(json["error"], "Not found: City 'Atlantis' not found.");
    }

    #[tokio::test]
    async fn test_tool_call_malformed_body_is_error_object() {
        let server = MockServer::start().await;
        let (status, body) = post_json(app_for(&server), "/api/v1/tools/call", "not json").await;
        assert_eq!(status, StatusCode::OK);
        let json: Value = serde_json::from_str(&body).unwrap();
        assert!(json["error"].as_str().unwrap().starts_with("Bad request:"));
    }

    #[tokio::test]
    async fn test_tool_call_unknown_tool_is_error_object() {
        let server = MockServer::start().await;
        let (status, body) = post_json(
            app_for(&server),
            "/api/v1/tools/call",
            r#"{"name":"launch_rocket","arguments":{}}"#,
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        let json: Value = serde_json::from_str(&body).unwrap();
        assert!(json["error"]
            .as_str()
            .unwrap()
            .starts_with("Bad request: Invalid tool call"));
    }

    #[tokio::test]
    async fn test_tool_call_without_credential_is_error_object() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&server)
            .await;

        let (status, body) = post_json(
            app_without_key(&server),
            "/api/v1/tools/call",
            r#"{"name":"geocode_city","arguments":{"city":"Tehran"}}"#,
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        let json: Value = serde_json::from_str(&body).unwrap();
        assert!(json["error"]
            .as_str()
            .unwrap()
            .starts_with("Missing credential:"));
    }

    #[tokio::test]
    async fn test_air_quality_negative_concentration_is_422() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/data/2.5/air_pollution"))
            .respond_with(ResponseTemplate::new(200).set_body_json(air_pollution_body(-1.0, 20.0)))
            .mount(&server)
            .await;

        let (status, body) =
            get(app_for(&server), "/api/v1/air-quality?lat=35.6892&lon=51.389").await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        let json: Value = serde_json::from_str(&body).unwrap();
        assert!(json["error"].is_string());
    }

    #[tokio::test]
    async fn test_tool_manifest() {
        let server = MockServer::start().await;
        let (status, body) = get(app_for(&server), "/api/v1/tools").await;
        assert_eq!(status, StatusCode::OK);
        let json: Value = serde_json::from_str(&body).unwrap();
        assert_eq!(json["agent"], "air_quality_agent");
        assert_eq!(json["tools"].as_array().unwrap().len(), 3);
    }

    #[tokio::test]
    async fn test_report_endpoint() {
        let server = mocked_upstream().await;
        let (status, body) = get(app_for(&server), "/api/v1/report?city=Tehran").await;
        assert_eq!(status, StatusCode::OK);
        assert!(body.contains("City: Tehran"));
        assert!(body.contains("Category: Moderate"));
        assert!(body.contains("=== 5-DAY WEATHER OUTLOOK ==="));
    }

    #[tokio::test]
    async fn test_report_unknown_city_is_prefixed_text() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/geo/1.0/direct"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
            .mount(&server)
            .await;

        let (status, body) = get(app_for(&server), "/api/v1/report?city=Atlantis").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert!(body.starts_with("Report unavailable: Not found: City 'Atlantis' not found."));
    }

    #[tokio::test]
    async fn test_dashboard_unknown_city_keeps_prefix() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/geo/1.0/direct"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
            .mount(&server)
            .await;

        let (status, body) = get(app_for(&server), "/api/v1/dashboard?city=Atlantis").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        let json: Value = serde_json::from_str(&body).unwrap();
        assert_eq!(json["error"], "Not found: City 'Atlantis' not found.");
    }

    #[tokio::test]
    async fn test_dashboard_endpoint() {
        let server = mocked_upstream().await;
        let (status, body) = get(app_for(&server), "/api/v1/dashboard?city=Tehran").await;
        assert_eq!(status, StatusCode::OK);
        let json: Value = serde_json::from_str(&body).unwrap();
        assert_eq!(json["gauge"]["max"], 500);
        assert_eq!(json["gauge"]["value"], 78);
        assert_eq!(json["pollutants"].as_array().unwrap().len(), 8);
        assert_eq!(json["location"]["country"], "IR");
    }
}
