//! Agent tool surface.
//!
//! An external LLM agent runtime reads the manifest, then invokes tools by
//! name. A tool call always answers HTTP 200 with either the tool's result
//! or an `{ "error": ... }` object, so the agent can relay failures to the
//! user instead of handling transport errors.
//!
//! - GET  /api/v1/tools
//! - POST /api/v1/tools/call   body: { "name": "...", "arguments": { ... } }

use axum::body::Bytes;
use axum::extract::State;
use axum::Json;
use serde::{Deserialize, Serialize};
use serde_json::json;
use utoipa::ToSchema;

use crate::errors::{AppError, ErrorResponse};
use crate::routes::AppState;
use crate::services::conditions;
use crate::services::openweather::OpenWeatherClient;

const AGENT_NAME: &str = "air_quality_agent";
const AGENT_DESCRIPTION: &str = "Gets air quality and weather forecast.";
const AGENT_INSTRUCTION: &str = "You MUST ALWAYS use the tools.\n\
    1) geocode_city\n\
    2) get_air_quality\n\
    3) get_weather_forecast\n\
    Provide formatted report.\n";

/// A tool invocation as sent by the agent runtime.
#[derive(Debug, Deserialize)]
#[serde(tag = "name", content = "arguments", rename_all = "snake_case")]
pub enum ToolCall {
    GeocodeCity { city: String },
    GetAirQuality { lat: f64, lon: f64 },
    GetWeatherForecast { lat: f64, lon: f64 },
}

/// Tool result: the plain value on success, `{ "error": msg }` on failure.
#[derive(Debug, Serialize)]
#[serde(untagged)]
pub enum ToolOutcome {
    Success(serde_json::Value),
    Failure(ErrorResponse),
}

impl ToolOutcome {
    fn from_result<T: Serialize>(result: Result<T, AppError>) -> Self {
        let value = result.and_then(|v| {
            serde_json::to_value(v)
                .map_err(|e| AppError::InternalError(format!("Tool result encoding: {}", e)))
        });
        match value {
            Ok(v) => ToolOutcome::Success(v),
            Err(e) => {
                tracing::info!("Tool call failed: {}", e);
                ToolOutcome::Failure(ErrorResponse {
                    error: e.to_string(),
                })
            }
        }
    }
}

/// Description of one callable tool.
#[derive(Debug, Serialize, ToSchema)]
pub struct ToolDescriptor {
    pub name: String,
    pub description: String,
    /// JSON Schema of the `arguments` object
    #[schema(value_type = Object)]
    pub parameters: serde_json::Value,
}

/// What an agent runtime needs to register this service's tools.
#[derive(Debug, Serialize, ToSchema)]
pub struct ToolManifest {
    pub agent: String,
    pub description: String,
    /// System instruction for the agent
    pub instruction: String,
    pub tools: Vec<ToolDescriptor>,
}

fn coordinates_schema() -> serde_json::Value {
    json!({
        "type": "object",
        "properties": {
            "lat": { "type": "number", "minimum": -90, "maximum": 90 },
            "lon": { "type": "number", "minimum": -180, "maximum": 180 }
        },
        "required": ["lat", "lon"]
    })
}

pub fn manifest() -> ToolManifest {
    ToolManifest {
        agent: AGENT_NAME.to_string(),
        description: AGENT_DESCRIPTION.to_string(),
        instruction: AGENT_INSTRUCTION.to_string(),
        tools: vec![
            ToolDescriptor {
                name: "geocode_city".to_string(),
                description: "Resolve a city name to latitude and longitude.".to_string(),
                parameters: json!({
                    "type": "object",
                    "properties": { "city": { "type": "string" } },
                    "required": ["city"]
                }),
            },
            ToolDescriptor {
                name: "get_air_quality".to_string(),
                description: "Current US AQI, PM2.5/PM10 sub-indices and pollutant \
                    concentrations at a location."
                    .to_string(),
                parameters: coordinates_schema(),
            },
            ToolDescriptor {
                name: "get_weather_forecast".to_string(),
                description: "One weather reading per day for the next five days."
                    .to_string(),
                parameters: coordinates_schema(),
            },
        ],
    }
}

pub async fn dispatch(client: &OpenWeatherClient, call: ToolCall) -> ToolOutcome {
    tracing::debug!("Dispatching tool call {:?}", call);
    match call {
        ToolCall::GeocodeCity { city } => {
            ToolOutcome::from_result(conditions::geocode_city(client, &city).await)
        }
        ToolCall::GetAirQuality { lat, lon } => {
            ToolOutcome::from_result(conditions::air_quality(client, lat, lon).await)
        }
        ToolCall::GetWeatherForecast { lat, lon } => {
            ToolOutcome::from_result(conditions::weather_forecast(client, lat, lon).await)
        }
    }
}

/// List the tools this service exposes to an agent runtime.
#[utoipa::path(
    get,
    path = "/api/v1/tools",
    tag = "Agent tools",
    responses(
        (status = 200, description = "Tool manifest", body = ToolManifest),
    )
)]
pub async fn list_tools() -> Json<ToolManifest> {
    Json(manifest())
}

/// Invoke a tool by name.
///
/// Always returns 200. Unknown tools, malformed arguments and upstream
/// failures are reported as `{ "error": "..." }`.
#[utoipa::path(
    post,
    path = "/api/v1/tools/call",
    tag = "Agent tools",
    request_body(content = String, content_type = "application/json",
        description = "{\"name\": \"get_air_quality\", \"arguments\": {\"lat\": 35.69, \"lon\": 51.39}}"),
    responses(
        (status = 200, description = "Tool result, or an object with an `error` field"),
    )
)]
pub async fn call_tool(State(state): State<AppState>, body: Bytes) -> Json<ToolOutcome> {
    let outcome = match serde_json::from_slice::<ToolCall>(&body) {
        Ok(call) => dispatch(&state.client, call).await,
        Err(e) => ToolOutcome::from_result::<()>(Err(AppError::BadRequest(format!(
            "Invalid tool call: {}",
            e
        )))),
    };
    Json(outcome)
}
