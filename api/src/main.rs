// Air Quality API v0.1
use std::net::SocketAddr;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

mod config;
mod errors;
mod models;
mod routes;
mod services;

use config::{AppConfig, LogFormat};
use routes::AppState;
use services::openweather::OpenWeatherClient;

/// OpenAPI document for the Air Quality API.
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Air Quality API",
        version = "0.1.0",
        description = "Geocoding, US EPA Air Quality Index and daily weather forecasts \
            backed by OpenWeatherMap. Exposes plain REST lookups, an agent tool surface \
            for LLM agent runtimes, and text/chart data for a dashboard.",
        license(name = "MIT"),
    ),
    tags(
        (name = "Health", description = "Service health check"),
        (name = "Lookup", description = "Geocoding, air quality and forecast lookups"),
        (name = "Agent tools", description = "Tool manifest and dispatcher for LLM agents"),
        (name = "Dashboard", description = "Text report and chart-ready series"),
    ),
    paths(
        routes::health::health_check,
        routes::lookup::get_geocode,
        routes::lookup::get_air_quality,
        routes::lookup::get_forecast,
        routes::tools::list_tools,
        routes::tools::call_tool,
        routes::dashboard::get_report,
        routes::dashboard::get_dashboard,
    ),
    components(
        schemas(
            routes::health::HealthResponse,
            models::Location,
            models::PollutantReading,
            models::AqiCategory,
            models::AqiResult,
            models::ForecastDay,
            models::Forecast,
            routes::tools::ToolDescriptor,
            routes::tools::ToolManifest,
            services::report::GaugeBand,
            services::report::GaugeSeries,
            services::report::PollutantBar,
            services::report::DashboardResponse,
            errors::ErrorResponse,
        )
    )
)]
struct ApiDoc;

#[tokio::main]
async fn main() {
    // A missing .env is fine; the environment may already carry everything.
    let dotenv_loaded = dotenvy::dotenv().is_ok();

    let config = AppConfig::from_env();

    // Initialize tracing
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "air_quality_api=debug,tower_http=debug".into());
    match config.log_format {
        LogFormat::Json => tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().json())
            .init(),
        LogFormat::Text => tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer())
            .init(),
    }

    if dotenv_loaded {
        tracing::debug!("Loaded configuration from .env");
    }
    if config.openweather_key.is_none() {
        tracing::warn!(
            "OPENWEATHER_KEY is not set; lookups will answer with a missing-credential error"
        );
    }

    // Create OpenWeatherMap client
    let client = OpenWeatherClient::from_config(&config).expect("Failed to build HTTP client");
    tracing::info!("Using OpenWeatherMap at {}", config.openweather_base_url);

    // CORS: the dashboard front end may be served from another origin
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([axum::http::Method::GET, axum::http::Method::POST])
        .allow_headers(Any);

    let app = routes::api_router(AppState { client })
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .layer(TraceLayer::new_for_http())
        .layer(cors);

    // Start server
    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    tracing::info!("API server listening on {}", addr);
    tracing::info!(
        "Swagger UI available at http://localhost:{}/swagger-ui/",
        config.port
    );

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("Failed to bind TCP listener");
    axum::serve(listener, app)
        .await
        .expect("Server terminated unexpectedly");
}
