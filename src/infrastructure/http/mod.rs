use axum::{
    middleware,
    response::{IntoResponse, Response},
    routing::{get, post},
    Router,
};
use std::any::Any;
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_http::{catch_panic::CatchPanicLayer, trace::TraceLayer};

use crate::{
    controllers::{
        catalog,
        health::{self, HealthState},
        stats::StatsController,
        tts::TtsController,
    },
    error::AppError,
    infrastructure::config::Config,
};

pub mod request_id;

pub use request_id::{request_id_middleware, X_REQUEST_ID};

fn handle_panic(err: Box<dyn Any + Send + 'static>) -> Response {
    let detail = if let Some(s) = err.downcast_ref::<String>() {
        s.clone()
    } else if let Some(s) = err.downcast_ref::<&str>() {
        s.to_string()
    } else {
        "unknown panic".to_string()
    };

    AppError::Internal(format!("handler panicked: {}", detail)).into_response()
}

/// Build the application router with all routes and layers
pub fn create_router(tts_controller: Arc<TtsController>, stats_controller: Arc<StatsController>) -> Router {
    let health_state = HealthState {
        tts: tts_controller.clone(),
        stats: stats_controller.clone(),
    };

    let health_routes = Router::new()
        .route("/health", get(health::health))
        .route("/health/ready", get(health::health_ready))
        .with_state(health_state);

    let tts_routes = Router::new()
        .route("/convert", post(TtsController::convert))
        .route("/preview-voice", post(TtsController::preview))
        .with_state(tts_controller);

    let stats_routes = Router::new()
        .route("/stats", get(StatsController::get_stats))
        .with_state(stats_controller);

    let catalog_routes = Router::new()
        .route("/api/languages", get(catalog::languages))
        .route("/api/voice-types", get(catalog::voice_types));

    Router::new()
        .merge(health_routes)
        .merge(tts_routes)
        .merge(stats_routes)
        .merge(catalog_routes)
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(middleware::from_fn(request_id_middleware))
                .layer(CatchPanicLayer::custom(handle_panic)),
        )
}

/// Start the HTTP server
pub async fn start_http_server(config: Arc<Config>, app: Router) -> Result<(), Box<dyn std::error::Error>> {
    let listener =
        tokio::net::TcpListener::bind(format!("{}:{}", config.host, config.port)).await?;

    tracing::info!("Server listening on {}", listener.local_addr()?);

    axum::serve(listener, app).await?;

    Ok(())
}
