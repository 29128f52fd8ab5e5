//! HTTP API server implementation

use axum::{
    extract::{rejection::JsonRejection, Json, State},
    http::{HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    routing::post,
    Router,
};
use serde::Serialize;
use std::any::Any;
use std::sync::Arc;
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::cors::{AllowHeaders, AllowMethods, AllowOrigin, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::{error, info, warn};

use crate::core::config::ServerConfig;
use crate::core::dispatcher::Translator;
use crate::core::errors::TranslationError;
use crate::core::models::{TranslationRequest, TranslationResult};

/// Application state
#[derive(Clone, Debug)]
pub struct AppState {
    translator: Translator,
}

impl AppState {
    /// Wrap an already loaded translator
    pub fn new(translator: Translator) -> Self {
        Self { translator }
    }
}

/// Error response
#[derive(Serialize)]
pub struct ErrorResponse {
    /// Human-readable failure reason
    pub detail: String,
}

/// Failure of a `/translate` call
#[derive(Debug)]
pub enum ApiError {
    /// Body could not be read as a translation request
    Body(JsonRejection),
    /// Validation or dispatch failed
    Translation(TranslationError),
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::Body(rejection)
    }
}

impl From<TranslationError> for ApiError {
    fn from(err: TranslationError) -> Self {
        ApiError::Translation(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, detail) = match self {
            ApiError::Body(rejection) => (rejection.status(), rejection.body_text()),
            ApiError::Translation(err) if err.is_client_error() => {
                (StatusCode::BAD_REQUEST, err.to_string())
            }
            ApiError::Translation(err) => (StatusCode::INTERNAL_SERVER_ERROR, err.to_string()),
        };

        (status, Json(ErrorResponse { detail })).into_response()
    }
}

/// Translation handler
async fn translate(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<TranslationRequest>, JsonRejection>,
) -> Result<Json<TranslationResult>, ApiError> {
    let Json(request) = payload.map_err(|rejection| {
        warn!("Rejected request body: {}", rejection.body_text());
        rejection
    })?;

    request.validate()?;

    let translated_text = state
        .translator
        .translate(&request.text, &request.source_lang)
        .await?;

    Ok(Json(TranslationResult { translated_text }))
}

/// Cross-origin policy: one origin, with credentials, any method and header
pub fn cors_layer(allowed_origin: &str) -> Result<CorsLayer, TranslationError> {
    let origin = allowed_origin
        .parse::<HeaderValue>()
        .map_err(|e| TranslationError::ConfigError {
            message: format!("invalid allowed origin '{}': {}", allowed_origin, e),
        })?;

    Ok(CorsLayer::new()
        .allow_origin(AllowOrigin::list([origin]))
        .allow_credentials(true)
        .allow_methods(AllowMethods::mirror_request())
        .allow_headers(AllowHeaders::mirror_request()))
}

/// Turn a panic inside a handler into a 500 with the usual body
fn handle_panic(payload: Box<dyn Any + Send + 'static>) -> Response {
    let detail = if let Some(s) = payload.downcast_ref::<&str>() {
        s.to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "Internal server error".to_string()
    };
    error!("Handler panicked: {}", detail);

    (StatusCode::INTERNAL_SERVER_ERROR, Json(ErrorResponse { detail })).into_response()
}

/// Build the router serving `POST /translate`
pub fn router(state: AppState, allowed_origin: &str) -> Result<Router, TranslationError> {
    Ok(Router::new()
        .route("/translate", post(translate))
        .layer(CatchPanicLayer::custom(handle_panic))
        .layer(cors_layer(allowed_origin)?)
        .layer(TraceLayer::new_for_http())
        .with_state(Arc::new(state)))
}

/// Run the HTTP server
pub async fn run_server(config: ServerConfig) -> anyhow::Result<()> {
    // Providers must be fully loaded before the listener is bound.
    // `from_config` validates the configuration first.
    let load_config = config.clone();
    let translator =
        tokio::task::spawn_blocking(move || Translator::from_config(&load_config)).await??;
    info!("Providers ready: {:?}", translator);

    let app = router(AppState::new(translator), &config.allowed_origin)?;

    let addr = config.bind_addr();
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    info!("Starting server on {}", addr);
    info!("Allowing cross-origin requests from {}", config.allowed_origin);

    axum::serve(listener, app).await?;

    Ok(())
}
