//! REST API server for credit card validation.
//!
//! # Usage
//!
//! ```bash
//! # Start server on the default port (8000)
//! cardvalidate-server
//!
//! # Custom port and rule file
//! cardvalidate-server --port 8080 --rules issuers.json
//! ```
//!
//! # Swagger UI
//!
//! Visit http://localhost:8000/swagger-ui/ for interactive API documentation.

use std::future::IntoFuture;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use axum::{
    body::{Body, Bytes},
    extract::{Query, State},
    http::{header, Method, Request, StatusCode},
    response::{IntoResponse, Json, Response},
    routing::{get, post},
    Router,
};
use clap::Parser;
use serde::{Deserialize, Serialize};
use tokio::sync::oneshot;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing::Span;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use utoipa::{IntoParams, OpenApi, ToSchema};
use utoipa_swagger_ui::SwaggerUi;
use zeroize::{Zeroize, ZeroizeOnDrop};

use cardvalidate::{
    mask::mask_number, rules_json::RulesLoader, IssuerTable, ValidationError, Validator,
};

// ============================================================================
// Configuration
// ============================================================================

#[derive(Parser, Debug)]
#[command(name = "cardvalidate-server")]
#[command(author, version, about = "Credit card validation REST API")]
struct Config {
    /// Port to listen on
    #[arg(short, long, env = "CARDVALIDATE_PORT", default_value_t = 8000)]
    port: u16,

    /// JSON rule file replacing the built-in issuer table
    #[arg(long, env = "CARDVALIDATE_RULES")]
    rules: Option<PathBuf>,

    /// Seconds to wait for in-flight requests on shutdown
    #[arg(long, env = "CARDVALIDATE_SHUTDOWN_TIMEOUT", default_value_t = 3)]
    shutdown_timeout: u64,
}

// ============================================================================
// OpenAPI Documentation
// ============================================================================

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Credit Card Validation API",
        version = "0.1.0",
        description = "Validates card number structure, issuer (IIN), Luhn checksum and expiration date. No payment network lookup is performed.",
        license(name = "MIT")
    ),
    tags(
        (name = "Validation", description = "Card validation"),
        (name = "Identification", description = "Issuer identification from the IIN prefix"),
        (name = "System", description = "Health and status endpoints")
    ),
    paths(validate_card, identify_issuer, health),
    components(schemas(
        ValidationRequest,
        ValidationResponse,
        ApiError,
        IdentifyResponse,
        LengthRange,
        HealthResponse,
    ))
)]
struct ApiDoc;

// ============================================================================
// Request/Response Types
// ============================================================================

/// Error code for requests that never reach the validator.
const GENERAL_ERROR: u8 = 0;

#[derive(Deserialize, ToSchema, Zeroize, ZeroizeOnDrop)]
#[schema(example = json!({"number": "4111111111111111", "exp_date": "12/2030"}))]
struct ValidationRequest {
    /// Card number, 8-19 ASCII digits without separators
    number: String,
    /// Expiration date as MM/YYYY
    exp_date: String,
}

#[derive(Serialize, Deserialize, ToSchema)]
#[schema(example = json!({"valid": false, "error": {"code": 5, "message": "Credit card has expired"}}))]
struct ValidationResponse {
    /// Whether the card passed every check
    valid: bool,
    /// Present when validation failed
    #[serde(default, skip_serializing_if = "Option::is_none")]
    error: Option<ApiError>,
}

#[derive(Serialize, Deserialize, ToSchema)]
struct ApiError {
    /// 0 = bad request, 1 = malformed number, 2 = unknown IIN,
    /// 3 = invalid account number, 4 = malformed date, 5 = expired
    code: u8,
    /// Human-readable message
    message: String,
}

#[derive(Deserialize, IntoParams)]
struct IdentifyQuery {
    /// Card number or IIN prefix (digits only)
    number: String,
}

#[derive(Serialize, Deserialize, ToSchema)]
struct IdentifyResponse {
    /// Issuer name, "Unknown" when no prefix matches
    issuer: String,
    /// Valid card number lengths for the issuer
    #[serde(default, skip_serializing_if = "Option::is_none")]
    length: Option<LengthRange>,
}

#[derive(Serialize, Deserialize, ToSchema)]
struct LengthRange {
    min: u64,
    max: u64,
}

#[derive(Serialize, ToSchema)]
struct HealthResponse {
    /// Service status
    status: String,
    /// API version
    version: String,
    /// Number of registered IIN prefixes
    prefixes: usize,
}

impl ValidationResponse {
    fn failure(code: u8, message: &str) -> Self {
        Self {
            valid: false,
            error: Some(ApiError {
                code,
                message: message.to_string(),
            }),
        }
    }
}

type AppState = Arc<Validator>;

// ============================================================================
// Handlers
// ============================================================================

/// Validate a card number and expiration date
#[utoipa::path(
    post,
    path = "/validate",
    request_body = ValidationRequest,
    responses(
        (status = 200, description = "Card is valid", body = ValidationResponse),
        (status = 400, description = "Request body is not valid JSON", body = ValidationResponse),
        (status = 422, description = "Card failed validation", body = ValidationResponse)
    ),
    tag = "Validation"
)]
async fn validate_card(State(validator): State<AppState>, body: Bytes) -> Response {
    let req: ValidationRequest = match serde_json::from_slice(&body) {
        Ok(req) => req,
        Err(e) => {
            tracing::debug!(error = %e, "rejecting undecodable request");
            return (
                StatusCode::BAD_REQUEST,
                Json(ValidationResponse::failure(GENERAL_ERROR, "Invalid JSON request")),
            )
                .into_response();
        }
    };

    match validator.validate(&req.number, &req.exp_date) {
        Ok(issuer) => {
            tracing::debug!(card = %mask_number(&req.number), %issuer, "card valid");
            (
                StatusCode::OK,
                Json(ValidationResponse {
                    valid: true,
                    error: None,
                }),
            )
                .into_response()
        }
        Err(e) => {
            tracing::debug!(card = %mask_number(&req.number), code = e.code(), "card rejected: {}", e);
            validation_failure(e)
        }
    }
}

fn validation_failure(e: ValidationError) -> Response {
    (
        StatusCode::UNPROCESSABLE_ENTITY,
        Json(ValidationResponse::failure(e.code(), e.message())),
    )
        .into_response()
}

/// Identify the card issuer
#[utoipa::path(
    get,
    path = "/identify",
    params(IdentifyQuery),
    responses(
        (status = 200, description = "Identified issuer", body = IdentifyResponse)
    ),
    tag = "Identification"
)]
async fn identify_issuer(
    State(validator): State<AppState>,
    Query(mut query): Query<IdentifyQuery>,
) -> Json<IdentifyResponse> {
    let (issuer, length) = validator.identify(&query.number);
    query.number.zeroize();

    Json(IdentifyResponse {
        issuer: issuer.name().to_string(),
        length: issuer.is_known().then_some(LengthRange {
            min: length.start,
            max: length.end,
        }),
    })
}

/// Health check
#[utoipa::path(
    get,
    path = "/health",
    responses(
        (status = 200, description = "Service is healthy", body = HealthResponse)
    ),
    tag = "System"
)]
async fn health(State(validator): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        prefixes: validator.table().len(),
    })
}

// ============================================================================
// Setup
// ============================================================================

fn build_router(validator: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE, header::ACCEPT])
        .allow_origin(Any);

    Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .route("/validate", post(validate_card))
        .route("/identify", get(identify_issuer))
        .route("/health", get(health))
        .with_state(validator)
        .layer(cors)
        .layer(TraceLayer::new_for_http().make_span_with(request_span))
}

/// Span for one request. The query string is left out because
/// `/identify` carries the card number there.
fn request_span(req: &Request<Body>) -> Span {
    tracing::debug_span!("request", method = %req.method(), path = %req.uri().path())
}

fn load_table(config: &Config) -> Result<IssuerTable, Box<dyn std::error::Error>> {
    match &config.rules {
        Some(path) => {
            tracing::info!(path = %path.display(), "loading issuer rules");
            Ok(RulesLoader::load_table(path)?)
        }
        None => Ok(IssuerTable::default_table()?),
    }
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("failed to listen for ctrl-c: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!("failed to listen for SIGTERM: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutting down...");
}

// ============================================================================
// Main
// ============================================================================

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::parse();

    let table = load_table(&config).map_err(|e| {
        tracing::error!("{}", e);
        e
    })?;
    tracing::info!(prefixes = table.len(), "issuer table built");

    let app = build_router(Arc::new(Validator::new(table)));

    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!("Serving on http://{}", addr);
    tracing::info!("Swagger UI available at http://localhost:{}/swagger-ui/", config.port);

    let (stop_tx, stop_rx) = oneshot::channel::<()>();
    let mut server = tokio::spawn(
        axum::serve(listener, app)
            .with_graceful_shutdown(async move {
                let _ = stop_rx.await;
            })
            .into_future(),
    );

    tokio::select! {
        joined = &mut server => return Ok(joined??),
        _ = shutdown_signal() => {}
    }

    let _ = stop_tx.send(());
    let grace = Duration::from_secs(config.shutdown_timeout);
    match tokio::time::timeout(grace, server).await {
        Ok(joined) => joined??,
        Err(_) => tracing::warn!("in-flight requests still running after {:?}, exiting", grace),
    }

    Ok(())
}
