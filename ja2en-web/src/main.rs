use axum::{
    Form, Json, Router,
    body::to_bytes,
    extract::{FromRequest, Query, Request, State, rejection::QueryRejection},
    http::{StatusCode, header},
    routing::get,
};
use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize};
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::{debug, info, warn};

use ja2en::{Ja2En, MtError, RemoteEngine, ServerConfig};

/// Largest request body accepted by `POST /`
const BODY_LIMIT: usize = 2 * 1024 * 1024;

/// Fields are read from the query string, a JSON body or a form body.
/// Scalar JSON values (numbers, booleans) are accepted as their text.
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct TranslateRequest {
    #[serde(default, deserialize_with = "scalar_as_string")]
    pub content: Option<String>,
    /// Accepted for client compatibility; not used for translation
    #[serde(default, deserialize_with = "scalar_as_string")]
    pub message: Option<String>,
}

impl TranslateRequest {
    /// Fill fields missing from `self` with those of `fallback`
    fn or(self, fallback: TranslateRequest) -> TranslateRequest {
        TranslateRequest {
            content: self.content.or(fallback.content),
            message: self.message.or(fallback.message),
        }
    }
}

fn scalar_as_string<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<String>, D::Error> {
    match Option::<serde_json::Value>::deserialize(deserializer)? {
        None | Some(serde_json::Value::Null) => Ok(None),
        Some(serde_json::Value::String(s)) => Ok(Some(s)),
        Some(serde_json::Value::Number(n)) => Ok(Some(n.to_string())),
        Some(serde_json::Value::Bool(b)) => Ok(Some(b.to_string())),
        Some(other) => Err(D::Error::custom(format!(
            "expected a string, found {}",
            other
        ))),
    }
}

#[derive(Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

type ApiError = (StatusCode, Json<ErrorResponse>);

#[derive(Clone)]
pub struct AppState {
    pub ja2en: Ja2En,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let config = ServerConfig::from_env()?;
    let engine = RemoteEngine::from_env()
        .map_err(|e| format!("Failed to initialize translation engine: {}", e))?;
    info!("Engine: {:?}", engine);

    let ja2en = Ja2En::new(Arc::new(engine)).with_sentence_split(config.split_sentences);

    info!("Warming up translation engine");
    ja2en
        .warm_up()
        .await
        .map_err(|e| format!("Engine warm-up failed: {}", e))?;

    let app = app(AppState { ja2en });

    let listener = tokio::net::TcpListener::bind(config.bind_address()).await?;
    info!("🚀 Server running at http://{}", config.bind_address());

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server stopped");
    Ok(())
}

pub fn app(state: AppState) -> Router {
    Router::new()
        .route("/", get(translate_query).post(translate_body))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!("Failed to listen for Ctrl-C: {}", e);
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
                warn!("Failed to listen for SIGTERM: {}", e);
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

    info!("Shutdown signal received");
}

async fn translate_query(
    State(state): State<AppState>,
    query: Result<Query<TranslateRequest>, QueryRejection>,
) -> Result<Json<String>, ApiError> {
    let Query(request) =
        query.map_err(|e| error_response(StatusCode::BAD_REQUEST, e.body_text()))?;
    translate(&state, request).await
}

async fn translate_body(
    State(state): State<AppState>,
    query: Result<Query<TranslateRequest>, QueryRejection>,
    request: Request,
) -> Result<Json<String>, ApiError> {
    let Query(from_query) =
        query.map_err(|e| error_response(StatusCode::BAD_REQUEST, e.body_text()))?;
    let from_body = read_body(request).await?;

    // Body fields win over query fields
    translate(&state, from_body.or(from_query)).await
}

/// Parse a form-encoded or JSON body; an empty body yields no fields
async fn read_body(request: Request) -> Result<TranslateRequest, ApiError> {
    let is_form = request
        .headers()
        .get(header::CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .is_some_and(|value| value.starts_with("application/x-www-form-urlencoded"));

    if is_form {
        let Form(body) = Form::<TranslateRequest>::from_request(request, &())
            .await
            .map_err(|e| error_response(StatusCode::BAD_REQUEST, e.body_text()))?;
        return Ok(body);
    }

    let bytes = to_bytes(request.into_body(), BODY_LIMIT)
        .await
        .map_err(|e| error_response(StatusCode::BAD_REQUEST, format!("Failed to read body: {}", e)))?;

    if bytes.iter().all(u8::is_ascii_whitespace) {
        return Ok(TranslateRequest::default());
    }

    let Json(body) = Json::<TranslateRequest>::from_bytes(&bytes)
        .map_err(|e| error_response(StatusCode::BAD_REQUEST, e.body_text()))?;
    Ok(body)
}

async fn translate(state: &AppState, request: TranslateRequest) -> Result<Json<String>, ApiError> {
    let content = request.content.ok_or_else(|| {
        error_response(StatusCode::BAD_REQUEST, "content is required".to_string())
    })?;

    if let Some(message) = &request.message {
        debug!("Ignoring message field: {}", message);
    }

    match state.ja2en.translate_request(&content).await {
        Ok(translated) => Ok(Json(translated)),
        Err(e) => {
            warn!("Translation failed: {}", e);
            Err(error_response(status_for(&e), e.to_string()))
        }
    }
}

fn status_for(error: &MtError) -> StatusCode {
    if error.is_client_error() {
        return StatusCode::BAD_REQUEST;
    }

    match error {
        MtError::EngineError(_) | MtError::NetworkError(_) => StatusCode::BAD_GATEWAY,
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

fn error_response(status: StatusCode, error: String) -> ApiError {
    (status, Json(ErrorResponse { error }))
}
