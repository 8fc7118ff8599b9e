use crate::agent::VideoAgent;
use crate::cli::Args;
use crate::error::VideoChatError;
use crate::history::ConversationRequest;
use crate::models::api::{
    AskRequest,
    AskResponse,
    ErrorResponse,
    SummarizeRequest,
    SummaryQuery,
    SummaryResponse,
    VideoChatResponse,
};
use std::error::Error;
use std::net::SocketAddr;
use std::sync::Arc;
use axum::{
    routing::{ get, post },
    Json,
    Router,
    extract::{ rejection::{ JsonRejection, QueryRejection }, State, Query },
    response::{ IntoResponse, Response },
    http::{ HeaderValue, StatusCode },
};
use tower_http::cors::{ AllowOrigin, Any, CorsLayer };
use log::{ info, warn, error };
use uuid::Uuid;

#[derive(Clone)]
struct AppState {
    agent: Arc<VideoAgent>,
}

impl IntoResponse for VideoChatError {
    fn into_response(self) -> Response {
        let status = match &self {
            VideoChatError::InvalidUrl(_) |
            VideoChatError::MissingInput(_) |
            VideoChatError::MalformedHistory(_) => StatusCode::BAD_REQUEST,
            VideoChatError::TranscriptUnavailable(_) => StatusCode::NOT_FOUND,
            VideoChatError::GenerationFailed(_) | VideoChatError::Internal(_) =>
                StatusCode::INTERNAL_SERVER_ERROR,
        };
        (status, Json(ErrorResponse { detail: self.to_string() })).into_response()
    }
}

impl From<JsonRejection> for VideoChatError {
    fn from(rejection: JsonRejection) -> Self {
        VideoChatError::MissingInput(rejection.body_text())
    }
}

impl From<QueryRejection> for VideoChatError {
    fn from(rejection: QueryRejection) -> Self {
        VideoChatError::MissingInput(rejection.body_text())
    }
}

/// Bodies and query strings that fail to extract answer with the same `{detail}` shape.
fn reject_input(endpoint: &str, rejection: impl Into<VideoChatError>) -> VideoChatError {
    let err = rejection.into();
    warn!("{} rejected ({}): {}", endpoint, err.kind(), err);
    err
}

fn log_failure(request_id: &Uuid, endpoint: &str, err: &VideoChatError) {
    if err.is_client_error() {
        warn!("[{}] {} rejected ({}): {}", request_id, endpoint, err.kind(), err);
    } else {
        error!("[{}] {} failed ({}): {}", request_id, endpoint, err.kind(), err);
    }
}

fn cors_layer(allowed_origins: &[String]) -> CorsLayer {
    let cors = CorsLayer::new().allow_methods(Any).allow_headers(Any);
    if allowed_origins.is_empty() {
        return cors.allow_origin(Any);
    }

    let origins: Vec<HeaderValue> = allowed_origins
        .iter()
        .filter_map(|origin| match origin.parse::<HeaderValue>() {
            Ok(value) => Some(value),
            Err(e) => {
                warn!("Ignoring invalid CORS origin '{}': {}", origin, e);
                None
            }
        })
        .collect();
    cors.allow_origin(AllowOrigin::list(origins))
}

pub fn router(agent: Arc<VideoAgent>, allowed_origins: &[String]) -> Router {
    let app_state = AppState { agent };

    Router::new()
        .route("/api/summarize/", post(summarize_handler))
        .route("/summary/", get(summary_query_handler))
        .route("/video-chat/", post(video_chat_handler))
        .route("/youtube/", post(ask_handler))
        .layer(cors_layer(allowed_origins))
        .with_state(app_state)
}

pub async fn start_http_server(
    agent: Arc<VideoAgent>,
    args: Args
) -> Result<(), Box<dyn Error + Send + Sync>> {
    let addr = args.server_addr.parse::<SocketAddr>()?;
    let app = router(agent, &args.cors_origin_list());

    if args.enable_tls {
        let (cert_path, key_path) = match (&args.tls_cert_path, &args.tls_key_path) {
            (Some(cert_path), Some(key_path)) => (cert_path, key_path),
            _ => {
                error!("Both --tls-cert-path and --tls-key-path must be provided to enable TLS.");
                return Err("TLS enabled without cert/key".into());
            }
        };
        info!(
            "TLS enabled. Loading certificate from '{}' and key from '{}'",
            cert_path,
            key_path
        );
        let tls_config = axum_server::tls_rustls::RustlsConfig::from_pem_file(
            cert_path,
            key_path
        ).await?;

        info!("Starting HTTPS API server on: https://{}", addr);
        axum_server::bind_rustls(addr, tls_config).serve(app.into_make_service()).await?;
    } else {
        let listener = tokio::net::TcpListener::bind(addr).await.map_err(|e| {
            error!("Failed to bind HTTP server to {}: {}. Try a different port.", addr, e);
            e
        })?;
        info!("Starting HTTP API server on: http://{}", addr);
        axum::serve(listener, app.into_make_service()).await?;
    }

    Ok(())
}

async fn summarize(
    state: &AppState,
    endpoint: &str,
    video_url: &str
) -> Result<Json<SummaryResponse>, VideoChatError> {
    let request_id = Uuid::new_v4();
    info!("[{}] {} url={}", request_id, endpoint, video_url);

    match state.agent.summarize(video_url).await {
        Ok(summary) => {
            info!("[{}] {} ok ({} chars)", request_id, endpoint, summary.len());
            Ok(Json(SummaryResponse { summary }))
        }
        Err(e) => {
            log_failure(&request_id, endpoint, &e);
            Err(e)
        }
    }
}

async fn summarize_handler(
    State(state): State<AppState>,
    payload: Result<Json<SummarizeRequest>, JsonRejection>
) -> Result<Json<SummaryResponse>, VideoChatError> {
    let endpoint = "POST /api/summarize/";
    let Json(req) = payload.map_err(|rejection| reject_input(endpoint, rejection))?;
    summarize(&state, endpoint, &req.video_url).await
}

async fn summary_query_handler(
    State(state): State<AppState>,
    query: Result<Query<SummaryQuery>, QueryRejection>
) -> Result<Json<SummaryResponse>, VideoChatError> {
    let endpoint = "GET /summary/";
    let Query(query) = query.map_err(|rejection| reject_input(endpoint, rejection))?;
    summarize(&state, endpoint, &query.youtube_video_url).await
}

async fn video_chat_handler(
    State(state): State<AppState>,
    payload: Result<Json<ConversationRequest>, JsonRejection>
) -> Result<Json<VideoChatResponse>, VideoChatError> {
    let Json(req) = payload.map_err(|rejection| reject_input("POST /video-chat/", rejection))?;
    let request_id = Uuid::new_v4();
    info!(
        "[{}] POST /video-chat/ url={:?} history_len={:?} has_question={}",
        request_id,
        req.url,
        req.chat_history.as_ref().and_then(|h| h.as_array()).map(Vec::len),
        req.question.is_some()
    );

    match state.agent.video_chat(req).await {
        Ok(turn) => {
            info!("[{}] POST /video-chat/ ok (history_len={})", request_id, turn.history.len());
            Ok(
                Json(VideoChatResponse {
                    response: turn.reply.content().to_string(),
                    chat_history: turn.history,
                })
            )
        }
        Err(e) => {
            log_failure(&request_id, "POST /video-chat/", &e);
            Err(e)
        }
    }
}

async fn ask_handler(
    State(state): State<AppState>,
    payload: Result<Json<AskRequest>, JsonRejection>
) -> Result<Json<AskResponse>, VideoChatError> {
    let Json(req) = payload.map_err(|rejection| reject_input("POST /youtube/", rejection))?;
    let request_id = Uuid::new_v4();
    info!("[{}] POST /youtube/ url={}", request_id, req.youtube_url);

    match state.agent.ask(&req.youtube_url, &req.question).await {
        Ok(result) => {
            info!("[{}] POST /youtube/ ok", request_id);
            Ok(
                Json(AskResponse {
                    transcript: result.transcript,
                    answer: result.answer,
                })
            )
        }
        Err(e) => {
            log_failure(&request_id, "POST /youtube/", &e);
            Err(e)
        }
    }
}
