use crate::agent::ChatAgent;
use crate::cli::Args;
use crate::error::ApiError;
use crate::models::api::{
    CompareRequest,
    CompareResponse,
    ModelsResponse,
    UploadResponse,
    WelcomeResponse,
};
use crate::models::chat::{ ChatRequest, ChatResponse };
use std::error::Error;
use std::net::SocketAddr;
use std::sync::Arc;
use axum::{
    body::Bytes,
    routing::{ get, post },
    Router,
    Json,
    extract::{ DefaultBodyLimit, Multipart, State },
    extract::multipart::MultipartRejection,
    extract::rejection::JsonRejection,
};
use tower_http::cors::{ Any, CorsLayer };
use log::{ info, warn };

#[derive(Clone)]
struct AppState {
    agent: Arc<ChatAgent>,
}

/// Routes of the chat API, without binding a listener.
pub fn router(agent: Arc<ChatAgent>) -> Router {
    let cors = CorsLayer::new().allow_origin(Any).allow_methods(Any).allow_headers(Any);

    Router::new()
        .route("/", get(root_handler))
        .route("/api/models", get(models_handler))
        .route("/api/chat", post(chat_handler))
        .route("/api/upload", post(upload_handler))
        .route("/api/compare", post(compare_handler))
        .layer(DefaultBodyLimit::disable())
        .layer(cors)
        .with_state(AppState { agent })
}

pub async fn start_http_server(
    agent: Arc<ChatAgent>,
    args: &Args
) -> Result<(), Box<dyn Error + Send + Sync>> {
    let addr = args.server_addr.parse::<SocketAddr>()?;
    let app = router(agent);

    if args.enable_tls {
        let (cert_path, key_path) = match (&args.tls_cert_path, &args.tls_key_path) {
            (Some(cert_path), Some(key_path)) => (cert_path, key_path),
            _ => {
                return Err(
                    "Both --tls-cert-path and --tls-key-path must be provided to enable TLS.".into()
                );
            }
        };
        info!("TLS enabled. Loading certificate from '{}' and key from '{}'", cert_path, key_path);
        let tls_config = axum_server::tls_rustls::RustlsConfig::from_pem_file(
            cert_path,
            key_path
        ).await?;

        info!("HTTPS server listening on: https://{}", addr);
        axum_server::bind_rustls(addr, tls_config).serve(app.into_make_service()).await?;
    } else {
        let listener = tokio::net::TcpListener
            ::bind(addr).await
            .map_err(|e| format!("Failed to bind HTTP server to {}: {}", addr, e))?;
        info!("HTTP server listening on: http://{}", addr);
        axum::serve(listener, app.into_make_service()).await?;
    }

    Ok(())
}

async fn root_handler() -> Json<WelcomeResponse> {
    Json(WelcomeResponse {
        message: "Welcome to the Web-based Chat Assistant API".into(),
    })
}

async fn models_handler(State(state): State<AppState>) -> Json<ModelsResponse> {
    Json(ModelsResponse { models: state.agent.model_names() })
}

async fn chat_handler(
    State(state): State<AppState>,
    body: Result<Json<ChatRequest>, JsonRejection>
) -> Result<Json<ChatResponse>, ApiError> {
    let Json(req) = body.map_err(|e| ApiError::Validation(e.body_text()))?;
    let reply = state.agent.chat(&req).await?;
    Ok(Json(ChatResponse { reply }))
}

async fn upload_handler(
    State(state): State<AppState>,
    multipart: Result<Multipart, MultipartRejection>
) -> Result<Json<UploadResponse>, ApiError> {
    let mut multipart = multipart.map_err(|e| ApiError::Upload(e.body_text()))?;

    while
        let Some(field) = multipart
            .next_field().await
            .map_err(|e| ApiError::Upload(format!("Invalid multipart body: {}", e)))?
    {
        if field.name() != Some("file") {
            continue;
        }
        let filename = field
            .file_name()
            .map(str::to_string)
            .filter(|name| !name.trim().is_empty())
            .ok_or_else(|| ApiError::Upload("Uploaded file has no filename".into()))?;
        let bytes = field
            .bytes().await
            .map_err(|e| ApiError::Upload(format!("Failed to read '{}': {}", filename, e)))?;

        let detail = state.agent.upload(&filename, bytes.to_vec()).await?;
        return Ok(Json(UploadResponse { detail }));
    }

    warn!("Upload request without a 'file' field");
    Err(ApiError::Upload("No file provided".into()))
}

async fn compare_handler(
    State(state): State<AppState>,
    body: Bytes
) -> Result<Json<CompareResponse>, ApiError> {
    let req = if body.iter().all(u8::is_ascii_whitespace) {
        CompareRequest::default()
    } else {
        serde_json
            ::from_slice::<CompareRequest>(&body)
            .map_err(|e| ApiError::Validation(format!("Invalid compare request: {}", e)))?
    };

    let results = state.agent.compare(req.message.as_deref()).await;
    Ok(Json(CompareResponse { result: results.to_lines(), results }))
}
