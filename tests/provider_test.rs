use axum::http::{ HeaderMap, StatusCode };
use axum::routing::post;
use axum::{ Json, Router };
use chat_assistant::llm::chat::{ new_client, ProviderError };
use chat_assistant::llm::gateway::ModelGateway;
use chat_assistant::llm::{ parse_model_specs, LlmConfig, LlmType };
use serde_json::{ json, Value };
use std::sync::{ Arc, Mutex };

/// Serves `app` on an ephemeral local port and returns its base URL.
async fn spawn_stub(app: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{}", addr)
}

#[tokio::test]
async fn test_endpoint_client_sends_prompt_and_reads_text() {
    let app = Router::new().route(
        "/v1/generate",
        post(|Json(body): Json<Value>| async move {
            Json(json!({ "text": format!("echo: {}", body["prompt"].as_str().unwrap_or_default()) }))
        })
    );
    let base = spawn_stub(app).await;

    let client = new_client(&LlmConfig {
        llm_type: LlmType::Endpoint,
        base_url: Some(format!("{}/v1/generate", base)),
        ..LlmConfig::default()
    }).unwrap();

    let resp = client.complete("User: Hello").await.unwrap();
    assert_eq!(resp.response, "echo: User: Hello");
}

#[tokio::test]
async fn test_endpoint_client_missing_text_is_empty_reply() {
    let app = Router::new().route("/gen", post(|| async { Json(json!({ "other": 1 })) }));
    let base = spawn_stub(app).await;

    let client = new_client(&LlmConfig {
        llm_type: LlmType::Endpoint,
        base_url: Some(format!("{}/gen", base)),
        ..LlmConfig::default()
    }).unwrap();

    assert_eq!(client.complete("hi").await.unwrap().response, "");
}

#[tokio::test]
async fn test_endpoint_client_reports_status_errors() {
    let app = Router::new().route(
        "/gen",
        post(|| async { (StatusCode::SERVICE_UNAVAILABLE, "overloaded") })
    );
    let base = spawn_stub(app).await;

    let client = new_client(&LlmConfig {
        llm_type: LlmType::Endpoint,
        base_url: Some(format!("{}/gen", base)),
        ..LlmConfig::default()
    }).unwrap();

    match client.complete("hi").await {
        Err(ProviderError::Status { status, body }) => {
            assert_eq!(status, 503);
            assert_eq!(body, "overloaded");
        }
        other => panic!("expected status error, got {:?}", other.map(|r| r.response)),
    }
}

#[tokio::test]
async fn test_endpoint_client_unreachable_is_http_error() {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let client = new_client(&LlmConfig {
        llm_type: LlmType::Endpoint,
        base_url: Some(format!("http://{}/gen", addr)),
        ..LlmConfig::default()
    }).unwrap();

    let err = client.complete("hi").await.err().unwrap();
    assert!(matches!(err, ProviderError::Http(_)));
    assert!(err.to_string().starts_with("Error communicating with model API"));
}

#[tokio::test]
async fn test_ollama_client_uses_generate_route() {
    let app = Router::new().route(
        "/api/generate",
        post(|Json(body): Json<Value>| async move {
            assert_eq!(body["model"], "phi3");
            assert_eq!(body["stream"], false);
            Json(json!({ "response": "from ollama", "done": true }))
        })
    );
    let base = spawn_stub(app).await;

    let client = new_client(&LlmConfig {
        llm_type: LlmType::Ollama,
        base_url: Some(format!("{}/", base)),
        completion_model: Some("phi3".into()),
        api_key: None,
    }).unwrap();

    assert_eq!(client.complete("hi").await.unwrap().response, "from ollama");
}

#[tokio::test]
async fn test_openai_client_sends_bearer_and_reads_first_choice() {
    let app = Router::new().route(
        "/v1/chat/completions",
        post(|headers: HeaderMap, Json(body): Json<Value>| async move {
            assert_eq!(headers["authorization"], "Bearer sk-test");
            assert_eq!(body["messages"][0]["role"], "user");
            assert_eq!(body["messages"][0]["content"], "User: Hello");
            Json(json!({
                "choices": [{ "message": { "role": "assistant", "content": "Hi there" } }]
            }))
        })
    );
    let base = spawn_stub(app).await;

    let client = new_client(&LlmConfig {
        llm_type: LlmType::OpenAI,
        base_url: Some(base),
        completion_model: None,
        api_key: Some("sk-test".into()),
    }).unwrap();

    assert_eq!(client.complete("User: Hello").await.unwrap().response, "Hi there");
}

#[tokio::test]
async fn test_openai_client_without_choices_is_invalid_response() {
    let app = Router::new().route(
        "/v1/chat/completions",
        post(|| async { Json(json!({ "choices": [] })) })
    );
    let base = spawn_stub(app).await;

    let client = new_client(&LlmConfig {
        llm_type: LlmType::OpenAI,
        base_url: Some(base),
        completion_model: None,
        api_key: Some("sk-test".into()),
    }).unwrap();

    let err = client.complete("hi").await.err().unwrap();
    assert!(matches!(err, ProviderError::InvalidResponse(_)));
}

#[tokio::test]
async fn test_gateway_from_specs_routes_by_name() {
    let app = Router::new()
        .route("/a", post(|| async { Json(json!({ "text": "from a" })) }))
        .route("/b", post(|| async { Json(json!({ "text": "from b" })) }));
    let base = spawn_stub(app).await;

    let specs = parse_model_specs(
        &format!("model_a:endpoint@{base}/a,model_b:endpoint@{base}/b")
    ).unwrap();
    let gateway = ModelGateway::from_specs(&specs, None).unwrap();

    assert_eq!(gateway.generate("model_b", "x").await.unwrap(), "from b");
    let result = gateway.compare(&["model_a".to_string(), "model_b".to_string()], "x").await;
    assert_eq!(result.to_lines(), "model_a: from a\nmodel_b: from b");
}

/// Endpoint stub that remembers the `authorization` header of the last call.
async fn spawn_auth_recorder() -> (String, Arc<Mutex<Option<String>>>) {
    let seen = Arc::new(Mutex::new(None));
    let recorder = seen.clone();
    let app = Router::new().route(
        "/gen",
        post(move |headers: HeaderMap| {
            let recorder = recorder.clone();
            async move {
                *recorder.lock().unwrap() = headers
                    .get("authorization")
                    .and_then(|v| v.to_str().ok())
                    .map(str::to_string);
                Json(json!({ "text": "ok" }))
            }
        })
    );
    (spawn_stub(app).await, seen)
}

#[tokio::test]
async fn test_shared_openai_key_is_not_sent_to_endpoints() {
    let (base, seen) = spawn_auth_recorder().await;

    let specs = parse_model_specs(
        &format!("gpt:openai,keyless_model_a:endpoint@{base}/gen")
    ).unwrap();
    let gateway = ModelGateway::from_specs(&specs, Some("sk-openai-secret".into())).unwrap();

    assert_eq!(gateway.generate("keyless_model_a", "hi").await.unwrap(), "ok");
    assert_eq!(*seen.lock().unwrap(), None);
}

#[tokio::test]
async fn test_endpoint_uses_its_own_key() {
    let (base, seen) = spawn_auth_recorder().await;
    std::env::set_var("KEYED_MODEL_B_API_KEY", "sk-model-b");

    let specs = parse_model_specs(&format!("keyed_model_b:endpoint@{base}/gen")).unwrap();
    let gateway = ModelGateway::from_specs(&specs, Some("sk-openai-secret".into())).unwrap();

    gateway.generate("keyed_model_b", "hi").await.unwrap();
    assert_eq!(seen.lock().unwrap().as_deref(), Some("Bearer sk-model-b"));
}
