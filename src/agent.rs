use crate::cli::Args;
use crate::error::ApiError;
use crate::history::build_prompt;
use crate::llm::gateway::{ GatewayError, ModelGateway };
use crate::llm::{ parse_model_list, parse_model_specs };
use crate::models::chat::ChatRequest;
use crate::models::compare::ComparisonResult;
use crate::store::{ create_file_store, FileStore };

use log::{ info, warn };
use std::error::Error;
use std::sync::Arc;

/// Request handling shared by every HTTP route.
///
/// Holds no per-conversation state: history arrives with each request and the
/// only thing that accumulates is the file store.
#[derive(Clone)]
pub struct ChatAgent {
    gateway: Arc<ModelGateway>,
    file_store: Arc<dyn FileStore>,
    compare_models: Vec<String>,
    compare_prompt: String,
}

impl ChatAgent {
    pub fn new(
        gateway: Arc<ModelGateway>,
        file_store: Arc<dyn FileStore>,
        compare_models: Vec<String>,
        compare_prompt: String
    ) -> Self {
        Self { gateway, file_store, compare_models, compare_prompt }
    }

    pub fn from_args(args: &Args) -> Result<Self, Box<dyn Error + Send + Sync>> {
        let specs = parse_model_specs(&args.models)?;
        let gateway = ModelGateway::from_specs(&specs, args.api_key())?;
        let file_store = create_file_store(args)?;
        let compare_models = parse_model_list(&args.compare_models);
        for model in compare_models.iter().filter(|m| !gateway.contains(m)) {
            warn!("Comparison model '{}' is not registered; it will always report an error", model);
        }

        Ok(Self::new(Arc::new(gateway), file_store, compare_models, args.compare_prompt.clone()))
    }

    pub fn model_names(&self) -> Vec<String> {
        self.gateway.model_names().to_vec()
    }

    pub fn compare_models(&self) -> &[String] {
        &self.compare_models
    }

    pub async fn chat(&self, req: &ChatRequest) -> Result<String, ApiError> {
        if req.message.trim().is_empty() {
            return Err(ApiError::Validation("Message must not be empty".into()));
        }
        if !self.gateway.contains(&req.model) {
            warn!("Rejected chat request for unknown model '{}'", req.model);
            return Err(GatewayError::UnknownModel(req.model.clone()).into());
        }

        let prompt = build_prompt(&req.conversation, req.theme.as_deref(), &req.message);
        info!(
            "Chat request for '{}' ({} prior messages, theme: {})",
            req.model,
            req.conversation.len(),
            req.theme.as_deref().unwrap_or("-")
        );
        let reply = self.gateway.generate(&req.model, &prompt).await?;
        Ok(reply)
    }

    pub async fn upload(&self, filename: &str, bytes: Vec<u8>) -> Result<String, ApiError> {
        let size = bytes.len();
        self.file_store.put(filename, bytes).await?;
        info!("Stored upload '{}' ({} bytes)", filename, size);
        Ok(format!("{} uploaded", filename))
    }

    /// Runs the configured comparison. A blank or missing message uses the configured prompt.
    pub async fn compare(&self, message: Option<&str>) -> ComparisonResult {
        let prompt = message
            .map(str::trim)
            .filter(|m| !m.is_empty())
            .unwrap_or(self.compare_prompt.as_str());
        info!("Comparing {:?}", self.compare_models);
        self.gateway.compare(&self.compare_models, prompt).await
    }
}
