use futures::future::join_all;
use log::{ info, warn };
use std::collections::HashMap;
use std::sync::Arc;
use thiserror::Error;

use super::chat::{ new_client, ChatClient, ProviderError };
use super::ModelSpec;
use crate::models::compare::{ ComparisonEntry, ComparisonResult };

#[derive(Debug, Error)]
pub enum GatewayError {
    #[error("Model '{0}' not supported.")]
    UnknownModel(String),

    #[error("{cause}")]
    Provider {
        model: String,
        cause: ProviderError,
    },
}

/// Fixed name → client registry, built once at startup.
pub struct ModelGateway {
    order: Vec<String>,
    clients: HashMap<String, Arc<dyn ChatClient>>,
}

impl ModelGateway {
    pub fn with_clients(clients: Vec<(String, Arc<dyn ChatClient>)>) -> Self {
        let mut order = Vec::with_capacity(clients.len());
        let mut map = HashMap::with_capacity(clients.len());
        for (name, client) in clients {
            if map.insert(name.clone(), client).is_none() {
                order.push(name);
            } else {
                warn!("Model '{}' registered twice; keeping the later client", name);
            }
        }
        Self { order, clients: map }
    }

    pub fn from_specs(specs: &[ModelSpec], api_key: Option<String>) -> Result<Self, ProviderError> {
        let mut clients = Vec::with_capacity(specs.len());
        for spec in specs {
            let client = new_client(&spec.to_config(spec.resolve_api_key(api_key.as_deref())))?;
            info!(
                "Registered model '{}': Type={}, Model={}, BaseURL={}",
                spec.name,
                spec.llm_type,
                client.get_model(),
                client.get_base_url().as_deref().unwrap_or("adapter default")
            );
            clients.push((spec.name.clone(), client));
        }
        Ok(Self::with_clients(clients))
    }

    pub fn contains(&self, model: &str) -> bool {
        self.clients.contains_key(model)
    }

    pub fn model_names(&self) -> &[String] {
        &self.order
    }

    pub async fn generate(&self, model: &str, prompt: &str) -> Result<String, GatewayError> {
        let client = self.clients
            .get(model)
            .ok_or_else(|| GatewayError::UnknownModel(model.to_string()))?;
        client
            .complete(prompt).await
            .map(|resp| resp.response)
            .map_err(|cause| GatewayError::Provider { model: model.to_string(), cause })
    }

    /// Sends `prompt` to every model at once and collects the replies in `models` order.
    ///
    /// A failing model contributes `Error: <cause>` instead of aborting the rest.
    pub async fn compare(&self, models: &[String], prompt: &str) -> ComparisonResult {
        let calls = models.iter().map(|model| async move {
            let reply = match self.generate(model, prompt).await {
                Ok(reply) => reply,
                Err(e) => {
                    warn!("Comparison call to '{}' failed: {}", model, e);
                    format!("Error: {}", e)
                }
            };
            ComparisonEntry { model: model.clone(), reply }
        });
        ComparisonResult::new(join_all(calls).await)
    }
}
