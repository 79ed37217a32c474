pub mod chat;
pub mod gateway;

use log::warn;
use serde::{ Deserialize, Serialize };
use std::str::FromStr;
use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LlmType {
    Endpoint,
    Ollama,
    OpenAI,
}

impl fmt::Display for LlmType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            LlmType::Endpoint => "endpoint",
            LlmType::Ollama => "ollama",
            LlmType::OpenAI => "openai",
        };
        write!(f, "{}", name)
    }
}

#[derive(Debug, PartialEq, Eq)]
pub struct ParseLlmTypeError {
    message: String,
}

impl fmt::Display for ParseLlmTypeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for ParseLlmTypeError {}

impl FromStr for LlmType {
    type Err = ParseLlmTypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "endpoint" => Ok(LlmType::Endpoint),
            "ollama" => Ok(LlmType::Ollama),
            "openai" => Ok(LlmType::OpenAI),
            _ =>
                Err(ParseLlmTypeError {
                    message: format!("Invalid LLM type: '{}'", s),
                }),
        }
    }
}

#[derive(Debug, Clone)]
pub struct LlmConfig {
    pub llm_type: LlmType,
    pub api_key: Option<String>,
    pub completion_model: Option<String>,
    pub base_url: Option<String>,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            llm_type: LlmType::Endpoint,
            api_key: None,
            completion_model: None,
            base_url: None,
        }
    }
}

#[derive(Debug, PartialEq, Eq)]
pub struct ParseModelSpecError {
    message: String,
}

impl fmt::Display for ParseModelSpecError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for ParseModelSpecError {}

impl From<ParseLlmTypeError> for ParseModelSpecError {
    fn from(err: ParseLlmTypeError) -> Self {
        ParseModelSpecError { message: err.message }
    }
}

/// One registry entry: `name:type[:model][@base_url]`.
///
/// `model_a:endpoint@https://api.modela.com/v1/generate` registers the name
/// `model_a` against a plain prompt endpoint, `local:ollama:llama3.2` registers
/// an Ollama model on the adapter's default host.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModelSpec {
    pub name: String,
    pub llm_type: LlmType,
    pub completion_model: Option<String>,
    pub base_url: Option<String>,
}

impl ModelSpec {
    /// Environment variable holding this model's own key, e.g. `MODEL_A_API_KEY`.
    pub fn api_key_var(&self) -> String {
        let name: String = self.name
            .chars()
            .map(|c| if c.is_ascii_alphanumeric() { c.to_ascii_uppercase() } else { '_' })
            .collect();
        format!("{}_API_KEY", name)
    }

    /// `<NAME>_API_KEY` when set. Otherwise the shared key, which only OpenAI models receive.
    pub fn resolve_api_key(&self, shared: Option<&str>) -> Option<String> {
        std::env
            ::var(self.api_key_var())
            .ok()
            .filter(|k| !k.trim().is_empty())
            .or_else(|| match self.llm_type {
                LlmType::OpenAI => shared.map(str::to_string),
                LlmType::Endpoint | LlmType::Ollama => None,
            })
    }

    pub fn to_config(&self, api_key: Option<String>) -> LlmConfig {
        LlmConfig {
            llm_type: self.llm_type.clone(),
            api_key,
            completion_model: self.completion_model.clone(),
            base_url: self.base_url.clone(),
        }
    }
}

impl FromStr for ModelSpec {
    type Err = ParseModelSpecError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let (head, base_url) = match s.split_once('@') {
            Some((head, url)) if !url.trim().is_empty() => (head, Some(url.trim().to_string())),
            Some(_) => {
                return Err(ParseModelSpecError {
                    message: format!("Empty base URL in model spec '{}'", s),
                });
            }
            None => (s, None),
        };

        let mut parts = head.splitn(3, ':');
        let name = parts.next().unwrap_or_default().trim();
        if name.is_empty() {
            return Err(ParseModelSpecError {
                message: format!("Missing model name in model spec '{}'", s),
            });
        }
        let llm_type = match parts.next() {
            Some(t) => t.parse::<LlmType>()?,
            None => {
                return Err(ParseModelSpecError {
                    message: format!("Missing provider type in model spec '{}'", s),
                });
            }
        };
        let completion_model = parts
            .next()
            .map(str::trim)
            .filter(|m| !m.is_empty())
            .map(str::to_string);

        Ok(ModelSpec {
            name: name.to_string(),
            llm_type,
            completion_model,
            base_url,
        })
    }
}

pub fn parse_model_specs(list: &str) -> Result<Vec<ModelSpec>, ParseModelSpecError> {
    let mut specs: Vec<ModelSpec> = Vec::new();
    for entry in list.split(',').filter(|e| !e.trim().is_empty()) {
        let spec = entry.parse::<ModelSpec>()?;
        if specs.iter().any(|existing| existing.name == spec.name) {
            return Err(ParseModelSpecError {
                message: format!("Model '{}' is registered twice", spec.name),
            });
        }
        specs.push(spec);
    }
    if specs.is_empty() {
        return Err(ParseModelSpecError {
            message: "At least one model must be registered".to_string(),
        });
    }
    Ok(specs)
}

/// Comma separated names, blanks dropped. Repeats keep their first position.
pub fn parse_model_list(list: &str) -> Vec<String> {
    let mut models: Vec<String> = Vec::new();
    for name in list.split(',').map(str::trim).filter(|m| !m.is_empty()) {
        if models.iter().any(|m| m == name) {
            warn!("Model '{}' listed more than once; keeping the first", name);
            continue;
        }
        models.push(name.to_string());
    }
    models
}
