use clap::Parser;

#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    // --- Model Registry Args ---
    /// Registered models, comma separated, each as name:type[:model][@base_url]
    /// (types: endpoint, ollama, openai).
    #[arg(
        long,
        env = "MODELS",
        default_value = "model_a:endpoint@https://api.modela.com/v1/generate,model_b:endpoint@https://api.modelb.com/v1/generate"
    )]
    pub models: String,

    /// Shared API key for OpenAI models. Any model can carry its own key in <NAME>_API_KEY.
    #[arg(long, env = "CHAT_API_KEY", default_value = "")]
    pub chat_api_key: String,

    // --- Comparison Args ---
    /// Models queried by /api/compare, in display order.
    #[arg(long, env = "COMPARE_MODELS", default_value = "model_a,model_b")]
    pub compare_models: String,

    /// Prompt used by /api/compare when the request carries no message.
    #[arg(long, env = "COMPARE_PROMPT", default_value = "Hello! Briefly introduce yourself.")]
    pub compare_prompt: String,

    // --- Upload Store Args ---
    /// Where uploaded files go (memory, disk)
    #[arg(long, env = "UPLOAD_STORE", default_value = "memory")]
    pub upload_store: String,

    /// Target directory when the upload store is "disk".
    #[arg(long, env = "UPLOAD_DIR", default_value = "uploads")]
    pub upload_dir: String,

    // --- Server Args ---
    /// Host address and port for the server to listen on.
    #[arg(long, env = "SERVER_ADDR", default_value = "0.0.0.0:8000")]
    pub server_addr: String,

    /// Optional path to the TLS certificate file (PEM format) for enabling HTTPS. Requires --tls-key-path.
    #[arg(long, env = "TLS_CERT_PATH")]
    pub tls_cert_path: Option<String>,

    /// Optional path to the TLS private key file (PEM format) for enabling HTTPS. Requires --tls-cert-path.
    #[arg(long, env = "TLS_KEY_PATH")]
    pub tls_key_path: Option<String>,

    #[arg(long, env = "ENABLE_TLS", default_value = "false")]
    pub enable_tls: bool,
}

#[derive(Parser, Debug, Clone)]
#[command(author, version, about = "Terminal front-end for the chat assistant API", long_about = None)]
pub struct ClientArgs {
    /// Base URL of the chat assistant server.
    #[arg(long, env = "CHAT_SERVER_URL", default_value = "http://127.0.0.1:8000")]
    pub server_url: String,

    /// Model selected at start.
    #[arg(long, env = "CHAT_CLIENT_MODEL", default_value = "model_a")]
    pub model: String,

    /// Optional theme sent with every message.
    #[arg(long, env = "CHAT_CLIENT_THEME")]
    pub theme: Option<String>,

    /// Models shown side by side by /compare.
    #[arg(long, env = "CHAT_CLIENT_COMPARE_MODELS", default_value = "model_a,model_b")]
    pub compare_models: String,
}

impl Args {
    pub fn api_key(&self) -> Option<String> {
        Some(self.chat_api_key.clone()).filter(|k| !k.trim().is_empty())
    }
}
