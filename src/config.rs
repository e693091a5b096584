use std::fmt;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::str::FromStr;

/// Application-level constants
pub const APP_NAME: &str = "LexAid";
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

/// OpenAI-compatible chat completion endpoint (Groq).
pub const DEFAULT_COMPLETIONS_URL: &str = "https://api.groq.com/openai/v1/chat/completions";
pub const DEFAULT_MODEL: &str = "llama-3.1-8b-instant";
pub const DEFAULT_TEMPERATURE: f32 = 0.5;
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 60;

/// Hard cap on any context block or document excerpt placed in a prompt.
pub const DEFAULT_CONTEXT_CAP: usize = 10_000;

pub const DEFAULT_BIND_ADDR: &str = "127.0.0.1:5000";
pub const DEFAULT_VAULT_BUCKET: &str = "lawlock";
pub const DEFAULT_ADMIN_PASSWORD: &str = "admin";
pub const DEFAULT_MAX_UPLOAD_BYTES: usize = 25 * 1024 * 1024;

/// Filter used when `RUST_LOG` is not set.
pub fn default_log_filter() -> &'static str {
    "info,lexaid=debug"
}

/// Get the application data directory (platform data dir + `LexAid`).
pub fn app_data_dir() -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(APP_NAME)
}

/// Get the models directory (for ONNX embeddings).
pub fn models_dir() -> PathBuf {
    app_data_dir().join("models")
}

/// Get the embedding model directory (all-MiniLM-L6-v2)
pub fn embedding_model_dir() -> PathBuf {
    models_dir().join("all-MiniLM-L6-v2")
}

/// Retrieval (chunk → embed → search) settings for the context builder.
#[derive(Debug, Clone, PartialEq)]
pub struct RagSettings {
    pub enabled: bool,
    pub model_dir: PathBuf,
    /// Combined input at or below this many characters is never narrowed.
    pub threshold_chars: usize,
    pub chunk_size: usize,
    pub chunk_overlap: usize,
    pub top_k: usize,
}

impl Default for RagSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            model_dir: embedding_model_dir(),
            threshold_chars: 500,
            chunk_size: 1000,
            chunk_overlap: 200,
            top_k: 2,
        }
    }
}

/// Chat-completion endpoint settings.
#[derive(Clone)]
pub struct LlmSettings {
    pub completions_url: String,
    pub api_key: Option<String>,
    pub model: String,
    pub temperature: f32,
    pub timeout_secs: u64,
}

impl Default for LlmSettings {
    fn default() -> Self {
        Self {
            completions_url: DEFAULT_COMPLETIONS_URL.to_string(),
            api_key: None,
            model: DEFAULT_MODEL.to_string(),
            temperature: DEFAULT_TEMPERATURE,
            timeout_secs: DEFAULT_REQUEST_TIMEOUT_SECS,
        }
    }
}

impl fmt::Debug for LlmSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LlmSettings")
            .field("completions_url", &self.completions_url)
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .field("model", &self.model)
            .field("temperature", &self.temperature)
            .field("timeout_secs", &self.timeout_secs)
            .finish()
    }
}

/// Supabase Storage credentials for the cloud document vault.
#[derive(Clone)]
pub struct SupabaseSettings {
    pub url: String,
    pub key: String,
    pub bucket: String,
}

impl fmt::Debug for SupabaseSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SupabaseSettings")
            .field("url", &self.url)
            .field("key", &"<redacted>")
            .field("bucket", &self.bucket)
            .finish()
    }
}

/// Process-wide configuration. Built once at startup and handed to
/// every component constructor; nothing reads the environment afterwards.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub bind_addr: SocketAddr,
    pub llm: LlmSettings,
    pub rag: RagSettings,
    pub context_cap: usize,
    pub static_dir: PathBuf,
    pub upload_dir: PathBuf,
    pub db_path: PathBuf,
    pub supabase: Option<SupabaseSettings>,
    pub admin_password: String,
    pub max_upload_bytes: usize,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self::from_lookup(|_| None)
    }
}

impl AppConfig {
    /// Load configuration from process environment variables.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration from an arbitrary key lookup (environment in
    /// production, a map in tests).
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let cwd = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."));
        let rag_defaults = RagSettings::default();

        let llm = LlmSettings {
            completions_url: string_var(&lookup, "LEXAID_COMPLETIONS_URL")
                .unwrap_or_else(|| DEFAULT_COMPLETIONS_URL.to_string()),
            api_key: string_var(&lookup, "GROQ_API_KEY"),
            model: string_var(&lookup, "LEXAID_MODEL")
                .unwrap_or_else(|| DEFAULT_MODEL.to_string()),
            temperature: parsed_var(&lookup, "LEXAID_TEMPERATURE", DEFAULT_TEMPERATURE),
            timeout_secs: parsed_var(
                &lookup,
                "LEXAID_REQUEST_TIMEOUT_SECS",
                DEFAULT_REQUEST_TIMEOUT_SECS,
            ),
        };

        let rag = RagSettings {
            enabled: bool_var(&lookup, "LEXAID_RAG_ENABLED", rag_defaults.enabled),
            model_dir: string_var(&lookup, "LEXAID_EMBEDDING_MODEL_DIR")
                .map(PathBuf::from)
                .unwrap_or(rag_defaults.model_dir),
            ..rag_defaults
        };

        let supabase = match (
            string_var(&lookup, "SUPABASE_URL"),
            string_var(&lookup, "SUPABASE_KEY"),
        ) {
            (Some(url), Some(key)) => Some(SupabaseSettings {
                url: url.trim_end_matches('/').to_string(),
                key,
                bucket: string_var(&lookup, "LEXAID_VAULT_BUCKET")
                    .unwrap_or_else(|| DEFAULT_VAULT_BUCKET.to_string()),
            }),
            _ => None,
        };

        Self {
            bind_addr: parsed_var(
                &lookup,
                "LEXAID_BIND",
                SocketAddr::from(([127, 0, 0, 1], 5000)),
            ),
            llm,
            rag,
            context_cap: parsed_var(&lookup, "LEXAID_CONTEXT_CAP", DEFAULT_CONTEXT_CAP),
            static_dir: string_var(&lookup, "LEXAID_STATIC_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|| cwd.clone()),
            upload_dir: string_var(&lookup, "LEXAID_UPLOAD_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|| cwd.join("uploads")),
            db_path: string_var(&lookup, "LEXAID_DB_PATH")
                .map(PathBuf::from)
                .unwrap_or_else(|| app_data_dir().join("lexaid.db")),
            supabase,
            admin_password: string_var(&lookup, "LEXAID_ADMIN_PASSWORD")
                .unwrap_or_else(|| DEFAULT_ADMIN_PASSWORD.to_string()),
            max_upload_bytes: parsed_var(
                &lookup,
                "LEXAID_MAX_UPLOAD_BYTES",
                DEFAULT_MAX_UPLOAD_BYTES,
            ),
        }
    }
}

fn string_var<F>(lookup: &F, key: &str) -> Option<String>
where
    F: Fn(&str) -> Option<String>,
{
    lookup(key)
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}

fn parsed_var<F, T>(lookup: &F, key: &str, default: T) -> T
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
{
    match string_var(lookup, key) {
        None => default,
        Some(raw) => raw.parse::<T>().unwrap_or_else(|_| {
            tracing::warn!(key, value = %raw, "Unparsable config value, using default");
            default
        }),
    }
}

fn bool_var<F>(lookup: &F, key: &str, default: bool) -> bool
where
    F: Fn(&str) -> Option<String>,
{
    match string_var(lookup, key).map(|s| s.to_ascii_lowercase()) {
        None => default,
        Some(v) if matches!(v.as_str(), "1" | "true" | "yes" | "on") => true,
        Some(v) if matches!(v.as_str(), "0" | "false" | "no" | "off") => false,
        Some(v) => {
            tracing::warn!(key, value = %v, "Unparsable boolean config value, using default");
            default
        }
    }
}
