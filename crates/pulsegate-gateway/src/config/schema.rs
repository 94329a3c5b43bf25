use serde::Deserialize;
use pulsegate_core::error::{GatewayError, Result};

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct GatewayConfig {
    pub version: u32,

    #[serde(default)]
    pub gateway: GatewaySection,

    #[serde(default)]
    pub store: StoreConfig,

    #[serde(default)]
    pub upstreams: UpstreamsConfig,

    /// API keys. Environment only, never read from the file.
    #[serde(skip)]
    pub credentials: Credentials,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            version: 1,
            gateway: GatewaySection::default(),
            store: StoreConfig::default(),
            upstreams: UpstreamsConfig::default(),
            credentials: Credentials::default(),
        }
    }
}

impl GatewayConfig {
    pub fn validate(&self) -> Result<()> {
        if self.version != 1 {
            return Err(GatewayError::Config(format!(
                "unsupported config version: {}",
                self.version
            )));
        }

        self.store.validate()?;
        self.upstreams.validate()?;

        Ok(())
    }

    /// `host:port` the listener binds to.
    pub fn listen_addr(&self) -> String {
        format!("{}:{}", self.gateway.host, self.gateway.port)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct GatewaySection {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,

    #[serde(default)]
    pub log_format: LogFormat,
}

impl Default for GatewaySection {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            log_format: LogFormat::default(),
        }
    }
}

fn default_host() -> String {
    "0.0.0.0".into()
}
fn default_port() -> u16 {
    5000
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum StoreBackend {
    #[default]
    Mongo,
    Memory,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct StoreConfig {
    #[serde(default)]
    pub backend: StoreBackend,

    /// Connection string, filled from `MONGO_URI`.
    #[serde(skip)]
    pub uri: Option<String>,

    /// Used when the connection string names no database.
    #[serde(default = "default_database")]
    pub database: String,

    #[serde(default = "default_collection")]
    pub collection: String,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            backend: StoreBackend::default(),
            uri: None,
            database: default_database(),
            collection: default_collection(),
        }
    }
}

impl StoreConfig {
    pub fn validate(&self) -> Result<()> {
        if self.database.trim().is_empty() {
            return Err(GatewayError::Config("store.database must not be empty".into()));
        }
        if self.collection.trim().is_empty() {
            return Err(GatewayError::Config("store.collection must not be empty".into()));
        }
        Ok(())
    }
}

fn default_database() -> String {
    "test".into()
}
fn default_collection() -> String {
    "kpis".into()
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct UpstreamsConfig {
    #[serde(default = "default_weather_url")]
    pub weather_url: String,

    #[serde(default = "default_huggingface_url")]
    pub huggingface_url: String,

    #[serde(default = "default_codestral_fim_url")]
    pub codestral_fim_url: String,

    #[serde(default = "default_codestral_chat_url")]
    pub codestral_chat_url: String,

    /// Sent with code completions only; chat requests carry no limit.
    #[serde(default = "default_fim_max_tokens")]
    pub fim_max_tokens: u32,
}

impl Default for UpstreamsConfig {
    fn default() -> Self {
        Self {
            weather_url: default_weather_url(),
            huggingface_url: default_huggingface_url(),
            codestral_fim_url: default_codestral_fim_url(),
            codestral_chat_url: default_codestral_chat_url(),
            fim_max_tokens: default_fim_max_tokens(),
        }
    }
}

impl UpstreamsConfig {
    pub fn validate(&self) -> Result<()> {
        for (key, url) in [
            ("upstreams.weather_url", &self.weather_url),
            ("upstreams.huggingface_url", &self.huggingface_url),
            ("upstreams.codestral_fim_url", &self.codestral_fim_url),
            ("upstreams.codestral_chat_url", &self.codestral_chat_url),
        ] {
            let parsed = reqwest::Url::parse(url)
                .map_err(|e| GatewayError::Config(format!("{key} is not a valid url: {e}")))?;
            if !matches!(parsed.scheme(), "http" | "https") {
                return Err(GatewayError::Config(format!("{key} must be http or https")));
            }
        }
        if self.fim_max_tokens == 0 {
            return Err(GatewayError::Config(
                "upstreams.fim_max_tokens must be greater than 0".into(),
            ));
        }
        Ok(())
    }
}

fn default_weather_url() -> String {
    "https://api.tomorrow.io/v4/timelines".into()
}
fn default_huggingface_url() -> String {
    "https://api-inference.huggingface.co/models/mistralai/Codestral-22B-v0.1".into()
}
fn default_codestral_fim_url() -> String {
    "https://codestral.mistral.ai/v1/fim/completions".into()
}
fn default_codestral_chat_url() -> String {
    "https://codestral.mistral.ai/v1/chat/completions".into()
}
fn default_fim_max_tokens() -> u32 {
    150
}

/// Server-held API keys for the upstreams.
#[derive(Clone, Default)]
pub struct Credentials {
    pub tomorrow_api_key: Option<String>,
    pub huggingface_api_key: Option<String>,
    pub codestral_api_key: Option<String>,
}

impl Credentials {
    /// Names of the keys that are not set.
    pub fn missing(&self) -> Vec<&'static str> {
        let mut out = Vec::new();
        if self.tomorrow_api_key.is_none() {
            out.push("TOMORROW_API_KEY");
        }
        if self.huggingface_api_key.is_none() {
            out.push("HUGGINGFACE_API_KEY");
        }
        if self.codestral_api_key.is_none() {
            out.push("CODESTRAL_API_KEY");
        }
        out
    }
}

// Keys must never end up in logs.
impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mask = |k: &Option<String>| if k.is_some() { "<set>" } else { "<unset>" };
        f.debug_struct("Credentials")
            .field("tomorrow_api_key", &mask(&self.tomorrow_api_key))
            .field("huggingface_api_key", &mask(&self.huggingface_api_key))
            .field("codestral_api_key", &mask(&self.codestral_api_key))
            .finish()
    }
}
