//! Gateway config loader (strict parsing).
//!
//! Layers, lowest first: built-in defaults, an optional YAML file named by
//! `PULSEGATE_CONFIG`, then the environment (`MONGO_URI`, `PORT` and the
//! upstream API keys). The environment is a `.env` file in the working
//! directory overlaid by real process variables, which always win. Secrets are
//! only ever taken from the environment.

pub mod schema;

use std::collections::HashMap;
use std::fs;
use std::path::Path;

use pulsegate_core::error::{GatewayError, Result};

pub use schema::{
    Credentials, GatewayConfig, GatewaySection, LogFormat, StoreBackend, StoreConfig,
    UpstreamsConfig,
};

/// Environment variable naming an optional YAML config file.
pub const CONFIG_PATH_ENV: &str = "PULSEGATE_CONFIG";

/// Dotenv file read at startup.
pub const DOTENV_FILE: &str = ".env";

pub fn load_from_file(path: &str) -> Result<GatewayConfig> {
    let s = fs::read_to_string(path)
        .map_err(|e| GatewayError::Config(format!("read config failed ({path}): {e}")))?;
    load_from_str(&s)
}

pub fn load_from_str(s: &str) -> Result<GatewayConfig> {
    let cfg: GatewayConfig = serde_yaml::from_str(s)
        .map_err(|e| GatewayError::Config(format!("invalid yaml: {e}")))?;
    cfg.validate()?;
    Ok(cfg)
}

/// Load the full process configuration from `.env` and the real environment.
pub fn load() -> Result<GatewayConfig> {
    let dotenv = read_dotenv(DOTENV_FILE)?;
    load_layered(&dotenv, |key| std::env::var(key).ok())
}

/// Load with `process` variables taking precedence over `dotenv` entries.
pub fn load_layered<F>(dotenv: &HashMap<String, String>, process: F) -> Result<GatewayConfig>
where
    F: Fn(&str) -> Option<String>,
{
    load_with(|key| process(key).or_else(|| dotenv.get(key).cloned()))
}

/// Parse a dotenv file into a map. A missing file is an empty map.
///
/// The process environment is not modified.
pub fn read_dotenv(path: impl AsRef<Path>) -> Result<HashMap<String, String>> {
    let path = path.as_ref();
    let iter = match dotenvy::from_path_iter(path) {
        Ok(iter) => iter,
        Err(e) if e.not_found() => return Ok(HashMap::new()),
        Err(e) => {
            return Err(GatewayError::Config(format!(
                "read {} failed: {e}",
                path.display()
            )))
        }
    };

    iter.map(|item| {
        item.map_err(|e| GatewayError::Config(format!("invalid {}: {e}", path.display())))
    })
    .collect()
}

/// Same as [`load`], with the environment supplied by `env`.
pub fn load_with<F>(env: F) -> Result<GatewayConfig>
where
    F: Fn(&str) -> Option<String>,
{
    let mut cfg = match non_empty(env(CONFIG_PATH_ENV)) {
        Some(path) => load_from_file(&path)?,
        None => GatewayConfig::default(),
    };
    apply_env(&mut cfg, env)?;
    cfg.validate()?;
    Ok(cfg)
}

/// Overlay environment values on top of `cfg`.
pub fn apply_env<F>(cfg: &mut GatewayConfig, env: F) -> Result<()>
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(port) = non_empty(env("PORT")) {
        cfg.gateway.port = port
            .trim()
            .parse()
            .map_err(|e| GatewayError::Config(format!("PORT must be a port number ({port}): {e}")))?;
    }

    if let Some(uri) = non_empty(env("MONGO_URI")) {
        cfg.store.uri = Some(uri);
    }

    cfg.credentials = Credentials {
        tomorrow_api_key: non_empty(env("TOMORROW_API_KEY")),
        huggingface_api_key: non_empty(env("HUGGINGFACE_API_KEY")),
        codestral_api_key: non_empty(env("CODESTRAL_API_KEY")),
    };

    Ok(())
}

fn non_empty(v: Option<String>) -> Option<String> {
    v.filter(|s| !s.trim().is_empty())
}
