use std::path::Path;
use tracing::{debug, info};

pub const DEFAULT_MODEL: &str = "models/gemini-2.5-flash";
pub const DEFAULT_API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta";

#[derive(Debug, Clone)]
pub struct EstimatorConfig {
    pub api_key: Option<String>,
    pub model: String,
    pub api_base: String,
}

impl EstimatorConfig {
    pub fn from_env() -> Self {
        Self {
            api_key: non_empty_env("GEMINI_API_KEY"),
            model: non_empty_env("GEMINI_MODEL")
                .map(|model| normalize_model(&model))
                .unwrap_or_else(|| DEFAULT_MODEL.into()),
            api_base: non_empty_env("GEMINI_API_BASE")
                .map(|base| base.trim_end_matches('/').to_string())
                .unwrap_or_else(|| DEFAULT_API_BASE.into()),
        }
    }

    /// An explicitly supplied key wins over whatever the environment held.
    pub fn with_api_key(mut self, api_key: Option<String>) -> Self {
        if let Some(key) = api_key.map(|k| k.trim().to_string()).filter(|k| !k.is_empty()) {
            self.api_key = Some(key);
        }
        self
    }

    pub fn has_credential(&self) -> bool {
        self.api_key.is_some()
    }
}

impl Default for EstimatorConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            model: DEFAULT_MODEL.into(),
            api_base: DEFAULT_API_BASE.into(),
        }
    }
}

fn normalize_model(model: &str) -> String {
    let trimmed = model.trim();
    if trimmed.starts_with("models/") {
        trimmed.to_string()
    } else {
        format!("models/{trimmed}")
    }
}

fn non_empty_env(key: &str) -> Option<String> {
    std::env::var(key)
        .ok()
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

/// Loads `server/.env` when present, else `.env` from the working directory.
pub fn load_dotenv() {
    let server_env = Path::new("server").join(".env");
    if server_env.exists() {
        match dotenvy::from_path(&server_env) {
            Ok(()) => info!(target = "estimator.config", path = %server_env.display(), "loaded env file"),
            Err(err) => debug!(target = "estimator.config", error = %err, "env file unreadable"),
        }
        return;
    }
    match dotenvy::dotenv() {
        Ok(path) => info!(target = "estimator.config", path = %path.display(), "loaded env file"),
        Err(_) => debug!(target = "estimator.config", "no .env file, using process environment"),
    }
}
