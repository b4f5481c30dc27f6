use std::env;
use std::path::PathBuf;

use flair_classifier::ArtifactPaths;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("{0} environment variable is required")]
    Missing(&'static str),

    #[error("{key} is not valid: {value:?}")]
    Invalid { key: &'static str, value: String },
}

/// Server configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    // Reddit API
    pub reddit_client_id: String,
    pub reddit_client_secret: String,
    pub reddit_user_agent: String,

    // Web server
    pub web_host: String,
    pub web_port: u16,

    // Pretrained artifacts
    pub model_path: PathBuf,
    pub transform_path: PathBuf,
    pub tagger_lexicon_path: Option<PathBuf>,
    pub lemma_lexicon_path: Option<PathBuf>,
    pub wordnet_dir: Option<PathBuf>,

    // Batch uploads
    pub upload_dir: PathBuf,
}

impl Config {
    /// Load configuration from the environment, reading `.env` first if present.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let config = Self {
            reddit_client_id: required_env("REDDIT_CLIENT_ID")?,
            reddit_client_secret: required_env("REDDIT_CLIENT_SECRET")?,
            reddit_user_agent: env::var("REDDIT_USER_AGENT")
                .unwrap_or_else(|_| format!("flair-api/{}", env!("CARGO_PKG_VERSION"))),
            web_host: env::var("WEB_HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
            web_port: match env::var("WEB_PORT") {
                Ok(value) => value
                    .parse()
                    .map_err(|_| ConfigError::Invalid { key: "WEB_PORT", value })?,
                Err(_) => 5000,
            },
            model_path: env::var("MODEL_PATH")
                .unwrap_or_else(|_| "model1.json".to_string())
                .into(),
            transform_path: env::var("TRANSFORM_PATH")
                .unwrap_or_else(|_| "transform1.json".to_string())
                .into(),
            tagger_lexicon_path: env::var("TAGGER_LEXICON_PATH").ok().map(PathBuf::from),
            lemma_lexicon_path: env::var("LEMMA_LEXICON_PATH").ok().map(PathBuf::from),
            wordnet_dir: env::var("WORDNET_DIR").ok().map(PathBuf::from),
            upload_dir: env::var("UPLOAD_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|_| env::temp_dir()),
        };

        config.log_keys();
        Ok(config)
    }

    pub fn artifact_paths(&self) -> ArtifactPaths {
        ArtifactPaths {
            model: self.model_path.clone(),
            transform: self.transform_path.clone(),
            tagger_lexicon: self.tagger_lexicon_path.clone(),
            lemma_lexicon: self.lemma_lexicon_path.clone(),
            wordnet: self.wordnet_dir.clone(),
        }
    }

    fn log_keys(&self) {
        fn preview(val: &str) -> String {
            let head: String = val.chars().take(5).collect();
            format!("{}...({} chars)", head, val.len())
        }
        fn preview_path(val: &Option<PathBuf>) -> String {
            match val {
                Some(p) => p.display().to_string(),
                None => "<not set>".to_string(),
            }
        }

        tracing::info!("Config loaded:");
        tracing::info!("  REDDIT_CLIENT_ID: {}", preview(&self.reddit_client_id));
        tracing::info!("  REDDIT_CLIENT_SECRET: {}", redacted(&self.reddit_client_secret));
        tracing::info!("  REDDIT_USER_AGENT: {}", self.reddit_user_agent);
        tracing::info!("  MODEL_PATH: {}", self.model_path.display());
        tracing::info!("  TRANSFORM_PATH: {}", self.transform_path.display());
        tracing::info!("  TAGGER_LEXICON_PATH: {}", preview_path(&self.tagger_lexicon_path));
        tracing::info!("  LEMMA_LEXICON_PATH: {}", preview_path(&self.lemma_lexicon_path));
        tracing::info!("  WORDNET_DIR: {}", preview_path(&self.wordnet_dir));
        tracing::info!("  UPLOAD_DIR: {}", self.upload_dir.display());
    }
}

/// Secrets are logged by length only.
fn redacted(secret: &str) -> String {
    format!("<set>({} chars)", secret.len())
}

fn required_env(key: &'static str) -> Result<String, ConfigError> {
    env::var(key)
        .ok()
        .filter(|v| !v.is_empty())
        .ok_or(ConfigError::Missing(key))
}
