use crate::error::AppError;
use config::{Config as Cfg, File};
use serde::Deserialize;
use std::env;

/// Default Gemini REST endpoint. Overridable so tests can point the
/// gateway at a stub server.
const DEFAULT_GEMINI_API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta";

const DEFAULT_IMAGE_CACHE_CAPACITY: usize = 256;

#[derive(Debug, Clone, Deserialize)]
pub struct GatewayConfig {
    #[serde(flatten)]
    pub server: ServerConfig,
    pub auth: AuthConfig,
    pub gemini: GeminiSettings,
    pub cache: CacheConfig,
}

/// Server settings, loaded through the `APP__` environment prefix
/// (`APP__HOST`, `APP__PORT`, `APP__DEBUG`).
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    /// Enables the Swagger UI and human-readable log output.
    #[serde(default)]
    pub debug: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AuthConfig {
    /// Shared secret expected in the `X-API-Key` header.
    pub api_key: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GeminiSettings {
    pub api_key: String,
    pub api_base: String,
    /// Model for conversational chat (e.g. gemini-2.0-flash).
    pub chat_model: String,
    /// Model for image analysis.
    pub vision_model: String,
    /// Model for image generation. Called over plain REST; this model is
    /// not exposed through the conversational endpoint family.
    pub image_model: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CacheConfig {
    /// Maximum number of generated images held in memory.
    pub capacity: usize,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    9090
}

impl ServerConfig {
    fn load() -> Result<Self, AppError> {
        let config = Cfg::builder()
            .add_source(File::with_name("configuration").required(false))
            .add_source(config::Environment::with_prefix("APP").separator("__"))
            .build()?;

        Ok(config.try_deserialize()?)
    }
}

impl GatewayConfig {
    pub fn load() -> Result<Self, AppError> {
        dotenvy::dotenv().ok();

        Ok(GatewayConfig {
            server: ServerConfig::load()?,
            auth: AuthConfig {
                api_key: get_env("APP_API_KEY", None)?,
            },
            gemini: GeminiSettings {
                // Required: without it the service cannot talk to the
                // upstream at all, so startup fails.
                api_key: get_env("GEMINI_API_KEY", None)?,
                api_base: get_env("GEMINI_API_BASE", Some(DEFAULT_GEMINI_API_BASE))?,
                chat_model: get_env("GEMINI_CHAT_MODEL", Some("gemini-2.0-flash"))?,
                vision_model: get_env("GEMINI_VISION_MODEL", Some("gemini-2.0-flash"))?,
                image_model: get_env(
                    "GEMINI_IMAGE_MODEL",
                    Some("gemini-2.0-flash-exp-image-generation"),
                )?,
            },
            cache: CacheConfig {
                capacity: get_env(
                    "IMAGE_CACHE_CAPACITY",
                    Some(&DEFAULT_IMAGE_CACHE_CAPACITY.to_string()),
                )?
                .parse()
                .unwrap_or(DEFAULT_IMAGE_CACHE_CAPACITY),
            },
        })
    }
}

fn get_env(key: &str, default: Option<&str>) -> Result<String, AppError> {
    match env::var(key) {
        Ok(val) => Ok(val),
        Err(_) => {
            if let Some(def) = default {
                Ok(def.to_string())
            } else {
                Err(AppError::ConfigError(anyhow::anyhow!(
                    "{} is required but not set",
                    key
                )))
            }
        }
    }
}
