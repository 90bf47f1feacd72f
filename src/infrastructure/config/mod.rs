use serde::Deserialize;
use std::env;
use std::path::PathBuf;
use std::time::Duration;

use crate::domain::tts::DispatcherSettings;

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub environment: Environment,
    pub log_format: LogFormat,
    // Dispatcher
    pub scratch_dir: PathBuf,
    pub max_text_chars: usize,
    pub min_artifact_bytes: u64,
    pub adapter_timeout_secs: u64,
    pub voice_table_path: Option<PathBuf>,
    pub preview_cache_enabled: bool,
    // Engines
    pub azure_speech_key: Option<String>,
    pub azure_speech_region: String,
    pub polly_enabled: bool,
    pub aws_region: String,
    pub gtts_enabled: bool,
    pub espeak_enabled: bool,
    pub espeak_path: Option<PathBuf>,
    // Usage counters
    pub counter_store: CounterStoreKind,
    pub stats_file: PathBuf,
    pub database_url: Option<String>,
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    Development,
    Production,
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    Pretty,
    Json,
}

#[derive(Debug, Clone, Copy, Deserialize, PartialEq)]
#[serde(rename_all = "lowercase")]
pub enum CounterStoreKind {
    None,
    Memory,
    Json,
    Postgres,
}

fn flag(name: &str, default: bool) -> bool {
    env::var(name)
        .map(|s| matches!(s.trim().to_lowercase().as_str(), "true" | "1" | "yes" | "on"))
        .unwrap_or(default)
}

fn optional(name: &str) -> Option<String> {
    env::var(name).ok().filter(|s| !s.trim().is_empty())
}

impl Config {
    pub fn from_env() -> Result<Self, Box<dyn std::error::Error>> {
        dotenvy::dotenv().ok();

        let database_url = optional("DATABASE_URL");
        let counter_store = match env::var("COUNTER_STORE")
            .unwrap_or_else(|_| "memory".to_string())
            .trim()
            .to_lowercase()
            .as_str()
        {
            "none" | "off" => CounterStoreKind::None,
            "" | "memory" => CounterStoreKind::Memory,
            "json" | "file" => CounterStoreKind::Json,
            "postgres" => CounterStoreKind::Postgres,
            other => {
                return Err(format!(
                    "unknown COUNTER_STORE '{}' (expected none, memory, json or postgres)",
                    other
                )
                .into())
            }
        };

        if counter_store == CounterStoreKind::Postgres && database_url.is_none() {
            return Err("COUNTER_STORE=postgres requires DATABASE_URL".into());
        }

        let environment = match env::var("ENVIRONMENT")
            .unwrap_or_else(|_| "development".to_string())
            .as_str()
        {
            "production" => Environment::Production,
            _ => Environment::Development,
        };

        // Production logs default to JSON for log shippers
        let log_format = match env::var("LOG_FORMAT").ok().as_deref() {
            Some("json") => LogFormat::Json,
            Some("pretty") => LogFormat::Pretty,
            _ if environment == Environment::Production => LogFormat::Json,
            _ => LogFormat::Pretty,
        };

        let config = Config {
            host: env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
            port: env::var("PORT")
                .unwrap_or_else(|_| "5000".to_string())
                .parse()?,
            environment,
            log_format,
            scratch_dir: optional("SCRATCH_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(env::temp_dir),
            max_text_chars: env::var("MAX_TEXT_CHARS")
                .unwrap_or_else(|_| "5000".to_string())
                .parse()?,
            min_artifact_bytes: env::var("MIN_ARTIFACT_BYTES")
                .unwrap_or_else(|_| "200".to_string())
                .parse()?,
            adapter_timeout_secs: env::var("ADAPTER_TIMEOUT_SECS")
                .unwrap_or_else(|_| "20".to_string())
                .parse()?,
            voice_table_path: optional("VOICE_TABLE_PATH").map(PathBuf::from),
            preview_cache_enabled: flag("PREVIEW_CACHE_ENABLED", true),
            azure_speech_key: optional("AZURE_SPEECH_KEY"),
            azure_speech_region: env::var("AZURE_SPEECH_REGION")
                .unwrap_or_else(|_| "eastus".to_string()),
            polly_enabled: flag("POLLY_ENABLED", false),
            aws_region: env::var("AWS_REGION").unwrap_or_else(|_| "us-east-1".to_string()),
            gtts_enabled: flag("GTTS_ENABLED", true),
            espeak_enabled: flag("ESPEAK_ENABLED", true),
            espeak_path: optional("ESPEAK_PATH").map(PathBuf::from),
            counter_store,
            stats_file: optional("STATS_FILE")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from("stats.json")),
            database_url,
        };

        Ok(config)
    }

    pub fn adapter_timeout(&self) -> Duration {
        Duration::from_secs(self.adapter_timeout_secs)
    }

    pub fn dispatcher_settings(&self) -> DispatcherSettings {
        DispatcherSettings {
            scratch_dir: self.scratch_dir.clone(),
            max_text_chars: self.max_text_chars,
            min_artifact_bytes: self.min_artifact_bytes,
            adapter_timeout: self.adapter_timeout(),
            preview_cache_enabled: self.preview_cache_enabled,
        }
    }
}
