//! Configuration module
//!
//! Settings are read once from the environment (with `.env` support) at process start
//! and handed to every component by reference.

use std::env;
use std::path::PathBuf;

use crate::storage_types::StorageBackend;

const SERVER_PORT: u16 = 8080;
const MAX_CONNECTIONS: u32 = 20;
const CONNECTION_TIMEOUT_SECS: u64 = 30;
const MAX_UPLOAD_SIZE_MB: usize = 7;
const MAX_FRAME_COUNT: usize = 1024;
const TRANSCODE_TIMEOUT_SECS: u64 = 120;
const PURGE_RETRY_ATTEMPTS: u32 = 3;

/// Server, database and authentication settings
#[derive(Clone, Debug)]
pub struct BaseConfig {
    pub server_port: u16,
    pub database_url: String,
    pub db_max_connections: u32,
    pub db_timeout_seconds: u64,
    pub jwt_secret: String,
    pub environment: String,
    pub log_format: String,
}

/// Pipeline settings: storage, scratch space, transcoder and limits
#[derive(Clone, Debug)]
pub struct PipelineConfig {
    pub base: BaseConfig,
    pub storage_backend: StorageBackend,
    pub cdn_bucket: String,
    pub s3_region: Option<String>,
    pub s3_endpoint: Option<String>,
    pub local_storage_path: String,
    pub temp_file_store: PathBuf,
    pub max_upload_size_bytes: usize,
    pub max_frame_count: usize,
    pub magick_path: String,
    pub transcode_timeout_secs: u64,
    pub purge_retry_attempts: u32,
    pub discord_webhook_url: Option<String>,
}

/// Application configuration.
#[derive(Clone, Debug)]
pub struct Config(pub Box<PipelineConfig>);

impl Config {
    pub fn from_env() -> Result<Self, anyhow::Error> {
        let config = PipelineConfig::from_env()?;
        Ok(Config(Box::new(config)))
    }

    pub fn validate(&self) -> Result<(), anyhow::Error> {
        self.0.validate()
    }

    pub fn as_pipeline(&self) -> &PipelineConfig {
        &self.0
    }

    pub fn server_port(&self) -> u16 {
        self.0.base.server_port
    }

    pub fn database_url(&self) -> &str {
        &self.0.base.database_url
    }

    pub fn db_max_connections(&self) -> u32 {
        self.0.base.db_max_connections
    }

    pub fn db_timeout_seconds(&self) -> u64 {
        self.0.base.db_timeout_seconds
    }

    pub fn jwt_secret(&self) -> &str {
        &self.0.base.jwt_secret
    }

    pub fn environment(&self) -> &str {
        &self.0.base.environment
    }

    pub fn is_production(&self) -> bool {
        let env = self.environment().to_lowercase();
        env == "production" || env == "prod"
    }

    pub fn log_format(&self) -> &str {
        &self.0.base.log_format
    }

    pub fn storage_backend(&self) -> StorageBackend {
        self.0.storage_backend
    }

    pub fn cdn_bucket(&self) -> &str {
        &self.0.cdn_bucket
    }

    pub fn s3_region(&self) -> Option<&str> {
        self.0.s3_region.as_deref()
    }

    pub fn s3_endpoint(&self) -> Option<&str> {
        self.0.s3_endpoint.as_deref()
    }

    pub fn local_storage_path(&self) -> &str {
        &self.0.local_storage_path
    }

    pub fn temp_file_store(&self) -> &PathBuf {
        &self.0.temp_file_store
    }

    pub fn max_upload_size_bytes(&self) -> usize {
        self.0.max_upload_size_bytes
    }

    pub fn max_frame_count(&self) -> usize {
        self.0.max_frame_count
    }

    pub fn magick_path(&self) -> &str {
        &self.0.magick_path
    }

    pub fn transcode_timeout_secs(&self) -> u64 {
        self.0.transcode_timeout_secs
    }

    pub fn purge_retry_attempts(&self) -> u32 {
        self.0.purge_retry_attempts
    }

    pub fn discord_webhook_url(&self) -> Option<&str> {
        self.0.discord_webhook_url.as_deref()
    }
}

fn env_or<T: std::str::FromStr>(key: &str, default: T) -> T {
    env::var(key)
        .ok()
        .and_then(|v| v.trim().parse::<T>().ok())
        .unwrap_or(default)
}

fn env_opt(key: &str) -> Option<String> {
    env::var(key).ok().filter(|v| !v.trim().is_empty())
}

impl PipelineConfig {
    pub fn from_env() -> Result<Self, anyhow::Error> {
        dotenvy::dotenv().ok();

        let environment = env::var("ENVIRONMENT")
            .or_else(|_| env::var("APP_ENV"))
            .unwrap_or_else(|_| "development".to_string());

        let database_url = env::var("DATABASE_URL")
            .map_err(|_| anyhow::anyhow!("DATABASE_URL must be set"))?;
        let jwt_secret =
            env::var("JWT_SECRET").map_err(|_| anyhow::anyhow!("JWT_SECRET must be set"))?;

        let base = BaseConfig {
            server_port: env_or("SERVER_PORT", SERVER_PORT),
            database_url,
            db_max_connections: env_or("DB_MAX_CONNECTIONS", MAX_CONNECTIONS),
            db_timeout_seconds: env_or("DB_TIMEOUT_SECONDS", CONNECTION_TIMEOUT_SECS),
            jwt_secret,
            environment,
            log_format: env::var("LOG_FORMAT").unwrap_or_else(|_| "compact".to_string()),
        };

        let storage_backend = env::var("STORAGE_BACKEND")
            .unwrap_or_else(|_| "s3".to_string())
            .parse::<StorageBackend>()?;

        let temp_file_store = env_opt("TEMP_FILE_STORE")
            .map(PathBuf::from)
            .unwrap_or_else(env::temp_dir);

        let max_upload_size_mb: usize = env_or("MAX_UPLOAD_SIZE_MB", MAX_UPLOAD_SIZE_MB);

        let config = Self {
            base,
            storage_backend,
            cdn_bucket: env::var("CDN_BUCKET").unwrap_or_else(|_| "emotes".to_string()),
            s3_region: env_opt("S3_REGION").or_else(|| env_opt("AWS_REGION")),
            s3_endpoint: env_opt("S3_ENDPOINT"),
            local_storage_path: env::var("LOCAL_STORAGE_PATH")
                .unwrap_or_else(|_| "./storage".to_string()),
            temp_file_store,
            max_upload_size_bytes: max_upload_size_mb * 1024 * 1024,
            max_frame_count: env_or("MAX_FRAME_COUNT", MAX_FRAME_COUNT),
            magick_path: env::var("MAGICK_PATH").unwrap_or_else(|_| "convert".to_string()),
            transcode_timeout_secs: env_or("TRANSCODE_TIMEOUT_SECS", TRANSCODE_TIMEOUT_SECS),
            purge_retry_attempts: env_or("PURGE_RETRY_ATTEMPTS", PURGE_RETRY_ATTEMPTS),
            discord_webhook_url: env_opt("DISCORD_WEBHOOK_URL"),
        };

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), anyhow::Error> {
        if self.base.jwt_secret.len() < 32 {
            return Err(anyhow::anyhow!(
                "JWT_SECRET must be at least 32 characters long"
            ));
        }

        if !self.base.database_url.starts_with("postgres://")
            && !self.base.database_url.starts_with("postgresql://")
        {
            return Err(anyhow::anyhow!(
                "DATABASE_URL must be a valid PostgreSQL connection string"
            ));
        }

        if self.cdn_bucket.trim().is_empty() {
            return Err(anyhow::anyhow!("CDN_BUCKET cannot be empty"));
        }

        if self.max_frame_count == 0 {
            return Err(anyhow::anyhow!("MAX_FRAME_COUNT must be greater than 0"));
        }

        if self.purge_retry_attempts == 0 {
            return Err(anyhow::anyhow!(
                "PURGE_RETRY_ATTEMPTS must be at least 1"
            ));
        }

        Ok(())
    }
}
