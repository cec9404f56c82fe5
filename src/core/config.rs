use std::env;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use sqlx::postgres::PgSslMode;

use crate::shared::constants::{
    ALLOWED_PHOTO_MIME_TYPES, DEFAULT_UPLOAD_DIR, MAX_PHOTOS_PER_REPORT, MAX_PHOTO_SIZE,
};

#[derive(Debug, Clone)]
pub struct Config {
    pub app: AppConfig,
    pub database: DatabaseConfig,
    pub upload: UploadConfig,
    pub notification: NotificationConfig,
    pub swagger: SwaggerConfig,
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub cors_allowed_origins: Vec<String>,
    pub max_request_body_size: usize,
}

/// Connection parameters for the reports database.
///
/// The connection is described by discrete parts rather than a URL so that
/// the TLS policy is always an explicit, visible setting.
#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    pub host: String,
    pub port: u16,
    pub name: String,
    pub username: String,
    pub password: String,
    pub ssl_mode: DatabaseSslMode,
    pub ssl_root_cert: Option<PathBuf>,
    pub max_connections: u32,
    pub min_connections: u32,
    pub acquire_timeout_secs: u64,
    pub idle_timeout_secs: u64,
    pub max_lifetime_secs: u64,
    pub run_migrations: bool,
}

/// TLS policy for the database connection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DatabaseSslMode {
    Disable,
    Prefer,
    Require,
    VerifyCa,
    #[default]
    VerifyFull,
}

/// Photo upload policy and storage location
#[derive(Debug, Clone)]
pub struct UploadConfig {
    pub dir: PathBuf,
    pub max_files: usize,
    pub max_file_size: usize,
    pub allowed_mime_types: Vec<String>,
    /// Echo per-file rejection reasons back in the success body
    pub expose_rejections: bool,
}

#[derive(Debug, Clone)]
pub struct NotificationConfig {
    pub webhook_url: Option<String>,
    pub recipient: Option<String>,
    pub sender: String,
    pub timeout: Duration,
}

#[derive(Debug, Clone)]
pub struct SwaggerConfig {
    pub username: Option<String>,
    pub password: Option<String>,
    pub title: String,
    pub version: String,
    pub description: String,
}

impl Config {
    pub fn from_env() -> Result<Self, String> {
        // Load .env file if exists, ignore if not found (optional for production)
        if let Err(e) = dotenvy::dotenv() {
            if !e.to_string().contains("not found") {
                eprintln!("Warning: Error loading .env file: {}", e);
            }
        }

        Ok(Config {
            app: AppConfig::from_env()?,
            database: DatabaseConfig::from_env()?,
            upload: UploadConfig::from_env()?,
            notification: NotificationConfig::from_env()?,
            swagger: SwaggerConfig::from_env()?,
        })
    }
}

impl AppConfig {
    // 5 photos at the per-file cap plus room for the text fields and multipart framing.
    // Applies to the whole body, including photo slots past UPLOAD_MAX_FILES.
    const DEFAULT_MAX_REQUEST_BODY_SIZE: usize = 48 * 1024 * 1024;

    pub fn from_env() -> Result<Self, String> {
        let host = env::var("HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
        let port = env::var("PORT")
            .unwrap_or_else(|_| "3000".to_string())
            .parse::<u16>()
            .map_err(|e| format!("Invalid PORT: {}", e))?;

        let cors_allowed_origins =
            parse_list(&env::var("CORS_ALLOWED_ORIGINS").unwrap_or_else(|_| "*".to_string()));

        let max_request_body_size = env::var("MAX_REQUEST_BODY_SIZE")
            .unwrap_or_else(|_| Self::DEFAULT_MAX_REQUEST_BODY_SIZE.to_string())
            .parse::<usize>()
            .map_err(|_| "MAX_REQUEST_BODY_SIZE must be a valid number".to_string())?;

        Ok(Self {
            host,
            port,
            cors_allowed_origins,
            max_request_body_size,
        })
    }

    pub fn server_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl DatabaseConfig {
    const DEFAULT_PORT: u16 = 5432;
    const DEFAULT_MAX_CONNECTIONS: u32 = 10;
    const DEFAULT_MIN_CONNECTIONS: u32 = 0;
    const DEFAULT_ACQUIRE_TIMEOUT_SECS: u64 = 5;
    const DEFAULT_IDLE_TIMEOUT_SECS: u64 = 600; // 10 minutes
    const DEFAULT_MAX_LIFETIME_SECS: u64 = 1800; // 30 minutes

    pub fn from_env() -> Result<Self, String> {
        let host = env::var("DB_HOST").unwrap_or_else(|_| "localhost".to_string());

        let port = env::var("DB_PORT")
            .unwrap_or_else(|_| Self::DEFAULT_PORT.to_string())
            .parse::<u16>()
            .map_err(|_| "DB_PORT must be a valid port number".to_string())?;

        let name = env::var("DB_NAME").unwrap_or_else(|_| "civic_reports".to_string());

        let username =
            env::var("DB_USERNAME").map_err(|_| "DB_USERNAME must be set".to_string())?;
        let password = env::var("DB_PASSWORD").unwrap_or_default();

        let ssl_mode = match env::var("DB_SSL_MODE") {
            Ok(value) => value.parse::<DatabaseSslMode>()?,
            Err(_) => DatabaseSslMode::default(),
        };

        let ssl_root_cert = env::var("DB_SSL_ROOT_CERT")
            .ok()
            .filter(|s| !s.is_empty())
            .map(PathBuf::from);

        let max_connections = env::var("DB_MAX_CONNECTIONS")
            .unwrap_or_else(|_| Self::DEFAULT_MAX_CONNECTIONS.to_string())
            .parse::<u32>()
            .map_err(|_| "DB_MAX_CONNECTIONS must be a valid number".to_string())?;

        let min_connections = env::var("DB_MIN_CONNECTIONS")
            .unwrap_or_else(|_| Self::DEFAULT_MIN_CONNECTIONS.to_string())
            .parse::<u32>()
            .map_err(|_| "DB_MIN_CONNECTIONS must be a valid number".to_string())?;

        let acquire_timeout_secs = env::var("DB_ACQUIRE_TIMEOUT_SECS")
            .unwrap_or_else(|_| Self::DEFAULT_ACQUIRE_TIMEOUT_SECS.to_string())
            .parse::<u64>()
            .map_err(|_| "DB_ACQUIRE_TIMEOUT_SECS must be a valid number".to_string())?;

        let idle_timeout_secs = env::var("DB_IDLE_TIMEOUT_SECS")
            .unwrap_or_else(|_| Self::DEFAULT_IDLE_TIMEOUT_SECS.to_string())
            .parse::<u64>()
            .map_err(|_| "DB_IDLE_TIMEOUT_SECS must be a valid number".to_string())?;

        let max_lifetime_secs = env::var("DB_MAX_LIFETIME_SECS")
            .unwrap_or_else(|_| Self::DEFAULT_MAX_LIFETIME_SECS.to_string())
            .parse::<u64>()
            .map_err(|_| "DB_MAX_LIFETIME_SECS must be a valid number".to_string())?;

        let run_migrations = parse_bool(
            "DB_RUN_MIGRATIONS",
            &env::var("DB_RUN_MIGRATIONS").unwrap_or_else(|_| "true".to_string()),
        )?;

        Ok(Self {
            host,
            port,
            name,
            username,
            password,
            ssl_mode,
            ssl_root_cert,
            max_connections,
            min_connections,
            acquire_timeout_secs,
            idle_timeout_secs,
            max_lifetime_secs,
            run_migrations,
        })
    }
}

impl FromStr for DatabaseSslMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "disable" => Ok(Self::Disable),
            "prefer" => Ok(Self::Prefer),
            "require" => Ok(Self::Require),
            "verify-ca" => Ok(Self::VerifyCa),
            "verify-full" => Ok(Self::VerifyFull),
            other => Err(format!(
                "DB_SSL_MODE must be one of disable, prefer, require, verify-ca, verify-full (got '{}')",
                other
            )),
        }
    }
}

impl From<DatabaseSslMode> for PgSslMode {
    fn from(mode: DatabaseSslMode) -> Self {
        match mode {
            DatabaseSslMode::Disable => PgSslMode::Disable,
            DatabaseSslMode::Prefer => PgSslMode::Prefer,
            DatabaseSslMode::Require => PgSslMode::Require,
            DatabaseSslMode::VerifyCa => PgSslMode::VerifyCa,
            DatabaseSslMode::VerifyFull => PgSslMode::VerifyFull,
        }
    }
}

impl Default for UploadConfig {
    fn default() -> Self {
        Self {
            dir: PathBuf::from(DEFAULT_UPLOAD_DIR),
            max_files: MAX_PHOTOS_PER_REPORT,
            max_file_size: MAX_PHOTO_SIZE,
            allowed_mime_types: ALLOWED_PHOTO_MIME_TYPES
                .iter()
                .map(|s| s.to_string())
                .collect(),
            expose_rejections: false,
        }
    }
}

impl UploadConfig {
    pub fn from_env() -> Result<Self, String> {
        let defaults = Self::default();

        let dir = env::var("UPLOAD_DIR")
            .ok()
            .filter(|s| !s.is_empty())
            .map(PathBuf::from)
            .unwrap_or(defaults.dir);

        let max_files = env::var("UPLOAD_MAX_FILES")
            .unwrap_or_else(|_| defaults.max_files.to_string())
            .parse::<usize>()
            .map_err(|_| "UPLOAD_MAX_FILES must be a valid number".to_string())?;

        let max_file_size = env::var("UPLOAD_MAX_FILE_SIZE")
            .unwrap_or_else(|_| defaults.max_file_size.to_string())
            .parse::<usize>()
            .map_err(|_| "UPLOAD_MAX_FILE_SIZE must be a valid number".to_string())?;

        let expose_rejections = parse_bool(
            "UPLOAD_EXPOSE_REJECTIONS",
            &env::var("UPLOAD_EXPOSE_REJECTIONS").unwrap_or_else(|_| "false".to_string()),
        )?;

        Ok(Self {
            dir,
            max_files,
            max_file_size,
            allowed_mime_types: defaults.allowed_mime_types,
            expose_rejections,
        })
    }

    pub fn is_mime_type_allowed(&self, content_type: &str) -> bool {
        self.allowed_mime_types.iter().any(|t| t == content_type)
    }
}

impl NotificationConfig {
    const DEFAULT_TIMEOUT_SECS: u64 = 10;

    pub fn from_env() -> Result<Self, String> {
        let webhook_url = env::var("NOTIFY_WEBHOOK_URL")
            .ok()
            .filter(|s| !s.is_empty());
        let recipient = env::var("NOTIFY_RECIPIENT").ok().filter(|s| !s.is_empty());
        let sender = env::var("NOTIFY_SENDER").unwrap_or_else(|_| "noreply@localhost".to_string());

        let timeout_secs = env::var("NOTIFY_TIMEOUT_SECS")
            .unwrap_or_else(|_| Self::DEFAULT_TIMEOUT_SECS.to_string())
            .parse::<u64>()
            .map_err(|_| "NOTIFY_TIMEOUT_SECS must be a valid number".to_string())?;

        Ok(Self {
            webhook_url,
            recipient,
            sender,
            timeout: Duration::from_secs(timeout_secs),
        })
    }
}

impl SwaggerConfig {
    pub fn from_env() -> Result<Self, String> {
        // Only use credentials if they are non-empty
        let username = env::var("SWAGGER_USERNAME").ok().filter(|s| !s.is_empty());
        let password = env::var("SWAGGER_PASSWORD").ok().filter(|s| !s.is_empty());
        let title =
            env::var("SWAGGER_TITLE").unwrap_or_else(|_| "Civic Report Intake API".to_string());
        let version = env::var("SWAGGER_VERSION").unwrap_or_else(|_| "0.1.0".to_string());
        let description = env::var("SWAGGER_DESCRIPTION")
            .unwrap_or_else(|_| "Citizen problem report submission".to_string());

        Ok(Self {
            username,
            password,
            title,
            version,
            description,
        })
    }

    /// Returns credentials in "username:password" format if auth is enabled
    pub fn credentials(&self) -> Option<String> {
        match (&self.username, &self.password) {
            (Some(user), Some(pass)) => Some(format!("{}:{}", user, pass)),
            _ => None,
        }
    }
}

fn parse_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}

fn parse_bool(name: &str, raw: &str) -> Result<bool, String> {
    match raw.trim().to_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(format!("{} must be a boolean (true/false)", name)),
    }
}
