//! Configuration module for the Birthday Wishes backend.
//!
//! All configuration is loaded from environment variables with sensible defaults.

use std::env;
use std::fmt;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    /// Path to SQLite database file
    pub db_path: PathBuf,
    /// Address to bind the server to
    pub bind_addr: SocketAddr,
    /// Log level (trace, debug, info, warn, error)
    pub log_level: String,
    /// Emit logs as JSON lines instead of plain text
    pub log_json: bool,
    /// Public URL of the web client, used to build share links
    pub app_url: String,
    /// Maximum accepted request body size in bytes
    pub max_upload_bytes: usize,
    pub mail: MailConfig,
    pub images: ImageHostConfig,
}

/// Outbound mail relay settings.
#[derive(Debug, Clone)]
pub struct MailConfig {
    pub smtp_host: String,
    /// Account used to authenticate and as the sender address
    pub username: Option<String>,
    pub password: Option<String>,
    pub from_name: String,
    pub timeout: Duration,
}

/// Image host settings.
#[derive(Debug, Clone)]
pub struct ImageHostConfig {
    pub api_base: String,
    pub cloud_name: Option<String>,
    /// Account credentials for signed uploads
    pub api_key: Option<String>,
    pub api_secret: Option<String>,
    /// Used on its own for unsigned uploads when no credentials are set
    pub upload_preset: Option<String>,
    pub timeout: Duration,
}

/// Raised when an environment variable holds a value that cannot be used.
#[derive(Debug)]
pub struct ConfigError(pub String);

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "configuration error: {}", self.0)
    }
}

impl std::error::Error for ConfigError {}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let db_path = var_or("BIRTHDAY_DB_PATH", "./data/birthdays.sqlite").into();
        let bind_addr = parse_var("BIRTHDAY_BIND_ADDR", "127.0.0.1:5500")?;
        let log_level = var_or("BIRTHDAY_LOG_LEVEL", "info");
        let log_json = var_or("BIRTHDAY_LOG_FORMAT", "text").eq_ignore_ascii_case("json");
        let app_url = var_or("BIRTHDAY_APP_URL", "http://localhost:5173");
        let max_upload_bytes = parse_var("BIRTHDAY_MAX_UPLOAD_BYTES", "10485760")?;

        let mail = MailConfig {
            smtp_host: var_or("SMTP_HOST", "smtp.gmail.com"),
            username: optional_var("EMAIL_USER"),
            password: optional_var("EMAIL_PASS"),
            from_name: var_or("EMAIL_FROM_NAME", "Birthday Wishes"),
            timeout: Duration::from_secs(parse_var("MAIL_TIMEOUT_SECS", "120")?),
        };

        let images = ImageHostConfig {
            api_base: var_or("CLOUDINARY_API_BASE", "https://api.cloudinary.com"),
            cloud_name: optional_var("CLOUDINARY_CLOUD_NAME"),
            api_key: optional_var("CLOUDINARY_API_KEY"),
            api_secret: optional_var("CLOUDINARY_API_SECRET"),
            upload_preset: optional_var("CLOUDINARY_UPLOAD_PRESET"),
            timeout: Duration::from_secs(parse_var("UPLOAD_TIMEOUT_SECS", "120")?),
        };

        Ok(Self {
            db_path,
            bind_addr,
            log_level,
            log_json,
            app_url,
            max_upload_bytes,
            mail,
            images,
        })
    }
}

fn var_or(key: &str, default: &str) -> String {
    env::var(key).unwrap_or_else(|_| default.to_string())
}

/// Unset and blank values are both treated as absent.
fn optional_var(key: &str) -> Option<String> {
    env::var(key).ok().filter(|v| !v.trim().is_empty())
}

fn parse_var<T>(key: &str, default: &str) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: fmt::Display,
{
    var_or(key, default)
        .parse()
        .map_err(|e| ConfigError(format!("invalid {key}: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use once_cell::sync::Lazy;
    use std::sync::Mutex;

    // Tests in this module mutate the process environment.
    static ENV_LOCK: Lazy<Mutex<()>> = Lazy::new(|| Mutex::new(()));

    const VARS: &[&str] = &[
        "BIRTHDAY_DB_PATH",
        "BIRTHDAY_BIND_ADDR",
        "BIRTHDAY_LOG_LEVEL",
        "BIRTHDAY_LOG_FORMAT",
        "BIRTHDAY_APP_URL",
        "BIRTHDAY_MAX_UPLOAD_BYTES",
        "SMTP_HOST",
        "EMAIL_USER",
        "EMAIL_PASS",
        "EMAIL_FROM_NAME",
        "MAIL_TIMEOUT_SECS",
        "CLOUDINARY_API_BASE",
        "CLOUDINARY_CLOUD_NAME",
        "CLOUDINARY_API_KEY",
        "CLOUDINARY_API_SECRET",
        "CLOUDINARY_UPLOAD_PRESET",
        "UPLOAD_TIMEOUT_SECS",
    ];

    fn clear_env() {
        for key in VARS {
            env::remove_var(key);
        }
    }

    #[test]
    fn test_default_config() {
        let _guard = ENV_LOCK.lock().unwrap();
        clear_env();

        let config = Config::from_env().unwrap();

        assert_eq!(config.db_path, PathBuf::from("./data/birthdays.sqlite"));
        assert_eq!(config.bind_addr.to_string(), "127.0.0.1:5500");
        assert_eq!(config.log_level, "info");
        assert!(!config.log_json);
        assert_eq!(config.app_url, "http://localhost:5173");
        assert_eq!(config.max_upload_bytes, 10 * 1024 * 1024);
        assert_eq!(config.mail.smtp_host, "smtp.gmail.com");
        assert!(config.mail.username.is_none());
        assert_eq!(config.mail.from_name, "Birthday Wishes");
        assert_eq!(config.mail.timeout, Duration::from_secs(120));
        assert!(config.images.cloud_name.is_none());
        assert!(config.images.api_key.is_none());
        assert_eq!(config.images.timeout, Duration::from_secs(120));
    }

    #[test]
    fn test_overrides_and_blank_credentials() {
        let _guard = ENV_LOCK.lock().unwrap();
        clear_env();
        env::set_var("BIRTHDAY_LOG_FORMAT", "JSON");
        env::set_var("BIRTHDAY_APP_URL", "https://wishes.example.com");
        env::set_var("EMAIL_USER", "   ");
        env::set_var("CLOUDINARY_CLOUD_NAME", "demo");
        env::set_var("CLOUDINARY_API_KEY", "123456");
        env::set_var("CLOUDINARY_API_SECRET", "abcd");
        env::set_var("UPLOAD_TIMEOUT_SECS", "30");

        let config = Config::from_env().unwrap();
        clear_env();

        assert!(config.log_json);
        assert_eq!(config.app_url, "https://wishes.example.com");
        assert!(config.mail.username.is_none());
        assert_eq!(config.images.cloud_name.as_deref(), Some("demo"));
        assert_eq!(config.images.api_key.as_deref(), Some("123456"));
        assert_eq!(config.images.api_secret.as_deref(), Some("abcd"));
        assert_eq!(config.images.timeout, Duration::from_secs(30));
    }

    #[test]
    fn test_invalid_bind_addr_is_rejected() {
        let _guard = ENV_LOCK.lock().unwrap();
        clear_env();
        env::set_var("BIRTHDAY_BIND_ADDR", "not-an-address");

        let err = Config::from_env().unwrap_err();
        clear_env();

        assert!(err.to_string().contains("BIRTHDAY_BIND_ADDR"));
    }
}
