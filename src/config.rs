//! Process configuration read from environment variables (and `.env`).

use std::path::PathBuf;
use std::time::Duration;

pub const DEFAULT_PORT: u16 = 3000;
pub const DEFAULT_COOKIE_NAME: &str = "wordgame.sid";
pub const DEFAULT_COOKIE_MAX_AGE_SECS: u64 = 7 * 24 * 60 * 60;
pub const DEFAULT_TITLE_SUFFIX: &str = "Board Games";
pub const DEFAULT_SWEEP_SECS: u64 = 60;

#[derive(Debug, thiserror::Error, PartialEq)]
pub enum ConfigError {
    #[error("Invalid value for {key}: {value:?}")]
    InvalidValue { key: &'static str, value: String },
}

/// Application configuration
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub port: u16,
    /// JSON card data loaded at startup
    pub words_path: PathBuf,
    /// Directory served for static assets
    pub public_dir: PathBuf,
    pub cookie_name: String,
    pub cookie_max_age: Duration,
    /// Secret used to sign session cookies
    pub session_secret: String,
    pub title_suffix: String,
    /// External login page (None = no login link)
    pub login_url: Option<String>,
    /// Stop running rounds server-side once their end time passes
    pub enforce_round_expiry: bool,
    pub session_sweep_interval: Duration,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            port: DEFAULT_PORT,
            words_path: PathBuf::from("data/cards.json"),
            public_dir: PathBuf::from("public"),
            cookie_name: DEFAULT_COOKIE_NAME.to_string(),
            cookie_max_age: Duration::from_secs(DEFAULT_COOKIE_MAX_AGE_SECS),
            session_secret: random_secret(),
            title_suffix: DEFAULT_TITLE_SUFFIX.to_string(),
            login_url: None,
            enforce_round_expiry: false,
            session_sweep_interval: Duration::from_secs(DEFAULT_SWEEP_SECS),
        }
    }
}

impl AppConfig {
    /// Load config from environment variables, falling back to defaults
    pub fn from_env() -> Result<Self, ConfigError> {
        let defaults = Self::default();

        let port = parse_var("PORT")?.unwrap_or(defaults.port);

        let words_path = string_var("WORDS_PATH")
            .map(PathBuf::from)
            .unwrap_or(defaults.words_path);

        let public_dir = string_var("PUBLIC_DIR")
            .map(PathBuf::from)
            .unwrap_or(defaults.public_dir);

        let cookie_name = string_var("COOKIE_NAME").unwrap_or(defaults.cookie_name);

        let cookie_max_age = parse_var::<u64>("COOKIE_MAX_AGE_SECS")?
            .map(Duration::from_secs)
            .unwrap_or(defaults.cookie_max_age);

        let session_secret = match string_var("SESSION_SECRET") {
            Some(secret) => secret,
            None => {
                tracing::warn!(
                    "SESSION_SECRET not set, sessions will not survive a restart"
                );
                defaults.session_secret
            }
        };

        let title_suffix = string_var("TITLE_SUFFIX").unwrap_or(defaults.title_suffix);

        let login_url = string_var("LOGIN_URL");

        let enforce_round_expiry = bool_var("ENFORCE_ROUND_EXPIRY")?.unwrap_or(false);

        let session_sweep_interval = parse_var::<u64>("SESSION_SWEEP_SECS")?
            .filter(|secs| *secs > 0)
            .map(Duration::from_secs)
            .unwrap_or(defaults.session_sweep_interval);

        tracing::info!(
            port,
            words_path = %words_path.display(),
            cookie_name = %cookie_name,
            cookie_max_age_secs = cookie_max_age.as_secs(),
            login_enabled = login_url.is_some(),
            enforce_round_expiry,
            "Config loaded"
        );

        Ok(Self {
            port,
            words_path,
            public_dir,
            cookie_name,
            cookie_max_age,
            session_secret,
            title_suffix,
            login_url,
            enforce_round_expiry,
            session_sweep_interval,
        })
    }
}

fn string_var(key: &str) -> Option<String> {
    std::env::var(key)
        .ok()
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}

fn parse_var<T: std::str::FromStr>(key: &'static str) -> Result<Option<T>, ConfigError> {
    match string_var(key) {
        Some(value) => value
            .parse()
            .map(Some)
            .map_err(|_| ConfigError::InvalidValue { key, value }),
        None => Ok(None),
    }
}

fn bool_var(key: &'static str) -> Result<Option<bool>, ConfigError> {
    match string_var(key) {
        Some(value) => match value.to_lowercase().as_str() {
            "1" | "true" | "yes" | "on" => Ok(Some(true)),
            "0" | "false" | "no" | "off" => Ok(Some(false)),
            _ => Err(ConfigError::InvalidValue { key, value }),
        },
        None => Ok(None),
    }
}

fn random_secret() -> String {
    use rand::Rng;
    let bytes: [u8; 32] = rand::rng().random();
    hex::encode(bytes)
}
