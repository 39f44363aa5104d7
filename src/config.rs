use crate::models::{ScoringWeights, TierThresholds};
use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use std::path::{Path, PathBuf};

pub const DEV_JWT_SECRET: &str = "ioffer-dev-secret-change-me";

/// Application configuration
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub server: ServerSettings,
    #[serde(default)]
    pub auth: AuthSettings,
    #[serde(default)]
    pub ai: AiSettings,
    #[serde(default)]
    pub catalog: CatalogSettings,
    #[serde(default)]
    pub recommendation: RecommendationSettings,
    #[serde(default)]
    pub scoring: ScoringSettings,
    #[serde(default)]
    pub logging: LoggingSettings,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerSettings {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    pub workers: Option<usize>,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            workers: None,
        }
    }
}

fn default_host() -> String { "0.0.0.0".to_string() }
fn default_port() -> u16 { 8080 }

#[derive(Debug, Clone, Deserialize)]
pub struct AuthSettings {
    #[serde(default = "default_jwt_secret")]
    pub jwt_secret: String,
    #[serde(default = "default_token_ttl_hours")]
    pub token_ttl_hours: u64,
    #[serde(default = "default_hash_rounds")]
    pub hash_rounds: u32,
    #[serde(default)]
    pub cookie_secure: bool,
}

impl Default for AuthSettings {
    fn default() -> Self {
        Self {
            jwt_secret: default_jwt_secret(),
            token_ttl_hours: default_token_ttl_hours(),
            hash_rounds: default_hash_rounds(),
            cookie_secure: false,
        }
    }
}

fn default_jwt_secret() -> String { DEV_JWT_SECRET.to_string() }
fn default_token_ttl_hours() -> u64 { 24 * 7 }
fn default_hash_rounds() -> u32 { crate::services::auth::DEFAULT_HASH_ROUNDS }

#[derive(Debug, Clone, Deserialize)]
pub struct AiSettings {
    pub endpoint: Option<String>,
    pub api_key: Option<String>,
    #[serde(default = "default_ai_timeout")]
    pub timeout_secs: u64,
}

impl Default for AiSettings {
    fn default() -> Self {
        Self {
            endpoint: None,
            api_key: None,
            timeout_secs: default_ai_timeout(),
        }
    }
}

fn default_ai_timeout() -> u64 { 30 }

#[derive(Debug, Clone, Default, Deserialize)]
pub struct CatalogSettings {
    /// TOML file replacing the embedded school catalog
    pub path: Option<PathBuf>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RecommendationSettings {
    #[serde(default = "default_limit")]
    pub default_limit: usize,
    #[serde(default = "default_max_limit")]
    pub max_limit: usize,
    /// Reject profiles with coerced fields instead of scoring them
    #[serde(default)]
    pub strict_validation: bool,
}

impl Default for RecommendationSettings {
    fn default() -> Self {
        Self {
            default_limit: default_limit(),
            max_limit: default_max_limit(),
            strict_validation: false,
        }
    }
}

fn default_limit() -> usize { crate::core::recommender::DEFAULT_LIMIT }
fn default_max_limit() -> usize { crate::core::recommender::MAX_LIMIT }

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ScoringSettings {
    #[serde(default)]
    pub weights: WeightsConfig,
    #[serde(default)]
    pub tiers: TierConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct WeightsConfig {
    #[serde(default = "default_gpa_weight")]
    pub gpa: f64,
    #[serde(default = "default_toefl_weight")]
    pub toefl: f64,
    #[serde(default = "default_gre_weight")]
    pub gre: f64,
    #[serde(default = "default_major_weight")]
    pub major: f64,
}

impl Default for WeightsConfig {
    fn default() -> Self {
        Self {
            gpa: default_gpa_weight(),
            toefl: default_toefl_weight(),
            gre: default_gre_weight(),
            major: default_major_weight(),
        }
    }
}

fn default_gpa_weight() -> f64 { 0.4 }
fn default_toefl_weight() -> f64 { 0.3 }
fn default_gre_weight() -> f64 { 0.2 }
fn default_major_weight() -> f64 { 0.1 }

#[derive(Debug, Clone, Deserialize)]
pub struct TierConfig {
    #[serde(default = "default_safety_margin")]
    pub safety_margin: f64,
    #[serde(default = "default_match_margin")]
    pub match_margin: f64,
}

impl Default for TierConfig {
    fn default() -> Self {
        Self {
            safety_margin: default_safety_margin(),
            match_margin: default_match_margin(),
        }
    }
}

fn default_safety_margin() -> f64 { 15.0 }
fn default_match_margin() -> f64 { 10.0 }

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingSettings {
    #[serde(default = "default_log_level")]
    pub level: String,
    #[serde(default = "default_log_format")]
    pub format: String,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

fn default_log_level() -> String { "info".to_string() }
fn default_log_format() -> String { "compact".to_string() }

impl Settings {
    /// Load configuration from file and environment variables
    ///
    /// Configuration is loaded in the following order (later overrides earlier):
    /// 1. Default values in the struct
    /// 2. Configuration file (config/default.toml)
    /// 3. Local overrides (config/local.toml)
    /// 4. Environment variables (prefixed with IOFFER__)
    pub fn load() -> Result<Self, ConfigError> {
        let mut settings = Config::builder()
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name("config/local").required(false))
            // e.g., IOFFER__SERVER__PORT -> server.port
            .add_source(environment())
            .build()?;

        settings = substitute_env_vars(settings)?;

        settings.try_deserialize()
    }

    /// Load configuration from a custom path
    pub fn load_from<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let settings = Config::builder()
            .add_source(File::from(path.as_ref()))
            .add_source(environment())
            .build()?;

        substitute_env_vars(settings)?.try_deserialize()
    }

    pub fn weights(&self) -> ScoringWeights {
        let w = &self.scoring.weights;
        ScoringWeights {
            gpa: w.gpa,
            toefl: w.toefl,
            gre: w.gre,
            major: w.major,
        }
    }

    pub fn thresholds(&self) -> TierThresholds {
        TierThresholds {
            safety_margin: self.scoring.tiers.safety_margin,
            match_margin: self.scoring.tiers.match_margin,
        }
    }

    pub fn uses_dev_secret(&self) -> bool {
        self.auth.jwt_secret == DEV_JWT_SECRET
    }
}

fn environment() -> Environment {
    Environment::with_prefix("IOFFER")
        .prefix_separator("__")
        .separator("__")
        .try_parsing(true)
}

/// Apply the conventional unprefixed variables on top of the layered config
///
/// `JWT_SECRET`, `AI_API_KEY` and `AI_ENDPOINT` are what the deployment
/// environment already provides.
fn substitute_env_vars(settings: Config) -> Result<Config, ConfigError> {
    use std::env;

    let mut builder = Config::builder().add_source(settings);

    if let Ok(secret) = env::var("JWT_SECRET") {
        builder = builder.set_override("auth.jwt_secret", secret)?;
    }
    if let Ok(api_key) = env::var("AI_API_KEY") {
        builder = builder.set_override("ai.api_key", api_key)?;
    }
    if let Ok(endpoint) = env::var("AI_ENDPOINT") {
        builder = builder.set_override("ai.endpoint", endpoint)?;
    }

    builder.build()
}
