//! Application configuration management.

use serde::Deserialize;

/// Application configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    /// Server configuration.
    #[serde(default)]
    pub server: ServerConfig,
    /// Payment processor configuration.
    pub gateway: GatewayConfig,
    /// Cross-origin configuration.
    #[serde(default)]
    pub cors: CorsConfig,
    /// Transaction ledger sizing.
    #[serde(default)]
    pub ledger: LedgerConfig,
    /// Rate limiting thresholds.
    #[serde(default)]
    pub rate_limit: RateLimitConfig,
}

/// Server configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// Host to bind to.
    #[serde(default = "default_host")]
    pub host: String,
    /// Port to listen on.
    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    10000
}

/// Payment processor configuration.
///
/// `base_url` and `auth_token` carry no defaults: startup must abort
/// rather than run against a half-configured processor.
#[derive(Debug, Clone, Deserialize)]
pub struct GatewayConfig {
    /// Base URL of the processor API.
    pub base_url: String,
    /// Credential sent verbatim in the Authorization header.
    pub auth_token: String,
    /// Timeout for processor calls, in seconds.
    #[serde(default = "default_gateway_timeout")]
    pub timeout_secs: u64,
    /// Network code applied when an initiation request omits one.
    #[serde(default)]
    pub default_network_code: Option<String>,
}

fn default_gateway_timeout() -> u64 {
    30
}

/// Cross-origin configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct CorsConfig {
    /// Browser origin allowed to call the API, or `*` for any.
    #[serde(default = "default_allowed_origin")]
    pub allowed_origin: String,
}

impl Default for CorsConfig {
    fn default() -> Self {
        Self {
            allowed_origin: default_allowed_origin(),
        }
    }
}

fn default_allowed_origin() -> String {
    "*".to_string()
}

/// Transaction ledger sizing.
#[derive(Debug, Clone, Deserialize)]
pub struct LedgerConfig {
    /// Maximum number of references tracked at once.
    #[serde(default = "default_ledger_capacity")]
    pub max_capacity: u64,
    /// Seconds a record survives after its last update.
    #[serde(default = "default_ledger_ttl")]
    pub ttl_secs: u64,
}

impl Default for LedgerConfig {
    fn default() -> Self {
        Self {
            max_capacity: default_ledger_capacity(),
            ttl_secs: default_ledger_ttl(),
        }
    }
}

fn default_ledger_capacity() -> u64 {
    10_000
}

fn default_ledger_ttl() -> u64 {
    86_400 // 24 hours
}

/// Rate limiting thresholds.
#[derive(Debug, Clone, Deserialize)]
pub struct RateLimitConfig {
    /// Requests allowed per client per window. Zero disables limiting.
    #[serde(default = "default_max_requests")]
    pub max_requests: u32,
    /// Window length in seconds.
    #[serde(default = "default_window_secs")]
    pub window_secs: u64,
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            max_requests: default_max_requests(),
            window_secs: default_window_secs(),
        }
    }
}

fn default_max_requests() -> u32 {
    60
}

fn default_window_secs() -> u64 {
    60
}

impl AppConfig {
    /// Loads configuration from environment and config files.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration cannot be loaded, including when
    /// the required gateway credentials are absent from every source.
    pub fn load() -> Result<Self, config::ConfigError> {
        let run_mode = std::env::var("RUN_MODE").unwrap_or_else(|_| "development".to_string());

        let config = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name(&format!("config/{run_mode}")).required(false))
            .add_source(config::Environment::with_prefix("MALIPO").separator("__"))
            .build()?;

        config.try_deserialize()
    }
}
