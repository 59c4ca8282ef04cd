use centace_core::funding::FundingLimits;
use centace_core::types::Money;

use crate::auth::jwt::JwtConfig;

/// Server configuration loaded from environment variables.
///
/// All fields except the JWT secret have defaults suitable for local
/// development. In production, override via environment variables.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Bind address (default: `0.0.0.0`).
    pub host: String,
    /// Bind port (default: `3000`).
    pub port: u16,
    /// Allowed CORS origins, parsed from comma-separated `CORS_ORIGINS` env var.
    pub cors_origins: Vec<String>,
    /// HTTP request timeout in seconds (default: `30`).
    pub request_timeout_secs: u64,
    /// How long to wait for background tasks on shutdown (default: `30`).
    pub shutdown_timeout_secs: u64,
    /// How often expired sessions are purged (default: `3600`).
    pub session_cleanup_interval_secs: u64,
    /// JWT token configuration (secret, expiry durations).
    pub jwt: JwtConfig,
    /// Per-request deposit and withdrawal bounds.
    pub funding_limits: FundingLimits,
}

impl ServerConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                         | Default                 |
    /// |---------------------------------|-------------------------|
    /// | `HOST`                          | `0.0.0.0`               |
    /// | `PORT`                          | `3000`                  |
    /// | `CORS_ORIGINS`                  | `http://localhost:5173` |
    /// | `REQUEST_TIMEOUT_SECS`          | `30`                    |
    /// | `SHUTDOWN_TIMEOUT_SECS`         | `30`                    |
    /// | `SESSION_CLEANUP_INTERVAL_SECS` | `3600`                  |
    /// | `MIN_DEPOSIT`                   | `10`                    |
    /// | `MAX_DEPOSIT`                   | `1000000`               |
    /// | `MIN_WITHDRAWAL`                | `10`                    |
    /// | `MAX_WITHDRAWAL`                | `1000000`               |
    ///
    /// # Panics
    ///
    /// Panics on malformed values so misconfiguration fails at startup.
    pub fn from_env() -> Self {
        let host = std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".into());

        let port: u16 = std::env::var("PORT")
            .unwrap_or_else(|_| "3000".into())
            .parse()
            .expect("PORT must be a valid u16");

        let cors_origins: Vec<String> = std::env::var("CORS_ORIGINS")
            .unwrap_or_else(|_| "http://localhost:5173".into())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let request_timeout_secs = env_u64("REQUEST_TIMEOUT_SECS", 30);
        let shutdown_timeout_secs = env_u64("SHUTDOWN_TIMEOUT_SECS", 30);
        let session_cleanup_interval_secs = env_u64("SESSION_CLEANUP_INTERVAL_SECS", 3600);

        let defaults = FundingLimits::default();
        let funding_limits = FundingLimits {
            min_deposit: env_money("MIN_DEPOSIT", defaults.min_deposit),
            max_deposit: env_money("MAX_DEPOSIT", defaults.max_deposit),
            min_withdrawal: env_money("MIN_WITHDRAWAL", defaults.min_withdrawal),
            max_withdrawal: env_money("MAX_WITHDRAWAL", defaults.max_withdrawal),
        };
        assert!(
            funding_limits.min_deposit <= funding_limits.max_deposit
                && funding_limits.min_withdrawal <= funding_limits.max_withdrawal,
            "Funding minimums must not exceed maximums"
        );

        let jwt = JwtConfig::from_env();

        Self {
            host,
            port,
            cors_origins,
            request_timeout_secs,
            shutdown_timeout_secs,
            session_cleanup_interval_secs,
            jwt,
            funding_limits,
        }
    }
}

fn env_u64(name: &str, default: u64) -> u64 {
    match std::env::var(name) {
        Ok(v) => v
            .parse()
            .unwrap_or_else(|_| panic!("{name} must be a valid u64")),
        Err(_) => default,
    }
}

fn env_money(name: &str, default: Money) -> Money {
    match std::env::var(name) {
        Ok(v) => v
            .trim()
            .parse()
            .unwrap_or_else(|_| panic!("{name} must be a decimal amount")),
        Err(_) => default,
    }
}
