//! Configuration management for the API server
//!
//! Loaded once from environment variables at startup and immutable for the
//! process lifetime; business logic receives the values it needs by
//! reference and never reads the environment itself.
//!
//! # Environment Variables
//!
//! - `DATABASE_URL`: PostgreSQL connection string (required)
//! - `DATABASE_MAX_CONNECTIONS`: pool size (default: 10)
//! - `API_HOST`: host to bind to (default: 0.0.0.0)
//! - `API_PORT`: port to bind to (default: 8080)
//! - `JWT_SECRET`: token signing secret, at least 32 characters (required;
//!   a missing or short secret is a fatal startup error)
//! - `JWT_ISSUER`: issuer claim (default: taskdeck)
//! - `JWT_AUDIENCE`: audience claim (default: taskdeck)
//! - `TOKEN_TTL_HOURS`: token lifetime (default: 24)

use serde::{Deserialize, Serialize};
use std::env;

use taskdeck_shared::db::pool::DatabaseConfig;

/// Complete application configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// API server configuration
    pub api: ApiConfig,

    /// Database configuration
    pub database: DatabaseConfig,

    /// Token signing configuration
    pub jwt: JwtConfig,
}

/// API server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    /// Host to bind to
    pub host: String,

    /// Port to bind to
    pub port: u16,
}

/// Token signing configuration
#[derive(Debug, Clone)]
pub struct JwtConfig {
    /// Secret key for token signing; at least 32 bytes
    ///
    /// Generate with: `openssl rand -hex 32`
    pub secret: String,

    /// Issuer claim stamped into and checked on every token
    pub issuer: String,

    /// Audience claim stamped into and checked on every token
    pub audience: String,

    /// Token lifetime in hours
    pub ttl_hours: i64,
}

impl Config {
    /// Loads configuration from environment variables
    ///
    /// # Errors
    ///
    /// Fails fast (before the server binds) when:
    /// - `DATABASE_URL` is missing
    /// - `JWT_SECRET` is missing or shorter than 32 characters
    /// - a numeric variable does not parse
    pub fn from_env() -> anyhow::Result<Self> {
        // Load .env file if present (for development)
        dotenvy::dotenv().ok();

        let api_host = env::var("API_HOST").unwrap_or_else(|_| "0.0.0.0".to_string());
        let api_port = env::var("API_PORT")
            .unwrap_or_else(|_| "8080".to_string())
            .parse::<u16>()?;

        let database_url = env::var("DATABASE_URL")
            .map_err(|_| anyhow::anyhow!("DATABASE_URL environment variable is required"))?;
        let max_connections = env::var("DATABASE_MAX_CONNECTIONS")
            .unwrap_or_else(|_| "10".to_string())
            .parse::<u32>()?;

        let jwt_secret = env::var("JWT_SECRET")
            .map_err(|_| anyhow::anyhow!("JWT_SECRET environment variable is required"))?;
        if jwt_secret.len() < 32 {
            anyhow::bail!("JWT_SECRET must be at least 32 characters long");
        }

        let issuer = env::var("JWT_ISSUER").unwrap_or_else(|_| "taskdeck".to_string());
        let audience = env::var("JWT_AUDIENCE").unwrap_or_else(|_| "taskdeck".to_string());

        let ttl_hours = env::var("TOKEN_TTL_HOURS")
            .unwrap_or_else(|_| "24".to_string())
            .parse::<i64>()?;
        if ttl_hours <= 0 {
            anyhow::bail!("TOKEN_TTL_HOURS must be positive");
        }

        Ok(Self {
            api: ApiConfig {
                host: api_host,
                port: api_port,
            },
            database: DatabaseConfig {
                url: database_url,
                max_connections,
                ..Default::default()
            },
            jwt: JwtConfig {
                secret: jwt_secret,
                issuer,
                audience,
                ttl_hours,
            },
        })
    }

    /// Returns the server bind address
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.api.host, self.api.port)
    }
}
