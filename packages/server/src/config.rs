use anyhow::{Context, Result};
use dotenvy::dotenv;
use std::env;

/// Application configuration loaded from environment variables
#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    /// Postgres connection string; absent means the in-memory store
    pub database_url: Option<String>,
    /// Maximum age of a location report still eligible for matching
    pub freshness_window_secs: u64,
    /// Search radius applied when a help request does not specify one
    pub default_radius_km: f64,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        // Load .env file if present (development)
        let _ = dotenv();

        Ok(Self {
            port: env::var("PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse()
                .context("PORT must be a valid number")?,
            database_url: env::var("DATABASE_URL").ok(),
            freshness_window_secs: env::var("FRESHNESS_WINDOW_SECS")
                .unwrap_or_else(|_| "300".to_string())
                .parse()
                .context("FRESHNESS_WINDOW_SECS must be a valid number")?,
            default_radius_km: env::var("DEFAULT_RADIUS_KM")
                .unwrap_or_else(|_| "5".to_string())
                .parse()
                .context("DEFAULT_RADIUS_KM must be a valid number")?,
        })
    }
}
