use anyhow::{Context, Result};

/// Application configuration loaded from environment variables.
/// Fails at startup if required variables are missing.
#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    /// Base URL of the remote template-generation service.
    pub template_api_url: String,
    /// Base URL of the remote document-processing service.
    pub docproc_api_url: String,
    /// Shared secret for verifying the auth provider's tokens.
    pub jwt_secret: String,
    /// Public origin used to build share and portfolio links.
    pub public_origin: String,
    pub port: u16,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Ok(Config {
            database_url: require_env("DATABASE_URL")?,
            template_api_url: require_env("TEMPLATE_API_URL")?,
            docproc_api_url: require_env("DOCPROC_API_URL")?,
            jwt_secret: require_env("JWT_SECRET")?,
            public_origin: std::env::var("PUBLIC_ORIGIN")
                .unwrap_or_else(|_| "http://localhost:5173".to_string()),
            port: std::env::var("PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse::<u16>()
                .context("PORT must be a valid port number")?,
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
        })
    }
}

fn require_env(key: &str) -> Result<String> {
    std::env::var(key).with_context(|| format!("Required environment variable '{key}' is not set"))
}
