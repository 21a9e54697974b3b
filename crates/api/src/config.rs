use crate::auth::jwt::JwtConfig;

/// Server configuration loaded from environment variables.
///
/// All fields have sensible defaults suitable for local development.
/// In production, override via environment variables.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Bind address (default: `0.0.0.0`).
    pub host: String,
    /// Bind port (default: `8000`).
    pub port: u16,
    /// Allowed CORS origins, parsed from comma-separated `CORS_ORIGINS` env var.
    pub cors_origins: Vec<String>,
    /// HTTP request timeout in seconds (default: `30`).
    pub request_timeout_secs: u64,
    /// Largest accepted body on media upload routes, in bytes.
    pub max_upload_bytes: usize,
    /// Timeout for media upload routes, in seconds. Covers the upload to
    /// the media host as well as receiving the body.
    pub upload_timeout_secs: u64,
    /// Base URL of the web client; password reset links point here.
    pub frontend_url: String,
    /// How often expired verification tokens are swept, in seconds.
    pub token_sweep_interval_secs: u64,
    /// JWT token configuration (secret, expiry).
    pub jwt: JwtConfig,
}

impl ServerConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                     | Default                 |
    /// |-----------------------------|-------------------------|
    /// | `HOST`                      | `0.0.0.0`               |
    /// | `PORT`                      | `8000`                  |
    /// | `CORS_ORIGINS`              | `http://localhost:3000` |
    /// | `REQUEST_TIMEOUT_SECS`      | `30`                    |
    /// | `MAX_UPLOAD_BYTES`          | `104857600` (100 MiB)   |
    /// | `UPLOAD_TIMEOUT_SECS`       | `300`                   |
    /// | `FRONTEND_URL`              | `http://localhost:3000` |
    /// | `TOKEN_SWEEP_INTERVAL_SECS` | `300`                   |
    pub fn from_env() -> Self {
        let host = std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".into());

        let port: u16 = std::env::var("PORT")
            .unwrap_or_else(|_| "8000".into())
            .parse()
            .expect("PORT must be a valid u16");

        let cors_origins: Vec<String> = std::env::var("CORS_ORIGINS")
            .unwrap_or_else(|_| "http://localhost:3000".into())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let request_timeout_secs: u64 = std::env::var("REQUEST_TIMEOUT_SECS")
            .unwrap_or_else(|_| "30".into())
            .parse()
            .expect("REQUEST_TIMEOUT_SECS must be a valid u64");

        let max_upload_bytes: usize = std::env::var("MAX_UPLOAD_BYTES")
            .unwrap_or_else(|_| "104857600".into())
            .parse()
            .expect("MAX_UPLOAD_BYTES must be a valid usize");

        let upload_timeout_secs: u64 = std::env::var("UPLOAD_TIMEOUT_SECS")
            .unwrap_or_else(|_| "300".into())
            .parse()
            .expect("UPLOAD_TIMEOUT_SECS must be a valid u64");

        let frontend_url = std::env::var("FRONTEND_URL")
            .unwrap_or_else(|_| "http://localhost:3000".into())
            .trim_end_matches('/')
            .to_string();

        let token_sweep_interval_secs: u64 = std::env::var("TOKEN_SWEEP_INTERVAL_SECS")
            .unwrap_or_else(|_| "300".into())
            .parse()
            .expect("TOKEN_SWEEP_INTERVAL_SECS must be a valid u64");

        let jwt = JwtConfig::from_env();

        Self {
            host,
            port,
            cors_origins,
            request_timeout_secs,
            max_upload_bytes,
            upload_timeout_secs,
            frontend_url,
            token_sweep_interval_secs,
            jwt,
        }
    }

    /// Link mailed to a user who asked to reset their password.
    pub fn password_reset_link(&self, token: &str, user_id: reelview_core::types::DbId) -> String {
        format!(
            "{}/auth/reset-password?token={token}&id={user_id}",
            self.frontend_url
        )
    }
}
