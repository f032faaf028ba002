use crate::auth::jwt::JwtConfig;

/// Server configuration loaded from environment variables.
///
/// All fields except the JWT secret have sensible defaults suitable for
/// local development. In production, override via environment variables.
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
    /// JWT token configuration (secret, expiry durations).
    pub jwt: JwtConfig,
    /// External publish API (YouTube) OAuth client configuration.
    pub youtube: YouTubeConfig,
}

impl ServerConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                | Default                    |
    /// |------------------------|----------------------------|
    /// | `HOST`                 | `0.0.0.0`                  |
    /// | `PORT`                 | `3000`                     |
    /// | `CORS_ORIGINS`         | `http://localhost:5173`    |
    /// | `REQUEST_TIMEOUT_SECS` | `30`                       |
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

        let request_timeout_secs: u64 = std::env::var("REQUEST_TIMEOUT_SECS")
            .unwrap_or_else(|_| "30".into())
            .parse()
            .expect("REQUEST_TIMEOUT_SECS must be a valid u64");

        let jwt = JwtConfig::from_env();
        let youtube = YouTubeConfig::from_env();

        Self {
            host,
            port,
            cors_origins,
            request_timeout_secs,
            jwt,
            youtube,
        }
    }
}

/// OAuth client configuration for the external publish API.
#[derive(Debug, Clone, Default)]
pub struct YouTubeConfig {
    pub client_id: String,
    pub client_secret: String,
}

impl YouTubeConfig {
    /// Load from `YOUTUBE_CLIENT_ID` / `YOUTUBE_CLIENT_SECRET`.
    ///
    /// Missing values do not fail startup — the server can run reviews and
    /// uploads without them — but every publish attempt will fail until
    /// they are configured, so a warning is logged.
    pub fn from_env() -> Self {
        let client_id = std::env::var("YOUTUBE_CLIENT_ID").unwrap_or_default();
        let client_secret = std::env::var("YOUTUBE_CLIENT_SECRET").unwrap_or_default();

        if client_id.is_empty() || client_secret.is_empty() {
            tracing::warn!(
                "YOUTUBE_CLIENT_ID / YOUTUBE_CLIENT_SECRET not set; publish dispatch will fail"
            );
        }

        Self {
            client_id,
            client_secret,
        }
    }
}
