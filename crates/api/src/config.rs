use crate::auth::jwt::JwtConfig;

/// Server configuration loaded from environment variables.
///
/// Everything except the JWT secret has a default suitable for local
/// development.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Allowed CORS origins, parsed from comma-separated `CORS_ORIGINS`.
    pub cors_origins: Vec<String>,
    pub request_timeout_secs: u64,
    /// How long to wait for background work after the listener stops.
    pub shutdown_timeout_secs: u64,
    /// Public script URL that redirects are built from.
    pub forum_base_url: String,
    /// Tick of the background task runner.
    pub scheduler_interval_secs: u64,
    pub jwt: JwtConfig,
}

impl ServerConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                   | Default                           |
    /// |---------------------------|-----------------------------------|
    /// | `HOST`                    | `0.0.0.0`                         |
    /// | `PORT`                    | `3000`                            |
    /// | `CORS_ORIGINS`            | `http://localhost:5173`           |
    /// | `REQUEST_TIMEOUT_SECS`    | `30`                              |
    /// | `SHUTDOWN_TIMEOUT_SECS`   | `30`                              |
    /// | `FORUM_BASE_URL`          | `http://localhost:3000/index.php` |
    /// | `SCHEDULER_INTERVAL_SECS` | `60`                              |
    ///
    /// See [`JwtConfig::from_env`] for the token settings.
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

        let shutdown_timeout_secs: u64 = std::env::var("SHUTDOWN_TIMEOUT_SECS")
            .unwrap_or_else(|_| "30".into())
            .parse()
            .expect("SHUTDOWN_TIMEOUT_SECS must be a valid u64");

        let forum_base_url = std::env::var("FORUM_BASE_URL")
            .unwrap_or_else(|_| format!("http://localhost:{port}/index.php"));

        let scheduler_interval_secs: u64 = std::env::var("SCHEDULER_INTERVAL_SECS")
            .unwrap_or_else(|_| "60".into())
            .parse()
            .expect("SCHEDULER_INTERVAL_SECS must be a valid u64");
        assert!(
            scheduler_interval_secs > 0,
            "SCHEDULER_INTERVAL_SECS must be positive"
        );

        Self {
            host,
            port,
            cors_origins,
            request_timeout_secs,
            shutdown_timeout_secs,
            forum_base_url,
            scheduler_interval_secs,
            jwt: JwtConfig::from_env(),
        }
    }
}
