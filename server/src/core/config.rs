use std::path::PathBuf;

use crate::auth::JwtConfig;

/// Server configuration
///
/// # Environment variables
///
/// | variable | default | description |
/// |----------|---------|-------------|
/// | WORK_DIR | /var/lib/ops-server | working directory (database, logs) |
/// | HTTP_PORT | 3000 | HTTP API port |
/// | ENVIRONMENT | development | development \| staging \| production |
/// | JWT_SECRET | (random) | HS256 signing secret, min 32 bytes |
/// | JWT_EXPIRATION_MINUTES | 480 | token lifetime |
/// | ADMIN_USERNAME | admin | bootstrap admin account |
/// | ADMIN_PASSWORD | (none) | bootstrap admin password; no admin is created without it |
///
/// # Example
///
/// ```ignore
/// WORK_DIR=/data/ops HTTP_PORT=8080 cargo run
/// ```
#[derive(Debug, Clone)]
pub struct Config {
    /// Working directory for database and log files
    pub work_dir: String,
    /// HTTP API port
    pub http_port: u16,
    /// JWT configuration
    pub jwt: JwtConfig,
    /// Runtime environment: development | staging | production
    pub environment: String,
    /// Bootstrap admin username
    pub admin_username: String,
    /// Bootstrap admin password; the account is only created when set
    pub admin_password: Option<String>,
}

impl Config {
    /// Load configuration from environment variables, using defaults for
    /// anything unset.
    ///
    /// # Panics
    ///
    /// Panics if `JWT_SECRET` is set but shorter than 32 bytes - refusing to
    /// start beats running with a guessable secret.
    pub fn from_env() -> Self {
        let jwt = JwtConfig::from_env().unwrap_or_else(|e| panic!("JWT configuration: {e}"));
        Self {
            work_dir: std::env::var("WORK_DIR").unwrap_or_else(|_| "/var/lib/ops-server".into()),
            http_port: std::env::var("HTTP_PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(3000),
            jwt,
            environment: std::env::var("ENVIRONMENT").unwrap_or_else(|_| "development".into()),
            admin_username: std::env::var("ADMIN_USERNAME").unwrap_or_else(|_| "admin".into()),
            admin_password: std::env::var("ADMIN_PASSWORD").ok(),
        }
    }

    /// Override the work dir and port, keeping everything else from the
    /// environment. Used by tests.
    pub fn with_overrides(work_dir: impl Into<String>, http_port: u16) -> Self {
        let mut config = Self::from_env();
        config.work_dir = work_dir.into();
        config.http_port = http_port;
        config
    }

    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }

    pub fn is_development(&self) -> bool {
        self.environment == "development"
    }

    /// Directory holding the SQLite database file
    pub fn database_dir(&self) -> PathBuf {
        PathBuf::from(&self.work_dir).join("database")
    }

    /// Directory holding rolling log files
    pub fn log_dir(&self) -> PathBuf {
        PathBuf::from(&self.work_dir).join("logs")
    }

    /// Create the work directory layout if missing.
    pub fn ensure_work_dir_structure(&self) -> std::io::Result<()> {
        std::fs::create_dir_all(self.database_dir())?;
        std::fs::create_dir_all(self.log_dir())?;
        Ok(())
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::from_env()
    }
}
