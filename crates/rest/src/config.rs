//! Server configuration for the search API.
//!
//! # Environment Variables
//!
//! | Variable | Default | Description |
//! |----------|---------|-------------|
//! | `SEARCHBOX_PORT` | 8080 | Server port |
//! | `SEARCHBOX_HOST` | 127.0.0.1 | Host to bind |
//! | `SEARCHBOX_LOG_LEVEL` | info | Log level |
//! | `SEARCHBOX_MAX_BODY_SIZE` | 1048576 | Max request body (bytes) |
//! | `SEARCHBOX_REQUEST_TIMEOUT` | 30 | Request timeout (seconds) |
//! | `SEARCHBOX_ENABLE_CORS` | true | Enable CORS |
//! | `SEARCHBOX_CORS_ORIGINS` | * | Allowed origins |
//! | `SEARCHBOX_CORS_METHODS` | GET,POST,OPTIONS | Allowed methods |
//! | `SEARCHBOX_CORS_HEADERS` | * | Allowed headers |
//! | `SEARCHBOX_ENABLE_REQUEST_ID` | true | Set and propagate `x-request-id` |
//! | `SEARCHBOX_DATABASE_URL` | | PostgreSQL connection string |
//! | `SEARCHBOX_INDEX_CONFIG` | | Path to the index configuration JSON |
//! | `SEARCHBOX_MAX_REQUESTS_PER_BATCH` | 15 | Max searches per HTTP request |
//!
//! # Example
//!
//! ```rust
//! use searchbox_rest::ServerConfig;
//!
//! let config = ServerConfig {
//!     port: 3000,
//!     host: "0.0.0.0".to_string(),
//!     ..Default::default()
//! };
//! assert!(config.validate().is_ok());
//! ```

use std::path::PathBuf;

use clap::Parser;
use searchbox_persistence::constants::MAX_REQ_PER_HTTP_REQ;

/// Server configuration for the search API.
///
/// Built from command line arguments with [`ServerConfig::parse`], from the
/// environment with [`ServerConfig::from_env`], or programmatically.
#[derive(Debug, Clone, Parser)]
#[command(name = "searchbox")]
#[command(about = "Algolia-compatible search API over PostgreSQL full-text search")]
pub struct ServerConfig {
    /// Port to listen on.
    #[arg(short, long, env = "SEARCHBOX_PORT", default_value = "8080")]
    pub port: u16,

    /// Host address to bind to.
    #[arg(long, env = "SEARCHBOX_HOST", default_value = "127.0.0.1")]
    pub host: String,

    /// Log level (error, warn, info, debug, trace).
    #[arg(long, env = "SEARCHBOX_LOG_LEVEL", default_value = "info")]
    pub log_level: String,

    /// Maximum request body size in bytes.
    #[arg(long, env = "SEARCHBOX_MAX_BODY_SIZE", default_value = "1048576")]
    pub max_body_size: usize,

    /// Request timeout in seconds.
    #[arg(long, env = "SEARCHBOX_REQUEST_TIMEOUT", default_value = "30")]
    pub request_timeout: u64,

    /// Enable CORS.
    #[arg(long, env = "SEARCHBOX_ENABLE_CORS", default_value = "true")]
    pub enable_cors: bool,

    /// Allowed CORS origins (comma-separated, or * for all).
    #[arg(long, env = "SEARCHBOX_CORS_ORIGINS", default_value = "*")]
    pub cors_origins: String,

    /// Allowed CORS methods (comma-separated, or * for all).
    #[arg(long, env = "SEARCHBOX_CORS_METHODS", default_value = "GET,POST,OPTIONS")]
    pub cors_methods: String,

    /// Allowed CORS headers (comma-separated, or * for all).
    #[arg(long, env = "SEARCHBOX_CORS_HEADERS", default_value = "*")]
    pub cors_headers: String,

    /// Set and propagate an `x-request-id` header.
    #[arg(long, env = "SEARCHBOX_ENABLE_REQUEST_ID", default_value = "true")]
    pub enable_request_id: bool,

    /// PostgreSQL connection string. When absent, `SEARCHBOX_PG_*` variables
    /// are used.
    #[arg(long, env = "SEARCHBOX_DATABASE_URL")]
    pub database_url: Option<String>,

    /// Path to the index configuration JSON (one object or an array).
    #[arg(long, env = "SEARCHBOX_INDEX_CONFIG")]
    pub index_config: Option<PathBuf>,

    /// Maximum number of searches in one HTTP request.
    #[arg(long, env = "SEARCHBOX_MAX_REQUESTS_PER_BATCH", default_value = "15")]
    pub max_requests_per_batch: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: 8080,
            host: "127.0.0.1".to_string(),
            log_level: "info".to_string(),
            max_body_size: 1024 * 1024, // 1MB
            request_timeout: 30,
            enable_cors: true,
            cors_origins: "*".to_string(),
            cors_methods: "GET,POST,OPTIONS".to_string(),
            cors_headers: "*".to_string(),
            enable_request_id: true,
            database_url: None,
            index_config: None,
            max_requests_per_batch: MAX_REQ_PER_HTTP_REQ,
        }
    }
}

impl ServerConfig {
    /// Creates a configuration from environment variables, falling back to
    /// defaults when they do not parse.
    pub fn from_env() -> Self {
        Self::try_parse_from(["searchbox"]).unwrap_or_default()
    }

    /// Returns the socket address to bind to.
    pub fn socket_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Validates the configuration and returns errors if any.
    pub fn validate(&self) -> Result<(), Vec<String>> {
        let mut errors = Vec::new();

        if self.port == 0 {
            errors.push("Port cannot be 0".to_string());
        }

        if self.max_body_size == 0 {
            errors.push("Max body size cannot be 0".to_string());
        }

        if self.request_timeout == 0 {
            errors.push("Request timeout cannot be 0".to_string());
        }

        if self.max_requests_per_batch == 0 {
            errors.push("Max requests per batch cannot be 0".to_string());
        }

        if let Some(path) = &self.index_config
            && !path.is_file()
        {
            errors.push(format!(
                "Index configuration file not found: {}",
                path.display()
            ));
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }

    /// Creates a configuration suitable for testing.
    pub fn for_testing() -> Self {
        Self {
            port: 0, // Let OS assign port
            log_level: "debug".to_string(),
            request_timeout: 5,
            enable_cors: false,
            enable_request_id: false,
            ..Self::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = ServerConfig::default();
        assert_eq!(config.port, 8080);
        assert_eq!(config.host, "127.0.0.1");
        assert_eq!(config.max_requests_per_batch, 15);
        assert!(config.enable_cors);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_socket_addr() {
        let config = ServerConfig {
            port: 3000,
            host: "0.0.0.0".to_string(),
            ..Default::default()
        };
        assert_eq!(config.socket_addr(), "0.0.0.0:3000");
    }

    #[test]
    fn test_validate_collects_errors() {
        let config = ServerConfig {
            port: 0,
            request_timeout: 0,
            max_requests_per_batch: 0,
            index_config: Some(PathBuf::from("/nonexistent/indexes.json")),
            ..Default::default()
        };
        let errors = config.validate().unwrap_err();
        assert_eq!(errors.len(), 4);
    }

    #[test]
    fn test_parse_args() {
        let config = ServerConfig::try_parse_from([
            "searchbox",
            "--port",
            "9000",
            "--max-requests-per-batch",
            "5",
            "--index-config",
            "indexes.json",
        ])
        .unwrap();
        assert_eq!(config.port, 9000);
        assert_eq!(config.max_requests_per_batch, 5);
        assert_eq!(config.index_config, Some(PathBuf::from("indexes.json")));
    }

    #[test]
    fn test_for_testing() {
        let config = ServerConfig::for_testing();
        assert_eq!(config.port, 0);
        assert!(!config.enable_cors);
    }
}
