//! Command-line and environment configuration for the server binary

use std::net::SocketAddr;
use std::time::Duration;

use clap::Parser;

use crate::db::pool::{PoolSettings, DEFAULT_ACQUIRE_TIMEOUT, DEFAULT_MAX_CONNECTIONS};
use crate::http::ServerConfig;
use crate::tracing_setup::TracingConfig;

/// todoapp HTTP server
#[derive(Parser, Debug, Clone)]
#[command(name = "todoapp-server", version, about)]
pub struct ServerArgs {
    /// Address to bind to
    #[arg(long, short = 'b', env = "TODOAPP_BIND", default_value = "127.0.0.1:3030")]
    pub bind: SocketAddr,

    /// PostgreSQL connection string
    #[arg(long, env = "DATABASE_URL")]
    pub database_url: String,

    /// Database user (overrides the one in the URL)
    #[arg(long, env = "DATABASE_USERNAME")]
    pub database_username: Option<String>,

    /// Database password (overrides the one in the URL)
    #[arg(long, env = "DATABASE_PASSWORD", hide_env_values = true)]
    pub database_password: Option<String>,

    /// Maximum pooled connections
    #[arg(long, env = "DATABASE_MAX_CONNECTIONS", default_value_t = DEFAULT_MAX_CONNECTIONS)]
    pub max_connections: u32,

    /// Seconds a connection checkout may wait before failing
    #[arg(long, env = "DATABASE_ACQUIRE_TIMEOUT_SECS", default_value_t = DEFAULT_ACQUIRE_TIMEOUT.as_secs())]
    pub acquire_timeout_secs: u64,

    /// Seconds before an in-flight request is abandoned
    #[arg(long, env = "TODOAPP_REQUEST_TIMEOUT_SECS", default_value_t = 30)]
    pub request_timeout_secs: u64,

    /// Do not create the schema on startup
    #[arg(long, env = "TODOAPP_SKIP_MIGRATIONS")]
    pub skip_migrations: bool,

    /// Allow permissive CORS (all origins) - use with caution
    #[arg(long)]
    pub cors_permissive: bool,

    /// Enable debug logging
    #[arg(long)]
    pub debug: bool,

    /// Export traces over OTLP (requires the `telemetry` feature)
    #[arg(long)]
    pub otel: bool,
}

impl ServerArgs {
    pub fn pool_settings(&self) -> PoolSettings {
        PoolSettings {
            database_url: self.database_url.clone(),
            username: self.database_username.clone(),
            password: self.database_password.clone(),
            max_connections: self.max_connections,
            acquire_timeout: Duration::from_secs(self.acquire_timeout_secs),
        }
    }

    pub fn server_config(&self) -> ServerConfig {
        ServerConfig {
            bind_addr: self.bind,
            cors_permissive: self.cors_permissive,
            request_timeout: Duration::from_secs(self.request_timeout_secs),
        }
    }

    pub fn tracing_config(&self) -> TracingConfig {
        TracingConfig {
            debug: self.debug,
            otel: self.otel,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn minimal_args_use_defaults() {
        let args = ServerArgs::try_parse_from([
            "todoapp-server",
            "--database-url",
            "postgres://localhost/todoapp",
        ])
        .unwrap();

        let config = args.server_config();
        assert_eq!(config.bind_addr.port(), 3030);
        assert!(!config.cors_permissive);
        assert_eq!(config.request_timeout, Duration::from_secs(30));

        let settings = args.pool_settings();
        assert_eq!(settings.max_connections, DEFAULT_MAX_CONNECTIONS);
        assert_eq!(settings.acquire_timeout, DEFAULT_ACQUIRE_TIMEOUT);
        assert!(settings.username.is_none());
        assert!(!args.skip_migrations);
    }

    #[test]
    fn flags_override_defaults() {
        let args = ServerArgs::try_parse_from([
            "todoapp-server",
            "--database-url",
            "postgres://localhost/todoapp",
            "--bind",
            "0.0.0.0:8080",
            "--database-username",
            "app",
            "--max-connections",
            "2",
            "--acquire-timeout-secs",
            "3",
            "--skip-migrations",
            "--debug",
        ])
        .unwrap();

        assert_eq!(args.server_config().bind_addr.port(), 8080);
        let settings = args.pool_settings();
        assert_eq!(settings.username.as_deref(), Some("app"));
        assert_eq!(settings.max_connections, 2);
        assert_eq!(settings.acquire_timeout, Duration::from_secs(3));
        assert!(args.skip_migrations);
        assert!(args.tracing_config().debug);
    }

    #[test]
    fn rejects_bad_bind_address() {
        let result = ServerArgs::try_parse_from([
            "todoapp-server",
            "--database-url",
            "postgres://localhost/todoapp",
            "--bind",
            "not-an-address",
        ]);
        assert!(result.is_err());
    }
}
