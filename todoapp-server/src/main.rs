//! todoapp-server binary
//!
//! Loads `.env`, parses flags, bootstraps the schema and serves the HTTP API
//! until Ctrl+C/SIGTERM.

use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use todoapp_core::{AcquireGate, TodoService};
use todoapp_server::db::{create_pool, migrations, PgTransactional};
use todoapp_server::http::run_server;
use todoapp_server::{tracing_setup, ServerArgs};

#[tokio::main]
async fn main() -> Result<()> {
    // A missing .env is fine; real environment variables still apply
    let _ = dotenvy::dotenv();

    let args = ServerArgs::parse();
    tracing_setup::init(&args.tracing_config())?;

    let result = run(args).await;
    tracing_setup::shutdown_otel();
    result
}

async fn run(args: ServerArgs) -> Result<()> {
    let settings = args.pool_settings();
    let pool = create_pool(&settings)
        .await
        .context("Failed to create database pool")?;

    if args.skip_migrations {
        tracing::info!("Skipping schema bootstrap");
    } else {
        migrations::run(&pool)
            .await
            .context("Failed to bootstrap schema")?;
    }

    // One gate for the whole process
    let gate = Arc::new(AcquireGate::new());
    let todos = TodoService::new(PgTransactional::new(pool, gate));

    tracing::info!("Starting todoapp server on {}", args.bind);
    run_server(todos, args.server_config())
        .await
        .context("Server error")?;

    Ok(())
}
