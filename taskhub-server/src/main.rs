//! `TaskHub` server -- task tracking backend with grant-based sharing.
//!
//! An axum JSON API over in-memory stores. Tasks are owned by their
//! reporter, shareable with other users at `Read` or `ReadWrite`
//! level, and every operation is gated by the authorization engine in
//! `taskhub-core`.
//!
//! # Usage
//!
//! ```bash
//! # Run on default address 0.0.0.0:8080
//! cargo run --bin taskhub-server
//!
//! # Run on custom address with a seeded admin account
//! ADMIN_USERNAME=root ADMIN_PASSWORD=change-me \
//!     cargo run --bin taskhub-server -- --bind 127.0.0.1:3000
//! ```

use std::sync::Arc;

use clap::Parser;
use taskhub_server::accounts::Accounts;
use taskhub_server::config::{ServerCliArgs, ServerConfig};
use taskhub_server::http::{self, AppState};
use taskhub_server::ops::TaskOps;
use taskhub_server::store::{GrantStore, TaskStore, UserStore};

#[tokio::main]
async fn main() {
    let cli = ServerCliArgs::parse();

    // Load config from CLI args + config file + env vars + defaults.
    let config = match ServerConfig::load(&cli) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Error loading configuration: {e}");
            std::process::exit(1);
        }
    };

    // Initialize tracing with the resolved log level.
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&config.log_level));
    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    tracing::info!(addr = %config.bind_addr, "starting taskhub server");

    let tasks = Arc::new(TaskStore::new());
    let grants = Arc::new(GrantStore::new());
    let users = Arc::new(UserStore::new());

    let accounts = Accounts::new(Arc::clone(&users), Arc::clone(&tasks), Arc::clone(&grants));
    let ops = TaskOps::new(tasks, grants, users);

    if let Some(seed) = &config.admin_seed {
        if let Err(e) = accounts.seed_admin(&seed.username, &seed.password).await {
            tracing::error!(error = %e, "failed to seed admin account");
            std::process::exit(1);
        }
    } else {
        tracing::warn!("no admin credentials configured, starting without an admin account");
    }

    let state = AppState { ops, accounts };

    match http::start_server(&config.bind_addr, state).await {
        Ok((bound_addr, handle)) => {
            tracing::info!(addr = %bound_addr, "taskhub server listening");
            if let Err(e) = handle.await {
                tracing::error!(error = %e, "server task failed");
            }
        }
        Err(e) => {
            tracing::error!(error = %e, "failed to start server");
            std::process::exit(1);
        }
    }
}
