//! Ops Server - retail operations management backend
//!
//! # Architecture overview
//!
//! REST API over an embedded SQLite store:
//!
//! - **Database** (`db`): sqlx connection pool, migrations, repositories
//! - **Auth** (`auth`): JWT + Argon2 authentication
//! - **HTTP API** (`api`): per-resource routers and handlers
//! - **Orders** (`orders`): money arithmetic for order totals
//!
//! # Module structure
//!
//! ```text
//! server/src/
//! ├── core/          # configuration, state, server lifecycle
//! ├── auth/          # JWT, password hashing, guards
//! ├── api/           # HTTP routes and handlers
//! ├── db/            # database layer and repositories
//! ├── orders/        # order money arithmetic
//! ├── routes/        # router assembly and middleware stack
//! └── utils/         # errors, logging, validation
//! ```

pub mod api;
pub mod auth;
pub mod core;
pub mod db;
pub mod orders;
pub mod routes;
pub mod utils;

// Re-export public types
pub use auth::{CurrentUser, JwtService};
pub use core::{Config, Server, ServerState};
pub use utils::{AppError, AppResult};

// Re-export logger functions
pub use utils::logger::{init_logger, init_logger_with_file};

// Security logging macro - tags auth events with a dedicated target
#[macro_export]
macro_rules! security_log {
    ($level:expr, $event:expr, $($key:ident = $value:expr),*) => {
        tracing::info!(
            target: "security",
            level = $level,
            event = $event,
            $($key = $value),*
        );
    };
}

/// Load .env and initialize logging. Called once at startup.
pub fn setup_environment() -> anyhow::Result<()> {
    dotenv::dotenv().ok();

    let log_level = std::env::var("LOG_LEVEL").ok();
    let log_dir = std::env::var("LOG_DIR").ok();
    init_logger_with_file(log_level.as_deref(), log_dir.as_deref());

    Ok(())
}

pub fn print_banner() {
    println!(
        r#"
   ____
  / __ \____  _____
 / / / / __ \/ ___/
/ /_/ / /_/ (__  )
\____/ .___/____/
    /_/  Server
    "#
    );
}
