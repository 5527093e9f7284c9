use std::sync::Arc;

use sqlx::SqlitePool;

use crate::auth::JwtService;
use crate::core::Config;
use crate::db::{DbService, repository::user};

/// Server state - shared handles for every request handler
///
/// Cloning is shallow: the pool and JWT service are reference-counted.
///
/// | field | type | description |
/// |-------|------|-------------|
/// | config | Config | configuration (immutable) |
/// | pool | SqlitePool | SQLite connection pool |
/// | jwt_service | Arc<JwtService> | token issue/validate |
#[derive(Clone, Debug)]
pub struct ServerState {
    pub config: Config,
    pub pool: SqlitePool,
    pub jwt_service: Arc<JwtService>,
}

impl ServerState {
    pub fn new(config: Config, pool: SqlitePool, jwt_service: Arc<JwtService>) -> Self {
        Self {
            config,
            pool,
            jwt_service,
        }
    }

    /// Initialize server state:
    ///
    /// 1. Work directory layout (database/, logs/)
    /// 2. Database pool + migrations (work_dir/database/ops.db)
    /// 3. JWT service
    /// 4. Bootstrap admin account when the user table is empty
    ///
    /// # Panics
    ///
    /// Panics when the database cannot be opened or migrated; the server is
    /// useless without storage.
    pub async fn initialize(config: &Config) -> Self {
        config
            .ensure_work_dir_structure()
            .expect("Failed to create work directory structure");

        let db_path = config.database_dir().join("ops.db");
        let db_service = DbService::new(&db_path.to_string_lossy())
            .await
            .expect("Failed to initialize database");

        let jwt_service = Arc::new(JwtService::new(config.jwt.clone()));

        let state = Self::new(config.clone(), db_service.pool, jwt_service);
        state.ensure_admin_account().await;
        state
    }

    /// Create the bootstrap admin account if no users exist yet.
    async fn ensure_admin_account(&self) {
        let Some(password) = &self.config.admin_password else {
            return;
        };
        match user::count(&self.pool).await {
            Ok(0) => {
                let create = shared::models::UserCreate {
                    username: self.config.admin_username.clone(),
                    password: password.clone(),
                    first_name: String::new(),
                    last_name: String::new(),
                    email: String::new(),
                    phone_number: None,
                    role: shared::models::Role::Admin,
                };
                let hash = match crate::auth::hash_password(password) {
                    Ok(h) => h,
                    Err(e) => {
                        tracing::error!("Failed to hash bootstrap admin password: {e}");
                        return;
                    }
                };
                match user::create(&self.pool, create, hash).await {
                    Ok(u) => tracing::info!(username = %u.username, "Bootstrap admin created"),
                    Err(e) => tracing::error!("Failed to create bootstrap admin: {e}"),
                }
            }
            Ok(_) => {}
            Err(e) => tracing::error!("Failed to count users: {e}"),
        }
    }

    pub fn get_jwt_service(&self) -> Arc<JwtService> {
        self.jwt_service.clone()
    }
}
