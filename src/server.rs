//! Reusable users-service runtime.
//!
//! Provides [`ServerHandle`] that encapsulates the full server lifecycle:
//! database init, migrations, admin seeding, code store, REST API and
//! graceful shutdown.

use std::sync::Arc;
use std::time::Duration;

use sea_orm::DatabaseConnection;
use sea_orm_migration::MigratorTrait;
use tracing::{error, info, warn};

use crate::application::AuthService;
use crate::config::{AdminConfig, AppConfig};
use crate::domain::{CreateUserDto, DomainError, RepositoryProvider};
use crate::infrastructure::crypto::password::hash_password;
use crate::infrastructure::database::migrator::Migrator;
use crate::infrastructure::{build_code_store, init_database, SeaOrmRepositoryProvider};
use crate::interfaces::http::{create_api_router, AppState};
use crate::shared::errors::{AppError, InfraError};
use crate::shared::shutdown::{ShutdownCoordinator, ShutdownSignal};

/// Role assigned to the seeded administrator
pub const ADMIN_ROLE: &str = "admin";

// ── Options ────────────────────────────────────────────────────────

/// Options for starting the service.
pub struct ServerOptions {
    pub config: AppConfig,
    /// Run database migrations on startup (default: true).
    pub auto_migrate: bool,
    /// Create the configured admin account if missing (default: true).
    pub create_default_admin: bool,
}

impl Default for ServerOptions {
    fn default() -> Self {
        Self {
            config: AppConfig::default(),
            auto_migrate: true,
            create_default_admin: true,
        }
    }
}

// ── ServerHandle ───────────────────────────────────────────────────

/// Handle to a running users-service.
///
/// ```rust,no_run
/// use users_service::server::{ServerHandle, ServerOptions};
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let handle = ServerHandle::start(ServerOptions::default()).await?;
///     // ... wait for shutdown signal ...
///     handle.shutdown().await;
///     Ok(())
/// }
/// ```
pub struct ServerHandle {
    /// Repository provider for data access.
    pub repos: Arc<dyn RepositoryProvider>,
    /// The configuration the server was started with.
    pub config: AppConfig,
    /// API port the server is listening on.
    pub api_port: u16,

    db: Arc<DatabaseConnection>,
    shutdown: ShutdownCoordinator,
    api_task: tokio::task::JoinHandle<()>,
}

impl ServerHandle {
    /// Start the service with the given options.
    ///
    /// This will:
    /// 1. Connect to the database and run migrations
    /// 2. Connect the verification code store
    /// 3. Create the configured admin account (if enabled)
    /// 4. Start the REST API server
    pub async fn start(opts: ServerOptions) -> Result<Self, AppError> {
        let app_cfg = opts.config;

        info!("Starting users-service...");

        // ── Database ───────────────────────────────────────────
        let db_config = app_cfg.database.to_database_config();
        info!("Database: {}", app_cfg.database.display_url());
        let db = Arc::new(init_database(&db_config).await?);

        if opts.auto_migrate {
            info!("Running database migrations...");
            Migrator::up(db.as_ref(), None).await?;
            info!("Migrations completed");
        }

        // ── Repositories & Services ────────────────────────────
        let codes = build_code_store(&app_cfg.cache).await?;
        let repos: Arc<dyn RepositoryProvider> =
            Arc::new(SeaOrmRepositoryProvider::new(Arc::clone(&db), codes));
        let code_ttl = Duration::from_secs(app_cfg.cache.code_ttl_secs);

        if opts.create_default_admin {
            if let Some(admin) = &app_cfg.admin {
                let auth = AuthService::new(repos.clone(), code_ttl);
                if let Err(e) = create_default_admin(&auth, repos.as_ref(), admin).await {
                    error!(error = %e, "Failed to create admin user");
                }
            }
        }

        // ── Shutdown coordinator ───────────────────────────────
        let shutdown = ShutdownCoordinator::new(app_cfg.server.shutdown_timeout);
        let shutdown_signal = shutdown.signal();

        // ── REST API server ────────────────────────────────────
        let state = AppState::new(repos.clone(), Arc::clone(&db), code_ttl);
        let api_router = create_api_router(
            state,
            Duration::from_secs(app_cfg.server.request_timeout_secs),
        );

        let api_addr = app_cfg.server.address();
        let listener = tokio::net::TcpListener::bind(&api_addr).await?;
        let api_port = listener.local_addr()?.port();
        info!("REST API server listening on http://{}", api_addr);
        info!("OpenAPI document at http://{}/api-docs/openapi.json", api_addr);

        let api_shutdown = shutdown_signal.clone();
        let api_server = axum::serve(listener, api_router).with_graceful_shutdown(async move {
            api_shutdown.wait().await;
            info!("REST API server received shutdown signal");
        });

        let api_task = tokio::spawn(async move {
            if let Err(e) = api_server.await {
                error!("REST API server error: {}", e);
            }
        });

        Ok(Self {
            repos,
            config: app_cfg,
            api_port,
            db,
            shutdown,
            api_task,
        })
    }

    /// Get a cloneable shutdown signal.
    pub fn shutdown_signal(&self) -> ShutdownSignal {
        self.shutdown.signal()
    }

    /// Install OS signal listeners (SIGTERM, SIGINT) that trigger shutdown.
    pub fn install_signal_handler(&self) {
        self.shutdown.start_signal_listener();
    }

    /// Trigger graceful shutdown (non-blocking).
    pub fn trigger_shutdown(&self) {
        self.shutdown.signal().trigger();
    }

    /// Wait for the server to stop after shutdown has been triggered.
    ///
    /// In-flight requests get the configured grace period; after that the
    /// API task is abandoned.
    pub async fn wait(self) {
        let Self {
            repos,
            db,
            shutdown,
            api_task,
            ..
        } = self;

        info!("Waiting for in-flight requests to complete...");

        match tokio::time::timeout(shutdown.timeout(), api_task).await {
            Ok(Ok(())) => info!("REST API server stopped"),
            Ok(Err(e)) => error!("REST API server task panicked: {}", e),
            Err(_) => warn!(
                timeout_secs = shutdown.timeout().as_secs(),
                "Grace period elapsed with requests still in flight"
            ),
        }

        drop(repos);
        match Arc::try_unwrap(db) {
            Ok(db) => match db.close().await {
                Ok(()) => info!("Database connection closed"),
                Err(e) => warn!("Error closing database connection: {}", e),
            },
            // The abandoned API task still owns a handle; the pool closes when it drops
            Err(_) => warn!("Database connection still in use, skipping explicit close"),
        }

        info!("users-service shutdown complete");
    }

    /// Trigger shutdown and wait for completion.
    pub async fn shutdown(self) {
        info!("Shutting down users-service...");
        self.trigger_shutdown();
        self.wait().await;
    }
}

// ── Helpers ────────────────────────────────────────────────────────

/// Ensure the configured admin account exists and carries the admin role.
///
/// Safe to run on every startup: an existing account (created earlier, or
/// concurrently by another replica) is promoted if a previous run stopped
/// before the role change.
pub async fn create_default_admin(
    auth: &AuthService,
    repos: &dyn RepositoryProvider,
    admin: &AdminConfig,
) -> Result<(), AppError> {
    let user = match auth.get_by_email(&admin.email).await {
        Ok(user) => user,
        Err(DomainError::NotFound { .. }) => {
            info!("Creating default admin user...");

            let password = admin.password.clone();
            let password_hash = tokio::task::spawn_blocking(move || hash_password(&password))
                .await
                .map_err(|e| DomainError::Internal(format!("admin password hashing: {e}")))?
                .map_err(InfraError::from)?;

            let created = auth
                .create(CreateUserDto {
                    email: admin.email.clone(),
                    password_hash,
                    full_name: admin.full_name.clone(),
                })
                .await;

            match created {
                Ok(user) => {
                    warn!("Please change the admin password immediately!");
                    user
                }
                // Another replica created it first
                Err(DomainError::Conflict(_)) => auth.get_by_email(&admin.email).await?,
                Err(e) => return Err(e.into()),
            }
        }
        Err(e) => return Err(e.into()),
    };

    if user.user_role == ADMIN_ROLE {
        info!(email = %admin.email, "Admin account already present");
        return Ok(());
    }

    repos.users().change_user_role(user.id, ADMIN_ROLE).await?;
    info!(email = %admin.email, "Admin role granted");
    Ok(())
}

/// Initialize tracing (logging) from the application config.
///
/// Call this once at process startup (before [`ServerHandle::start`]).
pub fn init_tracing(config: &AppConfig) {
    use tracing_subscriber::layer::SubscriberExt;
    use tracing_subscriber::util::SubscriberInitExt;

    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&config.logging.level));

    match config.logging.format.to_lowercase().as_str() {
        "json" => {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(tracing_subscriber::fmt::layer().json())
                .init();
        }
        _ => {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(tracing_subscriber::fmt::layer())
                .init();
        }
    }
}
