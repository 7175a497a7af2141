//! API router with OpenAPI document

use std::sync::Arc;
use std::time::{Duration, Instant};

use axum::{
    extract::FromRef,
    routing::{delete, get, post, put},
    Json, Router,
};
use sea_orm::DatabaseConnection;
use tower_http::cors::{Any, CorsLayer};
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;
use utoipa::OpenApi;

use crate::application::{AuthService, UserService};
use crate::domain::RepositoryProvider;

use super::modules::auth::{self, AuthHandlerState};
use super::modules::health::{self, HealthState};
use super::modules::users::{self, UserHandlerState};

/// Shared state for every route. Each handler extracts only its own slice
/// via `FromRef`.
#[derive(Clone)]
pub struct AppState {
    pub auth_service: Arc<AuthService>,
    pub user_service: Arc<UserService>,
    pub db: Arc<DatabaseConnection>,
    pub started_at: Arc<Instant>,
}

impl AppState {
    pub fn new(
        repos: Arc<dyn RepositoryProvider>,
        db: Arc<DatabaseConnection>,
        code_ttl: Duration,
    ) -> Self {
        Self {
            auth_service: Arc::new(AuthService::new(repos.clone(), code_ttl)),
            user_service: Arc::new(UserService::new(repos)),
            db,
            started_at: Arc::new(Instant::now()),
        }
    }
}

impl FromRef<AppState> for AuthHandlerState {
    fn from_ref(s: &AppState) -> Self {
        AuthHandlerState {
            auth_service: Arc::clone(&s.auth_service),
        }
    }
}

impl FromRef<AppState> for UserHandlerState {
    fn from_ref(s: &AppState) -> Self {
        UserHandlerState {
            user_service: Arc::clone(&s.user_service),
        }
    }
}

impl FromRef<AppState> for HealthState {
    fn from_ref(s: &AppState) -> Self {
        HealthState {
            db: Arc::clone(&s.db),
            started_at: Arc::clone(&s.started_at),
        }
    }
}

/// OpenAPI documentation
#[derive(OpenApi)]
#[openapi(
    paths(
        // Health
        health::health_check,
        // Auth
        auth::create_user,
        auth::get_user_by_email,
        auth::login,
        auth::store_refresh_token,
        auth::delete_refresh_tokens,
        auth::check_refresh_token,
        auth::check_email,
        auth::reset_password,
        auth::save_verification_code,
        auth::verify_code,
        // Users
        users::list_users,
        users::get_user,
        users::update_user,
        users::delete_user,
        users::change_password,
        users::change_user_role,
    ),
    components(
        schemas(
            health::HealthResponse,
            health::ComponentHealth,
            auth::CreateUserRequest,
            auth::LoginRequest,
            auth::StoreRefreshTokenRequest,
            auth::CheckRefreshTokenRequest,
            auth::CheckEmailRequest,
            auth::ResetPasswordRequest,
            auth::SaveVerificationCodeRequest,
            auth::VerifyCodeRequest,
            auth::VerifyCodeResponse,
            users::UserDto,
            users::UpdatedUserDto,
            users::UpdateUserRequest,
            users::ChangePasswordRequest,
            users::ChangeUserRoleRequest,
        )
    ),
    tags(
        (name = "Health", description = "Liveness and database reachability"),
        (name = "Authentication", description = "Registration, login, refresh tokens, password reset and verification codes"),
        (name = "Users", description = "Account listing, updates, soft deletion, password and role changes"),
    ),
    info(
        title = "Users Service API",
        version = "1.0.0",
        description = "User accounts and credentials over PostgreSQL",
        license(name = "MIT")
    )
)]
pub struct ApiDoc;

async fn openapi_json() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}

/// Create the API router with all routes
pub fn create_api_router(state: AppState, request_timeout: Duration) -> Router {
    let auth_routes = Router::new()
        .route("/users", post(auth::create_user))
        .route("/users/by-email/{email}", get(auth::get_user_by_email))
        .route("/login", post(auth::login))
        .route("/refresh-tokens", post(auth::store_refresh_token))
        .route(
            "/refresh-tokens/users/{user_id}",
            delete(auth::delete_refresh_tokens),
        )
        .route("/refresh-tokens/check", post(auth::check_refresh_token))
        .route("/emails/check", post(auth::check_email))
        .route("/password/reset", post(auth::reset_password))
        .route("/verification-codes", put(auth::save_verification_code))
        .route("/verification-codes/verify", post(auth::verify_code));

    let user_routes = Router::new()
        .route("/", get(users::list_users))
        .route(
            "/{id}",
            get(users::get_user)
                .patch(users::update_user)
                .delete(users::delete_user),
        )
        .route("/{id}/password", post(users::change_password))
        .route("/{id}/role", put(users::change_user_role));

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/health", get(health::health_check))
        .route("/api-docs/openapi.json", get(openapi_json))
        .nest("/api/v1/auth", auth_routes)
        .nest("/api/v1/users", user_routes)
        .with_state(state)
        // Dropping the handler future on timeout releases any pooled connection
        .layer(TimeoutLayer::new(request_timeout))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
}

#[cfg(test)]
mod tests {
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use sea_orm::{DatabaseBackend, MockDatabase, MockExecResult};
    use serde_json::{json, Value};
    use tower::Service;
    use uuid::Uuid;

    use super::*;
    use crate::application::identity::fakes::FakeRepos;

    fn router_with(repos: Arc<FakeRepos>, db: DatabaseConnection) -> Router {
        let state = AppState::new(repos, Arc::new(db), Duration::from_secs(60));
        create_api_router(state, Duration::from_secs(5))
    }

    fn router(repos: Arc<FakeRepos>) -> Router {
        router_with(repos, DatabaseConnection::default())
    }

    async fn send(app: &Router, req: Request<Body>) -> (StatusCode, Value) {
        let mut svc = app.clone().into_service();
        let resp = svc.call(req).await.unwrap();
        let status = resp.status();
        let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX)
            .await
            .unwrap();
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or(Value::Null)
        };
        (status, body)
    }

    fn json_req(method: &str, uri: &str, body: Value) -> Request<Body> {
        Request::builder()
            .method(method)
            .uri(uri)
            .header("content-type", "application/json")
            .body(Body::from(serde_json::to_vec(&body).unwrap()))
            .unwrap()
    }

    fn get_req(uri: &str) -> Request<Body> {
        Request::builder().uri(uri).body(Body::empty()).unwrap()
    }

    #[tokio::test]
    async fn create_then_fetch_by_email() {
        let app = router(Arc::new(FakeRepos::default()));

        let (status, body) = send(
            &app,
            json_req(
                "POST",
                "/api/v1/auth/users",
                json!({"email": "a@x.com", "password_hash": "$2b$04$hash", "full_name": "Ada"}),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(body["data"]["user_role"], "user");
        assert!(body["data"].get("password_hash").is_none());

        let (status, body) = send(&app, get_req("/api/v1/auth/users/by-email/a@x.com")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"]["full_name"], "Ada");
    }

    #[tokio::test]
    async fn timestamps_use_display_layout() {
        let repos = Arc::new(FakeRepos::default());
        let id = repos.seed("a@x.com", "pw", "user");
        let app = router(repos);

        let (_, body) = send(&app, get_req(&format!("/api/v1/users/{id}"))).await;
        let created_at = body["data"]["created_at"].as_str().unwrap();
        assert!(chrono::NaiveDateTime::parse_from_str(created_at, "%d.%m.%Y %H:%M:%S").is_ok());
    }

    #[tokio::test]
    async fn duplicate_registration_is_409() {
        let repos = Arc::new(FakeRepos::default());
        repos.seed("a@x.com", "pw", "user");
        let app = router(repos);

        let (status, body) = send(
            &app,
            json_req(
                "POST",
                "/api/v1/auth/users",
                json!({"email": "a@x.com", "password_hash": "h", "full_name": "Dup"}),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::CONFLICT);
        assert_eq!(body["success"], false);
    }

    #[tokio::test]
    async fn invalid_email_body_is_422() {
        let app = router(Arc::new(FakeRepos::default()));
        let (status, _) = send(
            &app,
            json_req("POST", "/api/v1/auth/emails/check", json!({"email": "nope"})),
        )
        .await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[tokio::test]
    async fn login_statuses() {
        let repos = Arc::new(FakeRepos::default());
        repos.seed("a@x.com", "right", "user");
        let app = router(repos);

        let (ok, body) = send(
            &app,
            json_req("POST", "/api/v1/auth/login", json!({"email": "a@x.com", "password": "right"})),
        )
        .await;
        assert_eq!(ok, StatusCode::OK);
        assert_eq!(body["data"]["email"], "a@x.com");

        let (denied, _) = send(
            &app,
            json_req("POST", "/api/v1/auth/login", json!({"email": "a@x.com", "password": "wrong"})),
        )
        .await;
        assert_eq!(denied, StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn malformed_user_id_is_400() {
        let app = router(Arc::new(FakeRepos::default()));
        let (status, body) = send(&app, get_req("/api/v1/users/not-a-uuid")).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["success"], false);
    }

    #[tokio::test]
    async fn unknown_user_is_404() {
        let app = router(Arc::new(FakeRepos::default()));
        let (status, _) = send(&app, get_req(&format!("/api/v1/users/{}", Uuid::new_v4()))).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn list_users_filters_and_paginates() {
        let repos = Arc::new(FakeRepos::default());
        for i in 0..3 {
            repos.seed(&format!("admin{i}@x.com"), "pw", "admin");
        }
        repos.seed("plain@x.com", "pw", "user");
        let app = router(repos);

        let (status, body) = send(&app, get_req("/api/v1/users?user_role=admin&page=1&limit=2")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"]["total"], 3);
        assert_eq!(body["data"]["items"].as_array().unwrap().len(), 2);
        assert_eq!(body["data"]["total_pages"], 2);

        // Blank filters are ignored
        let (_, body) = send(&app, get_req("/api/v1/users?full_name=&email=")).await;
        assert_eq!(body["data"]["total"], 4);
    }

    #[tokio::test]
    async fn zero_page_is_400() {
        let app = router(Arc::new(FakeRepos::default()));
        let (status, _) = send(&app, get_req("/api/v1/users?page=0")).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn patch_then_delete_twice() {
        let repos = Arc::new(FakeRepos::default());
        let id = repos.seed("a@x.com", "pw", "user");
        let app = router(repos);

        let (status, body) = send(
            &app,
            json_req("PATCH", &format!("/api/v1/users/{id}"), json!({"full_name": "Renamed"})),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"]["full_name"], "Renamed");
        assert!(body["data"]["updated_at"].is_string());

        for _ in 0..2 {
            let req = Request::builder()
                .method("DELETE")
                .uri(format!("/api/v1/users/{id}"))
                .body(Body::empty())
                .unwrap();
            let (status, _) = send(&app, req).await;
            assert_eq!(status, StatusCode::OK);
        }

        let (status, _) = send(&app, get_req(&format!("/api/v1/users/{id}"))).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn change_password_with_wrong_current_is_401() {
        let repos = Arc::new(FakeRepos::default());
        let id = repos.seed("a@x.com", "current", "user");
        let app = router(repos);

        let (status, _) = send(
            &app,
            json_req(
                "POST",
                &format!("/api/v1/users/{id}/password"),
                json!({"current_password": "nope", "new_password_hash": "$2b$04$x"}),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn role_change_is_visible() {
        let repos = Arc::new(FakeRepos::default());
        let id = repos.seed("a@x.com", "pw", "user");
        let app = router(repos);

        let (status, _) = send(
            &app,
            json_req("PUT", &format!("/api/v1/users/{id}/role"), json!({"new_user_role": "admin"})),
        )
        .await;
        assert_eq!(status, StatusCode::OK);

        let (_, body) = send(&app, get_req(&format!("/api/v1/users/{id}"))).await;
        assert_eq!(body["data"]["user_role"], "admin");
    }

    #[tokio::test]
    async fn refresh_token_round() {
        let repos = Arc::new(FakeRepos::default());
        let id = repos.seed("a@x.com", "pw", "user");
        let app = router(repos);

        let (status, _) = send(
            &app,
            json_req(
                "POST",
                "/api/v1/auth/refresh-tokens",
                json!({"user_id": id, "refresh_token": "tok", "expires_in": "2030-01-01T00:00:00Z"}),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);

        let check = || json_req("POST", "/api/v1/auth/refresh-tokens/check", json!({"refresh_token": "tok"}));
        assert_eq!(send(&app, check()).await.0, StatusCode::OK);

        let req = Request::builder()
            .method("DELETE")
            .uri(format!("/api/v1/auth/refresh-tokens/users/{id}"))
            .body(Body::empty())
            .unwrap();
        assert_eq!(send(&app, req).await.0, StatusCode::OK);
        assert_eq!(send(&app, check()).await.0, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn verification_code_is_single_use() {
        let app = router(Arc::new(FakeRepos::default()));

        let (status, _) = send(
            &app,
            json_req("PUT", "/api/v1/auth/verification-codes", json!({"email": "a@x.com", "code": "123456"})),
        )
        .await;
        assert_eq!(status, StatusCode::OK);

        let verify = || {
            json_req(
                "POST",
                "/api/v1/auth/verification-codes/verify",
                json!({"email": "a@x.com", "code": "123456"}),
            )
        };
        assert_eq!(send(&app, verify()).await.1["data"]["valid"], true);
        assert_eq!(send(&app, verify()).await.1["data"]["valid"], false);
    }

    #[tokio::test]
    async fn health_reports_database_state() {
        let down = router(Arc::new(FakeRepos::default()));
        let (status, body) = send(&down, get_req("/health")).await;
        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(body["status"], "degraded");

        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_exec_results([MockExecResult {
                last_insert_id: 0,
                rows_affected: 1,
            }])
            .into_connection();
        let up = router_with(Arc::new(FakeRepos::default()), db);
        let (status, body) = send(&up, get_req("/health")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["database"]["status"], "ok");
    }

    #[tokio::test]
    async fn openapi_document_lists_routes() {
        let app = router(Arc::new(FakeRepos::default()));
        let (status, body) = send(&app, get_req("/api-docs/openapi.json")).await;
        assert_eq!(status, StatusCode::OK);

        let paths = body["paths"].as_object().unwrap();
        assert!(paths.contains_key("/api/v1/users/{id}/role"));
        assert!(paths.contains_key("/api/v1/auth/verification-codes/verify"));
    }
}
