/// Application state and router builder
///
/// This module defines the shared application state and provides
/// a function to build the Axum router with all routes and middleware.
///
/// # Example
///
/// ```no_run
/// use minicrm_api::{app::AppState, config::Config};
/// use minicrm_shared::store::PgStore;
/// use sqlx::PgPool;
/// use std::sync::Arc;
///
/// # async fn example() -> anyhow::Result<()> {
/// let config = Config::from_env()?;
/// let pool = PgPool::connect(&config.database.url).await?;
/// let state = AppState::new(Arc::new(PgStore::new(pool)), config);
/// let app = minicrm_api::app::build_router(state);
/// # Ok(())
/// # }
/// ```

use crate::{config::Config, error::ApiError, policy};
use axum::{
    extract::{MatchedPath, Request, State},
    http::{header, HeaderValue, Method},
    middleware::{self, Next},
    response::Response,
    routing::{get, patch, post},
    Router,
};
use minicrm_shared::{
    auth::{authorization::authorize, jwt::TokenIssuer, principal::Principal, session},
    store::Store,
};
use std::sync::Arc;
use tower_http::{
    cors::CorsLayer,
    trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer},
};
use tracing::{debug, warn, Level};

/// Shared application state
///
/// This is cloned for each request handler via Axum's `State` extractor.
/// Uses Arc internally for cheap cloning.
#[derive(Clone)]
pub struct AppState {
    /// Storage behind every service call
    pub store: Arc<dyn Store>,

    /// Application configuration
    pub config: Arc<Config>,

    /// Signs and verifies access tokens
    pub tokens: Arc<TokenIssuer>,
}

impl AppState {
    /// Creates new application state
    pub fn new(store: Arc<dyn Store>, config: Config) -> Self {
        let tokens = TokenIssuer::new(config.jwt.secret.clone(), config.token_ttl());
        Self {
            store,
            config: Arc::new(config),
            tokens: Arc::new(tokens),
        }
    }
}

/// Builds the complete Axum router with all routes and middleware
///
/// # Architecture
///
/// ```text
/// /
/// ├── GET  /                      # Welcome document (public)
/// ├── GET  /health                # Health check (public)
/// ├── /auth/                      # Public
/// │   ├── POST /register
/// │   └── POST /login
/// ├── /users/                     # Admin
/// │   ├── GET   /
/// │   ├── GET   /:id
/// │   └── PATCH /:id
/// ├── /customers/                 # Reads for any role, writes for admins
/// │   ├── POST   /
/// │   ├── GET    /
/// │   ├── GET    /:id
/// │   ├── PATCH  /:id
/// │   └── DELETE /:id
/// └── /tasks/
///     ├── POST  /                 # Admin
///     ├── GET   /                 # Scoped to the caller
///     └── PATCH /:id/status       # Owner or admin
/// ```
///
/// # Middleware Stack
///
/// Applied in order (outermost first):
/// 1. CORS (tower-http CorsLayer)
/// 2. Logging (tower-http TraceLayer)
/// 3. Authentication, then role authorization (protected routes only)
///
/// Authentication and authorization are route layers, so a path that matches
/// no route is a plain 404 with no token required.
pub fn build_router(state: AppState) -> Router {
    use crate::routes;

    let public_routes = Router::new()
        .route("/", get(routes::root::welcome))
        .route("/health", get(routes::health::health_check))
        .route("/auth/register", post(routes::auth::register))
        .route("/auth/login", post(routes::auth::login));

    let protected_routes = Router::new()
        .route("/users", get(routes::users::list_users))
        .route(
            "/users/:id",
            get(routes::users::get_user).patch(routes::users::update_role),
        )
        .route(
            "/customers",
            post(routes::customers::create_customer).get(routes::customers::list_customers),
        )
        .route(
            "/customers/:id",
            get(routes::customers::get_customer)
                .patch(routes::customers::update_customer)
                .delete(routes::customers::delete_customer),
        )
        .route(
            "/tasks",
            post(routes::tasks::create_task).get(routes::tasks::list_tasks),
        )
        .route("/tasks/:id/status", patch(routes::tasks::update_task_status))
        .route_layer(middleware::from_fn(authorize_layer))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            jwt_auth_layer,
        ));

    let cors = cors_layer(&state.config);

    Router::new()
        .merge(public_routes)
        .merge(protected_routes)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        .layer(cors)
        .with_state(state)
}

/// CORS policy from configuration
///
/// `*` allows any origin without credentials; an explicit list allows only those
/// origins, with credentials.
fn cors_layer(config: &Config) -> CorsLayer {
    if config.allows_any_origin() {
        return CorsLayer::permissive();
    }

    let origins: Vec<HeaderValue> = config
        .api
        .cors_origins
        .iter()
        .filter_map(|origin| origin.parse().ok())
        .collect();

    CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PATCH,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE])
        .allow_credentials(true)
        .max_age(std::time::Duration::from_secs(3600))
}

/// JWT authentication middleware layer
///
/// Validates the bearer token and injects the caller's [`Principal`] into
/// request extensions.
async fn jwt_auth_layer(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let principal = session::authenticate(req.headers(), &state.tokens).map_err(|e| {
        debug!(error = %e, path = %req.uri().path(), "Rejected unauthenticated request");
        e
    })?;

    req.extensions_mut().insert(principal);
    Ok(next.run(req).await)
}

/// Role authorization middleware layer
///
/// Looks the matched route up in [`policy::ROUTE_RULES`] and checks the
/// principal's role against it. Runs after [`jwt_auth_layer`].
async fn authorize_layer(req: Request, next: Next) -> Result<Response, ApiError> {
    let principal = req
        .extensions()
        .get::<Principal>()
        .ok_or_else(|| ApiError::Unauthorized("Missing credentials".to_string()))?;

    let path = req
        .extensions()
        .get::<MatchedPath>()
        .map(MatchedPath::as_str)
        .unwrap_or_else(|| req.uri().path());

    let Some(roles) = policy::allowed_roles(req.method(), path) else {
        warn!(method = %req.method(), path = %path, "No role rule for protected route");
        return Err(ApiError::Forbidden("Access denied".to_string()));
    };

    if let Err(e) = authorize(principal, roles) {
        debug!(user_id = %principal.id, method = %req.method(), path = %path, "Role check failed");
        return Err(e.into());
    }

    Ok(next.run(req).await)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{ApiConfig, DatabaseConfig, JwtConfig, LogFormat};
    use minicrm_shared::store::MemoryStore;

    fn config() -> Config {
        Config {
            api: ApiConfig {
                host: "127.0.0.1".to_string(),
                port: 0,
                cors_origins: vec!["http://crm.test".to_string()],
            },
            database: DatabaseConfig {
                url: "postgresql://localhost/unused".to_string(),
                max_connections: 1,
            },
            jwt: JwtConfig {
                secret: "test-secret-key-at-least-32-bytes-long".to_string(),
                expiration_hours: 2,
            },
            log_format: LogFormat::Pretty,
        }
    }

    #[test]
    fn test_app_state_uses_configured_ttl() {
        let state = AppState::new(Arc::new(MemoryStore::new()), config());
        assert_eq!(state.tokens.ttl(), chrono::Duration::hours(2));
    }

    #[test]
    fn test_build_router_with_explicit_origins() {
        let state = AppState::new(Arc::new(MemoryStore::new()), config());
        let _router = build_router(state);
    }
}
