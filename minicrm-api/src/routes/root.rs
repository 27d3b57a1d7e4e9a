/// Welcome document
///
/// ```text
/// GET /
/// ```

use axum::Json;
use serde::Serialize;

/// Top-level endpoint groups
#[derive(Debug, Serialize)]
pub struct EndpointIndex {
    pub health: &'static str,
    pub auth: &'static str,
    pub users: &'static str,
    pub customers: &'static str,
    pub tasks: &'static str,
}

#[derive(Debug, Serialize)]
pub struct WelcomeResponse {
    pub message: &'static str,
    pub version: &'static str,
    pub endpoints: EndpointIndex,
}

pub async fn welcome() -> Json<WelcomeResponse> {
    Json(WelcomeResponse {
        message: "Welcome to Mini CRM API",
        version: env!("CARGO_PKG_VERSION"),
        endpoints: EndpointIndex {
            health: "/health",
            auth: "/auth",
            users: "/users",
            customers: "/customers",
            tasks: "/tasks",
        },
    })
}
