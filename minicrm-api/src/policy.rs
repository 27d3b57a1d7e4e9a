/// Route role table
///
/// Every protected route is declared here with the roles allowed to call it.
/// The authorization layer looks requests up by method and matched path
/// pattern; a protected route with no entry is refused outright.
///
/// Ownership rules (an employee touching only their own tasks) are finer than a
/// role and live in the task service.

use axum::http::Method;
use minicrm_shared::models::user::Role;

const ADMIN: &[Role] = &[Role::Admin];
const ANY_ROLE: &[Role] = &[Role::Admin, Role::Employee];

/// Allowed roles for one (method, path pattern) pair
#[derive(Debug, Clone)]
pub struct RouteRule {
    pub method: Method,
    pub path: &'static str,
    pub roles: &'static [Role],
}

impl RouteRule {
    const fn new(method: Method, path: &'static str, roles: &'static [Role]) -> Self {
        Self {
            method,
            path,
            roles,
        }
    }
}

/// Path patterns use axum's `:param` syntax, exactly as registered on the router
pub static ROUTE_RULES: &[RouteRule] = &[
    RouteRule::new(Method::POST, "/customers", ADMIN),
    RouteRule::new(Method::GET, "/customers", ANY_ROLE),
    RouteRule::new(Method::GET, "/customers/:id", ANY_ROLE),
    RouteRule::new(Method::PATCH, "/customers/:id", ADMIN),
    RouteRule::new(Method::DELETE, "/customers/:id", ADMIN),
    RouteRule::new(Method::POST, "/tasks", ADMIN),
    RouteRule::new(Method::GET, "/tasks", ANY_ROLE),
    RouteRule::new(Method::PATCH, "/tasks/:id/status", ANY_ROLE),
    RouteRule::new(Method::GET, "/users", ADMIN),
    RouteRule::new(Method::GET, "/users/:id", ADMIN),
    RouteRule::new(Method::PATCH, "/users/:id", ADMIN),
];

/// Roles allowed on `method` + `path`, or `None` if the route is undeclared
///
/// `HEAD` is served by the `GET` handler and shares its rule.
pub fn allowed_roles(method: &Method, path: &str) -> Option<&'static [Role]> {
    let is_head = *method == Method::HEAD;

    ROUTE_RULES
        .iter()
        .find(|rule| {
            (rule.method == *method || (is_head && rule.method == Method::GET)) && rule.path == path
        })
        .map(|rule| rule.roles)
}
