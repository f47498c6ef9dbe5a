//! Route guard for the back-office areas.
//!
//! `/dashboard` needs a live session, `/admin` additionally needs the
//! profile role `admin`. Failures redirect; they never surface as errors.

use std::sync::Arc;

use axum::{
    body::Body,
    extract::State,
    http::{HeaderMap, Request, header::AUTHORIZATION},
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
};
use axum_extra::extract::cookie::CookieJar;

use pricing_types::{AuthBackend, Session};

/// Default name of the session cookie set by the hosted auth backend.
pub const DEFAULT_SESSION_COOKIE: &str = "sb-access-token";

const LOGIN_PATH: &str = "/login";
const DASHBOARD_PATH: &str = "/dashboard";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProtectedArea {
    Admin,
    Dashboard,
}

/// Returns the guarded area a path belongs to, if any.
pub fn protected_area(path: &str) -> Option<ProtectedArea> {
    let within = |root: &str| {
        path.strip_prefix(root)
            .is_some_and(|rest| rest.is_empty() || rest.starts_with('/'))
    };

    if within("/admin") {
        Some(ProtectedArea::Admin)
    } else if within(DASHBOARD_PATH) {
        Some(ProtectedArea::Dashboard)
    } else {
        None
    }
}

/// Extracts the bearer token from the Authorization header.
fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    let header = headers.get(AUTHORIZATION)?.to_str().ok()?;
    header
        .strip_prefix("Bearer ")
        .or_else(|| header.strip_prefix("bearer "))
        .map(str::trim)
        .filter(|token| !token.is_empty())
}

/// Percent-encodes the characters that would break a query value.
fn encode_query_value(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '%' => out.push_str("%25"),
            '&' => out.push_str("%26"),
            '+' => out.push_str("%2B"),
            '=' => out.push_str("%3D"),
            '?' => out.push_str("%3F"),
            '#' => out.push_str("%23"),
            _ => out.push(c),
        }
    }
    out
}

fn login_redirect(path: &str) -> Response {
    Redirect::temporary(&format!("{LOGIN_PATH}?next={}", encode_query_value(path))).into_response()
}

/// Session lookup state shared by the guard middleware.
pub struct RouteGuard<A: AuthBackend> {
    auth: A,
    session_cookie: String,
}

impl<A: AuthBackend> RouteGuard<A> {
    pub fn new(auth: A) -> Self {
        Self::with_session_cookie(auth, DEFAULT_SESSION_COOKIE)
    }

    pub fn with_session_cookie(auth: A, session_cookie: impl Into<String>) -> Self {
        Self {
            auth,
            session_cookie: session_cookie.into(),
        }
    }

    /// Backend errors count as "no session".
    async fn session(&self, token: &str) -> Option<Session> {
        match self.auth.session(token).await {
            Ok(session) => session,
            Err(e) => {
                tracing::warn!(error = %e, "session lookup failed");
                None
            }
        }
    }

    /// Backend errors and missing profiles count as "not admin".
    async fn is_admin(&self, session: &Session) -> bool {
        match self.auth.role(session.user_id).await {
            Ok(role) => role.is_some_and(|r| r.is_admin()),
            Err(e) => {
                tracing::warn!(error = %e, user_id = %session.user_id, "role lookup failed");
                false
            }
        }
    }
}

/// Guard middleware.
///
/// - no session: `307` to `/login?next=<path>`
/// - `/admin` without the admin role: `307` to `/dashboard`
/// - otherwise the `Session` is placed in request extensions
pub async fn guard_middleware<A: AuthBackend>(
    State(guard): State<Arc<RouteGuard<A>>>,
    jar: CookieJar,
    mut request: Request<Body>,
    next: Next,
) -> Response {
    let path = request.uri().path().to_string();
    let Some(area) = protected_area(&path) else {
        return next.run(request).await;
    };

    let token = bearer_token(request.headers())
        .map(str::to_string)
        .or_else(|| {
            jar.get(&guard.session_cookie)
                .map(|cookie| cookie.value().to_string())
        });

    let session = match token {
        Some(token) => guard.session(&token).await,
        None => None,
    };

    let Some(session) = session else {
        tracing::debug!(%path, "no session, redirecting to login");
        return login_redirect(&path);
    };

    if area == ProtectedArea::Admin && !guard.is_admin(&session).await {
        tracing::debug!(%path, user_id = %session.user_id, "not an admin, redirecting");
        return Redirect::temporary(DASHBOARD_PATH).into_response();
    }

    request.extensions_mut().insert(session);
    next.run(request).await
}
