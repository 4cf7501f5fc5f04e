//! Authorization gate: bearer-token middleware plus the cookie helpers the
//! auth handlers share.
//!
//! The token is taken from `Authorization: Bearer <t>` first, then from the
//! `token` cookie. Role checks run inside handlers via
//! `AuthenticatedUser::require_role`, stacked after this gate.

use axum::extract::{Request, State};
use axum::http::header::AUTHORIZATION;
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};

use crate::api::rest::error::ApiError;
use crate::api::rest::AppState;
use crate::domain::error::DomainError;

pub const TOKEN_COOKIE: &str = "token";
const TOKEN_COOKIE_DAYS: i64 = 30;

/// Resolve the caller and inject `AuthenticatedUser` into request extensions
/// for downstream handlers. Any failure is a 401.
pub async fn require_auth(
    State(state): State<AppState>,
    jar: CookieJar,
    mut req: Request,
    next: Next,
) -> Response {
    match resolve_caller(&state, &jar, req.headers()).await {
        Ok(user) => {
            req.extensions_mut().insert(user);
            next.run(req).await
        }
        Err(err) => err.into_response(),
    }
}

async fn resolve_caller(
    state: &AppState,
    jar: &CookieJar,
    headers: &axum::http::HeaderMap,
) -> Result<crate::domain::model::AuthenticatedUser, ApiError> {
    let bearer = headers
        .get(AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .map(str::to_string);

    let token = bearer
        .or_else(|| jar.get(TOKEN_COOKIE).map(|c| c.value().to_string()))
        .ok_or(DomainError::Unauthenticated)?;

    Ok(state.service.authenticate(&token).await?)
}

/// Session cookie carrying the signed token: httpOnly, 30-day max age,
/// secure + cross-site when running in production.
pub fn session_cookie(token: &str, secure: bool) -> Cookie<'static> {
    let mut cookie = Cookie::new(TOKEN_COOKIE, token.to_string());
    cookie.set_http_only(true);
    cookie.set_path("/");
    cookie.set_max_age(time::Duration::days(TOKEN_COOKIE_DAYS));
    if secure {
        cookie.set_secure(true);
        cookie.set_same_site(SameSite::None);
    } else {
        cookie.set_same_site(SameSite::Lax);
    }
    cookie
}

/// Expired empty cookie used by logout.
pub fn removal_cookie() -> Cookie<'static> {
    let mut cookie = Cookie::new(TOKEN_COOKIE, "");
    cookie.set_http_only(true);
    cookie.set_path("/");
    cookie.set_max_age(time::Duration::ZERO);
    cookie
}
