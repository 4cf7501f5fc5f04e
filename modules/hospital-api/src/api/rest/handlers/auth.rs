use axum::extract::State;
use axum::http::StatusCode;
use axum::Extension;
use axum_extra::extract::cookie::CookieJar;
use tracing::info;

use crate::api::rest::auth::{removal_cookie, session_cookie};
use crate::api::rest::dto::{
    AuthRes, LoginReq, MessageDto, ProfileRes, RegisterReq, StatsDto, UpdateProfileReq, UserDto,
};
use crate::api::rest::error::{ApiError, Json};
use crate::api::rest::AppState;
use crate::domain::model::{AuthenticatedUser, Role};

/// Register a new account and issue a session token.
pub async fn register(
    State(state): State<AppState>,
    jar: CookieJar,
    Json(req): Json<RegisterReq>,
) -> Result<(StatusCode, CookieJar, Json<AuthRes>), ApiError> {
    info!(email = %req.email, "registering account");

    let session = state.service.register(req.into()).await?;
    let jar = jar.add(session_cookie(&session.token, state.secure_cookies));
    Ok((StatusCode::CREATED, jar, Json(session.into())))
}

/// Exchange credentials for a fresh session token.
pub async fn login(
    State(state): State<AppState>,
    jar: CookieJar,
    Json(req): Json<LoginReq>,
) -> Result<(CookieJar, Json<AuthRes>), ApiError> {
    let session = state.service.login(&req.email, &req.password).await?;
    let jar = jar.add(session_cookie(&session.token, state.secure_cookies));
    Ok((jar, Json(session.into())))
}

/// Clear the session cookie.
pub async fn logout(jar: CookieJar) -> (CookieJar, Json<MessageDto>) {
    let jar = jar.add(removal_cookie());
    (jar, Json(MessageDto::new("Logged out successfully")))
}

/// The caller's identity plus role profile.
pub async fn get_profile(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
) -> Result<Json<ProfileRes>, ApiError> {
    let (user, profile, token) = state.service.profile(user.id).await?;
    Ok(Json(ProfileRes {
        user: UserDto::from(user),
        profile: profile.map(Into::into),
        token,
    }))
}

/// Apply partial updates to the caller's identity and role profile.
pub async fn update_profile(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Json(req): Json<UpdateProfileReq>,
) -> Result<Json<MessageDto>, ApiError> {
    info!(user = %user.id, "updating profile");

    state.service.update_profile(user.id, req.into()).await?;
    Ok(Json(MessageDto::new("Profile updated successfully")))
}

/// Admin-only system counters.
pub async fn stats(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
) -> Result<Json<StatsDto>, ApiError> {
    user.require_role(&[Role::Admin])?;

    let stats = state.service.stats().await?;
    Ok(Json(stats.into()))
}
