use axum::{
    Json,
    extract::State,
    http::{HeaderMap, header::SET_COOKIE},
    response::{IntoResponse, Redirect, Response},
};
use tracing::info;

use crate::{
    consts::auth_const::SESSION_COOKIE,
    errors::Result,
    middleware::{CurrentUser, session_cookie},
    models::session::{Session, SessionUser},
    state::AppState,
    utils::{
        jwt::decode_jwt,
        token::{generate_session_token, session_key},
        validated_form::ValidatedQuery,
    },
};

#[derive(Debug, Clone, serde::Deserialize, validator::Validate)]
pub struct LoginTokenRequest {
    #[validate(length(min = 1, max = 8192))]
    pub jwt: String,
    pub next: Option<String>,
}

/// Only paths on this site are followed after login.
fn redirect_target(next: Option<&str>) -> &str {
    match next {
        Some(path) if path.starts_with('/') && !path.starts_with("//") && !path.contains('\\') => {
            path
        }
        _ => "/",
    }
}

pub async fn login_token(
    State(state): State<AppState>,
    ValidatedQuery(input): ValidatedQuery<LoginTokenRequest>,
) -> Result<Response> {
    let data = decode_jwt(
        &input.jwt,
        &state.config.jwt_secret,
        state.config.jwt_leeway_secs,
    )?;
    let user = SessionUser::from_claims(data.claims, &state.config.roles);
    info!("{} signed in with roles {:?}", user.email, user.roles);

    let token = generate_session_token();
    let key = session_key(&state.config.session_secret, &token)?;
    let ttl_hours = state.config.session_ttl_hours;
    state.sessions.insert(key, Session::new(user, ttl_hours)).await;

    let cookie = format!(
        "{SESSION_COOKIE}={token}; Path=/; HttpOnly; SameSite=Lax; Max-Age={}",
        ttl_hours * 3600
    );
    Ok((
        [(SET_COOKIE, cookie)],
        Redirect::to(redirect_target(input.next.as_deref())),
    )
        .into_response())
}

pub async fn logout(State(state): State<AppState>, headers: HeaderMap) -> Result<Response> {
    if let Some(token) = session_cookie(&headers) {
        let key = session_key(&state.config.session_secret, token)?;
        state.sessions.remove(&key).await;
    }
    let cookie = format!("{SESSION_COOKIE}=; Path=/; HttpOnly; SameSite=Lax; Max-Age=0");
    Ok(([(SET_COOKIE, cookie)], Redirect::to("/")).into_response())
}

pub async fn me(CurrentUser(user): CurrentUser) -> Json<SessionUser> {
    Json(user)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn redirect_stays_on_site() {
        assert_eq!(redirect_target(Some("/faktureret?side=2")), "/faktureret?side=2");
        assert_eq!(redirect_target(Some("//evil.example")), "/");
        assert_eq!(redirect_target(Some("https://evil.example")), "/");
        assert_eq!(redirect_target(Some("/\\evil.example")), "/");
        assert_eq!(redirect_target(None), "/");
    }
}
