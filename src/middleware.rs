use std::net::SocketAddr;

use axum::{
    extract::{ConnectInfo, FromRequestParts, Request, State},
    http::{HeaderMap, header::COOKIE, request::Parts},
    middleware::Next,
    response::{IntoResponse, Response},
};

use crate::{
    consts::auth_const::{DEV_EMAIL, DEV_NAME, SESSION_COOKIE},
    errors::{Error, Result as RResult},
    models::session::{Role, SessionUser},
    state::AppState,
    utils::token::session_key,
};

/// The signed-in user, put into the request by [`auth_session_middleware`].
#[derive(Debug, Clone)]
pub struct CurrentUser(pub SessionUser);

pub async fn auth_session_middleware(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<impl IntoResponse, Response> {
    let token = session_cookie(request.headers()).map(str::to_string);
    let from_loopback = request
        .extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .is_some_and(|ConnectInfo(addr)| addr.ip().is_loopback());

    let user = authenticate(&state, token.as_deref(), from_loopback)
        .await
        .map_err(IntoResponse::into_response)?;
    request.extensions_mut().insert(CurrentUser(user));

    Ok(next.run(request).await)
}

async fn authenticate(
    state: &AppState,
    token: Option<&str>,
    from_loopback: bool,
) -> RResult<SessionUser> {
    if let Some(token) = token {
        let key = session_key(&state.config.session_secret, token)?;
        if let Some(session) = state.sessions.get(&key).await {
            return Ok(session.user);
        }
    }
    if state.config.local_dev_bypass && from_loopback {
        return Ok(dev_user());
    }

    Err(Error::MissingSession)
}

/// Value of the session cookie, if the request carries one.
pub fn session_cookie(headers: &HeaderMap) -> Option<&str> {
    headers
        .get_all(COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|value| value.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(name, _)| *name == SESSION_COOKIE)
        .map(|(_, value)| value)
        .filter(|value| !value.is_empty())
}

fn dev_user() -> SessionUser {
    SessionUser {
        email: DEV_EMAIL.to_string(),
        name: DEV_NAME.to_string(),
        groups: Vec::new(),
        roles: vec![Role::Sagsbehandler, Role::Administrator],
    }
}

pub fn require_role(user: &SessionUser, role: Role) -> RResult<()> {
    if user.has_role(role) {
        Ok(())
    } else {
        tracing::warn!("{} lacks role {}", user.email, role);
        Err(Error::AccessDenied(role))
    }
}

impl<S> FromRequestParts<S> for CurrentUser
where
    S: Send + Sync,
{
    type Rejection = Error;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> RResult<Self> {
        parts
            .extensions
            .get::<CurrentUser>()
            .cloned()
            .ok_or(Error::MissingSession)
    }
}
