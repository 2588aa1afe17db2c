use std::{sync::Arc, time::Duration};
use tower_governor::{
    GovernorLayer, governor::GovernorConfigBuilder, key_extractor::SmartIpKeyExtractor,
};

use axum::{Router, routing::get};

use crate::{
    errors::{Error, Result},
    routes::auth_route::user::{login_token, logout},
    state::AppState,
};

pub mod user;

pub fn auth_router(config: AppState) -> Result<Router<AppState>> {
    // ? rate limiter for the login token endpoint, keyed on client ip
    let governor_conf = Arc::new(
        GovernorConfigBuilder::default()
            .per_second(12)
            .burst_size(10)
            .key_extractor(SmartIpKeyExtractor)
            .finish()
            .ok_or_else(|| Error::Config("invalid login rate limit".to_string()))?,
    );
    let governor_limiter = governor_conf.limiter().clone();
    let interval = Duration::from_secs(60);
    // a separate background task to clean up
    std::thread::spawn(move || {
        loop {
            std::thread::sleep(interval);
            tracing::debug!("rate limiting storage size: {}", governor_limiter.len());
            governor_limiter.retain_recent();
        }
    });

    Ok(Router::new()
        .route(
            "/login/token",
            get(login_token).layer(GovernorLayer {
                config: governor_conf,
            }),
        )
        .route("/logout", get(logout))
        .with_state(config))
}
