use axum::{
    Router, middleware,
    routing::{get, post, put},
};

use crate::{
    middleware::auth_session_middleware,
    routes::{
        api_route::{
            export::export_csv,
            fakturering::{
                apply_intent, create_record, list_view, read_log, read_record, statistics,
                update_record,
            },
            indstillinger::{create_setting, delete_setting, list_settings, update_setting},
            problem::{accept_issue, list_issues},
            sync::{sync_status, trigger_sync},
        },
        auth_route::user::me,
    },
    state::AppState,
};

pub mod export;
pub mod fakturering;
pub mod indstillinger;
pub mod problem;
pub mod sync;

/// Everything under `/api`; all of it needs a session.
pub fn api_router(config: AppState) -> Router<AppState> {
    Router::new()
        .route("/me", get(me))
        // ! rows
        .route("/views/{view}", get(list_view))
        .route("/fakturering", post(create_record))
        .route("/fakturering/{id}", get(read_record).post(update_record))
        .route("/fakturering/{id}/handling", post(apply_intent))
        .route("/fakturering/{id}/log", get(read_log))
        .route("/statistik", get(statistics))
        .route("/export", get(export_csv))
        // ! issues
        .route("/problemer", get(list_issues))
        .route("/problemer/{id}/accepter", post(accept_issue))
        // ! settings
        .route("/indstillinger", get(list_settings).post(create_setting))
        .route(
            "/indstillinger/{fakturalinje}",
            put(update_setting).delete(delete_setting),
        )
        // ! sync
        .route("/sync/trigger", post(trigger_sync))
        .route("/sync/status", get(sync_status))
        .layer(middleware::from_fn_with_state(
            config.clone(),
            auth_session_middleware,
        ))
        .with_state(config)
}
