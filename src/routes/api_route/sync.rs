use axum::{Json, extract::State};

use crate::{
    errors::Result,
    middleware::{CurrentUser, require_role},
    models::{invoice_text::MessageResponse, session::Role, sync::SyncStatusResponse},
    repository::constants,
    state::AppState,
};

pub async fn trigger_sync(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
) -> Result<Json<MessageResponse>> {
    require_role(&user, Role::Administrator)?;
    state.sync.trigger(&user.email).await?;
    Ok(Json(MessageResponse {
        success: true,
        message: "Synkroniseringen er startet.".to_string(),
    }))
}

pub async fn sync_status(State(state): State<AppState>) -> Result<Json<SyncStatusResponse>> {
    let konstanter = constants::list(&state.sdb).await?;
    let (sidst_startet, remaining) = state.sync.status().await;
    let mut ventetid_sekunder = remaining.as_secs();
    if remaining.subsec_nanos() > 0 {
        ventetid_sekunder += 1;
    }

    Ok(Json(SyncStatusResponse {
        konstanter,
        sidst_startet: sidst_startet.map(|t| t.to_rfc3339()),
        ventetid_sekunder,
    }))
}
