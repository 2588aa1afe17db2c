use axum::{Json, extract::State};
use serde::Serialize;

use crate::{
    errors::Result,
    middleware::{CurrentUser, require_role},
    models::{
        issue::{Issue, IssueQuery},
        session::Role,
    },
    repository::issue,
    state::AppState,
    utils::validated_form::{PathParam, ValidatedQuery},
};

#[derive(Serialize, Debug)]
pub struct IssueResponse {
    pub success: bool,
    pub message: String,
    pub issue: Issue,
}

pub async fn list_issues(
    State(state): State<AppState>,
    ValidatedQuery(query): ValidatedQuery<IssueQuery>,
) -> Result<Json<Vec<Issue>>> {
    Ok(Json(issue::list(&state.sdb, &query).await?))
}

pub async fn accept_issue(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    PathParam(id): PathParam<i64>,
) -> Result<Json<IssueResponse>> {
    require_role(&user, Role::Sagsbehandler)?;
    let issue = issue::accept(&state.sdb, id, &user.email).await?;
    Ok(Json(IssueResponse {
        success: true,
        message: "Problemet er accepteret.".to_string(),
        issue,
    }))
}
