use serde::Serialize;
use serde_json::json;
use tracing::{info, warn};

use crate::{
    consts::db_const::ISSUE_TABLE,
    errors::{Error, Result},
    models::{
        issue::{ISSUE_FIELDS, Issue, IssueQuery, IssueStatus},
        log::{AuditAction, CreateAuditLogEntry},
    },
    repository::{fakturering, guarded_update},
    state::Db,
    utils::{get_record_id::issue_record_id, time::time_now},
};

#[derive(Serialize)]
struct Resolution {
    status: IssueStatus,
    loest_af: String,
    loest_tid: String,
}

pub async fn list(db: &Db, query: &IssueQuery) -> Result<Vec<Issue>> {
    let mut clauses = vec!["true".to_string()];
    if query.status.is_some() {
        clauses.push("status = $status".to_string());
    }
    if query.fakturering_id.is_some() {
        clauses.push("fakturering_id = $fakturering_id".to_string());
    }
    let issues: Vec<Issue> = db
        .query(format!(
            "SELECT {ISSUE_FIELDS} FROM type::table($table) WHERE {} ORDER BY id ASC;",
            clauses.join(" AND ")
        ))
        .bind(("table", ISSUE_TABLE))
        .bind(("status", json!(query.status)))
        .bind(("fakturering_id", json!(query.fakturering_id)))
        .await?
        .take(0)?;
    Ok(issues)
}

pub async fn find(db: &Db, id: i64) -> Result<Issue> {
    let issues: Vec<Issue> = db
        .query(format!("SELECT {ISSUE_FIELDS} FROM $rid;"))
        .bind(("rid", issue_record_id(id)))
        .await?
        .take(0)?;
    issues.into_iter().next().ok_or(Error::IssueNotFound)
}

/// Marks an open issue as accepted by `bruger` and logs it on the row it
/// belongs to.
pub async fn accept(db: &Db, id: i64, bruger: &str) -> Result<Issue> {
    let issue = find(db, id).await?;
    if issue.status != IssueStatus::Open {
        warn!("Issue {} already resolved", id);
        return Err(Error::IssueAlreadyResolved);
    }
    let record = fakturering::find_by_id(db, issue.fakturering_id).await?;

    let now = time_now();
    let entry = CreateAuditLogEntry::snapshot(&record, AuditAction::AccepterProblem, bruger, now.clone());
    let resolution = Resolution {
        status: IssueStatus::UserAccepted,
        loest_af: bruger.to_string(),
        loest_tid: now.clone(),
    };
    guarded_update(
        db,
        issue_record_id(id),
        "status",
        IssueStatus::Open.to_string(),
        resolution,
        entry,
    )
    .await
    .map_err(|e| match e {
        Error::StatusConflict => Error::IssueAlreadyResolved,
        other => other,
    })?;
    info!("Issue {} on row {} accepted by {}", id, issue.fakturering_id, bruger);

    Ok(Issue {
        status: IssueStatus::UserAccepted,
        loest_af: Some(bruger.to_string()),
        loest_tid: Some(now),
        ..issue
    })
}
