use serde::{Deserialize, Serialize};
use surrealdb::{RecordId, Response};

use crate::{
    consts::db_const::LOG_TABLE,
    errors::{Error, Result},
    models::log::CreateAuditLogEntry,
    state::Db,
};

pub mod constants;
pub mod fakturering;
pub mod invoice_text;
pub mod issue;
pub mod list_query;
pub mod log;

/// Thrown inside a transaction when the guarded row no longer matches.
pub const CONFLICT_MARKER: &str = "vejman:conflict";

#[derive(Debug, Deserialize)]
pub(crate) struct CountRow {
    pub total: u64,
}

/// Surfaces the first failing statement of a multi-statement query. A failed
/// guard maps to `Error::StatusConflict`.
pub(crate) fn check_guarded(mut response: Response) -> Result<()> {
    let errors = response.take_errors();
    if errors.is_empty() {
        return Ok(());
    }
    if errors
        .values()
        .any(|e| e.to_string().contains(CONFLICT_MARKER))
    {
        return Err(Error::StatusConflict);
    }
    let mut errors: Vec<_> = errors.into_iter().collect();
    errors.sort_by_key(|(index, _)| *index);
    match errors.into_iter().next() {
        Some((_, error)) => Err(Error::SurrealError(error)),
        None => Ok(()),
    }
}

/// Merges `changes` into `rid` only while `guard_field` still equals
/// `expected`, and appends `entry` to the audit log in the same transaction.
pub(crate) async fn guarded_update<C>(
    db: &Db,
    rid: RecordId,
    guard_field: &'static str,
    expected: String,
    changes: C,
    entry: CreateAuditLogEntry,
) -> Result<()>
where
    C: Serialize + 'static,
{
    let sql = format!(
        "BEGIN TRANSACTION;\n\
         LET $updated = (UPDATE $rid MERGE $changes WHERE {guard_field} = $expected);\n\
         IF array::len($updated) == 0 {{ THROW \"{CONFLICT_MARKER}\" }};\n\
         CREATE type::table($log_table) CONTENT $entry RETURN NONE;\n\
         COMMIT TRANSACTION;"
    );
    let response = db
        .query(sql)
        .bind(("rid", rid))
        .bind(("expected", expected))
        .bind(("changes", changes))
        .bind(("log_table", LOG_TABLE))
        .bind(("entry", entry))
        .await?;
    check_guarded(response)
}
