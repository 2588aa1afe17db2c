use crate::{
    consts::db_const::LOG_TABLE,
    errors::Result,
    models::log::{AuditLogEntry, LOG_FIELDS},
    state::Db,
};

/// Audit trail of one row, newest first.
pub async fn list_for(db: &Db, fakturering_id: i64) -> Result<Vec<AuditLogEntry>> {
    let entries: Vec<AuditLogEntry> = db
        .query(format!(
            "SELECT {LOG_FIELDS} FROM type::table($table) \
             WHERE fakturering_id = $fakturering_id ORDER BY tidspunkt DESC;"
        ))
        .bind(("table", LOG_TABLE))
        .bind(("fakturering_id", fakturering_id))
        .await?
        .take(0)?;
    Ok(entries)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        models::{
            log::{AuditAction, CreateAuditLogEntry},
            status::FakturaStatus,
        },
        test_utils::{memory_db, record},
    };

    #[tokio::test]
    async fn newest_entry_comes_first() {
        let db = memory_db().await;
        let row = record(1, FakturaStatus::Ny);
        for (action, at) in [
            (AuditAction::Opret, "2024-01-01T08:00:00+00:00"),
            (AuditAction::Opdater, "2024-01-02T08:00:00+00:00"),
        ] {
            let entry = CreateAuditLogEntry::snapshot(&row, action, "sag@kommune.dk", at.into());
            db.query("CREATE type::table($table) CONTENT $entry RETURN NONE;")
                .bind(("table", LOG_TABLE))
                .bind(("entry", entry))
                .await
                .unwrap();
        }
        let other = CreateAuditLogEntry::snapshot(
            &record(2, FakturaStatus::Ny),
            AuditAction::Opret,
            "sag@kommune.dk",
            "2024-01-03T08:00:00+00:00".into(),
        );
        db.query("CREATE type::table($table) CONTENT $entry RETURN NONE;")
            .bind(("table", LOG_TABLE))
            .bind(("entry", other))
            .await
            .unwrap();

        let entries = list_for(&db, 1).await.unwrap();
        assert_eq!(
            entries.iter().map(|e| e.handling).collect::<Vec<_>>(),
            vec![AuditAction::Opdater, AuditAction::Opret]
        );
        assert!(!entries[0].id.is_empty());
    }
}
