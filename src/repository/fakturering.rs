use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::{
    consts::db_const::{FAKTURERING_TABLE, LOG_TABLE},
    errors::{Error, Result},
    models::{
        fakturering::{
            CreateFakturering, FaktureringRecord, FieldChanges, RECORD_FIELDS, antal_dage,
            total_pris,
        },
        log::CreateAuditLogEntry,
        stats::{Statistics, StatusStat, Totals, TypeStat},
        status::{FakturaStatus, Intent, next_status},
    },
    repository::{CountRow, check_guarded, guarded_update, list_query::ListFilter},
    state::Db,
    utils::{get_record_id::fakturering_record_id, time::time_now},
};

#[derive(Serialize)]
struct EditedFields {
    meter: f64,
    startdato: NaiveDate,
    slutdato: NaiveDate,
    antal_dage: Option<i64>,
    total_pris: Option<f64>,
}

#[derive(Serialize)]
struct StatusChange {
    faktura_status: FakturaStatus,
}

#[derive(Deserialize)]
struct StatRow {
    faktura_status: FakturaStatus,
    tilladelses_type: Option<String>,
    total_pris: Option<f64>,
}

/// One page of a view plus the number of rows matching the whole filter.
pub async fn list(db: &Db, filter: &ListFilter) -> Result<(u64, Vec<FaktureringRecord>)> {
    if filter.is_empty() {
        return Ok((0, Vec::new()));
    }
    let (sql, binds) = filter.sql();
    let mut query = db.query(sql).bind(("table", FAKTURERING_TABLE));
    for bind in binds {
        query = query.bind(bind);
    }
    let mut response = query.await?;
    let rows: Vec<FaktureringRecord> = response.take(0)?;
    let count: Option<CountRow> = response.take(1)?;

    Ok((count.map(|c| c.total).unwrap_or(0), rows))
}

pub async fn find_by_id(db: &Db, id: i64) -> Result<FaktureringRecord> {
    let rows: Vec<FaktureringRecord> = db
        .query(format!("SELECT {RECORD_FIELDS} FROM $rid;"))
        .bind(("rid", fakturering_record_id(id)))
        .await?
        .take(0)?;
    rows.into_iter().next().ok_or(Error::RowNotFound)
}

/// Writes the editable fields and their derived values. Only rows in `Ny`
/// can be edited.
pub async fn update_fields(
    db: &Db,
    id: i64,
    changes: FieldChanges,
    bruger: &str,
) -> Result<FaktureringRecord> {
    let record = find_by_id(db, id).await?;
    if record.faktura_status != FakturaStatus::Ny {
        warn!("Edit of row {} refused, status {}", id, record.faktura_status);
        return Err(Error::NotEditable(record.faktura_status));
    }

    let dage = antal_dage(Some(changes.startdato), Some(changes.slutdato));
    let total = total_pris(record.enhedspris, Some(changes.meter), dage);
    let entry = CreateAuditLogEntry::field_change(&record, &changes, bruger, time_now());
    let edited = EditedFields {
        meter: changes.meter,
        startdato: changes.startdato,
        slutdato: changes.slutdato,
        antal_dage: dage,
        total_pris: total,
    };
    guarded_update(
        db,
        fakturering_record_id(id),
        "faktura_status",
        FakturaStatus::Ny.to_string(),
        edited,
        entry,
    )
    .await?;
    info!("Row {} edited by {}", id, bruger);

    Ok(FaktureringRecord {
        meter: Some(changes.meter),
        startdato: Some(changes.startdato),
        slutdato: Some(changes.slutdato),
        antal_dage: dage,
        total_pris: total,
        ..record
    })
}

/// Applies `intent` to the row, conditional on the status it was read with.
pub async fn transition(
    db: &Db,
    id: i64,
    intent: Intent,
    bruger: &str,
) -> Result<FaktureringRecord> {
    let record = find_by_id(db, id).await?;
    let Some(to) = next_status(record.faktura_status, intent) else {
        warn!(
            "Transition {:?} refused for row {} in status {}",
            intent, id, record.faktura_status
        );
        return Err(Error::InvalidTransition {
            from: record.faktura_status,
            intent,
        });
    };

    let entry =
        CreateAuditLogEntry::status_change(&record, to, intent.into(), bruger, time_now());
    guarded_update(
        db,
        fakturering_record_id(id),
        "faktura_status",
        record.faktura_status.to_string(),
        StatusChange { faktura_status: to },
        entry,
    )
    .await?;
    info!(
        "Row {} moved {} -> {} by {}",
        id, record.faktura_status, to, bruger
    );

    Ok(FaktureringRecord {
        faktura_status: to,
        ..record
    })
}

async fn next_id(db: &Db) -> Result<i64> {
    let ids: Vec<i64> = db
        .query("SELECT VALUE record::id(id) FROM type::table($table);")
        .bind(("table", FAKTURERING_TABLE))
        .await?
        .take(0)?;
    Ok(ids.into_iter().max().unwrap_or(0) + 1)
}

/// Creates a row under the next free integer key with an `Opret` audit row.
pub async fn create(db: &Db, content: CreateFakturering, bruger: &str) -> Result<FaktureringRecord> {
    let id = next_id(db).await?;
    let record = content.clone().into_record(id);
    let entry = CreateAuditLogEntry::created(&record, bruger, time_now());

    let response = db
        .query(
            "BEGIN TRANSACTION;\n\
             CREATE $rid CONTENT $content RETURN NONE;\n\
             CREATE type::table($log_table) CONTENT $entry RETURN NONE;\n\
             COMMIT TRANSACTION;",
        )
        .bind(("rid", fakturering_record_id(id)))
        .bind(("content", content))
        .bind(("log_table", LOG_TABLE))
        .bind(("entry", entry))
        .await?;
    check_guarded(response)?;
    info!("Row {} created by {}", id, bruger);

    Ok(record)
}

pub async fn count_all(db: &Db) -> Result<u64> {
    let count: Option<CountRow> = db
        .query("SELECT count() AS total FROM type::table($table) GROUP ALL;")
        .bind(("table", FAKTURERING_TABLE))
        .await?
        .take(0)?;
    Ok(count.map(|c| c.total).unwrap_or(0))
}

/// Up to `limit` rows with an id greater than `after`, in id order.
pub async fn batch_after(db: &Db, after: i64, limit: u32) -> Result<Vec<FaktureringRecord>> {
    let rows: Vec<FaktureringRecord> = db
        .query(format!(
            "SELECT {RECORD_FIELDS} FROM type::table($table) \
             WHERE record::id(id) > $after ORDER BY id ASC LIMIT $limit;"
        ))
        .bind(("table", FAKTURERING_TABLE))
        .bind(("after", after))
        .bind(("limit", limit))
        .await?
        .take(0)?;
    Ok(rows)
}

pub async fn statistics(db: &Db) -> Result<Statistics> {
    let rows: Vec<StatRow> = db
        .query("SELECT faktura_status, tilladelses_type, total_pris FROM type::table($table);")
        .bind(("table", FAKTURERING_TABLE))
        .await?
        .take(0)?;
    Ok(summarize(rows))
}

fn summarize(rows: Vec<StatRow>) -> Statistics {
    let mut per_status: BTreeMap<&'static str, StatusStat> = BTreeMap::new();
    let mut per_type: BTreeMap<Option<String>, TypeStat> = BTreeMap::new();
    let mut i_alt = Totals::default();

    for row in rows {
        let amount = row.total_pris.unwrap_or(0.0);

        let status = per_status
            .entry(row.faktura_status.as_str())
            .or_insert_with(|| StatusStat {
                faktura_status: row.faktura_status,
                antal: 0,
                total: 0.0,
            });
        status.antal += 1;
        status.total += amount;

        let kind = per_type
            .entry(row.tilladelses_type.clone())
            .or_insert_with(|| TypeStat {
                tilladelses_type: row.tilladelses_type,
                antal: 0,
                total: 0.0,
            });
        kind.antal += 1;
        kind.total += amount;

        i_alt.antal += 1;
        i_alt.total += amount;
    }

    let round = |v: f64| (v * 100.0).round() / 100.0;
    Statistics {
        per_status: per_status
            .into_values()
            .map(|s| StatusStat {
                total: round(s.total),
                ..s
            })
            .collect(),
        per_type: per_type
            .into_values()
            .map(|t| TypeStat {
                total: round(t.total),
                ..t
            })
            .collect(),
        i_alt: Totals {
            total: round(i_alt.total),
            ..i_alt
        },
    }
}
