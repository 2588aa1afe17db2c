use axum::{
    body::Body,
    extract::State,
    http::header::{CONTENT_DISPOSITION, CONTENT_TYPE},
    response::{IntoResponse, Response},
};
use futures::{Stream, stream};
use tracing::{error, info};

use crate::{
    consts::list_const::EXPORT_BATCH,
    errors::{Error, Result},
    models::fakturering::FaktureringView,
    repository::fakturering,
    state::{AppState, Db},
    utils::csv::{BOM, push_line},
};

const HEADER: [&str; 17] = [
    "ID",
    "VejmanID",
    "Ansøger",
    "Første sted",
    "Tilladelsesnr",
    "CVR",
    "Tilladelsestype",
    "Enhedspris",
    "Meter",
    "Startdato",
    "Slutdato",
    "Antal dage",
    "Total pris",
    "Status",
    "Fakturanr",
    "Fakturadato",
    "Ordrenr",
];

struct ExportCursor {
    db: Db,
    header: Option<String>,
    after: i64,
    remaining: u64,
    batch: u32,
}

fn csv_line(out: &mut String, row: FaktureringView) {
    push_line(
        out,
        [
            row.id.to_string(),
            row.vejman_id.map(|id| id.to_string()).unwrap_or_default(),
            row.ansoger,
            row.forste_sted,
            row.tilladelsesnr,
            row.cvr_nr,
            row.tilladelses_type,
            row.enhedspris,
            row.meter,
            row.startdato,
            row.slutdato,
            row.antal_dage.map(|d| d.to_string()).unwrap_or_default(),
            row.total_pris,
            row.faktura_status.to_string(),
            row.fakturanr,
            row.fakturadato,
            row.ordrenr,
        ],
    );
}

/// Header chunk first, then id-ordered batches until `total` rows are out.
fn csv_stream(db: Db, total: u64, batch: u32) -> impl Stream<Item = Result<String>> + Send {
    let mut header = String::from(BOM);
    push_line(&mut header, HEADER);
    let cursor = ExportCursor {
        db,
        header: Some(header),
        after: 0,
        remaining: total,
        batch,
    };

    stream::unfold(cursor, |mut cursor| async move {
        if let Some(header) = cursor.header.take() {
            return Some((Ok(header), cursor));
        }
        if cursor.remaining == 0 {
            return None;
        }
        let limit = cursor.remaining.min(cursor.batch as u64) as u32;
        match fakturering::batch_after(&cursor.db, cursor.after, limit).await {
            Ok(rows) => {
                let last = rows.last()?.id;
                cursor.after = last;
                cursor.remaining -= rows.len() as u64;
                let mut chunk = String::new();
                for row in rows {
                    csv_line(&mut chunk, row.into());
                }
                Some((Ok(chunk), cursor))
            }
            Err(e) => {
                error!("Export stopped after id {}: {}", cursor.after, e);
                cursor.remaining = 0;
                Some((Err::<String, Error>(e), cursor))
            }
        }
    })
}

pub async fn export_csv(State(state): State<AppState>) -> Result<Response> {
    let total = fakturering::count_all(&state.sdb).await?;
    info!("Exporting {} rows", total);
    let body = Body::from_stream(csv_stream(state.sdb.clone(), total, EXPORT_BATCH));

    Ok((
        [
            (CONTENT_TYPE, "text/csv; charset=utf-8"),
            (
                CONTENT_DISPOSITION,
                "attachment; filename=\"vejmankassen.csv\"",
            ),
        ],
        body,
    )
        .into_response())
}
