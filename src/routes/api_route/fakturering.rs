use axum::{Json, extract::State, http::StatusCode};

use crate::{
    errors::{Error, Result},
    middleware::{CurrentUser, require_role},
    models::{
        fakturering::{
            CreateFakturering, CreateFaktureringRequest, FaktureringView, FieldChanges,
            ListResponse, RowResponse, UpdateFaktureringRequest, antal_dage, total_pris,
        },
        log::AuditLogEntry,
        session::Role,
        stats::Statistics,
        status::{FakturaStatus, Intent, ListView},
    },
    repository::{
        fakturering,
        list_query::{ListFilter, ListQuery},
        log,
    },
    state::AppState,
    utils::{
        validated_form::{PathParam, ValidatedJson, ValidatedQuery},
        validator::{
            FieldErrors, parse_date, parse_decimal, validate_cvr, validate_date_range,
            validate_tilladelsesnr, validate_vejman_link,
        },
    },
};

#[derive(Debug, Clone, serde::Deserialize, validator::Validate)]
pub struct IntentRequest {
    pub intent: Intent,
}

pub async fn list_view(
    State(state): State<AppState>,
    PathParam(view): PathParam<ListView>,
    ValidatedQuery(query): ValidatedQuery<ListQuery>,
) -> Result<Json<ListResponse>> {
    let filter = ListFilter::for_view(view, &query)?;
    let (total, rows) = fakturering::list(&state.sdb, &filter).await?;

    Ok(Json(ListResponse {
        total,
        rows: rows.into_iter().map(FaktureringView::from).collect(),
    }))
}

pub async fn read_record(
    State(state): State<AppState>,
    PathParam(id): PathParam<i64>,
) -> Result<Json<FaktureringView>> {
    let record = fakturering::find_by_id(&state.sdb, id).await?;
    Ok(Json(record.into()))
}

fn parse_changes(input: &UpdateFaktureringRequest) -> Result<FieldChanges> {
    let mut errors = FieldErrors::new();
    let meter = errors.check(parse_decimal(&input.meter, "Meter"));
    let startdato = errors.check(parse_date(&input.startdato, "Startdato"));
    let slutdato = errors.check(parse_date(&input.slutdato, "Slutdato"));
    if let (Some(start), Some(end)) = (startdato, slutdato) {
        errors.check(validate_date_range(start, end));
    }
    errors.into_result()?;

    match (meter, startdato, slutdato) {
        (Some(meter), Some(startdato), Some(slutdato)) => Ok(FieldChanges {
            meter,
            startdato,
            slutdato,
        }),
        // ? unreachable, a None always carries a message
        _ => Err(Error::Validation(Vec::new())),
    }
}

pub async fn update_record(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    PathParam(id): PathParam<i64>,
    ValidatedJson(input): ValidatedJson<UpdateFaktureringRequest>,
) -> Result<Json<RowResponse>> {
    require_role(&user, Role::Sagsbehandler)?;
    let changes = parse_changes(&input)?;
    let record = fakturering::update_fields(&state.sdb, id, changes, &user.email).await?;

    Ok(Json(RowResponse {
        success: true,
        message: "Fakturalinjen er opdateret.".to_string(),
        row: record.into(),
    }))
}

pub async fn apply_intent(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    PathParam(id): PathParam<i64>,
    ValidatedJson(input): ValidatedJson<IntentRequest>,
) -> Result<Json<RowResponse>> {
    require_role(&user, Role::Sagsbehandler)?;
    let record = fakturering::transition(&state.sdb, id, input.intent, &user.email).await?;
    let message = match input.intent {
        Intent::SendToBilling => "Fakturalinjen er sendt til fakturering.",
        Intent::Undo => "Afsendelsen er fortrudt.",
        Intent::DoNotInvoice => "Fakturalinjen faktureres ikke.",
    };

    Ok(Json(RowResponse {
        success: true,
        message: message.to_string(),
        row: record.into(),
    }))
}

pub async fn read_log(
    State(state): State<AppState>,
    PathParam(id): PathParam<i64>,
) -> Result<Json<Vec<AuditLogEntry>>> {
    fakturering::find_by_id(&state.sdb, id).await?;
    Ok(Json(log::list_for(&state.sdb, id).await?))
}

fn trimmed(value: &str) -> Option<String> {
    let value = value.trim();
    (!value.is_empty()).then(|| value.to_string())
}

fn parse_create(input: &CreateFaktureringRequest) -> Result<CreateFakturering> {
    let mut errors = FieldErrors::new();
    let vejman_id = errors.check(validate_vejman_link(&input.vejman_link));
    let tilladelsesnr = errors.check(validate_tilladelsesnr(&input.tilladelsesnr));
    let cvr_nr = errors.check(validate_cvr(&input.cvr_nr));
    let enhedspris = errors.check(parse_decimal(&input.enhedspris, "Enhedspris"));
    let meter = errors.check(parse_decimal(&input.meter, "Meter"));
    let startdato = errors.check(parse_date(&input.startdato, "Startdato"));
    let slutdato = errors.check(parse_date(&input.slutdato, "Slutdato"));
    if let (Some(start), Some(end)) = (startdato, slutdato) {
        errors.check(validate_date_range(start, end));
    }
    errors.into_result()?;

    let dage = antal_dage(startdato, slutdato);
    Ok(CreateFakturering {
        vejman_id,
        ansoger: trimmed(&input.ansoger),
        forste_sted: trimmed(&input.forste_sted),
        tilladelsesnr,
        cvr_nr,
        tilladelses_type: trimmed(&input.tilladelses_type),
        enhedspris,
        meter,
        startdato,
        slutdato,
        antal_dage: dage,
        total_pris: total_pris(enhedspris, meter, dage),
        faktura_status: FakturaStatus::Ny,
        fakturanr: None,
        fakturadato: None,
        ordrenr: None,
    })
}

pub async fn create_record(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    ValidatedJson(input): ValidatedJson<CreateFaktureringRequest>,
) -> Result<(StatusCode, Json<RowResponse>)> {
    require_role(&user, Role::Sagsbehandler)?;
    let content = parse_create(&input)?;
    let record = fakturering::create(&state.sdb, content, &user.email).await?;
    let message = format!(
        "Faktura for tilladelse {} er blevet oprettet, og kan nu opdateres og sendes til fakturering.",
        record.tilladelsesnr.as_deref().unwrap_or_default()
    );

    Ok((
        StatusCode::CREATED,
        Json(RowResponse {
            success: true,
            message,
            row: record.into(),
        }),
    ))
}

pub async fn statistics(State(state): State<AppState>) -> Result<Json<Statistics>> {
    Ok(Json(fakturering::statistics(&state.sdb).await?))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_request() -> CreateFaktureringRequest {
        CreateFaktureringRequest {
            vejman_link: "https://vejman.vd.dk/permissions/update.jsp?caseid=555".into(),
            ansoger: " Graveselskabet A/S ".into(),
            forste_sted: "Vestergade 1".into(),
            tilladelsesnr: "24-01234".into(),
            cvr_nr: "12345678".into(),
            tilladelses_type: "".into(),
            enhedspris: "12,5".into(),
            meter: "2".into(),
            startdato: "01-02-2024".into(),
            slutdato: "2024-02-04".into(),
        }
    }

    #[test]
    fn create_input_is_normalized() {
        let content = parse_create(&create_request()).unwrap();
        assert_eq!(content.vejman_id, Some(555));
        assert_eq!(content.ansoger.as_deref(), Some("Graveselskabet A/S"));
        assert_eq!(content.tilladelses_type, None);
        assert_eq!(content.antal_dage, Some(4));
        assert_eq!(content.total_pris, Some(100.0));
        assert_eq!(content.faktura_status, FakturaStatus::Ny);
    }

    #[test]
    fn create_reports_every_bad_field() {
        let input = CreateFaktureringRequest {
            vejman_link: "https://example.com".into(),
            tilladelsesnr: "2401234".into(),
            cvr_nr: "1234".into(),
            enhedspris: "x".into(),
            ..create_request()
        };
        match parse_create(&input) {
            Err(Error::Validation(messages)) => assert_eq!(messages.len(), 4),
            other => panic!("expected validation error, got {other:?}"),
        }
    }

    #[test]
    fn edit_rejects_reversed_period() {
        let input = UpdateFaktureringRequest {
            meter: "3,5".into(),
            startdato: "10-02-2024".into(),
            slutdato: "01-02-2024".into(),
        };
        match parse_changes(&input) {
            Err(Error::Validation(messages)) => {
                assert_eq!(messages, vec!["Slutdato kan ikke ligge før startdato.".to_string()])
            }
            other => panic!("expected validation error, got {other:?}"),
        }
    }
}
