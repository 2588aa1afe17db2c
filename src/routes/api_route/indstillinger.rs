use axum::{Json, extract::State, http::StatusCode};

use crate::{
    errors::Result,
    middleware::{CurrentUser, require_role},
    models::{
        invoice_text::{
            InvoiceTextContent, InvoiceTextRequest, InvoiceTextView, MessageResponse,
            SettingResponse,
        },
        session::Role,
    },
    repository::invoice_text,
    state::AppState,
    utils::{
        validated_form::{PathParam, ValidatedJson},
        validator::{FieldErrors, FieldResult, parse_date, parse_optional_int},
    },
};

fn text(value: &Option<String>) -> Option<String> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

fn optional_date(value: &Option<String>, field: &str) -> FieldResult<Option<chrono::NaiveDate>> {
    match text(value) {
        None => Ok(None),
        Some(v) => parse_date(&v, field).map(Some),
    }
}

fn parse_content(input: &InvoiceTextRequest, errors: &mut FieldErrors) -> InvoiceTextContent {
    InvoiceTextContent {
        fordringstype: text(&input.fordringstype),
        psp_element: text(&input.psp_element),
        materiale_nr_opus: errors
            .check(parse_optional_int(
                input.materiale_nr_opus.as_deref(),
                "Materiale nr. (OPUS)",
            ))
            .flatten(),
        kund_ref_id: text(&input.kund_ref_id),
        toptekst: text(&input.toptekst),
        forklaring: text(&input.forklaring),
        materiel_id_vejman: errors
            .check(parse_optional_int(
                input.materiel_id_vejman.as_deref(),
                "Materiel ID (Vejman)",
            ))
            .flatten(),
        fra_startdato: errors
            .check(optional_date(&input.fra_startdato, "Fra startdato"))
            .flatten(),
        fra_slutdato: errors
            .check(optional_date(&input.fra_slutdato, "Fra slutdato"))
            .flatten(),
    }
}

pub async fn list_settings(State(state): State<AppState>) -> Result<Json<Vec<InvoiceTextView>>> {
    let texts = invoice_text::list(&state.sdb).await?;
    Ok(Json(texts.into_iter().map(InvoiceTextView::from).collect()))
}

pub async fn create_setting(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    ValidatedJson(input): ValidatedJson<InvoiceTextRequest>,
) -> Result<(StatusCode, Json<SettingResponse>)> {
    require_role(&user, Role::Administrator)?;
    let mut errors = FieldErrors::new();
    let fakturalinje = text(&input.fakturalinje);
    if fakturalinje.is_none() {
        errors.push("Fakturalinje skal udfyldes.");
    }
    let content = parse_content(&input, &mut errors);
    errors.into_result()?;

    let fakturalinje = fakturalinje.unwrap_or_default();
    let setting = invoice_text::create(&state.sdb, fakturalinje, content).await?;
    Ok((
        StatusCode::CREATED,
        Json(SettingResponse {
            success: true,
            message: format!(
                "Indstillinger for fakturalinje {} er blevet oprettet",
                setting.fakturalinje
            ),
            setting: setting.into(),
        }),
    ))
}

pub async fn update_setting(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    PathParam(fakturalinje): PathParam<String>,
    ValidatedJson(input): ValidatedJson<InvoiceTextRequest>,
) -> Result<Json<SettingResponse>> {
    require_role(&user, Role::Administrator)?;
    let mut errors = FieldErrors::new();
    let content = parse_content(&input, &mut errors);
    errors.into_result()?;

    let setting = invoice_text::update(&state.sdb, fakturalinje, content).await?;
    Ok(Json(SettingResponse {
        success: true,
        message: format!(
            "Indstillinger for fakturalinje {} er blevet opdateret",
            setting.fakturalinje
        ),
        setting: setting.into(),
    }))
}

pub async fn delete_setting(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    PathParam(fakturalinje): PathParam<String>,
) -> Result<Json<MessageResponse>> {
    require_role(&user, Role::Administrator)?;
    let message = format!("Indstillinger for fakturalinje {} er blevet slettet", fakturalinje);
    invoice_text::delete(&state.sdb, fakturalinje).await?;
    Ok(Json(MessageResponse {
        success: true,
        message,
    }))
}
