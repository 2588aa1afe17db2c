use std::time::Duration;

use axum::{Json, http::StatusCode, response::IntoResponse};
use jsonwebtoken::errors::Error as JWError;
use serde_json::json;
use surrealdb::Error as SError;

use thiserror::Error;
use tracing::error;

use crate::models::{
    session::Role,
    status::{FakturaStatus, Intent},
};

pub type Result<T> = core::result::Result<T, Error>;

const INTERNAL_ERROR: &str = "Der opstod en uventet fejl. Prøv igen senere.";

#[derive(Error, Debug)]
pub enum Error {
    #[error("Jason web token Error: {0}")]
    JwTError(#[from] JWError),

    #[error("SurrealDb Error: {0}")]
    SurrealError(#[from] SError),

    #[error("Io Error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Axum Error: {0}")]
    AxumError(#[from] axum::Error),

    #[error("Http client Error: {0}")]
    HttpError(#[from] reqwest::Error),

    #[error("Validator Error: {0}")]
    ValidationError(#[from] validator::ValidationErrors),

    #[error("Json Rejection Error: {0}")]
    AxumJsonRejection(#[from] axum::extract::rejection::JsonRejection),

    #[error("Query Rejection Error: {0}")]
    AxumQueryRejection(#[from] axum::extract::rejection::QueryRejection),

    #[error("Path Rejection Error: {0}")]
    AxumPathRejection(#[from] axum::extract::rejection::PathRejection),

    #[error("Invalid input: {0:?}")]
    Validation(Vec<String>),

    #[error("Configuration Error: {0}")]
    Config(String),

    #[error("Row not found")]
    RowNotFound,
    #[error("Issue not found")]
    IssueNotFound,
    #[error("Invoice text `{0}` not found")]
    InvoiceTextNotFound(String),
    #[error("Invoice text `{0}` already exists")]
    InvoiceTextExists(String),

    #[error("Intent {intent:?} not allowed from status {from}")]
    InvalidTransition { from: FakturaStatus, intent: Intent },
    #[error("Row in status {0} cannot be edited")]
    NotEditable(FakturaStatus),
    #[error("Row changed while the request was processed")]
    StatusConflict,
    #[error("Issue already resolved")]
    IssueAlreadyResolved,

    // ! Auth
    #[error("Missing session")]
    MissingSession,
    #[error("Access denied, requires {0}")]
    AccessDenied(Role),

    // ! Sync
    #[error("Sync cooldown, {0:?} remaining")]
    SyncCooldown(Duration),
    #[error("Orchestrator answered {0}")]
    Orchestrator(reqwest::StatusCode),
    #[error("Orchestrator not configured")]
    SyncUnavailable,
}

/// Renders a remaining wait as "M min. og S sek.", rounding seconds up.
pub fn format_wait(remaining: Duration) -> String {
    let mut secs = remaining.as_secs();
    if remaining.subsec_nanos() > 0 {
        secs += 1;
    }
    format!("{} min. og {} sek.", secs / 60, secs % 60)
}

impl IntoResponse for Error {
    fn into_response(self) -> axum::response::Response {
        let internal = || (StatusCode::INTERNAL_SERVER_ERROR, vec![INTERNAL_ERROR.to_string()]);
        let (status, messages) = match self {
            Error::JwTError(error) => {
                error!("JWT Error:{:#?}", error);
                (
                    StatusCode::UNAUTHORIZED,
                    vec!["Login-token er ugyldigt eller udløbet.".to_string()],
                )
            }
            Error::SurrealError(error) => {
                error!("Surreal  Error:{:#?}", error);
                internal()
            }
            Error::IoError(error) => {
                error!("Io  Error:{:#?}", error);
                internal()
            }
            Error::AxumError(error) => {
                error!("Axum  Error:{:#?}", error);
                internal()
            }
            Error::Config(error) => {
                error!("Config  Error:{}", error);
                internal()
            }
            Error::HttpError(error) => {
                error!("Orchestrator request Error:{:#?}", error);
                (
                    StatusCode::BAD_GATEWAY,
                    vec!["Kunne ikke kontakte synkroniseringstjenesten.".to_string()],
                )
            }
            Error::Orchestrator(status) => {
                error!("Orchestrator answered with status {}", status);
                (
                    StatusCode::BAD_GATEWAY,
                    vec![format!(
                        "Synkroniseringstjenesten afviste anmodningen ({}).",
                        status.as_u16()
                    )],
                )
            }
            Error::SyncUnavailable => (
                StatusCode::SERVICE_UNAVAILABLE,
                vec!["Synkronisering er ikke konfigureret.".to_string()],
            ),
            Error::ValidationError(error) => {
                let message = format!("Ugyldige parametre: [{}]", error).replace('\n', ", ");
                (StatusCode::BAD_REQUEST, vec![message])
            }
            Error::AxumJsonRejection(error) => {
                error!("Axum Json Rejection Error:{:#?}", error);
                (StatusCode::BAD_REQUEST, vec![error.body_text()])
            }
            Error::AxumQueryRejection(error) => (StatusCode::BAD_REQUEST, vec![error.body_text()]),
            Error::AxumPathRejection(error) => (StatusCode::BAD_REQUEST, vec![error.body_text()]),
            Error::Validation(messages) => (StatusCode::BAD_REQUEST, messages),
            Error::RowNotFound => (
                StatusCode::NOT_FOUND,
                vec!["Fakturalinjen blev ikke fundet.".to_string()],
            ),
            Error::IssueNotFound => (
                StatusCode::NOT_FOUND,
                vec!["Problemet blev ikke fundet.".to_string()],
            ),
            Error::InvoiceTextNotFound(linje) => (
                StatusCode::NOT_FOUND,
                vec![format!("Fakturalinje {} blev ikke fundet.", linje)],
            ),
            Error::InvoiceTextExists(linje) => (
                StatusCode::CONFLICT,
                vec![format!("Fakturalinje {} findes allerede.", linje)],
            ),
            Error::InvalidTransition { from, intent } => (
                StatusCode::CONFLICT,
                vec![format!(
                    "Handlingen '{}' kan ikke udføres på en fakturalinje med status {}.",
                    intent.label(),
                    from
                )],
            ),
            Error::NotEditable(status) => (
                StatusCode::CONFLICT,
                vec![format!(
                    "Kun fakturalinjer med status Ny kan redigeres (status er {}).",
                    status
                )],
            ),
            Error::StatusConflict => (
                StatusCode::CONFLICT,
                vec!["Fakturalinjen er blevet ændret i mellemtiden. Genindlæs siden.".to_string()],
            ),
            Error::IssueAlreadyResolved => (
                StatusCode::CONFLICT,
                vec!["Problemet er allerede accepteret.".to_string()],
            ),
            Error::MissingSession => (
                StatusCode::UNAUTHORIZED,
                vec!["Du er ikke logget ind.".to_string()],
            ),
            Error::AccessDenied(role) => (
                StatusCode::FORBIDDEN,
                vec![format!(
                    "Du har ikke adgang til denne handling. Kræver rollen {}.",
                    role
                )],
            ),
            Error::SyncCooldown(remaining) => (
                StatusCode::TOO_MANY_REQUESTS,
                vec![format!(
                    "Synkroniseringen blev startet for nylig. Prøv igen om {}",
                    format_wait(remaining)
                )],
            ),
        };
        (status, Json(json!({ "success": false, "errors": messages }))).into_response()
    }
}
