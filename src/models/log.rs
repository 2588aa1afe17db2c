use std::{fmt, str::FromStr};

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::models::{
    fakturering::{FaktureringRecord, FieldChanges},
    status::{FakturaStatus, Intent},
};

pub const LOG_FIELDS: &str = "record::id(id) AS id, fakturering_id, handling, bruger, tidspunkt, \
    gammel_meter, ny_meter, gammel_startdato, ny_startdato, gammel_slutdato, ny_slutdato, \
    gammel_status, ny_status";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum AuditAction {
    Opret,
    Opdater,
    SendTilFakturering,
    Fortryd,
    FakturerIkke,
    AccepterProblem,
}

impl AuditAction {
    const ALL: [AuditAction; 6] = [
        AuditAction::Opret,
        AuditAction::Opdater,
        AuditAction::SendTilFakturering,
        AuditAction::Fortryd,
        AuditAction::FakturerIkke,
        AuditAction::AccepterProblem,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            AuditAction::Opret => "Opret",
            AuditAction::Opdater => "Opdater",
            AuditAction::SendTilFakturering => "SendTilFakturering",
            AuditAction::Fortryd => "Fortryd",
            AuditAction::FakturerIkke => "FakturerIkke",
            AuditAction::AccepterProblem => "AccepterProblem",
        }
    }
}

impl fmt::Display for AuditAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AuditAction {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        AuditAction::ALL
            .into_iter()
            .find(|action| action.as_str() == s)
            .ok_or_else(|| format!("Ukendt handling: {s}"))
    }
}

impl TryFrom<String> for AuditAction {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<AuditAction> for String {
    fn from(value: AuditAction) -> Self {
        value.as_str().to_string()
    }
}

impl From<Intent> for AuditAction {
    fn from(value: Intent) -> Self {
        match value {
            Intent::SendToBilling => AuditAction::SendTilFakturering,
            Intent::Undo => AuditAction::Fortryd,
            Intent::DoNotInvoice => AuditAction::FakturerIkke,
        }
    }
}

/// One append-only row of `vejman_log`.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct AuditLogEntry {
    pub id: String,
    pub fakturering_id: i64,
    pub handling: AuditAction,
    pub bruger: String,
    pub tidspunkt: String,

    // ? before / after of the tracked fields
    pub gammel_meter: Option<f64>,
    pub ny_meter: Option<f64>,
    pub gammel_startdato: Option<NaiveDate>,
    pub ny_startdato: Option<NaiveDate>,
    pub gammel_slutdato: Option<NaiveDate>,
    pub ny_slutdato: Option<NaiveDate>,
    pub gammel_status: Option<FakturaStatus>,
    pub ny_status: Option<FakturaStatus>,
}

#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct CreateAuditLogEntry {
    pub fakturering_id: i64,
    pub handling: AuditAction,
    pub bruger: String,
    pub tidspunkt: String,
    pub gammel_meter: Option<f64>,
    pub ny_meter: Option<f64>,
    pub gammel_startdato: Option<NaiveDate>,
    pub ny_startdato: Option<NaiveDate>,
    pub gammel_slutdato: Option<NaiveDate>,
    pub ny_slutdato: Option<NaiveDate>,
    pub gammel_status: Option<FakturaStatus>,
    pub ny_status: Option<FakturaStatus>,
}

impl CreateAuditLogEntry {
    /// Entry where the tracked fields are unchanged.
    pub fn snapshot(
        record: &FaktureringRecord,
        handling: AuditAction,
        bruger: &str,
        tidspunkt: String,
    ) -> Self {
        Self {
            fakturering_id: record.id,
            handling,
            bruger: bruger.to_string(),
            tidspunkt,
            gammel_meter: record.meter,
            ny_meter: record.meter,
            gammel_startdato: record.startdato,
            ny_startdato: record.startdato,
            gammel_slutdato: record.slutdato,
            ny_slutdato: record.slutdato,
            gammel_status: Some(record.faktura_status),
            ny_status: Some(record.faktura_status),
        }
    }

    pub fn status_change(
        record: &FaktureringRecord,
        to: FakturaStatus,
        handling: AuditAction,
        bruger: &str,
        tidspunkt: String,
    ) -> Self {
        Self {
            ny_status: Some(to),
            ..Self::snapshot(record, handling, bruger, tidspunkt)
        }
    }

    pub fn field_change(
        record: &FaktureringRecord,
        changes: &FieldChanges,
        bruger: &str,
        tidspunkt: String,
    ) -> Self {
        Self {
            ny_meter: Some(changes.meter),
            ny_startdato: Some(changes.startdato),
            ny_slutdato: Some(changes.slutdato),
            ..Self::snapshot(record, AuditAction::Opdater, bruger, tidspunkt)
        }
    }

    pub fn created(record: &FaktureringRecord, bruger: &str, tidspunkt: String) -> Self {
        Self {
            gammel_meter: None,
            gammel_startdato: None,
            gammel_slutdato: None,
            gammel_status: None,
            ..Self::snapshot(record, AuditAction::Opret, bruger, tidspunkt)
        }
    }
}
