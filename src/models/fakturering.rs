use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::{
    consts::list_const::VEJMAN_CASE_URL,
    models::status::FakturaStatus,
    utils::format::{format_date, format_decimal},
};

/// Projection used by every read of `vejman_fakturering`.
pub const RECORD_FIELDS: &str = "record::id(id) AS id, vejman_id, ansoger, forste_sted, \
    tilladelsesnr, cvr_nr, tilladelses_type, enhedspris, meter, startdato, slutdato, \
    antal_dage, total_pris, faktura_status, fakturanr, fakturadato, ordrenr";

/// A permit-invoicing row as stored.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct FaktureringRecord {
    pub id: i64,
    pub vejman_id: Option<i64>,
    pub ansoger: Option<String>,
    pub forste_sted: Option<String>,
    pub tilladelsesnr: Option<String>,
    pub cvr_nr: Option<String>,
    pub tilladelses_type: Option<String>,
    pub enhedspris: Option<f64>,
    pub meter: Option<f64>,
    pub startdato: Option<NaiveDate>,
    pub slutdato: Option<NaiveDate>,
    pub antal_dage: Option<i64>,
    pub total_pris: Option<f64>,
    pub faktura_status: FakturaStatus,
    pub fakturanr: Option<String>,
    pub fakturadato: Option<NaiveDate>,
    pub ordrenr: Option<String>,
}

/// Content written when a row is created; the id is the record key.
#[derive(Serialize, Debug, Clone)]
pub struct CreateFakturering {
    pub vejman_id: Option<i64>,
    pub ansoger: Option<String>,
    pub forste_sted: Option<String>,
    pub tilladelsesnr: Option<String>,
    pub cvr_nr: Option<String>,
    pub tilladelses_type: Option<String>,
    pub enhedspris: Option<f64>,
    pub meter: Option<f64>,
    pub startdato: Option<NaiveDate>,
    pub slutdato: Option<NaiveDate>,
    pub antal_dage: Option<i64>,
    pub total_pris: Option<f64>,
    pub faktura_status: FakturaStatus,
    pub fakturanr: Option<String>,
    pub fakturadato: Option<NaiveDate>,
    pub ordrenr: Option<String>,
}

impl CreateFakturering {
    pub fn into_record(self, id: i64) -> FaktureringRecord {
        FaktureringRecord {
            id,
            vejman_id: self.vejman_id,
            ansoger: self.ansoger,
            forste_sted: self.forste_sted,
            tilladelsesnr: self.tilladelsesnr,
            cvr_nr: self.cvr_nr,
            tilladelses_type: self.tilladelses_type,
            enhedspris: self.enhedspris,
            meter: self.meter,
            startdato: self.startdato,
            slutdato: self.slutdato,
            antal_dage: self.antal_dage,
            total_pris: self.total_pris,
            faktura_status: self.faktura_status,
            fakturanr: self.fakturanr,
            fakturadato: self.fakturadato,
            ordrenr: self.ordrenr,
        }
    }
}

/// The editable part of a row, already validated and normalized.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldChanges {
    pub meter: f64,
    pub startdato: NaiveDate,
    pub slutdato: NaiveDate,
}

/// Inclusive number of days between start and end.
pub fn antal_dage(start: Option<NaiveDate>, end: Option<NaiveDate>) -> Option<i64> {
    match (start, end) {
        (Some(start), Some(end)) => Some((end - start).num_days() + 1),
        _ => None,
    }
}

pub fn total_pris(enhedspris: Option<f64>, meter: Option<f64>, dage: Option<i64>) -> Option<f64> {
    let total = enhedspris? * meter? * dage? as f64;
    Some((total * 100.0).round() / 100.0)
}

/// A row as the front end shows it: Danish dates and decimals.
#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct FaktureringView {
    pub id: i64,
    pub vejman_id: Option<i64>,
    pub vejman_link: Option<String>,
    pub ansoger: String,
    pub forste_sted: String,
    pub tilladelsesnr: String,
    pub cvr_nr: String,
    pub tilladelses_type: String,
    pub enhedspris: String,
    pub meter: String,
    pub startdato: String,
    pub slutdato: String,
    pub antal_dage: Option<i64>,
    pub total_pris: String,
    pub faktura_status: FakturaStatus,
    pub fakturanr: String,
    pub fakturadato: String,
    pub ordrenr: String,
}

impl From<FaktureringRecord> for FaktureringView {
    fn from(record: FaktureringRecord) -> Self {
        Self {
            id: record.id,
            vejman_id: record.vejman_id,
            vejman_link: record.vejman_id.map(|id| format!("{VEJMAN_CASE_URL}{id}")),
            ansoger: record.ansoger.unwrap_or_default(),
            forste_sted: record.forste_sted.unwrap_or_default(),
            tilladelsesnr: record.tilladelsesnr.unwrap_or_default(),
            cvr_nr: record.cvr_nr.unwrap_or_default(),
            tilladelses_type: record.tilladelses_type.unwrap_or_default(),
            enhedspris: format_decimal(record.enhedspris),
            meter: format_decimal(record.meter),
            startdato: format_date(record.startdato),
            slutdato: format_date(record.slutdato),
            antal_dage: record.antal_dage,
            total_pris: format_decimal(record.total_pris),
            faktura_status: record.faktura_status,
            fakturanr: record.fakturanr.unwrap_or_default(),
            fakturadato: format_date(record.fakturadato),
            ordrenr: record.ordrenr.unwrap_or_default(),
        }
    }
}

/// Edit form body. Only length and the date range can be changed.
#[derive(serde::Deserialize, Debug, Clone, validator::Validate)]
pub struct UpdateFaktureringRequest {
    #[validate(length(max = 32))]
    pub meter: String,
    #[validate(length(max = 10))]
    pub startdato: String,
    #[validate(length(max = 10))]
    pub slutdato: String,
}

/// Manual creation from a Vejman permit link.
#[derive(serde::Deserialize, Debug, Clone, validator::Validate)]
pub struct CreateFaktureringRequest {
    #[validate(length(max = 500))]
    pub vejman_link: String,
    #[validate(length(max = 255))]
    pub ansoger: String,
    #[validate(length(max = 255))]
    pub forste_sted: String,
    pub tilladelsesnr: String,
    pub cvr_nr: String,
    #[validate(length(max = 100))]
    pub tilladelses_type: String,
    pub enhedspris: String,
    pub meter: String,
    pub startdato: String,
    pub slutdato: String,
}

#[derive(Serialize, Debug)]
pub struct ListResponse {
    pub total: u64,
    pub rows: Vec<FaktureringView>,
}

#[derive(Serialize, Debug)]
pub struct RowResponse {
    pub success: bool,
    pub message: String,
    pub row: FaktureringView,
}
