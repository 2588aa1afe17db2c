use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::utils::format::format_date;

pub const INVOICE_TEXT_FIELDS: &str = "record::id(id) AS fakturalinje, fordringstype, psp_element, \
    materiale_nr_opus, kund_ref_id, toptekst, forklaring, materiel_id_vejman, fra_startdato, \
    fra_slutdato";

/// Settings for one invoice line, keyed by `fakturalinje`.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct InvoiceText {
    pub fakturalinje: String,
    pub fordringstype: Option<String>,
    pub psp_element: Option<String>,
    pub materiale_nr_opus: Option<i64>,
    pub kund_ref_id: Option<String>,
    pub toptekst: Option<String>,
    pub forklaring: Option<String>,
    pub materiel_id_vejman: Option<i64>,
    pub fra_startdato: Option<NaiveDate>,
    pub fra_slutdato: Option<NaiveDate>,
}

/// Stored content; the line name is the record key.
#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct InvoiceTextContent {
    pub fordringstype: Option<String>,
    pub psp_element: Option<String>,
    pub materiale_nr_opus: Option<i64>,
    pub kund_ref_id: Option<String>,
    pub toptekst: Option<String>,
    pub forklaring: Option<String>,
    pub materiel_id_vejman: Option<i64>,
    pub fra_startdato: Option<NaiveDate>,
    pub fra_slutdato: Option<NaiveDate>,
}

impl InvoiceTextContent {
    pub fn with_key(self, fakturalinje: String) -> InvoiceText {
        InvoiceText {
            fakturalinje,
            fordringstype: self.fordringstype,
            psp_element: self.psp_element,
            materiale_nr_opus: self.materiale_nr_opus,
            kund_ref_id: self.kund_ref_id,
            toptekst: self.toptekst,
            forklaring: self.forklaring,
            materiel_id_vejman: self.materiel_id_vejman,
            fra_startdato: self.fra_startdato,
            fra_slutdato: self.fra_slutdato,
        }
    }
}

#[derive(Deserialize, Debug, Clone, Default, validator::Validate)]
pub struct InvoiceTextRequest {
    #[validate(length(max = 100))]
    pub fakturalinje: Option<String>,
    pub fordringstype: Option<String>,
    pub psp_element: Option<String>,
    pub materiale_nr_opus: Option<String>,
    pub kund_ref_id: Option<String>,
    pub toptekst: Option<String>,
    pub forklaring: Option<String>,
    pub materiel_id_vejman: Option<String>,
    pub fra_startdato: Option<String>,
    pub fra_slutdato: Option<String>,
}

#[derive(Serialize, Debug, Clone)]
pub struct InvoiceTextView {
    #[serde(flatten)]
    pub text: InvoiceText,
    pub fra_startdato_visning: String,
    pub fra_slutdato_visning: String,
}

impl From<InvoiceText> for InvoiceTextView {
    fn from(text: InvoiceText) -> Self {
        Self {
            fra_startdato_visning: format_date(text.fra_startdato),
            fra_slutdato_visning: format_date(text.fra_slutdato),
            text,
        }
    }
}

#[derive(Serialize, Debug)]
pub struct SettingResponse {
    pub success: bool,
    pub message: String,
    pub setting: InvoiceTextView,
}

#[derive(Serialize, Debug)]
pub struct MessageResponse {
    pub success: bool,
    pub message: String,
}
