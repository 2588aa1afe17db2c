use surrealdb::RecordId;

use crate::consts::db_const::{FAKTURERING_TABLE, INVOICE_TEXT_TABLE, ISSUE_TABLE};

pub fn fakturering_record_id(id: i64) -> RecordId {
    RecordId::from_table_key(FAKTURERING_TABLE, id)
}

pub fn issue_record_id(id: i64) -> RecordId {
    RecordId::from_table_key(ISSUE_TABLE, id)
}

pub fn invoice_text_record_id(fakturalinje: &str) -> RecordId {
    RecordId::from_table_key(INVOICE_TEXT_TABLE, fakturalinje.trim().to_string())
}
