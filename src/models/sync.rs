use serde::{Deserialize, Serialize};

pub const CONSTANT_FIELDS: &str =
    "type::string(navn) AS navn, type::string(vaerdi ?? '') AS vaerdi, type::string(opdateret ?? '') AS opdateret";

/// A row of the orchestrator's constants table.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct SyncConstant {
    pub navn: String,
    pub vaerdi: String,
    pub opdateret: String,
}

#[derive(Serialize, Debug, Clone)]
pub struct SyncStatusResponse {
    pub konstanter: Vec<SyncConstant>,
    pub sidst_startet: Option<String>,
    pub ventetid_sekunder: u64,
}

#[derive(Serialize, Debug, Clone)]
pub struct TriggerRequest<'a> {
    pub requested_by: &'a str,
}
