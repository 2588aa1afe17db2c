use serde::{Deserialize, Serialize};

use crate::models::status::FakturaStatus;

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct StatusStat {
    pub faktura_status: FakturaStatus,
    pub antal: u64,
    pub total: f64,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct TypeStat {
    pub tilladelses_type: Option<String>,
    pub antal: u64,
    pub total: f64,
}

#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
pub struct Totals {
    pub antal: u64,
    pub total: f64,
}

#[derive(Serialize, Debug, Clone)]
pub struct Statistics {
    pub per_status: Vec<StatusStat>,
    pub per_type: Vec<TypeStat>,
    pub i_alt: Totals,
}
