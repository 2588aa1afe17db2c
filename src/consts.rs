pub mod db_const {
    pub const FAKTURERING_TABLE: &str = "vejman_fakturering";
    pub const ISSUE_TABLE: &str = "vejman_problemer";
    pub const LOG_TABLE: &str = "vejman_log";
    pub const INVOICE_TEXT_TABLE: &str = "vejman_faktura_tekster";
    // ! written by the orchestrator, read only here
    pub const CONSTANTS_TABLE: &str = "vejman_konstanter";
}

pub mod auth_const {
    pub const SESSION_COOKIE: &str = "vejman_session";
    pub const SESSION_TOKEN_LEN: usize = 32;
    pub const DEV_EMAIL: &str = "udvikler@localhost";
    pub const DEV_NAME: &str = "Lokal udvikler";
}

pub mod sync_const {
    use std::time::Duration;

    pub const SYNC_COOLDOWN: Duration = Duration::from_secs(5 * 60);
    pub const API_KEY_HEADER: &str = "X-API-Key";
}

pub mod list_const {
    pub const DEFAULT_LIMIT: u32 = 25;
    pub const MAX_LIMIT: u32 = 500;
    pub const EXPORT_BATCH: u32 = 500;
    pub const VEJMAN_CASE_URL: &str = "https://vejman.vd.dk/permissions/update.jsp?caseid=";
}
