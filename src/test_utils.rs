use std::sync::Arc;

use chrono::NaiveDate;
use surrealdb::engine::any;

use crate::{
    config::{AppConfig, DbConfig, RoleGroups},
    models::{
        fakturering::FaktureringRecord,
        issue::{CreateIssue, IssueStatus},
        status::FakturaStatus,
    },
    services::sync::{DisabledOrchestrator, Orchestrator},
    state::{AppState, Db},
    utils::get_record_id::{fakturering_record_id, issue_record_id},
};

pub const JWT_SECRET: &str = "test-jwt-secret";
pub const CASEWORKERS: &str = "sagsbehandlere";
pub const ADMINS: &str = "administratorer";

pub async fn memory_db() -> Db {
    let db = any::connect("mem://").await.unwrap();
    db.use_ns("test").use_db("test").await.unwrap();
    db
}

pub fn test_config() -> AppConfig {
    AppConfig {
        bind_addr: "127.0.0.1:0".into(),
        db: DbConfig {
            url: "mem://".into(),
            namespace: "test".into(),
            database: "test".into(),
            username: None,
            password: None,
        },
        session_secret: "test-session-secret".into(),
        session_ttl_hours: 8,
        jwt_secret: JWT_SECRET.into(),
        jwt_leeway_secs: 60,
        local_dev_bypass: false,
        roles: RoleGroups {
            caseworker: CASEWORKERS.into(),
            admin: ADMINS.into(),
        },
        orchestrator: None,
    }
}

pub async fn test_state() -> AppState {
    test_state_with(test_config(), Arc::new(DisabledOrchestrator)).await
}

pub async fn test_state_with(config: AppConfig, orchestrator: Arc<dyn Orchestrator>) -> AppState {
    AppState::new(memory_db().await, config, orchestrator)
}

/// A `Ny` style row: 10 kr. per meter per day, 2 meters, five days.
pub fn record(id: i64, faktura_status: FakturaStatus) -> FaktureringRecord {
    FaktureringRecord {
        id,
        vejman_id: Some(100_000 + id),
        ansoger: Some("Graveselskabet A/S".into()),
        forste_sted: Some("Vestergade 1".into()),
        tilladelsesnr: Some(format!("24-{:05}", id)),
        cvr_nr: Some("12345678".into()),
        tilladelses_type: Some("Container".into()),
        enhedspris: Some(10.0),
        meter: Some(2.0),
        startdato: NaiveDate::from_ymd_opt(2024, 1, 1),
        slutdato: NaiveDate::from_ymd_opt(2024, 1, 5),
        antal_dage: Some(5),
        total_pris: Some(100.0),
        faktura_status,
        fakturanr: None,
        fakturadato: None,
        ordrenr: None,
    }
}

pub async fn seed(db: &Db, record: FaktureringRecord) {
    let rid = fakturering_record_id(record.id);
    let mut content = serde_json::to_value(&record).unwrap();
    if let Some(fields) = content.as_object_mut() {
        fields.remove("id");
    }
    db.query("CREATE $rid CONTENT $content RETURN NONE;")
        .bind(("rid", rid))
        .bind(("content", content))
        .await
        .unwrap()
        .check()
        .unwrap();
}

pub async fn seed_issue(db: &Db, id: i64, fakturering_id: i64) {
    let issue = CreateIssue {
        fakturering_id,
        problem_type: Some("ManglerCvr".into()),
        beskrivelse: Some("CVR mangler på tilladelsen".into()),
        forslag: Some("Indhent CVR fra ansøger".into()),
        status: IssueStatus::Open,
        oprettet: Some("2024-01-01T00:00:00+00:00".into()),
    };
    db.query("CREATE $rid CONTENT $content RETURN NONE;")
        .bind(("rid", issue_record_id(id)))
        .bind(("content", issue))
        .await
        .unwrap()
        .check()
        .unwrap();
}
