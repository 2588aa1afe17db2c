use crate::{
    consts::db_const::CONSTANTS_TABLE,
    errors::Result,
    models::sync::{CONSTANT_FIELDS, SyncConstant},
    state::Db,
};

pub async fn list(db: &Db) -> Result<Vec<SyncConstant>> {
    let constants: Vec<SyncConstant> = db
        .query(format!(
            "SELECT {CONSTANT_FIELDS} FROM type::table($table) ORDER BY navn ASC;"
        ))
        .bind(("table", CONSTANTS_TABLE))
        .await?
        .take(0)?;
    Ok(constants)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::memory_db;

    #[tokio::test]
    async fn reads_orchestrator_constants() {
        let db = memory_db().await;
        db.query(
            "CREATE type::table($table) CONTENT { navn: 'sidste_sync', vaerdi: '2024-05-01T02:00:00', opdateret: '2024-05-01T02:00:05' };
             CREATE type::table($table) CONTENT { navn: 'koerer', vaerdi: false };",
        )
        .bind(("table", CONSTANTS_TABLE))
        .await
        .unwrap();

        let constants = list(&db).await.unwrap();
        assert_eq!(constants.len(), 2);
        assert_eq!(constants[0].navn, "koerer");
        assert_eq!(constants[0].vaerdi, "false");
        assert_eq!(constants[0].opdateret, "");
        assert_eq!(constants[1].vaerdi, "2024-05-01T02:00:00");
    }
}
