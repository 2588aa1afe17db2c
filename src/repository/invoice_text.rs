use tracing::info;

use crate::{
    consts::db_const::INVOICE_TEXT_TABLE,
    errors::{Error, Result},
    models::invoice_text::{INVOICE_TEXT_FIELDS, InvoiceText, InvoiceTextContent},
    state::Db,
    utils::get_record_id::invoice_text_record_id,
};

pub async fn list(db: &Db) -> Result<Vec<InvoiceText>> {
    let texts: Vec<InvoiceText> = db
        .query(format!(
            "SELECT {INVOICE_TEXT_FIELDS} FROM type::table($table) ORDER BY fakturalinje ASC;"
        ))
        .bind(("table", INVOICE_TEXT_TABLE))
        .await?
        .take(0)?;
    Ok(texts)
}

pub async fn find(db: &Db, fakturalinje: &str) -> Result<Option<InvoiceText>> {
    let texts: Vec<InvoiceText> = db
        .query(format!("SELECT {INVOICE_TEXT_FIELDS} FROM $rid;"))
        .bind(("rid", invoice_text_record_id(fakturalinje)))
        .await?
        .take(0)?;
    Ok(texts.into_iter().next())
}

pub async fn create(db: &Db, fakturalinje: String, content: InvoiceTextContent) -> Result<InvoiceText> {
    if find(db, &fakturalinje).await?.is_some() {
        return Err(Error::InvoiceTextExists(fakturalinje));
    }
    db.query("CREATE $rid CONTENT $content RETURN NONE;")
        .bind(("rid", invoice_text_record_id(&fakturalinje)))
        .bind(("content", content.clone()))
        .await?
        .check()?;
    info!("Invoice text {} created", fakturalinje);
    Ok(content.with_key(fakturalinje))
}

pub async fn update(db: &Db, fakturalinje: String, content: InvoiceTextContent) -> Result<InvoiceText> {
    if find(db, &fakturalinje).await?.is_none() {
        return Err(Error::InvoiceTextNotFound(fakturalinje));
    }
    db.query("UPDATE $rid CONTENT $content RETURN NONE;")
        .bind(("rid", invoice_text_record_id(&fakturalinje)))
        .bind(("content", content.clone()))
        .await?
        .check()?;
    info!("Invoice text {} updated", fakturalinje);
    Ok(content.with_key(fakturalinje))
}

pub async fn delete(db: &Db, fakturalinje: String) -> Result<()> {
    if find(db, &fakturalinje).await?.is_none() {
        return Err(Error::InvoiceTextNotFound(fakturalinje));
    }
    db.query("DELETE $rid;")
        .bind(("rid", invoice_text_record_id(&fakturalinje)))
        .await?
        .check()?;
    info!("Invoice text {} deleted", fakturalinje);
    Ok(())
}
