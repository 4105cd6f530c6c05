use sea_orm::{
    entity::prelude::*, sea_query::OnConflict, ActiveModelTrait, DatabaseConnection, DatabaseTransaction, EntityTrait,
    QuerySelect, Set, TransactionTrait,
};
use serde::{Deserialize, Serialize};

use crate::errors::ModelError;

/// Longest code accepted (BIC11).
pub const MAX_CODE_LEN: usize = 11;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "swift_codes")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub swift_code: String,
    pub bank_name: String,
    pub address: String,
    pub country_iso2: String,
    pub country_name: String,
    pub is_headquarter: bool,
    pub headquarter_swift_code: Option<String>,
}

#[derive(Copy, Clone, Debug, EnumIter)]
pub enum Relation {}

impl RelationTrait for Relation {
    fn def(&self) -> RelationDef {
        match *self {}
    }
}

impl ActiveModelBehavior for ActiveModel {}

pub fn validate_swift_code(code: &str) -> Result<(), ModelError> {
    if code.is_empty() {
        return Err(ModelError::Validation("swiftCode required".into()));
    }
    if code.len() > MAX_CODE_LEN {
        return Err(ModelError::Validation(format!("swiftCode must be at most {MAX_CODE_LEN} characters")));
    }
    if !code.chars().all(|c| c.is_ascii_alphanumeric()) {
        return Err(ModelError::Validation("swiftCode must be alphanumeric".into()));
    }
    Ok(())
}

/// Upper-case and check a two-letter country code.
pub fn normalize_country_iso2(iso2: &str) -> Result<String, ModelError> {
    let up = iso2.trim().to_ascii_uppercase();
    if up.len() != 2 || !up.chars().all(|c| c.is_ascii_alphabetic()) {
        return Err(ModelError::Validation("countryISO2 must be two letters".into()));
    }
    Ok(up)
}

pub fn normalize_country_name(name: &str) -> String {
    name.to_uppercase()
}

fn active_from(record: &Model) -> ActiveModel {
    ActiveModel {
        swift_code: Set(record.swift_code.clone()),
        bank_name: Set(record.bank_name.clone()),
        address: Set(record.address.clone()),
        country_iso2: Set(record.country_iso2.clone()),
        country_name: Set(record.country_name.clone()),
        is_headquarter: Set(record.is_headquarter),
        headquarter_swift_code: Set(record.headquarter_swift_code.clone()),
    }
}

/// Insert `record`, or overwrite every column of the row with the same code.
///
/// Runs in one transaction holding a row lock on the existing row, and
/// returns the row as it was before the write (`None` for an insert). A new
/// code is inserted with `ON CONFLICT DO NOTHING`; losing that race to a
/// concurrent insert turns the call into an overwrite of the winner's row.
pub async fn upsert(db: &DatabaseConnection, record: &Model) -> Result<Option<Model>, ModelError> {
    let txn = db.begin().await.map_err(|e| ModelError::Db(e.to_string()))?;

    let mut previous = find_locked(&txn, &record.swift_code).await?;
    let mut written = false;
    if previous.is_none() {
        let inserted = Entity::insert(active_from(record))
            .on_conflict(OnConflict::column(Column::SwiftCode).do_nothing().to_owned())
            .exec_without_returning(&txn)
            .await
            .map_err(|e| ModelError::Db(e.to_string()))?;
        written = inserted > 0;
        if !written {
            previous = find_locked(&txn, &record.swift_code).await?;
        }
    }

    if !written {
        let am = active_from(record);
        match previous {
            Some(_) => am.update(&txn).await.map(drop),
            // conflicting row was deleted again before we could lock it
            None => am.insert(&txn).await.map(drop),
        }
        .map_err(|e| ModelError::Db(e.to_string()))?;
    }

    txn.commit().await.map_err(|e| ModelError::Db(e.to_string()))?;
    Ok(previous)
}

async fn find_locked(txn: &DatabaseTransaction, code: &str) -> Result<Option<Model>, ModelError> {
    Entity::find_by_id(code.to_string())
        .lock_exclusive()
        .one(txn)
        .await
        .map_err(|e| ModelError::Db(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_bic8_and_bic11() {
        assert!(validate_swift_code("ABCDEFGH").is_ok());
        assert!(validate_swift_code("ABCDEFGHXXX").is_ok());
    }

    #[test]
    fn rejects_empty_long_and_symbols() {
        assert!(validate_swift_code("").is_err());
        assert!(validate_swift_code("ABCDEFGHXXXX").is_err());
        assert!(validate_swift_code("ABC-DEF").is_err());
    }

    #[test]
    fn country_iso2_is_upper_cased() {
        assert_eq!(normalize_country_iso2("pl").unwrap(), "PL");
        assert_eq!(normalize_country_iso2(" de ").unwrap(), "DE");
        assert!(normalize_country_iso2("POL").is_err());
        assert!(normalize_country_iso2("1A").is_err());
    }

    #[test]
    fn country_name_is_upper_cased() {
        assert_eq!(normalize_country_name("Poland"), "POLAND");
    }
}
