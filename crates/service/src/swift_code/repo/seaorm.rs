use sea_orm::{ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder};
use tracing::debug;

use models::swift_code::{self, Column, Entity as SwiftCodeEntity};

use crate::errors::ServiceError;
use crate::swift_code::domain::{SwiftCode, UpsertOutcome};
use crate::swift_code::repository::SwiftCodeRepository;

/// Postgres-backed store over the `swift_codes` table.
pub struct SeaOrmSwiftCodeRepository {
    pub db: DatabaseConnection,
}

impl SeaOrmSwiftCodeRepository {
    pub fn new(db: DatabaseConnection) -> Self { Self { db } }
}

#[async_trait::async_trait]
impl SwiftCodeRepository for SeaOrmSwiftCodeRepository {
    async fn find_by_code(&self, code: &str) -> Result<Option<SwiftCode>, ServiceError> {
        let found = SwiftCodeEntity::find_by_id(code.to_string())
            .one(&self.db)
            .await
            .map_err(|e| ServiceError::Db(format!("failed to get swift code: {e}")))?;
        Ok(found.map(SwiftCode::from))
    }

    async fn find_by_country(&self, country_iso2: &str) -> Result<Vec<SwiftCode>, ServiceError> {
        let rows = SwiftCodeEntity::find()
            .filter(Column::CountryIso2.eq(country_iso2))
            .order_by_asc(Column::SwiftCode)
            .all(&self.db)
            .await
            .map_err(|e| ServiceError::Db(format!("failed to query swift codes by country: {e}")))?;
        Ok(rows.into_iter().map(SwiftCode::from).collect())
    }

    async fn find_branches(&self, headquarter_code: &str) -> Result<Vec<SwiftCode>, ServiceError> {
        let rows = SwiftCodeEntity::find()
            .filter(Column::HeadquarterSwiftCode.eq(headquarter_code))
            .order_by_asc(Column::SwiftCode)
            .all(&self.db)
            .await
            .map_err(|e| ServiceError::Db(format!("failed to query branches: {e}")))?;
        Ok(rows.into_iter().map(SwiftCode::from).collect())
    }

    async fn upsert(&self, record: SwiftCode) -> Result<UpsertOutcome, ServiceError> {
        let model = swift_code::Model::from(record.clone());
        let previous = swift_code::upsert(&self.db, &model)
            .await
            .map_err(|e| ServiceError::Db(format!("failed to upsert swift code: {e}")))?;
        debug!(swift_code = %record.swift_code, existed = previous.is_some(), "swift_code_upserted");
        Ok(match previous {
            None => UpsertOutcome::Inserted,
            Some(previous) => UpsertOutcome::Updated { changes: record.changes_from(&SwiftCode::from(previous)) },
        })
    }

    async fn delete_by_code(&self, code: &str) -> Result<bool, ServiceError> {
        let res = SwiftCodeEntity::delete_by_id(code.to_string())
            .exec(&self.db)
            .await
            .map_err(|e| ServiceError::Db(format!("failed to delete swift code: {e}")))?;
        Ok(res.rows_affected > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::get_db;

    fn record(code: &str, hq: Option<&str>) -> SwiftCode {
        SwiftCode {
            swift_code: code.into(),
            bank_name: "Repo Test Bank".into(),
            address: "MAIN ST 1, TESTVILLE".into(),
            country_iso2: "ZY".into(),
            country_name: "REPOLAND".into(),
            is_headquarter: hq.is_none(),
            headquarter_swift_code: hq.map(str::to_string),
        }
    }

    #[tokio::test]
    async fn seaorm_repository_crud() -> Result<(), anyhow::Error> {
        let Some(db) = get_db().await? else { return Ok(()) };
        let repo = SeaOrmSwiftCodeRepository::new(db);
        let hq = "REPOZYAAXXX";
        let branch = "REPOZYAAB01";
        repo.delete_by_code(branch).await?;
        repo.delete_by_code(hq).await?;

        assert_eq!(repo.upsert(record(hq, None)).await?, UpsertOutcome::Inserted);
        assert_eq!(repo.upsert(record(branch, Some(hq))).await?, UpsertOutcome::Inserted);

        let mut renamed = record(hq, None);
        renamed.bank_name = "Renamed".into();
        match repo.upsert(renamed).await? {
            UpsertOutcome::Updated { changes } => assert_eq!(changes.len(), 1),
            other => panic!("expected update, got {other:?}"),
        }

        let found = repo.find_by_code(hq).await?.unwrap();
        assert_eq!(found.bank_name, "Renamed");
        let branches = repo.find_branches(hq).await?;
        assert_eq!(branches.len(), 1);
        assert_eq!(branches[0].swift_code, branch);
        let country = repo.find_by_country("ZY").await?;
        assert!(country.iter().any(|c| c.swift_code == hq));

        assert!(repo.delete_by_code(branch).await?);
        assert!(repo.delete_by_code(hq).await?);
        assert!(!repo.delete_by_code(hq).await?);
        assert!(repo.find_by_code(hq).await?.is_none());
        Ok(())
    }
}
