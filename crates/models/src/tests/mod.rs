//! Database-backed tests; skipped when `SKIP_DB_TESTS` is set or Postgres is unreachable.
use crate::db::connect;
use crate::swift_code::{self, Column, Entity, Model};
use anyhow::Result;
use migration::MigratorTrait;
use sea_orm::{ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter};

async fn setup_test_db() -> Option<DatabaseConnection> {
    if std::env::var("SKIP_DB_TESTS").is_ok() {
        return None;
    }
    let db = match connect().await {
        Ok(db) => db,
        Err(e) => {
            eprintln!("skip: cannot connect to db: {}", e);
            return None;
        }
    };
    if let Err(e) = migration::Migrator::up(&db, None).await {
        eprintln!("skip: migrate up failed: {}", e);
        return None;
    }
    Some(db)
}

fn record(code: &str, bank: &str) -> Model {
    Model {
        swift_code: code.to_string(),
        bank_name: bank.to_string(),
        address: "UL. TESTOWA 1, WARSZAWA".to_string(),
        country_iso2: "ZZ".to_string(),
        country_name: "TESTLAND".to_string(),
        is_headquarter: code.ends_with("XXX"),
        headquarter_swift_code: None,
    }
}

#[tokio::test]
async fn upsert_inserts_then_overwrites() -> Result<()> {
    let Some(db) = setup_test_db().await else { return Ok(()) };
    let code = "MDLTSTPLXXX";
    Entity::delete_by_id(code.to_string()).exec(&db).await?;

    let previous = swift_code::upsert(&db, &record(code, "First Bank")).await?;
    assert!(previous.is_none());

    let previous = swift_code::upsert(&db, &record(code, "Renamed Bank")).await?;
    assert_eq!(previous.map(|p| p.bank_name), Some("First Bank".to_string()));

    let stored = Entity::find_by_id(code.to_string()).one(&db).await?.unwrap();
    assert_eq!(stored.bank_name, "Renamed Bank");

    Entity::delete_by_id(code.to_string()).exec(&db).await?;
    Ok(())
}

#[tokio::test]
async fn branches_are_found_by_headquarter_code() -> Result<()> {
    let Some(db) = setup_test_db().await else { return Ok(()) };
    let hq = "MDLBRPLXXX";
    let branch = "MDLBRPLAB1";
    let mut br = record(branch, "Branch Bank");
    br.headquarter_swift_code = Some(hq.to_string());

    swift_code::upsert(&db, &record(hq, "Head Bank")).await?;
    swift_code::upsert(&db, &br).await?;

    let found = Entity::find()
        .filter(Column::HeadquarterSwiftCode.eq(hq))
        .all(&db)
        .await?;
    assert!(found.iter().any(|m| m.swift_code == branch));

    Entity::delete_by_id(branch.to_string()).exec(&db).await?;
    Entity::delete_by_id(hq.to_string()).exec(&db).await?;
    Ok(())
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_upserts_of_a_new_code_all_succeed() -> Result<()> {
    let Some(db) = setup_test_db().await else { return Ok(()) };
    let code = "MDLRACEPXXX";
    Entity::delete_by_id(code.to_string()).exec(&db).await?;

    let mut handles = Vec::new();
    for i in 0..8 {
        let db = db.clone();
        handles.push(tokio::spawn(async move {
            swift_code::upsert(&db, &record(code, &format!("Bank {i}"))).await
        }));
    }

    let mut inserts = 0;
    for handle in handles {
        let previous = handle.await??;
        if previous.is_none() {
            inserts += 1;
        }
    }
    assert_eq!(inserts, 1);
    assert!(Entity::find_by_id(code.to_string()).one(&db).await?.is_some());

    Entity::delete_by_id(code.to_string()).exec(&db).await?;
    Ok(())
}
