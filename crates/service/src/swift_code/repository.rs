use async_trait::async_trait;

use super::domain::{SwiftCode, UpsertOutcome};
use crate::errors::ServiceError;

/// Persistence for SWIFT code records, keyed by code.
///
/// Absence is `Ok(None)` / an empty vec / `Ok(false)`; `Err` is reserved for
/// storage faults.
#[async_trait]
pub trait SwiftCodeRepository: Send + Sync {
    async fn find_by_code(&self, code: &str) -> Result<Option<SwiftCode>, ServiceError>;
    async fn find_by_country(&self, country_iso2: &str) -> Result<Vec<SwiftCode>, ServiceError>;
    async fn find_branches(&self, headquarter_code: &str) -> Result<Vec<SwiftCode>, ServiceError>;
    /// Insert, or overwrite every field of the record with the same code. Atomic per call.
    async fn upsert(&self, record: SwiftCode) -> Result<UpsertOutcome, ServiceError>;
    async fn delete_by_code(&self, code: &str) -> Result<bool, ServiceError>;
}

/// In-memory repository for tests and doc examples
pub mod mock {
    use super::*;
    use std::collections::BTreeMap;
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::sync::{Mutex, MutexGuard};

    #[derive(Default)]
    pub struct InMemorySwiftCodeRepository {
        rows: Mutex<BTreeMap<String, SwiftCode>>, // key: swift_code
        failing: AtomicBool,
    }

    impl InMemorySwiftCodeRepository {
        pub fn with_records(records: impl IntoIterator<Item = SwiftCode>) -> Self {
            let rows = records.into_iter().map(|r| (r.swift_code.clone(), r)).collect();
            Self { rows: Mutex::new(rows), failing: AtomicBool::new(false) }
        }

        /// Make every subsequent call fail with a storage error (or stop doing so).
        pub fn set_failing(&self, failing: bool) {
            self.failing.store(failing, Ordering::SeqCst);
        }

        pub fn len(&self) -> usize {
            self.rows.lock().map(|rows| rows.len()).unwrap_or_default()
        }

        pub fn is_empty(&self) -> bool {
            self.len() == 0
        }

        fn rows(&self) -> Result<MutexGuard<'_, BTreeMap<String, SwiftCode>>, ServiceError> {
            if self.failing.load(Ordering::SeqCst) {
                return Err(ServiceError::Db("connection refused".into()));
            }
            self.rows.lock().map_err(|e| ServiceError::Db(e.to_string()))
        }
    }

    #[async_trait]
    impl SwiftCodeRepository for InMemorySwiftCodeRepository {
        async fn find_by_code(&self, code: &str) -> Result<Option<SwiftCode>, ServiceError> {
            Ok(self.rows()?.get(code).cloned())
        }

        async fn find_by_country(&self, country_iso2: &str) -> Result<Vec<SwiftCode>, ServiceError> {
            let rows = self.rows()?;
            Ok(rows.values().filter(|r| r.country_iso2 == country_iso2).cloned().collect())
        }

        async fn find_branches(&self, headquarter_code: &str) -> Result<Vec<SwiftCode>, ServiceError> {
            let rows = self.rows()?;
            Ok(rows
                .values()
                .filter(|r| r.headquarter_swift_code.as_deref() == Some(headquarter_code))
                .cloned()
                .collect())
        }

        async fn upsert(&self, record: SwiftCode) -> Result<UpsertOutcome, ServiceError> {
            let mut rows = self.rows()?;
            let outcome = match rows.get(&record.swift_code) {
                Some(previous) => UpsertOutcome::Updated { changes: record.changes_from(previous) },
                None => UpsertOutcome::Inserted,
            };
            rows.insert(record.swift_code.clone(), record);
            Ok(outcome)
        }

        async fn delete_by_code(&self, code: &str) -> Result<bool, ServiceError> {
            Ok(self.rows()?.remove(code).is_some())
        }
    }
}
