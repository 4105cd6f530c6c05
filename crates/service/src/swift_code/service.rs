use std::sync::Arc;

use tracing::{info, instrument};

use super::domain::{
    BranchSummary, BranchView, CountrySwiftCodes, CreateSwiftCodeInput, HeadquartersView, SwiftCodeView,
    UpsertOutcome,
};
use super::repository::SwiftCodeRepository;
use crate::errors::ServiceError;

/// Record manager for SWIFT codes, independent of the web framework.
///
/// Holds no state besides the repository handle; one instance is shared by
/// every request.
pub struct SwiftCodeService<R: SwiftCodeRepository + ?Sized> {
    repo: Arc<R>,
}

impl<R: SwiftCodeRepository + ?Sized> SwiftCodeService<R> {
    pub fn new(repo: Arc<R>) -> Self { Self { repo } }

    /// Look a code up, attaching its branches when it is a headquarters.
    ///
    /// # Examples
    /// ```
    /// use service::swift_code::{SwiftCodeService, domain::{CreateSwiftCodeInput, SwiftCodeView}};
    /// use service::swift_code::repository::mock::InMemorySwiftCodeRepository;
    /// use std::sync::Arc;
    /// let svc = SwiftCodeService::new(Arc::new(InMemorySwiftCodeRepository::default()));
    /// let hq = CreateSwiftCodeInput {
    ///     swift_code: "HQCODEXXX".into(), bank_name: "HQ Bank".into(), address: "Main 1".into(),
    ///     country_iso2: "pl".into(), country_name: "Poland".into(), is_headquarter: true, headquarter_swift_code: None,
    /// };
    /// tokio_test::block_on(svc.create(hq)).unwrap();
    /// let view = tokio_test::block_on(svc.get_with_relations("HQCODEXXX")).unwrap();
    /// assert!(matches!(view, SwiftCodeView::Headquarters(ref v) if v.branches.is_empty()));
    /// ```
    #[instrument(skip(self))]
    pub async fn get_with_relations(&self, code: &str) -> Result<SwiftCodeView, ServiceError> {
        let record = self
            .repo
            .find_by_code(code)
            .await?
            .ok_or_else(|| ServiceError::not_found(&format!("swift code {code}")))?;

        if !record.is_headquarter {
            return Ok(SwiftCodeView::Branch(BranchView::from(record)));
        }

        let branches = self.repo.find_branches(&record.swift_code).await?;
        let summaries = branches.iter().map(BranchSummary::from).collect();
        Ok(SwiftCodeView::Headquarters(HeadquartersView::new(record, summaries)))
    }

    /// All codes registered for a country. The country code is matched upper-cased.
    #[instrument(skip(self))]
    pub async fn list_by_country(&self, country_iso2: &str) -> Result<CountrySwiftCodes, ServiceError> {
        let iso2 = country_iso2.trim().to_ascii_uppercase();
        let records = self.repo.find_by_country(&iso2).await?;
        let Some(first) = records.first() else {
            return Err(ServiceError::NotFound(format!("no swift codes found for country {iso2}")));
        };

        Ok(CountrySwiftCodes {
            country_name: first.country_name.clone(),
            codes: records.iter().map(BranchSummary::from).collect(),
            country_iso2: iso2,
        })
    }

    /// Create or fully overwrite a record.
    ///
    /// Country fields are upper-cased; the headquarters flag and reference are
    /// stored exactly as supplied.
    #[instrument(skip(self, input), fields(swift_code = %input.swift_code))]
    pub async fn create(&self, input: CreateSwiftCodeInput) -> Result<UpsertOutcome, ServiceError> {
        let record = input.into_record()?;
        let code = record.swift_code.clone();
        let outcome = self.repo.upsert(record).await?;

        match &outcome {
            UpsertOutcome::Inserted => info!(swift_code = %code, "swift_code_inserted"),
            UpsertOutcome::Updated { changes } => {
                for change in changes {
                    info!(swift_code = %code, field = change.field, from = %change.from, to = %change.to, "swift_code_field_changed");
                }
                info!(swift_code = %code, changed = changes.len(), "swift_code_updated");
            }
        }
        Ok(outcome)
    }

    #[instrument(skip(self))]
    pub async fn delete(&self, code: &str) -> Result<(), ServiceError> {
        if self.repo.delete_by_code(code).await? {
            info!(swift_code = %code, "swift_code_deleted");
            Ok(())
        } else {
            Err(ServiceError::not_found(&format!("swift code {code}")))
        }
    }
}
