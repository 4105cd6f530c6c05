use serde::{Deserialize, Serialize};

use models::swift_code::{self as entity, normalize_country_iso2, normalize_country_name, validate_swift_code};

use crate::errors::ServiceError;

/// A stored SWIFT code record (business view of a `swift_codes` row).
///
/// `headquarter_swift_code` is a plain reference by code; nothing guarantees
/// the referenced headquarters row exists.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SwiftCode {
    pub swift_code: String,
    pub bank_name: String,
    pub address: String,
    #[serde(rename = "countryISO2")]
    pub country_iso2: String,
    pub country_name: String,
    pub is_headquarter: bool,
    pub headquarter_swift_code: Option<String>,
}

impl From<entity::Model> for SwiftCode {
    fn from(m: entity::Model) -> Self {
        Self {
            swift_code: m.swift_code,
            bank_name: m.bank_name,
            address: m.address,
            country_iso2: m.country_iso2,
            country_name: m.country_name,
            is_headquarter: m.is_headquarter,
            headquarter_swift_code: m.headquarter_swift_code,
        }
    }
}

impl From<SwiftCode> for entity::Model {
    fn from(s: SwiftCode) -> Self {
        Self {
            swift_code: s.swift_code,
            bank_name: s.bank_name,
            address: s.address,
            country_iso2: s.country_iso2,
            country_name: s.country_name,
            is_headquarter: s.is_headquarter,
            headquarter_swift_code: s.headquarter_swift_code,
        }
    }
}

/// One field that differs between the stored row and an overwrite.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldChange {
    pub field: &'static str,
    pub from: String,
    pub to: String,
}

impl SwiftCode {
    /// Fields of `self` that differ from `previous`.
    pub fn changes_from(&self, previous: &SwiftCode) -> Vec<FieldChange> {
        let mut changes = Vec::new();
        let mut push = |field: &'static str, from: String, to: String| {
            if from != to {
                changes.push(FieldChange { field, from, to });
            }
        };
        push("bankName", previous.bank_name.clone(), self.bank_name.clone());
        push("address", previous.address.clone(), self.address.clone());
        push("countryISO2", previous.country_iso2.clone(), self.country_iso2.clone());
        push("countryName", previous.country_name.clone(), self.country_name.clone());
        push("isHeadquarter", previous.is_headquarter.to_string(), self.is_headquarter.to_string());
        push(
            "headquarterSwiftCode",
            previous.headquarter_swift_code.clone().unwrap_or_default(),
            self.headquarter_swift_code.clone().unwrap_or_default(),
        );
        changes
    }
}

/// Result of a store upsert.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UpsertOutcome {
    Inserted,
    Updated { changes: Vec<FieldChange> },
}

/// Create/overwrite input, as posted to `POST /v1/codes`.
///
/// `is_headquarter` and `headquarter_swift_code` are taken as given; only the
/// importer derives them from the code's shape.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateSwiftCodeInput {
    pub swift_code: String,
    pub bank_name: String,
    pub address: String,
    #[serde(rename = "countryISO2")]
    pub country_iso2: String,
    pub country_name: String,
    pub is_headquarter: bool,
    #[serde(default)]
    pub headquarter_swift_code: Option<String>,
}

impl CreateSwiftCodeInput {
    /// Validate and normalize into a storable record.
    pub fn into_record(self) -> Result<SwiftCode, ServiceError> {
        validate_swift_code(&self.swift_code)?;
        if let Some(hq) = &self.headquarter_swift_code {
            validate_swift_code(hq)
                .map_err(|e| ServiceError::Validation(format!("headquarterSwiftCode: {e}")))?;
        }
        let country_iso2 = normalize_country_iso2(&self.country_iso2)?;
        Ok(SwiftCode {
            swift_code: self.swift_code,
            bank_name: self.bank_name,
            address: self.address,
            country_iso2,
            country_name: normalize_country_name(&self.country_name),
            is_headquarter: self.is_headquarter,
            headquarter_swift_code: self.headquarter_swift_code,
        })
    }
}

/// Lightweight entry used for branch lists and country listings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BranchSummary {
    pub swift_code: String,
    pub bank_name: String,
    pub address: String,
    #[serde(rename = "countryISO2")]
    pub country_iso2: String,
    pub is_headquarter: bool,
}

impl From<&SwiftCode> for BranchSummary {
    fn from(s: &SwiftCode) -> Self {
        Self {
            swift_code: s.swift_code.clone(),
            bank_name: s.bank_name.clone(),
            address: s.address.clone(),
            country_iso2: s.country_iso2.clone(),
            is_headquarter: s.is_headquarter,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HeadquartersView {
    pub swift_code: String,
    pub bank_name: String,
    pub address: String,
    #[serde(rename = "countryISO2")]
    pub country_iso2: String,
    pub country_name: String,
    pub is_headquarter: bool,
    pub branches: Vec<BranchSummary>,
}

impl HeadquartersView {
    pub fn new(record: SwiftCode, branches: Vec<BranchSummary>) -> Self {
        Self {
            swift_code: record.swift_code,
            bank_name: record.bank_name,
            address: record.address,
            country_iso2: record.country_iso2,
            country_name: record.country_name,
            is_headquarter: true,
            branches,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BranchView {
    pub swift_code: String,
    pub bank_name: String,
    pub address: String,
    #[serde(rename = "countryISO2")]
    pub country_iso2: String,
    pub country_name: String,
    pub is_headquarter: bool,
}

impl From<SwiftCode> for BranchView {
    fn from(record: SwiftCode) -> Self {
        Self {
            swift_code: record.swift_code,
            bank_name: record.bank_name,
            address: record.address,
            country_iso2: record.country_iso2,
            country_name: record.country_name,
            is_headquarter: false,
        }
    }
}

/// Single-code lookup result. The variant decides the JSON shape:
/// headquarters carry `branches`, branches carry neither `branches` nor the
/// headquarters reference.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum SwiftCodeView {
    Headquarters(HeadquartersView),
    Branch(BranchView),
}

impl SwiftCodeView {
    pub fn swift_code(&self) -> &str {
        match self {
            SwiftCodeView::Headquarters(v) => &v.swift_code,
            SwiftCodeView::Branch(v) => &v.swift_code,
        }
    }
}

/// Result of `GET /v1/codes/country/{iso2}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CountrySwiftCodes {
    #[serde(rename = "countryISO2")]
    pub country_iso2: String,
    pub country_name: String,
    pub codes: Vec<BranchSummary>,
}
