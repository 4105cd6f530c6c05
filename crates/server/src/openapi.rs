use serde::Serialize;
use utoipa::OpenApi;
use utoipa::ToSchema;

#[derive(Serialize, ToSchema)]
pub struct HealthResponse { pub status: String }

#[derive(Serialize, ToSchema)]
pub struct MessageDoc { pub message: String }

#[derive(Serialize, ToSchema)]
pub struct ErrorDoc { pub error: String }

#[derive(Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateSwiftCodeDoc {
    pub swift_code: String,
    pub bank_name: String,
    pub address: String,
    #[serde(rename = "countryISO2")]
    pub country_iso2: String,
    pub country_name: String,
    pub is_headquarter: bool,
    pub headquarter_swift_code: Option<String>,
}

#[derive(Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct BranchSummaryDoc {
    pub swift_code: String,
    pub bank_name: String,
    pub address: String,
    #[serde(rename = "countryISO2")]
    pub country_iso2: String,
    pub is_headquarter: bool,
}

#[derive(Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct HeadquartersDoc {
    pub swift_code: String,
    pub bank_name: String,
    pub address: String,
    #[serde(rename = "countryISO2")]
    pub country_iso2: String,
    pub country_name: String,
    pub is_headquarter: bool,
    pub branches: Vec<BranchSummaryDoc>,
}

#[derive(Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct BranchDoc {
    pub swift_code: String,
    pub bank_name: String,
    pub address: String,
    #[serde(rename = "countryISO2")]
    pub country_iso2: String,
    pub country_name: String,
    pub is_headquarter: bool,
}

/// Single-code lookup: headquarters carry `branches`, branches do not.
#[derive(Serialize, ToSchema)]
#[serde(untagged)]
pub enum SwiftCodeViewDoc {
    Headquarters(HeadquartersDoc),
    Branch(BranchDoc),
}

#[derive(Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CountryCodesDoc {
    #[serde(rename = "countryISO2")]
    pub country_iso2: String,
    pub country_name: String,
    pub codes: Vec<BranchSummaryDoc>,
}

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::routes::health,
        crate::routes::swift_codes::get,
        crate::routes::swift_codes::list_by_country,
        crate::routes::swift_codes::create,
        crate::routes::swift_codes::delete,
    ),
    components(
        schemas(
            HealthResponse,
            MessageDoc,
            ErrorDoc,
            CreateSwiftCodeDoc,
            BranchSummaryDoc,
            HeadquartersDoc,
            BranchDoc,
            SwiftCodeViewDoc,
            CountryCodesDoc,
        )
    ),
    tags(
        (name = "health"),
        (name = "swift-codes")
    )
)]
pub struct ApiDoc;
