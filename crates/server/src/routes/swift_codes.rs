use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    Json,
};
use tracing::info;

use common::types::MessageBody;
use service::swift_code::domain::{CountrySwiftCodes, CreateSwiftCodeInput, SwiftCodeView, UpsertOutcome};

use crate::errors::JsonApiError;
use crate::routes::ServerState;

#[utoipa::path(
    get, path = "/v1/codes/{swift_code}", tag = "swift-codes",
    params(("swift_code" = String, Path, description = "SWIFT/BIC code")),
    responses(
        (status = 200, description = "Headquarters (with branches) or branch", body = crate::openapi::SwiftCodeViewDoc),
        (status = 404, description = "Not Found", body = crate::openapi::ErrorDoc)
    )
)]
pub async fn get(
    State(state): State<ServerState>,
    Path(swift_code): Path<String>,
) -> Result<Json<SwiftCodeView>, JsonApiError> {
    let view = state.swift_codes.get_with_relations(&swift_code).await?;
    let headquarters = matches!(view, SwiftCodeView::Headquarters(_));
    info!(swift_code = %view.swift_code(), headquarters, "get swift code");
    Ok(Json(view))
}

#[utoipa::path(
    get, path = "/v1/codes/country/{country_iso2}", tag = "swift-codes",
    params(("country_iso2" = String, Path, description = "ISO 3166-1 alpha-2 country code")),
    responses(
        (status = 200, description = "Codes of the country", body = crate::openapi::CountryCodesDoc),
        (status = 404, description = "No codes for the country", body = crate::openapi::ErrorDoc)
    )
)]
pub async fn list_by_country(
    State(state): State<ServerState>,
    Path(country_iso2): Path<String>,
) -> Result<Json<CountrySwiftCodes>, JsonApiError> {
    let listing = state.swift_codes.list_by_country(&country_iso2).await?;
    info!(country = %listing.country_iso2, count = listing.codes.len(), "list swift codes by country");
    Ok(Json(listing))
}

#[utoipa::path(
    post, path = "/v1/codes", tag = "swift-codes",
    request_body = crate::openapi::CreateSwiftCodeDoc,
    responses(
        (status = 201, description = "Created or overwritten", body = crate::openapi::MessageDoc),
        (status = 400, description = "Malformed or invalid body", body = crate::openapi::ErrorDoc),
        (status = 500, description = "Storage failure", body = crate::openapi::ErrorDoc)
    )
)]
pub async fn create(
    State(state): State<ServerState>,
    payload: Result<Json<CreateSwiftCodeInput>, JsonRejection>,
) -> Result<(StatusCode, Json<MessageBody>), JsonApiError> {
    let Json(input) = payload?;
    let message = match state.swift_codes.create(input).await? {
        UpsertOutcome::Inserted => "SWIFT code created successfully",
        UpsertOutcome::Updated { .. } => "SWIFT code updated successfully",
    };
    Ok((StatusCode::CREATED, Json(MessageBody::new(message))))
}

#[utoipa::path(
    delete, path = "/v1/codes/{swift_code}", tag = "swift-codes",
    params(("swift_code" = String, Path, description = "SWIFT/BIC code")),
    responses(
        (status = 200, description = "Deleted", body = crate::openapi::MessageDoc),
        (status = 404, description = "Not Found", body = crate::openapi::ErrorDoc),
        (status = 500, description = "Delete Failed", body = crate::openapi::ErrorDoc)
    )
)]
pub async fn delete(
    State(state): State<ServerState>,
    Path(swift_code): Path<String>,
) -> Result<Json<MessageBody>, JsonApiError> {
    state.swift_codes.delete(&swift_code).await?;
    Ok(Json(MessageBody::new("SWIFT code deleted successfully")))
}
