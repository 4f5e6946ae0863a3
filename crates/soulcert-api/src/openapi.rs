//! # OpenAPI Specification Assembly
//!
//! Assembles the utoipa-documented routes into a single OpenAPI spec
//! served at `/openapi.json`.

use axum::routing::get;
use axum::{Json, Router};
use utoipa::OpenApi;

use crate::state::AppState;

/// Assembled OpenAPI spec for the API surface.
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Soulcert API — Soulbound Skill Certificates",
        version = "0.1.0",
        description = "Issuance and verification of soulbound (non-transferable) skill certificates: content fingerprinting, registry lookup, ownership binding, and revocation.",
        license(name = "AGPL-3.0-or-later")
    ),
    paths(
        // Certificates
        crate::routes::certificates::issue_certificate,
        crate::routes::certificates::issue_file_certificate,
        crate::routes::certificates::verify_certificate,
        crate::routes::certificates::verify_file_certificate,
        crate::routes::certificates::list_certificates,
        crate::routes::certificates::revoke_certificate,
        // Admins
        crate::routes::admins::login,
        crate::routes::admins::list_admins,
        crate::routes::admins::add_admin,
        crate::routes::admins::remove_admin,
    ),
    components(schemas(
        crate::routes::certificates::IssueCertificateRequest,
        crate::routes::certificates::IssueCertificateResponse,
        crate::routes::certificates::IssueFileCertificateResponse,
        crate::routes::certificates::VerifyCertificateRequest,
        crate::routes::certificates::RevokeCertificateRequest,
        crate::routes::certificates::RevokeCertificateResponse,
        crate::routes::admins::LoginRequest,
        crate::routes::admins::LoginResponse,
        crate::routes::admins::AddAdminRequest,
        crate::routes::admins::AddAdminResponse,
        crate::routes::admins::RemoveAdminRequest,
        crate::routes::admins::RemoveAdminResponse,
        crate::error::ErrorBody,
        crate::error::ErrorDetail,
    )),
    tags(
        (name = "certificates", description = "Certificate issuance, verification, and revocation"),
        (name = "admins", description = "Administrator directory")
    )
)]
pub struct ApiDoc;

/// Build the OpenAPI router.
pub fn router() -> Router<AppState> {
    Router::new().route("/openapi.json", get(serve_spec))
}

/// GET /openapi.json — the generated OpenAPI document.
async fn serve_spec() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}
