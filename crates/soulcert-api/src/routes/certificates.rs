//! # Certificate Issuance and Verification Endpoints
//!
//! The HTTP face of the registry. Handlers carry no business logic —
//! they extract fields, delegate to [`CertificateService`], and shape
//! the response.
//!
//! Structured certificates travel as JSON; file certificates travel as
//! the raw request body with the identity fields in query parameters
//! (the verification surface is consumed by scripts and dashboards,
//! not browsers posting forms).
//!
//! ## Endpoints
//!
//! - `POST /v1/certificates` — issue a structured certificate.
//! - `POST /v1/certificates/file` — issue a file certificate.
//! - `POST /v1/certificates/verify` — verify a structured certificate.
//! - `POST /v1/certificates/file/verify` — verify a file certificate.
//! - `GET /v1/certificates` — registry dump for the dashboard.
//! - `POST /v1/certificates/:id/revoke` — revoke.

use axum::body::Bytes;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use soulcert_core::{CertificateId, ContentDigest};
use soulcert_registry::{
    CertificateDocument, CertificateRecord, RevocationOutcome, VerificationReport,
    VerificationStatus,
};

use crate::error::AppError;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Request / Response types
// ---------------------------------------------------------------------------

/// Request body for structured certificate issuance.
#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct IssueCertificateRequest {
    /// The skill being certified.
    #[serde(default)]
    pub skill_name: Option<String>,
    /// The owner the certificate is soulbound to.
    #[serde(default)]
    pub owner_id: Option<String>,
    /// The issuing entity.
    #[serde(default)]
    pub issuer: Option<String>,
}

/// Response from structured certificate issuance.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct IssueCertificateResponse {
    /// Human-readable confirmation.
    pub message: String,
    /// The complete certificate content the holder must retain —
    /// verification requires this exact document.
    #[schema(value_type = Object)]
    pub certificate: CertificateDocument,
    /// Fingerprint recorded in the registry.
    #[schema(value_type = String)]
    pub digest: ContentDigest,
}

/// Identity fields accompanying a file issuance request.
#[derive(Debug, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct FileIssueParams {
    /// The owner the certificate is soulbound to.
    #[serde(default)]
    pub owner_id: Option<String>,
    /// The issuing entity.
    #[serde(default)]
    pub issuer: Option<String>,
}

/// Response from file certificate issuance.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct IssueFileCertificateResponse {
    /// Human-readable confirmation.
    pub message: String,
    /// Identifier needed to verify the file later.
    #[schema(value_type = String)]
    pub certificate_id: CertificateId,
    /// Fingerprint of the file bytes.
    #[schema(value_type = String)]
    pub digest: ContentDigest,
}

/// Request body for structured certificate verification.
#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct VerifyCertificateRequest {
    /// The presented certificate document.
    #[serde(default)]
    pub certificate: Option<serde_json::Value>,
    /// The identity the presenter claims the certificate belongs to.
    #[serde(default)]
    pub claimed_owner_id: Option<String>,
}

/// Identity fields accompanying a file verification request.
#[derive(Debug, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct FileVerifyParams {
    /// The certificate identifier issued with the file.
    #[serde(default)]
    pub certificate_id: Option<String>,
    /// The identity the presenter claims the certificate belongs to.
    #[serde(default)]
    pub claimed_owner_id: Option<String>,
}

/// Request body for revocation.
#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RevokeCertificateRequest {
    /// The administrator performing the revocation.
    #[serde(default)]
    pub admin_id: Option<String>,
}

/// Response from revocation.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct RevokeCertificateResponse {
    /// Human-readable confirmation.
    pub message: String,
}

// ---------------------------------------------------------------------------
// Router
// ---------------------------------------------------------------------------

/// Build the certificates router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/v1/certificates",
            get(list_certificates).post(issue_certificate),
        )
        .route("/v1/certificates/file", post(issue_file_certificate))
        .route("/v1/certificates/verify", post(verify_certificate))
        .route(
            "/v1/certificates/file/verify",
            post(verify_file_certificate),
        )
        .route("/v1/certificates/:id/revoke", post(revoke_certificate))
}

/// Map a verification report to its HTTP response. Business outcomes
/// are 200; only the malformed-request `ERROR` status is 400.
fn report_response(report: VerificationReport) -> (StatusCode, Json<VerificationReport>) {
    let status = if report.status == VerificationStatus::Error {
        StatusCode::BAD_REQUEST
    } else {
        StatusCode::OK
    };
    (status, Json(report))
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// POST /v1/certificates — issue a structured certificate.
///
/// Returns the complete certificate document — identifier and issuance
/// timestamp included — because the digest covers the assembled
/// document, and verification must be handed exactly this content.
#[utoipa::path(
    post,
    path = "/v1/certificates",
    request_body = IssueCertificateRequest,
    responses(
        (status = 200, description = "Certificate issued", body = IssueCertificateResponse),
        (status = 400, description = "Missing required fields", body = crate::error::ErrorBody),
        (status = 500, description = "Registry could not be persisted", body = crate::error::ErrorBody),
    ),
    tag = "certificates"
)]
pub(crate) async fn issue_certificate(
    State(state): State<AppState>,
    Json(req): Json<IssueCertificateRequest>,
) -> Result<Json<IssueCertificateResponse>, AppError> {
    let issued = state.service.issue(
        req.skill_name.as_deref().unwrap_or(""),
        req.owner_id.as_deref().unwrap_or(""),
        req.issuer.as_deref().unwrap_or(""),
    )?;
    Ok(Json(IssueCertificateResponse {
        message: "Certificate issued successfully".to_string(),
        certificate: issued.document,
        digest: issued.digest,
    }))
}

/// POST /v1/certificates/file — issue a file certificate.
///
/// The raw file is the request body; `ownerId` and `issuer` arrive as
/// query parameters. The digest covers the file bytes only.
#[utoipa::path(
    post,
    path = "/v1/certificates/file",
    params(FileIssueParams),
    request_body = Vec<u8>,
    responses(
        (status = 200, description = "File certificate issued", body = IssueFileCertificateResponse),
        (status = 400, description = "Missing file or identity fields", body = crate::error::ErrorBody),
    ),
    tag = "certificates"
)]
pub(crate) async fn issue_file_certificate(
    State(state): State<AppState>,
    Query(params): Query<FileIssueParams>,
    body: Bytes,
) -> Result<Json<IssueFileCertificateResponse>, AppError> {
    let issued = state.service.issue_file(
        &body,
        params.owner_id.as_deref().unwrap_or(""),
        params.issuer.as_deref().unwrap_or(""),
    )?;
    Ok(Json(IssueFileCertificateResponse {
        message: "File certificate issued".to_string(),
        certificate_id: issued.certificate_id,
        digest: issued.digest,
    }))
}

/// POST /v1/certificates/verify — verify a structured certificate.
///
/// Outcomes are values: `NOT_FOUND`, `TAMPERED`, `OWNERSHIP_MISMATCH`,
/// `REVOKED` and `VALID` all return 200. A request missing the
/// certificate or the claimed owner returns 400 with status `ERROR`.
#[utoipa::path(
    post,
    path = "/v1/certificates/verify",
    request_body = VerifyCertificateRequest,
    responses(
        (status = 200, description = "Verification outcome", body = serde_json::Value),
        (status = 400, description = "Malformed verification request", body = serde_json::Value),
    ),
    tag = "certificates"
)]
pub(crate) async fn verify_certificate(
    State(state): State<AppState>,
    Json(req): Json<VerifyCertificateRequest>,
) -> (StatusCode, Json<VerificationReport>) {
    let (Some(certificate), Some(claimed_owner_id)) = (req.certificate, req.claimed_owner_id)
    else {
        return report_response(VerificationReport::malformed(
            "Missing certificate or claimedOwnerId",
        ));
    };
    let document: CertificateDocument = match serde_json::from_value(certificate) {
        Ok(doc) => doc,
        Err(e) => {
            return report_response(VerificationReport::malformed(format!(
                "Certificate payload is malformed: {e}"
            )))
        }
    };
    report_response(state.service.verify_document(&document, &claimed_owner_id))
}

/// POST /v1/certificates/file/verify — verify a file certificate.
#[utoipa::path(
    post,
    path = "/v1/certificates/file/verify",
    params(FileVerifyParams),
    request_body = Vec<u8>,
    responses(
        (status = 200, description = "Verification outcome", body = serde_json::Value),
        (status = 400, description = "Malformed verification request", body = serde_json::Value),
    ),
    tag = "certificates"
)]
pub(crate) async fn verify_file_certificate(
    State(state): State<AppState>,
    Query(params): Query<FileVerifyParams>,
    body: Bytes,
) -> (StatusCode, Json<VerificationReport>) {
    report_response(state.service.verify_file(
        params.certificate_id.as_deref().unwrap_or(""),
        &body,
        params.claimed_owner_id.as_deref().unwrap_or(""),
    ))
}

/// GET /v1/certificates — full registry dump for the dashboard.
#[utoipa::path(
    get,
    path = "/v1/certificates",
    responses(
        (status = 200, description = "All registry records", body = Vec<serde_json::Value>),
    ),
    tag = "certificates"
)]
pub(crate) async fn list_certificates(
    State(state): State<AppState>,
) -> Json<Vec<CertificateRecord>> {
    Json(state.service.list())
}

/// POST /v1/certificates/:id/revoke — revoke a certificate.
///
/// Idempotent: revoking an already-revoked certificate succeeds and
/// says so; the original revocation metadata is preserved.
#[utoipa::path(
    post,
    path = "/v1/certificates/{id}/revoke",
    params(("id" = String, Path, description = "Certificate identifier")),
    request_body = RevokeCertificateRequest,
    responses(
        (status = 200, description = "Certificate revoked", body = RevokeCertificateResponse),
        (status = 404, description = "Unknown certificate", body = crate::error::ErrorBody),
    ),
    tag = "certificates"
)]
pub(crate) async fn revoke_certificate(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(req): Json<RevokeCertificateRequest>,
) -> Result<Json<RevokeCertificateResponse>, AppError> {
    match state
        .service
        .revoke(&id, req.admin_id.as_deref().unwrap_or(""))?
    {
        RevocationOutcome::Revoked => Ok(Json(RevokeCertificateResponse {
            message: "Certificate revoked".to_string(),
        })),
        RevocationOutcome::AlreadyRevoked => Ok(Json(RevokeCertificateResponse {
            message: "Certificate already revoked".to_string(),
        })),
        RevocationOutcome::NotFound => {
            Err(AppError::NotFound(format!("certificate {id} not found")))
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::Request;
    use http_body_util::BodyExt;
    use tower::ServiceExt;

    fn test_app() -> (AppState, Router) {
        let state = AppState::in_memory();
        (state.clone(), crate::app(state))
    }

    async fn body_json<T: serde::de::DeserializeOwned>(resp: axum::response::Response) -> T {
        let bytes = resp.into_body().collect().await.unwrap().to_bytes();
        serde_json::from_slice(&bytes).unwrap()
    }

    fn post_json(uri: &str, body: serde_json::Value) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header("content-type", "application/json")
            .body(Body::from(serde_json::to_string(&body).unwrap()))
            .unwrap()
    }

    async fn issue_demo(app: &Router) -> IssueCertificateResponse {
        let req = post_json(
            "/v1/certificates",
            serde_json::json!({
                "skillName": "React Basics",
                "ownerId": "USER_123",
                "issuer": "Demo Institute"
            }),
        );
        let resp = app.clone().oneshot(req).await.unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
        body_json(resp).await
    }

    fn verify_body(issued: &IssueCertificateResponse, claimed: &str) -> serde_json::Value {
        serde_json::json!({
            "certificate": serde_json::to_value(&issued.certificate).unwrap(),
            "claimedOwnerId": claimed
        })
    }

    // ── Issue + verify round trip ────────────────────────────────

    #[tokio::test]
    async fn issue_and_verify_round_trip() {
        let (_, app) = test_app();
        let issued = issue_demo(&app).await;
        assert_eq!(issued.certificate.owner_id.as_str(), "USER_123");

        let resp = app
            .clone()
            .oneshot(post_json(
                "/v1/certificates/verify",
                verify_body(&issued, "USER_123"),
            ))
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
        let report: VerificationReport = body_json(resp).await;
        assert_eq!(report.status, VerificationStatus::Valid);
        assert_eq!(report.issuer.as_deref(), Some("Demo Institute"));
    }

    #[tokio::test]
    async fn issue_missing_fields_is_400() {
        let (state, app) = test_app();
        let resp = app
            .clone()
            .oneshot(post_json(
                "/v1/certificates",
                serde_json::json!({"skillName": "React Basics"}),
            ))
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        // No registry mutation on validation failure.
        assert!(state.service.registry().is_empty());
    }

    #[tokio::test]
    async fn tampered_certificate_detected() {
        let (_, app) = test_app();
        let issued = issue_demo(&app).await;

        let mut certificate = serde_json::to_value(&issued.certificate).unwrap();
        certificate["skillName"] = serde_json::Value::String("Hacked Skill".into());
        let resp = app
            .clone()
            .oneshot(post_json(
                "/v1/certificates/verify",
                serde_json::json!({"certificate": certificate, "claimedOwnerId": "USER_123"}),
            ))
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
        let report: VerificationReport = body_json(resp).await;
        assert_eq!(report.status, VerificationStatus::Tampered);
    }

    #[tokio::test]
    async fn impostor_gets_ownership_mismatch() {
        let (_, app) = test_app();
        let issued = issue_demo(&app).await;

        let resp = app
            .clone()
            .oneshot(post_json(
                "/v1/certificates/verify",
                verify_body(&issued, "IMPOSTOR"),
            ))
            .await
            .unwrap();
        let report: VerificationReport = body_json(resp).await;
        assert_eq!(report.status, VerificationStatus::OwnershipMismatch);
    }

    #[tokio::test]
    async fn unknown_certificate_not_found() {
        let (_, app) = test_app();
        let issued = issue_demo(&app).await;

        let mut certificate = serde_json::to_value(&issued.certificate).unwrap();
        certificate["certificateId"] =
            serde_json::Value::String(CertificateId::mint().to_string());
        let resp = app
            .clone()
            .oneshot(post_json(
                "/v1/certificates/verify",
                serde_json::json!({"certificate": certificate, "claimedOwnerId": "USER_123"}),
            ))
            .await
            .unwrap();
        let report: VerificationReport = body_json(resp).await;
        assert_eq!(report.status, VerificationStatus::NotFound);
        assert!(report.issuer.is_none());
    }

    #[tokio::test]
    async fn verify_missing_inputs_is_error_status_400() {
        let (_, app) = test_app();
        let resp = app
            .clone()
            .oneshot(post_json(
                "/v1/certificates/verify",
                serde_json::json!({"claimedOwnerId": "USER_123"}),
            ))
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        let report: VerificationReport = body_json(resp).await;
        assert_eq!(report.status, VerificationStatus::Error);
    }

    #[tokio::test]
    async fn verify_garbled_certificate_is_error_not_panic() {
        let (_, app) = test_app();
        let resp = app
            .clone()
            .oneshot(post_json(
                "/v1/certificates/verify",
                serde_json::json!({
                    "certificate": {"certificateId": 42},
                    "claimedOwnerId": "USER_123"
                }),
            ))
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        let report: VerificationReport = body_json(resp).await;
        assert_eq!(report.status, VerificationStatus::Error);
    }

    // ── Revocation ──────────────────────────────────────────────

    #[tokio::test]
    async fn revoked_certificate_reports_revoked() {
        let (_, app) = test_app();
        let issued = issue_demo(&app).await;
        let id = issued.certificate.certificate_id.to_string();

        let resp = app
            .clone()
            .oneshot(post_json(
                &format!("/v1/certificates/{id}/revoke"),
                serde_json::json!({"adminId": "admin"}),
            ))
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::OK);

        let resp = app
            .clone()
            .oneshot(post_json(
                "/v1/certificates/verify",
                verify_body(&issued, "USER_123"),
            ))
            .await
            .unwrap();
        let report: VerificationReport = body_json(resp).await;
        assert_eq!(report.status, VerificationStatus::Revoked);

        // Re-revocation stays 200 (idempotent).
        let resp = app
            .clone()
            .oneshot(post_json(
                &format!("/v1/certificates/{id}/revoke"),
                serde_json::json!({"adminId": "admin"}),
            ))
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
        let body: RevokeCertificateResponse = body_json(resp).await;
        assert!(body.message.contains("already"));
    }

    #[tokio::test]
    async fn revoke_unknown_certificate_is_404() {
        let (_, app) = test_app();
        let resp = app
            .clone()
            .oneshot(post_json(
                &format!("/v1/certificates/{}/revoke", CertificateId::mint()),
                serde_json::json!({"adminId": "admin"}),
            ))
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    }

    // ── File mode ───────────────────────────────────────────────

    #[tokio::test]
    async fn file_issue_and_verify_round_trip() {
        let (_, app) = test_app();
        let pdf = b"%PDF-1.4 certificate of completion".to_vec();

        let resp = app
            .clone()
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/v1/certificates/file?ownerId=USER_123&issuer=Demo%20Institute")
                    .body(Body::from(pdf.clone()))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
        let issued: IssueFileCertificateResponse = body_json(resp).await;

        let uri = format!(
            "/v1/certificates/file/verify?certificateId={}&claimedOwnerId=USER_123",
            issued.certificate_id
        );
        let resp = app
            .clone()
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri(uri)
                    .body(Body::from(pdf.clone()))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
        let report: VerificationReport = body_json(resp).await;
        assert_eq!(report.status, VerificationStatus::Valid);

        // A modified file reads as tampered.
        let mut altered = pdf;
        altered[4] ^= 0x01;
        let uri = format!(
            "/v1/certificates/file/verify?certificateId={}&claimedOwnerId=USER_123",
            issued.certificate_id
        );
        let resp = app
            .clone()
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri(uri)
                    .body(Body::from(altered))
                    .unwrap(),
            )
            .await
            .unwrap();
        let report: VerificationReport = body_json(resp).await;
        assert_eq!(report.status, VerificationStatus::Tampered);
    }

    #[tokio::test]
    async fn file_issue_without_identity_is_400() {
        let (_, app) = test_app();
        let resp = app
            .clone()
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/v1/certificates/file")
                    .body(Body::from("some bytes"))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn file_verify_missing_fields_is_error() {
        let (_, app) = test_app();
        let resp = app
            .clone()
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/v1/certificates/file/verify")
                    .body(Body::from("bytes"))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        let report: VerificationReport = body_json(resp).await;
        assert_eq!(report.status, VerificationStatus::Error);
    }

    // ── Dashboard ───────────────────────────────────────────────

    #[tokio::test]
    async fn list_returns_all_records() {
        let (_, app) = test_app();
        issue_demo(&app).await;
        issue_demo(&app).await;

        let resp = app
            .clone()
            .oneshot(
                Request::builder()
                    .method("GET")
                    .uri("/v1/certificates")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
        let records: Vec<serde_json::Value> = body_json(resp).await;
        assert_eq!(records.len(), 2);
        assert_eq!(records[0]["status"], "ACTIVE");
        assert!(records[0].get("certificateId").is_some());
    }

    #[tokio::test]
    async fn health_probes_respond() {
        let (_, app) = test_app();
        for path in ["/health/liveness", "/health/readiness"] {
            let resp = app
                .clone()
                .oneshot(
                    Request::builder()
                        .method("GET")
                        .uri(path)
                        .body(Body::empty())
                        .unwrap(),
                )
                .await
                .unwrap();
            assert_eq!(resp.status(), StatusCode::OK);
        }
    }
}
