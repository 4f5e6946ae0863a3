//! # soulcert-api — Axum HTTP Service for Soulcert
//!
//! Exposes the certificate registry over HTTP for the issuing
//! institution's dashboard and for third-party verifiers.
//!
//! ## API Surface
//!
//! | Route | Module | Purpose |
//! |---|---|---|
//! | `POST /v1/certificates` | [`routes::certificates`] | Issue a structured certificate |
//! | `POST /v1/certificates/file` | [`routes::certificates`] | Issue a file certificate |
//! | `POST /v1/certificates/verify` | [`routes::certificates`] | Verify a structured certificate |
//! | `POST /v1/certificates/file/verify` | [`routes::certificates`] | Verify a file certificate |
//! | `GET /v1/certificates` | [`routes::certificates`] | Registry dump for the dashboard |
//! | `POST /v1/certificates/:id/revoke` | [`routes::certificates`] | Revoke a certificate |
//! | `POST /v1/admins/login` | [`routes::admins`] | Administrator sign-in |
//! | `GET /v1/admins`, `POST /v1/admins`, `POST /v1/admins/remove` | [`routes::admins`] | Directory management |
//! | `/health/*` | here | Probes, outside the API router |
//! | `/openapi.json` | [`openapi`] | Generated OpenAPI document |
//!
//! Verification outcomes (`VALID`, `NOT_FOUND`, `TAMPERED`,
//! `OWNERSHIP_MISMATCH`, `REVOKED`) travel as 200-class responses —
//! they are business results, not errors. Only malformed requests and
//! store faults surface as error statuses.
//!
//! CORS is permissive: the verification surface is deliberately public
//! and the dashboard is served from another origin.

pub mod error;
pub mod openapi;
pub mod routes;
pub mod state;

use axum::routing::get;
use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

pub use error::AppError;
pub use state::AppState;

/// Assemble the full application router with all routes and middleware.
///
/// Health probes are mounted outside the API router so they stay
/// reachable regardless of API state.
pub fn app(state: AppState) -> Router {
    let api = Router::new()
        .merge(routes::certificates::router())
        .merge(routes::admins::router())
        .merge(openapi::router())
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state);

    let health = Router::new()
        .route("/health/liveness", get(liveness))
        .route("/health/readiness", get(readiness));

    Router::new().merge(health).merge(api)
}

/// Liveness probe — 200 whenever the process runs.
async fn liveness() -> &'static str {
    "ok"
}

/// Readiness probe — 200 when the service can answer requests.
async fn readiness() -> &'static str {
    "ready"
}
