//! # Administrator Directory Endpoints
//!
//! Sign-in and directory management. Password hash material never
//! appears in any response — handlers only see [`AdminProfile`].

use axum::extract::State;
use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use soulcert_registry::AdminProfile;

use crate::error::AppError;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Request / Response types
// ---------------------------------------------------------------------------

/// Request body for administrator sign-in.
#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest {
    /// Login identifier.
    #[serde(default)]
    pub admin_id: Option<String>,
    /// Password.
    #[serde(default)]
    pub password: Option<String>,
}

/// Response from a successful sign-in.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct LoginResponse {
    /// The authenticated administrator's profile.
    #[schema(value_type = Object)]
    pub admin: AdminProfile,
}

/// Request body for adding an administrator.
#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AddAdminRequest {
    /// Display name.
    #[serde(default)]
    pub name: Option<String>,
    /// Login identifier for the new account.
    #[serde(default)]
    pub admin_id: Option<String>,
    /// Initial password.
    #[serde(default)]
    pub password: Option<String>,
}

/// Response from adding an administrator.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct AddAdminResponse {
    /// Human-readable confirmation.
    pub message: String,
    /// The created account's profile.
    #[schema(value_type = Object)]
    pub admin: AdminProfile,
}

/// Request body for removing an administrator.
#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RemoveAdminRequest {
    /// The account to remove.
    #[serde(default)]
    pub target_admin_id: Option<String>,
    /// The account performing the removal.
    #[serde(default)]
    pub requesting_admin_id: Option<String>,
}

/// Response from removing an administrator.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct RemoveAdminResponse {
    /// Human-readable confirmation.
    pub message: String,
}

// ---------------------------------------------------------------------------
// Router
// ---------------------------------------------------------------------------

/// Build the admins router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/v1/admins", get(list_admins).post(add_admin))
        .route("/v1/admins/login", post(login))
        .route("/v1/admins/remove", post(remove_admin))
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// POST /v1/admins/login — administrator sign-in.
#[utoipa::path(
    post,
    path = "/v1/admins/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Authenticated", body = LoginResponse),
        (status = 401, description = "Invalid credentials", body = crate::error::ErrorBody),
    ),
    tag = "admins"
)]
pub(crate) async fn login(
    State(state): State<AppState>,
    Json(req): Json<LoginRequest>,
) -> Result<Json<LoginResponse>, AppError> {
    let admin = state.admins.authenticate(
        req.admin_id.as_deref().unwrap_or(""),
        req.password.as_deref().unwrap_or(""),
    )?;
    Ok(Json(LoginResponse { admin }))
}

/// GET /v1/admins — list administrator profiles.
#[utoipa::path(
    get,
    path = "/v1/admins",
    responses(
        (status = 200, description = "All administrator profiles", body = Vec<serde_json::Value>),
    ),
    tag = "admins"
)]
pub(crate) async fn list_admins(State(state): State<AppState>) -> Json<Vec<AdminProfile>> {
    Json(state.admins.list())
}

/// POST /v1/admins — add an administrator.
#[utoipa::path(
    post,
    path = "/v1/admins",
    request_body = AddAdminRequest,
    responses(
        (status = 201, description = "Administrator added", body = AddAdminResponse),
        (status = 409, description = "Identifier already in use", body = crate::error::ErrorBody),
    ),
    tag = "admins"
)]
pub(crate) async fn add_admin(
    State(state): State<AppState>,
    Json(req): Json<AddAdminRequest>,
) -> Result<(StatusCode, Json<AddAdminResponse>), AppError> {
    let admin = state.admins.add_admin(
        req.name.as_deref().unwrap_or(""),
        req.admin_id.as_deref().unwrap_or(""),
        req.password.as_deref().unwrap_or(""),
    )?;
    Ok((
        StatusCode::CREATED,
        Json(AddAdminResponse {
            message: "Administrator added".to_string(),
            admin,
        }),
    ))
}

/// POST /v1/admins/remove — remove an administrator.
///
/// An account cannot remove itself, so the directory never empties.
#[utoipa::path(
    post,
    path = "/v1/admins/remove",
    request_body = RemoveAdminRequest,
    responses(
        (status = 200, description = "Administrator removed", body = RemoveAdminResponse),
        (status = 400, description = "Self-removal refused", body = crate::error::ErrorBody),
        (status = 404, description = "Unknown administrator", body = crate::error::ErrorBody),
    ),
    tag = "admins"
)]
pub(crate) async fn remove_admin(
    State(state): State<AppState>,
    Json(req): Json<RemoveAdminRequest>,
) -> Result<Json<RemoveAdminResponse>, AppError> {
    state.admins.remove_admin(
        req.target_admin_id.as_deref().unwrap_or(""),
        req.requesting_admin_id.as_deref().unwrap_or(""),
    )?;
    Ok(Json(RemoveAdminResponse {
        message: "Administrator removed".to_string(),
    }))
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

    fn test_app() -> Router {
        crate::app(AppState::in_memory())
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

    #[tokio::test]
    async fn default_admin_can_sign_in() {
        let app = test_app();
        let resp = app
            .clone()
            .oneshot(post_json(
                "/v1/admins/login",
                serde_json::json!({"adminId": "admin", "password": "password123"}),
            ))
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
        let body: LoginResponse = body_json(resp).await;
        assert_eq!(body.admin.admin_id, "admin");
        assert_eq!(body.admin.name, "Global Admin");
    }

    #[tokio::test]
    async fn wrong_password_is_401() {
        let app = test_app();
        let resp = app
            .clone()
            .oneshot(post_json(
                "/v1/admins/login",
                serde_json::json!({"adminId": "admin", "password": "wrong"}),
            ))
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn login_response_has_no_hash_material() {
        let app = test_app();
        let resp = app
            .clone()
            .oneshot(post_json(
                "/v1/admins/login",
                serde_json::json!({"adminId": "admin", "password": "password123"}),
            ))
            .await
            .unwrap();
        let bytes = resp.into_body().collect().await.unwrap().to_bytes();
        let raw = String::from_utf8(bytes.to_vec()).unwrap();
        assert!(!raw.contains("passwordHash"));
        assert!(!raw.contains("passwordSalt"));
    }

    #[tokio::test]
    async fn add_list_and_remove_admin() {
        let app = test_app();

        let resp = app
            .clone()
            .oneshot(post_json(
                "/v1/admins",
                serde_json::json!({"name": "Second", "adminId": "admin2", "password": "pw"}),
            ))
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::CREATED);

        let resp = app
            .clone()
            .oneshot(
                Request::builder()
                    .method("GET")
                    .uri("/v1/admins")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        let admins: Vec<AdminProfile> = body_json(resp).await;
        assert_eq!(admins.len(), 2);

        let resp = app
            .clone()
            .oneshot(post_json(
                "/v1/admins/remove",
                serde_json::json!({"targetAdminId": "admin2", "requestingAdminId": "admin"}),
            ))
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn duplicate_admin_is_409() {
        let app = test_app();
        let resp = app
            .clone()
            .oneshot(post_json(
                "/v1/admins",
                serde_json::json!({"name": "Clone", "adminId": "admin", "password": "pw"}),
            ))
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::CONFLICT);
    }

    #[tokio::test]
    async fn self_removal_is_400() {
        let app = test_app();
        let resp = app
            .clone()
            .oneshot(post_json(
                "/v1/admins/remove",
                serde_json::json!({"targetAdminId": "admin", "requestingAdminId": "admin"}),
            ))
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn remove_unknown_admin_is_404() {
        let app = test_app();
        let resp = app
            .clone()
            .oneshot(post_json(
                "/v1/admins/remove",
                serde_json::json!({"targetAdminId": "ghost", "requestingAdminId": "admin"}),
            ))
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    }
}
