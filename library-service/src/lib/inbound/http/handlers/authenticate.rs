use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use chrono::Utc;
use serde::Deserialize;
use serde::Serialize;

use super::principals::PrincipalData;
use super::ApiError;
use super::ApiSuccess;
use crate::auth::errors::AuthError;
use crate::auth::models::LoginResult;
use crate::inbound::http::router::AppState;

pub async fn authenticate(
    State(state): State<AppState>,
    Json(body): Json<AuthenticateRequestBody>,
) -> Result<ApiSuccess<AuthenticateResponseData>, ApiError> {
    state
        .auth_service
        .authenticate(&body.username, &body.password, Utc::now())
        .await
        .map_err(|e| {
            match &e {
                AuthError::PrincipalNotFound(_) | AuthError::InvalidCredentials => {
                    tracing::info!(username = %body.username, error = %e, "Login rejected");
                }
                _ => tracing::error!(username = %body.username, error = %e, "Login failed"),
            }
            ApiError::from(e)
        })
        .map(|result| ApiSuccess::new(StatusCode::OK, result.into()))
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct AuthenticateRequestBody {
    username: String,
    password: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AuthenticateResponseData {
    pub user: PrincipalData,
    pub token: String,
}

impl From<LoginResult> for AuthenticateResponseData {
    fn from(result: LoginResult) -> Self {
        Self {
            user: (&result.principal).into(),
            token: result.token,
        }
    }
}
