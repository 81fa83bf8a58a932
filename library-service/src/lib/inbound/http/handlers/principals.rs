use std::collections::BTreeSet;

use axum::extract::Path;
use axum::extract::State;
use axum::http::StatusCode;
use axum::Extension;
use axum::Json;
use serde::Deserialize;
use serde::Serialize;
use thiserror::Error;

use super::ApiError;
use super::ApiSuccess;
use crate::auth::models::AuthenticatedIdentity;
use crate::auth::models::PublicPrincipal;
use crate::inbound::http::router::AppState;
use crate::principal::errors::PrincipalError;
use crate::principal::errors::RoleError;
use crate::principal::errors::UsernameError;
use crate::principal::models::CreatePrincipalCommand;
use crate::principal::models::Principal;
use crate::principal::models::PrincipalId;
use crate::principal::models::Role;
use crate::principal::models::UpdatePrincipalCommand;
use crate::principal::models::Username;

/// Public view of a principal. Carries no password hash.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PrincipalData {
    pub id: String,
    pub username: String,
    pub name: String,
    pub roles: Vec<String>,
}

impl From<&PublicPrincipal> for PrincipalData {
    fn from(principal: &PublicPrincipal) -> Self {
        Self {
            id: principal.id.to_string(),
            username: principal.username.as_str().to_string(),
            name: principal.name.clone(),
            roles: principal.roles.iter().map(|r| r.as_str().to_string()).collect(),
        }
    }
}

impl From<&Principal> for PrincipalData {
    fn from(principal: &Principal) -> Self {
        Self::from(&PublicPrincipal::from(principal))
    }
}

fn parse_principal_id(id: &str) -> Result<PrincipalId, ApiError> {
    PrincipalId::from_string(id).map_err(|e| ApiError::BadRequest(e.to_string()))
}

/// Self-registration body. Roles cannot be chosen here.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct RegisterRequest {
    username: String,
    name: String,
    password: String,
}

pub async fn register(
    State(state): State<AppState>,
    Json(body): Json<RegisterRequest>,
) -> Result<ApiSuccess<PrincipalData>, ApiError> {
    let username = Username::new(body.username).map_err(PrincipalError::from)?;

    state
        .principal_service
        .register(username, body.name, body.password)
        .await
        .map_err(ApiError::from)
        .map(|ref principal| ApiSuccess::new(StatusCode::CREATED, principal.into()))
}

pub async fn current_principal(
    State(state): State<AppState>,
    Extension(identity): Extension<AuthenticatedIdentity>,
) -> Result<ApiSuccess<PrincipalData>, ApiError> {
    state
        .principal_service
        .get_principal(&identity.principal_id)
        .await
        .map_err(ApiError::from)
        .map(|ref principal| ApiSuccess::new(StatusCode::OK, principal.into()))
}

pub async fn list_principals(
    State(state): State<AppState>,
) -> Result<ApiSuccess<Vec<PrincipalData>>, ApiError> {
    state
        .principal_service
        .list_principals()
        .await
        .map_err(ApiError::from)
        .map(|principals| {
            ApiSuccess::new(
                StatusCode::OK,
                principals.iter().map(PrincipalData::from).collect(),
            )
        })
}

pub async fn get_principal(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> Result<ApiSuccess<PrincipalData>, ApiError> {
    let principal_id = parse_principal_id(&user_id)?;

    state
        .principal_service
        .get_principal(&principal_id)
        .await
        .map_err(ApiError::from)
        .map(|ref principal| ApiSuccess::new(StatusCode::OK, principal.into()))
}

/// Administrative creation body with an explicit role set.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct CreatePrincipalRequest {
    username: String,
    name: String,
    password: String,
    roles: Vec<String>,
}

#[derive(Debug, Clone, Error)]
enum ParsePrincipalRequestError {
    #[error("Invalid username: {0}")]
    Username(#[from] UsernameError),

    #[error("Invalid role: {0}")]
    Role(#[from] RoleError),
}

impl From<ParsePrincipalRequestError> for ApiError {
    fn from(err: ParsePrincipalRequestError) -> Self {
        ApiError::UnprocessableEntity(err.to_string())
    }
}

fn parse_roles(roles: Vec<String>) -> Result<BTreeSet<Role>, RoleError> {
    roles.into_iter().map(Role::new).collect()
}

impl CreatePrincipalRequest {
    fn try_into_command(self) -> Result<CreatePrincipalCommand, ParsePrincipalRequestError> {
        let username = Username::new(self.username)?;
        let roles = parse_roles(self.roles)?;
        Ok(CreatePrincipalCommand::new(
            username,
            self.name,
            self.password,
            roles,
        ))
    }
}

pub async fn create_principal(
    State(state): State<AppState>,
    Json(body): Json<CreatePrincipalRequest>,
) -> Result<ApiSuccess<PrincipalData>, ApiError> {
    state
        .principal_service
        .create_principal(body.try_into_command()?)
        .await
        .map_err(ApiError::from)
        .map(|ref principal| ApiSuccess::new(StatusCode::CREATED, principal.into()))
}

#[derive(Debug, Deserialize)]
pub struct UpdatePrincipalRequest {
    pub username: Option<String>,
    pub name: Option<String>,
    pub password: Option<String>,
    pub roles: Option<Vec<String>>,
}

impl UpdatePrincipalRequest {
    fn try_into_command(self) -> Result<UpdatePrincipalCommand, ParsePrincipalRequestError> {
        Ok(UpdatePrincipalCommand {
            username: self.username.map(Username::new).transpose()?,
            name: self.name,
            password: self.password,
            roles: self.roles.map(parse_roles).transpose()?,
        })
    }
}

pub async fn update_principal(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
    Json(body): Json<UpdatePrincipalRequest>,
) -> Result<ApiSuccess<PrincipalData>, ApiError> {
    let principal_id = parse_principal_id(&user_id)?;
    let command = body.try_into_command()?;

    state
        .principal_service
        .update_principal(&principal_id, command)
        .await
        .map_err(ApiError::from)
        .map(|ref principal| ApiSuccess::new(StatusCode::OK, principal.into()))
}
