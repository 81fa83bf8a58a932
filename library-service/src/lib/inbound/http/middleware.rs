use std::collections::BTreeSet;
use std::sync::Arc;

use axum::extract::Request;
use axum::extract::State;
use axum::http::header;
use axum::http::HeaderMap;
use axum::middleware::Next;
use axum::response::Response;
use chrono::Utc;

use crate::auth::errors::AuthError;
use crate::auth::models::AuthenticatedIdentity;
use crate::auth::ports::AuthenticationServicePort;
use crate::inbound::http::handlers::ApiError;
use crate::principal::models::Role;

const BEARER_PREFIX: &str = "Bearer ";

/// Resolves the bearer token of a request into an [`AuthenticatedIdentity`]
/// stored in the request extensions.
///
/// Never rejects a request. Missing headers, foreign schemes and every
/// token failure leave the request anonymous; gated routes turn that into
/// a rejection through [`authorize`].
pub async fn authenticate(
    State(auth_service): State<Arc<dyn AuthenticationServicePort>>,
    mut req: Request,
    next: Next,
) -> Response {
    // Only this layer may put an identity on the request.
    req.extensions_mut().remove::<AuthenticatedIdentity>();

    if let Some(token) = extract_bearer_token(req.headers()) {
        match auth_service.resolve_identity(&token, Utc::now()).await {
            Ok(identity) => {
                tracing::debug!(
                    principal_id = %identity.principal_id,
                    username = %identity.username,
                    "Request authenticated"
                );
                req.extensions_mut().insert(identity);
            }
            Err(AuthError::StoreUnavailable(reason)) => {
                tracing::warn!(
                    error = %reason,
                    "Principal store unavailable, continuing unauthenticated"
                );
            }
            Err(e) => {
                tracing::debug!(error = %e, "Bearer token rejected, continuing unauthenticated");
            }
        }
    }

    next.run(req).await
}

fn extract_bearer_token(headers: &HeaderMap) -> Option<String> {
    let value = headers.get(header::AUTHORIZATION)?.to_str().ok()?;
    let token = value.strip_prefix(BEARER_PREFIX)?.trim();

    if token.is_empty() {
        None
    } else {
        Some(token.to_string())
    }
}

/// Role requirement attached to a group of routes.
///
/// An empty gate only requires that some identity was resolved.
#[derive(Debug, Clone, Default)]
pub struct AuthorizationGate {
    allowed: BTreeSet<Role>,
}

impl AuthorizationGate {
    pub fn require(role: Role) -> Self {
        Self::require_any([role])
    }

    pub fn require_any(roles: impl IntoIterator<Item = Role>) -> Self {
        Self {
            allowed: roles.into_iter().collect(),
        }
    }

    /// Decide whether `identity` may pass.
    ///
    /// # Errors
    /// * `Unauthorized` - No identity was resolved for the request
    /// * `Forbidden` - Identity holds none of the allowed roles
    pub fn check(&self, identity: Option<&AuthenticatedIdentity>) -> Result<(), AuthError> {
        let identity = identity.ok_or(AuthError::Unauthorized)?;

        if self.allowed.is_empty()
            || self
                .allowed
                .iter()
                .any(|role| identity.has_authority(&role.authority()))
        {
            Ok(())
        } else {
            Err(AuthError::Forbidden)
        }
    }
}

pub async fn authorize(
    State(gate): State<AuthorizationGate>,
    req: Request,
    next: Next,
) -> Result<Response, ApiError> {
    if let Err(e) = gate.check(req.extensions().get::<AuthenticatedIdentity>()) {
        tracing::debug!(
            method = %req.method(),
            uri = %req.uri(),
            error = %e,
            "Request rejected by authorization gate"
        );
        return Err(e.into());
    }

    Ok(next.run(req).await)
}
