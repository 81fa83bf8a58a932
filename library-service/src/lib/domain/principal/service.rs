use std::collections::BTreeSet;
use std::sync::Arc;

use async_trait::async_trait;
use auth::Authenticator;
use chrono::Utc;

use crate::principal::errors::PrincipalError;
use crate::principal::models::CreatePrincipalCommand;
use crate::principal::models::Principal;
use crate::principal::models::PrincipalId;
use crate::principal::models::Role;
use crate::principal::models::UpdatePrincipalCommand;
use crate::principal::models::Username;
use crate::principal::ports::PrincipalRepository;
use crate::principal::ports::PrincipalServicePort;

/// Domain service implementation for principal registration and administration.
pub struct PrincipalService<PR>
where
    PR: PrincipalRepository,
{
    repository: Arc<PR>,
    authenticator: Arc<Authenticator>,
}

impl<PR> PrincipalService<PR>
where
    PR: PrincipalRepository,
{
    /// Passwords are hashed with the same authenticator that later verifies them.
    pub fn new(repository: Arc<PR>, authenticator: Arc<Authenticator>) -> Self {
        Self {
            repository,
            authenticator,
        }
    }

    fn validated_name(name: String) -> Result<String, PrincipalError> {
        let trimmed = name.trim();
        if trimmed.is_empty() {
            return Err(PrincipalError::InvalidName(
                "name must not be empty".to_string(),
            ));
        }
        Ok(trimmed.to_string())
    }
}

#[async_trait]
impl<PR> PrincipalServicePort for PrincipalService<PR>
where
    PR: PrincipalRepository,
{
    async fn register(
        &self,
        username: Username,
        name: String,
        password: String,
    ) -> Result<Principal, PrincipalError> {
        let command =
            CreatePrincipalCommand::new(username, name, password, BTreeSet::from([Role::user()]));
        self.create_principal(command).await
    }

    async fn create_principal(
        &self,
        command: CreatePrincipalCommand,
    ) -> Result<Principal, PrincipalError> {
        let name = Self::validated_name(command.name)?;
        let password_hash = self.authenticator.hash_password(&command.password)?;

        let principal = Principal {
            id: PrincipalId::new(),
            username: command.username,
            name,
            password_hash,
            roles: command.roles,
            created_at: Utc::now(),
        };

        let created = self.repository.create(principal).await?;
        tracing::info!(
            principal_id = %created.id,
            username = %created.username,
            roles = ?created.roles,
            "Principal created"
        );

        Ok(created)
    }

    async fn get_principal(&self, id: &PrincipalId) -> Result<Principal, PrincipalError> {
        self.repository
            .find_by_id(id)
            .await?
            .ok_or(PrincipalError::NotFound(id.to_string()))
    }

    async fn list_principals(&self) -> Result<Vec<Principal>, PrincipalError> {
        self.repository.list_all().await
    }

    async fn update_principal(
        &self,
        id: &PrincipalId,
        command: UpdatePrincipalCommand,
    ) -> Result<Principal, PrincipalError> {
        let mut principal = self
            .repository
            .find_by_id(id)
            .await?
            .ok_or(PrincipalError::NotFound(id.to_string()))?;

        if let Some(username) = command.username {
            principal.username = username;
        }

        if let Some(name) = command.name {
            principal.name = Self::validated_name(name)?;
        }

        if let Some(password) = command.password {
            principal.password_hash = self.authenticator.hash_password(&password)?;
        }

        if let Some(roles) = command.roles {
            principal.roles = roles;
        }

        self.repository.update(principal).await
    }
}
