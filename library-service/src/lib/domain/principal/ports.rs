use async_trait::async_trait;

use crate::principal::errors::PrincipalError;
use crate::principal::models::CreatePrincipalCommand;
use crate::principal::models::Principal;
use crate::principal::models::PrincipalId;
use crate::principal::models::UpdatePrincipalCommand;
use crate::principal::models::Username;

/// Port for principal domain service operations.
#[async_trait]
pub trait PrincipalServicePort: Send + Sync + 'static {
    /// Self-register a new principal with the default `User` role.
    ///
    /// # Errors
    /// * `UsernameAlreadyExists` - Username is already taken
    /// * `DatabaseError` - Database operation failed
    async fn register(
        &self,
        username: Username,
        name: String,
        password: String,
    ) -> Result<Principal, PrincipalError>;

    /// Create a principal with explicit roles (administrative).
    ///
    /// # Errors
    /// * `UsernameAlreadyExists` - Username is already taken
    /// * `DatabaseError` - Database operation failed
    async fn create_principal(
        &self,
        command: CreatePrincipalCommand,
    ) -> Result<Principal, PrincipalError>;

    /// Retrieve principal by unique identifier.
    ///
    /// # Errors
    /// * `NotFound` - Principal does not exist
    /// * `DatabaseError` - Database operation failed
    async fn get_principal(&self, id: &PrincipalId) -> Result<Principal, PrincipalError>;

    /// Retrieve all principals.
    async fn list_principals(&self) -> Result<Vec<Principal>, PrincipalError>;

    /// Update existing principal with optional fields.
    ///
    /// # Errors
    /// * `NotFound` - Principal does not exist
    /// * `UsernameAlreadyExists` - New username is already taken
    /// * `DatabaseError` - Database operation failed
    async fn update_principal(
        &self,
        id: &PrincipalId,
        command: UpdatePrincipalCommand,
    ) -> Result<Principal, PrincipalError>;
}

/// Read access to stored principals, as needed by authentication.
///
/// Implementations must be safe to call concurrently from many requests.
#[async_trait]
pub trait PrincipalStore: Send + Sync + 'static {
    /// Retrieve principal by username.
    ///
    /// # Returns
    /// Optional principal (None if not found)
    ///
    /// # Errors
    /// * `DatabaseError` - Database operation failed
    async fn find_by_username(&self, username: &Username)
        -> Result<Option<Principal>, PrincipalError>;

    /// Retrieve principal by identifier.
    ///
    /// # Returns
    /// Optional principal (None if not found)
    ///
    /// # Errors
    /// * `DatabaseError` - Database operation failed
    async fn find_by_id(&self, id: &PrincipalId) -> Result<Option<Principal>, PrincipalError>;
}

/// Persistence operations for the principal aggregate.
#[async_trait]
pub trait PrincipalRepository: PrincipalStore {
    /// Persist new principal together with its roles.
    ///
    /// # Errors
    /// * `UsernameAlreadyExists` - Username is already taken
    /// * `DatabaseError` - Database operation failed
    async fn create(&self, principal: Principal) -> Result<Principal, PrincipalError>;

    /// Retrieve all principals from storage.
    async fn list_all(&self) -> Result<Vec<Principal>, PrincipalError>;

    /// Replace a stored principal (fields and role set).
    ///
    /// # Errors
    /// * `NotFound` - Principal does not exist
    /// * `UsernameAlreadyExists` - New username is already taken
    /// * `DatabaseError` - Database operation failed
    async fn update(&self, principal: Principal) -> Result<Principal, PrincipalError>;
}
