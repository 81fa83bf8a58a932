use std::collections::BTreeSet;

use crate::config::BootstrapConfig;
use crate::principal::errors::PrincipalError;
use crate::principal::models::CreatePrincipalCommand;
use crate::principal::models::Principal;
use crate::principal::models::Role;
use crate::principal::models::Username;
use crate::principal::ports::PrincipalServicePort;

/// Create the configured administrator unless the username is already taken.
///
/// Returns the new principal, or `None` when the account already existed.
/// An existing account is left untouched, including its password and roles.
///
/// # Errors
/// * `InvalidUsername` - Configured username fails validation
/// * `DatabaseError` - Database operation failed
pub async fn ensure_admin(
    principals: &dyn PrincipalServicePort,
    config: &BootstrapConfig,
) -> Result<Option<Principal>, PrincipalError> {
    let username = Username::new(config.admin_username.clone())?;
    let command = CreatePrincipalCommand::new(
        username,
        config.admin_name.clone(),
        config.admin_password.clone(),
        BTreeSet::from([Role::admin()]),
    );

    match principals.create_principal(command).await {
        Ok(principal) => {
            tracing::info!(
                principal_id = %principal.id,
                username = %principal.username,
                "Bootstrap administrator created"
            );
            Ok(Some(principal))
        }
        Err(PrincipalError::UsernameAlreadyExists(username)) => {
            tracing::debug!(%username, "Bootstrap administrator already present");
            Ok(None)
        }
        Err(e) => Err(e),
    }
}
