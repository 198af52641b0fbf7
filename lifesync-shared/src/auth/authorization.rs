/// Permission checks for account management
///
/// Household data is shared by the whole family, so entity routes only need
/// the family scope. Managing other accounts is narrower:
///
/// 1. **Provisioning**: only owners create member accounts
/// 2. **Editing**: the target must belong to the caller's family, either by
///    stored family id or by being the family owner itself
/// 3. **Deleting / resetting passwords**: the target's stored family id must
///    equal the caller's family, and owner accounts can never be deleted
/// 4. **Changing another account**: only the owner may edit or reset a member,
///    and nobody but the owner may touch the owner account
///
/// All checks are pure; callers load the target account first.
///
/// # Example
///
/// ```no_run
/// use lifesync_shared::auth::authorization::{require_family_member, require_deletable};
/// use lifesync_shared::auth::middleware::AuthContext;
/// use lifesync_shared::models::user::User;
///
/// fn check(auth: &AuthContext, target: &User) -> Result<(), Box<dyn std::error::Error>> {
///     require_family_member(auth, target)?;
///     require_deletable(target)?;
///     Ok(())
/// }
/// ```

use super::middleware::AuthContext;
use crate::models::user::User;

/// Error type for authorization checks
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AuthzError {
    /// Caller is not the household owner
    #[error("Only family owners can manage family member accounts")]
    NotOwner,

    /// Target account belongs to another family
    #[error("Not authorized to manage this account")]
    NotInFamily,

    /// Owner accounts cannot be removed
    #[error("Cannot delete family owner account")]
    OwnerNotDeletable,

    /// Only the owner may change the owner account
    #[error("Cannot modify family owner account")]
    OwnerProtected,
}

/// Requires the caller to be a household owner
pub fn require_owner(auth: &AuthContext) -> Result<(), AuthzError> {
    if auth.is_owner() {
        Ok(())
    } else {
        Err(AuthzError::NotOwner)
    }
}

/// Requires the target to be in the caller's family or to be the family owner
pub fn require_same_family(auth: &AuthContext, target: &User) -> Result<(), AuthzError> {
    if target.family_id == Some(auth.family_id) || target.id == auth.family_id {
        Ok(())
    } else {
        Err(AuthzError::NotInFamily)
    }
}

/// Requires the target's stored family id to equal the caller's family
pub fn require_family_member(auth: &AuthContext, target: &User) -> Result<(), AuthzError> {
    if target.family_id == Some(auth.family_id) {
        Ok(())
    } else {
        Err(AuthzError::NotInFamily)
    }
}

/// Requires the caller to be the target itself or an owner acting on a member
///
/// Run after the family check; this only decides who inside the family may
/// change the account.
pub fn require_account_manager(auth: &AuthContext, target: &User) -> Result<(), AuthzError> {
    if target.id == auth.user_id {
        return Ok(());
    }
    if target.is_owner() {
        return Err(AuthzError::OwnerProtected);
    }
    require_owner(auth)
}

/// Rejects deletion of owner accounts
pub fn require_deletable(target: &User) -> Result<(), AuthzError> {
    if target.is_owner() {
        Err(AuthzError::OwnerNotDeletable)
    } else {
        Ok(())
    }
}
