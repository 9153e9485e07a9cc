use crate::db::models::user_models::{User, UserRole};
use crate::error::Error;

pub mod auth;

/// Check the role hierarchy: the caller's role must rank at or above
/// the action's required level.
pub fn has_required_role(role: UserRole, required: UserRole) -> bool {
    role.rank() >= required.rank()
}

/// Role gate for review/approval actions. Enforced at the service
/// boundary; hiding the button client-side is not a security control.
pub fn require_role(user: &User, required: UserRole) -> Result<(), Error> {
    if has_required_role(user.role, required) {
        Ok(())
    } else {
        Err(Error::Authorization(format!(
            "Role {} required, user {} is {}",
            required, user.user_id, user.role
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn role_ranking_is_operator_supervisor_manager() {
        assert!(has_required_role(UserRole::Manager, UserRole::Supervisor));
        assert!(has_required_role(UserRole::Supervisor, UserRole::Supervisor));
        assert!(!has_required_role(UserRole::Operator, UserRole::Supervisor));
        assert!(!has_required_role(UserRole::Supervisor, UserRole::Manager));
        assert!(has_required_role(UserRole::Manager, UserRole::Manager));
    }
}
