use crate::{
    errors::{AppError, AppResult},
    models::domain::User,
};

pub fn require_admin(user: &User) -> AppResult<()> {
    if !user.is_admin() {
        return Err(AppError::Forbidden(
            "Only admins can perform this action".to_string(),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::domain::UserRole;

    #[test]
    fn test_require_admin_success() {
        let user = User::test_user("admin", UserRole::Admin);
        assert!(require_admin(&user).is_ok());
    }

    #[test]
    fn test_require_admin_failure_is_forbidden() {
        let user = User::test_user("user", UserRole::User);
        assert!(matches!(require_admin(&user), Err(AppError::Forbidden(_))));
    }
}
