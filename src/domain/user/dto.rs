use uuid::Uuid;

use crate::domain::{DomainError, DomainResult};
use crate::shared::PaginationParams;

#[derive(Debug, Clone)]
pub struct CreateUserDto {
    pub email: String,
    pub password_hash: String,
    pub full_name: String,
}

/// Optional filters for listing users. `None` places no constraint on the
/// column.
#[derive(Debug, Clone, Default)]
pub struct UserFilter {
    pub full_name: Option<String>,
    pub email: Option<String>,
    pub user_role: Option<String>,
}

#[derive(Debug, Clone)]
pub struct GetUsersDto {
    pub filter: UserFilter,
    pub pagination: PaginationParams,
}

impl GetUsersDto {
    pub fn validate(&self) -> DomainResult<()> {
        if self.pagination.page == 0 {
            return Err(DomainError::InvalidInput("page must be at least 1".into()));
        }
        if self.pagination.limit == 0 {
            return Err(DomainError::InvalidInput("limit must be at least 1".into()));
        }
        Ok(())
    }
}

/// Partial update of a user. Absent fields are left untouched.
#[derive(Debug, Clone, Default)]
pub struct UpdateUserDto {
    pub full_name: Option<String>,
    pub email: Option<String>,
    pub password_hash: Option<String>,
}

#[derive(Debug, Clone)]
pub struct ChangePasswordDto {
    pub user_id: Uuid,
    pub current_password: String,
    pub new_password_hash: String,
}

#[derive(Debug, Clone)]
pub struct ChangeUserRoleDto {
    pub user_id: Uuid,
    pub new_user_role: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dto(page: u32, limit: u32) -> GetUsersDto {
        GetUsersDto {
            filter: UserFilter::default(),
            pagination: PaginationParams::new(page, limit),
        }
    }

    #[test]
    fn zero_page_or_limit_is_invalid_input() {
        assert!(matches!(dto(0, 10).validate(), Err(DomainError::InvalidInput(_))));
        assert!(matches!(dto(1, 0).validate(), Err(DomainError::InvalidInput(_))));
        assert!(dto(1, 1).validate().is_ok());
    }
}
