//! 인증 미들웨어 동작 모드

use crate::domain::entities::users::UserRole;

#[derive(Debug, Clone, PartialEq)]
pub enum AuthMode {
    /// 토큰이 없거나 유효하지 않으면 401
    Required,
    /// 토큰이 있으면 사용자 정보를 주입하고, 없으면 그대로 통과
    Optional,
}

#[derive(Debug, Clone)]
pub enum RequiredRole {
    Single(UserRole),
    Any(Vec<UserRole>),
}

impl RequiredRole {
    pub fn is_satisfied(&self, role: UserRole) -> bool {
        match self {
            RequiredRole::Single(required) => *required == role,
            RequiredRole::Any(required) => required.contains(&role),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_required_role() {
        assert!(RequiredRole::Single(UserRole::Admin).is_satisfied(UserRole::Admin));
        assert!(!RequiredRole::Single(UserRole::Admin).is_satisfied(UserRole::User));
        assert!(RequiredRole::Any(vec![UserRole::User, UserRole::Admin]).is_satisfied(UserRole::User));
    }
}
