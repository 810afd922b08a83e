//! 사용자 응답 DTO (비밀번호 해시 제외)

use serde::Serialize;

use crate::domain::entities::users::{User, UserRole};

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserResponse {
    pub id: String,
    pub name: String,
    pub email: String,
    pub role: UserRole,
    pub is_email_verified: bool,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        let User { id, name, email, role, is_email_verified, .. } = user;

        Self {
            id: id.map(|id| id.to_hex()).unwrap_or_default(),
            name,
            email,
            role,
            is_email_verified,
        }
    }
}

/// 회원가입/로그인 응답 본문
#[derive(Debug, Clone, Serialize)]
pub struct AuthResponse {
    pub success: bool,
    pub token: String,
    pub user: UserResponse,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_password_hash_is_not_exposed() {
        let user = User::new_local("Han".to_string(), "han@example.com".to_string(), "$2b$hash".to_string());
        let json = serde_json::to_string(&UserResponse::from(user)).unwrap();

        assert!(!json.contains("hash"));
        assert!(json.contains("\"role\":\"user\""));
    }
}
