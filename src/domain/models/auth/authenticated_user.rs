//! 인증된 사용자 컨텍스트
//!
//! 인증 미들웨어가 요청 extensions에 넣어두고, 핸들러는 추출자로 꺼내 씁니다.

use std::future::{ready, Ready};

use actix_web::{FromRequest, HttpMessage, HttpRequest};
use serde::{Deserialize, Serialize};

use crate::core::errors::AppError;
use crate::domain::entities::users::UserRole;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthenticatedUser {
    pub user_id: String,
    pub role: UserRole,
}

impl AuthenticatedUser {
    pub fn is_admin(&self) -> bool {
        matches!(self.role, UserRole::Admin)
    }

    /// 리소스 소유자이거나 관리자인지
    pub fn can_access(&self, owner_id: &str) -> bool {
        self.is_admin() || self.user_id == owner_id
    }
}

impl FromRequest for AuthenticatedUser {
    type Error = AppError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut actix_web::dev::Payload) -> Self::Future {
        match req.extensions().get::<AuthenticatedUser>() {
            Some(user) => ready(Ok(user.clone())),
            None => ready(Err(AppError::AuthenticationError("인증되지 않은 요청입니다".to_string()))),
        }
    }
}

/// 관리자만 통과하는 추출자
///
/// 같은 경로에 일반 사용자용 메서드와 관리자용 메서드가 섞여 있을 때 핸들러 단위로 권한을 겁니다.
#[derive(Debug, Clone)]
pub struct AdminUser(pub AuthenticatedUser);

impl FromRequest for AdminUser {
    type Error = AppError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut actix_web::dev::Payload) -> Self::Future {
        let result = match req.extensions().get::<AuthenticatedUser>() {
            Some(user) if user.is_admin() => Ok(AdminUser(user.clone())),
            Some(user) => {
                log::warn!("⚠️ 관리자 전용 요청 거부: 사용자 ID {}", user.user_id);
                Err(AppError::AuthorizationError("접근 권한이 부족합니다".to_string()))
            }
            None => Err(AppError::AuthenticationError("인증되지 않은 요청입니다".to_string())),
        };
        ready(result)
    }
}

#[derive(Debug, Clone)]
pub struct OptionalUser(pub Option<AuthenticatedUser>);

impl FromRequest for OptionalUser {
    type Error = AppError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut actix_web::dev::Payload) -> Self::Future {
        let user = req.extensions().get::<AuthenticatedUser>().cloned();
        ready(Ok(OptionalUser(user)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_owner_or_admin_access() {
        let owner = AuthenticatedUser { user_id: "u1".to_string(), role: UserRole::User };
        let admin = AuthenticatedUser { user_id: "a1".to_string(), role: UserRole::Admin };

        assert!(owner.can_access("u1"));
        assert!(!owner.can_access("u2"));
        assert!(admin.can_access("u2"));
    }

    #[actix_web::test]
    async fn test_admin_extractor() {
        use actix_web::test::TestRequest;

        let req = TestRequest::default().to_http_request();
        req.extensions_mut().insert(AuthenticatedUser { user_id: "u1".to_string(), role: UserRole::User });
        let denied = AdminUser::extract(&req).await;
        assert!(matches!(denied, Err(AppError::AuthorizationError(_))));

        let req = TestRequest::default().to_http_request();
        req.extensions_mut().insert(AuthenticatedUser { user_id: "a1".to_string(), role: UserRole::Admin });
        assert!(AdminUser::extract(&req).await.is_ok());

        let anonymous = TestRequest::default().to_http_request();
        assert!(matches!(AdminUser::extract(&anonymous).await, Err(AppError::AuthenticationError(_))));
    }
}
