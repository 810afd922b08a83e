//! JWT 클레임
//!
//! HS256으로 서명되는 액세스 토큰 페이로드입니다. `sub`는 사용자 ObjectId(hex)입니다.

use serde::{Deserialize, Serialize};

use crate::domain::entities::users::UserRole;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TokenClaims {
    pub sub: String,
    pub role: UserRole,
    pub iat: i64,
    pub exp: i64,
}
