//! 인증 요청 DTO

use serde::Deserialize;
use validator::Validate;

use crate::utils::string_utils::{deserialize_email, deserialize_sanitized_string};

#[derive(Debug, Deserialize, Validate)]
pub struct RegisterRequest {
    #[serde(deserialize_with = "deserialize_sanitized_string")]
    #[validate(length(min = 1, max = 50, message = "이름은 1-50자 사이여야 합니다"))]
    pub name: String,

    #[serde(deserialize_with = "deserialize_email")]
    #[validate(email(message = "유효한 이메일 주소를 입력해주세요"))]
    pub email: String,

    #[validate(length(min = 6, message = "비밀번호는 최소 6자 이상이어야 합니다"))]
    pub password: String,
}

#[derive(Debug, Deserialize, Validate)]
pub struct LocalLoginRequest {
    #[serde(deserialize_with = "deserialize_email")]
    #[validate(email(message = "유효한 이메일 주소를 입력해주세요"))]
    pub email: String,

    #[validate(length(min = 1, message = "비밀번호를 입력해주세요"))]
    pub password: String,
}

#[derive(Debug, Deserialize, Validate)]
pub struct ForgotPasswordRequest {
    #[serde(deserialize_with = "deserialize_email")]
    #[validate(email(message = "유효한 이메일 주소를 입력해주세요"))]
    pub email: String,
}

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ResetPasswordRequest {
    #[validate(length(min = 1, message = "재설정 토큰이 필요합니다"))]
    pub token: String,

    #[validate(length(min = 6, message = "비밀번호는 최소 6자 이상이어야 합니다"))]
    pub new_password: String,
}
