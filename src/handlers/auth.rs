//! Authentication HTTP Handlers
//!
//! 이메일/비밀번호 계정과 HS256 JWT 액세스 토큰을 다룹니다.
//! 토큰은 응답 본문과 httpOnly `token` 쿠키로 함께 내려갑니다.
//!
//! 엔드포인트마다 요청 제한 정책이 다르므로 라우트 매크로 대신
//! `web::resource` 단위로 등록합니다. ([`crate::routes`])
//!
//! - `POST /api/auth/register` - 회원가입 (201)
//! - `POST /api/auth/login` - 로그인
//! - `POST /api/auth/logout` - 쿠키 삭제
//! - `GET /api/auth/me` - 현재 사용자
//! - `POST /api/auth/forgot-password` - 재설정 메일 요청
//! - `POST /api/auth/reset-password` - 재설정 토큰 사용
use actix_web::cookie::{time::Duration as CookieDuration, Cookie, SameSite};
use actix_web::{web, HttpResponse};
use serde_json::json;
use validator::Validate;
use crate::{
    config::{Environment, JwtConfig},
    core::errors::AppError,
    domain::dto::users::{
        AuthResponse, ForgotPasswordRequest, LocalLoginRequest, RegisterRequest, ResetPasswordRequest,
        UserResponse,
    },
    domain::entities::users::User,
    domain::models::auth::AuthenticatedUser,
    services::{
        auth::{TokenService, AUTH_COOKIE_NAME},
        users::UserService,
    },
};

fn auth_cookie(token: &str) -> Cookie<'static> {
    Cookie::build(AUTH_COOKIE_NAME, token.to_string())
        .path("/")
        .http_only(true)
        .secure(Environment::current().is_production())
        .same_site(SameSite::Strict)
        .max_age(CookieDuration::hours(JwtConfig::expiration_hours()))
        .finish()
}

/// 토큰 발급 후 `{success, token, user}` 응답과 쿠키 생성
fn token_response(user: User, status: actix_web::http::StatusCode) -> Result<HttpResponse, AppError> {
    let token = TokenService::instance().generate_access_token(&user)?;
    let cookie = auth_cookie(&token);

    Ok(HttpResponse::build(status).cookie(cookie).json(AuthResponse {
        success: true,
        token,
        user: UserResponse::from(user),
    }))
}

/// 회원가입
///
/// 이메일이 이미 있으면 409를 반환합니다.
pub async fn register(payload: web::Json<RegisterRequest>) -> Result<HttpResponse, AppError> {
    payload.validate()
        .map_err(|e| AppError::ValidationError(e.to_string()))?;

    let user = UserService::instance().register(payload.into_inner()).await?;

    token_response(user, actix_web::http::StatusCode::CREATED)
}

/// 로컬 로그인
pub async fn login(payload: web::Json<LocalLoginRequest>) -> Result<HttpResponse, AppError> {
    payload.validate()
        .map_err(|e| AppError::ValidationError(e.to_string()))?;

    let user = UserService::instance()
        .verify_password(&payload.email, &payload.password)
        .await?;

    log::info!("🔐 로그인 성공: {}", user.email);
    token_response(user, actix_web::http::StatusCode::OK)
}

pub async fn logout(user: AuthenticatedUser) -> HttpResponse {
    log::info!("로그아웃: 사용자 ID {}", user.user_id);

    let mut expired = auth_cookie("");
    expired.make_removal();

    HttpResponse::Ok().cookie(expired).json(json!({
        "success": true,
        "message": "Logged out successfully"
    }))
}

pub async fn get_current_user(user: AuthenticatedUser) -> Result<HttpResponse, AppError> {
    let profile = UserService::instance().get_user_by_id(&user.user_id).await?;

    Ok(HttpResponse::Ok().json(json!({
        "success": true,
        "data": profile
    })))
}

/// 비밀번호 재설정 요청
///
/// 계정 존재 여부를 노출하지 않도록 항상 같은 응답을 돌려줍니다.
pub async fn forgot_password(payload: web::Json<ForgotPasswordRequest>) -> Result<HttpResponse, AppError> {
    payload.validate()
        .map_err(|e| AppError::ValidationError(e.to_string()))?;

    UserService::instance().forgot_password(&payload.email).await?;

    Ok(HttpResponse::Ok().json(json!({
        "success": true,
        "message": "Password reset email sent"
    })))
}

pub async fn reset_password(payload: web::Json<ResetPasswordRequest>) -> Result<HttpResponse, AppError> {
    payload.validate()
        .map_err(|e| AppError::ValidationError(e.to_string()))?;

    let user = UserService::instance()
        .reset_password(&payload.token, &payload.new_password)
        .await?;

    Ok(HttpResponse::Ok().json(json!({
        "success": true,
        "message": "Password reset successfully",
        "data": UserResponse::from(user)
    })))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_auth_cookie_attributes() {
        let cookie = auth_cookie("jwt");

        assert_eq!(cookie.name(), AUTH_COOKIE_NAME);
        assert_eq!(cookie.http_only(), Some(true));
        assert_eq!(cookie.same_site(), Some(SameSite::Strict));
        assert_eq!(cookie.path(), Some("/"));
    }
}
