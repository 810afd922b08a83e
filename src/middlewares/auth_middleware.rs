//! JWT 인증 미들웨어
//!
//! ActixWeb 요청 파이프라인에서 JWT 토큰을 검증하고 사용자 정보를 추출합니다.
//! 토큰은 `Authorization: Bearer` 헤더 또는 `token` 쿠키에서 읽습니다.

use std::future::{ready, Ready};
use std::rc::Rc;

use actix_web::{
    dev::{Service, ServiceRequest, ServiceResponse, Transform},
    Error, Result,
    body::EitherBody,
};
use crate::domain::entities::users::UserRole;
use crate::domain::models::auth::{AuthMode, RequiredRole};
use crate::middlewares::auth_inner::AuthMiddlewareService;

/// JWT 인증 미들웨어
pub struct AuthMiddleware {
    /// 인증 모드 (Required/Optional)
    mode: AuthMode,
    /// 접근에 필요한 역할 (선택사항)
    required_role: Option<RequiredRole>,
}

impl AuthMiddleware {
    pub fn new(mode: AuthMode) -> Self {
        Self {
            mode,
            required_role: None,
        }
    }

    pub fn new_with_role(mode: AuthMode, required_role: RequiredRole) -> Self {
        Self {
            mode,
            required_role: Some(required_role),
        }
    }

    /// 필수 인증 (역할 무관)
    pub fn required() -> Self {
        Self::new(AuthMode::Required)
    }

    /// 선택적 인증
    pub fn optional() -> Self {
        Self::new(AuthMode::Optional)
    }

    /// 특정 역할 요구
    pub fn required_with_role(role: UserRole) -> Self {
        Self::new_with_role(AuthMode::Required, RequiredRole::Single(role))
    }

    /// 복수 역할 중 하나 요구
    pub fn required_with_roles(roles: Vec<UserRole>) -> Self {
        Self::new_with_role(AuthMode::Required, RequiredRole::Any(roles))
    }

    /// 관리자 전용
    pub fn admin_only() -> Self {
        Self::required_with_role(UserRole::Admin)
    }
}

/// ActixWeb Transform trait 구현
impl<S, B> Transform<S, ServiceRequest> for AuthMiddleware
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Transform = AuthMiddlewareService<S>;
    type InitError = ();
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(AuthMiddlewareService {
            service: Rc::new(service),
            mode: self.mode.clone(),
            required_role: self.required_role.clone(),
        }))
    }
}


#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::cookie::Cookie;
    use actix_web::http::StatusCode;
    use actix_web::{test, web, App, HttpResponse};
    use mongodb::bson::oid::ObjectId;

    use crate::domain::entities::users::User;
    use crate::domain::models::auth::{AuthenticatedUser, OptionalUser};
    use crate::services::auth::{TokenService, AUTH_COOKIE_NAME};

    fn token_for(role: UserRole) -> String {
        let mut user = User::new_local("Han".to_string(), "han@example.com".to_string(), "hash".to_string());
        user.id = Some(ObjectId::new());
        user.role = role;
        TokenService::instance().generate_access_token(&user).unwrap()
    }

    async fn whoami(user: AuthenticatedUser) -> HttpResponse {
        HttpResponse::Ok().body(user.user_id)
    }

    async fn maybe(user: OptionalUser) -> HttpResponse {
        HttpResponse::Ok().body(if user.0.is_some() { "user" } else { "anonymous" })
    }

    #[actix_web::test]
    async fn test_required_rejects_missing_token() {
        let app = test::init_service(
            App::new().service(web::scope("/api").wrap(AuthMiddleware::required()).route("/me", web::get().to(whoami))),
        )
        .await;

        let res = test::call_service(&app, test::TestRequest::get().uri("/api/me").to_request()).await;
        assert_eq!(res.status(), StatusCode::UNAUTHORIZED);

        let body: serde_json::Value = test::read_body_json(res).await;
        assert_eq!(body["success"], false);
    }

    #[actix_web::test]
    async fn test_bearer_header_and_cookie_are_accepted() {
        let app = test::init_service(
            App::new().service(web::scope("/api").wrap(AuthMiddleware::required()).route("/me", web::get().to(whoami))),
        )
        .await;
        let token = token_for(UserRole::User);

        let by_header = test::TestRequest::get()
            .uri("/api/me")
            .insert_header(("Authorization", format!("Bearer {}", token)))
            .to_request();
        assert_eq!(test::call_service(&app, by_header).await.status(), StatusCode::OK);

        let by_cookie = test::TestRequest::get()
            .uri("/api/me")
            .cookie(Cookie::new(AUTH_COOKIE_NAME, token))
            .to_request();
        assert_eq!(test::call_service(&app, by_cookie).await.status(), StatusCode::OK);
    }

    #[actix_web::test]
    async fn test_admin_scope_forbids_regular_users() {
        let app = test::init_service(
            App::new().service(web::scope("/admin").wrap(AuthMiddleware::admin_only()).route("", web::get().to(whoami))),
        )
        .await;

        let user_req = test::TestRequest::get()
            .uri("/admin")
            .insert_header(("Authorization", format!("Bearer {}", token_for(UserRole::User))))
            .to_request();
        assert_eq!(test::call_service(&app, user_req).await.status(), StatusCode::FORBIDDEN);

        let admin_req = test::TestRequest::get()
            .uri("/admin")
            .insert_header(("Authorization", format!("Bearer {}", token_for(UserRole::Admin))))
            .to_request();
        assert_eq!(test::call_service(&app, admin_req).await.status(), StatusCode::OK);
    }

    #[actix_web::test]
    async fn test_optional_mode_passes_anonymous_requests() {
        let app = test::init_service(
            App::new().service(web::scope("/trips").wrap(AuthMiddleware::optional()).route("", web::get().to(maybe))),
        )
        .await;

        let anonymous = test::call_service(&app, test::TestRequest::get().uri("/trips").to_request()).await;
        assert_eq!(test::read_body(anonymous).await, "anonymous");

        let garbage = test::TestRequest::get()
            .uri("/trips")
            .insert_header(("Authorization", "Bearer not-a-jwt"))
            .to_request();
        assert_eq!(test::read_body(test::call_service(&app, garbage).await).await, "anonymous");

        let signed_in = test::TestRequest::get()
            .uri("/trips")
            .insert_header(("Authorization", format!("Bearer {}", token_for(UserRole::User))))
            .to_request();
        assert_eq!(test::read_body(test::call_service(&app, signed_in).await).await, "user");
    }
}
