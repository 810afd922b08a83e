//! AuthMiddleware 인증 로직의 핵심적인 기능
use std::rc::Rc;
use actix_web::body::EitherBody;
use actix_web::dev::{forward_ready, Service, ServiceRequest, ServiceResponse};
use actix_web::{Error, HttpMessage, ResponseError};
use futures_util::future::LocalBoxFuture;
use crate::core::AppError;
use crate::domain::models::auth::{AuthMode, AuthenticatedUser, RequiredRole};
use crate::services::auth::{TokenService, AUTH_COOKIE_NAME};

/// 실제 인증 로직을 수행하는 서비스
pub struct AuthMiddlewareService<S> {
    pub service: Rc<S>,
    pub mode: AuthMode,
    pub required_role: Option<RequiredRole>,
}

impl<S, B> Service<ServiceRequest> for AuthMiddlewareService<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, actix_web::Result<Self::Response, Self::Error>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let service = self.service.clone();
        let mode = self.mode.clone();
        let required_role = self.required_role.clone();

        Box::pin(async move {
            let token_service = TokenService::instance();
            let auth_result = authenticate(&req, &token_service);

            match (&mode, auth_result) {
                (AuthMode::Required, Err(err)) => {
                    log::warn!("⚠️ 인증 실패: {} {} - {}", req.method(), req.path(), err);
                    return Ok(reject(req, err));
                }
                (AuthMode::Required, Ok(user)) => {
                    if let Some(ref required) = required_role {
                        if !required.is_satisfied(user.role) {
                            log::warn!(
                                "⚠️ 권한 부족: 사용자 ID {} ({:?}), 필요 권한: {:?}",
                                user.user_id, user.role, required
                            );
                            let err = AppError::AuthorizationError("접근 권한이 부족합니다".to_string());
                            return Ok(reject(req, err));
                        }
                    }

                    log::debug!("인증 성공: 사용자 ID {}", user.user_id);
                    req.extensions_mut().insert(user);
                }
                (AuthMode::Optional, Ok(user)) => {
                    let allowed = required_role
                        .as_ref()
                        .is_none_or(|required| required.is_satisfied(user.role));

                    if allowed {
                        log::debug!("선택적 인증 성공: 사용자 ID {}", user.user_id);
                        req.extensions_mut().insert(user);
                    } else {
                        log::debug!("선택적 인증: 권한 부족하지만 진행 허용");
                    }
                }
                (AuthMode::Optional, Err(_)) => {
                    log::debug!("선택적 인증: 토큰 없음, 요청 진행");
                }
            }

            let res = service.call(req).await?;
            Ok(res.map_into_left_body())
        })
    }
}

fn reject<B>(req: ServiceRequest, err: AppError) -> ServiceResponse<EitherBody<B>> {
    let response = err.error_response();
    let (req, _) = req.into_parts();
    ServiceResponse::new(req, response).map_into_right_body()
}

/// `Authorization: Bearer` 헤더를 우선하고, 없으면 `token` 쿠키를 사용합니다.
pub(crate) fn extract_token(req: &ServiceRequest, token_service: &TokenService) -> Result<String, AppError> {
    if let Some(auth_header) = req.headers().get("Authorization").and_then(|h| h.to_str().ok()) {
        return token_service.extract_bearer_token(auth_header).map(str::to_string);
    }

    req.cookie(AUTH_COOKIE_NAME)
        .map(|cookie| cookie.value().to_string())
        .filter(|token| !token.is_empty())
        .ok_or_else(|| AppError::AuthenticationError("인증 토큰이 없습니다".to_string()))
}

/// 요청에서 JWT 토큰을 추출하고 검증
fn authenticate(req: &ServiceRequest, token_service: &TokenService) -> Result<AuthenticatedUser, AppError> {
    let token = extract_token(req, token_service)?;
    let claims = token_service.verify_token(&token)?;

    Ok(AuthenticatedUser {
        user_id: claims.sub,
        role: claims.role,
    })
}
