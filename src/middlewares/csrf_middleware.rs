//! CSRF 검증 미들웨어
//!
//! 쿠키(`__csrf_token__`)와 헤더(`x-csrf-token`)를 [`CsrfGuard::verify`]에 넘기고,
//! 실패하면 핸들러를 호출하지 않고 400을 반환합니다.

use std::future::{ready, Ready};
use std::rc::Rc;

use actix_web::body::EitherBody;
use actix_web::dev::{forward_ready, Service, ServiceRequest, ServiceResponse, Transform};
use actix_web::{Error, ResponseError};
use futures_util::future::LocalBoxFuture;

use crate::config::CsrfConfig;
use crate::security::CsrfGuard;

pub struct CsrfMiddleware {
    guard: Rc<CsrfGuard>,
}

impl CsrfMiddleware {
    pub fn new(guard: CsrfGuard) -> Self {
        Self { guard: Rc::new(guard) }
    }
}

impl Default for CsrfMiddleware {
    fn default() -> Self {
        Self::new(CsrfGuard::default())
    }
}

impl<S, B> Transform<S, ServiceRequest> for CsrfMiddleware
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Transform = CsrfMiddlewareService<S>;
    type InitError = ();
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(CsrfMiddlewareService {
            service: Rc::new(service),
            guard: self.guard.clone(),
        }))
    }
}

pub struct CsrfMiddlewareService<S> {
    service: Rc<S>,
    guard: Rc<CsrfGuard>,
}

impl<S, B> Service<ServiceRequest> for CsrfMiddlewareService<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let service = self.service.clone();
        let guard = self.guard.clone();

        Box::pin(async move {
            let cookie_token = req.cookie(CsrfConfig::COOKIE_NAME).map(|cookie| cookie.value().to_string());
            let header_token = req
                .headers()
                .get(CsrfConfig::HEADER_NAME)
                .and_then(|value| value.to_str().ok())
                .map(str::to_string);

            let verdict = guard.verify(
                cookie_token.as_deref(),
                header_token.as_deref(),
                req.method().as_str(),
                req.path(),
            );

            if let Err(err) = verdict {
                log::warn!("🛡️ CSRF 검증 실패: {} {} - {}", req.method(), req.path(), err);
                let response = err.error_response();
                let (req, _) = req.into_parts();
                return Ok(ServiceResponse::new(req, response).map_into_right_body());
            }

            let res = service.call(req).await?;
            Ok(res.map_into_left_body())
        })
    }
}
