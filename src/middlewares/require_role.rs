/*!
 * 基于主体类型的访问控制中间件
 *
 * 此中间件必须在 RequireJWT 中间件之后执行（actix 中先 wrap 的后执行）。
 *
 * ```rust,ignore
 * web::scope("/exam-requests")
 *     .wrap(RequireRole::new(PrincipalKind::Examiner))
 *     .wrap(RequireJWT)
 * ```
 *
 * 或者接受多种主体：
 *
 * ```rust,ignore
 * .wrap(RequireRole::new_any(&[PrincipalKind::Examiner, PrincipalKind::Administrator]))
 * ```
 */

use actix_service::{Service, Transform};
use actix_web::{
    Error,
    body::EitherBody,
    dev::{ServiceRequest, ServiceResponse},
    http::StatusCode,
};
use futures_util::future::{LocalBoxFuture, Ready, ready};
use std::rc::Rc;
use tracing::info;

use crate::{
    middlewares::RequireJWT,
    models::{ErrorCode, principals::entities::PrincipalKind},
};

use super::create_error_response;

#[derive(Clone)]
pub struct RequireRole {
    allowed_kinds: Vec<PrincipalKind>,
}

impl RequireRole {
    /// 只允许一种主体
    pub fn new(kind: PrincipalKind) -> Self {
        Self {
            allowed_kinds: vec![kind],
        }
    }

    /// 允许任一主体
    pub fn new_any(kinds: &[PrincipalKind]) -> Self {
        Self {
            allowed_kinds: kinds.to_vec(),
        }
    }
}

impl<S, B> Transform<S, ServiceRequest> for RequireRole
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type InitError = ();
    type Transform = RequireRoleMiddleware<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(RequireRoleMiddleware {
            service: Rc::new(service),
            allowed_kinds: self.allowed_kinds.clone(),
        }))
    }
}

pub struct RequireRoleMiddleware<S> {
    service: Rc<S>,
    allowed_kinds: Vec<PrincipalKind>,
}

impl<S, B> Service<ServiceRequest> for RequireRoleMiddleware<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    fn poll_ready(
        &self,
        ctx: &mut std::task::Context<'_>,
    ) -> std::task::Poll<Result<(), Self::Error>> {
        self.service.poll_ready(ctx)
    }

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let srv = self.service.clone();
        let allowed_kinds = self.allowed_kinds.clone();

        Box::pin(async move {
            match RequireJWT::extract_principal_kind(req.request()) {
                Some(kind) if allowed_kinds.contains(&kind) => {
                    let res = srv.call(req).await?.map_into_left_body();
                    Ok(res)
                }
                Some(kind) => {
                    info!(
                        "Access denied for {} {:?}. Allowed: {:?}",
                        kind,
                        RequireJWT::extract_principal_id(req.request()),
                        allowed_kinds
                    );
                    Ok(req.into_response(
                        create_error_response(
                            StatusCode::FORBIDDEN,
                            ErrorCode::Forbidden,
                            "No permissions",
                        )
                        .map_into_right_body(),
                    ))
                }
                None => {
                    info!(
                        "Role check failed: No claims found in request. Make sure RequireJWT middleware is applied first."
                    );
                    Ok(req.into_response(
                        create_error_response(
                            StatusCode::UNAUTHORIZED,
                            ErrorCode::Unauthorized,
                            "Authentication required",
                        )
                        .map_into_right_body(),
                    ))
                }
            }
        })
    }
}
