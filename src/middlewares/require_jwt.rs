/*!
 * JWT 认证中间件
 *
 * 验证 `Authorization: Bearer <token>` 的签名与过期时间，再按
 * 考生 → 考官 → 管理员 的顺序解析令牌中的主体 ID。
 *
 * ## 使用方法
 *
 * ```rust,ignore
 * web::scope("/exams")
 *     .wrap(RequireRole::new(PrincipalKind::Examiner))
 *     .wrap(RequireJWT)
 *     .route("", web::get().to(list_exams))
 * ```
 *
 * 处理程序中通过 [`RequireJWT::extract_principal`] 取得当前主体。
 *
 * ## 认证流程
 *
 * 1. 提取并验证令牌，任何解码错误都视为认证失败
 * 2. 在三类主体中查找令牌的 sub
 * 3. 成功时将主体和 Claims 存入请求扩展；失败返回 401
 */

use crate::models::ErrorCode;
use crate::models::principals::entities::{Principal, PrincipalKind};
use crate::storage::Storage;
use crate::utils::jwt::{Claims, JwtUtils};
use actix_service::{Service, Transform};
use actix_web::{
    Error, HttpMessage,
    body::EitherBody,
    dev::{ServiceRequest, ServiceResponse},
    http::StatusCode,
    web,
};
use futures_util::future::{LocalBoxFuture, Ready, ready};
use std::{rc::Rc, sync::Arc};
use tracing::{debug, info};
use uuid::Uuid;

use super::create_error_response;

const BEARER_PREFIX: &str = "Bearer ";
const AUTHORIZATION_HEADER: &str = "Authorization";

#[derive(Clone)]
pub struct RequireJWT;

/// 验证 Authorization 头并解析主体
pub async fn authenticate_bearer(
    storage: &dyn Storage,
    jwt: &JwtUtils,
    authorization: Option<&str>,
) -> Result<(Principal, Claims), String> {
    let token = authorization
        .and_then(|s| s.strip_prefix(BEARER_PREFIX))
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .ok_or_else(|| "Missing or invalid Authorization header".to_string())?;

    let claims = jwt.verify_access_token(token).map_err(|err| {
        info!("JWT token validation failed: {}", err);
        "Invalid JWT token".to_string()
    })?;

    let principal_id = claims
        .principal_id()
        .ok_or_else(|| "Invalid principal ID in JWT".to_string())?;

    let principal = storage
        .find_principal_by_id(principal_id)
        .await
        .map_err(|e| {
            tracing::error!("Failed to resolve principal: {}", e);
            "Failed to retrieve principal from storage".to_string()
        })?
        .ok_or_else(|| "Principal not found".to_string())?;

    Ok((principal, claims))
}

async fn extract_and_validate_jwt(req: &ServiceRequest) -> Result<(Principal, Claims), String> {
    let storage = req
        .app_data::<web::Data<Arc<dyn Storage>>>()
        .ok_or_else(|| "Storage not configured".to_string())?
        .get_ref()
        .clone();
    let jwt = req
        .app_data::<web::Data<JwtUtils>>()
        .ok_or_else(|| "Token codec not configured".to_string())?
        .clone();

    let authorization = req
        .headers()
        .get(AUTHORIZATION_HEADER)
        .and_then(|h| h.to_str().ok());

    authenticate_bearer(storage.as_ref(), &jwt, authorization).await
}

impl<S, B> Transform<S, ServiceRequest> for RequireJWT
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type InitError = ();
    type Transform = RequireJWTMiddleware<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(RequireJWTMiddleware {
            service: Rc::new(service),
        }))
    }
}

pub struct RequireJWTMiddleware<S> {
    service: Rc<S>,
}

impl<S, B> Service<ServiceRequest> for RequireJWTMiddleware<S>
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
        Box::pin(async move {
            // 处理 OPTIONS 请求
            if req.method() == actix_web::http::Method::OPTIONS {
                return Ok(req.into_response(
                    create_error_response(StatusCode::NO_CONTENT, ErrorCode::Success, "")
                        .map_into_right_body(),
                ));
            }

            match extract_and_validate_jwt(&req).await {
                Ok((principal, claims)) => {
                    debug!(
                        "JWT authentication successful for {} {}",
                        principal.kind(),
                        principal.id()
                    );
                    req.extensions_mut().insert(principal);
                    req.extensions_mut().insert(claims);
                    let res = srv.call(req).await?.map_into_left_body();
                    Ok(res)
                }
                Err(err) => {
                    info!(
                        "JWT authentication failed for request to {}: {}",
                        req.path(),
                        err
                    );
                    Ok(req.into_response(
                        create_error_response(
                            StatusCode::UNAUTHORIZED,
                            ErrorCode::Unauthorized,
                            &format!("Unauthorized: {err}"),
                        )
                        .map_into_right_body(),
                    ))
                }
            }
        })
    }
}

// 辅助函数：从请求中提取主体信息
impl RequireJWT {
    /// 从请求扩展中提取当前主体
    /// 此函数应该在应用了RequireJWT中间件的路由处理程序中使用
    pub fn extract_principal(req: &actix_web::HttpRequest) -> Option<Principal> {
        req.extensions().get::<Principal>().cloned()
    }

    /// 从请求扩展中提取主体ID
    pub fn extract_principal_id(req: &actix_web::HttpRequest) -> Option<Uuid> {
        req.extensions().get::<Principal>().map(|p| p.id())
    }

    /// 从请求扩展中提取令牌声明的主体类型
    pub fn extract_principal_kind(req: &actix_web::HttpRequest) -> Option<PrincipalKind> {
        req.extensions().get::<Claims>().map(|claims| claims.user_type)
    }
}
