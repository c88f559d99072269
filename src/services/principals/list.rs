use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::PrincipalService;
use crate::middlewares::RequireJWT;
use crate::models::{
    ApiResponse,
    principals::{entities::PrincipalKind, responses::PrincipalListResponse},
};
use crate::services::{error_response, forbidden_response};

pub async fn list_principals(
    service: &PrincipalService,
    kind: PrincipalKind,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    // 只有管理员和考官可以查看列表
    match RequireJWT::extract_principal_kind(request) {
        Some(PrincipalKind::Administrator) | Some(PrincipalKind::Examiner) => {}
        _ => return Ok(forbidden_response("No permissions")),
    }

    let storage = service.get_storage(request);

    match storage.list_principals(kind).await {
        Ok(items) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            PrincipalListResponse { items },
            format!("{kind} list retrieved successfully"),
        ))),
        Err(e) => Ok(error_response(&e)),
    }
}
