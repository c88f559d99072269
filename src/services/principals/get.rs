use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use uuid::Uuid;

use super::{PrincipalService, can_access, not_found_message};
use crate::middlewares::RequireJWT;
use crate::models::{ApiResponse, ErrorCode, principals::entities::PrincipalKind};
use crate::services::{error_response, forbidden_response, unauthorized_response};

pub async fn get_principal(
    service: &PrincipalService,
    kind: PrincipalKind,
    id: Uuid,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let Some(caller) = RequireJWT::extract_principal(request) else {
        return Ok(unauthorized_response());
    };
    if !can_access(&caller, kind, id) {
        return Ok(forbidden_response("No permissions"));
    }

    let storage = service.get_storage(request);

    match storage.get_principal_by_id(kind, id).await {
        Ok(Some(principal)) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            principal,
            format!("{kind} retrieved successfully"),
        ))),
        Ok(None) => Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
            ErrorCode::PrincipalNotFound,
            not_found_message(kind),
        ))),
        Err(e) => Ok(error_response(&e)),
    }
}
