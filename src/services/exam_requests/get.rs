use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use uuid::Uuid;

use super::ExamRequestService;
use crate::middlewares::RequireJWT;
use crate::models::{ApiResponse, ErrorCode, principals::entities::PrincipalKind};
use crate::services::{error_response, forbidden_response, unauthorized_response};

pub async fn get_exam_request(
    service: &ExamRequestService,
    request_id: Uuid,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let Some(caller) = RequireJWT::extract_principal(request) else {
        return Ok(unauthorized_response());
    };

    let storage = service.get_storage(request);

    let detail = match storage.get_exam_request_by_id(request_id).await {
        Ok(Some(detail)) => detail,
        Ok(None) => {
            return Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
                ErrorCode::ExamRequestNotFound,
                "Exam request not found",
            )));
        }
        Err(e) => return Ok(error_response(&e)),
    };

    // 考试所有者、申请人和管理员可见
    let visible = caller.kind() == PrincipalKind::Administrator
        || detail.exam.created_by == caller.id()
        || detail.request.examinee_id == caller.id();
    if !visible {
        return Ok(forbidden_response("No permissions"));
    }

    Ok(HttpResponse::Ok().json(ApiResponse::success(
        detail,
        "Exam request retrieved successfully",
    )))
}
