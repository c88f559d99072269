use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::info;
use uuid::Uuid;

use super::ExamRequestService;
use crate::middlewares::RequireJWT;
use crate::models::{ApiResponse, ErrorCode};
use crate::services::{error_response, forbidden_response, unauthorized_response};

pub async fn delete_exam_request(
    service: &ExamRequestService,
    request_id: Uuid,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let Some(examiner_id) = RequireJWT::extract_principal_id(request) else {
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

    // 非所有者删除为 403，与不存在区分
    if detail.exam.created_by != examiner_id {
        return Ok(forbidden_response("Only the exam owner can delete this request"));
    }

    match storage.delete_exam_request(request_id).await {
        Ok(true) => {
            info!("Exam request {} deleted by {}", request_id, examiner_id);
            Ok(HttpResponse::NoContent().finish())
        }
        Ok(false) => Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
            ErrorCode::ExamRequestNotFound,
            "Exam request not found",
        ))),
        Err(e) => Ok(error_response(&e)),
    }
}
