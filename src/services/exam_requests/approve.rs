use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::info;
use uuid::Uuid;

use super::ExamRequestService;
use crate::middlewares::RequireJWT;
use crate::errors::ExamSystemError;
use crate::models::{ApiResponse, ErrorCode};
use crate::services::{error_response, error_response_as, forbidden_response, unauthorized_response};

pub async fn approve_exam_request(
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

    // 只有考试所有者可以批准
    if detail.exam.created_by != examiner_id {
        return Ok(forbidden_response("Only the exam owner can approve this request"));
    }

    match storage.approve_exam_request(request_id).await {
        Ok(examinee) => {
            info!(
                "Exam request {} approved by {} (examinee {}, exam {})",
                request_id, examiner_id, detail.request.examinee_id, detail.request.exam_id
            );
            Ok(HttpResponse::Ok().json(ApiResponse::success(
                examinee,
                "Exam request approved successfully",
            )))
        }
        Err(e @ ExamSystemError::Conflict(_)) => {
            Ok(error_response_as(&e, ErrorCode::ExamRequestAlreadyApproved))
        }
        Err(e) => Ok(error_response(&e)),
    }
}
