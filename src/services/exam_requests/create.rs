use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::info;

use super::ExamRequestService;
use crate::middlewares::RequireJWT;
use crate::errors::ExamSystemError;
use crate::models::{ApiResponse, ErrorCode, exam_requests::requests::CreateExamRequestRequest};
use crate::services::{error_response, error_response_as, unauthorized_response};

pub async fn create_exam_request(
    service: &ExamRequestService,
    create_data: CreateExamRequestRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let Some(examinee_id) = RequireJWT::extract_principal_id(request) else {
        return Ok(unauthorized_response());
    };

    let storage = service.get_storage(request);

    match storage
        .create_exam_request(examinee_id, create_data.exam_id)
        .await
    {
        Ok(exam_request) => {
            info!(
                "Examinee {} requested exam {}",
                examinee_id, create_data.exam_id
            );
            Ok(HttpResponse::Created().json(ApiResponse::success(
                exam_request,
                "Exam request created successfully",
            )))
        }
        Err(e @ ExamSystemError::NotFound(_)) => {
            Ok(error_response_as(&e, ErrorCode::ExamNotFound))
        }
        Err(e @ ExamSystemError::Duplicate(_)) => {
            Ok(error_response_as(&e, ErrorCode::ExamRequestAlreadyExists))
        }
        Err(e) => Ok(error_response(&e)),
    }
}
