use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use uuid::Uuid;

use super::{ExamService, exam_error_response, load_owned_exam};
use crate::middlewares::RequireJWT;
use crate::models::ApiResponse;
use crate::services::unauthorized_response;

pub async fn get_exam(
    service: &ExamService,
    exam_id: Uuid,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let Some(owner) = RequireJWT::extract_principal_id(request) else {
        return Ok(unauthorized_response());
    };

    let storage = service.get_storage(request);

    // 非本人的考试同样返回 404
    match load_owned_exam(storage.as_ref(), exam_id, owner).await {
        Ok(exam) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            exam,
            "Exam retrieved successfully",
        ))),
        Err(e) => Ok(exam_error_response(&e)),
    }
}
