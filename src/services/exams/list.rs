use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::ExamService;
use crate::middlewares::RequireJWT;
use crate::models::{ApiResponse, exams::responses::ExamListResponse};
use crate::services::{error_response, unauthorized_response};

pub async fn list_exams(service: &ExamService, request: &HttpRequest) -> ActixResult<HttpResponse> {
    let Some(owner) = RequireJWT::extract_principal_id(request) else {
        return Ok(unauthorized_response());
    };

    let storage = service.get_storage(request);

    match storage.list_exams_by_owner(owner).await {
        Ok(items) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            ExamListResponse { items },
            "Exams retrieved successfully",
        ))),
        Err(e) => Ok(error_response(&e)),
    }
}
