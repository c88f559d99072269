use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::ExamRequestService;
use crate::middlewares::RequireJWT;
use crate::models::{
    ApiResponse, exam_requests::responses::ExamRequestListResponse,
    principals::entities::PrincipalKind,
};
use crate::services::{error_response, unauthorized_response};
use crate::storage::ExamRequestScope;

pub async fn list_exam_requests(
    service: &ExamRequestService,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let Some(caller) = RequireJWT::extract_principal(request) else {
        return Ok(unauthorized_response());
    };

    let scope = match caller.kind() {
        PrincipalKind::Examiner => ExamRequestScope::OwnedBy(caller.id()),
        PrincipalKind::Examinee => ExamRequestScope::RequestedBy(caller.id()),
        PrincipalKind::Administrator => ExamRequestScope::All,
    };

    let storage = service.get_storage(request);

    match storage.list_exam_requests(scope).await {
        Ok(items) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            ExamRequestListResponse { items },
            "Exam requests retrieved successfully",
        ))),
        Err(e) => Ok(error_response(&e)),
    }
}
