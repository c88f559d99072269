use actix_multipart::Multipart;
use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::info;
use uuid::Uuid;

use super::{ExamService, ensure_exam_owner, exam_error_response};
use crate::errors::ExamSystemError;
use crate::middlewares::RequireJWT;
use crate::models::{ApiResponse, ErrorCode, exams::requests::UpdateExamRequest};
use crate::services::{
    error_response, error_response_as, get_form_limits, get_image_store, unauthorized_response,
};
use crate::utils::multipart::read_json_image_form;

const EXAM_FIELD: &str = "exam";

/// 封面图片与 JSON 部分相互独立：JSON 失败时已保存的封面仍然生效
pub async fn update_exam(
    service: &ExamService,
    exam_id: Uuid,
    payload: Multipart,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let Some(owner) = RequireJWT::extract_principal_id(request) else {
        return Ok(unauthorized_response());
    };

    let storage = service.get_storage(request);

    if let Err(e) = ensure_exam_owner(storage.as_ref(), exam_id, owner).await {
        return Ok(exam_error_response(&e));
    }

    let images = get_image_store(request);
    let form = match read_json_image_form(payload, EXAM_FIELD, get_form_limits(request)).await {
        Ok(form) => form,
        Err(e) => return Ok(error_response(&e)),
    };

    // 写入前先校验图片类型
    if let Some(image) = &form.image {
        if let Err(e) = images.validate(&image.file_name) {
            return Ok(error_response(&e));
        }
        if let Some(path) = images.store_lenient(image)
            && let Err(e) = storage.set_exam_cover_photo(exam_id, &path).await
        {
            return Ok(error_response(&e));
        }
    }

    let update_data: Option<UpdateExamRequest> = match form.parse_json() {
        Ok(data) => data,
        Err(e) => return Ok(error_response(&e)),
    };

    let result = match update_data {
        Some(update_data) => storage.update_exam(exam_id, update_data).await,
        None => storage.get_exam_by_id(exam_id).await,
    };

    match result {
        Ok(Some(exam)) => {
            info!("Exam {} updated by {}", exam_id, owner);
            Ok(HttpResponse::Ok().json(ApiResponse::success(exam, "Exam updated successfully")))
        }
        Ok(None) => Ok(exam_error_response(&ExamSystemError::not_found("Exam not found"))),
        // 考试已确认存在，这里的 NotFound 来自选项
        Err(e @ ExamSystemError::NotFound(_)) => {
            Ok(error_response_as(&e, ErrorCode::ExamNodeNotFound))
        }
        Err(e) => Ok(error_response(&e)),
    }
}
