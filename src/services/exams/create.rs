use actix_multipart::Multipart;
use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::info;

use super::ExamService;
use crate::middlewares::RequireJWT;
use crate::models::{ApiResponse, ErrorCode, exams::requests::CreateExamRequest};
use crate::services::{error_response, get_form_limits, get_image_store, unauthorized_response};
use crate::utils::multipart::{INVALID_FORMAT, read_json_image_form};

const EXAM_FIELD: &str = "exam";

pub async fn create_exam(
    service: &ExamService,
    payload: Multipart,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let Some(owner) = RequireJWT::extract_principal_id(request) else {
        return Ok(unauthorized_response());
    };

    let images = get_image_store(request);
    let form = match read_json_image_form(payload, EXAM_FIELD, get_form_limits(request)).await {
        Ok(form) => form,
        Err(e) => return Ok(error_response(&e)),
    };

    let exam_data: CreateExamRequest = match form.parse_json() {
        Ok(Some(data)) => data,
        Ok(None) => {
            return Ok(HttpResponse::BadRequest()
                .json(ApiResponse::error_empty(ErrorCode::BadRequest, INVALID_FORMAT)));
        }
        Err(e) => return Ok(error_response(&e)),
    };

    // 写入前先校验图片类型
    if let Some(image) = &form.image
        && let Err(e) = images.validate(&image.file_name)
    {
        return Ok(error_response(&e));
    }

    let storage = service.get_storage(request);

    let mut exam = match storage.create_exam(owner, exam_data).await {
        Ok(exam) => exam,
        Err(e) => return Ok(error_response(&e)),
    };

    if let Some(image) = &form.image
        && let Some(path) = images.store_lenient(image)
    {
        match storage.set_exam_cover_photo(exam.id, &path).await {
            Ok(_) => exam.cover_photo = Some(path),
            Err(e) => return Ok(error_response(&e)),
        }
    }

    info!(
        "Exam {} created by {} with {} topics, {} questions, {} choices",
        exam.id,
        owner,
        exam.topics.len(),
        exam.question_count(),
        exam.choice_count()
    );

    Ok(HttpResponse::Created().json(ApiResponse::success(exam, "Exam created successfully")))
}
