pub mod auth;
pub mod exam_requests;
pub mod exams;
pub mod principals;

pub use auth::AuthService;
pub use exam_requests::ExamRequestService;
pub use exams::ExamService;
pub use principals::PrincipalService;

use actix_web::{HttpRequest, HttpResponse, web};
use tracing::error;

use crate::errors::ExamSystemError;
use crate::models::{ApiResponse, ErrorCode};
use crate::utils::multipart::FormLimits;
use crate::utils::{ImageStore, JwtUtils};

/// 将存储层错误转换为统一响应
pub(crate) fn error_response(err: &ExamSystemError) -> HttpResponse {
    if err.is_internal() {
        error!("{}", err);
    }
    HttpResponse::build(err.status()).json(ApiResponse::error_empty(err.error_code(), err.message()))
}

/// 同 [`error_response`]，客户端错误改用指定的业务错误码
pub(crate) fn error_response_as(err: &ExamSystemError, code: ErrorCode) -> HttpResponse {
    if err.is_internal() {
        return error_response(err);
    }
    HttpResponse::build(err.status()).json(ApiResponse::error_empty(code, err.message()))
}

pub(crate) fn unauthorized_response() -> HttpResponse {
    HttpResponse::Unauthorized().json(ApiResponse::error_empty(
        ErrorCode::Unauthorized,
        "Authentication required",
    ))
}

pub(crate) fn forbidden_response(message: &str) -> HttpResponse {
    HttpResponse::Forbidden().json(ApiResponse::error_empty(ErrorCode::Forbidden, message))
}

pub(crate) fn get_image_store(request: &HttpRequest) -> web::Data<ImageStore> {
    request
        .app_data::<web::Data<ImageStore>>()
        .expect("ImageStore not found in app data")
        .clone()
}

pub(crate) fn get_form_limits(request: &HttpRequest) -> FormLimits {
    ***request
        .app_data::<web::Data<FormLimits>>()
        .expect("FormLimits not found in app data")
}

pub(crate) fn get_jwt_utils(request: &HttpRequest) -> web::Data<JwtUtils> {
    request
        .app_data::<web::Data<JwtUtils>>()
        .expect("JwtUtils not found in app data")
        .clone()
}
