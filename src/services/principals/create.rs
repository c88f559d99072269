use actix_multipart::Multipart;
use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::info;

use super::PrincipalService;
use crate::errors::ExamSystemError;
use crate::middlewares::RequireJWT;
use crate::models::{
    ApiResponse, ErrorCode,
    principals::{
        entities::PrincipalKind,
        requests::{CreatePrincipalRequest, UpdatePrincipalRequest},
    },
};
use crate::services::{
    error_response, error_response_as, forbidden_response, get_form_limits, get_image_store,
};
use crate::utils::multipart::{INVALID_FORMAT, read_json_image_form};
use crate::utils::password::hash_password;
use crate::utils::validate::{validate_email, validate_name, validate_password};

pub async fn create_principal(
    service: &PrincipalService,
    kind: PrincipalKind,
    payload: Multipart,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    // 管理员只能由管理员创建
    if kind == PrincipalKind::Administrator
        && RequireJWT::extract_principal_kind(request) != Some(PrincipalKind::Administrator)
    {
        return Ok(forbidden_response("No permissions"));
    }

    let images = get_image_store(request);
    let limits = get_form_limits(request);
    let form = match read_json_image_form(payload, kind.form_field(), limits).await {
        Ok(form) => form,
        Err(e) => return Ok(error_response(&e)),
    };

    let mut create_data: CreatePrincipalRequest = match form.parse_json() {
        Ok(Some(data)) => data,
        Ok(None) => {
            return Ok(HttpResponse::BadRequest()
                .json(ApiResponse::error_empty(ErrorCode::BadRequest, INVALID_FORMAT)));
        }
        Err(e) => return Ok(error_response(&e)),
    };

    // 验证邮箱
    if let Err(msg) = validate_email(&create_data.email) {
        return Ok(HttpResponse::BadRequest()
            .json(ApiResponse::error_empty(ErrorCode::EmailInvalid, msg)));
    }

    if let Err(msg) = validate_password(&create_data.password) {
        return Ok(HttpResponse::BadRequest()
            .json(ApiResponse::error_empty(ErrorCode::PasswordInvalid, msg)));
    }

    if let Err(msg) = validate_name(&create_data.first_name)
        .and_then(|_| validate_name(&create_data.last_name))
    {
        return Ok(HttpResponse::BadRequest()
            .json(ApiResponse::error_empty(ErrorCode::BadRequest, msg)));
    }

    // 考生必须提供手机号
    if kind == PrincipalKind::Examinee && create_data.phone_number.is_none() {
        return Ok(HttpResponse::BadRequest()
            .json(ApiResponse::error_empty(ErrorCode::BadRequest, INVALID_FORMAT)));
    }

    // 写入前先校验图片类型
    if let Some(image) = &form.image
        && let Err(e) = images.validate(&image.file_name)
    {
        return Ok(error_response(&e));
    }

    create_data.password = match hash_password(&create_data.password) {
        Ok(hash) => hash,
        Err(e) => {
            return Ok(
                HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                    ErrorCode::InternalServerError,
                    format!("Password hashing failed: {e}"),
                )),
            );
        }
    };

    let storage = service.get_storage(request);

    let mut principal = match storage.create_principal(kind, create_data).await {
        Ok(principal) => principal,
        Err(e @ ExamSystemError::Duplicate(_)) => {
            return Ok(error_response_as(&e, ErrorCode::EmailAlreadyExists));
        }
        Err(e) => return Ok(error_response(&e)),
    };

    if let Some(image) = &form.image
        && let Some(path) = images.store_lenient(image)
    {
        let update = UpdatePrincipalRequest {
            profile_image: Some(path),
            ..Default::default()
        };
        match storage.update_principal(kind, principal.id(), update).await {
            Ok(Some(updated)) => principal = updated,
            Ok(None) => {}
            Err(e) => return Ok(error_response(&e)),
        }
    }

    info!("{} {} created", kind, principal.id());

    Ok(HttpResponse::Created().json(ApiResponse::success(
        principal,
        format!("{kind} created successfully"),
    )))
}
