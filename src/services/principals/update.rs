use actix_multipart::Multipart;
use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use uuid::Uuid;

use super::{PrincipalService, can_access, not_found_message};
use crate::errors::ExamSystemError;
use crate::middlewares::RequireJWT;
use crate::models::{
    ApiResponse, ErrorCode,
    principals::{entities::PrincipalKind, requests::UpdatePrincipalRequest},
};
use crate::services::{
    error_response, error_response_as, forbidden_response, get_form_limits, get_image_store,
    unauthorized_response,
};
use crate::utils::multipart::read_json_image_form;
use crate::utils::password::hash_password;
use crate::utils::validate::{validate_email, validate_password};

pub async fn update_principal(
    service: &PrincipalService,
    kind: PrincipalKind,
    id: Uuid,
    payload: Multipart,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let Some(caller) = RequireJWT::extract_principal(request) else {
        return Ok(unauthorized_response());
    };
    if !can_access(&caller, kind, id) {
        return Ok(forbidden_response("No permissions"));
    }

    let images = get_image_store(request);
    let limits = get_form_limits(request);
    let form = match read_json_image_form(payload, kind.form_field(), limits).await {
        Ok(form) => form,
        Err(e) => return Ok(error_response(&e)),
    };

    let mut update_data: UpdatePrincipalRequest = match form.parse_json() {
        Ok(data) => data.unwrap_or_default(),
        Err(e) => return Ok(error_response(&e)),
    };
    // 图片只能通过 image 字段上传
    update_data.profile_image = None;

    // 只有管理员可以修改状态
    if update_data.status.is_some() && caller.kind() != PrincipalKind::Administrator {
        return Ok(forbidden_response("Only administrators can change status"));
    }

    if let Some(ref email) = update_data.email
        && let Err(msg) = validate_email(email)
    {
        return Ok(HttpResponse::BadRequest()
            .json(ApiResponse::error_empty(ErrorCode::EmailInvalid, msg)));
    }

    if let Some(ref password) = update_data.password {
        if let Err(msg) = validate_password(password) {
            return Ok(HttpResponse::BadRequest()
                .json(ApiResponse::error_empty(ErrorCode::PasswordInvalid, msg)));
        }
        update_data.password = match hash_password(password) {
            Ok(hash) => Some(hash),
            Err(e) => {
                return Ok(
                    HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                        ErrorCode::InternalServerError,
                        format!("Password hashing failed: {e}"),
                    )),
                );
            }
        };
    }

    if let Some(image) = &form.image {
        if let Err(e) = images.validate(&image.file_name) {
            return Ok(error_response(&e));
        }
        update_data.profile_image = images.store_lenient(image);
    }

    let storage = service.get_storage(request);

    match storage.update_principal(kind, id, update_data).await {
        Ok(Some(principal)) => {
            tracing::info!("{} {} updated", kind, id);
            Ok(HttpResponse::Ok().json(ApiResponse::success(
                principal,
                format!("{kind} updated successfully"),
            )))
        }
        Ok(None) => Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
            ErrorCode::PrincipalNotFound,
            not_found_message(kind),
        ))),
        Err(e @ ExamSystemError::Duplicate(_)) => {
            Ok(error_response_as(&e, ErrorCode::EmailAlreadyExists))
        }
        Err(e) => Ok(error_response(&e)),
    }
}
