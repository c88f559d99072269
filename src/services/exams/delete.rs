use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::info;
use uuid::Uuid;

use super::{ExamService, ensure_exam_owner, exam_error_response};
use crate::errors::ExamSystemError;
use crate::middlewares::RequireJWT;
use crate::models::ErrorCode;
use crate::services::{error_response, error_response_as, unauthorized_response};
use crate::storage::ExamNode;

pub async fn delete_exam(
    service: &ExamService,
    exam_id: Uuid,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let Some(owner) = RequireJWT::extract_principal_id(request) else {
        return Ok(unauthorized_response());
    };

    let storage = service.get_storage(request);

    if let Err(e) = ensure_exam_owner(storage.as_ref(), exam_id, owner).await {
        return Ok(exam_error_response(&e));
    }

    match storage.delete_exam(exam_id).await {
        Ok(true) => {
            info!("Exam {} deleted by {}", exam_id, owner);
            Ok(HttpResponse::NoContent().finish())
        }
        Ok(false) => Ok(exam_error_response(&ExamSystemError::not_found("Exam not found"))),
        Err(e) => Ok(error_response(&e)),
    }
}

pub async fn delete_exam_node(
    service: &ExamService,
    node: ExamNode,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let Some(owner) = RequireJWT::extract_principal_id(request) else {
        return Ok(unauthorized_response());
    };

    let not_found = error_response_as(
        &ExamSystemError::not_found(format!("{} not found", node.label())),
        ErrorCode::ExamNodeNotFound,
    );
    let storage = service.get_storage(request);

    // 先找到节点所属考试，再按考试校验所有权
    let exam_id = match storage.resolve_exam_node(node).await {
        Ok(Some(exam_id)) => exam_id,
        Ok(None) => return Ok(not_found),
        Err(e) => return Ok(error_response(&e)),
    };
    match ensure_exam_owner(storage.as_ref(), exam_id, owner).await {
        Ok(()) => {}
        Err(ExamSystemError::NotFound(_)) => return Ok(not_found),
        Err(e) => return Ok(error_response(&e)),
    }

    match storage.delete_exam_node(node).await {
        Ok(true) => {
            info!("{:?} deleted from exam {} by {}", node, exam_id, owner);
            Ok(HttpResponse::NoContent().finish())
        }
        Ok(false) => Ok(not_found),
        Err(e) => Ok(error_response(&e)),
    }
}
