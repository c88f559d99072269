pub mod create;
pub mod delete;
pub mod get;
pub mod list;
pub mod update;

use actix_multipart::Multipart;
use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use std::sync::Arc;
use uuid::Uuid;

use crate::errors::{ExamSystemError, Result};
use crate::models::ErrorCode;
use crate::models::exams::entities::Exam;
use crate::services::{error_response, error_response_as};
use crate::storage::{ExamNode, Storage};

const EXAM_NOT_FOUND: &str = "Exam not found";

pub struct ExamService {
    storage: Option<Arc<dyn Storage>>,
}

/// 读取考官自己的考试；不存在或属于他人时都返回 NotFound
pub(crate) async fn load_owned_exam(
    storage: &dyn Storage,
    exam_id: Uuid,
    owner: Uuid,
) -> Result<Exam> {
    match storage.get_exam_by_id(exam_id).await? {
        Some(exam) if exam.created_by == owner => Ok(exam),
        _ => Err(ExamSystemError::not_found(EXAM_NOT_FOUND)),
    }
}

/// 只校验所有权，规则同 [`load_owned_exam`]
pub(crate) async fn ensure_exam_owner(
    storage: &dyn Storage,
    exam_id: Uuid,
    owner: Uuid,
) -> Result<()> {
    match storage.get_exam_owner(exam_id).await? {
        Some(created_by) if created_by == owner => Ok(()),
        _ => Err(ExamSystemError::not_found(EXAM_NOT_FOUND)),
    }
}

pub(crate) fn exam_error_response(err: &ExamSystemError) -> HttpResponse {
    match err {
        ExamSystemError::NotFound(_) => error_response_as(err, ErrorCode::ExamNotFound),
        _ => error_response(err),
    }
}

impl ExamService {
    pub fn new_lazy() -> Self {
        Self { storage: None }
    }

    pub(crate) fn get_storage(&self, request: &HttpRequest) -> Arc<dyn Storage> {
        if let Some(storage) = &self.storage {
            storage.clone()
        } else {
            request
                .app_data::<actix_web::web::Data<Arc<dyn Storage>>>()
                .expect("Storage not found in app data")
                .get_ref()
                .clone()
        }
    }

    // 列出当前考官的考试
    pub async fn list_exams(&self, request: &HttpRequest) -> ActixResult<HttpResponse> {
        list::list_exams(self, request).await
    }

    // 创建考试（整棵树 + 可选封面）
    pub async fn create_exam(
        &self,
        payload: Multipart,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        create::create_exam(self, payload, request).await
    }

    pub async fn get_exam(&self, exam_id: Uuid, request: &HttpRequest) -> ActixResult<HttpResponse> {
        get::get_exam(self, exam_id, request).await
    }

    // 部分更新考试
    pub async fn update_exam(
        &self,
        exam_id: Uuid,
        payload: Multipart,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        update::update_exam(self, exam_id, payload, request).await
    }

    pub async fn delete_exam(
        &self,
        exam_id: Uuid,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        delete::delete_exam(self, exam_id, request).await
    }

    // 删除主题、题目或选项
    pub async fn delete_exam_node(
        &self,
        node: ExamNode,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        delete::delete_exam_node(self, node, request).await
    }
}
