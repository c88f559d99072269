pub mod approve;
pub mod create;
pub mod delete;
pub mod get;
pub mod list;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use std::sync::Arc;
use uuid::Uuid;

use crate::models::exam_requests::requests::CreateExamRequestRequest;
use crate::storage::Storage;

pub struct ExamRequestService {
    storage: Option<Arc<dyn Storage>>,
}

impl ExamRequestService {
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

    // 按当前主体的可见范围列出申请
    pub async fn list_exam_requests(&self, request: &HttpRequest) -> ActixResult<HttpResponse> {
        list::list_exam_requests(self, request).await
    }

    pub async fn get_exam_request(
        &self,
        request_id: Uuid,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        get::get_exam_request(self, request_id, request).await
    }

    // 考生申请考试
    pub async fn create_exam_request(
        &self,
        create_data: CreateExamRequestRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        create::create_exam_request(self, create_data, request).await
    }

    // 考官批准申请
    pub async fn approve_exam_request(
        &self,
        request_id: Uuid,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        approve::approve_exam_request(self, request_id, request).await
    }

    // 考官删除申请
    pub async fn delete_exam_request(
        &self,
        request_id: Uuid,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        delete::delete_exam_request(self, request_id, request).await
    }
}
