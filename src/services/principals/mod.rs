pub mod create;
pub mod delete;
pub mod get;
pub mod list;
pub mod update;

use actix_multipart::Multipart;
use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use std::sync::Arc;
use uuid::Uuid;

use crate::models::principals::entities::{Principal, PrincipalKind};
use crate::storage::Storage;

pub struct PrincipalService {
    storage: Option<Arc<dyn Storage>>,
}

/// 管理员可访问任意主体，其他主体只能访问自己
pub(crate) fn can_access(caller: &Principal, kind: PrincipalKind, id: Uuid) -> bool {
    caller.kind() == PrincipalKind::Administrator || (caller.kind() == kind && caller.id() == id)
}

pub(crate) fn not_found_message(kind: PrincipalKind) -> String {
    format!("{kind} not found")
}

impl PrincipalService {
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

    // 获取主体列表
    pub async fn list_principals(
        &self,
        kind: PrincipalKind,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        list::list_principals(self, kind, request).await
    }

    // 创建主体
    pub async fn create_principal(
        &self,
        kind: PrincipalKind,
        payload: Multipart,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        create::create_principal(self, kind, payload, request).await
    }

    // 根据ID获取主体
    pub async fn get_principal(
        &self,
        kind: PrincipalKind,
        id: Uuid,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        get::get_principal(self, kind, id, request).await
    }

    // 部分更新主体
    pub async fn update_principal(
        &self,
        kind: PrincipalKind,
        id: Uuid,
        payload: Multipart,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        update::update_principal(self, kind, id, payload, request).await
    }

    // 删除主体
    pub async fn delete_principal(
        &self,
        kind: PrincipalKind,
        id: Uuid,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        delete::delete_principal(self, kind, id, request).await
    }
}
