use super::entities::Principal;
use serde::Serialize;
use ts_rs::TS;

// 主体列表响应
#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "principal.ts")]
pub struct PrincipalListResponse {
    pub items: Vec<Principal>,
}
