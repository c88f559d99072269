use crate::models::principals::entities::{Principal, PrincipalKind};
use serde::Serialize;
use ts_rs::TS;

#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "auth.ts")]
pub struct LoginResponse {
    pub access_token: String,
    pub token_type: String,
    /// 秒
    pub expires_in: i64,
    pub user_type: PrincipalKind,
}

#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "auth.ts")]
pub struct MeResponse {
    pub principal: Principal,
}
