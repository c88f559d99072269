use serde::Deserialize;
use ts_rs::TS;

// 登录请求，邮箱在三类主体中依次查找
#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "auth.ts")]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}
