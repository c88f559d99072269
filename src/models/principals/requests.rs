use serde::Deserialize;
use ts_rs::TS;

// 主体创建请求（multipart 中的 JSON 部分）
#[derive(Debug, Clone, Deserialize, TS)]
#[ts(export, export_to = "principal.ts")]
pub struct CreatePrincipalRequest {
    pub email: String,
    pub password: String,
    pub first_name: String,
    pub last_name: String,
    /// 仅考生使用
    #[serde(default)]
    pub phone_number: Option<String>,
    #[serde(default)]
    pub email_auth: Option<bool>,
    #[serde(default)]
    pub four_digit_code: Option<i32>,
    #[serde(default)]
    #[ts(skip)]
    pub profile_image: Option<String>,
}

// 主体部分更新请求
#[derive(Debug, Clone, Default, Deserialize, TS)]
#[ts(export, export_to = "principal.ts")]
pub struct UpdatePrincipalRequest {
    pub email: Option<String>,
    pub password: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub status: Option<String>,
    pub phone_number: Option<String>,
    pub email_auth: Option<bool>,
    pub four_digit_code: Option<i32>,
    #[serde(default)]
    #[ts(skip)]
    pub profile_image: Option<String>,
}
