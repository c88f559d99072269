use serde::{Deserialize, Serialize};
use ts_rs::TS;
use uuid::Uuid;

/// 主体类型：考生、考官、管理员
///
/// 三类主体分表存储，id 不分命名空间，因此按邮箱或 id 查找时
/// 需要依照 [`PrincipalKind::resolution_order`] 逐个尝试。
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq, Hash, TS)]
#[ts(export, export_to = "principal.ts")]
pub enum PrincipalKind {
    Examinee,
    Examiner,
    #[serde(rename = "Admin")]
    Administrator,
}

impl PrincipalKind {
    pub const EXAMINEE: &'static str = "Examinee";
    pub const EXAMINER: &'static str = "Examiner";
    pub const ADMIN: &'static str = "Admin";

    /// 登录与令牌解析时的查找顺序
    pub fn resolution_order() -> &'static [PrincipalKind] {
        &[
            PrincipalKind::Examinee,
            PrincipalKind::Examiner,
            PrincipalKind::Administrator,
        ]
    }

    /// multipart 表单中 JSON 部分的字段名
    pub fn form_field(&self) -> &'static str {
        match self {
            PrincipalKind::Examinee => "examinee",
            PrincipalKind::Examiner => "examiner",
            PrincipalKind::Administrator => "admin",
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            PrincipalKind::Examinee => Self::EXAMINEE,
            PrincipalKind::Examiner => Self::EXAMINER,
            PrincipalKind::Administrator => Self::ADMIN,
        }
    }
}

impl<'de> Deserialize<'de> for PrincipalKind {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(|_| {
            serde::de::Error::custom(format!(
                "无效的主体类型: '{s}'. 支持的类型: Examinee, Examiner, Admin"
            ))
        })
    }
}

impl std::fmt::Display for PrincipalKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for PrincipalKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            Self::EXAMINEE => Ok(PrincipalKind::Examinee),
            Self::EXAMINER => Ok(PrincipalKind::Examiner),
            Self::ADMIN => Ok(PrincipalKind::Administrator),
            _ => Err(format!("Invalid principal kind: {s}")),
        }
    }
}

/// 账户状态的默认值
pub const DEFAULT_STATUS: &str = "Pending";

// 三类主体共有的账户字段
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "principal.ts")]
pub struct Account {
    pub id: Uuid,
    pub email: String,
    #[serde(skip_serializing, default)] // 不序列化到JSON响应中
    #[ts(skip)]
    pub password_hash: String,
    pub first_name: String,
    pub last_name: String,
    pub profile_image: Option<String>,
    pub status: String,
    pub user_type: PrincipalKind,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

// 考生
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "principal.ts")]
pub struct Examinee {
    #[serde(flatten)]
    #[ts(flatten)]
    pub account: Account,
    pub phone_number: String,
    pub email_auth: bool,
    pub four_digit_code: Option<i32>,
    /// 已批准报名的考试
    pub exam_ids: Vec<Uuid>,
}

/// 已解析的主体
#[derive(Debug, Clone, Serialize, TS)]
#[serde(untagged)]
#[ts(export, export_to = "principal.ts")]
pub enum Principal {
    Examinee(Examinee),
    Examiner(Account),
    Administrator(Account),
}

impl Principal {
    pub fn account(&self) -> &Account {
        match self {
            Principal::Examinee(examinee) => &examinee.account,
            Principal::Examiner(account) | Principal::Administrator(account) => account,
        }
    }

    pub fn id(&self) -> Uuid {
        self.account().id
    }

    pub fn email(&self) -> &str {
        &self.account().email
    }

    pub fn password_hash(&self) -> &str {
        &self.account().password_hash
    }

    pub fn kind(&self) -> PrincipalKind {
        match self {
            Principal::Examinee(_) => PrincipalKind::Examinee,
            Principal::Examiner(_) => PrincipalKind::Examiner,
            Principal::Administrator(_) => PrincipalKind::Administrator,
        }
    }
}
