//! 统一错误处理模块
//!
//! 使用宏自动生成错误类型，每个变体带有错误代码、类型名称和对应的 HTTP 状态。

use std::fmt;

use actix_web::http::StatusCode;

use crate::models::ErrorCode;

/// 定义错误类型的宏
///
/// 自动生成：
/// - enum 定义
/// - code() 方法 - 返回错误代码
/// - error_type() 方法 - 返回错误类型名称
/// - message() 方法 - 返回错误详情
/// - status() 方法 - 返回对应的 HTTP 状态码
/// - 便捷构造函数
macro_rules! define_examsystem_errors {
    ($(
        $variant:ident($code:literal, $type_name:literal, $status:ident)
    ),* $(,)?) => {
        #[derive(Debug, Clone)]
        pub enum ExamSystemError {
            $($variant(String),)*
        }

        impl ExamSystemError {
            /// 获取错误代码
            pub fn code(&self) -> &'static str {
                match self {
                    $(ExamSystemError::$variant(_) => $code,)*
                }
            }

            /// 获取错误类型名称
            pub fn error_type(&self) -> &'static str {
                match self {
                    $(ExamSystemError::$variant(_) => $type_name,)*
                }
            }

            /// 获取错误详情
            pub fn message(&self) -> &str {
                match self {
                    $(ExamSystemError::$variant(msg) => msg,)*
                }
            }

            /// 获取 HTTP 状态码
            pub fn status(&self) -> StatusCode {
                match self {
                    $(ExamSystemError::$variant(_) => StatusCode::$status,)*
                }
            }
        }

        paste::paste! {
            impl ExamSystemError {
                $(
                    pub fn [<$variant:snake>]<T: Into<String>>(msg: T) -> Self {
                        ExamSystemError::$variant(msg.into())
                    }
                )*
            }
        }
    };
}

define_examsystem_errors! {
    DatabaseConfig("E001", "Database Configuration Error", INTERNAL_SERVER_ERROR),
    DatabaseConnection("E002", "Database Connection Error", INTERNAL_SERVER_ERROR),
    DatabaseOperation("E003", "Database Operation Error", INTERNAL_SERVER_ERROR),
    FileOperation("E004", "File Operation Error", INTERNAL_SERVER_ERROR),
    Serialization("E005", "Serialization Error", INTERNAL_SERVER_ERROR),
    Validation("E006", "Validation Error", BAD_REQUEST),
    Duplicate("E007", "Duplicate Error", BAD_REQUEST),
    Conflict("E008", "Conflict Error", BAD_REQUEST),
    NotFound("E009", "Resource Not Found", NOT_FOUND),
    Authentication("E010", "Authentication Error", UNAUTHORIZED),
    Authorization("E011", "Authorization Error", FORBIDDEN),
    UnsupportedMedia("E012", "Unsupported Media Error", BAD_REQUEST),
    PayloadTooLarge("E013", "Payload Too Large", PAYLOAD_TOO_LARGE),
}

impl ExamSystemError {
    /// 对应的业务错误码
    pub fn error_code(&self) -> ErrorCode {
        match self {
            ExamSystemError::Validation(_) => ErrorCode::BadRequest,
            ExamSystemError::Duplicate(_) => ErrorCode::Conflict,
            ExamSystemError::Conflict(_) => ErrorCode::Conflict,
            ExamSystemError::NotFound(_) => ErrorCode::NotFound,
            ExamSystemError::Authentication(_) => ErrorCode::Unauthorized,
            ExamSystemError::Authorization(_) => ErrorCode::Forbidden,
            ExamSystemError::UnsupportedMedia(_) => ErrorCode::FileTypeNotAllowed,
            ExamSystemError::PayloadTooLarge(_) => ErrorCode::PayloadTooLarge,
            _ => ErrorCode::InternalServerError,
        }
    }

    /// 是否属于服务端内部错误
    pub fn is_internal(&self) -> bool {
        self.status().is_server_error()
    }

    /// 格式化为彩色输出（用于开发环境）
    #[cfg(debug_assertions)]
    pub fn format_colored(&self) -> String {
        format!(
            "\x1b[1;31m[ERROR]\x1b[0m \x1b[33m{}\x1b[0m \x1b[31m{}\x1b[0m\n  {}",
            self.code(),
            self.error_type(),
            self.message()
        )
    }

    /// 格式化为简洁输出
    pub fn format_simple(&self) -> String {
        format!("{}: {}", self.error_type(), self.message())
    }
}

impl fmt::Display for ExamSystemError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.format_simple())
    }
}

impl std::error::Error for ExamSystemError {}

impl From<sea_orm::DbErr> for ExamSystemError {
    fn from(err: sea_orm::DbErr) -> Self {
        ExamSystemError::DatabaseOperation(err.to_string())
    }
}

impl From<std::io::Error> for ExamSystemError {
    fn from(err: std::io::Error) -> Self {
        ExamSystemError::FileOperation(err.to_string())
    }
}

impl From<serde_json::Error> for ExamSystemError {
    fn from(err: serde_json::Error) -> Self {
        ExamSystemError::Serialization(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, ExamSystemError>;
