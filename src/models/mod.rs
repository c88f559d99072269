pub mod auth;
pub mod common;
pub mod exam_requests;
pub mod exams;
pub mod principals;

pub use common::response::ApiResponse;

/// 业务错误码，随 ApiResponse 一起返回
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(i32)]
pub enum ErrorCode {
    Success = 0,

    // 通用错误
    BadRequest = 1000,
    Unauthorized = 1001,
    Forbidden = 1003,
    NotFound = 1004,
    Conflict = 1009,
    InternalServerError = 1500,

    // 认证与账户
    InvalidCredentials = 2001,
    PrincipalNotFound = 2004,
    EmailAlreadyExists = 2009,
    EmailInvalid = 2010,
    PasswordInvalid = 2011,

    // 考试
    ExamNotFound = 3004,
    ExamNodeNotFound = 3030,

    // 考试申请
    ExamRequestNotFound = 4004,
    ExamRequestAlreadyExists = 4009,
    ExamRequestAlreadyApproved = 4010,

    // 文件
    FileTypeNotAllowed = 5000,
    PayloadTooLarge = 5001,
}
