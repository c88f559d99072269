pub mod extractor;
pub mod image;
pub mod jwt;
pub mod multipart;
pub mod parameter_error_handler;
pub mod password;
pub mod validate;

pub use extractor::{
    SafeChoiceId, SafeExamId, SafeExamRequestId, SafePrincipalId, SafeQuestionId, SafeTopicId,
};
pub use image::ImageStore;
pub use jwt::JwtUtils;
pub use parameter_error_handler::json_error_handler;
