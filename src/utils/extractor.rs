//! 路径参数提取器，非法 UUID 直接返回 400

use actix_web::{FromRequest, HttpRequest, HttpResponse, dev::Payload, error::InternalError};
use std::future::{Ready, ready};
use uuid::Uuid;

use crate::models::{ApiResponse, ErrorCode};

fn parse_uuid_param(req: &HttpRequest, name: &str) -> Result<Uuid, actix_web::Error> {
    let raw = req.match_info().get(name).unwrap_or_default();
    Uuid::parse_str(raw).map_err(|_| {
        let message = format!("Invalid {name}: '{raw}'");
        InternalError::from_response(
            message.clone(),
            HttpResponse::BadRequest().json(ApiResponse::error_empty(ErrorCode::BadRequest, message)),
        )
        .into()
    })
}

macro_rules! define_safe_uuid {
    ($($name:ident => $param:literal),* $(,)?) => {
        $(
            #[derive(Debug, Clone, Copy)]
            pub struct $name(pub Uuid);

            impl FromRequest for $name {
                type Error = actix_web::Error;
                type Future = Ready<Result<Self, Self::Error>>;

                fn from_request(req: &HttpRequest, _: &mut Payload) -> Self::Future {
                    ready(parse_uuid_param(req, $param).map($name))
                }
            }
        )*
    };
}

define_safe_uuid! {
    SafePrincipalId => "id",
    SafeExamId => "exam_id",
    SafeTopicId => "topic_id",
    SafeQuestionId => "question_id",
    SafeChoiceId => "choice_id",
    SafeExamRequestId => "request_id",
}
