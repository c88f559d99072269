use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use crate::middlewares::RequireJWT;
use crate::models::{ApiResponse, auth::responses::MeResponse};
use crate::services::unauthorized_response;

pub async fn handle_me(request: &HttpRequest) -> ActixResult<HttpResponse> {
    match RequireJWT::extract_principal(request) {
        Some(principal) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            MeResponse { principal },
            "Principal information retrieved successfully",
        ))),
        None => Ok(unauthorized_response()),
    }
}
