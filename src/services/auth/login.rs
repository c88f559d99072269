use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use crate::models::{
    ApiResponse, ErrorCode,
    auth::{requests::LoginRequest, responses::LoginResponse},
};
use crate::services::get_jwt_utils;
use crate::utils::password::verify_password;

use super::AuthService;

const INVALID_CREDENTIALS: &str = "Invalid credentials";

pub async fn handle_login(
    service: &AuthService,
    login_request: LoginRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);

    // 1. 依次在考生、考官、管理员中查找邮箱
    let principal = match storage.find_principal_by_email(&login_request.email).await {
        Ok(Some(principal)) => principal,
        Ok(None) => {
            tracing::info!("Login failed: unknown email {}", login_request.email);
            return Ok(HttpResponse::Forbidden().json(ApiResponse::error_empty(
                ErrorCode::InvalidCredentials,
                INVALID_CREDENTIALS,
            )));
        }
        Err(e) => {
            tracing::error!("Login lookup failed: {}", e);
            return Ok(
                HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                    ErrorCode::InternalServerError,
                    format!("Login failed: {e}"),
                )),
            );
        }
    };

    // 2. 只对命中的那一个主体验证密码
    if !verify_password(&login_request.password, principal.password_hash()) {
        tracing::info!("Login failed: wrong password for {}", principal.email());
        return Ok(HttpResponse::Forbidden().json(ApiResponse::error_empty(
            ErrorCode::InvalidCredentials,
            INVALID_CREDENTIALS,
        )));
    }

    // 3. 签发令牌
    let jwt = get_jwt_utils(request);
    match jwt.generate_access_token(principal.id(), principal.kind()) {
        Ok(access_token) => {
            tracing::info!("{} {} logged in successfully", principal.kind(), principal.id());

            let response = LoginResponse {
                access_token,
                token_type: "bearer".to_string(),
                expires_in: jwt.access_token_expires_in(),
                user_type: principal.kind(),
            };

            Ok(HttpResponse::Ok().json(ApiResponse::success(response, "Login successful")))
        }
        Err(e) => {
            tracing::error!("Failed to generate JWT token: {}", e);
            Ok(
                HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                    ErrorCode::InternalServerError,
                    "Login failed, unable to generate token",
                )),
            )
        }
    }
}
