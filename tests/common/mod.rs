//! 集成测试共用的存储、令牌与请求构造工具
#![allow(dead_code)]

use std::path::PathBuf;
use std::sync::Arc;

use rust_examsystem::config::{DatabaseConfig, JwtConfig, LimitConfig, UploadConfig};
use rust_examsystem::models::principals::entities::{Principal, PrincipalKind};
use rust_examsystem::models::principals::requests::CreatePrincipalRequest;
use rust_examsystem::storage::{Storage, create_storage};
use rust_examsystem::utils::multipart::FormLimits;
use rust_examsystem::utils::password::hash_password;
use rust_examsystem::utils::{ImageStore, JwtUtils};
use serde_json::{Value, json};
use uuid::Uuid;

pub const PASSWORD: &str = "s3cret-pass";
pub const BOUNDARY: &str = "examsystem-test-boundary";

pub struct TestContext {
    pub storage: Arc<dyn Storage>,
    pub jwt: JwtUtils,
    pub images: ImageStore,
    pub upload_dir: PathBuf,
}

/// 内存 SQLite 只能使用单连接，否则每个连接都是独立的数据库
pub async fn setup() -> TestContext {
    let storage = create_storage(&DatabaseConfig {
        url: "sqlite::memory:".to_string(),
        pool_size: 1,
        timeout: 5,
    })
    .await
    .expect("in-memory storage");

    let upload_dir = std::env::temp_dir().join(format!("examsystem-test-{}", Uuid::new_v4()));
    let images = ImageStore::new(&UploadConfig {
        dir: upload_dir.to_string_lossy().to_string(),
        max_size: 1024 * 1024,
        allowed_extensions: vec![".jpg".to_string(), ".png".to_string()],
    });

    TestContext {
        storage,
        jwt: JwtUtils::new(&test_jwt_config()),
        images,
        upload_dir,
    }
}

impl TestContext {
    /// JSON 部分限制为 64 KiB
    pub fn form_limits(&self) -> FormLimits {
        FormLimits::new(
            &LimitConfig {
                max_payload_size: 64 * 1024,
            },
            &self.images,
        )
    }
}

pub fn test_jwt_config() -> JwtConfig {
    JwtConfig {
        secret: "integration-test-secret".to_string(),
        access_token_expiry: 30,
    }
}

pub async fn create_principal(ctx: &TestContext, kind: PrincipalKind, email: &str) -> Principal {
    let req = CreatePrincipalRequest {
        email: email.to_string(),
        password: hash_password(PASSWORD).expect("hash"),
        first_name: "Test".to_string(),
        last_name: kind.to_string(),
        phone_number: (kind == PrincipalKind::Examinee).then(|| "09171234567".to_string()),
        email_auth: None,
        four_digit_code: None,
        profile_image: None,
    };
    ctx.storage
        .create_principal(kind, req)
        .await
        .expect("create principal")
}

pub fn token_for(ctx: &TestContext, principal: &Principal) -> String {
    ctx.jwt
        .generate_access_token(principal.id(), principal.kind())
        .expect("token")
}

pub fn bearer(token: &str) -> (&'static str, String) {
    ("Authorization", format!("Bearer {token}"))
}

/// 两个主题、三道题、七个选项
pub fn sample_exam_json() -> Value {
    json!({
        "title": "Mathematics Midterm",
        "total_questions": 3,
        "time_duration": 60,
        "description": "Covers algebra and geometry",
        "passing_rate": 75.0,
        "exam_topic": "Mathematics",
        "grading_system": "Percentage",
        "number_of_items": 3,
        "topics": [
            {
                "name": "Algebra",
                "questions": [
                    {
                        "question": "2x = 4, x = ?",
                        "correct_answer": "2",
                        "choices": [{"option": "1"}, {"option": "2"}, {"option": "4"}]
                    },
                    {
                        "question": "x + 1 = 3, x = ?",
                        "correct_answer": "2",
                        "choices": [{"option": "2"}, {"option": "3"}]
                    }
                ]
            },
            {
                "name": "Geometry",
                "questions": [
                    {
                        "question": "Angles in a triangle sum to?",
                        "correct_answer": "180",
                        "choices": [{"option": "180"}, {"option": "360"}]
                    }
                ]
            }
        ]
    })
}

pub enum Part<'a> {
    Json(&'a str, String),
    File(&'a str, &'a str, &'a [u8]),
}

/// 构造 multipart/form-data 请求体，返回 (Content-Type, body)
pub fn multipart_body(parts: &[Part<'_>]) -> (String, Vec<u8>) {
    let mut body = Vec::new();
    for part in parts {
        body.extend_from_slice(format!("--{BOUNDARY}\r\n").as_bytes());
        match part {
            Part::Json(name, text) => {
                body.extend_from_slice(
                    format!(
                        "Content-Disposition: form-data; name=\"{name}\"\r\n\
                         Content-Type: application/json\r\n\r\n"
                    )
                    .as_bytes(),
                );
                body.extend_from_slice(text.as_bytes());
            }
            Part::File(name, file_name, bytes) => {
                body.extend_from_slice(
                    format!(
                        "Content-Disposition: form-data; name=\"{name}\"; filename=\"{file_name}\"\r\n\
                         Content-Type: application/octet-stream\r\n\r\n"
                    )
                    .as_bytes(),
                );
                body.extend_from_slice(bytes);
            }
        }
        body.extend_from_slice(b"\r\n");
    }
    body.extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());
    (format!("multipart/form-data; boundary={BOUNDARY}"), body)
}

/// 按生产环境的方式组装应用
#[macro_export]
macro_rules! test_app {
    ($ctx:expr) => {
        actix_web::test::init_service(
            actix_web::App::new()
                .app_data(
                    actix_web::web::JsonConfig::default()
                        .error_handler(rust_examsystem::utils::json_error_handler),
                )
                .app_data(actix_web::web::Data::new($ctx.storage.clone()))
                .app_data(actix_web::web::Data::new($ctx.jwt.clone()))
                .app_data(actix_web::web::Data::new($ctx.images.clone()))
                .app_data(actix_web::web::Data::new($ctx.form_limits()))
                .configure(rust_examsystem::routes::configure_auth_routes)
                .configure(rust_examsystem::routes::configure_principals_routes)
                .configure(rust_examsystem::routes::configure_exams_routes)
                .configure(rust_examsystem::routes::configure_exam_requests_routes),
        )
        .await
    };
}
