#[macro_use]
mod common;

use actix_web::http::StatusCode;
use actix_web::test;
use common::{
    PASSWORD, Part, bearer, create_principal, multipart_body, sample_exam_json, setup,
    test_jwt_config, token_for,
};
use rust_examsystem::models::ErrorCode;
use rust_examsystem::models::principals::entities::PrincipalKind;
use rust_examsystem::utils::JwtUtils;
use serde_json::{Value, json};

fn multipart_request(
    method: actix_web::http::Method,
    uri: &str,
    token: Option<&str>,
    parts: &[Part<'_>],
) -> test::TestRequest {
    let (content_type, body) = multipart_body(parts);
    let mut req = test::TestRequest::default()
        .method(method)
        .uri(uri)
        .insert_header(("Content-Type", content_type))
        .set_payload(body);
    if let Some(token) = token {
        req = req.insert_header(bearer(token));
    }
    req
}

#[actix_web::test]
async fn test_register_login_and_me() {
    let ctx = setup().await;
    let app = test_app!(ctx);

    let examinee = json!({
        "email": "taker@example.com",
        "password": PASSWORD,
        "first_name": "Ada",
        "last_name": "Lovelace",
        "phone_number": "09171234567",
        "email_auth": true
    })
    .to_string();

    let req = multipart_request(
        actix_web::http::Method::POST,
        "/api/v1/examinees",
        None,
        &[Part::Json("examinee", examinee.clone())],
    )
    .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::CREATED);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["data"]["email"], "taker@example.com");
    assert_eq!(body["data"]["status"], "Pending");
    assert_eq!(body["data"]["user_type"], "Examinee");
    assert!(body["data"].get("password_hash").is_none());

    let req = multipart_request(
        actix_web::http::Method::POST,
        "/api/v1/examinees",
        None,
        &[Part::Json("examinee", examinee)],
    )
    .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["message"], "Email is already in use");
    assert_eq!(body["code"], ErrorCode::EmailAlreadyExists as i32);

    let req = test::TestRequest::post()
        .uri("/api/v1/auth/login")
        .set_json(json!({"email": "taker@example.com", "password": "wrong"}))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["message"], "Invalid credentials");

    let req = test::TestRequest::post()
        .uri("/api/v1/auth/login")
        .set_json(json!({"email": "nobody@example.com", "password": PASSWORD}))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);

    let req = test::TestRequest::post()
        .uri("/api/v1/auth/login")
        .set_json(json!({"email": "taker@example.com", "password": PASSWORD}))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["data"]["token_type"], "bearer");
    assert_eq!(body["data"]["user_type"], "Examinee");
    assert_eq!(body["data"]["expires_in"], 30 * 60);
    let token = body["data"]["access_token"].as_str().unwrap().to_string();

    let req = test::TestRequest::get()
        .uri("/api/v1/auth/me")
        .insert_header(bearer(&token))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["data"]["principal"]["email"], "taker@example.com");
    assert_eq!(body["data"]["principal"]["phone_number"], "09171234567");
}

#[actix_web::test]
async fn test_registration_rejects_malformed_json_part() {
    let ctx = setup().await;
    let app = test_app!(ctx);

    let req = multipart_request(
        actix_web::http::Method::POST,
        "/api/v1/examiners",
        None,
        &[Part::Json("examiner", "{not json".to_string())],
    )
    .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["message"], "Invalid format or missing fields.");
}

#[actix_web::test]
async fn test_oversized_json_part_is_rejected() {
    let ctx = setup().await;
    let app = test_app!(ctx);

    let padding = "x".repeat(128 * 1024);
    let examiner = json!({
        "email": "big@example.com",
        "password": PASSWORD,
        "first_name": padding,
        "last_name": "Examiner"
    })
    .to_string();
    let req = multipart_request(
        actix_web::http::Method::POST,
        "/api/v1/examiners",
        None,
        &[Part::Json("examiner", examiner)],
    )
    .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::PAYLOAD_TOO_LARGE);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["code"], ErrorCode::PayloadTooLarge as i32);
    assert!(
        ctx.storage
            .find_principal_by_email("big@example.com")
            .await
            .unwrap()
            .is_none()
    );

    // 未知字段被读取后丢弃，不计入限制
    let examiner = json!({
        "email": "small@example.com",
        "password": PASSWORD,
        "first_name": "Small",
        "last_name": "Examiner"
    })
    .to_string();
    let req = multipart_request(
        actix_web::http::Method::POST,
        "/api/v1/examiners",
        None,
        &[
            Part::Json("notes", "y".repeat(128 * 1024)),
            Part::Json("examiner", examiner),
        ],
    )
    .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::CREATED);
}

#[actix_web::test]
async fn test_examiner_login_with_wrong_password() {
    let ctx = setup().await;
    create_principal(&ctx, PrincipalKind::Examiner, "owner@example.com").await;
    let app = test_app!(ctx);

    let req = test::TestRequest::post()
        .uri("/api/v1/auth/login")
        .set_json(json!({"email": "owner@example.com", "password": "not-the-password"}))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["message"], "Invalid credentials");
    assert_eq!(body["code"], ErrorCode::InvalidCredentials as i32);

    let req = test::TestRequest::post()
        .uri("/api/v1/auth/login")
        .set_json(json!({"email": "owner@example.com", "password": PASSWORD}))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["data"]["user_type"], "Examiner");
}

#[actix_web::test]
async fn test_exam_cover_is_replaced_even_when_update_fails() {
    let ctx = setup().await;
    let owner = create_principal(&ctx, PrincipalKind::Examiner, "owner@example.com").await;
    let exam = ctx
        .storage
        .create_exam(owner.id(), serde_json::from_value(sample_exam_json()).unwrap())
        .await
        .unwrap();
    assert!(exam.cover_photo.is_none());
    let owner_token = token_for(&ctx, &owner);
    let app = test_app!(ctx);

    let algebra = &exam.topics[0];
    let missing_choice = uuid::Uuid::new_v4();
    let update = json!({
        "title": "Should not persist",
        "topics": [{
            "id": algebra.id,
            "questions": [{
                "id": algebra.questions[0].id,
                "choices": [{"id": missing_choice, "option": "ghost"}]
            }]
        }]
    })
    .to_string();
    let req = multipart_request(
        actix_web::http::Method::PATCH,
        &format!("/api/v1/exams/{}", exam.id),
        Some(&owner_token),
        &[
            Part::File("image", "first.png", b"\x89PNG\r\n\x1a\n"),
            Part::Json("exam", update),
        ],
    )
    .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["message"], format!("Choice not found: {missing_choice}"));

    let stored = ctx.storage.get_exam_by_id(exam.id).await.unwrap().unwrap();
    assert_eq!(stored.title, "Mathematics Midterm");
    let first_cover = stored.cover_photo.clone().unwrap();
    assert!(first_cover.ends_with(".png"));

    // 无法解析的 JSON 部分同样不影响封面
    let req = multipart_request(
        actix_web::http::Method::PATCH,
        &format!("/api/v1/exams/{}", exam.id),
        Some(&owner_token),
        &[
            Part::File("image", "second.jpg", b"\xff\xd8\xff"),
            Part::Json("exam", "{broken".to_string()),
        ],
    )
    .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["message"], "Invalid format or missing fields.");

    let stored = ctx.storage.get_exam_by_id(exam.id).await.unwrap().unwrap();
    assert_eq!(stored.title, "Mathematics Midterm");
    let second_cover = stored.cover_photo.unwrap();
    assert_ne!(second_cover, first_cover);
    assert!(second_cover.ends_with(".jpg"));

    let _ = std::fs::remove_dir_all(&ctx.upload_dir);
}

#[actix_web::test]
async fn test_invalid_tokens_are_rejected() {
    let ctx = setup().await;
    let examiner = create_principal(&ctx, PrincipalKind::Examiner, "owner@example.com").await;
    let app = test_app!(ctx);

    let req = test::TestRequest::get().uri("/api/v1/auth/me").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);

    let req = test::TestRequest::get()
        .uri("/api/v1/auth/me")
        .insert_header(bearer("not-a-jwt"))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);

    // 其他密钥签发的令牌
    let mut foreign = test_jwt_config();
    foreign.secret = "another-secret".to_string();
    let forged = JwtUtils::new(&foreign)
        .generate_access_token(examiner.id(), PrincipalKind::Examiner)
        .unwrap();
    let req = test::TestRequest::get()
        .uri("/api/v1/auth/me")
        .insert_header(bearer(&forged))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);

    let expired = ctx
        .jwt
        .generate_token_with_expiry(
            examiner.id(),
            PrincipalKind::Examiner,
            chrono::Duration::hours(-2),
        )
        .unwrap();
    let req = test::TestRequest::get()
        .uri("/api/v1/exams")
        .insert_header(bearer(&expired))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);

    // 主体已删除
    let token = token_for(&ctx, &examiner);
    ctx.storage
        .delete_principal(PrincipalKind::Examiner, examiner.id())
        .await
        .unwrap();
    let req = test::TestRequest::get()
        .uri("/api/v1/auth/me")
        .insert_header(bearer(&token))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}

#[actix_web::test]
async fn test_exam_routes_are_owner_scoped() {
    let ctx = setup().await;
    let owner = create_principal(&ctx, PrincipalKind::Examiner, "owner@example.com").await;
    let other = create_principal(&ctx, PrincipalKind::Examiner, "other@example.com").await;
    let examinee = create_principal(&ctx, PrincipalKind::Examinee, "taker@example.com").await;
    let owner_token = token_for(&ctx, &owner);
    let other_token = token_for(&ctx, &other);
    let examinee_token = token_for(&ctx, &examinee);
    let app = test_app!(ctx);

    let exam_json = sample_exam_json().to_string();

    // 考生不能创建考试
    let req = multipart_request(
        actix_web::http::Method::POST,
        "/api/v1/exams",
        Some(&examinee_token),
        &[Part::Json("exam", exam_json.clone())],
    )
    .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);

    // 不支持的图片类型在写入前被拒绝
    let req = multipart_request(
        actix_web::http::Method::POST,
        "/api/v1/exams",
        Some(&owner_token),
        &[
            Part::Json("exam", exam_json.clone()),
            Part::File("image", "cover.gif", b"GIF89a"),
        ],
    )
    .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(
        body["message"],
        "Invalid file type. Only .jpg and .png files are accepted"
    );
    assert!(
        ctx.storage
            .list_exams_by_owner(owner.id())
            .await
            .unwrap()
            .is_empty()
    );

    let req = multipart_request(
        actix_web::http::Method::POST,
        "/api/v1/exams",
        Some(&owner_token),
        &[
            Part::Json("exam", exam_json),
            Part::File("image", "cover.png", b"\x89PNG\r\n\x1a\n"),
        ],
    )
    .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::CREATED);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["data"]["topics"].as_array().unwrap().len(), 2);
    assert!(body["data"]["cover_photo"].as_str().unwrap().ends_with(".png"));
    let exam_id = body["data"]["id"].as_str().unwrap().to_string();
    let choice_id = body["data"]["topics"][0]["questions"][0]["choices"][0]["id"]
        .as_str()
        .unwrap()
        .to_string();

    let req = test::TestRequest::get()
        .uri(&format!("/api/v1/exams/{exam_id}"))
        .insert_header(bearer(&owner_token))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);

    // 非所有者看到的是 404
    let req = test::TestRequest::get()
        .uri(&format!("/api/v1/exams/{exam_id}"))
        .insert_header(bearer(&other_token))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["code"], ErrorCode::ExamNotFound as i32);

    let req = test::TestRequest::get()
        .uri("/api/v1/exams")
        .insert_header(bearer(&other_token))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = test::read_body_json(resp).await;
    assert!(body["data"]["items"].as_array().unwrap().is_empty());

    let req = test::TestRequest::get()
        .uri("/api/v1/exams/not-a-uuid")
        .insert_header(bearer(&owner_token))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let req = multipart_request(
        actix_web::http::Method::PATCH,
        &format!("/api/v1/exams/{exam_id}"),
        Some(&other_token),
        &[Part::Json("exam", json!({"title": "Stolen"}).to_string())],
    )
    .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);

    let req = multipart_request(
        actix_web::http::Method::PATCH,
        &format!("/api/v1/exams/{exam_id}"),
        Some(&owner_token),
        &[Part::Json("exam", json!({"title": "Renamed"}).to_string())],
    )
    .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["data"]["title"], "Renamed");
    assert_eq!(body["data"]["topics"].as_array().unwrap().len(), 2);

    let req = test::TestRequest::delete()
        .uri(&format!("/api/v1/exams/choices/{choice_id}"))
        .insert_header(bearer(&other_token))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);

    let req = test::TestRequest::delete()
        .uri(&format!("/api/v1/exams/choices/{choice_id}"))
        .insert_header(bearer(&owner_token))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NO_CONTENT);

    let req = test::TestRequest::delete()
        .uri(&format!("/api/v1/exams/choices/{choice_id}"))
        .insert_header(bearer(&owner_token))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["message"], "Choice not found");
    assert_eq!(body["code"], ErrorCode::ExamNodeNotFound as i32);

    let req = test::TestRequest::delete()
        .uri(&format!("/api/v1/exams/{exam_id}"))
        .insert_header(bearer(&owner_token))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NO_CONTENT);

    let _ = std::fs::remove_dir_all(&ctx.upload_dir);
}

#[actix_web::test]
async fn test_exam_request_approval_flow() {
    let ctx = setup().await;
    let owner = create_principal(&ctx, PrincipalKind::Examiner, "owner@example.com").await;
    let other = create_principal(&ctx, PrincipalKind::Examiner, "other@example.com").await;
    let examinee = create_principal(&ctx, PrincipalKind::Examinee, "taker@example.com").await;
    let exam = ctx
        .storage
        .create_exam(owner.id(), serde_json::from_value(sample_exam_json()).unwrap())
        .await
        .unwrap();
    let owner_token = token_for(&ctx, &owner);
    let other_token = token_for(&ctx, &other);
    let examinee_token = token_for(&ctx, &examinee);
    let app = test_app!(ctx);

    // 考官不能申请考试
    let req = test::TestRequest::post()
        .uri("/api/v1/exam-requests")
        .insert_header(bearer(&owner_token))
        .set_json(json!({"exam_id": exam.id}))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);

    let req = test::TestRequest::post()
        .uri("/api/v1/exam-requests")
        .insert_header(bearer(&examinee_token))
        .set_json(json!({"exam_id": exam.id}))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::CREATED);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["data"]["status"], "Pending");
    let request_id = body["data"]["id"].as_str().unwrap().to_string();

    let req = test::TestRequest::post()
        .uri("/api/v1/exam-requests")
        .insert_header(bearer(&examinee_token))
        .set_json(json!({"exam_id": exam.id}))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["message"], "You have already requested this exam.");
    assert_eq!(body["code"], ErrorCode::ExamRequestAlreadyExists as i32);

    let req = test::TestRequest::get()
        .uri("/api/v1/exam-requests")
        .insert_header(bearer(&owner_token))
        .to_request();
    let resp = test::call_service(&app, req).await;
    let body: Value = test::read_body_json(resp).await;
    let items = body["data"]["items"].as_array().unwrap();
    assert_eq!(items.len(), 1);
    assert_eq!(items[0]["exam"]["title"], "Mathematics Midterm");
    assert_eq!(items[0]["examinee"]["email"], "taker@example.com");

    let req = test::TestRequest::get()
        .uri("/api/v1/exam-requests")
        .insert_header(bearer(&other_token))
        .to_request();
    let resp = test::call_service(&app, req).await;
    let body: Value = test::read_body_json(resp).await;
    assert!(body["data"]["items"].as_array().unwrap().is_empty());

    let req = test::TestRequest::get()
        .uri(&format!("/api/v1/exam-requests/{request_id}"))
        .insert_header(bearer(&other_token))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);

    let req = test::TestRequest::get()
        .uri(&format!("/api/v1/exam-requests/{request_id}"))
        .insert_header(bearer(&examinee_token))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);

    // 考生不能批准
    let req = test::TestRequest::put()
        .uri(&format!("/api/v1/exam-requests/{request_id}"))
        .insert_header(bearer(&examinee_token))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);

    let req = test::TestRequest::put()
        .uri(&format!("/api/v1/exam-requests/{request_id}"))
        .insert_header(bearer(&other_token))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);

    let req = test::TestRequest::put()
        .uri(&format!("/api/v1/exam-requests/{request_id}"))
        .insert_header(bearer(&owner_token))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["data"]["exam_ids"], json!([exam.id]));

    let req = test::TestRequest::put()
        .uri(&format!("/api/v1/exam-requests/{request_id}"))
        .insert_header(bearer(&owner_token))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["message"], "This exam request has already been approved.");
    assert_eq!(body["code"], ErrorCode::ExamRequestAlreadyApproved as i32);

    let enrollment = ctx
        .storage
        .get_enrollment(examinee.id(), exam.id)
        .await
        .unwrap()
        .unwrap();
    assert!(enrollment.is_approved);

    let req = test::TestRequest::get()
        .uri(&format!("/api/v1/examinees/{}", examinee.id()))
        .insert_header(bearer(&examinee_token))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["data"]["exam_ids"], json!([exam.id]));

    let req = test::TestRequest::delete()
        .uri(&format!("/api/v1/exam-requests/{request_id}"))
        .insert_header(bearer(&other_token))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);

    let req = test::TestRequest::delete()
        .uri(&format!("/api/v1/exam-requests/{request_id}"))
        .insert_header(bearer(&owner_token))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NO_CONTENT);

    let req = test::TestRequest::get()
        .uri(&format!("/api/v1/exam-requests/{request_id}"))
        .insert_header(bearer(&owner_token))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[actix_web::test]
async fn test_principal_access_rules() {
    let ctx = setup().await;
    let admin = create_principal(&ctx, PrincipalKind::Administrator, "root@example.com").await;
    let examiner = create_principal(&ctx, PrincipalKind::Examiner, "owner@example.com").await;
    let examinee = create_principal(&ctx, PrincipalKind::Examinee, "taker@example.com").await;
    let admin_token = token_for(&ctx, &admin);
    let examiner_token = token_for(&ctx, &examiner);
    let examinee_token = token_for(&ctx, &examinee);
    let app = test_app!(ctx);

    let new_admin = json!({
        "email": "second@example.com",
        "password": PASSWORD,
        "first_name": "Second",
        "last_name": "Admin"
    })
    .to_string();

    let req = multipart_request(
        actix_web::http::Method::POST,
        "/api/v1/admins",
        None,
        &[Part::Json("admin", new_admin.clone())],
    )
    .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);

    let req = multipart_request(
        actix_web::http::Method::POST,
        "/api/v1/admins",
        Some(&examiner_token),
        &[Part::Json("admin", new_admin.clone())],
    )
    .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);

    let req = multipart_request(
        actix_web::http::Method::POST,
        "/api/v1/admins",
        Some(&admin_token),
        &[Part::Json("admin", new_admin)],
    )
    .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::CREATED);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["data"]["user_type"], "Admin");

    // 考生不能列出考生
    let req = test::TestRequest::get()
        .uri("/api/v1/examinees")
        .insert_header(bearer(&examinee_token))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);

    let req = test::TestRequest::get()
        .uri("/api/v1/examinees")
        .insert_header(bearer(&examiner_token))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["data"]["items"].as_array().unwrap().len(), 1);

    // 只能访问自己
    let req = test::TestRequest::get()
        .uri(&format!("/api/v1/examinees/{}", examinee.id()))
        .insert_header(bearer(&examiner_token))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);

    // 非管理员不能修改状态
    let req = multipart_request(
        actix_web::http::Method::PATCH,
        &format!("/api/v1/examinees/{}", examinee.id()),
        Some(&examinee_token),
        &[Part::Json("examinee", json!({"status": "Active"}).to_string())],
    )
    .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);

    let req = multipart_request(
        actix_web::http::Method::PATCH,
        &format!("/api/v1/examinees/{}", examinee.id()),
        Some(&admin_token),
        &[Part::Json("examinee", json!({"status": "Active"}).to_string())],
    )
    .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["data"]["status"], "Active");

    let req = test::TestRequest::delete()
        .uri(&format!("/api/v1/examinees/{}", examinee.id()))
        .insert_header(bearer(&admin_token))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NO_CONTENT);

    let req = test::TestRequest::get()
        .uri(&format!("/api/v1/examinees/{}", examinee.id()))
        .insert_header(bearer(&admin_token))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}
