use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use once_cell::sync::Lazy;

use crate::middlewares::{self, RequireRole};
use crate::models::exam_requests::requests::CreateExamRequestRequest;
use crate::models::principals::entities::PrincipalKind;
use crate::services::ExamRequestService;
use crate::utils::SafeExamRequestId;

// 懒加载的全局 ExamRequestService 实例
static EXAM_REQUEST_SERVICE: Lazy<ExamRequestService> =
    Lazy::new(ExamRequestService::new_lazy);

pub async fn list_exam_requests(req: HttpRequest) -> ActixResult<HttpResponse> {
    EXAM_REQUEST_SERVICE.list_exam_requests(&req).await
}

pub async fn get_exam_request(
    req: HttpRequest,
    path: SafeExamRequestId,
) -> ActixResult<HttpResponse> {
    EXAM_REQUEST_SERVICE.get_exam_request(path.0, &req).await
}

pub async fn create_exam_request(
    req: HttpRequest,
    body: web::Json<CreateExamRequestRequest>,
) -> ActixResult<HttpResponse> {
    EXAM_REQUEST_SERVICE
        .create_exam_request(body.into_inner(), &req)
        .await
}

pub async fn approve_exam_request(
    req: HttpRequest,
    path: SafeExamRequestId,
) -> ActixResult<HttpResponse> {
    EXAM_REQUEST_SERVICE
        .approve_exam_request(path.0, &req)
        .await
}

pub async fn delete_exam_request(
    req: HttpRequest,
    path: SafeExamRequestId,
) -> ActixResult<HttpResponse> {
    EXAM_REQUEST_SERVICE
        .delete_exam_request(path.0, &req)
        .await
}

// 配置路由
pub fn configure_exam_requests_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1/exam-requests")
            .wrap(middlewares::RequireJWT)
            .service(
                web::resource("")
                    // 列表 - 所有登录主体，业务层按类型过滤
                    .route(web::get().to(list_exam_requests))
                    // 申请考试 - 仅考生
                    .route(
                        web::post()
                            .to(create_exam_request)
                            .wrap(RequireRole::new(PrincipalKind::Examinee)),
                    ),
            )
            .service(
                web::resource("/{request_id}")
                    // 详情 - 业务层检查可见性
                    .route(web::get().to(get_exam_request))
                    // 批准 - 仅考官
                    .route(
                        web::put()
                            .to(approve_exam_request)
                            .wrap(RequireRole::new(PrincipalKind::Examiner)),
                    )
                    // 删除 - 仅考官
                    .route(
                        web::delete()
                            .to(delete_exam_request)
                            .wrap(RequireRole::new(PrincipalKind::Examiner)),
                    ),
            ),
    );
}
