use actix_multipart::Multipart;
use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use once_cell::sync::Lazy;

use crate::middlewares::{self, RequireRole};
use crate::models::principals::entities::PrincipalKind;
use crate::services::ExamService;
use crate::storage::ExamNode;
use crate::utils::{SafeChoiceId, SafeExamId, SafeQuestionId, SafeTopicId};

// 懒加载的全局 ExamService 实例
static EXAM_SERVICE: Lazy<ExamService> = Lazy::new(ExamService::new_lazy);

pub async fn list_exams(req: HttpRequest) -> ActixResult<HttpResponse> {
    EXAM_SERVICE.list_exams(&req).await
}

pub async fn create_exam(req: HttpRequest, payload: Multipart) -> ActixResult<HttpResponse> {
    EXAM_SERVICE.create_exam(payload, &req).await
}

pub async fn get_exam(req: HttpRequest, path: SafeExamId) -> ActixResult<HttpResponse> {
    EXAM_SERVICE.get_exam(path.0, &req).await
}

pub async fn update_exam(
    req: HttpRequest,
    path: SafeExamId,
    payload: Multipart,
) -> ActixResult<HttpResponse> {
    EXAM_SERVICE.update_exam(path.0, payload, &req).await
}

pub async fn delete_exam(req: HttpRequest, path: SafeExamId) -> ActixResult<HttpResponse> {
    EXAM_SERVICE.delete_exam(path.0, &req).await
}

pub async fn delete_topic(req: HttpRequest, path: SafeTopicId) -> ActixResult<HttpResponse> {
    EXAM_SERVICE
        .delete_exam_node(ExamNode::Topic(path.0), &req)
        .await
}

pub async fn delete_question(req: HttpRequest, path: SafeQuestionId) -> ActixResult<HttpResponse> {
    EXAM_SERVICE
        .delete_exam_node(ExamNode::Question(path.0), &req)
        .await
}

pub async fn delete_choice(req: HttpRequest, path: SafeChoiceId) -> ActixResult<HttpResponse> {
    EXAM_SERVICE
        .delete_exam_node(ExamNode::Choice(path.0), &req)
        .await
}

// 配置路由
pub fn configure_exams_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1/exams")
            .wrap(RequireRole::new(PrincipalKind::Examiner))
            .wrap(middlewares::RequireJWT)
            .service(
                web::resource("")
                    .route(web::get().to(list_exams))
                    .route(web::post().to(create_exam)),
            )
            // 固定前缀的节点路由放在 /{exam_id} 之前
            .service(web::resource("/topics/{topic_id}").route(web::delete().to(delete_topic)))
            .service(
                web::resource("/questions/{question_id}").route(web::delete().to(delete_question)),
            )
            .service(web::resource("/choices/{choice_id}").route(web::delete().to(delete_choice)))
            .service(
                web::resource("/{exam_id}")
                    .route(web::get().to(get_exam))
                    .route(web::patch().to(update_exam))
                    .route(web::delete().to(delete_exam)),
            ),
    );
}
