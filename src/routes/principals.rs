use actix_multipart::Multipart;
use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use once_cell::sync::Lazy;

use crate::middlewares::{self, RequireRole};
use crate::models::principals::entities::PrincipalKind;
use crate::services::PrincipalService;
use crate::utils::SafePrincipalId;

// 懒加载的全局 PrincipalService 实例
static PRINCIPAL_SERVICE: Lazy<PrincipalService> = Lazy::new(PrincipalService::new_lazy);

// 主体类型由所在 scope 的 app_data 决定
pub async fn list_principals(
    req: HttpRequest,
    kind: web::Data<PrincipalKind>,
) -> ActixResult<HttpResponse> {
    PRINCIPAL_SERVICE.list_principals(**kind, &req).await
}

pub async fn create_principal(
    req: HttpRequest,
    kind: web::Data<PrincipalKind>,
    payload: Multipart,
) -> ActixResult<HttpResponse> {
    PRINCIPAL_SERVICE
        .create_principal(**kind, payload, &req)
        .await
}

pub async fn get_principal(
    req: HttpRequest,
    kind: web::Data<PrincipalKind>,
    path: SafePrincipalId,
) -> ActixResult<HttpResponse> {
    PRINCIPAL_SERVICE.get_principal(**kind, path.0, &req).await
}

pub async fn update_principal(
    req: HttpRequest,
    kind: web::Data<PrincipalKind>,
    path: SafePrincipalId,
    payload: Multipart,
) -> ActixResult<HttpResponse> {
    PRINCIPAL_SERVICE
        .update_principal(**kind, path.0, payload, &req)
        .await
}

pub async fn delete_principal(
    req: HttpRequest,
    kind: web::Data<PrincipalKind>,
    path: SafePrincipalId,
) -> ActixResult<HttpResponse> {
    PRINCIPAL_SERVICE
        .delete_principal(**kind, path.0, &req)
        .await
}

fn principal_scope(path: &str, kind: PrincipalKind) -> actix_web::Scope {
    // 考生和考官注册公开，管理员只能由管理员创建
    let create = if kind == PrincipalKind::Administrator {
        web::post()
            .to(create_principal)
            .wrap(RequireRole::new(PrincipalKind::Administrator))
            .wrap(middlewares::RequireJWT)
    } else {
        web::post().to(create_principal)
    };

    web::scope(path)
        .app_data(web::Data::new(kind))
        .service(
            web::resource("")
                .route(create)
                // 列表 - 仅管理员和考官
                .route(
                    web::get()
                        .to(list_principals)
                        .wrap(RequireRole::new_any(&[
                            PrincipalKind::Administrator,
                            PrincipalKind::Examiner,
                        ]))
                        .wrap(middlewares::RequireJWT),
                ),
        )
        .service(
            web::resource("/{id}")
                // 本人或管理员，业务层检查
                .wrap(middlewares::RequireJWT)
                .route(web::get().to(get_principal))
                .route(web::patch().to(update_principal))
                .route(web::delete().to(delete_principal)),
        )
}

// 配置路由
pub fn configure_principals_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(principal_scope("/api/v1/examinees", PrincipalKind::Examinee))
        .service(principal_scope("/api/v1/examiners", PrincipalKind::Examiner))
        .service(principal_scope("/api/v1/admins", PrincipalKind::Administrator));
}
