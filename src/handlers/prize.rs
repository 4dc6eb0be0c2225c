use actix_web::{HttpRequest, HttpResponse, ResponseError, Result, web};
use serde_json::json;

use super::auth_context;
use crate::models::*;
use crate::services::PrizeService;

#[utoipa::path(
    get,
    path = "/restaurants/{id}/prizes",
    tag = "prize",
    params(("id" = i64, Path, description = "餐厅ID")),
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "奖品列表", body = [PrizeResponse]),
        (status = 403, description = "无权访问该餐厅")
    )
)]
pub async fn list_prizes(
    prize_service: web::Data<PrizeService>,
    req: HttpRequest,
    path: web::Path<i64>,
) -> Result<HttpResponse> {
    let ctx = auth_context(&req)?;
    match prize_service.list(&ctx, path.into_inner()).await {
        Ok(list) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "data": list
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    post,
    path = "/restaurants/{id}/prizes",
    tag = "prize",
    params(("id" = i64, Path, description = "餐厅ID")),
    request_body = CreatePrizeRequest,
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "奖品已创建", body = PrizeResponse),
        (status = 400, description = "请求参数错误")
    )
)]
pub async fn create_prize(
    prize_service: web::Data<PrizeService>,
    req: HttpRequest,
    path: web::Path<i64>,
    request: web::Json<CreatePrizeRequest>,
) -> Result<HttpResponse> {
    let ctx = auth_context(&req)?;
    match prize_service
        .create(&ctx, path.into_inner(), request.into_inner())
        .await
    {
        Ok(prize) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "data": prize
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    put,
    path = "/prizes/{id}",
    tag = "prize",
    params(("id" = i64, Path, description = "奖品ID")),
    request_body = UpdatePrizeRequest,
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "奖品已更新", body = PrizeResponse),
        (status = 404, description = "奖品不存在")
    )
)]
pub async fn update_prize(
    prize_service: web::Data<PrizeService>,
    req: HttpRequest,
    path: web::Path<i64>,
    request: web::Json<UpdatePrizeRequest>,
) -> Result<HttpResponse> {
    let ctx = auth_context(&req)?;
    match prize_service
        .update(&ctx, path.into_inner(), request.into_inner())
        .await
    {
        Ok(prize) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "data": prize
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    delete,
    path = "/prizes/{id}",
    tag = "prize",
    params(("id" = i64, Path, description = "奖品ID")),
    security(("bearer_auth" = [])),
    responses((status = 200, description = "奖品已删除"), (status = 404, description = "奖品不存在"))
)]
pub async fn delete_prize(
    prize_service: web::Data<PrizeService>,
    req: HttpRequest,
    path: web::Path<i64>,
) -> Result<HttpResponse> {
    let ctx = auth_context(&req)?;
    match prize_service.delete(&ctx, path.into_inner()).await {
        Ok(()) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "message": "Prize deleted"
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

pub fn prize_config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/prizes")
            .route("/{id}", web::put().to(update_prize))
            .route("/{id}", web::delete().to(delete_prize)),
    );
}
