use actix_web::{HttpRequest, HttpResponse, ResponseError, Result, web};
use serde_json::json;

use super::{auth_context, lead, metric, notification, prize};
use crate::models::*;
use crate::services::RestaurantService;

#[utoipa::path(
    get,
    path = "/restaurants",
    tag = "restaurant",
    security(("bearer_auth" = [])),
    responses((status = 200, description = "餐厅列表（老板只看到自己的）", body = [RestaurantResponse]))
)]
pub async fn list_restaurants(
    restaurant_service: web::Data<RestaurantService>,
    req: HttpRequest,
) -> Result<HttpResponse> {
    let ctx = auth_context(&req)?;
    match restaurant_service.list(&ctx).await {
        Ok(list) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "data": list
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    post,
    path = "/restaurants",
    tag = "restaurant",
    request_body = CreateRestaurantRequest,
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "餐厅与老板账号已创建", body = CreateRestaurantResponse),
        (status = 400, description = "请求参数错误 / slug 或邮箱已占用"),
        (status = 403, description = "仅超级管理员")
    )
)]
pub async fn create_restaurant(
    restaurant_service: web::Data<RestaurantService>,
    req: HttpRequest,
    request: web::Json<CreateRestaurantRequest>,
) -> Result<HttpResponse> {
    let ctx = auth_context(&req)?;
    match restaurant_service.create(&ctx, request.into_inner()).await {
        Ok(created) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "data": created
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    get,
    path = "/restaurants/{id}",
    tag = "restaurant",
    params(("id" = i64, Path, description = "餐厅ID")),
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "餐厅详情", body = RestaurantResponse),
        (status = 404, description = "餐厅不存在")
    )
)]
pub async fn get_restaurant(
    restaurant_service: web::Data<RestaurantService>,
    req: HttpRequest,
    path: web::Path<i64>,
) -> Result<HttpResponse> {
    let ctx = auth_context(&req)?;
    match restaurant_service.get(&ctx, path.into_inner()).await {
        Ok(restaurant) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "data": restaurant
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    put,
    path = "/restaurants/{id}",
    tag = "restaurant",
    params(("id" = i64, Path, description = "餐厅ID")),
    request_body = UpdateRestaurantRequest,
    security(("bearer_auth" = [])),
    responses((status = 200, description = "已更新", body = RestaurantResponse))
)]
pub async fn update_restaurant(
    restaurant_service: web::Data<RestaurantService>,
    req: HttpRequest,
    path: web::Path<i64>,
    request: web::Json<UpdateRestaurantRequest>,
) -> Result<HttpResponse> {
    let ctx = auth_context(&req)?;
    match restaurant_service
        .update(&ctx, path.into_inner(), request.into_inner())
        .await
    {
        Ok(restaurant) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "data": restaurant
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    post,
    path = "/restaurants/{id}/toggle-status",
    tag = "restaurant",
    params(("id" = i64, Path, description = "餐厅ID")),
    security(("bearer_auth" = [])),
    responses((status = 200, description = "active / paused 已切换", body = RestaurantResponse))
)]
pub async fn toggle_status(
    restaurant_service: web::Data<RestaurantService>,
    req: HttpRequest,
    path: web::Path<i64>,
) -> Result<HttpResponse> {
    let ctx = auth_context(&req)?;
    match restaurant_service
        .toggle_status(&ctx, path.into_inner())
        .await
    {
        Ok(restaurant) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "data": restaurant
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    delete,
    path = "/restaurants/{id}",
    tag = "restaurant",
    params(("id" = i64, Path, description = "餐厅ID")),
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "已删除"),
        (status = 400, description = "仍有奖品或留资")
    )
)]
pub async fn delete_restaurant(
    restaurant_service: web::Data<RestaurantService>,
    req: HttpRequest,
    path: web::Path<i64>,
) -> Result<HttpResponse> {
    let ctx = auth_context(&req)?;
    match restaurant_service.delete(&ctx, path.into_inner()).await {
        Ok(()) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "message": "Restaurant deleted"
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

/// /restaurants/{id}/... 下的所有子资源都注册在同一个 scope
pub fn restaurant_config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/restaurants")
            .route("", web::get().to(list_restaurants))
            .route("", web::post().to(create_restaurant))
            .route("/{id}", web::get().to(get_restaurant))
            .route("/{id}", web::put().to(update_restaurant))
            .route("/{id}", web::delete().to(delete_restaurant))
            .route("/{id}/toggle-status", web::post().to(toggle_status))
            .route("/{id}/webhook/test", web::post().to(lead::test_webhook))
            .route("/{id}/prizes", web::get().to(prize::list_prizes))
            .route("/{id}/prizes", web::post().to(prize::create_prize))
            .route("/{id}/leads", web::get().to(lead::list_restaurant_leads))
            .route("/{id}/leads/report", web::get().to(lead::lead_report))
            .route(
                "/{id}/leads/remarketing-today",
                web::get().to(lead::remarketing_today),
            )
            .route("/{id}/leads/send-coupons", web::post().to(lead::send_coupons))
            .route("/{id}/metrics", web::get().to(metric::restaurant_metrics))
            .route(
                "/{id}/notifications",
                web::get().to(notification::list_notifications),
            )
            .route(
                "/{id}/notifications",
                web::delete().to(notification::delete_all),
            )
            .route(
                "/{id}/notifications/unread-count",
                web::get().to(notification::unread_count),
            )
            .route(
                "/{id}/notifications/read-all",
                web::post().to(notification::mark_all_read),
            )
            .route(
                "/{id}/notifications/evaluate",
                web::post().to(notification::evaluate),
            ),
    );
}
