use actix_web::{HttpRequest, HttpResponse, ResponseError, Result, web};
use serde_json::json;

use super::auth_context;
use crate::models::*;
use crate::services::NotificationService;

#[utoipa::path(
    get,
    path = "/restaurants/{id}/notifications",
    tag = "notification",
    params(
        ("id" = i64, Path, description = "餐厅ID"),
        ("unread_only" = Option<bool>, Query, description = "只看未读")
    ),
    security(("bearer_auth" = [])),
    responses((status = 200, description = "通知列表（新的在前）", body = [NotificationResponse]))
)]
pub async fn list_notifications(
    notification_service: web::Data<NotificationService>,
    req: HttpRequest,
    path: web::Path<i64>,
    query: web::Query<NotificationQuery>,
) -> Result<HttpResponse> {
    let restaurant_id = path.into_inner();
    auth_context(&req)?.ensure_restaurant_access(restaurant_id)?;
    match notification_service
        .list(restaurant_id, query.unread_only.unwrap_or(false))
        .await
    {
        Ok(list) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "data": list
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    get,
    path = "/restaurants/{id}/notifications/unread-count",
    tag = "notification",
    params(("id" = i64, Path, description = "餐厅ID")),
    security(("bearer_auth" = [])),
    responses((status = 200, description = "未读数量", body = UnreadCountResponse))
)]
pub async fn unread_count(
    notification_service: web::Data<NotificationService>,
    req: HttpRequest,
    path: web::Path<i64>,
) -> Result<HttpResponse> {
    let restaurant_id = path.into_inner();
    auth_context(&req)?.ensure_restaurant_access(restaurant_id)?;
    match notification_service.unread_count(restaurant_id).await {
        Ok(unread) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "data": UnreadCountResponse { unread }
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    post,
    path = "/notifications/{id}/read",
    tag = "notification",
    params(("id" = i64, Path, description = "通知ID")),
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "已读", body = NotificationResponse),
        (status = 404, description = "通知不存在")
    )
)]
pub async fn mark_read(
    notification_service: web::Data<NotificationService>,
    req: HttpRequest,
    path: web::Path<i64>,
) -> Result<HttpResponse> {
    let ctx = auth_context(&req)?;
    match notification_service.mark_read(&ctx, path.into_inner()).await {
        Ok(notification) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "data": notification
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    post,
    path = "/restaurants/{id}/notifications/read-all",
    tag = "notification",
    params(("id" = i64, Path, description = "餐厅ID")),
    security(("bearer_auth" = [])),
    responses((status = 200, description = "全部标记已读"))
)]
pub async fn mark_all_read(
    notification_service: web::Data<NotificationService>,
    req: HttpRequest,
    path: web::Path<i64>,
) -> Result<HttpResponse> {
    let restaurant_id = path.into_inner();
    auth_context(&req)?.ensure_restaurant_access(restaurant_id)?;
    match notification_service.mark_all_read(restaurant_id).await {
        Ok(updated) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "data": { "updated": updated }
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    delete,
    path = "/restaurants/{id}/notifications",
    tag = "notification",
    params(("id" = i64, Path, description = "餐厅ID")),
    security(("bearer_auth" = [])),
    responses((status = 200, description = "全部删除"))
)]
pub async fn delete_all(
    notification_service: web::Data<NotificationService>,
    req: HttpRequest,
    path: web::Path<i64>,
) -> Result<HttpResponse> {
    let restaurant_id = path.into_inner();
    auth_context(&req)?.ensure_restaurant_access(restaurant_id)?;
    match notification_service.delete_all(restaurant_id).await {
        Ok(deleted) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "data": { "deleted": deleted }
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    post,
    path = "/restaurants/{id}/notifications/evaluate",
    tag = "notification",
    params(("id" = i64, Path, description = "餐厅ID")),
    security(("bearer_auth" = [])),
    responses((status = 200, description = "运行奖品趋势 / 不活跃 / 里程碑检查", body = EvaluationResponse))
)]
pub async fn evaluate(
    notification_service: web::Data<NotificationService>,
    req: HttpRequest,
    path: web::Path<i64>,
) -> Result<HttpResponse> {
    let restaurant_id = path.into_inner();
    auth_context(&req)?.ensure_restaurant_access(restaurant_id)?;
    match notification_service.evaluate(restaurant_id).await {
        Ok(result) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "data": result
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

pub fn notification_config(cfg: &mut web::ServiceConfig) {
    cfg.service(web::scope("/notifications").route("/{id}/read", web::post().to(mark_read)));
}
