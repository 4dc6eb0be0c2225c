use actix_web::{HttpRequest, HttpResponse, ResponseError, Result, web};
use serde_json::json;

use super::auth_context;
use crate::models::*;
use crate::services::MetricsService;

const DEFAULT_DAYS: u32 = 30;

#[utoipa::path(
    get,
    path = "/restaurants/{id}/metrics",
    tag = "metric",
    params(
        ("id" = i64, Path, description = "餐厅ID"),
        ("days" = Option<u32>, Query, description = "最近 N 天，默认 30")
    ),
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "累计与每日统计", body = MetricsSummary),
        (status = 403, description = "无权访问该餐厅")
    )
)]
pub async fn restaurant_metrics(
    metrics_service: web::Data<MetricsService>,
    req: HttpRequest,
    path: web::Path<i64>,
    query: web::Query<MetricQuery>,
) -> Result<HttpResponse> {
    let ctx = auth_context(&req)?;
    let restaurant_id = path.into_inner();
    ctx.ensure_restaurant_access(restaurant_id)?;

    match metrics_service
        .summary(restaurant_id, query.days.unwrap_or(DEFAULT_DAYS))
        .await
    {
        Ok(summary) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "data": summary
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    get,
    path = "/metrics/overview",
    tag = "metric",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "全平台统计", body = GlobalOverview),
        (status = 403, description = "仅超级管理员")
    )
)]
pub async fn global_overview(
    metrics_service: web::Data<MetricsService>,
    req: HttpRequest,
) -> Result<HttpResponse> {
    auth_context(&req)?.require_super_admin()?;
    match metrics_service.global_overview().await {
        Ok(overview) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "data": overview
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

pub fn metric_config(cfg: &mut web::ServiceConfig) {
    cfg.service(web::scope("/metrics").route("/overview", web::get().to(global_overview)));
}
