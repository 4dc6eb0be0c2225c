use actix_web::{HttpRequest, HttpResponse, ResponseError, Result, web};
use serde_json::json;

use super::auth_context;
use crate::models::*;
use crate::services::{LeadService, RemarketingService};

#[utoipa::path(
    get,
    path = "/restaurants/{id}/leads",
    tag = "lead",
    params(
        ("id" = i64, Path, description = "餐厅ID"),
        ("search" = Option<String>, Query, description = "姓名 / 电话 / 奖品"),
        ("status" = Option<LeadStatusFilter>, Query, description = "all | contacted | pending"),
        ("prize" = Option<String>, Query, description = "奖品名称"),
        ("sort" = Option<LeadSort>, Query, description = "-created_at | created_at | name | -name"),
        ("page" = Option<u32>, Query, description = "页码"),
        ("per_page" = Option<u32>, Query, description = "每页数量")
    ),
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "留资列表"),
        (status = 403, description = "无权访问该餐厅")
    )
)]
pub async fn list_restaurant_leads(
    lead_service: web::Data<LeadService>,
    req: HttpRequest,
    path: web::Path<i64>,
    query: web::Query<LeadQuery>,
) -> Result<HttpResponse> {
    let ctx = auth_context(&req)?;
    match lead_service
        .list(&ctx, Some(path.into_inner()), &query)
        .await
    {
        Ok(page) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "data": page
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    get,
    path = "/leads",
    tag = "lead",
    params(
        ("search" = Option<String>, Query, description = "姓名 / 电话 / 奖品"),
        ("status" = Option<LeadStatusFilter>, Query, description = "all | contacted | pending"),
        ("page" = Option<u32>, Query, description = "页码"),
        ("per_page" = Option<u32>, Query, description = "每页数量")
    ),
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "全部餐厅的留资"),
        (status = 403, description = "仅超级管理员")
    )
)]
pub async fn list_all_leads(
    lead_service: web::Data<LeadService>,
    req: HttpRequest,
    query: web::Query<LeadQuery>,
) -> Result<HttpResponse> {
    let ctx = auth_context(&req)?;
    match lead_service.list(&ctx, None, &query).await {
        Ok(page) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "data": page
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    get,
    path = "/leads/{id}",
    tag = "lead",
    params(("id" = i64, Path, description = "留资ID")),
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "留资详情", body = LeadResponse),
        (status = 404, description = "留资不存在")
    )
)]
pub async fn get_lead(
    lead_service: web::Data<LeadService>,
    req: HttpRequest,
    path: web::Path<i64>,
) -> Result<HttpResponse> {
    let ctx = auth_context(&req)?;
    match lead_service.get(&ctx, path.into_inner()).await {
        Ok(lead) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "data": lead
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    delete,
    path = "/leads/{id}",
    tag = "lead",
    params(("id" = i64, Path, description = "留资ID")),
    security(("bearer_auth" = [])),
    responses((status = 200, description = "已删除"), (status = 404, description = "留资不存在"))
)]
pub async fn delete_lead(
    lead_service: web::Data<LeadService>,
    req: HttpRequest,
    path: web::Path<i64>,
) -> Result<HttpResponse> {
    let ctx = auth_context(&req)?;
    match lead_service.delete(&ctx, path.into_inner()).await {
        Ok(()) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "message": "Lead deleted"
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    post,
    path = "/leads/{id}/contact",
    tag = "lead",
    params(("id" = i64, Path, description = "留资ID")),
    request_body = ContactLeadRequest,
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "已标记联系，返回 WhatsApp 链接", body = ContactLink),
        (status = 400, description = "消息为空")
    )
)]
pub async fn contact_lead(
    lead_service: web::Data<LeadService>,
    req: HttpRequest,
    path: web::Path<i64>,
    request: web::Json<ContactLeadRequest>,
) -> Result<HttpResponse> {
    let ctx = auth_context(&req)?;
    match lead_service
        .mark_contacted(&ctx, path.into_inner(), &request.message)
        .await
    {
        Ok(link) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "data": link
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    post,
    path = "/restaurants/{id}/leads/send-coupons",
    tag = "lead",
    params(("id" = i64, Path, description = "餐厅ID")),
    request_body = SendCouponsRequest,
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "每个留资一条 WhatsApp 链接", body = [ContactLink]),
        (status = 400, description = "请求参数错误")
    )
)]
pub async fn send_coupons(
    lead_service: web::Data<LeadService>,
    req: HttpRequest,
    path: web::Path<i64>,
    request: web::Json<SendCouponsRequest>,
) -> Result<HttpResponse> {
    let ctx = auth_context(&req)?;
    match lead_service
        .send_coupons(&ctx, path.into_inner(), &request)
        .await
    {
        Ok(links) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "data": links
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    put,
    path = "/leads/{id}/remarketing-date",
    tag = "lead",
    params(("id" = i64, Path, description = "留资ID")),
    request_body = RemarketingDateRequest,
    security(("bearer_auth" = [])),
    responses((status = 200, description = "已更新", body = LeadResponse))
)]
pub async fn set_remarketing_date(
    lead_service: web::Data<LeadService>,
    req: HttpRequest,
    path: web::Path<i64>,
    request: web::Json<RemarketingDateRequest>,
) -> Result<HttpResponse> {
    let ctx = auth_context(&req)?;
    match lead_service
        .set_remarketing_date(&ctx, path.into_inner(), request.date)
        .await
    {
        Ok(lead) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "data": lead
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    get,
    path = "/restaurants/{id}/leads/remarketing-today",
    tag = "lead",
    params(("id" = i64, Path, description = "餐厅ID")),
    security(("bearer_auth" = [])),
    responses((status = 200, description = "今天需要再营销的留资", body = [LeadResponse]))
)]
pub async fn remarketing_today(
    lead_service: web::Data<LeadService>,
    req: HttpRequest,
    path: web::Path<i64>,
) -> Result<HttpResponse> {
    let ctx = auth_context(&req)?;
    match lead_service.remarketing_today(&ctx, path.into_inner()).await {
        Ok(list) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "data": list
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    get,
    path = "/restaurants/{id}/leads/report",
    tag = "lead",
    params(("id" = i64, Path, description = "餐厅ID")),
    security(("bearer_auth" = [])),
    responses((status = 200, description = "偏好统计", body = LeadReport))
)]
pub async fn lead_report(
    lead_service: web::Data<LeadService>,
    req: HttpRequest,
    path: web::Path<i64>,
) -> Result<HttpResponse> {
    let ctx = auth_context(&req)?;
    match lead_service.report(&ctx, path.into_inner()).await {
        Ok(report) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "data": report
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    get,
    path = "/leads/{id}/deliveries",
    tag = "lead",
    params(("id" = i64, Path, description = "留资ID")),
    security(("bearer_auth" = [])),
    responses((status = 200, description = "优惠券投递记录", body = [CouponDeliveryResponse]))
)]
pub async fn lead_deliveries(
    lead_service: web::Data<LeadService>,
    req: HttpRequest,
    path: web::Path<i64>,
) -> Result<HttpResponse> {
    let ctx = auth_context(&req)?;
    match lead_service.deliveries(&ctx, path.into_inner()).await {
        Ok(list) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "data": list
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    post,
    path = "/restaurants/{id}/webhook/test",
    tag = "lead",
    params(("id" = i64, Path, description = "餐厅ID")),
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "测试投递结果", body = WebhookTestResponse),
        (status = 400, description = "未配置 webhook")
    )
)]
pub async fn test_webhook(
    lead_service: web::Data<LeadService>,
    req: HttpRequest,
    path: web::Path<i64>,
) -> Result<HttpResponse> {
    let ctx = auth_context(&req)?;
    match lead_service
        .test_restaurant_webhook(&ctx, path.into_inner())
        .await
    {
        Ok(result) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "data": result
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    post,
    path = "/leads/{id}/remarketing/scripts",
    tag = "lead",
    params(("id" = i64, Path, description = "留资ID")),
    request_body = GenerateScriptsRequest,
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "三种语气的文案", body = RemarketingScripts),
        (status = 400, description = "参数缺失或未配置 AI"),
        (status = 502, description = "AI 服务失败")
    )
)]
pub async fn generate_scripts(
    remarketing_service: web::Data<RemarketingService>,
    req: HttpRequest,
    path: web::Path<i64>,
    request: web::Json<GenerateScriptsRequest>,
) -> Result<HttpResponse> {
    let ctx = auth_context(&req)?;
    match remarketing_service
        .generate_scripts(&ctx, path.into_inner(), &request)
        .await
    {
        Ok(scripts) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "data": scripts
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

pub fn lead_config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/leads")
            .route("", web::get().to(list_all_leads))
            .route("/{id}", web::get().to(get_lead))
            .route("/{id}", web::delete().to(delete_lead))
            .route("/{id}/contact", web::post().to(contact_lead))
            .route("/{id}/remarketing-date", web::put().to(set_remarketing_date))
            .route("/{id}/deliveries", web::get().to(lead_deliveries))
            .route("/{id}/remarketing/scripts", web::post().to(generate_scripts)),
    );
}
