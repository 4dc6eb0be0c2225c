use actix_web::{HttpResponse, ResponseError, Result, web};
use serde_json::json;

use crate::models::*;
use crate::services::WheelService;

#[utoipa::path(
    get,
    path = "/wheel/{slug}",
    tag = "wheel",
    params(("slug" = String, Path, description = "餐厅 slug")),
    responses(
        (status = 200, description = "转盘数据", body = WheelResponse),
        (status = 404, description = "餐厅不存在")
    )
)]
pub async fn get_wheel(
    wheel_service: web::Data<WheelService>,
    path: web::Path<String>,
) -> Result<HttpResponse> {
    match wheel_service.view(&path).await {
        Ok(view) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "data": view
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    post,
    path = "/wheel/{slug}/spin",
    tag = "wheel",
    params(("slug" = String, Path, description = "餐厅 slug")),
    responses(
        (status = 200, description = "抽奖结果", body = SpinResponse),
        (status = 400, description = "转盘已暂停或没有奖品"),
        (status = 404, description = "餐厅不存在")
    )
)]
pub async fn spin(
    wheel_service: web::Data<WheelService>,
    path: web::Path<String>,
) -> Result<HttpResponse> {
    match wheel_service.spin(&path).await {
        Ok(result) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "data": result
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    post,
    path = "/wheel/{slug}/leads",
    tag = "wheel",
    params(("slug" = String, Path, description = "餐厅 slug")),
    request_body = SubmitLeadRequest,
    responses(
        (status = 200, description = "留资已保存", body = SubmitLeadResponse),
        (status = 400, description = "请求参数错误"),
        (status = 404, description = "餐厅不存在")
    )
)]
pub async fn submit_lead(
    wheel_service: web::Data<WheelService>,
    path: web::Path<String>,
    request: web::Json<SubmitLeadRequest>,
) -> Result<HttpResponse> {
    match wheel_service.submit_lead(&path, request.into_inner()).await {
        Ok(result) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "data": result
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

pub fn wheel_config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/wheel")
            .route("/{slug}", web::get().to(get_wheel))
            .route("/{slug}/spin", web::post().to(spin))
            .route("/{slug}/leads", web::post().to(submit_lead)),
    );
}
