use actix_web::{HttpRequest, HttpResponse, ResponseError, Result, web};
use serde_json::json;

use super::auth_context;
use crate::models::*;
use crate::services::FoodOptionService;

#[utoipa::path(
    get,
    path = "/food-options",
    tag = "food_option",
    security(("bearer_auth" = [])),
    responses((status = 200, description = "全部菜品选项", body = [FoodOptionResponse]))
)]
pub async fn list_food_options(service: web::Data<FoodOptionService>) -> Result<HttpResponse> {
    match service.list().await {
        Ok(list) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "data": list
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    post,
    path = "/food-options",
    tag = "food_option",
    request_body = CreateFoodOptionRequest,
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "已创建", body = FoodOptionResponse),
        (status = 400, description = "名称为空或重复")
    )
)]
pub async fn create_food_option(
    service: web::Data<FoodOptionService>,
    req: HttpRequest,
    request: web::Json<CreateFoodOptionRequest>,
) -> Result<HttpResponse> {
    let ctx = auth_context(&req)?;
    match service.create(&ctx, request.into_inner()).await {
        Ok(option) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "data": option
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    delete,
    path = "/food-options/{id}",
    tag = "food_option",
    params(("id" = i64, Path, description = "选项ID")),
    security(("bearer_auth" = [])),
    responses((status = 200, description = "已删除"), (status = 404, description = "不存在"))
)]
pub async fn delete_food_option(
    service: web::Data<FoodOptionService>,
    req: HttpRequest,
    path: web::Path<i64>,
) -> Result<HttpResponse> {
    let ctx = auth_context(&req)?;
    match service.delete(&ctx, path.into_inner()).await {
        Ok(()) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "message": "Food option deleted"
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

pub fn food_option_config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/food-options")
            .route("", web::get().to(list_food_options))
            .route("", web::post().to(create_food_option))
            .route("/{id}", web::delete().to(delete_food_option)),
    );
}
