use actix_web::{HttpRequest, HttpResponse, ResponseError, Result, web};
use serde_json::json;

use super::auth_context;
use crate::models::*;
use crate::services::AuthService;

#[utoipa::path(
    post,
    path = "/auth/login",
    tag = "auth",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "登录成功", body = AuthResponse),
        (status = 401, description = "邮箱或密码错误 / 邮箱未确认"),
        (status = 400, description = "请求参数错误")
    )
)]
pub async fn login(
    auth_service: web::Data<AuthService>,
    request: web::Json<LoginRequest>,
) -> Result<HttpResponse> {
    match auth_service.login(request.into_inner()).await {
        Ok(response) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "data": response
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    get,
    path = "/auth/me",
    tag = "auth",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "当前账号", body = AccountResponse),
        (status = 401, description = "未授权")
    )
)]
pub async fn me(auth_service: web::Data<AuthService>, req: HttpRequest) -> Result<HttpResponse> {
    let ctx = auth_context(&req)?;
    match auth_service.me(&ctx).await {
        Ok(account) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "data": account
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    post,
    path = "/accounts",
    tag = "auth",
    request_body = CreateAccountRequest,
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "账号已创建", body = AccountResponse),
        (status = 400, description = "请求参数错误"),
        (status = 403, description = "仅超级管理员")
    )
)]
pub async fn create_account(
    auth_service: web::Data<AuthService>,
    req: HttpRequest,
    request: web::Json<CreateAccountRequest>,
) -> Result<HttpResponse> {
    let ctx = auth_context(&req)?;
    match auth_service.create_account(&ctx, request.into_inner()).await {
        Ok(account) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "data": account
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    post,
    path = "/accounts/{id}/confirm",
    tag = "auth",
    params(("id" = i64, Path, description = "账号ID")),
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "邮箱已确认", body = AccountResponse),
        (status = 404, description = "账号不存在")
    )
)]
pub async fn confirm_account(
    auth_service: web::Data<AuthService>,
    req: HttpRequest,
    path: web::Path<i64>,
) -> Result<HttpResponse> {
    let ctx = auth_context(&req)?;
    match auth_service.confirm_account(&ctx, path.into_inner()).await {
        Ok(account) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "data": account
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

pub fn auth_config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/auth")
            .route("/login", web::post().to(login))
            .route("/me", web::get().to(me)),
    )
    .service(
        web::scope("/accounts")
            .route("", web::post().to(create_account))
            .route("/{id}/confirm", web::post().to(confirm_account)),
    );
}
