use crate::error::{AppError, AppResult};
use crate::models::AuthContext;
use crate::utils::JwtService;
use actix_web::http::{Method, header};
use actix_web::{
    Error, HttpMessage,
    dev::{Service, ServiceRequest, ServiceResponse, Transform, forward_ready},
};
use futures_util::future::LocalBoxFuture;
use std::future::{Ready, ready};

// 公开路径配置
struct PublicPaths {
    exact_paths: Vec<&'static str>,
    prefix_paths: Vec<&'static str>,
}

impl PublicPaths {
    fn new() -> Self {
        Self {
            // 完全匹配的公开路径
            exact_paths: vec![
                "/swagger-ui",
                "/swagger-ui/",
                "/api-docs/openapi.json",
                "/api/v1/auth/login",
            ],
            // 前缀匹配的公开路径：顾客端转盘不需要登录
            prefix_paths: vec!["/swagger-ui/", "/api-docs/", "/api/v1/wheel/"],
        }
    }

    fn is_public_path(&self, path: &str) -> bool {
        // 检查完全匹配
        if self.exact_paths.contains(&path) {
            return true;
        }

        // 检查前缀匹配
        self.prefix_paths
            .iter()
            .any(|&prefix| path.starts_with(prefix))
    }
}

pub struct AuthMiddleware {
    jwt_service: JwtService,
}

impl AuthMiddleware {
    pub fn new(jwt_service: JwtService) -> Self {
        Self { jwt_service }
    }
}

impl<S, B> Transform<S, ServiceRequest> for AuthMiddleware
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error>,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type InitError = ();
    type Transform = AuthMiddlewareService<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(AuthMiddlewareService {
            service,
            jwt_service: self.jwt_service.clone(),
            public_paths: PublicPaths::new(),
        }))
    }
}

pub struct AuthMiddlewareService<S> {
    service: S,
    jwt_service: JwtService,
    public_paths: PublicPaths,
}

impl<S, B> Service<ServiceRequest> for AuthMiddlewareService<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error>,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        // CORS 预检与公开路径直接放行
        if req.method() == Method::OPTIONS || self.public_paths.is_public_path(req.path()) {
            return Box::pin(self.service.call(req));
        }

        match authenticate(&self.jwt_service, &req) {
            Ok(ctx) => {
                req.extensions_mut().insert(ctx);
                Box::pin(self.service.call(req))
            }
            Err(error) => Box::pin(async move { Err(error.into()) }),
        }
    }
}

fn bearer_token(req: &ServiceRequest) -> Option<&str> {
    req.headers()
        .get(header::AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
}

/// Bearer token -> 调用者身份
fn authenticate(jwt_service: &JwtService, req: &ServiceRequest) -> AppResult<AuthContext> {
    let token = bearer_token(req)
        .ok_or_else(|| AppError::AuthError("Missing access token".to_string()))?;
    let claims = jwt_service
        .verify_access_token(token)
        .map_err(|_| AppError::AuthError("Invalid access token".to_string()))?;
    claims.auth_context()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_public_paths() {
        let paths = PublicPaths::new();
        assert!(paths.is_public_path("/api/v1/auth/login"));
        assert!(paths.is_public_path("/api/v1/wheel/pizza-place"));
        assert!(paths.is_public_path("/api/v1/wheel/pizza-place/spin"));
        assert!(paths.is_public_path("/swagger-ui/index.html"));
        assert!(!paths.is_public_path("/api/v1/auth/me"));
        assert!(!paths.is_public_path("/api/v1/restaurants"));
        assert!(!paths.is_public_path("/api/v1/leads/1"));
    }

    #[actix_web::test]
    async fn test_authenticate() {
        use crate::entities::AccountRole;
        use actix_web::test::TestRequest;

        let jwt = JwtService::new("secret", 3600);
        let token = jwt
            .generate_access_token(7, AccountRole::RestaurantOwner, Some(3))
            .unwrap();

        let req = TestRequest::default()
            .insert_header((header::AUTHORIZATION, format!("Bearer {token}")))
            .to_srv_request();
        let ctx = authenticate(&jwt, &req).unwrap();
        assert_eq!(ctx.account_id, 7);
        assert_eq!(ctx.restaurant_id, Some(3));

        let missing = TestRequest::default().to_srv_request();
        assert!(matches!(
            authenticate(&jwt, &missing),
            Err(AppError::AuthError(_))
        ));

        let bad = TestRequest::default()
            .insert_header((header::AUTHORIZATION, "Bearer nope"))
            .to_srv_request();
        assert!(authenticate(&jwt, &bad).is_err());
    }
}
