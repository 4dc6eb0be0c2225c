use actix_cors::Cors;

/// 转盘页面嵌在餐厅自己的域名下，管理后台另有域名，统一放开来源
pub fn create_cors() -> Cors {
    Cors::default()
        .allowed_origin_fn(|_, _req_head| true)
        .allowed_methods(vec!["GET", "POST", "PUT", "DELETE", "OPTIONS"])
        .allow_any_header()
        .max_age(3600)
}
