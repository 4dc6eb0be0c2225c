use actix_web::{App, HttpServer, middleware::Logger, web};
use chrono::Local; // timestamp in log lines
use env_logger::{Env, Target};
use std::io::Write; // for env_logger custom formatter

use spinwheel_backend::{
    config::Config,
    database::{create_pool, run_migrations},
    external::{AiTextClient, CouponWebhookClient},
    handlers,
    middlewares::{AuthMiddleware, create_cors},
    services::*,
    swagger::swagger_config,
    tasks,
    utils::JwtService,
};

fn startup_error(context: &str, e: impl std::fmt::Display) -> std::io::Error {
    std::io::Error::other(format!("{context}: {e}"))
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    env_logger::Builder::from_env(Env::default().default_filter_or("info"))
        .format(|buf, record| {
            let ts = Local::now().format("%Y-%m-%dT%H:%M:%S%.3f%:z");
            let level = record.level().as_str().to_ascii_lowercase();
            let msg_json = serde_json::to_string(&format!("{}", record.args()))
                .unwrap_or_else(|_| "\"<invalid utf8>\"".to_string());
            writeln!(
                buf,
                "{{\"timestamp\":\"{}\",\"level\":\"{}\",\"message\":{},\"target\":\"{}\"}}",
                ts,
                level,
                msg_json,
                record.target(),
            )
        })
        .target(Target::Stdout)
        .init();

    // 加载配置
    let config =
        Config::from_toml().map_err(|e| startup_error("Failed to load configuration", e))?;

    // 创建数据库连接池
    let pool = create_pool(&config.database)
        .await
        .map_err(|e| startup_error("Failed to create database connection pool", e))?;

    // 运行数据库迁移
    run_migrations(&pool)
        .await
        .map_err(|e| startup_error("Failed to run database migrations", e))?;

    let jwt_service = JwtService::new(&config.jwt.secret, config.jwt.access_token_expires_in);

    // 外部服务
    let webhook_client = CouponWebhookClient::new(&config.coupon_webhook)
        .map_err(|e| startup_error("Failed to build coupon webhook client", e))?;
    if !webhook_client.has_generic_channel() {
        log::warn!("No generic coupon webhook configured; only per-restaurant webhooks are used");
    }
    let ai_client = AiTextClient::new(config.ai.clone())
        .map_err(|e| startup_error("Failed to build AI client", e))?;
    if !ai_client.is_configured() {
        log::warn!("AI api key is empty; remarketing script generation is disabled");
    }

    // 创建服务
    let auth_service = AuthService::new(pool.clone(), jwt_service.clone());
    let restaurant_service = RestaurantService::new(pool.clone());
    let prize_service = PrizeService::new(pool.clone());
    let food_option_service = FoodOptionService::new(pool.clone());
    let metrics_service = MetricsService::new(pool.clone());
    let notification_service = NotificationService::new(pool.clone());
    let lead_service = LeadService::new(
        pool.clone(),
        webhook_client,
        metrics_service.clone(),
        notification_service.clone(),
        config.wheel.default_country_code.clone(),
    );
    let remarketing_service = RemarketingService::new(pool.clone(), ai_client);
    let wheel_service = WheelService::new(
        restaurant_service.clone(),
        prize_service.clone(),
        food_option_service.clone(),
        metrics_service.clone(),
        lead_service.clone(),
        config.wheel.clone(),
    );

    if let (Some(email), Some(password)) = (
        config.admin.bootstrap_email.as_deref(),
        config.admin.bootstrap_password.as_deref(),
    ) {
        match auth_service.ensure_bootstrap_admin(email, password).await {
            Ok(true) => log::info!("Bootstrap super admin created: {email}"),
            Ok(false) => {}
            Err(e) => log::error!("Failed to create bootstrap super admin: {e:?}"),
        }
    }

    // 启动后台定时任务
    tasks::spawn_all(prize_service.clone(), notification_service.clone());

    // 启动HTTP服务器
    log::info!(
        "Starting HTTP server at {}:{}",
        config.server.host,
        config.server.port
    );

    HttpServer::new(move || {
        App::new()
            .wrap(Logger::default())
            .wrap(create_cors())
            .wrap(AuthMiddleware::new(jwt_service.clone()))
            .app_data(web::Data::new(auth_service.clone()))
            .app_data(web::Data::new(restaurant_service.clone()))
            .app_data(web::Data::new(prize_service.clone()))
            .app_data(web::Data::new(food_option_service.clone()))
            .app_data(web::Data::new(metrics_service.clone()))
            .app_data(web::Data::new(notification_service.clone()))
            .app_data(web::Data::new(lead_service.clone()))
            .app_data(web::Data::new(remarketing_service.clone()))
            .app_data(web::Data::new(wheel_service.clone()))
            .configure(swagger_config)
            .service(
                web::scope("/api/v1")
                    .configure(handlers::auth_config)
                    .configure(handlers::wheel_config)
                    .configure(handlers::restaurant_config)
                    .configure(handlers::prize_config)
                    .configure(handlers::lead_config)
                    .configure(handlers::metric_config)
                    .configure(handlers::notification_config)
                    .configure(handlers::food_option_config),
            )
    })
    .bind((config.server.host.as_str(), config.server.port))?
    .run()
    .await
}
