pub mod auth;
pub mod food_option;
pub mod lead;
pub mod metric;
pub mod notification;
pub mod prize;
pub mod restaurant;
pub mod wheel;

pub use auth::auth_config;
pub use food_option::food_option_config;
pub use lead::lead_config;
pub use metric::metric_config;
pub use notification::notification_config;
pub use prize::prize_config;
pub use restaurant::restaurant_config;
pub use wheel::wheel_config;

use crate::error::{AppError, AppResult};
use crate::models::AuthContext;
use actix_web::{HttpMessage, HttpRequest};

/// 认证中间件写入的调用者身份
pub(crate) fn auth_context(req: &HttpRequest) -> AppResult<AuthContext> {
    req.extensions()
        .get::<AuthContext>()
        .copied()
        .ok_or_else(|| AppError::AuthError("Missing access token".to_string()))
}
