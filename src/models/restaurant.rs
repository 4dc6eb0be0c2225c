use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::entities::{RestaurantStatus, restaurant_entity as restaurants};

/// 餐厅完整信息（后台使用）
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct RestaurantResponse {
    pub id: i64,
    pub name: String,
    pub slug: String,
    pub status: RestaurantStatus,
    pub whatsapp: Option<String>,
    pub color: Option<String>,
    pub webhook_url: Option<String>,
    /// 是否配置了 webhook token（不回显 token 本身）
    pub has_webhook_token: bool,
    pub metrics_access: i64,
    pub metrics_spins: i64,
    pub metrics_leads: i64,
    pub created_at: DateTime<Utc>,
}

impl From<restaurants::Model> for RestaurantResponse {
    fn from(m: restaurants::Model) -> Self {
        RestaurantResponse {
            id: m.id,
            name: m.name,
            slug: m.slug,
            status: m.status,
            whatsapp: m.whatsapp,
            color: m.color,
            webhook_url: m.webhook_url,
            has_webhook_token: m.webhook_token.is_some_and(|t| !t.is_empty()),
            metrics_access: m.metrics_access,
            metrics_spins: m.metrics_spins,
            metrics_leads: m.metrics_leads,
            created_at: m.created_at.unwrap_or_else(Utc::now),
        }
    }
}

/// 公开转盘页可见的餐厅信息
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct PublicRestaurantResponse {
    pub id: i64,
    pub name: String,
    pub slug: String,
    pub status: RestaurantStatus,
    pub color: Option<String>,
}

impl From<&restaurants::Model> for PublicRestaurantResponse {
    fn from(m: &restaurants::Model) -> Self {
        PublicRestaurantResponse {
            id: m.id,
            name: m.name.clone(),
            slug: m.slug.clone(),
            status: m.status,
            color: m.color.clone(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CreateRestaurantRequest {
    #[schema(example = "Cantina da Nona")]
    pub name: String,
    #[schema(example = "cantina-da-nona")]
    pub slug: String,
    #[schema(example = "5511988887777")]
    pub whatsapp: Option<String>,
    #[schema(example = "#6c5ce7")]
    pub color: Option<String>,
    pub webhook_url: Option<String>,
    pub webhook_token: Option<String>,
    /// 餐厅老板登录账号
    #[schema(example = "owner@cantina.com")]
    pub owner_email: String,
    pub owner_password: String,
}

/// 只更新传入的字段；传空字符串清空可选字段
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
pub struct UpdateRestaurantRequest {
    pub name: Option<String>,
    pub whatsapp: Option<String>,
    pub color: Option<String>,
    pub webhook_url: Option<String>,
    pub webhook_token: Option<String>,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct CreateRestaurantResponse {
    pub restaurant: RestaurantResponse,
    pub owner_account_id: i64,
}

/// 餐厅 webhook 测试投递结果
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct WebhookTestResponse {
    pub delivered: bool,
    pub http_status: Option<i32>,
    pub error: Option<String>,
}
