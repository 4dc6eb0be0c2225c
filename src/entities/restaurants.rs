use chrono::{DateTime, Utc};
use sea_orm::entity::prelude::*;
use sea_orm::{DeriveActiveEnum, EnumIter};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(
    Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, ToSchema, DeriveActiveEnum, EnumIter,
)]
#[sea_orm(rs_type = "String", db_type = "Text")]
#[serde(rename_all = "snake_case")]
pub enum RestaurantStatus {
    #[sea_orm(string_value = "active")]
    Active,
    #[sea_orm(string_value = "paused")]
    Paused,
}

impl RestaurantStatus {
    pub fn toggled(self) -> Self {
        match self {
            RestaurantStatus::Active => RestaurantStatus::Paused,
            RestaurantStatus::Paused => RestaurantStatus::Active,
        }
    }
}

/// 餐厅 (租户)
/// - slug: 公开转盘链接使用，唯一
/// - metrics_*: 生命周期累计计数，仅供展示；按天的统计见 metrics 表
/// - webhook_url / webhook_token: 餐厅自有的优惠券投递渠道 (可选)
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "restaurants")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub name: String,
    pub slug: String,
    pub status: RestaurantStatus,
    pub whatsapp: Option<String>,
    pub color: Option<String>,
    pub webhook_url: Option<String>,
    pub webhook_token: Option<String>,
    pub metrics_access: i64,
    pub metrics_spins: i64,
    pub metrics_leads: i64,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl Model {
    pub fn is_paused(&self) -> bool {
        self.status == RestaurantStatus::Paused
    }

    /// Identifier sent to the generic coupon channel.
    pub fn store_id(&self) -> String {
        if self.slug.is_empty() {
            self.id.to_string()
        } else {
            self.slug.clone()
        }
    }
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
