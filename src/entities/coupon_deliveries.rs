use super::leads::CouponStatus;
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
pub enum DeliveryChannel {
    /// 平台统一的优惠券 webhook
    #[sea_orm(string_value = "generic")]
    Generic,
    /// 餐厅自己配置的 webhook
    #[sea_orm(string_value = "restaurant")]
    Restaurant,
}

/// 单个渠道的一次投递尝试 (status 只会是 sent / failed)
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "coupon_deliveries")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub lead_id: i64,
    pub channel: DeliveryChannel,
    pub status: CouponStatus,
    pub http_status: Option<i32>,
    pub error: Option<String>,
    pub created_at: Option<DateTime<Utc>>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
