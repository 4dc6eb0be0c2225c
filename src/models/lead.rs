use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::entities::{
    CouponStatus, DeliveryChannel, coupon_delivery_entity as deliveries, lead_entity as leads,
};

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct LeadResponse {
    pub id: i64,
    pub restaurant_id: i64,
    pub name: String,
    pub phone: String,
    pub prize: String,
    pub day_pref: Option<String>,
    pub time_pref: Option<String>,
    pub fav_product: Option<String>,
    /// 老板是否已手动联系
    pub sent_by_admin: bool,
    pub coupon_status: CouponStatus,
    pub remarketing_eligible_date: Option<DateTime<Utc>>,
    /// 三个偏好均已填写
    pub hot: bool,
    pub created_at: DateTime<Utc>,
}

impl From<leads::Model> for LeadResponse {
    fn from(m: leads::Model) -> Self {
        let hot = m.is_complete();
        LeadResponse {
            id: m.id,
            restaurant_id: m.restaurant_id,
            name: m.name,
            phone: m.phone,
            prize: m.prize,
            day_pref: m.day_pref,
            time_pref: m.time_pref,
            fav_product: m.fav_product,
            sent_by_admin: m.sent_by_admin,
            coupon_status: m.coupon_status,
            remarketing_eligible_date: m.remarketing_eligible_date,
            hot,
            created_at: m.created_at.unwrap_or_else(Utc::now),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum LeadStatusFilter {
    #[default]
    All,
    Contacted,
    Pending,
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, ToSchema)]
pub enum LeadSort {
    #[default]
    #[serde(rename = "-created_at")]
    NewestFirst,
    #[serde(rename = "created_at")]
    OldestFirst,
    #[serde(rename = "name")]
    NameAsc,
    #[serde(rename = "-name")]
    NameDesc,
}

/// 留资列表查询参数
#[derive(Debug, Clone, Default, Deserialize, Serialize, ToSchema)]
pub struct LeadQuery {
    /// 按姓名 / 电话 / 奖品模糊搜索
    pub search: Option<String>,
    pub status: Option<LeadStatusFilter>,
    pub prize: Option<String>,
    pub sort: Option<LeadSort>,
    /// 页码 (默认 1)
    pub page: Option<u32>,
    /// 每页数量 (默认 20)
    pub per_page: Option<u32>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ContactLeadRequest {
    pub message: String,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ContactLink {
    pub lead_id: i64,
    pub whatsapp_url: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct SendCouponsRequest {
    pub lead_ids: Vec<i64>,
    /// 例如 "15% OFF"
    pub discount: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct RemarketingDateRequest {
    /// null 清除
    pub date: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Serialize, ToSchema, PartialEq, Eq)]
pub struct CountEntry {
    pub name: String,
    pub value: i64,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct LeadReport {
    pub total: i64,
    pub complete_profiles: i64,
    pub contacted: i64,
    pub by_time_pref: Vec<CountEntry>,
    pub by_day_pref: Vec<CountEntry>,
    pub by_fav_product: Vec<CountEntry>,
    pub by_prize: Vec<CountEntry>,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct CouponDeliveryResponse {
    pub id: i64,
    pub channel: DeliveryChannel,
    pub status: CouponStatus,
    pub http_status: Option<i32>,
    pub error: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl From<deliveries::Model> for CouponDeliveryResponse {
    fn from(m: deliveries::Model) -> Self {
        CouponDeliveryResponse {
            id: m.id,
            channel: m.channel,
            status: m.status,
            http_status: m.http_status,
            error: m.error,
            created_at: m.created_at.unwrap_or_else(Utc::now),
        }
    }
}

pub type LeadPageResponse = super::PaginatedResponse<LeadResponse>;
