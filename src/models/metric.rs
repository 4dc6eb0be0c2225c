use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::entities::metric_entity as metrics;

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct MetricResponse {
    pub date: NaiveDate,
    pub access: i64,
    pub spins: i64,
    pub leads: i64,
    pub conversion_rate: f64,
}

impl From<metrics::Model> for MetricResponse {
    fn from(m: metrics::Model) -> Self {
        MetricResponse {
            date: m.date,
            access: m.access,
            spins: m.spins,
            leads: m.leads,
            conversion_rate: m.conversion_rate,
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize, ToSchema)]
pub struct MetricQuery {
    /// 最近 N 天 (默认 30，最大 365)
    pub days: Option<u32>,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct MetricsSummary {
    pub restaurant_id: i64,
    pub total_access: i64,
    pub total_spins: i64,
    pub total_leads: i64,
    pub conversion_rate: f64,
    pub days: Vec<MetricResponse>,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct RestaurantOverview {
    pub restaurant_id: i64,
    pub name: String,
    pub slug: String,
    pub access: i64,
    pub spins: i64,
    pub leads: i64,
    pub conversion_rate: f64,
}

/// 超级管理员总览
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct GlobalOverview {
    pub restaurants: i64,
    pub active_restaurants: i64,
    pub total_access: i64,
    pub total_spins: i64,
    pub total_leads: i64,
    pub conversion_rate: f64,
    pub per_restaurant: Vec<RestaurantOverview>,
}
