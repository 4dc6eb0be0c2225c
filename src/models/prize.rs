use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use utoipa::ToSchema;

use crate::entities::{LimitPeriod, PrizeTier, prize_entity as prizes};

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct PrizeResponse {
    pub id: i64,
    pub restaurant_id: i64,
    pub name: String,
    /// 相对权重
    pub chance: i32,
    pub tier: PrizeTier,
    pub color: Option<String>,
    pub current_count: i64,
    /// 库存上限 (None = 无限)
    pub limit_count: Option<i64>,
    pub limit_period: LimitPeriod,
    pub expiration_date: Option<NaiveDate>,
    /// 当前是否可被抽中
    pub available: bool,
    pub created_at: DateTime<Utc>,
}

impl PrizeResponse {
    pub fn from_model(m: prizes::Model, now: DateTime<Utc>) -> Self {
        let available = m.is_available(now);
        PrizeResponse {
            id: m.id,
            restaurant_id: m.restaurant_id,
            name: m.name,
            chance: m.chance,
            tier: m.tier,
            color: m.color,
            current_count: m.current_count,
            limit_count: m.limit_count,
            limit_period: m.limit_period,
            expiration_date: m.expiration_date,
            available,
            created_at: m.created_at.unwrap_or(now),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CreatePrizeRequest {
    #[schema(example = "10% OFF")]
    pub name: String,
    /// 缺省为 0
    pub chance: Option<i32>,
    pub tier: Option<PrizeTier>,
    pub color: Option<String>,
    pub limit_count: Option<i64>,
    pub limit_period: Option<LimitPeriod>,
    pub expiration_date: Option<NaiveDate>,
}

/// 字段缺省 = 不修改；`limit_count` / `expiration_date` 传 null = 清除
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
pub struct UpdatePrizeRequest {
    pub name: Option<String>,
    pub chance: Option<i32>,
    pub tier: Option<PrizeTier>,
    pub color: Option<String>,
    #[serde(default, deserialize_with = "deserialize_some")]
    #[schema(value_type = Option<i64>)]
    pub limit_count: Option<Option<i64>>,
    pub limit_period: Option<LimitPeriod>,
    #[serde(default, deserialize_with = "deserialize_some")]
    #[schema(value_type = Option<NaiveDate>)]
    pub expiration_date: Option<Option<NaiveDate>>,
}

// 区分 "字段缺省" 与 "显式 null"
fn deserialize_some<'de, T, D>(deserializer: D) -> Result<Option<T>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    Deserialize::deserialize(deserializer).map(Some)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_update_request_null_vs_missing() {
        let req: UpdatePrizeRequest = serde_json::from_str(r#"{"name":"X"}"#).unwrap();
        assert_eq!(req.limit_count, None);

        let req: UpdatePrizeRequest = serde_json::from_str(r#"{"limit_count":null}"#).unwrap();
        assert_eq!(req.limit_count, Some(None));

        let req: UpdatePrizeRequest = serde_json::from_str(r#"{"limit_count":5}"#).unwrap();
        assert_eq!(req.limit_count, Some(Some(5)));
    }
}
