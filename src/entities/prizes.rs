use chrono::{DateTime, Datelike, NaiveDate, Utc};
use sea_orm::entity::prelude::*;
use sea_orm::{DeriveActiveEnum, EnumIter};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// 奖品稀有度，仅用于展示
#[derive(
    Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, ToSchema, DeriveActiveEnum, EnumIter,
)]
#[sea_orm(rs_type = "String", db_type = "Text")]
#[serde(rename_all = "snake_case")]
pub enum PrizeTier {
    #[sea_orm(string_value = "common")]
    Common,
    #[sea_orm(string_value = "rare")]
    Rare,
    #[sea_orm(string_value = "epic")]
    Epic,
}

/// current_count 的清零周期
#[derive(
    Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, ToSchema, DeriveActiveEnum, EnumIter,
)]
#[sea_orm(rs_type = "String", db_type = "Text")]
#[serde(rename_all = "snake_case")]
pub enum LimitPeriod {
    #[sea_orm(string_value = "total")]
    Total,
    #[sea_orm(string_value = "daily")]
    Daily,
    #[sea_orm(string_value = "weekly")]
    Weekly,
    #[sea_orm(string_value = "monthly")]
    Monthly,
}

impl LimitPeriod {
    /// First day of the period containing `date`; `None` for `Total`.
    pub fn period_start(self, date: NaiveDate) -> Option<NaiveDate> {
        match self {
            LimitPeriod::Total => None,
            LimitPeriod::Daily => Some(date),
            LimitPeriod::Weekly => {
                let offset = date.weekday().num_days_from_monday() as i64;
                Some(date - chrono::Duration::days(offset))
            }
            LimitPeriod::Monthly => date.with_day(1),
        }
    }
}

/// 转盘奖品
/// 概念说明:
/// - chance: 相对权重 (不要求总和为 100)
/// - limit_count: 库存上限 (NULL=无限)
/// - current_count: 已兑出数量，每次中奖 +1
/// - expiration_date: 最后可用日期 (含当天)
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "prizes")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub restaurant_id: i64,
    pub name: String,
    pub chance: i32,
    pub tier: PrizeTier,
    pub color: Option<String>,
    pub current_count: i64,
    pub limit_count: Option<i64>,
    pub limit_period: LimitPeriod,
    pub expiration_date: Option<NaiveDate>,
    pub counter_reset_at: Option<DateTime<Utc>>,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl Model {
    /// 未过期且未达库存上限
    pub fn is_available(&self, now: DateTime<Utc>) -> bool {
        let not_expired = match self.expiration_date {
            None => true,
            Some(date) => date >= now.date_naive(),
        };
        let in_stock = match self.limit_count {
            None => true,
            Some(limit) => self.current_count < limit,
        };
        not_expired && in_stock
    }

    /// Weight used by weighted selection; negative weights count as zero.
    /// The total over i32 chances always fits in u64.
    pub fn weight(&self) -> u64 {
        self.chance.max(0) as u64
    }

    /// Whether the period counter should be cleared at `now`.
    pub fn counter_due_for_reset(&self, now: DateTime<Utc>) -> bool {
        let Some(current_start) = self.limit_period.period_start(now.date_naive()) else {
            return false;
        };
        let last = self
            .counter_reset_at
            .or(self.created_at)
            .map(|t| t.date_naive());
        match last.and_then(|d| self.limit_period.period_start(d)) {
            Some(last_start) => last_start < current_start,
            None => true,
        }
    }
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn prize() -> Model {
        Model {
            id: 1,
            restaurant_id: 1,
            name: "Pizza".into(),
            chance: 10,
            tier: PrizeTier::Common,
            color: None,
            current_count: 0,
            limit_count: None,
            limit_period: LimitPeriod::Total,
            expiration_date: None,
            counter_reset_at: None,
            created_at: None,
            updated_at: None,
        }
    }

    #[test]
    fn test_availability() {
        let now = Utc.with_ymd_and_hms(2026, 3, 10, 15, 0, 0).unwrap();
        assert!(prize().is_available(now));

        let mut p = prize();
        p.limit_count = Some(5);
        p.current_count = 5;
        assert!(!p.is_available(now));
        p.current_count = 4;
        assert!(p.is_available(now));

        let mut p = prize();
        p.expiration_date = NaiveDate::from_ymd_opt(2026, 3, 10);
        assert!(p.is_available(now), "valid through the expiration day");
        p.expiration_date = NaiveDate::from_ymd_opt(2026, 3, 9);
        assert!(!p.is_available(now));
    }

    #[test]
    fn test_negative_weight_is_zero() {
        let mut p = prize();
        p.chance = -3;
        assert_eq!(p.weight(), 0);
    }

    #[test]
    fn test_period_start() {
        // 2026-03-11 是周三
        let d = NaiveDate::from_ymd_opt(2026, 3, 11).unwrap();
        assert_eq!(LimitPeriod::Total.period_start(d), None);
        assert_eq!(LimitPeriod::Daily.period_start(d), Some(d));
        assert_eq!(
            LimitPeriod::Weekly.period_start(d),
            NaiveDate::from_ymd_opt(2026, 3, 9)
        );
        assert_eq!(
            LimitPeriod::Monthly.period_start(d),
            NaiveDate::from_ymd_opt(2026, 3, 1)
        );
    }

    #[test]
    fn test_counter_due_for_reset() {
        let now = Utc.with_ymd_and_hms(2026, 3, 11, 8, 0, 0).unwrap();
        let mut p = prize();
        p.limit_period = LimitPeriod::Daily;
        p.counter_reset_at = Some(Utc.with_ymd_and_hms(2026, 3, 10, 23, 0, 0).unwrap());
        assert!(p.counter_due_for_reset(now));

        p.counter_reset_at = Some(Utc.with_ymd_and_hms(2026, 3, 11, 0, 5, 0).unwrap());
        assert!(!p.counter_due_for_reset(now));

        p.limit_period = LimitPeriod::Weekly;
        p.counter_reset_at = Some(Utc.with_ymd_and_hms(2026, 3, 9, 0, 5, 0).unwrap());
        assert!(!p.counter_due_for_reset(now));

        p.limit_period = LimitPeriod::Total;
        p.counter_reset_at = None;
        assert!(!p.counter_due_for_reset(now));
    }
}
