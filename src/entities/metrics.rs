use chrono::{DateTime, NaiveDate, Utc};
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// 每个餐厅每个自然日一行
/// conversion_rate = leads / access * 100 (access 为 0 时为 0)
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "metrics")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub restaurant_id: i64,
    pub date: NaiveDate,
    pub access: i64,
    pub spins: i64,
    pub leads: i64,
    pub conversion_rate: f64,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
}

pub fn conversion_rate(leads: i64, access: i64) -> f64 {
    if access > 0 {
        leads as f64 / access as f64 * 100.0
    } else {
        0.0
    }
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_conversion_rate() {
        assert_eq!(conversion_rate(0, 0), 0.0);
        assert_eq!(conversion_rate(5, 0), 0.0);
        assert_eq!(conversion_rate(1, 4), 25.0);
        assert_eq!(conversion_rate(3, 3), 100.0);
    }
}
