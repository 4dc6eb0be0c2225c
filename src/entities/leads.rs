use chrono::{DateTime, Utc};
use sea_orm::entity::prelude::*;
use sea_orm::{DeriveActiveEnum, EnumIter};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// 自动投递渠道是否成功通知到顾客
#[derive(
    Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, ToSchema, DeriveActiveEnum, EnumIter,
)]
#[sea_orm(rs_type = "String", db_type = "Text")]
#[serde(rename_all = "snake_case")]
pub enum CouponStatus {
    #[sea_orm(string_value = "pending")]
    Pending,
    #[sea_orm(string_value = "sent")]
    Sent,
    #[sea_orm(string_value = "failed")]
    Failed,
}

/// 留资记录
/// - prize: 奖品名称快照 (非外键)
/// - name / phone / prize 创建后不再修改
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "leads")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub restaurant_id: i64,
    pub name: String,
    pub phone: String,
    pub prize: String,
    pub day_pref: Option<String>,
    pub time_pref: Option<String>,
    pub fav_product: Option<String>,
    pub sent_by_admin: bool,
    pub coupon_status: CouponStatus,
    pub remarketing_eligible_date: Option<DateTime<Utc>>,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl Model {
    /// 三个偏好字段全部填写即为 "hot lead"
    pub fn is_complete(&self) -> bool {
        is_complete_profile(
            self.day_pref.as_deref(),
            self.time_pref.as_deref(),
            self.fav_product.as_deref(),
        )
    }
}

pub fn is_complete_profile(
    day_pref: Option<&str>,
    time_pref: Option<&str>,
    fav_product: Option<&str>,
) -> bool {
    [day_pref, time_pref, fav_product]
        .iter()
        .all(|v| v.is_some_and(|s| !s.trim().is_empty()))
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_complete_profile() {
        assert!(is_complete_profile(Some("Sexta"), Some("Noite"), Some("Pizza")));
        assert!(!is_complete_profile(Some("Sexta"), None, Some("Pizza")));
        assert!(!is_complete_profile(Some("Sexta"), Some("  "), Some("Pizza")));
        assert!(!is_complete_profile(None, None, None));
    }
}
