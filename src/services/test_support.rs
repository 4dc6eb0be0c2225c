//! 测试用的数据构造

use crate::entities::{
    LimitPeriod, PrizeTier, RestaurantStatus, lead_entity as leads, prize_entity as prizes,
    restaurant_entity as restaurants,
};
use chrono::Utc;
use sea_orm::{ActiveModelTrait, DatabaseConnection, Set};

pub async fn seed_restaurant(pool: &DatabaseConnection, slug: &str) -> restaurants::Model {
    restaurants::ActiveModel {
        name: Set(format!("Restaurante {slug}")),
        slug: Set(slug.to_string()),
        status: Set(RestaurantStatus::Active),
        whatsapp: Set(Some("5511988887777".to_string())),
        metrics_access: Set(0),
        metrics_spins: Set(0),
        metrics_leads: Set(0),
        created_at: Set(Some(Utc::now())),
        updated_at: Set(Some(Utc::now())),
        ..Default::default()
    }
    .insert(pool)
    .await
    .expect("insert restaurant")
}

pub async fn seed_prize(
    pool: &DatabaseConnection,
    restaurant_id: i64,
    name: &str,
    limit_count: Option<i64>,
    current_count: i64,
) -> prizes::Model {
    prizes::ActiveModel {
        restaurant_id: Set(restaurant_id),
        name: Set(name.to_string()),
        chance: Set(50),
        tier: Set(PrizeTier::Common),
        color: Set(Some("#ff0000".to_string())),
        current_count: Set(current_count),
        limit_count: Set(limit_count),
        limit_period: Set(LimitPeriod::Total),
        created_at: Set(Some(Utc::now())),
        updated_at: Set(Some(Utc::now())),
        ..Default::default()
    }
    .insert(pool)
    .await
    .expect("insert prize")
}

pub async fn seed_lead(
    pool: &DatabaseConnection,
    restaurant_id: i64,
    name: &str,
    prize: &str,
) -> leads::Model {
    leads::ActiveModel {
        restaurant_id: Set(restaurant_id),
        name: Set(name.to_string()),
        phone: Set("11999999999".to_string()),
        prize: Set(prize.to_string()),
        sent_by_admin: Set(false),
        coupon_status: Set(crate::entities::CouponStatus::Pending),
        created_at: Set(Some(Utc::now())),
        updated_at: Set(Some(Utc::now())),
        ..Default::default()
    }
    .insert(pool)
    .await
    .expect("insert lead")
}
