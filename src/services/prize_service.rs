use crate::entities::{
    LimitPeriod, PrizeTier, prize_entity as prizes, restaurant_entity as restaurants,
};
use crate::error::{AppError, AppResult};
use crate::models::{AuthContext, CreatePrizeRequest, PrizeResponse, UpdatePrizeRequest};
use crate::utils::random_hex_color;
use chrono::Utc;
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, IntoActiveModel,
    QueryFilter, QueryOrder, Set,
};

pub const MAX_PRIZE_NAME_CHARS: usize = 120;

fn validate_name(name: &str) -> AppResult<String> {
    let name = name.trim();
    if name.is_empty() {
        return Err(AppError::ValidationError("Prize name is required".into()));
    }
    if name.chars().count() > MAX_PRIZE_NAME_CHARS {
        return Err(AppError::ValidationError(format!(
            "Prize name must not exceed {MAX_PRIZE_NAME_CHARS} characters"
        )));
    }
    Ok(name.to_string())
}

fn validate_limit(limit: Option<i64>) -> AppResult<()> {
    match limit {
        Some(l) if l < 0 => Err(AppError::ValidationError(
            "limit_count must not be negative".into(),
        )),
        _ => Ok(()),
    }
}

fn pick_color(color: Option<String>) -> String {
    match color.map(|c| c.trim().to_string()).filter(|c| !c.is_empty()) {
        Some(c) => c,
        None => random_hex_color(&mut rand::thread_rng()),
    }
}

#[derive(Clone)]
pub struct PrizeService {
    pool: DatabaseConnection,
}

impl PrizeService {
    pub fn new(pool: DatabaseConnection) -> Self {
        Self { pool }
    }

    /// 转盘扇区顺序即 id 顺序
    pub async fn list_models(&self, restaurant_id: i64) -> AppResult<Vec<prizes::Model>> {
        let list = prizes::Entity::find()
            .filter(prizes::Column::RestaurantId.eq(restaurant_id))
            .order_by_asc(prizes::Column::Id)
            .all(&self.pool)
            .await?;
        Ok(list)
    }

    pub async fn list(&self, ctx: &AuthContext, restaurant_id: i64) -> AppResult<Vec<PrizeResponse>> {
        ctx.ensure_restaurant_access(restaurant_id)?;
        let now = Utc::now();
        Ok(self
            .list_models(restaurant_id)
            .await?
            .into_iter()
            .map(|m| PrizeResponse::from_model(m, now))
            .collect())
    }

    pub async fn create(
        &self,
        ctx: &AuthContext,
        restaurant_id: i64,
        request: CreatePrizeRequest,
    ) -> AppResult<PrizeResponse> {
        ctx.ensure_restaurant_access(restaurant_id)?;
        let name = validate_name(&request.name)?;
        validate_limit(request.limit_count)?;

        restaurants::Entity::find_by_id(restaurant_id)
            .one(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound("Restaurant not found".into()))?;

        let now = Utc::now();
        let model = prizes::ActiveModel {
            restaurant_id: Set(restaurant_id),
            name: Set(name),
            chance: Set(request.chance.unwrap_or(0).max(0)),
            tier: Set(request.tier.unwrap_or(PrizeTier::Common)),
            color: Set(Some(pick_color(request.color))),
            current_count: Set(0),
            limit_count: Set(request.limit_count),
            limit_period: Set(request.limit_period.unwrap_or(LimitPeriod::Total)),
            expiration_date: Set(request.expiration_date),
            counter_reset_at: Set(Some(now)),
            created_at: Set(Some(now)),
            updated_at: Set(Some(now)),
            ..Default::default()
        }
        .insert(&self.pool)
        .await?;

        log::info!(
            "Prize created: id={}, restaurant_id={}",
            model.id,
            restaurant_id
        );
        Ok(PrizeResponse::from_model(model, now))
    }

    async fn find(&self, ctx: &AuthContext, prize_id: i64) -> AppResult<prizes::Model> {
        let prize = prizes::Entity::find_by_id(prize_id)
            .one(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound("Prize not found".into()))?;
        ctx.ensure_restaurant_access(prize.restaurant_id)?;
        Ok(prize)
    }

    pub async fn update(
        &self,
        ctx: &AuthContext,
        prize_id: i64,
        request: UpdatePrizeRequest,
    ) -> AppResult<PrizeResponse> {
        let prize = self.find(ctx, prize_id).await?;
        let mut am = prize.into_active_model();

        if let Some(name) = request.name {
            am.name = Set(validate_name(&name)?);
        }
        if let Some(chance) = request.chance {
            am.chance = Set(chance.max(0));
        }
        if let Some(tier) = request.tier {
            am.tier = Set(tier);
        }
        if let Some(color) = request.color {
            am.color = Set(Some(pick_color(Some(color))));
        }
        if let Some(limit) = request.limit_count {
            validate_limit(limit)?;
            am.limit_count = Set(limit);
        }
        if let Some(period) = request.limit_period {
            am.limit_period = Set(period);
        }
        if let Some(date) = request.expiration_date {
            am.expiration_date = Set(date);
        }

        let now = Utc::now();
        am.updated_at = Set(Some(now));
        let updated = am.update(&self.pool).await?;
        Ok(PrizeResponse::from_model(updated, now))
    }

    pub async fn delete(&self, ctx: &AuthContext, prize_id: i64) -> AppResult<()> {
        let prize = self.find(ctx, prize_id).await?;
        prizes::Entity::delete_by_id(prize.id).exec(&self.pool).await?;
        log::info!("Prize deleted: id={}", prize.id);
        Ok(())
    }

    /// 中奖后计数 +1（数据库端自增）
    pub async fn record_redemption(&self, prize_id: i64) -> AppResult<()> {
        let res = prizes::Entity::update_many()
            .col_expr(
                prizes::Column::CurrentCount,
                Expr::col(prizes::Column::CurrentCount).add(1),
            )
            .col_expr(prizes::Column::UpdatedAt, Expr::value(Utc::now()))
            .filter(prizes::Column::Id.eq(prize_id))
            .exec(&self.pool)
            .await?;
        if res.rows_affected == 0 {
            return Err(AppError::NotFound("Prize not found".into()));
        }
        Ok(())
    }

    /// 周期已滚动的奖品计数清零，返回清零的数量
    pub async fn reset_expired_counters(&self) -> AppResult<u64> {
        let now = Utc::now();
        let candidates = prizes::Entity::find()
            .filter(prizes::Column::LimitPeriod.ne(LimitPeriod::Total))
            .all(&self.pool)
            .await?;

        let due: Vec<i64> = candidates
            .iter()
            .filter(|p| p.counter_due_for_reset(now))
            .map(|p| p.id)
            .collect();
        if due.is_empty() {
            return Ok(0);
        }

        let res = prizes::Entity::update_many()
            .col_expr(prizes::Column::CurrentCount, Expr::value(0i64))
            .col_expr(prizes::Column::CounterResetAt, Expr::value(now))
            .col_expr(prizes::Column::UpdatedAt, Expr::value(now))
            .filter(prizes::Column::Id.is_in(due))
            .exec(&self.pool)
            .await?;
        Ok(res.rows_affected)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::memory_pool;
    use crate::entities::AccountRole;
    use crate::services::test_support::{seed_prize, seed_restaurant};
    use chrono::Duration;

    fn owner_of(restaurant_id: i64) -> AuthContext {
        AuthContext {
            account_id: 1,
            role: AccountRole::RestaurantOwner,
            restaurant_id: Some(restaurant_id),
        }
    }

    #[actix_web::test]
    async fn test_create_assigns_color_and_defaults() {
        let pool = memory_pool().await;
        let r = seed_restaurant(&pool, "cantina").await;
        let service = PrizeService::new(pool);

        let prize = service
            .create(
                &owner_of(r.id),
                r.id,
                CreatePrizeRequest {
                    name: " 10% OFF ".into(),
                    chance: None,
                    tier: None,
                    color: None,
                    limit_count: Some(5),
                    limit_period: None,
                    expiration_date: None,
                },
            )
            .await
            .unwrap();
        assert_eq!(prize.name, "10% OFF");
        assert_eq!(prize.chance, 0);
        assert_eq!(prize.tier, PrizeTier::Common);
        assert!(prize.color.as_deref().is_some_and(|c| c.starts_with('#')));
        assert!(prize.available);
    }

    #[actix_web::test]
    async fn test_owner_cannot_edit_foreign_prize() {
        let pool = memory_pool().await;
        let a = seed_restaurant(&pool, "a").await;
        let b = seed_restaurant(&pool, "b").await;
        let prize = seed_prize(&pool, a.id, "A", None, 0).await;
        let service = PrizeService::new(pool);

        assert!(matches!(
            service.delete(&owner_of(b.id), prize.id).await,
            Err(AppError::Forbidden)
        ));
        let updated = service
            .update(
                &owner_of(a.id),
                prize.id,
                UpdatePrizeRequest {
                    chance: Some(-3),
                    limit_count: Some(Some(2)),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(updated.chance, 0);
        assert_eq!(updated.limit_count, Some(2));
    }

    #[actix_web::test]
    async fn test_redemption_exhausts_stock() {
        let pool = memory_pool().await;
        let r = seed_restaurant(&pool, "cantina").await;
        let prize = seed_prize(&pool, r.id, "A", Some(2), 0).await;
        let service = PrizeService::new(pool);

        service.record_redemption(prize.id).await.unwrap();
        service.record_redemption(prize.id).await.unwrap();
        let list = service.list(&owner_of(r.id), r.id).await.unwrap();
        assert_eq!(list[0].current_count, 2);
        assert!(!list[0].available);

        assert!(matches!(
            service.record_redemption(9999).await,
            Err(AppError::NotFound(_))
        ));
    }

    #[actix_web::test]
    async fn test_daily_counter_reset() {
        let pool = memory_pool().await;
        let r = seed_restaurant(&pool, "cantina").await;
        let daily = seed_prize(&pool, r.id, "Daily", Some(3), 3).await;
        let total = seed_prize(&pool, r.id, "Total", Some(3), 3).await;

        let mut am = daily.into_active_model();
        am.limit_period = Set(LimitPeriod::Daily);
        am.counter_reset_at = Set(Some(Utc::now() - Duration::days(2)));
        am.update(&pool).await.unwrap();

        let service = PrizeService::new(pool.clone());
        assert_eq!(service.reset_expired_counters().await.unwrap(), 1);
        assert_eq!(service.reset_expired_counters().await.unwrap(), 0);

        let list = service.list_models(r.id).await.unwrap();
        assert_eq!(list[0].current_count, 0);
        assert_eq!(list[1].id, total.id);
        assert_eq!(list[1].current_count, 3);
    }

    #[actix_web::test]
    async fn test_prize_name_length_is_capped() {
        let pool = memory_pool().await;
        let r = seed_restaurant(&pool, "cantina").await;
        let prize = seed_prize(&pool, r.id, "A", None, 0).await;
        let service = PrizeService::new(pool);
        let ctx = owner_of(r.id);

        let request = |name: String| CreatePrizeRequest {
            name,
            chance: Some(10),
            tier: None,
            color: None,
            limit_count: None,
            limit_period: None,
            expiration_date: None,
        };
        let longest = "é".repeat(MAX_PRIZE_NAME_CHARS);
        assert!(service.create(&ctx, r.id, request(longest)).await.is_ok());
        assert!(matches!(
            service
                .create(&ctx, r.id, request("x".repeat(MAX_PRIZE_NAME_CHARS + 1)))
                .await,
            Err(AppError::ValidationError(_))
        ));

        let too_long = UpdatePrizeRequest {
            name: Some("y".repeat(MAX_PRIZE_NAME_CHARS + 1)),
            ..Default::default()
        };
        assert!(matches!(
            service.update(&ctx, prize.id, too_long).await,
            Err(AppError::ValidationError(_))
        ));
    }
}
