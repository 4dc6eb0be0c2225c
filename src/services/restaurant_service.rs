use crate::entities::{
    AccountRole, RestaurantStatus, account_entity as accounts, lead_entity as leads,
    metric_entity as metrics, notification_entity as notifications, prize_entity as prizes,
    restaurant_entity as restaurants,
};
use crate::error::{AppError, AppResult};
use crate::models::{
    AuthContext, CreateRestaurantRequest, CreateRestaurantResponse, RestaurantResponse,
    UpdateRestaurantRequest,
};
use crate::services::{insert_account, normalize_email};
use crate::utils::validate_password;
use chrono::Utc;
use regex::Regex;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, IntoActiveModel,
    PaginatorTrait, QueryFilter, QueryOrder, Set, TransactionTrait,
};

/// 小写字母数字，用单个连字符分隔
pub fn validate_slug(slug: &str) -> AppResult<()> {
    let slug_regex = Regex::new(r"^[a-z0-9]+(?:-[a-z0-9]+)*$")
        .map_err(|e| AppError::InternalError(format!("Invalid slug pattern: {e}")))?;
    if slug.len() > 64 || !slug_regex.is_match(slug) {
        return Err(AppError::ValidationError(
            "Slug must be lowercase letters, digits and single hyphens".into(),
        ));
    }
    Ok(())
}

// 空字符串表示清空
fn optional(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

#[derive(Clone)]
pub struct RestaurantService {
    pool: DatabaseConnection,
}

impl RestaurantService {
    pub fn new(pool: DatabaseConnection) -> Self {
        Self { pool }
    }

    pub async fn list(&self, ctx: &AuthContext) -> AppResult<Vec<RestaurantResponse>> {
        let mut query = restaurants::Entity::find();
        if !ctx.is_super_admin() {
            let Some(own) = ctx.restaurant_id else {
                return Ok(Vec::new());
            };
            query = query.filter(restaurants::Column::Id.eq(own));
        }
        let list = query
            .order_by_asc(restaurants::Column::Name)
            .all(&self.pool)
            .await?;
        Ok(list.into_iter().map(Into::into).collect())
    }

    pub async fn find_model(&self, restaurant_id: i64) -> AppResult<restaurants::Model> {
        restaurants::Entity::find_by_id(restaurant_id)
            .one(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound("Restaurant not found".into()))
    }

    pub async fn get(&self, ctx: &AuthContext, restaurant_id: i64) -> AppResult<RestaurantResponse> {
        ctx.ensure_restaurant_access(restaurant_id)?;
        Ok(self.find_model(restaurant_id).await?.into())
    }

    /// 公开转盘按 slug 查找
    pub async fn get_by_slug(&self, slug: &str) -> AppResult<restaurants::Model> {
        restaurants::Entity::find()
            .filter(restaurants::Column::Slug.eq(slug))
            .one(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound("Restaurant not found".into()))
    }

    /// 创建餐厅以及老板账号（同一事务）
    pub async fn create(
        &self,
        ctx: &AuthContext,
        request: CreateRestaurantRequest,
    ) -> AppResult<CreateRestaurantResponse> {
        ctx.require_super_admin()?;

        let name = request.name.trim().to_string();
        if name.is_empty() {
            return Err(AppError::ValidationError("Restaurant name is required".into()));
        }
        let slug = request.slug.trim().to_string();
        validate_slug(&slug)?;
        let owner_email = normalize_email(&request.owner_email)?;
        validate_password(&request.owner_password)?;

        let txn = self.pool.begin().await?;

        let taken = restaurants::Entity::find()
            .filter(restaurants::Column::Slug.eq(slug.as_str()))
            .count(&txn)
            .await?;
        if taken > 0 {
            return Err(AppError::ValidationError("Slug already in use".into()));
        }

        let now = Utc::now();
        let restaurant = restaurants::ActiveModel {
            name: Set(name),
            slug: Set(slug),
            status: Set(RestaurantStatus::Active),
            whatsapp: Set(optional(request.whatsapp)),
            color: Set(optional(request.color)),
            webhook_url: Set(optional(request.webhook_url)),
            webhook_token: Set(optional(request.webhook_token)),
            metrics_access: Set(0),
            metrics_spins: Set(0),
            metrics_leads: Set(0),
            created_at: Set(Some(now)),
            updated_at: Set(Some(now)),
            ..Default::default()
        }
        .insert(&txn)
        .await?;

        let owner = insert_account(
            &txn,
            &owner_email,
            &request.owner_password,
            AccountRole::RestaurantOwner,
            Some(restaurant.id),
            true,
        )
        .await?;

        txn.commit().await?;

        log::info!(
            "Restaurant created: id={}, slug={}, owner_id={}",
            restaurant.id,
            restaurant.slug,
            owner.id
        );
        Ok(CreateRestaurantResponse {
            restaurant: restaurant.into(),
            owner_account_id: owner.id,
        })
    }

    pub async fn update(
        &self,
        ctx: &AuthContext,
        restaurant_id: i64,
        request: UpdateRestaurantRequest,
    ) -> AppResult<RestaurantResponse> {
        ctx.ensure_restaurant_access(restaurant_id)?;
        let mut am = self.find_model(restaurant_id).await?.into_active_model();

        if let Some(name) = request.name {
            let name = name.trim().to_string();
            if name.is_empty() {
                return Err(AppError::ValidationError("Restaurant name is required".into()));
            }
            am.name = Set(name);
        }
        if request.whatsapp.is_some() {
            am.whatsapp = Set(optional(request.whatsapp));
        }
        if request.color.is_some() {
            am.color = Set(optional(request.color));
        }
        if request.webhook_url.is_some() {
            am.webhook_url = Set(optional(request.webhook_url));
        }
        if request.webhook_token.is_some() {
            am.webhook_token = Set(optional(request.webhook_token));
        }
        am.updated_at = Set(Some(Utc::now()));

        Ok(am.update(&self.pool).await?.into())
    }

    /// active <-> paused
    pub async fn toggle_status(
        &self,
        ctx: &AuthContext,
        restaurant_id: i64,
    ) -> AppResult<RestaurantResponse> {
        ctx.require_super_admin()?;
        let restaurant = self.find_model(restaurant_id).await?;
        let next = restaurant.status.toggled();

        let mut am = restaurant.into_active_model();
        am.status = Set(next);
        am.updated_at = Set(Some(Utc::now()));
        let updated = am.update(&self.pool).await?;
        log::info!("Restaurant {} status -> {:?}", updated.id, updated.status);
        Ok(updated.into())
    }

    /// 仍有奖品或留资时拒绝删除
    pub async fn delete(&self, ctx: &AuthContext, restaurant_id: i64) -> AppResult<()> {
        ctx.require_super_admin()?;
        let restaurant = self.find_model(restaurant_id).await?;

        let prize_count = prizes::Entity::find()
            .filter(prizes::Column::RestaurantId.eq(restaurant.id))
            .count(&self.pool)
            .await?;
        let lead_count = leads::Entity::find()
            .filter(leads::Column::RestaurantId.eq(restaurant.id))
            .count(&self.pool)
            .await?;
        if prize_count > 0 || lead_count > 0 {
            return Err(AppError::ValidationError(format!(
                "Restaurant still has {prize_count} prizes and {lead_count} leads"
            )));
        }

        let txn = self.pool.begin().await?;
        metrics::Entity::delete_many()
            .filter(metrics::Column::RestaurantId.eq(restaurant.id))
            .exec(&txn)
            .await?;
        notifications::Entity::delete_many()
            .filter(notifications::Column::RestaurantId.eq(restaurant.id))
            .exec(&txn)
            .await?;
        accounts::Entity::delete_many()
            .filter(accounts::Column::RestaurantId.eq(restaurant.id))
            .exec(&txn)
            .await?;
        restaurants::Entity::delete_by_id(restaurant.id)
            .exec(&txn)
            .await?;
        txn.commit().await?;

        log::info!("Restaurant deleted: id={}", restaurant.id);
        Ok(())
    }
}
