use crate::entities::food_option_entity as food_options;
use crate::error::{AppError, AppResult};
use crate::models::{AuthContext, CreateFoodOptionRequest, FoodOptionResponse};
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, Set,
};

/// 全局共享的 "最爱菜品" 选项
#[derive(Clone)]
pub struct FoodOptionService {
    pool: DatabaseConnection,
}

impl FoodOptionService {
    pub fn new(pool: DatabaseConnection) -> Self {
        Self { pool }
    }

    pub async fn list(&self) -> AppResult<Vec<FoodOptionResponse>> {
        let list = food_options::Entity::find()
            .order_by_asc(food_options::Column::Name)
            .all(&self.pool)
            .await?;
        Ok(list.into_iter().map(Into::into).collect())
    }

    pub async fn create(
        &self,
        ctx: &AuthContext,
        request: CreateFoodOptionRequest,
    ) -> AppResult<FoodOptionResponse> {
        ctx.require_super_admin()?;
        let name = request.name.trim().to_string();
        if name.is_empty() {
            return Err(AppError::ValidationError("Name is required".into()));
        }

        let exists = food_options::Entity::find()
            .filter(food_options::Column::Name.eq(name.as_str()))
            .count(&self.pool)
            .await?;
        if exists > 0 {
            return Err(AppError::ValidationError("Food option already exists".into()));
        }

        let model = food_options::ActiveModel {
            name: Set(name),
            created_at: Set(Some(Utc::now())),
            ..Default::default()
        }
        .insert(&self.pool)
        .await?;
        Ok(model.into())
    }

    pub async fn delete(&self, ctx: &AuthContext, id: i64) -> AppResult<()> {
        ctx.require_super_admin()?;
        let res = food_options::Entity::delete_by_id(id).exec(&self.pool).await?;
        if res.rows_affected == 0 {
            return Err(AppError::NotFound("Food option not found".into()));
        }
        Ok(())
    }
}
