use crate::entities::lead_entity as leads;
use crate::error::{AppError, AppResult};
use crate::external::AiTextClient;
use crate::models::{AuthContext, GenerateScriptsRequest, RemarketingScripts};
use sea_orm::{DatabaseConnection, EntityTrait};

#[derive(Clone)]
pub struct RemarketingService {
    pool: DatabaseConnection,
    ai: AiTextClient,
}

impl RemarketingService {
    pub fn new(pool: DatabaseConnection, ai: AiTextClient) -> Self {
        Self { pool, ai }
    }

    /// 根据留资偏好生成三种语气的 WhatsApp 文案；失败不重试
    pub async fn generate_scripts(
        &self,
        ctx: &AuthContext,
        lead_id: i64,
        request: &GenerateScriptsRequest,
    ) -> AppResult<RemarketingScripts> {
        let promotion = request.promotion.trim();
        let product_type = request.product_type.trim();
        if promotion.is_empty() || product_type.is_empty() {
            return Err(AppError::ValidationError(
                "Promotion and product type are required".into(),
            ));
        }

        let lead = leads::Entity::find_by_id(lead_id)
            .one(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound("Lead not found".into()))?;
        ctx.ensure_restaurant_access(lead.restaurant_id)?;

        self.ai
            .remarketing_scripts(&lead, promotion, product_type)
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AiConfig;
    use crate::database::memory_pool;
    use crate::entities::AccountRole;
    use crate::services::test_support::{seed_lead, seed_restaurant};

    #[actix_web::test]
    async fn test_validation_before_config() {
        let pool = memory_pool().await;
        let r = seed_restaurant(&pool, "cantina").await;
        let lead = seed_lead(&pool, r.id, "Ana", "A").await;
        let service = RemarketingService::new(pool, AiTextClient::new(AiConfig::default()).unwrap());
        let ctx = AuthContext {
            account_id: 1,
            role: AccountRole::RestaurantOwner,
            restaurant_id: Some(r.id),
        };

        let empty = GenerateScriptsRequest {
            promotion: " ".into(),
            product_type: "Pizza".into(),
        };
        assert!(matches!(
            service.generate_scripts(&ctx, lead.id, &empty).await,
            Err(AppError::ValidationError(_))
        ));

        let ok = GenerateScriptsRequest {
            promotion: "2x1".into(),
            product_type: "Pizza".into(),
        };
        assert!(matches!(
            service.generate_scripts(&ctx, lead.id, &ok).await,
            Err(AppError::ConfigError(_))
        ));
    }
}
