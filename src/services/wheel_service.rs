use crate::config::WheelConfig;
use crate::error::{AppError, AppResult};
use crate::models::{
    PublicRestaurantResponse, SpinResponse, SubmitLeadRequest, SubmitLeadResponse, WheelPrize,
    WheelResponse,
};
use crate::services::{
    FoodOptionService, LeadService, LeadSubmission, MetricEvent, MetricsService, PrizeService,
    RestaurantService, select_prize,
};
use crate::utils::{normalize_phone, prize_claim_message, wa_me_link};
use chrono::Utc;

/// 公开转盘页（无需登录）
#[derive(Clone)]
pub struct WheelService {
    restaurants: RestaurantService,
    prizes: PrizeService,
    food_options: FoodOptionService,
    metrics: MetricsService,
    leads: LeadService,
    config: WheelConfig,
}

impl WheelService {
    pub fn new(
        restaurants: RestaurantService,
        prizes: PrizeService,
        food_options: FoodOptionService,
        metrics: MetricsService,
        leads: LeadService,
        config: WheelConfig,
    ) -> Self {
        Self {
            restaurants,
            prizes,
            food_options,
            metrics,
            leads,
            config,
        }
    }

    /// 转盘页数据；每次打开记一次访问
    pub async fn view(&self, slug: &str) -> AppResult<WheelResponse> {
        let restaurant = self.restaurants.get_by_slug(slug).await?;
        let prizes = self.prizes.list_models(restaurant.id).await?;
        let food_options = self
            .food_options
            .list()
            .await?
            .into_iter()
            .map(|f| f.name)
            .collect();

        if let Err(e) = self.metrics.record(restaurant.id, MetricEvent::Access).await {
            log::error!("Access metric update failed for restaurant {}: {:?}", restaurant.id, e);
        }

        Ok(WheelResponse {
            restaurant: PublicRestaurantResponse::from(&restaurant),
            prizes: prizes.iter().map(WheelPrize::from).collect(),
            food_options,
        })
    }

    /// 抽奖并立即提交中奖计数
    pub async fn spin(&self, slug: &str) -> AppResult<SpinResponse> {
        let restaurant = self.restaurants.get_by_slug(slug).await?;
        if restaurant.is_paused() {
            return Err(AppError::ValidationError("This wheel is paused".into()));
        }

        let prizes = self.prizes.list_models(restaurant.id).await?;
        let selection = {
            let mut rng = rand::thread_rng();
            select_prize(&prizes, Utc::now(), self.config.selection_mode, &mut rng)
        }
        .ok_or_else(|| AppError::ValidationError("No prizes configured".into()))?;

        let prize = &prizes[selection.index];
        self.prizes.record_redemption(prize.id).await?;

        if let Err(e) = self.metrics.record(restaurant.id, MetricEvent::Spin).await {
            log::error!("Spin metric update failed for restaurant {}: {:?}", restaurant.id, e);
        }

        log::info!(
            "Spin: restaurant_id={}, prize_id={}, rerolled={}",
            restaurant.id,
            prize.id,
            selection.rerolled
        );

        Ok(SpinResponse {
            prize: WheelPrize::from(prize),
            wheel_index: selection.index,
            stop_angle: selection.rotation,
            rerolled: selection.rerolled,
        })
    }

    /// 提交留资并返回兑奖用的 WhatsApp 链接
    pub async fn submit_lead(
        &self,
        slug: &str,
        request: SubmitLeadRequest,
    ) -> AppResult<SubmitLeadResponse> {
        let restaurant = self.restaurants.get_by_slug(slug).await?;
        let prize = request.prize.trim().to_string();

        let result = self
            .leads
            .submit_lead(LeadSubmission {
                restaurant_id: restaurant.id,
                name: request.name,
                phone: request.phone,
                prize: prize.clone(),
                day_pref: request.day_pref,
                time_pref: request.time_pref,
                fav_product: request.fav_product,
            })
            .await?;

        let number = restaurant
            .whatsapp
            .as_deref()
            .filter(|w| !w.trim().is_empty())
            .unwrap_or(&self.config.fallback_whatsapp);
        let whatsapp_url = wa_me_link(
            &normalize_phone(number, &self.config.default_country_code),
            &prize_claim_message(&prize),
        )?;

        Ok(SubmitLeadResponse {
            lead_id: result.lead_id,
            coupon_status: result.coupon_status,
            whatsapp_url,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::CouponWebhookConfig;
    use crate::database::memory_pool;
    use crate::entities::{RestaurantStatus, prize_entity as prizes, restaurant_entity as restaurants};
    use crate::external::CouponWebhookClient;
    use crate::services::NotificationService;
    use crate::services::test_support::{seed_prize, seed_restaurant};
    use sea_orm::{ActiveModelTrait, DatabaseConnection, EntityTrait, IntoActiveModel, Set};

    fn service(pool: DatabaseConnection) -> WheelService {
        let metrics = MetricsService::new(pool.clone());
        let webhook = CouponWebhookClient::new(&CouponWebhookConfig::default()).unwrap();
        let leads = LeadService::new(
            pool.clone(),
            webhook,
            metrics.clone(),
            NotificationService::new(pool.clone()),
            "55".to_string(),
        );
        WheelService::new(
            RestaurantService::new(pool.clone()),
            PrizeService::new(pool.clone()),
            FoodOptionService::new(pool),
            metrics,
            leads,
            WheelConfig::default(),
        )
    }

    #[actix_web::test]
    async fn test_view_spin_and_claim() {
        let pool = memory_pool().await;
        let r = seed_restaurant(&pool, "cantina").await;
        let prize = seed_prize(&pool, r.id, "A", None, 0).await;
        let wheel = service(pool.clone());

        let view = wheel.view("cantina").await.unwrap();
        assert_eq!(view.prizes.len(), 1);

        let spin = wheel.spin("cantina").await.unwrap();
        assert_eq!(spin.prize.name, "A");
        assert_eq!(spin.wheel_index, 0);

        let committed = prizes::Entity::find_by_id(prize.id)
            .one(&pool)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(committed.current_count, 1);

        let claim = wheel
            .submit_lead(
                "cantina",
                SubmitLeadRequest {
                    name: "Maria".into(),
                    phone: "11999999999".into(),
                    prize: "A".into(),
                    day_pref: Some("Sexta".into()),
                    time_pref: Some("Noite".into()),
                    fav_product: Some("Pizza".into()),
                },
            )
            .await
            .unwrap();
        assert!(claim.whatsapp_url.starts_with("https://wa.me/5511988887777?text="));

        let restaurant = restaurants::Entity::find_by_id(r.id)
            .one(&pool)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(restaurant.metrics_access, 1);
        assert_eq!(restaurant.metrics_spins, 1);
        assert_eq!(restaurant.metrics_leads, 1);
    }

    #[actix_web::test]
    async fn test_exhausted_only_prize_still_wins() {
        let pool = memory_pool().await;
        let r = seed_restaurant(&pool, "cantina").await;
        seed_prize(&pool, r.id, "B", Some(5), 5).await;
        let wheel = service(pool);

        let spin = wheel.spin("cantina").await.unwrap();
        assert_eq!(spin.prize.name, "B");
        assert!(!spin.rerolled);
    }

    #[actix_web::test]
    async fn test_paused_or_empty_wheel_refuses_spin() {
        let pool = memory_pool().await;
        let r = seed_restaurant(&pool, "cantina").await;
        let wheel = service(pool.clone());

        assert!(matches!(
            wheel.spin("cantina").await,
            Err(AppError::ValidationError(_))
        ));

        seed_prize(&pool, r.id, "A", None, 0).await;
        let mut am = r.into_active_model();
        am.status = Set(RestaurantStatus::Paused);
        am.update(&pool).await.unwrap();
        assert!(matches!(
            wheel.spin("cantina").await,
            Err(AppError::ValidationError(_))
        ));

        assert!(matches!(
            wheel.view("missing").await,
            Err(AppError::NotFound(_))
        ));
    }
}
