use crate::entities::{
    RestaurantStatus, lead_entity as leads, notification_entity as notifications,
    restaurant_entity as restaurants,
};
use crate::error::{AppError, AppResult};
use crate::models::{AuthContext, EvaluationResponse, NotificationMetadata, NotificationResponse};
use chrono::{DateTime, Utc};
use futures_util::future::join_all;
use sea_orm::sea_query::{Expr, OnConflict};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, FromQueryResult,
    IntoActiveModel, PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, Set,
};

/// 达到即提醒的累计留资数（精确相等）
pub const MILESTONES: [i64; 6] = [10, 50, 100, 250, 500, 1000];
/// 同一奖品被抽中次数达到该值时提醒
pub const PRIZE_TREND_THRESHOLD: i64 = 10;
/// 超过该天数没有新留资时提醒
pub const INACTIVITY_DAYS: i64 = 7;

#[derive(Debug, FromQueryResult)]
struct PrizeCountRow {
    prize: String,
    count: i64,
}

#[derive(Clone)]
pub struct NotificationService {
    pool: DatabaseConnection,
}

impl NotificationService {
    pub fn new(pool: DatabaseConnection) -> Self {
        Self { pool }
    }

    /// 写入一条通知；dedup_key 已存在（无论已读未读）时跳过，返回是否新建
    pub async fn create(&self, restaurant_id: i64, meta: NotificationMetadata) -> AppResult<bool> {
        let model = notifications::ActiveModel {
            restaurant_id: Set(restaurant_id),
            notification_type: Set(meta.notification_type()),
            title: Set(meta.title().to_string()),
            message: Set(meta.message()),
            priority: Set(meta.priority()),
            read: Set(false),
            metadata: Set(serde_json::to_string(&meta)?),
            dedup_key: Set(meta.dedup_key(restaurant_id)),
            created_at: Set(Some(Utc::now())),
            ..Default::default()
        };

        let inserted = notifications::Entity::insert(model)
            .on_conflict(
                OnConflict::column(notifications::Column::DedupKey)
                    .do_nothing()
                    .to_owned(),
            )
            .exec_without_returning(&self.pool)
            .await?;

        if inserted > 0 {
            log::info!(
                "Notification created: restaurant_id={}, key={}",
                restaurant_id,
                meta.dedup_key(restaurant_id)
            );
        }
        Ok(inserted > 0)
    }

    /// 资料完整的留资 -> hot_lead
    pub async fn notify_hot_lead(&self, lead: &leads::Model) -> AppResult<bool> {
        if !lead.is_complete() {
            return Ok(false);
        }
        self.create(
            lead.restaurant_id,
            NotificationMetadata::HotLead {
                lead_id: lead.id,
                lead_name: lead.name.clone(),
                lead_phone: lead.phone.clone(),
            },
        )
        .await
    }

    /// 累计留资数恰好等于某个里程碑时提醒
    pub async fn check_milestone(&self, restaurant_id: i64, total_leads: i64) -> AppResult<bool> {
        if !MILESTONES.contains(&total_leads) {
            return Ok(false);
        }
        self.create(
            restaurant_id,
            NotificationMetadata::Milestone {
                milestone: total_leads,
            },
        )
        .await
    }

    /// 统计各奖品被抽中次数，达到阈值的奖品各提醒一次
    pub async fn evaluate_prize_trends(&self, restaurant_id: i64) -> AppResult<u64> {
        let rows = leads::Entity::find()
            .filter(leads::Column::RestaurantId.eq(restaurant_id))
            .select_only()
            .column(leads::Column::Prize)
            .column_as(Expr::val(1).count(), "count")
            .group_by(leads::Column::Prize)
            .into_model::<PrizeCountRow>()
            .all(&self.pool)
            .await?;

        let mut created = 0;
        for row in rows
            .into_iter()
            .filter(|r| r.count >= PRIZE_TREND_THRESHOLD)
        {
            let meta = NotificationMetadata::PrizeTrend {
                prize: row.prize,
                count: row.count,
            };
            if self.create(restaurant_id, meta).await? {
                created += 1;
            }
        }
        Ok(created)
    }

    /// 最近一条留资距今超过 INACTIVITY_DAYS 天时提醒；没有留资则不提醒
    pub async fn evaluate_inactivity(
        &self,
        restaurant_id: i64,
        now: DateTime<Utc>,
    ) -> AppResult<bool> {
        let last = leads::Entity::find()
            .filter(leads::Column::RestaurantId.eq(restaurant_id))
            .order_by_desc(leads::Column::CreatedAt)
            .one(&self.pool)
            .await?
            .and_then(|l| l.created_at);

        let Some(last_lead_at) = last else {
            return Ok(false);
        };
        let days = (now - last_lead_at).num_days();
        if days < INACTIVITY_DAYS {
            return Ok(false);
        }
        self.create(
            restaurant_id,
            NotificationMetadata::Inactivity { days, last_lead_at },
        )
        .await
    }

    /// 手动触发一次全部规则
    pub async fn evaluate(&self, restaurant_id: i64) -> AppResult<EvaluationResponse> {
        let restaurant = restaurants::Entity::find_by_id(restaurant_id)
            .one(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound("Restaurant not found".into()))?;

        let mut created = self.evaluate_prize_trends(restaurant_id).await?;
        if self.evaluate_inactivity(restaurant_id, Utc::now()).await? {
            created += 1;
        }
        if self
            .check_milestone(restaurant_id, restaurant.metrics_leads)
            .await?
        {
            created += 1;
        }
        Ok(EvaluationResponse { created })
    }

    /// 后台任务：检查所有启用中的餐厅是否长时间无留资
    pub async fn sweep_inactivity(&self) -> AppResult<u64> {
        let active = restaurants::Entity::find()
            .filter(restaurants::Column::Status.eq(RestaurantStatus::Active))
            .all(&self.pool)
            .await?;

        let now = Utc::now();
        let mut created = 0;
        for restaurant in active {
            match self.evaluate_inactivity(restaurant.id, now).await {
                Ok(true) => created += 1,
                Ok(false) => {}
                Err(e) => log::error!(
                    "Inactivity check failed for restaurant {}: {:?}",
                    restaurant.id,
                    e
                ),
            }
        }
        Ok(created)
    }

    pub async fn list(
        &self,
        restaurant_id: i64,
        unread_only: bool,
    ) -> AppResult<Vec<NotificationResponse>> {
        let mut query =
            notifications::Entity::find().filter(notifications::Column::RestaurantId.eq(restaurant_id));
        if unread_only {
            query = query.filter(notifications::Column::Read.eq(false));
        }
        let list = query
            .order_by_desc(notifications::Column::CreatedAt)
            .order_by_desc(notifications::Column::Id)
            .all(&self.pool)
            .await?;
        Ok(list.into_iter().map(Into::into).collect())
    }

    pub async fn unread_count(&self, restaurant_id: i64) -> AppResult<u64> {
        let count = notifications::Entity::find()
            .filter(notifications::Column::RestaurantId.eq(restaurant_id))
            .filter(notifications::Column::Read.eq(false))
            .count(&self.pool)
            .await?;
        Ok(count)
    }

    pub async fn mark_read(
        &self,
        ctx: &AuthContext,
        notification_id: i64,
    ) -> AppResult<NotificationResponse> {
        let model = notifications::Entity::find_by_id(notification_id)
            .one(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound("Notification not found".into()))?;
        ctx.ensure_restaurant_access(model.restaurant_id)?;

        if model.read {
            return Ok(model.into());
        }
        let mut am = model.into_active_model();
        am.read = Set(true);
        let updated = am.update(&self.pool).await?;
        Ok(updated.into())
    }

    /// 逐条并发标记已读，返回成功的条数
    pub async fn mark_all_read(&self, restaurant_id: i64) -> AppResult<u64> {
        let unread = notifications::Entity::find()
            .filter(notifications::Column::RestaurantId.eq(restaurant_id))
            .filter(notifications::Column::Read.eq(false))
            .all(&self.pool)
            .await?;

        let results = join_all(unread.into_iter().map(|n| {
            let mut am = n.into_active_model();
            am.read = Set(true);
            am.update(&self.pool)
        }))
        .await;

        let mut updated = 0;
        for result in results {
            match result {
                Ok(_) => updated += 1,
                Err(e) => log::error!("Failed to mark notification read: {:?}", e),
            }
        }
        Ok(updated)
    }

    pub async fn delete_all(&self, restaurant_id: i64) -> AppResult<u64> {
        let res = notifications::Entity::delete_many()
            .filter(notifications::Column::RestaurantId.eq(restaurant_id))
            .exec(&self.pool)
            .await?;
        Ok(res.rows_affected)
    }
}
