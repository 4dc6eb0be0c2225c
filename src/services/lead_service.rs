use crate::entities::{
    CouponStatus, coupon_delivery_entity as deliveries, lead_entity as leads,
    restaurant_entity as restaurants,
};
use crate::error::{AppError, AppResult};
use crate::external::{CouponWebhookClient, DeliveryOutcome, RestaurantLeadPayload};
use crate::models::{
    AuthContext, ContactLink, CountEntry, CouponDeliveryResponse, LeadPageResponse, LeadQuery,
    LeadReport, LeadResponse, LeadSort, LeadStatusFilter, PaginatedResponse, PaginationParams,
    SendCouponsRequest, WebhookTestResponse,
};
use crate::services::{MetricEvent, MetricsService, NotificationService};
use crate::utils::{coupon_offer_message, normalize_phone, validate_phone, wa_me_link};
use chrono::{DateTime, Utc};
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, IntoActiveModel,
    QueryFilter, QueryOrder, Set,
};
use std::collections::BTreeMap;

/// 公开转盘提交的留资
#[derive(Debug, Clone)]
pub struct LeadSubmission {
    pub restaurant_id: i64,
    pub name: String,
    pub phone: String,
    pub prize: String,
    pub day_pref: Option<String>,
    pub time_pref: Option<String>,
    pub fav_product: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LeadResult {
    pub lead_id: i64,
    pub coupon_status: CouponStatus,
}

/// 任一渠道成功即 sent；没有渠道或全部失败为 failed
pub fn overall_status(outcomes: &[DeliveryOutcome]) -> CouponStatus {
    if outcomes.iter().any(DeliveryOutcome::is_sent) {
        CouponStatus::Sent
    } else {
        CouponStatus::Failed
    }
}

fn clean(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// 内存中完成搜索、筛选、排序；返回 (当前页, 总数)
pub fn apply_lead_query(
    mut list: Vec<leads::Model>,
    query: &LeadQuery,
) -> (Vec<leads::Model>, i64) {
    if let Some(term) = query.search.as_deref().map(str::trim).filter(|t| !t.is_empty()) {
        let term = term.to_lowercase();
        list.retain(|l| {
            l.name.to_lowercase().contains(&term)
                || l.phone.to_lowercase().contains(&term)
                || l.prize.to_lowercase().contains(&term)
        });
    }

    match query.status.unwrap_or_default() {
        LeadStatusFilter::All => {}
        LeadStatusFilter::Contacted => list.retain(|l| l.sent_by_admin),
        LeadStatusFilter::Pending => list.retain(|l| !l.sent_by_admin),
    }

    if let Some(prize) = query.prize.as_deref().filter(|p| !p.is_empty() && *p != "all") {
        list.retain(|l| l.prize == prize);
    }

    match query.sort.unwrap_or_default() {
        LeadSort::NewestFirst => list.sort_by(|a, b| (b.created_at, b.id).cmp(&(a.created_at, a.id))),
        LeadSort::OldestFirst => list.sort_by(|a, b| (a.created_at, a.id).cmp(&(b.created_at, b.id))),
        LeadSort::NameAsc => list.sort_by_key(|l| l.name.to_lowercase()),
        LeadSort::NameDesc => {
            list.sort_by_key(|l| l.name.to_lowercase());
            list.reverse();
        }
    }

    let total = list.len() as i64;
    let params = PaginationParams::new(query.page, query.per_page);
    let page = list
        .into_iter()
        .skip(params.get_offset() as usize)
        .take(params.get_limit() as usize)
        .collect();
    (page, total)
}

fn count_by<'a>(values: impl Iterator<Item = Option<&'a str>>) -> Vec<CountEntry> {
    let mut counts: BTreeMap<String, i64> = BTreeMap::new();
    for value in values.flatten().map(str::trim).filter(|v| !v.is_empty()) {
        *counts.entry(value.to_string()).or_default() += 1;
    }
    let mut entries: Vec<CountEntry> = counts
        .into_iter()
        .map(|(name, value)| CountEntry { name, value })
        .collect();
    // 次数多的在前，同次数按名称
    entries.sort_by(|a, b| b.value.cmp(&a.value).then_with(|| a.name.cmp(&b.name)));
    entries
}

pub fn build_report(list: &[leads::Model]) -> LeadReport {
    LeadReport {
        total: list.len() as i64,
        complete_profiles: list.iter().filter(|l| l.is_complete()).count() as i64,
        contacted: list.iter().filter(|l| l.sent_by_admin).count() as i64,
        by_time_pref: count_by(list.iter().map(|l| l.time_pref.as_deref())),
        by_day_pref: count_by(list.iter().map(|l| l.day_pref.as_deref())),
        by_fav_product: count_by(list.iter().map(|l| l.fav_product.as_deref())),
        by_prize: count_by(list.iter().map(|l| Some(l.prize.as_str()))),
    }
}

#[derive(Clone)]
pub struct LeadService {
    pool: DatabaseConnection,
    webhook: CouponWebhookClient,
    metrics: MetricsService,
    notifications: NotificationService,
    country_code: String,
}

impl LeadService {
    pub fn new(
        pool: DatabaseConnection,
        webhook: CouponWebhookClient,
        metrics: MetricsService,
        notifications: NotificationService,
        country_code: String,
    ) -> Self {
        Self {
            pool,
            webhook,
            metrics,
            notifications,
            country_code,
        }
    }

    /// 保存留资并执行后续副作用
    ///
    /// 只有留资写入失败才返回错误；投递、通知、统计失败只记录日志。
    pub async fn submit_lead(&self, input: LeadSubmission) -> AppResult<LeadResult> {
        let name = input.name.trim().to_string();
        let prize = input.prize.trim().to_string();
        if name.is_empty() {
            return Err(AppError::ValidationError("Name is required".into()));
        }
        if prize.is_empty() {
            return Err(AppError::ValidationError("Prize is required".into()));
        }
        validate_phone(&input.phone)?;

        let restaurant = restaurants::Entity::find_by_id(input.restaurant_id)
            .one(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound("Restaurant not found".into()))?;

        let now = Utc::now();
        let lead = leads::ActiveModel {
            restaurant_id: Set(restaurant.id),
            name: Set(name),
            phone: Set(input.phone.trim().to_string()),
            prize: Set(prize),
            day_pref: Set(clean(input.day_pref)),
            time_pref: Set(clean(input.time_pref)),
            fav_product: Set(clean(input.fav_product)),
            sent_by_admin: Set(false),
            coupon_status: Set(CouponStatus::Pending),
            remarketing_eligible_date: Set(None),
            created_at: Set(Some(now)),
            updated_at: Set(Some(now)),
            ..Default::default()
        }
        .insert(&self.pool)
        .await?;

        log::info!(
            "Lead created: id={}, restaurant_id={}",
            lead.id,
            restaurant.id
        );

        let coupon_status = self.deliver_coupon(&lead, &restaurant).await;

        if let Err(e) = self.notifications.notify_hot_lead(&lead).await {
            log::error!("Hot lead check failed for lead {}: {:?}", lead.id, e);
        }

        match self.metrics.record(restaurant.id, MetricEvent::Lead).await {
            Ok(update) => {
                if let Err(e) = self
                    .notifications
                    .check_milestone(restaurant.id, update.lifetime_total)
                    .await
                {
                    log::error!("Milestone check failed for restaurant {}: {:?}", restaurant.id, e);
                }
            }
            Err(e) => log::error!("Lead metric update failed for restaurant {}: {:?}", restaurant.id, e),
        }

        Ok(LeadResult {
            lead_id: lead.id,
            coupon_status,
        })
    }

    /// 依次投递所有已配置的渠道，记录每次尝试并回写留资状态
    async fn deliver_coupon(
        &self,
        lead: &leads::Model,
        restaurant: &restaurants::Model,
    ) -> CouponStatus {
        let mut outcomes = Vec::with_capacity(2);
        if let Some(outcome) = self.webhook.deliver_generic(lead, restaurant).await {
            outcomes.push(outcome);
        }
        let payload = RestaurantLeadPayload::new(lead, restaurant);
        if let Some(outcome) = self.webhook.deliver_restaurant(&payload, restaurant).await {
            outcomes.push(outcome);
        }
        if outcomes.is_empty() {
            log::warn!(
                "No coupon channel configured for restaurant {}",
                restaurant.id
            );
        }

        let status = overall_status(&outcomes);
        let now = Utc::now();

        for outcome in outcomes {
            let record = deliveries::ActiveModel {
                lead_id: Set(lead.id),
                channel: Set(outcome.channel),
                status: Set(outcome.status),
                http_status: Set(outcome.http_status),
                error: Set(outcome.error),
                created_at: Set(Some(now)),
                ..Default::default()
            };
            if let Err(e) = record.insert(&self.pool).await {
                log::error!("Failed to record coupon delivery for lead {}: {:?}", lead.id, e);
            }
        }

        let res = leads::Entity::update_many()
            .col_expr(leads::Column::CouponStatus, Expr::value(status))
            .col_expr(leads::Column::UpdatedAt, Expr::value(now))
            .filter(leads::Column::Id.eq(lead.id))
            .exec(&self.pool)
            .await;
        if let Err(e) = res {
            log::error!("Failed to update coupon status for lead {}: {:?}", lead.id, e);
        }

        status
    }

    async fn find_lead(&self, ctx: &AuthContext, lead_id: i64) -> AppResult<leads::Model> {
        let lead = leads::Entity::find_by_id(lead_id)
            .one(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound("Lead not found".into()))?;
        ctx.ensure_restaurant_access(lead.restaurant_id)?;
        Ok(lead)
    }

    async fn restaurant_leads(&self, restaurant_id: i64) -> AppResult<Vec<leads::Model>> {
        let list = leads::Entity::find()
            .filter(leads::Column::RestaurantId.eq(restaurant_id))
            .order_by_desc(leads::Column::CreatedAt)
            .all(&self.pool)
            .await?;
        Ok(list)
    }

    /// 餐厅留资列表；restaurant_id 为 None 时列出全部（仅超级管理员）
    pub async fn list(
        &self,
        ctx: &AuthContext,
        restaurant_id: Option<i64>,
        query: &LeadQuery,
    ) -> AppResult<LeadPageResponse> {
        let list = match restaurant_id {
            Some(id) => {
                ctx.ensure_restaurant_access(id)?;
                self.restaurant_leads(id).await?
            }
            None => {
                ctx.require_super_admin()?;
                leads::Entity::find().all(&self.pool).await?
            }
        };

        let (page, total) = apply_lead_query(list, query);
        let params = PaginationParams::new(query.page, query.per_page);
        Ok(PaginatedResponse::new(
            page.into_iter().map(Into::into).collect(),
            &params,
            total,
        ))
    }

    pub async fn get(&self, ctx: &AuthContext, lead_id: i64) -> AppResult<LeadResponse> {
        Ok(self.find_lead(ctx, lead_id).await?.into())
    }

    pub async fn delete(&self, ctx: &AuthContext, lead_id: i64) -> AppResult<()> {
        let lead = self.find_lead(ctx, lead_id).await?;
        deliveries::Entity::delete_many()
            .filter(deliveries::Column::LeadId.eq(lead.id))
            .exec(&self.pool)
            .await?;
        leads::Entity::delete_by_id(lead.id).exec(&self.pool).await?;
        log::info!("Lead deleted: id={}", lead.id);
        Ok(())
    }

    /// 标记已联系，返回带消息的 WhatsApp 链接
    pub async fn mark_contacted(
        &self,
        ctx: &AuthContext,
        lead_id: i64,
        message: &str,
    ) -> AppResult<ContactLink> {
        if message.trim().is_empty() {
            return Err(AppError::ValidationError("Message is required".into()));
        }
        let lead = self.find_lead(ctx, lead_id).await?;
        let whatsapp_url = wa_me_link(&normalize_phone(&lead.phone, &self.country_code), message)?;

        let mut am = lead.into_active_model();
        am.sent_by_admin = Set(true);
        am.updated_at = Set(Some(Utc::now()));
        let lead = am.update(&self.pool).await?;

        Ok(ContactLink {
            lead_id: lead.id,
            whatsapp_url,
        })
    }

    /// 批量发券：生成每个顾客的 WhatsApp 链接并标记为已联系
    pub async fn send_coupons(
        &self,
        ctx: &AuthContext,
        restaurant_id: i64,
        request: &SendCouponsRequest,
    ) -> AppResult<Vec<ContactLink>> {
        ctx.ensure_restaurant_access(restaurant_id)?;
        if request.discount.trim().is_empty() {
            return Err(AppError::ValidationError("Discount is required".into()));
        }
        if request.lead_ids.is_empty() {
            return Err(AppError::ValidationError("Select at least one lead".into()));
        }

        let list = leads::Entity::find()
            .filter(leads::Column::RestaurantId.eq(restaurant_id))
            .filter(leads::Column::Id.is_in(request.lead_ids.clone()))
            .order_by_asc(leads::Column::Id)
            .all(&self.pool)
            .await?;
        if list.is_empty() {
            return Err(AppError::NotFound("No matching leads".into()));
        }

        let mut links = Vec::with_capacity(list.len());
        for lead in &list {
            let message = coupon_offer_message(&lead.name, request.discount.trim());
            links.push(ContactLink {
                lead_id: lead.id,
                whatsapp_url: wa_me_link(&normalize_phone(&lead.phone, &self.country_code), &message)?,
            });
        }

        leads::Entity::update_many()
            .col_expr(leads::Column::SentByAdmin, Expr::value(true))
            .col_expr(leads::Column::UpdatedAt, Expr::value(Utc::now()))
            .filter(leads::Column::Id.is_in(list.iter().map(|l| l.id)))
            .exec(&self.pool)
            .await?;

        log::info!(
            "Coupons sent: restaurant_id={}, leads={}",
            restaurant_id,
            links.len()
        );
        Ok(links)
    }

    pub async fn set_remarketing_date(
        &self,
        ctx: &AuthContext,
        lead_id: i64,
        date: Option<DateTime<Utc>>,
    ) -> AppResult<LeadResponse> {
        let lead = self.find_lead(ctx, lead_id).await?;
        let mut am = lead.into_active_model();
        am.remarketing_eligible_date = Set(date);
        am.updated_at = Set(Some(Utc::now()));
        Ok(am.update(&self.pool).await?.into())
    }

    /// 今天（UTC 日期）需要再营销的留资
    pub async fn remarketing_today(
        &self,
        ctx: &AuthContext,
        restaurant_id: i64,
    ) -> AppResult<Vec<LeadResponse>> {
        ctx.ensure_restaurant_access(restaurant_id)?;
        let today = Utc::now().date_naive();
        let list = leads::Entity::find()
            .filter(leads::Column::RestaurantId.eq(restaurant_id))
            .filter(leads::Column::RemarketingEligibleDate.is_not_null())
            .order_by_asc(leads::Column::Name)
            .all(&self.pool)
            .await?;
        Ok(list
            .into_iter()
            .filter(|l| {
                l.remarketing_eligible_date
                    .is_some_and(|d| d.date_naive() == today)
            })
            .map(Into::into)
            .collect())
    }

    pub async fn report(&self, ctx: &AuthContext, restaurant_id: i64) -> AppResult<LeadReport> {
        ctx.ensure_restaurant_access(restaurant_id)?;
        let list = self.restaurant_leads(restaurant_id).await?;
        Ok(build_report(&list))
    }

    pub async fn deliveries(
        &self,
        ctx: &AuthContext,
        lead_id: i64,
    ) -> AppResult<Vec<CouponDeliveryResponse>> {
        let lead = self.find_lead(ctx, lead_id).await?;
        let list = deliveries::Entity::find()
            .filter(deliveries::Column::LeadId.eq(lead.id))
            .order_by_asc(deliveries::Column::Id)
            .all(&self.pool)
            .await?;
        Ok(list.into_iter().map(Into::into).collect())
    }

    /// 向餐厅 webhook 发一条测试留资；未配置 URL 时不发请求直接报配置错误
    pub async fn test_restaurant_webhook(
        &self,
        ctx: &AuthContext,
        restaurant_id: i64,
    ) -> AppResult<WebhookTestResponse> {
        ctx.ensure_restaurant_access(restaurant_id)?;
        let restaurant = restaurants::Entity::find_by_id(restaurant_id)
            .one(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound("Restaurant not found".into()))?;

        let sample = leads::Model {
            id: 0,
            restaurant_id,
            name: "Teste Webhook".to_string(),
            phone: "11999999999".to_string(),
            prize: "Prêmio Teste".to_string(),
            day_pref: Some("Sexta".to_string()),
            time_pref: Some("Noite".to_string()),
            fav_product: Some("Pizza".to_string()),
            sent_by_admin: false,
            coupon_status: CouponStatus::Pending,
            remarketing_eligible_date: None,
            created_at: None,
            updated_at: None,
        };
        let payload = RestaurantLeadPayload::new(&sample, &restaurant);

        let outcome = self
            .webhook
            .deliver_restaurant(&payload, &restaurant)
            .await
            .ok_or_else(|| AppError::ConfigError("Restaurant webhook url is not configured".into()))?;

        Ok(WebhookTestResponse {
            delivered: outcome.is_sent(),
            http_status: outcome.http_status,
            error: outcome.error,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::CouponWebhookConfig;
    use crate::database::memory_pool;
    use crate::entities::{
        AccountRole, DeliveryChannel, NotificationType, metric_entity as metrics,
        notification_entity as notifications,
    };
    use crate::services::test_support::{seed_lead, seed_restaurant};
    use actix_web::http::StatusCode;
    use actix_web::{App, HttpResponse, HttpServer, web};
    use chrono::Duration;

    /// 本地 webhook，固定返回给定状态码
    async fn spawn_webhook(status: u16) -> String {
        let server = HttpServer::new(move || {
            App::new().default_service(web::to(move || async move {
                HttpResponse::build(StatusCode::from_u16(status).unwrap()).finish()
            }))
        })
        .workers(1)
        .bind(("127.0.0.1", 0))
        .unwrap();
        let addr = server.addrs()[0];
        actix_web::rt::spawn(server.run());
        format!("http://{addr}/coupon")
    }

    fn service(pool: DatabaseConnection, generic_url: Option<String>) -> LeadService {
        let webhook = CouponWebhookClient::new(&CouponWebhookConfig {
            url: generic_url,
            timeout_secs: 5,
        })
        .unwrap();
        LeadService::new(
            pool.clone(),
            webhook,
            MetricsService::new(pool.clone()),
            NotificationService::new(pool),
            "55".to_string(),
        )
    }

    fn owner_of(restaurant_id: i64) -> AuthContext {
        AuthContext {
            account_id: 1,
            role: AccountRole::RestaurantOwner,
            restaurant_id: Some(restaurant_id),
        }
    }

    fn submission(restaurant_id: i64, complete: bool) -> LeadSubmission {
        LeadSubmission {
            restaurant_id,
            name: "Maria".to_string(),
            phone: "11999999999".to_string(),
            prize: "A".to_string(),
            day_pref: complete.then(|| "Sexta".to_string()),
            time_pref: complete.then(|| "Noite".to_string()),
            fav_product: complete.then(|| "Pizza".to_string()),
        }
    }

    #[actix_web::test]
    async fn test_submit_lead_end_to_end() {
        let pool = memory_pool().await;
        let r = seed_restaurant(&pool, "cantina").await;
        let url = spawn_webhook(200).await;
        let service = service(pool.clone(), Some(url));

        let result = service.submit_lead(submission(r.id, true)).await.unwrap();
        assert_eq!(result.coupon_status, CouponStatus::Sent);

        let lead = leads::Entity::find_by_id(result.lead_id)
            .one(&pool)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(lead.prize, "A");
        assert_eq!(lead.coupon_status, CouponStatus::Sent);

        let hot = notifications::Entity::find()
            .filter(notifications::Column::NotificationType.eq(NotificationType::HotLead))
            .all(&pool)
            .await
            .unwrap();
        assert_eq!(hot.len(), 1);

        let restaurant = restaurants::Entity::find_by_id(r.id)
            .one(&pool)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(restaurant.metrics_leads, 1);

        let day = metrics::Entity::find().one(&pool).await.unwrap().unwrap();
        assert_eq!(day.leads, 1);
        assert_eq!(day.conversion_rate, 0.0);

        let history = service.deliveries(&owner_of(r.id), lead.id).await.unwrap();
        assert_eq!(history.len(), 1);
        assert_eq!(history[0].channel, DeliveryChannel::Generic);
        assert_eq!(history[0].http_status, Some(200));
    }

    #[actix_web::test]
    async fn test_unreachable_webhook_marks_failed() {
        let pool = memory_pool().await;
        let r = seed_restaurant(&pool, "cantina").await;
        let service = service(pool.clone(), Some("http://127.0.0.1:1/coupon".to_string()));

        let result = service.submit_lead(submission(r.id, false)).await.unwrap();
        assert_eq!(result.coupon_status, CouponStatus::Failed);

        let history = service
            .deliveries(&owner_of(r.id), result.lead_id)
            .await
            .unwrap();
        assert_eq!(history.len(), 1);
        assert_eq!(history[0].http_status, None);
        assert!(history[0].error.is_some());

        // 资料不完整，不是 hot lead
        let count = notifications::Entity::find().all(&pool).await.unwrap().len();
        assert_eq!(count, 0);
    }

    #[actix_web::test]
    async fn test_any_channel_success_is_sent() {
        let pool = memory_pool().await;
        let r = seed_restaurant(&pool, "cantina").await;
        let ok = spawn_webhook(201).await;
        let rejected = spawn_webhook(500).await;

        let mut am = r.into_active_model();
        am.webhook_url = Set(Some(ok));
        am.webhook_token = Set(Some("secret".to_string()));
        let r = am.update(&pool).await.unwrap();

        let service = service(pool.clone(), Some(rejected));
        let result = service.submit_lead(submission(r.id, false)).await.unwrap();
        assert_eq!(result.coupon_status, CouponStatus::Sent);

        let history = service
            .deliveries(&owner_of(r.id), result.lead_id)
            .await
            .unwrap();
        assert_eq!(history.len(), 2);
        assert_eq!(history[0].status, CouponStatus::Failed);
        assert_eq!(history[1].channel, DeliveryChannel::Restaurant);
        assert_eq!(history[1].status, CouponStatus::Sent);
    }

    #[actix_web::test]
    async fn test_no_channel_is_failed_not_pending() {
        let pool = memory_pool().await;
        let r = seed_restaurant(&pool, "cantina").await;
        let service = service(pool.clone(), None);

        let result = service.submit_lead(submission(r.id, false)).await.unwrap();
        assert_eq!(result.coupon_status, CouponStatus::Failed);
        let lead = leads::Entity::find_by_id(result.lead_id)
            .one(&pool)
            .await
            .unwrap()
            .unwrap();
        assert_ne!(lead.coupon_status, CouponStatus::Pending);
    }

    #[actix_web::test]
    async fn test_hot_lead_notified_once() {
        let pool = memory_pool().await;
        let r = seed_restaurant(&pool, "cantina").await;
        let service = service(pool.clone(), None);
        let result = service.submit_lead(submission(r.id, true)).await.unwrap();

        let lead = leads::Entity::find_by_id(result.lead_id)
            .one(&pool)
            .await
            .unwrap()
            .unwrap();
        // 重复调用同一留资的 hot lead 检查
        assert!(!service.notifications.notify_hot_lead(&lead).await.unwrap());

        let hot = notifications::Entity::find()
            .filter(notifications::Column::NotificationType.eq(NotificationType::HotLead))
            .all(&pool)
            .await
            .unwrap();
        assert_eq!(hot.len(), 1);
    }

    #[actix_web::test]
    async fn test_tenth_lead_reaches_milestone() {
        let pool = memory_pool().await;
        let r = seed_restaurant(&pool, "cantina").await;
        let service = service(pool.clone(), None);
        for _ in 0..10 {
            service.submit_lead(submission(r.id, false)).await.unwrap();
        }
        let milestones = notifications::Entity::find()
            .filter(notifications::Column::NotificationType.eq(NotificationType::Milestone))
            .all(&pool)
            .await
            .unwrap();
        assert_eq!(milestones.len(), 1);
        assert_eq!(milestones[0].dedup_key, format!("milestone:{}:10", r.id));
    }

    #[actix_web::test]
    async fn test_submit_lead_validation() {
        let pool = memory_pool().await;
        let r = seed_restaurant(&pool, "cantina").await;
        let service = service(pool, None);

        let mut bad_phone = submission(r.id, false);
        bad_phone.phone = "123".to_string();
        assert!(matches!(
            service.submit_lead(bad_phone).await,
            Err(AppError::ValidationError(_))
        ));

        let mut no_name = submission(r.id, false);
        no_name.name = "  ".to_string();
        assert!(matches!(
            service.submit_lead(no_name).await,
            Err(AppError::ValidationError(_))
        ));

        assert!(matches!(
            service.submit_lead(submission(999, false)).await,
            Err(AppError::NotFound(_))
        ));
    }

    #[actix_web::test]
    async fn test_owner_cannot_read_other_restaurant_leads() {
        let pool = memory_pool().await;
        let a = seed_restaurant(&pool, "a").await;
        let b = seed_restaurant(&pool, "b").await;
        let lead = seed_lead(&pool, a.id, "Maria", "A").await;
        let service = service(pool, None);

        assert!(service.get(&owner_of(a.id), lead.id).await.is_ok());
        assert!(matches!(
            service.get(&owner_of(b.id), lead.id).await,
            Err(AppError::Forbidden)
        ));
        assert!(service.list(&owner_of(a.id), None, &LeadQuery::default()).await.is_err());
    }

    #[actix_web::test]
    async fn test_contact_and_send_coupons() {
        let pool = memory_pool().await;
        let r = seed_restaurant(&pool, "cantina").await;
        let l1 = seed_lead(&pool, r.id, "Ana", "A").await;
        let l2 = seed_lead(&pool, r.id, "Bruno", "B").await;
        let service = service(pool.clone(), None);
        let ctx = owner_of(r.id);

        let link = service.mark_contacted(&ctx, l1.id, "Oi Ana!").await.unwrap();
        assert!(link.whatsapp_url.starts_with("https://wa.me/5511999999999?text="));
        assert!(service.get(&ctx, l1.id).await.unwrap().sent_by_admin);

        let links = service
            .send_coupons(
                &ctx,
                r.id,
                &SendCouponsRequest {
                    lead_ids: vec![l1.id, l2.id],
                    discount: "15% OFF".to_string(),
                },
            )
            .await
            .unwrap();
        assert_eq!(links.len(), 2);
        assert!(service.get(&ctx, l2.id).await.unwrap().sent_by_admin);

        let pending = LeadQuery {
            status: Some(LeadStatusFilter::Pending),
            ..Default::default()
        };
        let page = service.list(&ctx, Some(r.id), &pending).await.unwrap();
        assert_eq!(page.total, 0);
    }

    #[actix_web::test]
    async fn test_remarketing_today() {
        let pool = memory_pool().await;
        let r = seed_restaurant(&pool, "cantina").await;
        let today = seed_lead(&pool, r.id, "Ana", "A").await;
        let tomorrow = seed_lead(&pool, r.id, "Bruno", "A").await;
        let service = service(pool, None);
        let ctx = owner_of(r.id);

        service
            .set_remarketing_date(&ctx, today.id, Some(Utc::now()))
            .await
            .unwrap();
        service
            .set_remarketing_date(&ctx, tomorrow.id, Some(Utc::now() + Duration::days(1)))
            .await
            .unwrap();

        let list = service.remarketing_today(&ctx, r.id).await.unwrap();
        assert_eq!(list.len(), 1);
        assert_eq!(list[0].id, today.id);
    }

    #[actix_web::test]
    async fn test_webhook_test_requires_url() {
        let pool = memory_pool().await;
        let r = seed_restaurant(&pool, "cantina").await;
        let service = service(pool, None);
        assert!(matches!(
            service.test_restaurant_webhook(&owner_of(r.id), r.id).await,
            Err(AppError::ConfigError(_))
        ));
    }

    #[actix_web::test]
    async fn test_delete_lead_removes_history() {
        let pool = memory_pool().await;
        let r = seed_restaurant(&pool, "cantina").await;
        let service = service(pool.clone(), Some("http://127.0.0.1:1/coupon".to_string()));
        let result = service.submit_lead(submission(r.id, false)).await.unwrap();

        service.delete(&owner_of(r.id), result.lead_id).await.unwrap();
        assert!(deliveries::Entity::find().all(&pool).await.unwrap().is_empty());
        assert!(matches!(
            service.get(&owner_of(r.id), result.lead_id).await,
            Err(AppError::NotFound(_))
        ));
    }

    fn lead(id: i64, name: &str, prize: &str, contacted: bool, minutes: i64) -> leads::Model {
        leads::Model {
            id,
            restaurant_id: 1,
            name: name.to_string(),
            phone: format!("1199999000{id}"),
            prize: prize.to_string(),
            day_pref: Some("Sexta".to_string()),
            time_pref: (id % 2 == 0).then(|| "Noite".to_string()),
            fav_product: None,
            sent_by_admin: contacted,
            coupon_status: CouponStatus::Sent,
            remarketing_eligible_date: None,
            created_at: Some(Utc::now() + Duration::minutes(minutes)),
            updated_at: None,
        }
    }

    #[test]
    fn test_apply_lead_query() {
        let list = vec![
            lead(1, "Carla", "Pizza", false, 1),
            lead(2, "ana", "Refri", true, 2),
            lead(3, "Bruno", "Pizza", false, 3),
        ];

        let (page, total) = apply_lead_query(list.clone(), &LeadQuery::default());
        assert_eq!(total, 3);
        assert_eq!(page.iter().map(|l| l.id).collect::<Vec<_>>(), vec![3, 2, 1]);

        let by_name = LeadQuery {
            sort: Some(LeadSort::NameAsc),
            ..Default::default()
        };
        let (page, _) = apply_lead_query(list.clone(), &by_name);
        assert_eq!(page[0].name, "ana");

        let search = LeadQuery {
            search: Some("PIZ".to_string()),
            status: Some(LeadStatusFilter::Pending),
            ..Default::default()
        };
        let (page, total) = apply_lead_query(list.clone(), &search);
        assert_eq!(total, 2);
        assert!(page.iter().all(|l| l.prize == "Pizza"));

        let paged = LeadQuery {
            page: Some(2),
            per_page: Some(2),
            ..Default::default()
        };
        let (page, total) = apply_lead_query(list, &paged);
        assert_eq!(total, 3);
        assert_eq!(page.len(), 1);
    }

    #[test]
    fn test_build_report() {
        let list = vec![
            lead(1, "Carla", "Pizza", false, 1),
            lead(2, "Ana", "Refri", true, 2),
            lead(3, "Bruno", "Pizza", false, 3),
        ];
        let report = build_report(&list);
        assert_eq!(report.total, 3);
        assert_eq!(report.contacted, 1);
        assert_eq!(report.complete_profiles, 0);
        assert_eq!(
            report.by_prize[0],
            CountEntry {
                name: "Pizza".to_string(),
                value: 2
            }
        );
        assert_eq!(report.by_time_pref.len(), 1);
        assert!(report.by_fav_product.is_empty());
    }

    #[test]
    fn test_overall_status() {
        let sent = DeliveryOutcome {
            channel: DeliveryChannel::Generic,
            status: CouponStatus::Sent,
            http_status: Some(200),
            error: None,
        };
        let failed = DeliveryOutcome {
            channel: DeliveryChannel::Restaurant,
            status: CouponStatus::Failed,
            http_status: Some(500),
            error: Some("boom".into()),
        };
        assert_eq!(overall_status(&[]), CouponStatus::Failed);
        assert_eq!(overall_status(&[failed.clone()]), CouponStatus::Failed);
        assert_eq!(overall_status(&[failed, sent]), CouponStatus::Sent);
    }
}
