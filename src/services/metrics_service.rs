use crate::entities::metrics::conversion_rate;
use crate::entities::{RestaurantStatus, metric_entity as metrics, restaurant_entity as restaurants};
use crate::error::{AppError, AppResult};
use crate::models::{GlobalOverview, MetricResponse, MetricsSummary, RestaurantOverview};
use chrono::{Duration, NaiveDate, Utc};
use sea_orm::sea_query::{Expr, OnConflict, Query};
use sea_orm::{
    ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder,
};

/// 计入统计的事件
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MetricEvent {
    Access,
    Spin,
    Lead,
}

impl MetricEvent {
    fn lifetime_column(self) -> restaurants::Column {
        match self {
            MetricEvent::Access => restaurants::Column::MetricsAccess,
            MetricEvent::Spin => restaurants::Column::MetricsSpins,
            MetricEvent::Lead => restaurants::Column::MetricsLeads,
        }
    }

    fn day_column(self) -> metrics::Column {
        match self {
            MetricEvent::Access => metrics::Column::Access,
            MetricEvent::Spin => metrics::Column::Spins,
            MetricEvent::Lead => metrics::Column::Leads,
        }
    }

    /// 新建日统计行时的初始值 (access, spins, leads)
    fn initial(self) -> (i64, i64, i64) {
        match self {
            MetricEvent::Access => (1, 0, 0),
            MetricEvent::Spin => (0, 1, 0),
            MetricEvent::Lead => (0, 0, 1),
        }
    }

    fn lifetime_value(self, restaurant: &restaurants::Model) -> i64 {
        match self {
            MetricEvent::Access => restaurant.metrics_access,
            MetricEvent::Spin => restaurant.metrics_spins,
            MetricEvent::Lead => restaurant.metrics_leads,
        }
    }
}

#[derive(Debug, Clone)]
pub struct MetricUpdate {
    /// 自增后的餐厅累计值
    pub lifetime_total: i64,
    pub day: metrics::Model,
}

#[derive(Clone)]
pub struct MetricsService {
    pool: DatabaseConnection,
}

impl MetricsService {
    pub fn new(pool: DatabaseConnection) -> Self {
        Self { pool }
    }

    pub async fn record(&self, restaurant_id: i64, event: MetricEvent) -> AppResult<MetricUpdate> {
        self.record_at(restaurant_id, event, Utc::now().date_naive())
            .await
    }

    /// 累计计数与当日统计各 +1
    ///
    /// 两处都是数据库端自增，不做读改写；当日行通过 (restaurant_id, date)
    /// 唯一索引 upsert，并发首写也只会产生一行。
    pub async fn record_at(
        &self,
        restaurant_id: i64,
        event: MetricEvent,
        date: NaiveDate,
    ) -> AppResult<MetricUpdate> {
        let now = Utc::now();
        let lifetime_col = event.lifetime_column();

        let res = restaurants::Entity::update_many()
            .col_expr(lifetime_col, Expr::col(lifetime_col).add(1))
            .col_expr(restaurants::Column::UpdatedAt, Expr::value(now))
            .filter(restaurants::Column::Id.eq(restaurant_id))
            .exec(&self.pool)
            .await?;
        if res.rows_affected == 0 {
            return Err(AppError::NotFound("Restaurant not found".into()));
        }

        let day_col = event.day_column();
        let (access, spins, leads) = event.initial();
        let upsert = Query::insert()
            .into_table(metrics::Entity)
            .columns([
                metrics::Column::RestaurantId,
                metrics::Column::Date,
                metrics::Column::Access,
                metrics::Column::Spins,
                metrics::Column::Leads,
                metrics::Column::ConversionRate,
                metrics::Column::CreatedAt,
                metrics::Column::UpdatedAt,
            ])
            .values_panic([
                restaurant_id.into(),
                date.into(),
                access.into(),
                spins.into(),
                leads.into(),
                conversion_rate(leads, access).into(),
                now.into(),
                now.into(),
            ])
            .on_conflict(
                OnConflict::columns([metrics::Column::RestaurantId, metrics::Column::Date])
                    .value(day_col, Expr::col((metrics::Entity, day_col)).add(1))
                    .value(metrics::Column::UpdatedAt, now)
                    .to_owned(),
            )
            .to_owned();
        let backend = self.pool.get_database_backend();
        self.pool.execute(backend.build(&upsert)).await?;

        let mut day = metrics::Entity::find()
            .filter(metrics::Column::RestaurantId.eq(restaurant_id))
            .filter(metrics::Column::Date.eq(date))
            .one(&self.pool)
            .await?
            .ok_or_else(|| AppError::InternalError("Daily metric row missing after upsert".into()))?;

        let rate = conversion_rate(day.leads, day.access);
        if rate != day.conversion_rate {
            metrics::Entity::update_many()
                .col_expr(metrics::Column::ConversionRate, Expr::value(rate))
                .filter(metrics::Column::Id.eq(day.id))
                .exec(&self.pool)
                .await?;
            day.conversion_rate = rate;
        }

        let restaurant = restaurants::Entity::find_by_id(restaurant_id)
            .one(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound("Restaurant not found".into()))?;

        Ok(MetricUpdate {
            lifetime_total: event.lifetime_value(&restaurant),
            day,
        })
    }

    /// 最近 `days` 天的日统计，按日期升序
    pub async fn list_daily(&self, restaurant_id: i64, days: u32) -> AppResult<Vec<MetricResponse>> {
        let days = days.clamp(1, 365);
        let since = Utc::now().date_naive() - Duration::days(days as i64 - 1);
        let rows = metrics::Entity::find()
            .filter(metrics::Column::RestaurantId.eq(restaurant_id))
            .filter(metrics::Column::Date.gte(since))
            .order_by_asc(metrics::Column::Date)
            .all(&self.pool)
            .await?;
        Ok(rows.into_iter().map(Into::into).collect())
    }

    pub async fn summary(&self, restaurant_id: i64, days: u32) -> AppResult<MetricsSummary> {
        let restaurant = restaurants::Entity::find_by_id(restaurant_id)
            .one(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound("Restaurant not found".into()))?;
        let days = self.list_daily(restaurant_id, days).await?;

        Ok(MetricsSummary {
            restaurant_id,
            total_access: restaurant.metrics_access,
            total_spins: restaurant.metrics_spins,
            total_leads: restaurant.metrics_leads,
            conversion_rate: conversion_rate(restaurant.metrics_leads, restaurant.metrics_access),
            days,
        })
    }

    /// 所有餐厅的累计统计
    pub async fn global_overview(&self) -> AppResult<GlobalOverview> {
        let list = restaurants::Entity::find()
            .order_by_asc(restaurants::Column::Id)
            .all(&self.pool)
            .await?;

        let total_access: i64 = list.iter().map(|r| r.metrics_access).sum();
        let total_spins: i64 = list.iter().map(|r| r.metrics_spins).sum();
        let total_leads: i64 = list.iter().map(|r| r.metrics_leads).sum();
        let active = list
            .iter()
            .filter(|r| r.status == RestaurantStatus::Active)
            .count();

        let per_restaurant = list
            .iter()
            .map(|r| RestaurantOverview {
                restaurant_id: r.id,
                name: r.name.clone(),
                slug: r.slug.clone(),
                access: r.metrics_access,
                spins: r.metrics_spins,
                leads: r.metrics_leads,
                conversion_rate: conversion_rate(r.metrics_leads, r.metrics_access),
            })
            .collect();

        Ok(GlobalOverview {
            restaurants: list.len() as i64,
            active_restaurants: active as i64,
            total_access,
            total_spins,
            total_leads,
            conversion_rate: conversion_rate(total_leads, total_access),
            per_restaurant,
        })
    }
}
