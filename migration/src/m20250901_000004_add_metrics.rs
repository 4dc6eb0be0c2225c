use sea_orm_migration::prelude::*;

use super::m20250901_000001_initial::Restaurants;

/// Metrics (每个餐厅每天一行)
#[derive(DeriveIden)]
enum Metrics {
    Table,
    Id,
    RestaurantId,
    Date,
    Access,
    Spins,
    Leads,
    ConversionRate,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Metrics::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Metrics::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Metrics::RestaurantId).big_integer().not_null())
                    .col(ColumnDef::new(Metrics::Date).date().not_null())
                    .col(ColumnDef::new(Metrics::Access).big_integer().not_null().default(0))
                    .col(ColumnDef::new(Metrics::Spins).big_integer().not_null().default(0))
                    .col(ColumnDef::new(Metrics::Leads).big_integer().not_null().default(0))
                    .col(
                        ColumnDef::new(Metrics::ConversionRate)
                            .double()
                            .not_null()
                            .default(0.0),
                    )
                    .col(
                        ColumnDef::new(Metrics::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(
                        ColumnDef::new(Metrics::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_metrics_restaurant")
                            .from(Metrics::Table, Metrics::RestaurantId)
                            .to(Restaurants::Table, Restaurants::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // (restaurant_id, date) 唯一，upsert 的冲突目标
        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_metrics_restaurant_date_unique")
                    .table(Metrics::Table)
                    .col(Metrics::RestaurantId)
                    .col(Metrics::Date)
                    .unique()
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().if_exists().table(Metrics::Table).to_owned())
            .await?;
        Ok(())
    }
}
