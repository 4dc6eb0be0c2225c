use sea_orm_migration::prelude::*;

use super::m20250901_000001_initial::Restaurants;

/// Prizes (每个餐厅自己的转盘奖品)
/// - chance: 相对权重，不要求总和为 100
/// - limit_count: 库存上限 (NULL = 无限)
/// - limit_period: total | daily | weekly | monthly，current_count 在周期切换时清零
#[derive(DeriveIden)]
pub enum Prizes {
    Table,
    Id,
    RestaurantId,
    Name,
    Chance,
    Tier,
    Color,
    CurrentCount,
    LimitCount,
    LimitPeriod,
    ExpirationDate,
    CounterResetAt,
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
                    .table(Prizes::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Prizes::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Prizes::RestaurantId).big_integer().not_null())
                    .col(ColumnDef::new(Prizes::Name).string_len(255).not_null())
                    .col(ColumnDef::new(Prizes::Chance).integer().not_null().default(0))
                    .col(
                        ColumnDef::new(Prizes::Tier)
                            .string_len(16)
                            .not_null()
                            .default("common"),
                    )
                    .col(ColumnDef::new(Prizes::Color).string_len(16).null())
                    .col(
                        ColumnDef::new(Prizes::CurrentCount)
                            .big_integer()
                            .not_null()
                            .default(0),
                    )
                    .col(ColumnDef::new(Prizes::LimitCount).big_integer().null())
                    .col(
                        ColumnDef::new(Prizes::LimitPeriod)
                            .string_len(16)
                            .not_null()
                            .default("total"),
                    )
                    .col(ColumnDef::new(Prizes::ExpirationDate).date().null())
                    .col(
                        ColumnDef::new(Prizes::CounterResetAt)
                            .timestamp_with_time_zone()
                            .null(),
                    )
                    .col(
                        ColumnDef::new(Prizes::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(
                        ColumnDef::new(Prizes::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_prizes_restaurant")
                            .from(Prizes::Table, Prizes::RestaurantId)
                            .to(Restaurants::Table, Restaurants::Id)
                            .on_delete(ForeignKeyAction::Restrict),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_prizes_restaurant")
                    .table(Prizes::Table)
                    .col(Prizes::RestaurantId)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().if_exists().table(Prizes::Table).to_owned())
            .await?;
        Ok(())
    }
}
