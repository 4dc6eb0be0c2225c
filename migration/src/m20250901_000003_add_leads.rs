use sea_orm_migration::prelude::*;

use super::m20250901_000001_initial::Restaurants;

/// Leads (转盘中奖后留资)
/// prize 为奖品名称快照，不做外键，奖品删除后仍可回溯
#[derive(DeriveIden)]
pub enum Leads {
    Table,
    Id,
    RestaurantId,
    Name,
    Phone,
    Prize,
    DayPref,
    TimePref,
    FavProduct,
    SentByAdmin,
    CouponStatus,
    RemarketingEligibleDate,
    CreatedAt,
    UpdatedAt,
}

/// 每个渠道的一次投递尝试
#[derive(DeriveIden)]
enum CouponDeliveries {
    Table,
    Id,
    LeadId,
    Channel,
    Status,
    HttpStatus,
    Error,
    CreatedAt,
}

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Leads::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Leads::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Leads::RestaurantId).big_integer().not_null())
                    .col(ColumnDef::new(Leads::Name).string_len(255).not_null())
                    .col(ColumnDef::new(Leads::Phone).string_len(32).not_null())
                    .col(ColumnDef::new(Leads::Prize).string_len(255).not_null())
                    .col(ColumnDef::new(Leads::DayPref).string_len(32).null())
                    .col(ColumnDef::new(Leads::TimePref).string_len(32).null())
                    .col(ColumnDef::new(Leads::FavProduct).string_len(120).null())
                    .col(
                        ColumnDef::new(Leads::SentByAdmin)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(
                        ColumnDef::new(Leads::CouponStatus)
                            .string_len(16)
                            .not_null()
                            .default("pending"),
                    )
                    .col(
                        ColumnDef::new(Leads::RemarketingEligibleDate)
                            .timestamp_with_time_zone()
                            .null(),
                    )
                    .col(
                        ColumnDef::new(Leads::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(
                        ColumnDef::new(Leads::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_leads_restaurant")
                            .from(Leads::Table, Leads::RestaurantId)
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
                    .name("idx_leads_restaurant")
                    .table(Leads::Table)
                    .col(Leads::RestaurantId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(CouponDeliveries::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(CouponDeliveries::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(CouponDeliveries::LeadId).big_integer().not_null())
                    .col(ColumnDef::new(CouponDeliveries::Channel).string_len(16).not_null())
                    .col(ColumnDef::new(CouponDeliveries::Status).string_len(16).not_null())
                    .col(ColumnDef::new(CouponDeliveries::HttpStatus).integer().null())
                    .col(ColumnDef::new(CouponDeliveries::Error).text().null())
                    .col(
                        ColumnDef::new(CouponDeliveries::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_coupon_deliveries_lead")
                            .from(CouponDeliveries::Table, CouponDeliveries::LeadId)
                            .to(Leads::Table, Leads::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_coupon_deliveries_lead")
                    .table(CouponDeliveries::Table)
                    .col(CouponDeliveries::LeadId)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // 删除顺序：投递记录 -> 留资
        manager
            .drop_table(
                Table::drop()
                    .if_exists()
                    .table(CouponDeliveries::Table)
                    .to_owned(),
            )
            .await?;
        manager
            .drop_table(Table::drop().if_exists().table(Leads::Table).to_owned())
            .await?;
        Ok(())
    }
}
