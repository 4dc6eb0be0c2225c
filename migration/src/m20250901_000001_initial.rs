use sea_orm_migration::prelude::*;

/// Restaurants (租户)
#[derive(DeriveIden)]
pub enum Restaurants {
    Table,
    Id,
    Name,
    Slug,
    Status,
    Whatsapp,
    Color,
    WebhookUrl,
    WebhookToken,
    MetricsAccess,
    MetricsSpins,
    MetricsLeads,
    CreatedAt,
    UpdatedAt,
}

/// Dashboard accounts (super admin / restaurant owner)
#[derive(DeriveIden)]
enum Accounts {
    Table,
    Id,
    Email,
    PasswordHash,
    Role,
    RestaurantId,
    EmailConfirmed,
    CreatedAt,
    UpdatedAt,
}

/// Global favourite product catalog
#[derive(DeriveIden)]
enum FoodOptions {
    Table,
    Id,
    Name,
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
                    .table(Restaurants::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Restaurants::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Restaurants::Name).string_len(255).not_null())
                    .col(ColumnDef::new(Restaurants::Slug).string_len(120).not_null())
                    .col(
                        ColumnDef::new(Restaurants::Status)
                            .string_len(16)
                            .not_null()
                            .default("active"),
                    )
                    .col(ColumnDef::new(Restaurants::Whatsapp).string_len(32).null())
                    .col(ColumnDef::new(Restaurants::Color).string_len(16).null())
                    .col(ColumnDef::new(Restaurants::WebhookUrl).text().null())
                    .col(ColumnDef::new(Restaurants::WebhookToken).text().null())
                    .col(
                        ColumnDef::new(Restaurants::MetricsAccess)
                            .big_integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(Restaurants::MetricsSpins)
                            .big_integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(Restaurants::MetricsLeads)
                            .big_integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(Restaurants::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(
                        ColumnDef::new(Restaurants::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .to_owned(),
            )
            .await?;

        // slug 用于公开转盘链接，必须唯一
        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_restaurants_slug_unique")
                    .table(Restaurants::Table)
                    .col(Restaurants::Slug)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Accounts::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Accounts::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Accounts::Email).string_len(255).not_null())
                    .col(ColumnDef::new(Accounts::PasswordHash).string_len(255).not_null())
                    .col(ColumnDef::new(Accounts::Role).string_len(32).not_null())
                    .col(ColumnDef::new(Accounts::RestaurantId).big_integer().null())
                    .col(
                        ColumnDef::new(Accounts::EmailConfirmed)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(
                        ColumnDef::new(Accounts::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(
                        ColumnDef::new(Accounts::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_accounts_restaurant")
                            .from(Accounts::Table, Accounts::RestaurantId)
                            .to(Restaurants::Table, Restaurants::Id)
                            .on_delete(ForeignKeyAction::SetNull),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_accounts_email_unique")
                    .table(Accounts::Table)
                    .col(Accounts::Email)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(FoodOptions::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(FoodOptions::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(FoodOptions::Name).string_len(120).not_null())
                    .col(
                        ColumnDef::new(FoodOptions::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_food_options_name_unique")
                    .table(FoodOptions::Table)
                    .col(FoodOptions::Name)
                    .unique()
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().if_exists().table(FoodOptions::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().if_exists().table(Accounts::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().if_exists().table(Restaurants::Table).to_owned())
            .await?;
        Ok(())
    }
}
