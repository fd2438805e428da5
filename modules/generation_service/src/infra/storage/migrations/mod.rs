//! Database migrations for generation service

use sea_orm_migration::prelude::*;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20250101_000001_create_users::Migration),
            Box::new(m20250101_000002_create_recipes::Migration),
            Box::new(m20250101_000003_create_subscriptions::Migration),
            Box::new(m20250101_000004_create_orders::Migration),
            Box::new(m20250101_000005_create_deliveries::Migration),
        ]
    }
}

/// Creation, update and soft-delete timestamp columns shared by every table
fn envelope_columns<T: IntoIden>(
    table: &mut TableCreateStatement,
    created_at: T,
    updated_at: T,
    deleted_at: T,
) {
    table
        .col(
            ColumnDef::new(created_at)
                .timestamp_with_time_zone()
                .not_null()
                .default(Expr::current_timestamp()),
        )
        .col(
            ColumnDef::new(updated_at)
                .timestamp_with_time_zone()
                .not_null()
                .default(Expr::current_timestamp()),
        )
        .col(ColumnDef::new(deleted_at).timestamp_with_time_zone());
}

#[derive(DeriveIden)]
enum Users {
    Table,
    Id,
    Email,
    FirstName,
    LastName,
    Timezone,
    CreatedAt,
    UpdatedAt,
    DeletedAt,
}

#[derive(DeriveIden)]
enum Recipes {
    Table,
    Id,
    Name,
    Description,
    Calories,
    Tags,
    Price,
    PreparationTime,
    Servings,
    ImageUrl,
    CreatedAt,
    UpdatedAt,
    DeletedAt,
}

#[derive(DeriveIden)]
enum Subscriptions {
    Table,
    Id,
    UserId,
    Status,
    Preferences,
    StartedAt,
    CreatedAt,
    UpdatedAt,
    DeletedAt,
}

#[derive(DeriveIden)]
enum Orders {
    Table,
    Id,
    SubscriptionId,
    Recipes,
    TotalAmount,
    Status,
    OrderDate,
    DeliveryDate,
    CreatedAt,
    UpdatedAt,
    DeletedAt,
}

#[derive(DeriveIden)]
enum Deliveries {
    Table,
    Id,
    OrderId,
    Status,
    ExpectedDeliveryDate,
    ActualDeliveryDate,
    TrackingNumber,
    Notes,
    CreatedAt,
    UpdatedAt,
    DeletedAt,
}

mod m20250101_000001_create_users {
    use super::*;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20250101_000001_create_users"
        }
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            let mut table = Table::create();
            table
                .table(Users::Table)
                .if_not_exists()
                .col(ColumnDef::new(Users::Id).uuid().not_null().primary_key())
                .col(ColumnDef::new(Users::Email).string().not_null().unique_key())
                .col(ColumnDef::new(Users::FirstName).string().not_null())
                .col(ColumnDef::new(Users::LastName).string().not_null())
                .col(ColumnDef::new(Users::Timezone).string().not_null());
            envelope_columns(&mut table, Users::CreatedAt, Users::UpdatedAt, Users::DeletedAt);

            manager.create_table(table.to_owned()).await
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(Users::Table).to_owned())
                .await
        }
    }
}

mod m20250101_000002_create_recipes {
    use super::*;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20250101_000002_create_recipes"
        }
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            let mut table = Table::create();
            table
                .table(Recipes::Table)
                .if_not_exists()
                .col(ColumnDef::new(Recipes::Id).uuid().not_null().primary_key())
                .col(ColumnDef::new(Recipes::Name).string().not_null())
                .col(ColumnDef::new(Recipes::Description).text())
                .col(ColumnDef::new(Recipes::Calories).integer().not_null())
                .col(ColumnDef::new(Recipes::Tags).json())
                .col(ColumnDef::new(Recipes::Price).decimal_len(10, 2))
                .col(ColumnDef::new(Recipes::PreparationTime).integer())
                .col(ColumnDef::new(Recipes::Servings).integer())
                .col(ColumnDef::new(Recipes::ImageUrl).string());
            envelope_columns(
                &mut table,
                Recipes::CreatedAt,
                Recipes::UpdatedAt,
                Recipes::DeletedAt,
            );

            manager.create_table(table.to_owned()).await
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(Recipes::Table).to_owned())
                .await
        }
    }
}

mod m20250101_000003_create_subscriptions {
    use super::*;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20250101_000003_create_subscriptions"
        }
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            let mut table = Table::create();
            table
                .table(Subscriptions::Table)
                .if_not_exists()
                .col(ColumnDef::new(Subscriptions::Id).uuid().not_null().primary_key())
                .col(ColumnDef::new(Subscriptions::UserId).uuid().not_null())
                .col(ColumnDef::new(Subscriptions::Status).string().not_null())
                .col(ColumnDef::new(Subscriptions::Preferences).json())
                .col(
                    ColumnDef::new(Subscriptions::StartedAt)
                        .timestamp_with_time_zone()
                        .not_null(),
                )
                .foreign_key(
                    ForeignKey::create()
                        .name("fk_subscriptions_user")
                        .from(Subscriptions::Table, Subscriptions::UserId)
                        .to(Users::Table, Users::Id)
                        .on_delete(ForeignKeyAction::Restrict),
                );
            envelope_columns(
                &mut table,
                Subscriptions::CreatedAt,
                Subscriptions::UpdatedAt,
                Subscriptions::DeletedAt,
            );

            manager.create_table(table.to_owned()).await?;

            manager
                .create_index(
                    Index::create()
                        .name("idx_subscriptions_status")
                        .table(Subscriptions::Table)
                        .col(Subscriptions::Status)
                        .to_owned(),
                )
                .await
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(Subscriptions::Table).to_owned())
                .await
        }
    }
}

mod m20250101_000004_create_orders {
    use super::*;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20250101_000004_create_orders"
        }
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            let mut table = Table::create();
            table
                .table(Orders::Table)
                .if_not_exists()
                .col(ColumnDef::new(Orders::Id).uuid().not_null().primary_key())
                .col(ColumnDef::new(Orders::SubscriptionId).uuid().not_null())
                .col(ColumnDef::new(Orders::Recipes).json().not_null())
                .col(ColumnDef::new(Orders::TotalAmount).decimal_len(10, 2).not_null())
                .col(ColumnDef::new(Orders::Status).string().not_null())
                .col(
                    ColumnDef::new(Orders::OrderDate)
                        .timestamp_with_time_zone()
                        .not_null(),
                )
                .col(
                    ColumnDef::new(Orders::DeliveryDate)
                        .timestamp_with_time_zone()
                        .not_null(),
                )
                .foreign_key(
                    ForeignKey::create()
                        .name("fk_orders_subscription")
                        .from(Orders::Table, Orders::SubscriptionId)
                        .to(Subscriptions::Table, Subscriptions::Id)
                        .on_delete(ForeignKeyAction::Restrict),
                );
            envelope_columns(&mut table, Orders::CreatedAt, Orders::UpdatedAt, Orders::DeletedAt);

            manager.create_table(table.to_owned()).await
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(Orders::Table).to_owned())
                .await
        }
    }
}

mod m20250101_000005_create_deliveries {
    use super::*;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20250101_000005_create_deliveries"
        }
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            let mut table = Table::create();
            table
                .table(Deliveries::Table)
                .if_not_exists()
                .col(ColumnDef::new(Deliveries::Id).uuid().not_null().primary_key())
                .col(ColumnDef::new(Deliveries::OrderId).uuid().not_null().unique_key())
                .col(ColumnDef::new(Deliveries::Status).string().not_null())
                .col(
                    ColumnDef::new(Deliveries::ExpectedDeliveryDate)
                        .timestamp_with_time_zone()
                        .not_null(),
                )
                .col(ColumnDef::new(Deliveries::ActualDeliveryDate).timestamp_with_time_zone())
                .col(ColumnDef::new(Deliveries::TrackingNumber).string())
                .col(ColumnDef::new(Deliveries::Notes).string())
                .foreign_key(
                    ForeignKey::create()
                        .name("fk_deliveries_order")
                        .from(Deliveries::Table, Deliveries::OrderId)
                        .to(Orders::Table, Orders::Id)
                        .on_delete(ForeignKeyAction::Restrict),
                );
            envelope_columns(
                &mut table,
                Deliveries::CreatedAt,
                Deliveries::UpdatedAt,
                Deliveries::DeletedAt,
            );

            manager.create_table(table.to_owned()).await
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(Deliveries::Table).to_owned())
                .await
        }
    }
}
