use sea_orm_migration::prelude::*;

use super::m20240601_000001_create_users_tables::Users;
use super::m20240601_000002_create_catalog_tables::Services;
use super::m20240601_000003_create_orders_tables::{OrderItems, Orders};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Notifications::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Notifications::Id)
                            .uuid()
                            .primary_key()
                            .not_null(),
                    )
                    .col(ColumnDef::new(Notifications::UserId).uuid().not_null())
                    .col(ColumnDef::new(Notifications::Title).string().not_null())
                    .col(ColumnDef::new(Notifications::Message).text().not_null())
                    .col(
                        ColumnDef::new(Notifications::IsRead)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(
                        ColumnDef::new(Notifications::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_notifications_user_id")
                            .from(Notifications::Table, Notifications::UserId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_notifications_user_id")
                    .table(Notifications::Table)
                    .col(Notifications::UserId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Quotations::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Quotations::Id)
                            .uuid()
                            .primary_key()
                            .not_null(),
                    )
                    .col(ColumnDef::new(Quotations::CustomerId).uuid().not_null())
                    .col(ColumnDef::new(Quotations::Name).string().not_null())
                    .col(ColumnDef::new(Quotations::Email).string().not_null())
                    .col(ColumnDef::new(Quotations::Phone).string().not_null())
                    .col(ColumnDef::new(Quotations::ServiceId).uuid().null())
                    .col(ColumnDef::new(Quotations::Details).text().not_null())
                    .col(ColumnDef::new(Quotations::Dimensions).string().null())
                    .col(
                        ColumnDef::new(Quotations::Status)
                            .string_len(32)
                            .not_null()
                            .default("Pending"),
                    )
                    .col(ColumnDef::new(Quotations::Note).text().null())
                    .col(
                        ColumnDef::new(Quotations::EstimatedPrice)
                            .decimal_len(19, 4)
                            .null(),
                    )
                    .col(
                        ColumnDef::new(Quotations::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Quotations::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_quotations_customer_id")
                            .from(Quotations::Table, Quotations::CustomerId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_quotations_service_id")
                            .from(Quotations::Table, Quotations::ServiceId)
                            .to(Services::Table, Services::Id)
                            .on_delete(ForeignKeyAction::SetNull)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Feedback::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Feedback::Id).uuid().primary_key().not_null())
                    .col(ColumnDef::new(Feedback::UserId).uuid().not_null())
                    .col(ColumnDef::new(Feedback::OrderId).uuid().null())
                    .col(ColumnDef::new(Feedback::Message).text().not_null())
                    .col(
                        ColumnDef::new(Feedback::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_feedback_user_id")
                            .from(Feedback::Table, Feedback::UserId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_feedback_order_id")
                            .from(Feedback::Table, Feedback::OrderId)
                            .to(Orders::Table, Orders::Id)
                            .on_delete(ForeignKeyAction::SetNull)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(ServiceRatings::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(ServiceRatings::Id)
                            .uuid()
                            .primary_key()
                            .not_null(),
                    )
                    .col(ColumnDef::new(ServiceRatings::ServiceId).uuid().not_null())
                    .col(ColumnDef::new(ServiceRatings::UserId).uuid().not_null())
                    .col(ColumnDef::new(ServiceRatings::OrderId).uuid().not_null())
                    .col(
                        ColumnDef::new(ServiceRatings::OrderItemId)
                            .uuid()
                            .not_null()
                            .unique_key(),
                    )
                    .col(
                        ColumnDef::new(ServiceRatings::Rating)
                            .small_integer()
                            .not_null(),
                    )
                    .col(ColumnDef::new(ServiceRatings::Comment).text().null())
                    .col(
                        ColumnDef::new(ServiceRatings::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_service_ratings_service_id")
                            .from(ServiceRatings::Table, ServiceRatings::ServiceId)
                            .to(Services::Table, Services::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_service_ratings_user_id")
                            .from(ServiceRatings::Table, ServiceRatings::UserId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_service_ratings_order_item_id")
                            .from(ServiceRatings::Table, ServiceRatings::OrderItemId)
                            .to(OrderItems::Table, OrderItems::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(ServiceRatings::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Feedback::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Quotations::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Notifications::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
pub enum Notifications {
    Table,
    Id,
    UserId,
    Title,
    Message,
    IsRead,
    CreatedAt,
}

#[derive(DeriveIden)]
pub enum Quotations {
    Table,
    Id,
    CustomerId,
    Name,
    Email,
    Phone,
    ServiceId,
    Details,
    Dimensions,
    Status,
    Note,
    EstimatedPrice,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
pub enum Feedback {
    Table,
    Id,
    UserId,
    OrderId,
    Message,
    CreatedAt,
}

#[derive(DeriveIden)]
pub enum ServiceRatings {
    Table,
    Id,
    ServiceId,
    UserId,
    OrderId,
    OrderItemId,
    Rating,
    Comment,
    CreatedAt,
}
