use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Suppliers::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Suppliers::Id).uuid().primary_key().not_null())
                    .col(
                        ColumnDef::new(Suppliers::Name)
                            .string()
                            .not_null()
                            .unique_key(),
                    )
                    .col(ColumnDef::new(Suppliers::ContactPerson).string().not_null())
                    .col(ColumnDef::new(Suppliers::Email).string().null())
                    .col(ColumnDef::new(Suppliers::Phone).string().null())
                    .col(ColumnDef::new(Suppliers::Address).text().null())
                    .col(
                        ColumnDef::new(Suppliers::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Suppliers::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Materials::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Materials::Id).uuid().primary_key().not_null())
                    .col(ColumnDef::new(Materials::Name).string().not_null())
                    .col(ColumnDef::new(Materials::SupplierId).uuid().not_null())
                    .col(ColumnDef::new(Materials::Unit).string_len(32).not_null())
                    .col(
                        ColumnDef::new(Materials::Quantity)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(Materials::UnitPrice)
                            .decimal_len(19, 4)
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(Materials::ReorderLevel)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(Materials::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Materials::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_materials_supplier_id")
                            .from(Materials::Table, Materials::SupplierId)
                            .to(Suppliers::Table, Suppliers::Id)
                            .on_delete(ForeignKeyAction::Restrict)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_materials_name_supplier")
                    .table(Materials::Table)
                    .col(Materials::Name)
                    .col(Materials::SupplierId)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Services::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Services::Id).uuid().primary_key().not_null())
                    .col(
                        ColumnDef::new(Services::Name)
                            .string()
                            .not_null()
                            .unique_key(),
                    )
                    .col(ColumnDef::new(Services::Description).text().not_null())
                    .col(ColumnDef::new(Services::Category).string().not_null())
                    .col(
                        ColumnDef::new(Services::Price)
                            .decimal_len(19, 4)
                            .not_null()
                            .default(0),
                    )
                    .col(ColumnDef::new(Services::Colors).json().not_null())
                    .col(ColumnDef::new(Services::Images).json().not_null())
                    .col(
                        ColumnDef::new(Services::IsAvailable)
                            .boolean()
                            .not_null()
                            .default(true),
                    )
                    .col(
                        ColumnDef::new(Services::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Services::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Services::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Materials::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Suppliers::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
pub enum Suppliers {
    Table,
    Id,
    Name,
    ContactPerson,
    Email,
    Phone,
    Address,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
pub enum Materials {
    Table,
    Id,
    Name,
    SupplierId,
    Unit,
    Quantity,
    UnitPrice,
    ReorderLevel,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
pub enum Services {
    Table,
    Id,
    Name,
    Description,
    Category,
    Price,
    Colors,
    Images,
    IsAvailable,
    CreatedAt,
    UpdatedAt,
}
