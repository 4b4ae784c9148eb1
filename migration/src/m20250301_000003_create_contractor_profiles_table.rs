use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

/// One row per contractor; keyed by the owning user.
#[derive(DeriveIden)]
enum ContractorProfiles {
    Table,
    UserId,
    ExperienceYears,
    Rating,
    CompletedOrders,
    IsActive,
    CurrentOrderId,
}

#[derive(DeriveIden)]
enum Users {
    Table,
    Id,
}

#[derive(DeriveIden)]
enum Orders {
    Table,
    Id,
}

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(ContractorProfiles::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(ContractorProfiles::UserId)
                            .big_integer()
                            .not_null()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(ContractorProfiles::ExperienceYears)
                            .integer()
                            .null(),
                    )
                    .col(
                        ColumnDef::new(ContractorProfiles::Rating)
                            .double()
                            .not_null()
                            .default(0.0),
                    )
                    .col(
                        ColumnDef::new(ContractorProfiles::CompletedOrders)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(ContractorProfiles::IsActive)
                            .boolean()
                            .not_null()
                            .default(true),
                    )
                    .col(
                        ColumnDef::new(ContractorProfiles::CurrentOrderId)
                            .big_integer()
                            .null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_contractor_profiles_user_id")
                            .from(ContractorProfiles::Table, ContractorProfiles::UserId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_contractor_profiles_current_order_id")
                            .from(ContractorProfiles::Table, ContractorProfiles::CurrentOrderId)
                            .to(Orders::Table, Orders::Id)
                            .on_delete(ForeignKeyAction::SetNull),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(ContractorProfiles::Table).to_owned())
            .await
    }
}
