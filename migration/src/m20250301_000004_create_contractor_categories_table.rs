use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

/// Normalized category set: one row per (contractor, category) pair.
#[derive(DeriveIden)]
enum ContractorCategories {
    Table,
    Id,
    UserId,
    Category,
}

#[derive(DeriveIden)]
enum ContractorProfiles {
    Table,
    UserId,
}

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(ContractorCategories::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(ContractorCategories::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(ContractorCategories::UserId)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(ContractorCategories::Category)
                            .string()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_contractor_categories_user_id")
                            .from(ContractorCategories::Table, ContractorCategories::UserId)
                            .to(ContractorProfiles::Table, ContractorProfiles::UserId)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // A category appears at most once per contractor.
        manager
            .create_index(
                Index::create()
                    .name("uq_contractor_categories_user_category")
                    .table(ContractorCategories::Table)
                    .col(ContractorCategories::UserId)
                    .col(ContractorCategories::Category)
                    .unique()
                    .to_owned(),
            )
            .await?;

        // Candidate search filters by category first.
        manager
            .create_index(
                Index::create()
                    .name("idx_contractor_categories_category")
                    .table(ContractorCategories::Table)
                    .col(ContractorCategories::Category)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(ContractorCategories::Table).to_owned())
            .await
    }
}
