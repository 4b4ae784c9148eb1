pub use sea_orm_migration::prelude::*;

mod m20250301_000001_create_users_table;
mod m20250301_000002_create_orders_table;
mod m20250301_000003_create_contractor_profiles_table;
mod m20250301_000004_create_contractor_categories_table;
mod m20250301_000005_create_reviews_table;
mod m20250301_000006_add_order_indexes;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20250301_000001_create_users_table::Migration),
            Box::new(m20250301_000002_create_orders_table::Migration),
            Box::new(m20250301_000003_create_contractor_profiles_table::Migration),
            Box::new(m20250301_000004_create_contractor_categories_table::Migration),
            Box::new(m20250301_000005_create_reviews_table::Migration),
            Box::new(m20250301_000006_add_order_indexes::Migration),
        ]
    }
}
