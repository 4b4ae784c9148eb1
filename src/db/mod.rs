pub mod contractors;
pub mod orders;
pub mod users;

use sea_orm::{ConnectOptions, Database, DatabaseConnection, DbErr};

use crate::error::ServiceError;

/// Create a SeaORM database connection pool for `database_url`.
pub async fn create_pool(database_url: &str) -> Result<DatabaseConnection, DbErr> {
    let mut opts = ConnectOptions::new(database_url.to_owned());
    opts.sqlx_logging(false);
    Database::connect(opts).await
}

/// Shared handle to the relational store.
///
/// Without a configured connection string the server still starts, but every
/// core operation fails with [`ServiceError::Unavailable`].
#[derive(Clone, Default)]
pub struct Storage {
    conn: Option<DatabaseConnection>,
}

impl Storage {
    pub fn new(conn: DatabaseConnection) -> Self {
        Self { conn: Some(conn) }
    }

    pub fn disabled() -> Self {
        Self { conn: None }
    }

    pub fn conn(&self) -> Result<&DatabaseConnection, ServiceError> {
        self.conn.as_ref().ok_or(ServiceError::Unavailable)
    }
}
