use std::fmt;
use std::str::FromStr;

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use crate::error::ServiceError;

/// The `Roles` enum maps to a TEXT column stored as lowercase strings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, EnumIter, DeriveActiveEnum)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::None)")]
#[serde(rename_all = "lowercase")]
pub enum Roles {
    #[sea_orm(string_value = "client")]
    Client,
    #[sea_orm(string_value = "contractor")]
    Contractor,
}

impl fmt::Display for Roles {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Roles::Client => write!(f, "client"),
            Roles::Contractor => write!(f, "contractor"),
        }
    }
}

/// SeaORM entity for the `users` table.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "users")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    #[sea_orm(unique)]
    pub external_id: i64,
    pub role: Roles,
    pub name: Option<String>,
    pub phone: Option<String>,
    pub avatar_url: Option<String>,
    pub created_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_one = "super::contractor_profiles::Entity")]
    ContractorProfile,
}

impl Related<super::contractor_profiles::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::ContractorProfile.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    /// Fails with `InvalidArgument` unless the user holds `role`.
    pub fn require_role(&self, role: Roles) -> Result<(), ServiceError> {
        if self.role == role {
            Ok(())
        } else {
            Err(ServiceError::invalid(format!(
                "User {} is not a {role}",
                self.external_id
            )))
        }
    }
}

/// Caller-supplied identity key. Always a positive integer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct ExternalId(i64);

impl ExternalId {
    pub fn new(raw: i64) -> Result<Self, ServiceError> {
        if raw > 0 {
            Ok(Self(raw))
        } else {
            Err(ServiceError::invalid(format!("Invalid external id: {raw}")))
        }
    }

    pub fn get(self) -> i64 {
        self.0
    }
}

impl FromStr for ExternalId {
    type Err = ServiceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let raw = s
            .trim()
            .parse::<i64>()
            .map_err(|_| ServiceError::invalid(format!("Invalid external id: {s:?}")))?;
        Self::new(raw)
    }
}

impl fmt::Display for ExternalId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

// ── DTOs (not stored in DB, used for request bodies) ──

/// Optional value per mutable user field; `None` leaves the column untouched.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UserFields {
    pub role: Option<Roles>,
    pub name: Option<String>,
    pub phone: Option<String>,
    pub avatar_url: Option<String>,
}

/// Used by the `POST /api/user` endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct UpsertUserRequest {
    #[serde(alias = "telegram_id")]
    pub external_id: i64,
    #[serde(flatten)]
    pub fields: UserFields,
}

/// A user representation for API responses.
#[derive(Debug, Clone, Serialize)]
pub struct UserResponse {
    pub id: i64,
    pub external_id: i64,
    pub role: Roles,
    pub name: Option<String>,
    pub phone: Option<String>,
    pub avatar_url: Option<String>,
    pub created_at: DateTimeUtc,
}

impl From<Model> for UserResponse {
    fn from(m: Model) -> Self {
        Self {
            id: m.id,
            external_id: m.external_id,
            role: m.role,
            name: m.name,
            phone: m.phone,
            avatar_url: m.avatar_url,
            created_at: m.created_at,
        }
    }
}
