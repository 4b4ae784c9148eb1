use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// SeaORM entity for the `contractor_profiles` table.
///
/// `rating`, `completed_orders` and `current_order_id` are written only by
/// the assignment service; profile edits never touch them.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "contractor_profiles")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub user_id: i64,
    pub experience_years: Option<i32>,
    #[sea_orm(column_type = "Double")]
    pub rating: f64,
    pub completed_orders: i32,
    pub is_active: bool,
    pub current_order_id: Option<i64>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::users::Entity",
        from = "Column::UserId",
        to = "super::users::Column::Id"
    )]
    User,
    #[sea_orm(
        belongs_to = "super::orders::Entity",
        from = "Column::CurrentOrderId",
        to = "super::orders::Column::Id"
    )]
    CurrentOrder,
    #[sea_orm(has_many = "super::contractor_categories::Entity")]
    Categories,
}

impl Related<super::users::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::User.def()
    }
}

impl Related<super::contractor_categories::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Categories.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

// ── DTOs ──

/// Request body for `POST /api/contractor/profile`.
#[derive(Debug, Clone, Deserialize)]
pub struct UpdateProfileRequest {
    #[serde(alias = "telegram_id")]
    pub external_id: i64,
    #[serde(flatten)]
    pub profile: ProfileInput,
}

/// Full replacement of the contractor-editable profile fields.
#[derive(Debug, Clone, Deserialize)]
pub struct ProfileInput {
    pub experience_years: Option<i32>,
    #[serde(default)]
    pub categories: Vec<String>,
    pub is_active: bool,
}

/// A profile joined with the owning user's display fields.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ContractorProfileView {
    pub user_id: i64,
    pub external_id: i64,
    pub name: Option<String>,
    pub phone: Option<String>,
    pub avatar_url: Option<String>,
    pub experience_years: Option<i32>,
    pub rating: f64,
    pub completed_orders: i32,
    /// Sorted; an empty list means "accepts any category".
    pub categories: Vec<String>,
    pub is_active: bool,
    pub current_order_id: Option<i64>,
}

impl ContractorProfileView {
    pub fn new(
        profile: Model,
        user: &super::users::Model,
        categories: Vec<String>,
    ) -> Self {
        Self {
            user_id: profile.user_id,
            external_id: user.external_id,
            name: user.name.clone(),
            phone: user.phone.clone(),
            avatar_url: user.avatar_url.clone(),
            experience_years: profile.experience_years,
            rating: profile.rating,
            completed_orders: profile.completed_orders,
            categories,
            is_active: profile.is_active,
            current_order_id: profile.current_order_id,
        }
    }
}
