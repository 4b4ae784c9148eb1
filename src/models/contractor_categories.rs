use std::collections::BTreeSet;

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use crate::error::ServiceError;

/// SeaORM entity for the `contractor_categories` table.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "contractor_categories")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub user_id: i64,
    pub category: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::contractor_profiles::Entity",
        from = "Column::UserId",
        to = "super::contractor_profiles::Column::UserId"
    )]
    Profile,
}

impl Related<super::contractor_profiles::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Profile.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

/// Trim a single category tag; blank tags are rejected.
pub fn normalize_category(raw: &str) -> Result<String, ServiceError> {
    let tag = raw.trim();
    if tag.is_empty() {
        return Err(ServiceError::invalid("Category must not be empty"));
    }
    Ok(tag.to_string())
}

/// Turn a caller-supplied list into a sorted, duplicate-free set.
pub fn normalize_categories(raw: &[String]) -> Result<BTreeSet<String>, ServiceError> {
    raw.iter().map(|c| normalize_category(c)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn collapses_duplicates_and_sorts() {
        let set = normalize_categories(&[
            "premium".into(),
            " comfort ".into(),
            "comfort".into(),
        ])
        .unwrap();
        assert_eq!(
            set.into_iter().collect::<Vec<_>>(),
            vec!["comfort".to_string(), "premium".to_string()]
        );
    }

    #[test]
    fn rejects_blank_tags() {
        let err = normalize_categories(&["econom".into(), "   ".into()]).unwrap_err();
        assert!(matches!(err, ServiceError::InvalidArgument(_)));
    }

    #[test]
    fn empty_list_is_a_valid_generalist_set() {
        assert!(normalize_categories(&[]).unwrap().is_empty());
    }
}
