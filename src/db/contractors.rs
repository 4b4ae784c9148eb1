use std::collections::{BTreeSet, HashMap};

use sea_orm::sea_query::Query;
use sea_orm::*;

use crate::models::contractor_categories;
use crate::models::contractor_profiles::{self, ContractorProfileView};
use crate::models::users;

/// Upper bound on candidates returned by [`list_available`].
pub const MAX_CANDIDATES: u64 = 10;

/// Fetch the profile row for a contractor.
pub async fn get_profile_row<C: ConnectionTrait>(
    db: &C,
    user_id: i64,
) -> Result<Option<contractor_profiles::Model>, DbErr> {
    contractor_profiles::Entity::find_by_id(user_id).one(db).await
}

/// Fetch a profile joined with identity fields and categories.
pub async fn get_profile<C: ConnectionTrait>(
    db: &C,
    user_id: i64,
) -> Result<Option<ContractorProfileView>, DbErr> {
    let Some((profile, Some(user))) = contractor_profiles::Entity::find_by_id(user_id)
        .find_also_related(users::Entity)
        .one(db)
        .await?
    else {
        return Ok(None);
    };

    let mut categories = categories_for(db, vec![user_id]).await?;
    let categories = categories.remove(&user_id).unwrap_or_default();

    Ok(Some(ContractorProfileView::new(profile, &user, categories)))
}

/// Replace experience, categories and active flag; create the row if absent.
///
/// Rating, completed-order count and current order are left as they are.
/// Runs in its own transaction so the category set is never half-written.
pub async fn upsert_profile(
    db: &DatabaseConnection,
    user_id: i64,
    experience_years: Option<i32>,
    categories: BTreeSet<String>,
    is_active: bool,
) -> Result<(), DbErr> {
    let txn = db.begin().await?;

    match get_profile_row(&txn, user_id).await? {
        Some(existing) => {
            let mut active: contractor_profiles::ActiveModel = existing.into();
            active.experience_years = Set(experience_years);
            active.is_active = Set(is_active);
            active.update(&txn).await?;
        }
        None => {
            contractor_profiles::ActiveModel {
                user_id: Set(user_id),
                experience_years: Set(experience_years),
                rating: Set(0.0),
                completed_orders: Set(0),
                is_active: Set(is_active),
                current_order_id: Set(None),
            }
            .insert(&txn)
            .await?;
        }
    }

    contractor_categories::Entity::delete_many()
        .filter(contractor_categories::Column::UserId.eq(user_id))
        .exec(&txn)
        .await?;

    for category in categories {
        contractor_categories::Entity::insert(contractor_categories::ActiveModel {
            user_id: Set(user_id),
            category: Set(category),
            ..Default::default()
        })
        .exec(&txn)
        .await?;
    }

    txn.commit().await
}

/// Candidate contractors for `category`.
///
/// Active, not holding an order, and either listing the category exactly or
/// listing no categories at all. Best rated first, then most completed
/// orders; capped at [`MAX_CANDIDATES`].
pub async fn list_available<C: ConnectionTrait>(
    db: &C,
    category: &str,
) -> Result<Vec<ContractorProfileView>, DbErr> {
    let offers_category = Query::select()
        .column(contractor_categories::Column::UserId)
        .from(contractor_categories::Entity)
        .and_where(contractor_categories::Column::Category.eq(category))
        .to_owned();

    let has_any_category = Query::select()
        .column(contractor_categories::Column::UserId)
        .from(contractor_categories::Entity)
        .to_owned();

    let rows = contractor_profiles::Entity::find()
        .filter(contractor_profiles::Column::IsActive.eq(true))
        .filter(contractor_profiles::Column::CurrentOrderId.is_null())
        .filter(
            Condition::any()
                .add(contractor_profiles::Column::UserId.in_subquery(offers_category))
                .add(contractor_profiles::Column::UserId.not_in_subquery(has_any_category)),
        )
        .find_also_related(users::Entity)
        .order_by_desc(contractor_profiles::Column::Rating)
        .order_by_desc(contractor_profiles::Column::CompletedOrders)
        .order_by_asc(contractor_profiles::Column::UserId)
        .limit(MAX_CANDIDATES)
        .all(db)
        .await?;

    let ids = rows.iter().map(|(p, _)| p.user_id).collect();
    let mut categories = categories_for(db, ids).await?;

    Ok(rows
        .into_iter()
        .filter_map(|(profile, user)| {
            let user = user?;
            let cats = categories.remove(&profile.user_id).unwrap_or_default();
            Some(ContractorProfileView::new(profile, &user, cats))
        })
        .collect())
}

/// Sorted category lists for each of `user_ids`.
async fn categories_for<C: ConnectionTrait>(
    db: &C,
    user_ids: Vec<i64>,
) -> Result<HashMap<i64, Vec<String>>, DbErr> {
    if user_ids.is_empty() {
        return Ok(HashMap::new());
    }

    let rows = contractor_categories::Entity::find()
        .filter(contractor_categories::Column::UserId.is_in(user_ids))
        .order_by_asc(contractor_categories::Column::Category)
        .all(db)
        .await?;

    let mut by_user: HashMap<i64, Vec<String>> = HashMap::new();
    for row in rows {
        by_user.entry(row.user_id).or_default().push(row.category);
    }
    Ok(by_user)
}
