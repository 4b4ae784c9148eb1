use sea_orm::*;

use crate::models::users::{self, ExternalId, Roles, UserFields};

/// Fetch a user by external id. Absence is not an error.
pub async fn find_by_external_id<C: ConnectionTrait>(
    db: &C,
    external_id: ExternalId,
) -> Result<Option<users::Model>, DbErr> {
    users::Entity::find()
        .filter(users::Column::ExternalId.eq(external_id.get()))
        .one(db)
        .await
}

/// Fetch several users by internal ID in one query.
pub async fn get_users_by_ids<C: ConnectionTrait>(
    db: &C,
    ids: Vec<i64>,
) -> Result<Vec<users::Model>, DbErr> {
    if ids.is_empty() {
        return Ok(Vec::new());
    }
    users::Entity::find()
        .filter(users::Column::Id.is_in(ids))
        .all(db)
        .await
}

/// Insert a new user with the given role.
pub async fn insert_user<C: ConnectionTrait>(
    db: &C,
    external_id: ExternalId,
    role: Roles,
    fields: UserFields,
) -> Result<users::Model, DbErr> {
    let new_user = users::ActiveModel {
        external_id: Set(external_id.get()),
        role: Set(role),
        name: Set(fields.name),
        phone: Set(fields.phone),
        avatar_url: Set(fields.avatar_url),
        created_at: Set(chrono::Utc::now()),
        ..Default::default()
    };

    new_user.insert(db).await
}

/// Apply only the supplied fields to an existing user.
pub async fn update_user<C: ConnectionTrait>(
    db: &C,
    user: users::Model,
    fields: UserFields,
) -> Result<users::Model, DbErr> {
    let mut active: users::ActiveModel = user.into();

    if let Some(role) = fields.role {
        active.role = Set(role);
    }
    if let Some(name) = fields.name {
        active.name = Set(Some(name));
    }
    if let Some(phone) = fields.phone {
        active.phone = Set(Some(phone));
    }
    if let Some(avatar_url) = fields.avatar_url {
        active.avatar_url = Set(Some(avatar_url));
    }

    if !active.is_changed() {
        return active.try_into_model();
    }

    active.update(db).await
}

/// Create the user on first contact, otherwise apply a partial update.
///
/// The role is mandatory only on creation. Switching roles never creates or
/// removes a contractor profile.
pub async fn create_or_update<C: ConnectionTrait>(
    db: &C,
    external_id: ExternalId,
    fields: UserFields,
) -> Result<UpsertOutcome, DbErr> {
    match find_by_external_id(db, external_id).await? {
        Some(existing) => Ok(UpsertOutcome::Updated(update_user(db, existing, fields).await?)),
        None => match fields.role {
            Some(role) => Ok(UpsertOutcome::Created(
                insert_user(db, external_id, role, fields).await?,
            )),
            None => Ok(UpsertOutcome::MissingRole),
        },
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum UpsertOutcome {
    Created(users::Model),
    Updated(users::Model),
    /// No user exists yet and no role was supplied to create one.
    MissingRole,
}
