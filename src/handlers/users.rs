use actix_web::{HttpResponse, web};

use crate::cache::IdentityCache;
use crate::db::Storage;
use crate::db::contractors as contractor_db;
use crate::db::users::{self as user_db, UpsertOutcome};
use crate::error::ServiceError;
use crate::models::users::{ExternalId, Roles, UpsertUserRequest, UserResponse};

/// GET /api/user/{external_id} — a user plus their contractor profile, if any.
pub async fn get_user(
    storage: web::Data<Storage>,
    cache: web::Data<IdentityCache>,
    path: web::Path<String>,
) -> Result<HttpResponse, ServiceError> {
    let external_id: ExternalId = path.parse()?;
    let db = storage.conn()?;

    // Try the cache first
    let user = match cache.get(external_id).await {
        Some(cached) => cached,
        None => {
            let user = super::require_user(db, external_id).await?;
            cache.put(user.clone()).await;
            user
        }
    };

    let profile = match user.role {
        Roles::Contractor => contractor_db::get_profile(db, user.id).await?,
        Roles::Client => None,
    };

    Ok(HttpResponse::Ok().json(serde_json::json!({
        "user": UserResponse::from(user),
        "profile": profile,
    })))
}

/// POST /api/user — create on first contact, otherwise update supplied fields.
pub async fn create_or_update_user(
    storage: web::Data<Storage>,
    cache: web::Data<IdentityCache>,
    body: web::Json<UpsertUserRequest>,
) -> Result<HttpResponse, ServiceError> {
    let UpsertUserRequest {
        external_id,
        fields,
    } = body.into_inner();
    let external_id = ExternalId::new(external_id)?;
    let db = storage.conn()?;

    let outcome = user_db::create_or_update(db, external_id, fields).await?;
    cache.invalidate(external_id).await;

    match outcome {
        UpsertOutcome::Created(user) => {
            tracing::info!(external_id = %external_id, role = %user.role, "user created");
            Ok(HttpResponse::Created().json(serde_json::json!({
                "user": UserResponse::from(user),
            })))
        }
        UpsertOutcome::Updated(user) => Ok(HttpResponse::Ok().json(serde_json::json!({
            "user": UserResponse::from(user),
        }))),
        UpsertOutcome::MissingRole => Err(ServiceError::invalid(
            "Role is required when creating a user",
        )),
    }
}
