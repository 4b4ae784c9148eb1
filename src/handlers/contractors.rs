use actix_web::{HttpResponse, web};
use sea_orm::DbErr;

use crate::db::Storage;
use crate::db::contractors as contractor_db;
use crate::error::ServiceError;
use crate::models::SearchQuery;
use crate::models::contractor_categories::{normalize_categories, normalize_category};
use crate::models::contractor_profiles::UpdateProfileRequest;
use crate::models::users::{ExternalId, Roles};

/// POST /api/contractor/profile — replace a contractor's editable profile.
///
/// Creates the profile on first call. Rating, completed orders and the
/// current assignment are never changed here.
pub async fn update_profile(
    storage: web::Data<Storage>,
    body: web::Json<UpdateProfileRequest>,
) -> Result<HttpResponse, ServiceError> {
    let UpdateProfileRequest {
        external_id,
        profile,
    } = body.into_inner();
    let external_id = ExternalId::new(external_id)?;
    let db = storage.conn()?;

    let user = super::require_user(db, external_id).await?;
    user.require_role(Roles::Contractor)?;

    if let Some(years) = profile.experience_years {
        if years < 0 {
            return Err(ServiceError::invalid(format!(
                "Experience must not be negative, got {years}"
            )));
        }
    }
    let categories = normalize_categories(&profile.categories)?;

    contractor_db::upsert_profile(
        db,
        user.id,
        profile.experience_years,
        categories,
        profile.is_active,
    )
    .await?;

    let view = contractor_db::get_profile(db, user.id)
        .await?
        .ok_or_else(|| DbErr::RecordNotFound(format!("Profile {} vanished", user.id)))?;

    tracing::info!(
        user_id = user.id,
        is_active = view.is_active,
        categories = view.categories.len(),
        "contractor profile saved"
    );
    Ok(HttpResponse::Ok().json(serde_json::json!({ "profile": view })))
}

/// GET /api/contractors/search?category= — available contractors for a category.
pub async fn search(
    storage: web::Data<Storage>,
    query: web::Query<SearchQuery>,
) -> Result<HttpResponse, ServiceError> {
    let category = query
        .category
        .as_deref()
        .ok_or_else(|| ServiceError::invalid("Category is required"))
        .and_then(normalize_category)?;
    let db = storage.conn()?;

    let contractors = contractor_db::list_available(db, &category).await?;

    Ok(HttpResponse::Ok().json(serde_json::json!({ "contractors": contractors })))
}
