use actix_web::{HttpResponse, Responder, web};

use crate::models::tariffs::TariffCatalog;

/// GET /api/tariffs — the static tariff catalog. Works without storage.
pub async fn get_tariffs(catalog: web::Data<TariffCatalog>) -> impl Responder {
    HttpResponse::Ok().json(catalog.get_ref())
}
