pub mod contractors;
pub mod orders;
pub mod tariffs;
pub mod users;

use actix_web::{error, web};
use sea_orm::ConnectionTrait;

use crate::db::users as user_db;
use crate::error::ServiceError;
use crate::models::users::{self as user_model, ExternalId};

pub fn init_routes(cfg: &mut web::ServiceConfig) {
    // Malformed bodies and query strings share the `{"error": ...}` shape.
    cfg.app_data(web::JsonConfig::default().error_handler(|err, _req| {
        let msg = err.to_string();
        error::InternalError::from_response(err, invalid_response(msg)).into()
    }));
    cfg.app_data(web::QueryConfig::default().error_handler(|err, _req| {
        let msg = err.to_string();
        error::InternalError::from_response(err, invalid_response(msg)).into()
    }));

    // ── Catalog ──
    cfg.route("/tariffs", web::get().to(tariffs::get_tariffs));

    // ── Identity ──
    cfg.route("/user", web::post().to(users::create_or_update_user));
    cfg.route("/user/{external_id}", web::get().to(users::get_user));

    // ── Contractor directory ──
    cfg.route("/contractor/profile", web::post().to(contractors::update_profile));
    cfg.route("/contractors/search", web::get().to(contractors::search));
    cfg.route(
        "/contractor/orders/{external_id}",
        web::get().to(orders::get_contractor_orders),
    );
    cfg.route(
        "/contractor/pending-orders/{external_id}",
        web::get().to(orders::get_pending_orders),
    );

    // ── Orders ──
    cfg.service(
        web::scope("/orders")
            .route("", web::post().to(orders::create_order))
            .route("/{order_id}", web::get().to(orders::get_order))
            .route("/{order_id}/accept", web::post().to(orders::accept_order))
            .route("/{order_id}/complete", web::post().to(orders::complete_order))
            .route("/{order_id}/reject", web::post().to(orders::reject_order)),
    );
}

fn invalid_response(msg: String) -> actix_web::HttpResponse {
    actix_web::ResponseError::error_response(&ServiceError::InvalidArgument(msg))
}

/// Resolve an external id to a user, or `NotFound`.
pub(crate) async fn require_user<C: ConnectionTrait>(
    db: &C,
    external_id: ExternalId,
) -> Result<user_model::Model, ServiceError> {
    user_db::find_by_external_id(db, external_id)
        .await?
        .ok_or_else(|| ServiceError::not_found(format!("User {external_id} not found")))
}

/// Parse an order id path segment.
pub(crate) fn parse_order_id(raw: &str) -> Result<i64, ServiceError> {
    match raw.trim().parse::<i64>() {
        Ok(id) if id > 0 => Ok(id),
        _ => Err(ServiceError::invalid(format!("Invalid order id: {raw:?}"))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn order_ids_must_be_positive_integers() {
        assert_eq!(parse_order_id("15").unwrap(), 15);
        for raw in ["0", "-1", "abc", ""] {
            assert!(parse_order_id(raw).is_err(), "{raw}");
        }
    }
}
