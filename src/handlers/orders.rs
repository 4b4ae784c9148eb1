use actix_web::{HttpResponse, web};

use crate::db::Storage;
use crate::db::orders as order_db;
use crate::error::ServiceError;
use crate::models::orders::{CreateOrderRequest, OrderActionRequest};
use crate::models::users::{ExternalId, Roles};
use crate::services::assignment;

/// POST /api/orders — a client places a new order (starts Pending).
pub async fn create_order(
    storage: web::Data<Storage>,
    body: web::Json<CreateOrderRequest>,
) -> Result<HttpResponse, ServiceError> {
    let CreateOrderRequest { external_id, order } = body.into_inner();
    let external_id = ExternalId::new(external_id)?;
    let db = storage.conn()?;

    let client = super::require_user(db, external_id).await?;
    let order = assignment::place_order(db, &client, order).await?;
    let view = order_db::order_view(db, order).await?;

    Ok(HttpResponse::Created().json(serde_json::json!({ "order": view })))
}

/// GET /api/orders/{order_id} — a single order with both parties.
pub async fn get_order(
    storage: web::Data<Storage>,
    path: web::Path<String>,
) -> Result<HttpResponse, ServiceError> {
    let order_id = super::parse_order_id(&path)?;
    let db = storage.conn()?;

    let order = order_db::get_order_by_id(db, order_id)
        .await?
        .ok_or_else(|| ServiceError::not_found(format!("Order {order_id} not found")))?;
    let view = order_db::order_view(db, order).await?;

    Ok(HttpResponse::Ok().json(serde_json::json!({ "order": view })))
}

/// GET /api/contractor/orders/{external_id} — a contractor's orders, newest first.
pub async fn get_contractor_orders(
    storage: web::Data<Storage>,
    path: web::Path<String>,
) -> Result<HttpResponse, ServiceError> {
    let external_id: ExternalId = path.parse()?;
    let db = storage.conn()?;

    let contractor = super::require_user(db, external_id).await?;
    contractor.require_role(Roles::Contractor)?;

    let orders = order_db::get_orders_by_contractor(db, contractor.id).await?;
    let views = order_db::with_parties(db, orders).await?;

    Ok(HttpResponse::Ok().json(serde_json::json!({ "orders": views })))
}

/// GET /api/contractor/pending-orders/{external_id} — the open order feed.
pub async fn get_pending_orders(
    storage: web::Data<Storage>,
    path: web::Path<String>,
) -> Result<HttpResponse, ServiceError> {
    let external_id: ExternalId = path.parse()?;
    let db = storage.conn()?;

    let contractor = super::require_user(db, external_id).await?;
    contractor.require_role(Roles::Contractor)?;

    let orders = order_db::get_pending_orders(db).await?;
    let views = order_db::with_parties(db, orders).await?;

    Ok(HttpResponse::Ok().json(serde_json::json!({ "orders": views })))
}

/// POST /api/orders/{order_id}/accept — a contractor takes a pending order.
///
/// Answers 409 if the order was already taken or the contractor is busy.
pub async fn accept_order(
    storage: web::Data<Storage>,
    path: web::Path<String>,
    body: web::Json<OrderActionRequest>,
) -> Result<HttpResponse, ServiceError> {
    let order_id = super::parse_order_id(&path)?;
    let external_id = ExternalId::new(body.external_id)?;
    let db = storage.conn()?;

    let contractor = super::require_user(db, external_id).await?;
    let order = assignment::accept_order(db, order_id, &contractor).await?;
    let view = order_db::order_view(db, order).await?;

    Ok(HttpResponse::Ok().json(serde_json::json!({ "order": view })))
}

/// POST /api/orders/{order_id}/complete — the assigned contractor finishes an order.
pub async fn complete_order(
    storage: web::Data<Storage>,
    path: web::Path<String>,
    body: web::Json<OrderActionRequest>,
) -> Result<HttpResponse, ServiceError> {
    let order_id = super::parse_order_id(&path)?;
    let external_id = ExternalId::new(body.external_id)?;
    let db = storage.conn()?;

    let contractor = super::require_user(db, external_id).await?;
    let order = assignment::complete_order(db, order_id, &contractor).await?;
    let view = order_db::order_view(db, order).await?;

    Ok(HttpResponse::Ok().json(serde_json::json!({ "order": view })))
}

/// POST /api/orders/{order_id}/reject — cancel a pending or accepted order.
pub async fn reject_order(
    storage: web::Data<Storage>,
    path: web::Path<String>,
) -> Result<HttpResponse, ServiceError> {
    let order_id = super::parse_order_id(&path)?;
    let db = storage.conn()?;

    let order = assignment::cancel_order(db, order_id).await?;
    let view = order_db::order_view(db, order).await?;

    Ok(HttpResponse::Ok().json(serde_json::json!({
        "success": true,
        "order": view,
    })))
}
