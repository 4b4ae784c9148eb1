//! Order lifecycle transitions and their contractor-side effects.
//!
//! Each transition is a single database transaction. The order row is moved
//! with a conditional `UPDATE ... WHERE status IN (...)`; the contractor row is
//! only touched after that update changed exactly one row, so a losing racer
//! never writes to the directory.

use sea_orm::sea_query::{Expr, ExprTrait};
use sea_orm::*;

use crate::db::contractors as contractor_db;
use crate::db::orders as order_db;
use crate::error::ServiceError;
use crate::models::contractor_profiles;
use crate::models::orders::{self, NewOrder, OrderStatus};
use crate::models::users::{self, Roles};

/// Place a new order on behalf of a client. The order starts Pending.
pub async fn place_order<C: ConnectionTrait>(
    db: &C,
    client: &users::Model,
    input: NewOrder,
) -> Result<orders::Model, ServiceError> {
    client.require_role(Roles::Client)?;

    let category = input.category.trim().to_string();
    if category.is_empty() {
        return Err(ServiceError::invalid("Category is required"));
    }
    if let Some(area) = input.area {
        if !area.is_finite() || area <= 0.0 {
            return Err(ServiceError::invalid(format!(
                "Area must be a positive number, got {area}"
            )));
        }
    }

    let order = order_db::insert_order(
        db,
        client.id,
        NewOrder {
            category,
            ..input
        },
    )
    .await?;

    tracing::info!(
        order_id = order.id,
        client_id = client.id,
        category = %order.category,
        "order placed"
    );
    Ok(order)
}

/// Bind a pending order to `contractor`.
///
/// Fails with `Conflict` when the order is no longer pending or the
/// contractor already holds an order; in both cases nothing is written.
pub async fn accept_order(
    db: &DatabaseConnection,
    order_id: i64,
    contractor: &users::Model,
) -> Result<orders::Model, ServiceError> {
    contractor.require_role(Roles::Contractor)?;

    let txn = db.begin().await?;

    let flipped = orders::Entity::update_many()
        .set(orders::ActiveModel {
            status: Set(OrderStatus::Accepted),
            contractor_id: Set(Some(contractor.id)),
            accepted_at: Set(Some(chrono::Utc::now())),
            ..Default::default()
        })
        .filter(orders::Column::Id.eq(order_id))
        .filter(orders::Column::Status.is_in(OrderStatus::sources(OrderStatus::Accepted)))
        .exec(&txn)
        .await?;

    if flipped.rows_affected != 1 {
        let current = order_db::get_order_by_id(&txn, order_id).await?;
        txn.rollback().await?;
        return Err(match current {
            None => ServiceError::not_found(format!("Order {order_id} not found")),
            Some(order) => {
                tracing::warn!(order_id, status = %order.status, "accept rejected");
                ServiceError::conflict(format!(
                    "Order {order_id} is already {}",
                    order.status
                ))
            }
        });
    }

    let claimed = contractor_profiles::Entity::update_many()
        .set(contractor_profiles::ActiveModel {
            current_order_id: Set(Some(order_id)),
            ..Default::default()
        })
        .filter(contractor_profiles::Column::UserId.eq(contractor.id))
        .filter(contractor_profiles::Column::CurrentOrderId.is_null())
        .exec(&txn)
        .await?;

    if claimed.rows_affected != 1 {
        let profile = contractor_db::get_profile_row(&txn, contractor.id).await?;
        txn.rollback().await?;
        return Err(match profile.and_then(|p| p.current_order_id) {
            Some(held) => {
                tracing::warn!(order_id, contractor_id = contractor.id, held, "contractor busy");
                ServiceError::conflict(format!(
                    "Contractor {} already holds order {held}",
                    contractor.external_id
                ))
            }
            None => ServiceError::invalid(format!(
                "Contractor {} has no profile",
                contractor.external_id
            )),
        });
    }

    let order = order_db::get_order_by_id(&txn, order_id)
        .await?
        .ok_or_else(|| ServiceError::not_found(format!("Order {order_id} not found")))?;
    txn.commit().await?;

    tracing::info!(order_id, contractor_id = contractor.id, "order accepted");
    Ok(order)
}

/// Finish an accepted order and release its contractor.
///
/// Only `Accepted -> Completed` is allowed, so the completed-order counter
/// moves at most once per order.
pub async fn complete_order(
    db: &DatabaseConnection,
    order_id: i64,
    contractor: &users::Model,
) -> Result<orders::Model, ServiceError> {
    contractor.require_role(Roles::Contractor)?;

    let txn = db.begin().await?;

    let order = order_db::get_order_by_id(&txn, order_id)
        .await?
        .ok_or_else(|| ServiceError::not_found(format!("Order {order_id} not found")))?;

    if let Some(assigned) = order.contractor_id {
        if assigned != contractor.id {
            txn.rollback().await?;
            return Err(ServiceError::invalid(format!(
                "Order {order_id} is assigned to another contractor"
            )));
        }
    }

    let flipped = orders::Entity::update_many()
        .set(orders::ActiveModel {
            status: Set(OrderStatus::Completed),
            completed_at: Set(Some(chrono::Utc::now())),
            ..Default::default()
        })
        .filter(orders::Column::Id.eq(order_id))
        .filter(orders::Column::Status.is_in(OrderStatus::sources(OrderStatus::Completed)))
        .exec(&txn)
        .await?;

    if flipped.rows_affected != 1 {
        txn.rollback().await?;
        tracing::warn!(order_id, status = %order.status, "complete rejected");
        return Err(ServiceError::conflict(format!(
            "Order {order_id} is {} and cannot be completed",
            order.status
        )));
    }

    let order = order_db::get_order_by_id(&txn, order_id)
        .await?
        .ok_or_else(|| ServiceError::not_found(format!("Order {order_id} not found")))?;

    if let Some(contractor_id) = order.contractor_id {
        contractor_profiles::Entity::update_many()
            .col_expr(
                contractor_profiles::Column::CompletedOrders,
                Expr::col(contractor_profiles::Column::CompletedOrders).add(1),
            )
            .filter(contractor_profiles::Column::UserId.eq(contractor_id))
            .exec(&txn)
            .await?;
        release_contractor(&txn, contractor_id, order_id).await?;
    }

    txn.commit().await?;

    tracing::info!(order_id, contractor_id = contractor.id, "order completed");
    Ok(order)
}

/// Cancel a pending or accepted order.
///
/// A contractor still pointing at the order is released in the same
/// transaction.
pub async fn cancel_order(
    db: &DatabaseConnection,
    order_id: i64,
) -> Result<orders::Model, ServiceError> {
    let txn = db.begin().await?;

    let flipped = orders::Entity::update_many()
        .set(orders::ActiveModel {
            status: Set(OrderStatus::Cancelled),
            ..Default::default()
        })
        .filter(orders::Column::Id.eq(order_id))
        .filter(orders::Column::Status.is_in(OrderStatus::sources(OrderStatus::Cancelled)))
        .exec(&txn)
        .await?;

    let current = order_db::get_order_by_id(&txn, order_id).await?;

    if flipped.rows_affected != 1 {
        txn.rollback().await?;
        return Err(match current {
            None => ServiceError::not_found(format!("Order {order_id} not found")),
            Some(order) => {
                tracing::warn!(order_id, status = %order.status, "cancel rejected");
                ServiceError::conflict(format!(
                    "Order {order_id} is already {}",
                    order.status
                ))
            }
        });
    }

    let order = current
        .ok_or_else(|| ServiceError::not_found(format!("Order {order_id} not found")))?;

    if let Some(contractor_id) = order.contractor_id {
        release_contractor(&txn, contractor_id, order_id).await?;
    }

    txn.commit().await?;

    tracing::info!(order_id, "order cancelled");
    Ok(order)
}

/// Clear the contractor's current order, but only while it still points at `order_id`.
async fn release_contractor<C: ConnectionTrait>(
    db: &C,
    contractor_id: i64,
    order_id: i64,
) -> Result<(), DbErr> {
    contractor_profiles::Entity::update_many()
        .set(contractor_profiles::ActiveModel {
            current_order_id: Set(None),
            ..Default::default()
        })
        .filter(contractor_profiles::Column::UserId.eq(contractor_id))
        .filter(contractor_profiles::Column::CurrentOrderId.eq(order_id))
        .exec(db)
        .await?;
    Ok(())
}
