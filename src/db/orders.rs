use std::collections::HashMap;

use sea_orm::*;

use crate::db::users as user_db;
use crate::models::orders::{self, NewOrder, OrderStatus, OrderView};

/// Insert a new order for `client_id` (always starts Pending).
pub async fn insert_order<C: ConnectionTrait>(
    db: &C,
    client_id: i64,
    input: NewOrder,
) -> Result<orders::Model, DbErr> {
    let new_order = orders::ActiveModel {
        client_id: Set(client_id),
        contractor_id: Set(None),
        category: Set(input.category),
        area: Set(input.area),
        address: Set(input.address),
        status: Set(OrderStatus::Pending),
        created_at: Set(chrono::Utc::now()),
        accepted_at: Set(None),
        completed_at: Set(None),
        ..Default::default()
    };

    new_order.insert(db).await
}

/// Fetch a single order by ID.
pub async fn get_order_by_id<C: ConnectionTrait>(
    db: &C,
    id: i64,
) -> Result<Option<orders::Model>, DbErr> {
    orders::Entity::find_by_id(id).one(db).await
}

/// All orders assigned to a contractor, newest first.
pub async fn get_orders_by_contractor<C: ConnectionTrait>(
    db: &C,
    contractor_id: i64,
) -> Result<Vec<orders::Model>, DbErr> {
    orders::Entity::find()
        .filter(orders::Column::ContractorId.eq(contractor_id))
        .order_by_desc(orders::Column::CreatedAt)
        .order_by_desc(orders::Column::Id)
        .all(db)
        .await
}

/// Every order still waiting for a contractor, newest first.
pub async fn get_pending_orders<C: ConnectionTrait>(db: &C) -> Result<Vec<orders::Model>, DbErr> {
    orders::Entity::find()
        .filter(orders::Column::Status.eq(OrderStatus::Pending))
        .order_by_desc(orders::Column::CreatedAt)
        .order_by_desc(orders::Column::Id)
        .all(db)
        .await
}

/// Attach client and contractor display fields to each order.
pub async fn with_parties<C: ConnectionTrait>(
    db: &C,
    orders: Vec<orders::Model>,
) -> Result<Vec<OrderView>, DbErr> {
    let mut ids: Vec<i64> = orders
        .iter()
        .flat_map(|o| std::iter::once(o.client_id).chain(o.contractor_id))
        .collect();
    ids.sort_unstable();
    ids.dedup();

    let users: HashMap<i64, _> = user_db::get_users_by_ids(db, ids)
        .await?
        .into_iter()
        .map(|u| (u.id, u))
        .collect();

    Ok(orders
        .into_iter()
        .map(|order| {
            let client = users.get(&order.client_id);
            let contractor = order.contractor_id.and_then(|id| users.get(&id));
            let mut view = OrderView::from(order);
            if let Some(client) = client {
                view.client_name = client.name.clone();
                view.client_external_id = Some(client.external_id);
            }
            if let Some(contractor) = contractor {
                view.contractor_name = contractor.name.clone();
                view.contractor_external_id = Some(contractor.external_id);
            }
            view
        })
        .collect())
}

/// Single-order variant of [`with_parties`].
pub async fn order_view<C: ConnectionTrait>(
    db: &C,
    order: orders::Model,
) -> Result<OrderView, DbErr> {
    let mut views = with_parties(db, vec![order]).await?;
    views
        .pop()
        .ok_or_else(|| DbErr::Custom("order view lost during join".to_string()))
}
