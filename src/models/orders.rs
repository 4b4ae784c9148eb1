use std::fmt;

use sea_orm::Iterable;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Order status stored as a lowercase string in the database.
///
/// Legal moves: `Pending -> Accepted -> Completed`, and `Pending | Accepted ->
/// Cancelled`. `Completed` and `Cancelled` are terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, EnumIter, DeriveActiveEnum)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::None)")]
#[serde(rename_all = "lowercase")]
pub enum OrderStatus {
    #[sea_orm(string_value = "pending")]
    Pending,
    #[sea_orm(string_value = "accepted")]
    Accepted,
    #[sea_orm(string_value = "completed")]
    Completed,
    #[sea_orm(string_value = "cancelled")]
    Cancelled,
}

impl OrderStatus {
    pub fn can_transition_to(self, next: OrderStatus) -> bool {
        use OrderStatus::*;
        matches!(
            (self, next),
            (Pending, Accepted) | (Accepted, Completed) | (Pending, Cancelled) | (Accepted, Cancelled)
        )
    }

    /// Statuses an order may be in for a move to `next` to apply.
    ///
    /// Feeds the `WHERE status IN (...)` guard of every transition.
    pub fn sources(next: OrderStatus) -> Vec<OrderStatus> {
        OrderStatus::iter()
            .filter(|from| from.can_transition_to(next))
            .collect()
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OrderStatus::Pending => write!(f, "pending"),
            OrderStatus::Accepted => write!(f, "accepted"),
            OrderStatus::Completed => write!(f, "completed"),
            OrderStatus::Cancelled => write!(f, "cancelled"),
        }
    }
}

/// SeaORM entity for the `orders` table.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "orders")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub client_id: i64,
    pub contractor_id: Option<i64>,
    pub category: String,
    #[sea_orm(column_type = "Double", nullable)]
    pub area: Option<f64>,
    #[sea_orm(column_type = "Text", nullable)]
    pub address: Option<String>,
    pub status: OrderStatus,
    pub created_at: DateTimeUtc,
    pub accepted_at: Option<DateTimeUtc>,
    pub completed_at: Option<DateTimeUtc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::users::Entity",
        from = "Column::ClientId",
        to = "super::users::Column::Id"
    )]
    Client,
    #[sea_orm(
        belongs_to = "super::users::Entity",
        from = "Column::ContractorId",
        to = "super::users::Column::Id"
    )]
    Contractor,
}

impl ActiveModelBehavior for ActiveModel {}

// ── DTOs ──

/// Fields a client supplies when placing an order.
#[derive(Debug, Clone, Deserialize)]
pub struct NewOrder {
    pub category: String,
    pub area: Option<f64>,
    pub address: Option<String>,
}

/// Request body for `POST /api/orders`.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateOrderRequest {
    #[serde(alias = "telegram_id")]
    pub external_id: i64,
    #[serde(flatten)]
    pub order: NewOrder,
}

/// Request body for accept/complete: identifies the acting contractor.
#[derive(Debug, Clone, Deserialize)]
pub struct OrderActionRequest {
    #[serde(alias = "telegram_id")]
    pub external_id: i64,
}

/// An order joined with the display fields of both parties.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OrderView {
    pub id: i64,
    pub client_id: i64,
    pub contractor_id: Option<i64>,
    pub category: String,
    pub area: Option<f64>,
    pub address: Option<String>,
    pub status: OrderStatus,
    pub created_at: DateTimeUtc,
    pub accepted_at: Option<DateTimeUtc>,
    pub completed_at: Option<DateTimeUtc>,
    pub client_name: Option<String>,
    pub client_external_id: Option<i64>,
    pub contractor_name: Option<String>,
    pub contractor_external_id: Option<i64>,
}

impl From<Model> for OrderView {
    fn from(m: Model) -> Self {
        Self {
            id: m.id,
            client_id: m.client_id,
            contractor_id: m.contractor_id,
            category: m.category,
            area: m.area,
            address: m.address,
            status: m.status,
            created_at: m.created_at,
            accepted_at: m.accepted_at,
            completed_at: m.completed_at,
            client_name: None,
            client_external_id: None,
            contractor_name: None,
            contractor_external_id: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::OrderStatus::*;
    use super::*;

    #[test]
    fn terminal_states_have_no_outgoing_edges() {
        for from in [Completed, Cancelled] {
            for to in OrderStatus::iter() {
                assert!(!from.can_transition_to(to), "{from} -> {to}");
                assert!(!OrderStatus::sources(to).contains(&from), "{from} -> {to}");
            }
        }
    }

    #[test]
    fn transition_guards() {
        assert_eq!(OrderStatus::sources(Accepted), vec![Pending]);
        assert_eq!(OrderStatus::sources(Completed), vec![Accepted]);
        assert_eq!(OrderStatus::sources(Cancelled), vec![Pending, Accepted]);
        assert!(OrderStatus::sources(Pending).is_empty());
    }

    #[test]
    fn lifecycle_edges() {
        assert!(Pending.can_transition_to(Accepted));
        assert!(Pending.can_transition_to(Cancelled));
        assert!(Accepted.can_transition_to(Completed));
        assert!(Accepted.can_transition_to(Cancelled));

        assert!(!Pending.can_transition_to(Completed));
        assert!(!Accepted.can_transition_to(Pending));
        assert!(!Accepted.can_transition_to(Accepted));
    }

    #[test]
    fn status_wire_format_is_lowercase() {
        assert_eq!(serde_json::to_string(&Cancelled).unwrap(), "\"cancelled\"");
        assert_eq!(Accepted.to_string(), "accepted");
    }
}
