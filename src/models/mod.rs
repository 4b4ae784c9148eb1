pub mod contractor_categories;
pub mod contractor_profiles;
pub mod orders;
pub mod tariffs;
pub mod users;

use serde::Deserialize;

/// Query string for `GET /api/contractors/search`.
#[derive(Debug, Clone, Deserialize)]
pub struct SearchQuery {
    pub category: Option<String>,
}
