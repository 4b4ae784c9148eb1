use actix_web::http::StatusCode;
use actix_web::{HttpResponse, ResponseError};
use sea_orm::DbErr;

/// Every failure a request can end in.
///
/// Repositories speak `DbErr`; the service layer and handlers speak
/// `ServiceError`, and actix renders it through [`ResponseError`] as
/// `{"error": "..."}` with the matching status code.
#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    /// Malformed identifier, missing field, or wrong role for the action.
    #[error("{0}")]
    InvalidArgument(String),

    #[error("{0}")]
    NotFound(String),

    /// The requested transition does not apply to the current state.
    #[error("{0}")]
    Conflict(String),

    /// No connection string was configured.
    #[error("storage is not configured")]
    Unavailable,

    #[error("storage failure: {0}")]
    Storage(#[from] DbErr),
}

impl ServiceError {
    pub fn invalid(msg: impl Into<String>) -> Self {
        Self::InvalidArgument(msg.into())
    }

    pub fn not_found(msg: impl Into<String>) -> Self {
        Self::NotFound(msg.into())
    }

    pub fn conflict(msg: impl Into<String>) -> Self {
        Self::Conflict(msg.into())
    }
}

impl ResponseError for ServiceError {
    fn status_code(&self) -> StatusCode {
        match self {
            Self::InvalidArgument(_) => StatusCode::BAD_REQUEST,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Conflict(_) => StatusCode::CONFLICT,
            Self::Unavailable => StatusCode::SERVICE_UNAVAILABLE,
            Self::Storage(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let message = match self {
            // Storage details stay in the log.
            Self::Storage(e) => {
                tracing::error!("Database error: {e}");
                "Internal storage error".to_string()
            }
            other => other.to_string(),
        };

        HttpResponse::build(self.status_code()).json(serde_json::json!({
            "error": message,
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn maps_variants_to_status_codes() {
        assert_eq!(
            ServiceError::invalid("bad").status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            ServiceError::not_found("gone").status_code(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            ServiceError::conflict("taken").status_code(),
            StatusCode::CONFLICT
        );
        assert_eq!(
            ServiceError::Unavailable.status_code(),
            StatusCode::SERVICE_UNAVAILABLE
        );
        assert_eq!(
            ServiceError::from(DbErr::Custom("boom".into())).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[actix_web::test]
    async fn storage_message_is_not_leaked() {
        let err = ServiceError::from(DbErr::Custom("secret table layout".into()));
        assert!(err.to_string().contains("secret table layout"));

        let resp = err.error_response();
        assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let body = actix_web::body::to_bytes(resp.into_body()).await.unwrap();
        let text = std::str::from_utf8(&body).unwrap();
        assert!(!text.contains("secret table layout"));
        assert_eq!(
            serde_json::from_str::<serde_json::Value>(text).unwrap(),
            serde_json::json!({ "error": "Internal storage error" })
        );
    }

    #[actix_web::test]
    async fn client_errors_carry_their_message() {
        let resp = ServiceError::conflict("Order 7 is already accepted").error_response();
        let body = actix_web::body::to_bytes(resp.into_body()).await.unwrap();
        assert_eq!(
            serde_json::from_slice::<serde_json::Value>(&body).unwrap(),
            serde_json::json!({ "error": "Order 7 is already accepted" })
        );
    }
}
