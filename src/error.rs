use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use thiserror::Error;

/// Failure taxonomy for the action surface. Every handler error is one of
/// these; nothing is fatal to the process.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{0}")]
    Validation(String),
    #[error("{0}")]
    Conflict(String),
    #[error("{0}")]
    Authentication(String),
    #[error("{0}")]
    Authorization(String),
    #[error("{0}")]
    NotFound(String),
    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

/// Error body returned to clients: a machine-readable code, a user-visible
/// notice, and optionally the page the client should navigate to next.
#[derive(Debug, Serialize)]
pub struct ApiErrorBody {
    pub error: &'static str,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub redirect: Option<&'static str>,
}

impl ApiError {
    fn parts(&self) -> (StatusCode, &'static str, Option<&'static str>) {
        match self {
            ApiError::Validation(_) => (StatusCode::BAD_REQUEST, "VALIDATION", None),
            ApiError::Conflict(_) => (StatusCode::CONFLICT, "CONFLICT", None),
            ApiError::Authentication(_) => {
                (StatusCode::UNAUTHORIZED, "AUTHENTICATION", Some("/login"))
            }
            ApiError::Authorization(_) => (StatusCode::FORBIDDEN, "AUTHORIZATION", Some("/login")),
            ApiError::NotFound(_) => (StatusCode::NOT_FOUND, "NOT_FOUND", Some("/admin")),
            ApiError::Internal(_) => (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL", None),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, code, redirect) = self.parts();
        if let ApiError::Internal(ref e) = self {
            tracing::error!(error = %e, "internal server error");
        }
        let message = match self {
            ApiError::Internal(_) => "Internal server error".to_string(),
            ref other => other.to_string(),
        };
        let body = ApiErrorBody {
            error: code,
            message,
            redirect,
        };
        (status, Json(body)).into_response()
    }
}

impl From<sqlx::Error> for ApiError {
    fn from(e: sqlx::Error) -> Self {
        match e {
            sqlx::Error::RowNotFound => ApiError::NotFound("Not found".into()),
            // A unique-constraint hit on the race between the application
            // uniqueness check and the INSERT is still a conflict
            sqlx::Error::Database(db)
                if matches!(db.kind(), sqlx::error::ErrorKind::UniqueViolation) =>
            {
                ApiError::Conflict("Username or email already exists. Try another.".into())
            }
            other => ApiError::Internal(other.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn statuses_follow_the_taxonomy() {
        let cases = [
            (ApiError::Validation("v".into()), StatusCode::BAD_REQUEST),
            (ApiError::Conflict("c".into()), StatusCode::CONFLICT),
            (
                ApiError::Authentication("a".into()),
                StatusCode::UNAUTHORIZED,
            ),
            (ApiError::Authorization("a".into()), StatusCode::FORBIDDEN),
            (ApiError::NotFound("n".into()), StatusCode::NOT_FOUND),
        ];
        for (err, status) in cases {
            assert_eq!(err.parts().0, status);
        }
    }

    #[test]
    fn auth_failures_redirect_to_login() {
        assert_eq!(
            ApiError::Authentication("bad".into()).parts().2,
            Some("/login")
        );
        assert_eq!(
            ApiError::Authorization("no".into()).parts().2,
            Some("/login")
        );
    }

    #[test]
    fn not_found_redirects_to_dashboard() {
        assert_eq!(ApiError::NotFound("gone".into()).parts().2, Some("/admin"));
    }

    #[test]
    fn row_not_found_maps_to_not_found() {
        let err: ApiError = sqlx::Error::RowNotFound.into();
        assert!(matches!(err, ApiError::NotFound(_)));
    }

    #[derive(Debug)]
    struct DuplicateKey;

    impl std::fmt::Display for DuplicateKey {
        fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
            write!(f, "duplicate key value violates unique constraint")
        }
    }

    impl std::error::Error for DuplicateKey {}

    impl sqlx::error::DatabaseError for DuplicateKey {
        fn message(&self) -> &str {
            "duplicate key value violates unique constraint"
        }

        fn kind(&self) -> sqlx::error::ErrorKind {
            sqlx::error::ErrorKind::UniqueViolation
        }

        fn as_error(&self) -> &(dyn std::error::Error + Send + Sync + 'static) {
            self
        }

        fn as_error_mut(&mut self) -> &mut (dyn std::error::Error + Send + Sync + 'static) {
            self
        }

        fn into_error(self: Box<Self>) -> Box<dyn std::error::Error + Send + Sync + 'static> {
            self
        }
    }

    #[test]
    fn unique_violation_maps_to_conflict() {
        // The DB constraint and the application uniqueness check agree
        let err: ApiError = sqlx::Error::Database(Box::new(DuplicateKey)).into();
        assert!(matches!(err, ApiError::Conflict(_)));
    }
}
