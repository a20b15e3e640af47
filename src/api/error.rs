// API error module
// Every handler failure maps to exactly one status and a {"message": ...} body

use http_body_util::Full;
use hyper::body::Bytes;
use hyper::{Response, StatusCode};
use thiserror::Error;

use crate::http::message_response;
use crate::store::StoreError;

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("invalid argument: {0}")]
    InvalidArgument(String),
    #[error("{0}")]
    NotFound(String),
    #[error("request body exceeds {0} bytes")]
    PayloadTooLarge(u64),
    #[error("dependency unavailable: {0}")]
    DependencyUnavailable(String),
    #[error("{0}")]
    QueryFailed(String),
}

pub type ApiResult<T> = Result<T, ApiError>;

impl ApiError {
    pub const fn status(&self) -> StatusCode {
        match self {
            Self::InvalidArgument(_) => StatusCode::BAD_REQUEST,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::PayloadTooLarge(_) => StatusCode::PAYLOAD_TOO_LARGE,
            Self::DependencyUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
            Self::QueryFailed(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn into_response(self) -> Response<Full<Bytes>> {
        message_response(self.status(), &self.to_string())
    }
}

impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::Unavailable(msg) => Self::DependencyUnavailable(msg),
            StoreError::Query(_) | StoreError::Decode(_) => Self::QueryFailed(err.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        assert_eq!(
            ApiError::InvalidArgument("x".into()).status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(ApiError::NotFound("x".into()).status(), StatusCode::NOT_FOUND);
        assert_eq!(
            ApiError::PayloadTooLarge(10).status(),
            StatusCode::PAYLOAD_TOO_LARGE
        );
        assert_eq!(
            ApiError::DependencyUnavailable("x".into()).status(),
            StatusCode::SERVICE_UNAVAILABLE
        );
        assert_eq!(
            ApiError::QueryFailed("x".into()).status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_store_error_conversion() {
        let err = ApiError::from(StoreError::Unavailable("no server".into()));
        assert!(matches!(err, ApiError::DependencyUnavailable(_)));
        assert_eq!(err.to_string(), "dependency unavailable: no server");

        let err = ApiError::from(StoreError::Decode("bad field".into()));
        assert!(matches!(err, ApiError::QueryFailed(_)));
        assert_eq!(err.to_string(), "decode failed: bad field");
    }
}
