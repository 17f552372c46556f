use actix_web::http::StatusCode;
use actix_web::{HttpResponse, ResponseError};
use std::fmt;
use tenderly_faucet_core::FaucetError;

/// Main error type for the faucet service
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ServiceError {
    // Errors raised by the core crate or the RPC layer
    Faucet(FaucetError),

    // Malformed request bodies or parameters
    BadRequest(String),
}

impl ServiceError {
    pub fn bad_request(message: impl Into<String>) -> Self {
        ServiceError::BadRequest(message.into())
    }

    /// The message shown to the user, without the category prefix
    pub fn user_message(&self) -> String {
        match self {
            ServiceError::Faucet(e) => e.user_message().to_string(),
            ServiceError::BadRequest(msg) => msg.clone(),
        }
    }

    pub fn to_http_response(&self) -> (StatusCode, serde_json::Value) {
        let (status_code, error_type) = match self {
            ServiceError::Faucet(e) => match e {
                FaucetError::Validation(_) => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR"),
                FaucetError::NotConnected(_) => (StatusCode::CONFLICT, "NOT_CONNECTED"),
                FaucetError::Connection(_) => (StatusCode::BAD_GATEWAY, "CONNECTION_ERROR"),
                FaucetError::Rpc(_) => (StatusCode::BAD_GATEWAY, "RPC_ERROR"),
                FaucetError::Network(_) => (StatusCode::SERVICE_UNAVAILABLE, "NETWORK_ERROR"),
                FaucetError::Timeout(_) => (StatusCode::GATEWAY_TIMEOUT, "TIMEOUT"),
                FaucetError::Storage(_) => (StatusCode::INTERNAL_SERVER_ERROR, "STORAGE_ERROR"),
                FaucetError::Config(_) => (StatusCode::INTERNAL_SERVER_ERROR, "CONFIG_ERROR"),
                FaucetError::Internal(_) => (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR"),
            },
            ServiceError::BadRequest(_) => (StatusCode::BAD_REQUEST, "BAD_REQUEST"),
        };

        (
            status_code,
            serde_json::json!({
                "error": error_type,
                "message": self.user_message(),
                "timestamp": chrono::Utc::now().to_rfc3339(),
            }),
        )
    }
}

impl fmt::Display for ServiceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ServiceError::Faucet(e) => write!(f, "{e}"),
            ServiceError::BadRequest(msg) => write!(f, "Bad request: {msg}"),
        }
    }
}

impl std::error::Error for ServiceError {}

impl ResponseError for ServiceError {
    fn status_code(&self) -> StatusCode {
        self.to_http_response().0
    }

    fn error_response(&self) -> HttpResponse {
        let (status_code, error_response) = self.to_http_response();
        HttpResponse::build(status_code).json(error_response)
    }
}

impl From<FaucetError> for ServiceError {
    fn from(err: FaucetError) -> Self {
        ServiceError::Faucet(err)
    }
}

pub type ServiceResult<T> = Result<T, ServiceError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        let cases = [
            (FaucetError::validation("Invalid address"), StatusCode::BAD_REQUEST),
            (FaucetError::not_connected("Provider is not initialized"), StatusCode::CONFLICT),
            (FaucetError::rpc("method not found"), StatusCode::BAD_GATEWAY),
            (FaucetError::timeout("RPC validation timed out"), StatusCode::GATEWAY_TIMEOUT),
            (FaucetError::storage("disk full"), StatusCode::INTERNAL_SERVER_ERROR),
        ];
        for (err, status) in cases {
            assert_eq!(ServiceError::from(err).status_code(), status);
        }
        assert_eq!(ServiceError::bad_request("Address is required").status_code(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_body_carries_bare_message() {
        let err = ServiceError::from(FaucetError::validation("Amount is required"));
        let (_, body) = err.to_http_response();
        assert_eq!(body["error"], "VALIDATION_ERROR");
        assert_eq!(body["message"], "Amount is required");
        assert!(body["timestamp"].is_string());
        assert_eq!(err.to_string(), "Validation error: Amount is required");
    }
}
