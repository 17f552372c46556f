use actix_web::error::{InternalError, JsonPayloadError, QueryPayloadError, UrlencodedError};
use actix_web::{HttpRequest, HttpResponse};
use chrono::Utc;
use serde_json::json;

/// Error response builder for consistent error responses
pub struct ErrorResponseBuilder;

impl ErrorResponseBuilder {
    pub fn bad_request(message: &str) -> HttpResponse {
        HttpResponse::BadRequest().json(json!({
            "error": "Bad request",
            "message": message,
            "timestamp": Utc::now().to_rfc3339(),
            "request_id": uuid::Uuid::new_v4().to_string(),
        }))
    }

    pub fn not_found(message: &str) -> HttpResponse {
        HttpResponse::NotFound().json(json!({
            "error": "Not found",
            "message": message,
            "timestamp": Utc::now().to_rfc3339(),
            "request_id": uuid::Uuid::new_v4().to_string(),
        }))
    }
}

/// Extractor error handlers, so malformed input gets the same body shape as every other error
pub fn json_error_handler(err: JsonPayloadError, req: &HttpRequest) -> actix_web::Error {
    log::warn!("Rejected JSON body on {}: {}", req.path(), err);
    let response = ErrorResponseBuilder::bad_request(&format!("Invalid JSON body: {err}"));
    InternalError::from_response(err, response).into()
}

pub fn form_error_handler(err: UrlencodedError, req: &HttpRequest) -> actix_web::Error {
    log::warn!("Rejected form body on {}: {}", req.path(), err);
    let response = ErrorResponseBuilder::bad_request(&format!("Invalid form body: {err}"));
    InternalError::from_response(err, response).into()
}

pub fn query_error_handler(err: QueryPayloadError, req: &HttpRequest) -> actix_web::Error {
    log::warn!("Rejected query string on {}: {}", req.path(), err);
    let response = ErrorResponseBuilder::bad_request(&format!("Invalid query string: {err}"));
    InternalError::from_response(err, response).into()
}

/// Fallback for unknown routes
pub async fn not_found(req: HttpRequest) -> HttpResponse {
    ErrorResponseBuilder::not_found(&format!("No route for {} {}", req.method(), req.path()))
}
