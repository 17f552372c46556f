use crate::app::FaucetService;
use crate::domain::error::{ServiceError, ServiceResult};
use crate::infrastructure::config::ConfigManager;
use crate::validators::fund_validator::FundRequest;
use actix_web::web::{self, Data, Json, Path, Query};
use actix_web::{delete, get, post, HttpResponse, Responder};
use serde::Deserialize;
use serde_json::json;
use std::sync::Arc;
use tenderly_faucet_core::{FaucetError, TimeUnit};

#[derive(Debug, Deserialize)]
pub struct ConnectRequest {
    pub rpc_url: String,
}

#[derive(Debug, Deserialize)]
pub struct BalanceQuery {
    pub token: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct AdvanceRequest {
    pub amount: u64,
    #[serde(default)]
    pub unit: TimeUnit,
}

#[derive(Debug, Deserialize)]
pub struct AddressRequest {
    pub address: String,
}

#[get("/health")]
async fn health(faucet: Data<Arc<FaucetService>>) -> impl Responder {
    HttpResponse::Ok().json(json!({
        "status": "healthy",
        "connected": faucet.connections().is_connected().await,
        "timestamp": chrono::Utc::now().to_rfc3339(),
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

/// Effective configuration, without the token list
#[get("/config")]
async fn get_config(config_manager: Data<Arc<ConfigManager>>) -> impl Responder {
    HttpResponse::Ok().json(config_manager.get_config_summary().await)
}

#[get("/connection")]
async fn get_connection(faucet: Data<Arc<FaucetService>>) -> impl Responder {
    HttpResponse::Ok().json(faucet.connections().current().await)
}

#[post("/connection")]
async fn post_connection(req: Json<ConnectRequest>, faucet: Data<Arc<FaucetService>>) -> ServiceResult<HttpResponse> {
    let view = faucet.connections().submit(&req.rpc_url).await?;
    Ok(HttpResponse::Ok().json(view))
}

#[delete("/connection")]
async fn delete_connection(faucet: Data<Arc<FaucetService>>) -> impl Responder {
    faucet.connections().clear_and_reconnect().await;
    HttpResponse::Ok().json(faucet.connections().current().await)
}

#[get("/tokens")]
async fn list_tokens(faucet: Data<Arc<FaucetService>>) -> impl Responder {
    HttpResponse::Ok().json(faucet.tokens())
}

#[get("/tokens/{address}/validate")]
async fn validate_token(path: Path<String>, faucet: Data<Arc<FaucetService>>) -> ServiceResult<HttpResponse> {
    match faucet.validate_token(&path).await {
        Ok(token) => Ok(HttpResponse::Ok().json(json!({ "valid": true, "token": token }))),
        Err(e @ (FaucetError::Validation(_) | FaucetError::Timeout(_))) => Ok(HttpResponse::Ok().json(json!({
            "valid": false,
            "error": e.user_message(),
        }))),
        Err(e) => Err(e.into()),
    }
}

#[get("/balances/{address}")]
async fn get_balances(
    path: Path<String>,
    query: Query<BalanceQuery>,
    faucet: Data<Arc<FaucetService>>,
) -> ServiceResult<HttpResponse> {
    match query.token.as_deref() {
        Some(token) => {
            let balances = faucet.get_address_balances(&path, Some(token)).await?;
            Ok(HttpResponse::Ok().json(balances))
        }
        None => {
            let balances = faucet.get_all_balances(&path).await?;
            Ok(HttpResponse::Ok().json(balances))
        }
    }
}

#[post("/balance")]
async fn set_balance(req: Json<FundRequest>, faucet: Data<Arc<FaucetService>>) -> ServiceResult<HttpResponse> {
    let outcome = faucet.fund(&req).await?;
    Ok(HttpResponse::Ok().json(outcome))
}

#[get("/timestamp")]
async fn get_timestamp(faucet: Data<Arc<FaucetService>>) -> ServiceResult<HttpResponse> {
    if !faucet.connections().is_connected().await {
        return Err(FaucetError::not_connected("Provider is not initialized").into());
    }
    let timestamp = faucet.current_timestamp().await;
    Ok(HttpResponse::Ok().json(json!({
        "timestamp": timestamp,
        "available": timestamp.is_some(),
    })))
}

#[post("/timestamp/advance")]
async fn advance_timestamp(req: Json<AdvanceRequest>, faucet: Data<Arc<FaucetService>>) -> ServiceResult<HttpResponse> {
    let outcome = faucet.advance_timestamp(req.amount, req.unit).await?;
    Ok(HttpResponse::Ok().json(outcome))
}

#[get("/addresses")]
async fn list_addresses(faucet: Data<Arc<FaucetService>>) -> impl Responder {
    HttpResponse::Ok().json(faucet.saved_addresses())
}

#[post("/addresses")]
async fn add_address(req: Json<AddressRequest>, faucet: Data<Arc<FaucetService>>) -> ServiceResult<HttpResponse> {
    let added = faucet.save_address(&req.address)?;
    Ok(HttpResponse::Ok().json(json!({
        "added": added,
        "addresses": faucet.saved_addresses(),
    })))
}

#[delete("/addresses")]
async fn remove_address(req: Json<AddressRequest>, faucet: Data<Arc<FaucetService>>) -> ServiceResult<HttpResponse> {
    if req.address.trim().is_empty() {
        return Err(ServiceError::bad_request("Address is required"));
    }
    Ok(HttpResponse::Ok().json(faucet.remove_address(&req.address)))
}

/// JSON endpoints, mounted under `/api`
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api")
            .service(health)
            .service(get_config)
            .service(get_connection)
            .service(post_connection)
            .service(delete_connection)
            .service(list_tokens)
            .service(validate_token)
            .service(get_balances)
            .service(set_balance)
            .service(get_timestamp)
            .service(advance_timestamp)
            .service(list_addresses)
            .service(add_address)
            .service(remove_address),
    );
}
