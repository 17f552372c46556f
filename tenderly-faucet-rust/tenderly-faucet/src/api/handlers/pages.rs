use crate::api::views::{render_index, IndexPage};
use crate::app::{FaucetService, FormAction, InitRequest};
use crate::middleware::error_handling::ErrorResponseBuilder;
use crate::utils::sanitizer::sanitize_input;
use crate::validators::fund_validator::FundRequest;
use actix_web::cookie::Cookie;
use actix_web::http::header::{self, ContentType};
use actix_web::web::{Data, Form, Path, Query};
use actix_web::{get, post, web, HttpRequest, HttpResponse};
use serde::Deserialize;
use std::sync::Arc;
use tenderly_faucet_core::domain::entities::endpoint::is_guid;
use tenderly_faucet_core::shared::constants::ERROR_COOKIE_NAME;
use tenderly_faucet_core::TimeUnit;

#[derive(Debug, Default, Deserialize)]
pub struct IndexQuery {
    pub guid: Option<String>,
    pub error: Option<String>,
    pub address: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct ConnectForm {
    #[serde(default)]
    pub rpc_url: String,
}

/// Fund form as posted by the browser; an unchecked checkbox is simply absent
#[derive(Debug, Deserialize)]
pub struct FundForm {
    #[serde(default)]
    pub recipient: String,
    pub token: Option<String>,
    pub use_custom_token: Option<String>,
    pub custom_token: Option<String>,
    #[serde(default)]
    pub amount: String,
}

impl From<FundForm> for FundRequest {
    fn from(form: FundForm) -> Self {
        FundRequest {
            recipient: sanitize_input(&form.recipient),
            token: form.token.map(|t| sanitize_input(&t)),
            use_custom_token: form.use_custom_token.is_some(),
            custom_token: form.custom_token.map(|t| sanitize_input(&t)),
            amount: sanitize_input(&form.amount),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct AdvanceForm {
    #[serde(default)]
    pub amount: String,
    #[serde(default)]
    pub unit: String,
}

#[derive(Debug, Deserialize)]
pub struct AddressForm {
    pub address: String,
}

fn redirect_home() -> HttpResponse {
    HttpResponse::SeeOther()
        .insert_header((header::LOCATION, "/"))
        .finish()
}

fn error_cookie(message: &str) -> Cookie<'static> {
    Cookie::build(ERROR_COOKIE_NAME, message.to_string())
        .path("/")
        .http_only(true)
        .finish()
}

fn error_cookie_removal() -> Cookie<'static> {
    let mut cookie = Cookie::new(ERROR_COOKIE_NAME, "");
    cookie.set_path("/");
    cookie.make_removal();
    cookie
}

#[get("/")]
async fn index(req: HttpRequest, query: Query<IndexQuery>, faucet: Data<Arc<FaucetService>>) -> HttpResponse {
    let query = query.into_inner();
    let handed_off = req.cookie(ERROR_COOKIE_NAME).map(|c| c.value().to_string());

    if query.guid.is_some() || query.error.is_some() {
        faucet
            .connections()
            .initialize(InitRequest {
                error: query.error.or(handed_off),
                guid: query.guid,
            })
            .await;
        let mut response = redirect_home();
        let _ = response.add_removal_cookie(&error_cookie_removal());
        return response;
    }

    if let Some(error) = handed_off.as_deref().filter(|e| !e.is_empty()) {
        faucet.connections().set_error(error).await;
    }
    if let Some(address) = query.address.as_deref().map(sanitize_input).filter(|a| !a.is_empty()) {
        faucet.dispatch(vec![FormAction::SetRecipient(address)]);
    }

    let connection = faucet.connections().current().await;
    let form = faucet.form();
    let timestamp_form = faucet.timestamp_form();

    let (balances, balance_error) = if connection.connected && !form.recipient.is_empty() {
        match faucet.get_all_balances(&form.recipient).await {
            Ok(balances) => (Some(balances), None),
            Err(e) => (None, Some(e.user_message().to_string())),
        }
    } else {
        (None, None)
    };
    let timestamp = if connection.connected {
        faucet.current_timestamp().await
    } else {
        None
    };
    let saved_addresses = faucet.saved_addresses();

    let html = render_index(&IndexPage {
        connection: &connection,
        tokens: faucet.tokens(),
        form: &form,
        timestamp_form: &timestamp_form,
        saved_addresses: &saved_addresses,
        balances: balances.as_ref(),
        balance_error,
        timestamp,
        form_error: faucet.form_notices.error.current(),
        form_success: faucet.form_notices.success.current(),
        timestamp_error: faucet.timestamp_notices.error.current(),
        timestamp_success: faucet.timestamp_notices.success.current(),
    });

    let mut response = HttpResponse::Ok().content_type(ContentType::html()).body(html);
    if handed_off.is_some() {
        let _ = response.add_removal_cookie(&error_cookie_removal());
    }
    response
}

/// `/{guid}` shortcut: connect to the TestNet and land on the form page
#[get("/{guid}")]
async fn connect_by_path(path: Path<String>, faucet: Data<Arc<FaucetService>>) -> HttpResponse {
    let guid = path.into_inner();
    if !is_guid(&guid) {
        return ErrorResponseBuilder::not_found(&format!("No route for /{}", guid));
    }

    match faucet.connections().connect_guid(&guid).await {
        Ok(_) => redirect_home(),
        Err(e) => {
            log::warn!("Connecting to GUID {} failed: {}", guid, e);
            let mut response = redirect_home();
            let _ = response.add_cookie(&error_cookie(e.user_message()));
            response
        }
    }
}

#[post("/connect")]
async fn connect(form: Form<ConnectForm>, faucet: Data<Arc<FaucetService>>) -> HttpResponse {
    if let Err(e) = faucet.connections().submit(&sanitize_input(&form.rpc_url)).await {
        log::warn!("Connect request failed: {}", e);
    }
    redirect_home()
}

#[post("/disconnect")]
async fn disconnect(faucet: Data<Arc<FaucetService>>) -> HttpResponse {
    faucet.connections().clear_and_reconnect().await;
    redirect_home()
}

#[post("/fund")]
async fn fund(form: Form<FundForm>, faucet: Data<Arc<FaucetService>>) -> HttpResponse {
    let request = FundRequest::from(form.into_inner());
    // Outcome is reported through the form notices
    let _ = faucet.fund(&request).await;
    redirect_home()
}

#[post("/advance")]
async fn advance(form: Form<AdvanceForm>, faucet: Data<Arc<FaucetService>>) -> HttpResponse {
    let amount = match form.amount.trim().parse::<u64>() {
        Ok(amount) => amount,
        Err(_) => {
            faucet.timestamp_notices.error.show("Invalid amount");
            return redirect_home();
        }
    };
    let unit = if form.unit.trim().is_empty() {
        TimeUnit::default()
    } else {
        match form.unit.parse::<TimeUnit>() {
            Ok(unit) => unit,
            Err(e) => {
                faucet.timestamp_notices.error.show(e.user_message());
                return redirect_home();
            }
        }
    };

    let _ = faucet.advance_timestamp(amount, unit).await;
    redirect_home()
}

#[post("/addresses/remove")]
async fn remove_address(form: Form<AddressForm>, faucet: Data<Arc<FaucetService>>) -> HttpResponse {
    let remaining = faucet.remove_address(&form.address);
    log::info!("Removed saved address {}, {} left", form.address, remaining.len());
    redirect_home()
}

/// Form pages. The GUID route matches any single segment, so register it last.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(index)
        .service(connect)
        .service(disconnect)
        .service(fund)
        .service(advance)
        .service(remove_address)
        .service(connect_by_path);
}
