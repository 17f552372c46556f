pub mod handlers;
pub mod views;

use actix_web::web;

/// Register the JSON API and the form pages. The API scope goes first so the
/// catch-all GUID page route cannot shadow it.
pub fn configure(cfg: &mut web::ServiceConfig) {
    handlers::api::configure(cfg);
    handlers::pages::configure(cfg);
}
