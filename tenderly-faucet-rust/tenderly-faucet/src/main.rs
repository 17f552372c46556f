use actix_web::{web, App, HttpServer};

use std::sync::Arc;
use tenderly_faucet::api;
use tenderly_faucet::app::{ConnectionManager, FaucetService, InitRequest};
use tenderly_faucet::infrastructure::blockchain::{HttpProbe, TenderlyConnector};
use tenderly_faucet::infrastructure::config::ConfigManager;
use tenderly_faucet::infrastructure::logger::{LogConfig, Logger};
use tenderly_faucet::middleware::error_handling::{
    form_error_handler, json_error_handler, not_found, query_error_handler,
};
use tenderly_faucet::validators::RpcValidator;
use tenderly_faucet_core::{AddressBook, FileStorage, PlatformStorage, RpcCache};

fn startup_error(context: &str, e: impl std::fmt::Display) -> std::io::Error {
    log::error!("❌ {}: {}", context, e);
    std::io::Error::other(format!("{}: {}", context, e))
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    let config_manager = ConfigManager::new().map_err(|e| {
        eprintln!("Failed to load configuration: {e}");
        std::io::Error::other(format!("Configuration initialization failed: {e}"))
    })?;
    let config = config_manager.get_config().await;

    // Held until shutdown so buffered file logs get flushed
    let _log_guard = Logger::init(&LogConfig {
        level: config.log_level.clone(),
        log_directory: config.log_dir.clone(),
        ..LogConfig::default()
    });

    log::info!("🚀 Starting Tenderly Faucet...");
    log::info!("Configuration: {}", config_manager.get_config_summary().await);

    let validation_errors = config_manager.validate_config().await;
    if !validation_errors.is_empty() {
        return Err(startup_error(
            "Configuration validation failed",
            validation_errors.join(", "),
        ));
    }
    log::info!("✅ Configuration validation passed");

    let file_storage = if config.data_dir.trim().is_empty() {
        FileStorage::in_user_data_dir()
    } else {
        FileStorage::new(&config.data_dir)
    }
    .map_err(|e| startup_error("Storage initialization failed", e))?;
    log::info!("✅ Storage initialized in {}", file_storage.base_dir().display());
    let storage: Arc<dyn PlatformStorage> = Arc::new(file_storage);

    let probe = HttpProbe::new(config.rpc_validation_timeout())
        .map_err(|e| startup_error("HTTP client initialization failed", e))?;
    let connector = TenderlyConnector::new(&config.multicall_address)
        .map_err(|e| startup_error("RPC connector initialization failed", e))?;
    let validator = RpcValidator::new(
        Arc::new(probe),
        &config.rpc_base_url,
        config.rpc_validation_timeout(),
    );

    let connections = Arc::new(ConnectionManager::new(
        validator,
        Arc::new(connector),
        RpcCache::new(Arc::clone(&storage)),
        &config.rpc_base_url,
        config.cache_stale_threshold_ms(),
    ));
    let connection = connections.initialize(InitRequest::default()).await;
    match (&connection.url, &connection.error) {
        (Some(url), _) => log::info!("✅ Restored connection to {}", url),
        (None, Some(error)) => log::warn!("No connection restored: {}", error),
        (None, None) => log::info!("No cached RPC, waiting for a connection"),
    }

    let faucet = Arc::new(FaucetService::new(
        connections,
        AddressBook::new(Arc::clone(&storage)),
        config.tokens.clone(),
        config.token_validation_timeout(),
        config.message_duration(),
    ));
    let config_manager = Arc::new(config_manager);

    log::info!("🌐 Listening on {}:{}", config.host, config.port);

    HttpServer::new(move || {
        App::new()
            .wrap(actix_web::middleware::Logger::default())
            .wrap(actix_web::middleware::Compress::default())
            .wrap(actix_cors::Cors::permissive())
            .app_data(web::Data::new(Arc::clone(&faucet)))
            .app_data(web::Data::new(Arc::clone(&config_manager)))
            .app_data(web::JsonConfig::default().error_handler(json_error_handler))
            .app_data(web::FormConfig::default().error_handler(form_error_handler))
            .app_data(web::QueryConfig::default().error_handler(query_error_handler))
            .configure(api::configure)
            .default_service(web::route().to(not_found))
    })
    .bind((config.host.as_str(), config.port))?
    .run()
    .await
}
