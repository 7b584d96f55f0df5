#![recursion_limit = "256"]
//! # Vet Records Web Application
//!
//! Main entry point of the veterinary records API.
//! Configures SSL, middleware, the reply chain for the AI vet chat, and route handling.

pub mod api;
pub mod config;
pub mod consts;
pub mod front;
pub mod metric;
pub mod models;
pub mod repo;
pub mod services;
pub mod utils;

use logfire::config::MetricsOptions;
use ntex::web;
use ntex_cors::Cors;
use ntex_identity::{CookieIdentityPolicy, IdentityService};
use openssl::ssl::{SslAcceptor, SslFiletype, SslMethod};
use repo::AppRepo;

#[ntex::main]
async fn main() -> anyhow::Result<()> {
    let app_config = &*config::APP_CONFIG;

    // Initialize logging and metrics
    let mut logfire_config = logfire::configure()
        .install_panic_handler()
        .with_metrics(Some(MetricsOptions::default()))
        .send_to_logfire(logfire::config::SendToLogfire::IfTokenPresent);
    if let Some(token) = &app_config.logfire_token {
        logfire_config = logfire_config.with_token(token);
    }
    let shutdown_handler = logfire_config.finish()?;

    // Initialize database connection pool
    let sqlite_repo = repo::sqlite::SqlxSqliteRepo {
        db_pool: utils::setup_sqlite_db_pool(app_config.is_prod()).await?,
    };

    let reply_chain = services::build_reply_chain(app_config)?;
    if reply_chain.is_empty() {
        logfire::warn!("no generative language api key, chat replies come from the fallback responder");
    } else {
        logfire::info!("reply chain ready with {total} models", total = reply_chain.len() as i64);
    }

    // Identity cookies do not survive a restart
    let identity_key = utils::build_random_key()?;

    let server_result =
        configure_and_run_server(identity_key, sqlite_repo.clone(), reply_chain).await;

    sqlite_repo.close().await;
    shutdown_handler.shutdown()?;

    server_result
}

/// Configures SSL acceptor for production environments
fn setup_ssl_acceptor() -> anyhow::Result<openssl::ssl::SslAcceptorBuilder> {
    let mut ssl_acceptor = SslAcceptor::mozilla_intermediate(SslMethod::tls_server())
        .map_err(|e| anyhow::anyhow!("Failed to create SSL acceptor: {}", e))?;

    let app_config = &*config::APP_CONFIG;
    ssl_acceptor
        .set_private_key_file(&app_config.private_key_path, SslFiletype::PEM)
        .map_err(|e| {
            anyhow::anyhow!(
                "Failed to load private key from {}: {}",
                app_config.private_key_path,
                e
            )
        })?;

    ssl_acceptor
        .set_certificate_file(&app_config.certificate_path, SslFiletype::PEM)
        .map_err(|e| {
            anyhow::anyhow!(
                "Failed to load certificate from {}: {}",
                app_config.certificate_path,
                e
            )
        })?;

    Ok(ssl_acceptor)
}

/// Configures and starts the web server with appropriate SSL settings
async fn configure_and_run_server(
    identity_key: [u8; 32],
    sqlite_repo: repo::sqlite::SqlxSqliteRepo,
    reply_chain: services::ReplyChain,
) -> anyhow::Result<()> {
    let app_config = &*config::APP_CONFIG;
    let server_addr = (
        app_config.wep_server_host.clone(),
        app_config.wep_server_port,
    );

    let server = web::server(move || {
        web::App::new()
            .wrap(
                Cors::new()
                    .allowed_methods(vec!["GET", "HEAD", "POST", "OPTIONS", "PUT", "DELETE"])
                    .allowed_origin(&app_config.allowed_origin)
                    .supports_credentials()
                    .finish(),
            )
            .wrap(IdentityService::new(
                CookieIdentityPolicy::new(&identity_key)
                    .name(consts::IDENTITY_COOKIE_NAME)
                    .max_age(consts::MAX_AGE_IDENTITY_COOKIE)
                    .secure(app_config.is_prod()),
            ))
            .wrap(web::middleware::Logger::default())
            .wrap(web::middleware::Compress::default())
            .state(front::AppState {
                repo: Box::new(sqlite_repo.clone()),
                reply_chain: reply_chain.clone(),
            })
            .configure(front::routes::pets)
            .configure(front::routes::chat)
            .configure(front::routes::api)
            .default_service(web::route().to(front::server::serve_not_found))
    });

    let bound_server = if app_config.is_prod() {
        let ssl_acceptor = setup_ssl_acceptor()?;
        server.bind_openssl(server_addr, ssl_acceptor)?
    } else {
        server.bind(server_addr)?
    };

    logfire::info!(
        "listening on {host}:{port}",
        host = app_config.wep_server_host.clone(),
        port = app_config.wep_server_port as i64
    );

    bound_server
        .run()
        .await
        .map_err(|e| anyhow::anyhow!("Server error: {}", e))
}
