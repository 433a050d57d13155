use events::EventPublisher;
use hub::{HubEventHandler, Manager};
use log::{error, info};
use service::auth::JwtTokenVerifier;
use service::{config::Config, logging::Logger, AppState};
use std::sync::Arc;

#[tokio::main]
async fn main() {
    let config = Config::new();
    Logger::init_logger(&config);

    let token_verifier = match JwtTokenVerifier::new(&config) {
        Ok(verifier) => Arc::new(verifier),
        Err(e) => {
            error!("Failed to initialize token verifier: {e}");
            std::process::exit(1);
        }
    };

    let hub_manager = Arc::new(Manager::new(config.ws_queue_capacity));

    // Business code publishes domain events; the hub handler fans them out to
    // connected WebSocket clients.
    let event_publisher =
        EventPublisher::new().with_handler(Arc::new(HubEventHandler::new(hub_manager.clone())));

    let app_state = AppState::new(config, hub_manager, event_publisher, token_verifier);

    let listen_address = format!(
        "{}:{}",
        app_state.config.interface.as_deref().unwrap_or("127.0.0.1"),
        app_state.config.port
    );
    info!("Server starting... listening for WebSocket connections on http://{listen_address}");

    let router = web::init_router(app_state);

    let listener = match tokio::net::TcpListener::bind(&listen_address).await {
        Ok(listener) => listener,
        Err(e) => {
            error!("Failed to bind to {listen_address}: {e}");
            std::process::exit(1);
        }
    };

    if let Err(e) = axum::serve(listener, router).await {
        error!("Server error: {e}");
        std::process::exit(1);
    }
}
