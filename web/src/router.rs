use crate::{controller::health_check_controller, ws, AppState};
use axum::http::{HeaderValue, Method};
use axum::{routing::get, Router};
use log::*;
use tower_http::cors::{AllowOrigin, CorsLayer};

pub fn define_routes(app_state: AppState) -> Router {
    let cors = cors_layer(&app_state);

    Router::new()
        .merge(health_routes())
        .merge(ws_routes(app_state))
        .layer(cors)
}

fn health_routes() -> Router {
    Router::new().route("/health", get(health_check_controller::health_check))
}

fn ws_routes(app_state: AppState) -> Router {
    Router::new()
        .route("/ws/documents", get(ws::handler::document_list_ws_handler))
        .route(
            "/ws/documents/{document_id}",
            get(ws::handler::document_ws_handler),
        )
        .route(
            "/ws/notifications",
            get(ws::handler::notifications_ws_handler),
        )
        .with_state(app_state)
}

fn cors_layer(app_state: &AppState) -> CorsLayer {
    let origins: Vec<HeaderValue> = app_state
        .config
        .allowed_origins
        .iter()
        .filter_map(|origin| match origin.parse() {
            Ok(value) => Some(value),
            Err(_) => {
                warn!("Skipping malformed CORS origin: {origin}");
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods([Method::GET])
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use events::EventPublisher;
    use service::auth::JwtTokenVerifier;
    use service::config::Config;
    use std::sync::Arc;
    use tower::ServiceExt;

    fn app() -> Router {
        let config = Config::default().set_token_signing_secret("router-test-secret".to_string());
        let verifier = Arc::new(JwtTokenVerifier::new(&config).unwrap());
        let hub = Arc::new(hub::Manager::new(config.ws_queue_capacity));
        let app_state = AppState::new(config, hub, EventPublisher::new(), verifier);
        define_routes(app_state)
    }

    #[tokio::test]
    async fn health_check_is_reachable_without_a_token() {
        let response = app()
            .oneshot(
                Request::builder()
                    .uri("/health")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn unknown_routes_fall_through_to_404() {
        let response = app()
            .oneshot(
                Request::builder()
                    .uri("/ws/podcasts")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
