//! Web layer: HTTP router and WebSocket upgrade handlers.
//!
//! The realtime core (Manager, registries, pumps, message types) lives in the
//! `hub` crate; this crate only authenticates handshakes, upgrades sockets,
//! and hands them to the hub.

pub use service::AppState;

pub mod controller;
pub mod error;
pub mod params;
pub mod router;
pub mod ws;

use axum::Router;

pub fn init_router(app_state: AppState) -> Router {
    router::define_routes(app_state)
}
