//! WebSocket HTTP handlers for the web layer.
//!
//! This module contains only the Axum upgrade handlers for the realtime
//! endpoints. The core infrastructure (Manager, registries, pumps, message
//! types) lives in the `hub` crate to avoid circular dependencies.

pub mod handler;
