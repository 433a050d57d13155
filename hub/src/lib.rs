//! Realtime WebSocket notification hub for Pagecast.
//!
//! This crate provides the process-wide broadcast infrastructure for pushing
//! realtime updates from the backend to connected clients.
//!
//! # Architecture
//!
//! - **Three independent registries**: connections are partitioned by
//!   per-document topic, by user identity, and into a single global fan-out
//!   set. Topic entries allow unbounded concurrent viewers; the user registry
//!   keeps at most the most recently established connection per user
//!   (last-register-wins).
//! - **Bounded per-connection queues**: every connection owns a fixed-capacity
//!   outbound queue. Publishing enqueues without ever blocking; a full queue
//!   drops the attempted message (reject-newest backpressure).
//! - **Two pumps per connection**: a write task drains the outbound queue onto
//!   the socket, a read task exists only to detect peer disconnects.
//! - **Ephemeral messages**: delivery is fire-and-forget. A disconnected
//!   client misses messages and sees fresh data after reconnecting; nothing
//!   is persisted or replayed.
//! - **Explicit handle, no singleton**: the [`Manager`] is constructed once at
//!   process start and shared by `Arc`; producers receive a handle, not a
//!   hidden global.
//!
//! # Message Flow
//!
//! 1. Frontend opens a WebSocket against one of the `/ws/*` endpoints
//! 2. Backend verifies the bearer token and resolves a user identity
//! 3. The connection is registered in the registry matching its endpoint kind
//! 4. When a resource changes (e.g. document finishes processing):
//!    - Business code publishes a `DomainEvent`
//!    - [`HubEventHandler`] converts it into hub messages
//!    - The manager serializes once and enqueues onto every matching
//!      connection's queue; each write pump performs the network writes
//! 5. Frontend receives the event and updates its UI
//!
//! # Modules
//!
//! - `connection`: per-socket outbound queue, lifecycle state, and `ConnectionId`
//! - `registry`: topic, user, and global connection registries
//! - `manager`: the facade producers call to register connections and publish
//! - `message`: typed outbound wire shapes and routing scopes
//! - `pump`: per-connection read/write delivery loops
//! - `domain_event_handler`: bridge from `events::DomainEvent` to hub messages

pub mod connection;
pub mod domain_event_handler;
pub mod manager;
pub mod message;
pub mod pump;
pub mod registry;

pub use connection::{Connection, ConnectionId, ConnectionReceiver};
pub use domain_event_handler::HubEventHandler;
pub use manager::Manager;
