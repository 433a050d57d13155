use crate::connection::{Connection, ConnectionId, ConnectionReceiver};
use crate::message::{Event, HubMessage, Scope};
use crate::registry::{GlobalRegistry, TopicRegistry, UserRegistry};
use axum::extract::ws::Message;
use log::*;
use std::sync::Arc;

/// The hub facade: owns the three registries and exposes the operations
/// business-event producers call.
///
/// Constructed once at process start and shared by `Arc` (handlers receive a
/// handle, never a hidden global). All publishing is fire-and-forget: it
/// enqueues onto per-connection queues and returns without touching the
/// network, reading back delivery results, or retrying.
pub struct Manager {
    topics: TopicRegistry,
    users: UserRegistry,
    global: GlobalRegistry,
    queue_capacity: usize,
}

impl Manager {
    pub fn new(queue_capacity: usize) -> Self {
        Self {
            topics: TopicRegistry::new(),
            users: UserRegistry::new(),
            global: GlobalRegistry::new(),
            queue_capacity,
        }
    }

    /// Create a connection sized to the configured outbound queue capacity.
    /// The receiver half must be handed to exactly one write pump.
    pub fn new_connection(&self) -> (Arc<Connection>, ConnectionReceiver) {
        Connection::channel(self.queue_capacity)
    }

    // Registration ------------------------------------------------------

    pub fn register_topic(&self, topic: &str, connection: Arc<Connection>) {
        info!("Registered connection for topic {topic}");
        self.topics.register(topic, connection);
    }

    pub fn unregister_topic(&self, topic: &str, connection_id: &ConnectionId) {
        info!("Unregistering connection for topic {topic}");
        self.topics.unregister(topic, connection_id);
    }

    pub fn register_user(&self, user_id: &str, connection: Arc<Connection>) {
        info!("Registered notification connection for user {user_id}");
        self.users.register(user_id, connection);
    }

    pub fn unregister_user(&self, user_id: &str, connection_id: &ConnectionId) {
        info!("Unregistering notification connection for user {user_id}");
        self.users.unregister(user_id, connection_id);
    }

    pub fn register_global(&self, connection: Arc<Connection>) {
        info!("Registered global fan-out connection");
        self.global.register(connection);
    }

    pub fn unregister_global(&self, connection_id: &ConnectionId) {
        info!("Unregistering global fan-out connection");
        self.global.unregister(connection_id);
    }

    // Publishing --------------------------------------------------------

    /// Serialize an event once and route it by scope.
    pub fn send_message(&self, message: HubMessage) {
        let Some(frame) = encode(&message.event) else {
            return;
        };

        match message.scope {
            Scope::Topic { topic } => self.topics.broadcast(&topic, &frame),
            Scope::User { user_id } => self.users.send_to_user(&user_id, &frame),
            Scope::Global => self.global.broadcast(&frame),
        }
    }

    /// Status-update publish: one structured message delivered to both the
    /// document's topic set and the global set, so viewers of the document
    /// and viewers of the aggregate list receive it from a single call.
    pub fn publish_document_status(
        &self,
        document_id: &str,
        status: &str,
        progress: u8,
        error: Option<String>,
    ) {
        let event = Event::DocumentStatusUpdate {
            document_id: document_id.to_string(),
            status: status.to_string(),
            progress,
            error,
        };

        let Some(frame) = encode(&event) else { return };

        self.topics.broadcast(document_id, &frame);
        self.global.broadcast(&frame);
    }

    /// Badge-update publish: targeted send to the user's active connection.
    pub fn publish_badge_update(&self, user_id: &str, unread_count: u64) {
        self.send_message(HubMessage {
            event: Event::BadgeUpdate { unread_count },
            scope: Scope::User {
                user_id: user_id.to_string(),
            },
        });
    }
}

/// Serialize an event into a text frame. Serialization failure is logged and
/// swallowed; publishing has no error path back to the caller.
fn encode(event: &Event) -> Option<Message> {
    match serde_json::to_string(event) {
        Ok(json) => Some(Message::Text(json.into())),
        Err(e) => {
            error!("Failed to serialize hub event: {e}");
            None
        }
    }
}
