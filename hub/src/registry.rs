use crate::connection::{Connection, ConnectionId};
use axum::extract::ws::Message;
use dashmap::DashMap;
use log::*;
use std::collections::HashMap;
use std::sync::Arc;

// Type alias for topic keys (document ids today, any resource id tomorrow)
pub type Topic = String;
// Type alias for user IDs (web layer resolves tokens to String identities)
pub type UserId = String;

type ConnectionSet = HashMap<ConnectionId, Arc<Connection>>;

fn enqueue_to_set(set: &ConnectionSet, message: &Message) {
    for (connection_id, connection) in set.iter() {
        if !connection.enqueue(message.clone()) {
            debug!(
                "Dropped message for connection {} (queue full or closing)",
                connection_id.as_str()
            );
        }
    }
}

/// Connections keyed by an application-defined topic (e.g. a document id).
///
/// A topic may hold any number of concurrent connections (many viewers of the
/// same resource). Topic entries with an empty connection set are removed so
/// stale keys never accumulate.
pub struct TopicRegistry {
    topics: DashMap<Topic, ConnectionSet>,
}

impl TopicRegistry {
    pub fn new() -> Self {
        Self {
            topics: DashMap::new(),
        }
    }

    /// Add `connection` to the topic's set, creating the set if absent.
    /// Registering the same connection twice is idempotent.
    pub fn register(&self, topic: &str, connection: Arc<Connection>) {
        self.topics
            .entry(topic.to_string())
            .or_default()
            .insert(connection.id().clone(), connection);
    }

    /// Remove a connection from the topic's set; deletes the topic entry when
    /// the set empties. Unknown topics or connections are a safe no-op.
    pub fn unregister(&self, topic: &str, connection_id: &ConnectionId) {
        if let Some(mut set) = self.topics.get_mut(topic) {
            set.remove(connection_id);

            if set.is_empty() {
                drop(set); // Release lock before removal
                self.topics.remove_if(topic, |_, set| set.is_empty());
            }
        }
    }

    /// Enqueue `message` to every connection currently registered under
    /// `topic`. Fire-and-forget: never blocks on a single connection, never
    /// reports per-connection failure. Unknown topics are a silent no-op.
    pub fn broadcast(&self, topic: &str, message: &Message) {
        if let Some(set) = self.topics.get(topic) {
            enqueue_to_set(&set, message);
        }
    }

    /// Whether the topic currently has any registered connections.
    pub fn contains_topic(&self, topic: &str) -> bool {
        self.topics.contains_key(topic)
    }

    pub fn connection_count(&self, topic: &str) -> usize {
        self.topics.get(topic).map_or(0, |set| set.len())
    }
}

impl Default for TopicRegistry {
    fn default() -> Self {
        Self::new()
    }
}

/// Connections keyed by user identity, holding at most the most recently
/// established connection set per user.
///
/// Unlike [`TopicRegistry`], registering a new connection for a user first
/// closes and evicts every connection already registered under that user
/// (single active-session policy, last-register-wins).
pub struct UserRegistry {
    users: DashMap<UserId, ConnectionSet>,
}

impl UserRegistry {
    pub fn new() -> Self {
        Self {
            users: DashMap::new(),
        }
    }

    /// Register `connection` as the user's active connection, closing and
    /// evicting any previously registered connections for the same user.
    pub fn register(&self, user_id: &str, connection: Arc<Connection>) {
        let mut set = self.users.entry(user_id.to_string()).or_default();

        for (old_id, old_connection) in set.drain() {
            debug!(
                "Evicting superseded connection {} for user {}",
                old_id.as_str(),
                user_id
            );
            old_connection.close();
        }

        set.insert(connection.id().clone(), connection);
    }

    /// Remove a connection for the user; deletes the user entry when its set
    /// empties. A connection already evicted by a newer registration is a
    /// safe no-op.
    pub fn unregister(&self, user_id: &str, connection_id: &ConnectionId) {
        if let Some(mut set) = self.users.get_mut(user_id) {
            set.remove(connection_id);

            if set.is_empty() {
                drop(set); // Release lock before removal
                self.users.remove_if(user_id, |_, set| set.is_empty());
            }
        }
    }

    /// Targeted analogue of broadcast: enqueue to every connection (normally
    /// zero or one) registered under `user_id`. Silent no-op when the user
    /// has no active connection.
    pub fn send_to_user(&self, user_id: &str, message: &Message) {
        if let Some(set) = self.users.get(user_id) {
            enqueue_to_set(&set, message);
        }
    }

    pub fn contains_user(&self, user_id: &str) -> bool {
        self.users.contains_key(user_id)
    }

    pub fn connection_count(&self, user_id: &str) -> usize {
        self.users.get(user_id).map_or(0, |set| set.len())
    }
}

impl Default for UserRegistry {
    fn default() -> Self {
        Self::new()
    }
}

/// The single unkeyed connection set used for system-wide fan-out
/// (e.g. "document list changed" notifications).
pub struct GlobalRegistry {
    connections: DashMap<ConnectionId, Arc<Connection>>,
}

impl GlobalRegistry {
    pub fn new() -> Self {
        Self {
            connections: DashMap::new(),
        }
    }

    pub fn register(&self, connection: Arc<Connection>) {
        self.connections
            .insert(connection.id().clone(), connection);
    }

    pub fn unregister(&self, connection_id: &ConnectionId) {
        self.connections.remove(connection_id);
    }

    /// Enqueue `message` to every currently registered connection system-wide.
    pub fn broadcast(&self, message: &Message) {
        for entry in self.connections.iter() {
            if !entry.value().enqueue(message.clone()) {
                debug!(
                    "Dropped global message for connection {} (queue full or closing)",
                    entry.key().as_str()
                );
            }
        }
    }

    pub fn connection_count(&self) -> usize {
        self.connections.len()
    }
}

impl Default for GlobalRegistry {
    fn default() -> Self {
        Self::new()
    }
}
