//! Event system infrastructure for Pagecast.
//!
//! This crate provides the event system that enables loose coupling between
//! business logic and infrastructure concerns (like WebSocket notifications).
//!
//! # Architecture
//!
//! - **DomainEvent**: Enum representing all business events in the system
//! - **EventHandler**: Trait for implementing event handlers
//! - **EventPublisher**: Publishes events to registered handlers
//!
//! This crate has no dependencies on other internal crates, avoiding circular
//! dependencies. Entity data is carried as serialized JSON values.

use async_trait::async_trait;
use serde_json::Value;
use std::sync::Arc;

/// Domain events that represent business-level changes in the system.
/// These events are emitted after the triggering operation has already
/// completed successfully; handlers only react, they never veto.
///
/// The business layer decides *when* to emit and pre-computes any derived
/// values (e.g. unread counts); handlers receive finished facts.
#[derive(Debug, Clone)]
pub enum DomainEvent {
    /// Emitted while a document moves through the processing pipeline
    /// (parsing, summarizing, audio rendering). Drives progress indicators
    /// for viewers of the document and of the aggregate document list.
    DocumentStatusChanged {
        document_id: String,
        /// Pipeline stage label, e.g. "processing" or "failed".
        status: String,
        /// Percent complete for the current stage, 0-100.
        progress: u8,
        /// Populated only when the pipeline stage failed.
        error: Option<String>,
    },
    /// Emitted when the set of documents changed in a way not tied to any
    /// single document's progress (created, deleted, renamed).
    DocumentListChanged,
    /// Emitted when a comment is added to a document. The comment entity is
    /// carried pre-serialized so the frontend can render it without a
    /// follow-up API call.
    CommentCreated {
        document_id: String,
        comment: Value,
    },
    /// Emitted when a comment is removed from a document.
    CommentDeleted {
        document_id: String,
        comment_id: String,
    },
    /// Emitted when someone favorites a document. Notifies the document's
    /// owner and carries their updated unread-notification count.
    FavoriteAdded {
        /// The document owner, the only user notified.
        recipient_user_id: String,
        /// Pre-serialized notification row (who favorited what, when).
        notification: Value,
        unread_count: u64,
    },
    /// Emitted whenever a user's unread-notification count changes outside
    /// of the flows above (e.g. notifications marked as read).
    BadgeCountChanged { user_id: String, unread_count: u64 },
}

/// Trait for handling domain events.
/// Implementations can perform side effects like sending notifications,
/// updating caches, logging, etc.
#[async_trait]
pub trait EventHandler: Send + Sync {
    async fn handle(&self, event: &DomainEvent);
}

/// Publishes domain events to registered handlers.
/// Handlers are called sequentially in registration order.
#[derive(Clone)]
pub struct EventPublisher {
    handlers: Arc<Vec<Arc<dyn EventHandler>>>,
}

impl EventPublisher {
    pub fn new() -> Self {
        Self {
            handlers: Arc::new(Vec::new()),
        }
    }

    /// Register a new event handler.
    /// Note: This creates a new publisher instance with the additional handler.
    /// Store the returned publisher in your application state.
    pub fn with_handler(mut self, handler: Arc<dyn EventHandler>) -> Self {
        let mut handlers = (*self.handlers).clone();
        handlers.push(handler);
        self.handlers = Arc::new(handlers);
        self
    }

    /// Publish an event to all registered handlers.
    /// Handlers are called sequentially in registration order.
    pub async fn publish(&self, event: DomainEvent) {
        for handler in self.handlers.iter() {
            handler.handle(&event).await;
        }
    }
}

impl Default for EventPublisher {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    struct RecordingHandler {
        label: &'static str,
        seen: Arc<Mutex<Vec<String>>>,
    }

    #[async_trait]
    impl EventHandler for RecordingHandler {
        async fn handle(&self, event: &DomainEvent) {
            let entry = match event {
                DomainEvent::DocumentStatusChanged { document_id, .. } => {
                    format!("{}:status:{}", self.label, document_id)
                }
                _ => format!("{}:other", self.label),
            };
            self.seen.lock().unwrap().push(entry);
        }
    }

    #[tokio::test]
    async fn publish_calls_handlers_in_registration_order() {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let publisher = EventPublisher::new()
            .with_handler(Arc::new(RecordingHandler {
                label: "first",
                seen: seen.clone(),
            }))
            .with_handler(Arc::new(RecordingHandler {
                label: "second",
                seen: seen.clone(),
            }));

        publisher
            .publish(DomainEvent::DocumentStatusChanged {
                document_id: "doc-1".to_string(),
                status: "processing".to_string(),
                progress: 10,
                error: None,
            })
            .await;

        let seen = seen.lock().unwrap();
        assert_eq!(*seen, vec!["first:status:doc-1", "second:status:doc-1"]);
    }

    #[tokio::test]
    async fn publish_with_no_handlers_is_a_no_op() {
        let publisher = EventPublisher::new();
        publisher.publish(DomainEvent::DocumentListChanged).await;
    }
}
