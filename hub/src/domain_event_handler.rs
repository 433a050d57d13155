use crate::manager::Manager;
use crate::message::{Event, HubMessage, Scope};
use async_trait::async_trait;
use events::{DomainEvent, EventHandler};
use log::*;
use std::sync::Arc;

/// Handles domain events by converting them to hub messages and fanning them
/// out to connected WebSocket clients.
///
/// The business layer determines *what* happened and who it concerns; this
/// handler only maps events onto wire shapes and routing scopes. Delivery is
/// fire-and-forget like everything else in the hub.
pub struct HubEventHandler {
    hub: Arc<Manager>,
}

impl HubEventHandler {
    pub fn new(hub: Arc<Manager>) -> Self {
        Self { hub }
    }
}

#[async_trait]
impl EventHandler for HubEventHandler {
    async fn handle(&self, event: &DomainEvent) {
        match event {
            DomainEvent::DocumentStatusChanged {
                document_id,
                status,
                progress,
                error,
            } => {
                debug!("Handling DocumentStatusChanged for document {document_id}");
                self.hub
                    .publish_document_status(document_id, status, *progress, error.clone());
            }

            DomainEvent::DocumentListChanged => {
                debug!("Handling DocumentListChanged");
                self.hub.send_message(HubMessage {
                    event: Event::DocumentListChanged,
                    scope: Scope::Global,
                });
            }

            DomainEvent::CommentCreated {
                document_id,
                comment,
            } => {
                debug!("Handling CommentCreated for document {document_id}");
                self.hub.send_message(HubMessage {
                    event: Event::NewComment {
                        document_id: document_id.clone(),
                        comment: comment.clone(),
                    },
                    scope: Scope::Topic {
                        topic: document_id.clone(),
                    },
                });
            }

            DomainEvent::CommentDeleted {
                document_id,
                comment_id,
            } => {
                debug!("Handling CommentDeleted for document {document_id}");
                self.hub.send_message(HubMessage {
                    event: Event::DeleteComment {
                        document_id: document_id.clone(),
                        comment_id: comment_id.clone(),
                    },
                    scope: Scope::Topic {
                        topic: document_id.clone(),
                    },
                });
            }

            DomainEvent::FavoriteAdded {
                recipient_user_id,
                notification,
                unread_count,
            } => {
                debug!("Handling FavoriteAdded for user {recipient_user_id}");
                self.hub.send_message(HubMessage {
                    event: Event::FavoriteNotification {
                        notification: notification.clone(),
                    },
                    scope: Scope::User {
                        user_id: recipient_user_id.clone(),
                    },
                });
                self.hub
                    .publish_badge_update(recipient_user_id, *unread_count);
            }

            DomainEvent::BadgeCountChanged {
                user_id,
                unread_count,
            } => {
                debug!("Handling BadgeCountChanged for user {user_id}");
                self.hub.publish_badge_update(user_id, *unread_count);
            }
        }
    }
}
