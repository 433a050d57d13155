use serde::Serialize;
use serde_json::Value;

/// Outbound wire events, internally tagged with a `type` discriminator.
///
/// Entity payloads (`comment`, `notification`) are carried as opaque
/// pre-serialized JSON values; the hub routes them without inspecting their
/// structure.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Event {
    /// Initial acknowledgment sent right after a successful handshake.
    Connected,

    // Document processing pipeline
    DocumentStatusUpdate {
        document_id: String,
        status: String,
        progress: u8,
        #[serde(skip_serializing_if = "Option::is_none")]
        error: Option<String>,
    },
    DocumentListChanged,

    // Per-user notifications
    BadgeUpdate {
        unread_count: u64,
    },
    FavoriteNotification {
        notification: Value,
    },

    // Comments (document-scoped)
    NewComment {
        document_id: String,
        comment: Value,
    },
    DeleteComment {
        document_id: String,
        comment_id: String,
    },
}

/// A routable hub message: what to send and who should receive it.
#[derive(Debug, Clone)]
pub struct HubMessage {
    pub event: Event,
    pub scope: Scope,
}

/// Where a message fans out to.
#[derive(Debug, Clone)]
pub enum Scope {
    /// All connections registered under one topic (e.g. viewers of a document)
    Topic { topic: String },
    /// All connections for a specific user (normally zero or one)
    User { user_id: String },
    /// Every connection in the global fan-out set
    Global,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn document_status_update_matches_wire_shape() {
        let event = Event::DocumentStatusUpdate {
            document_id: "doc-42".to_string(),
            status: "processing".to_string(),
            progress: 50,
            error: None,
        };

        assert_eq!(
            serde_json::to_value(&event).unwrap(),
            json!({
                "type": "document_status_update",
                "document_id": "doc-42",
                "status": "processing",
                "progress": 50
            })
        );
    }

    #[test]
    fn document_status_update_includes_error_when_present() {
        let event = Event::DocumentStatusUpdate {
            document_id: "doc-42".to_string(),
            status: "failed".to_string(),
            progress: 0,
            error: Some("tts provider timeout".to_string()),
        };

        assert_eq!(
            serde_json::to_value(&event).unwrap(),
            json!({
                "type": "document_status_update",
                "document_id": "doc-42",
                "status": "failed",
                "progress": 0,
                "error": "tts provider timeout"
            })
        );
    }

    #[test]
    fn unit_events_serialize_to_bare_type_objects() {
        assert_eq!(
            serde_json::to_value(Event::DocumentListChanged).unwrap(),
            json!({"type": "document_list_changed"})
        );
        assert_eq!(
            serde_json::to_value(Event::Connected).unwrap(),
            json!({"type": "connected"})
        );
    }

    #[test]
    fn badge_update_matches_wire_shape() {
        assert_eq!(
            serde_json::to_value(Event::BadgeUpdate { unread_count: 3 }).unwrap(),
            json!({"type": "badge_update", "unread_count": 3})
        );
    }

    #[test]
    fn comment_payloads_pass_through_untouched() {
        let comment = json!({"id": "c-1", "body": "nice read", "author": "bob"});
        let event = Event::NewComment {
            document_id: "doc-42".to_string(),
            comment: comment.clone(),
        };

        assert_eq!(
            serde_json::to_value(&event).unwrap(),
            json!({
                "type": "new_comment",
                "document_id": "doc-42",
                "comment": comment
            })
        );
    }
}
