use crate::error::Result;
use crate::params::ws::ConnectParams;
use axum::extract::ws::{Message, WebSocket, WebSocketUpgrade};
use axum::extract::{Path, Query, State};
use axum::response::Response;
use hub::message::Event;
use hub::Connection;
use log::*;
use service::AppState;

/// Upgrade handler for viewers of one document (`/ws/documents/{document_id}`).
/// The connection joins the document's topic set and receives status updates
/// and comment events scoped to that document.
pub(crate) async fn document_ws_handler(
    ws: WebSocketUpgrade,
    Path(document_id): Path<String>,
    Query(params): Query<ConnectParams>,
    State(app_state): State<AppState>,
) -> Result<Response> {
    let user_id = app_state.token_verifier.verify(&params.token).await?;
    debug!("Establishing document WebSocket for user {user_id}, document {document_id}");

    Ok(ws.on_upgrade(move |socket| serve_topic_connection(socket, app_state, document_id)))
}

/// Upgrade handler for viewers of the aggregate document list
/// (`/ws/documents`). The connection joins the global fan-out set.
pub(crate) async fn document_list_ws_handler(
    ws: WebSocketUpgrade,
    Query(params): Query<ConnectParams>,
    State(app_state): State<AppState>,
) -> Result<Response> {
    let user_id = app_state.token_verifier.verify(&params.token).await?;
    debug!("Establishing document-list WebSocket for user {user_id}");

    Ok(ws.on_upgrade(move |socket| serve_global_connection(socket, app_state)))
}

/// Upgrade handler for a user's personal notification stream
/// (`/ws/notifications`). At most one connection per user stays registered;
/// a newer connection evicts the previous one (last-register-wins).
pub(crate) async fn notifications_ws_handler(
    ws: WebSocketUpgrade,
    Query(params): Query<ConnectParams>,
    State(app_state): State<AppState>,
) -> Result<Response> {
    let user_id = app_state.token_verifier.verify(&params.token).await?;
    debug!("Establishing notification WebSocket for user {user_id}");

    Ok(ws.on_upgrade(move |socket| serve_user_connection(socket, app_state, user_id)))
}

async fn serve_topic_connection(socket: WebSocket, app_state: AppState, document_id: String) {
    let (connection, receiver) = app_state.hub.new_connection();
    let connection_id = connection.id().clone();

    // Ack the handshake before registration so no broadcast can precede it.
    enqueue_connected_ack(&connection);
    app_state.hub.register_topic(&document_id, connection.clone());

    hub::pump::run(socket, connection, receiver).await;

    app_state.hub.unregister_topic(&document_id, &connection_id);
}

async fn serve_global_connection(socket: WebSocket, app_state: AppState) {
    let (connection, receiver) = app_state.hub.new_connection();
    let connection_id = connection.id().clone();

    enqueue_connected_ack(&connection);
    app_state.hub.register_global(connection.clone());

    hub::pump::run(socket, connection, receiver).await;

    app_state.hub.unregister_global(&connection_id);
}

async fn serve_user_connection(socket: WebSocket, app_state: AppState, user_id: String) {
    let (connection, receiver) = app_state.hub.new_connection();
    let connection_id = connection.id().clone();

    enqueue_connected_ack(&connection);
    app_state.hub.register_user(&user_id, connection.clone());

    hub::pump::run(socket, connection, receiver).await;

    app_state.hub.unregister_user(&user_id, &connection_id);
}

fn enqueue_connected_ack(connection: &Connection) {
    match serde_json::to_string(&Event::Connected) {
        Ok(json) => {
            // The queue is freshly created; this cannot realistically fail.
            if !connection.enqueue(Message::Text(json.into())) {
                warn!("Dropped connected ack for a brand-new connection");
            }
        }
        Err(e) => error!("Failed to serialize connected ack: {e}"),
    }
}
