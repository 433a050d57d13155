use crate::connection::{Connection, ConnectionReceiver};
use axum::extract::ws::{Message, WebSocket};
use futures::stream::{SplitSink, SplitStream};
use futures::{SinkExt, StreamExt};
use log::*;
use std::sync::Arc;

/// Run both delivery pumps for one connection and resolve when the connection
/// has fully torn down. The caller unregisters afterwards.
///
/// Two tasks per connection: the write pump is the sole socket writer and the
/// sole queue consumer; the read pump is the sole socket reader and exists
/// only to detect peer-initiated close or transport errors.
pub async fn run(socket: WebSocket, connection: Arc<Connection>, receiver: ConnectionReceiver) {
    let (sink, stream) = socket.split();

    let mut write_task = tokio::spawn(write_pump(sink, receiver));
    let mut read_task = tokio::spawn(read_pump(stream));

    tokio::select! {
        _ = &mut write_task => {
            // Write side exited (transport error or shutdown); nothing is
            // left to deliver, so stop watching the read side.
            connection.close();
            read_task.abort();
        }
        _ = &mut read_task => {
            // Peer closed or the socket errored: wake the write pump so it
            // drains, sends a close frame, and releases the socket.
            connection.close();
            let _ = write_task.await;
        }
    }
}

/// Pop and write each queued message to the socket in order. On the shutdown
/// signal, drain remaining queued messages best-effort and send a close frame.
/// Any write error ends the pump immediately.
async fn write_pump(mut sink: SplitSink<WebSocket, Message>, mut receiver: ConnectionReceiver) {
    loop {
        tokio::select! {
            maybe_message = receiver.outbound.recv() => {
                match maybe_message {
                    Some(message) => {
                        if let Err(e) = sink.send(message).await {
                            debug!("WebSocket write failed, tearing down connection: {e}");
                            return;
                        }
                    }
                    // Connection dropped everywhere; nothing more can arrive.
                    None => break,
                }
            }
            changed = receiver.shutdown.changed() => {
                if changed.is_err() || *receiver.shutdown.borrow() {
                    break;
                }
            }
        }
    }

    // Closing: flush what was already queued, then say goodbye.
    while let Some(message) = receiver.try_recv() {
        if sink.send(message).await.is_err() {
            return;
        }
    }
    let _ = sink.send(Message::Close(None)).await;
}

/// Block on receive purely for liveness detection. Inbound application
/// frames are discarded; the protocol expects none after the handshake.
async fn read_pump(mut stream: SplitStream<WebSocket>) {
    while let Some(frame) = stream.next().await {
        match frame {
            Ok(Message::Close(_)) => {
                debug!("Peer sent close frame");
                break;
            }
            Err(e) => {
                debug!("WebSocket read failed: {e}");
                break;
            }
            Ok(_) => {}
        }
    }
}
