use serde::Deserialize;

/// Query parameters accepted by every WebSocket upgrade endpoint.
#[derive(Debug, Deserialize)]
pub(crate) struct ConnectParams {
    /// Bearer token issued by the auth service. Carried as a query parameter
    /// because browser WebSocket clients cannot set request headers.
    pub(crate) token: String,
}
