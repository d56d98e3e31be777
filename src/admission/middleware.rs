//! Axum middleware that wraps mutating routes in an admission slot.

use std::net::SocketAddr;

use axum::extract::{ConnectInfo, Request, State};
use axum::middleware::Next;
use axum::response::Response;

use crate::app_state::AppState;
use crate::domain::ClientId;
use crate::error::GatewayError;

/// Derives the admission identity from the peer address.
///
/// The port is dropped, so every connection from one host shares a budget.
/// Requests without [`ConnectInfo`] fall into [`ClientId::unknown`].
#[must_use]
pub fn client_id(request: &Request) -> ClientId {
    request
        .extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map_or_else(ClientId::unknown, |ConnectInfo(addr)| {
            ClientId::from(addr.ip())
        })
}

/// Admits the request or rejects it with 429.
///
/// The slot is held until the inner handler has produced its response.
///
/// # Errors
///
/// Returns [`GatewayError::AdmissionRejected`] when the client has no free
/// slot.
pub async fn admit(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Result<Response, GatewayError> {
    let client = client_id(&request);
    let slot = state.admission.acquire(&client).await?;
    let response = next.run(request).await;
    drop(slot);
    Ok(response)
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;
    use axum::body::Body;
    use std::net::{IpAddr, Ipv4Addr};

    #[test]
    fn identity_uses_ip_only() {
        let mut a = Request::new(Body::empty());
        a.extensions_mut()
            .insert(ConnectInfo(SocketAddr::new(IpAddr::V4(Ipv4Addr::new(192, 168, 1, 5)), 4000)));
        let mut b = Request::new(Body::empty());
        b.extensions_mut()
            .insert(ConnectInfo(SocketAddr::new(IpAddr::V4(Ipv4Addr::new(192, 168, 1, 5)), 5000)));

        assert_eq!(client_id(&a), client_id(&b));
        assert_eq!(client_id(&a).as_str(), "192.168.1.5");
    }

    #[test]
    fn missing_peer_is_unknown() {
        let req = Request::new(Body::empty());
        assert_eq!(client_id(&req), ClientId::unknown());
    }
}
