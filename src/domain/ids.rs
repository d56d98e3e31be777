//! Type-safe identifiers for showings, seats, bookings and clients.
//!
//! Storage keys are `i64` (Postgres `BIGSERIAL`). Each one is wrapped in
//! its own newtype so a seat id can never be passed where a showing id is
//! expected.

use std::fmt;
use std::net::IpAddr;

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

macro_rules! storage_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(
            Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, ToSchema,
        )]
        #[serde(transparent)]
        pub struct $name(i64);

        impl $name {
            /// Wraps a raw storage key.
            #[must_use]
            pub const fn new(raw: i64) -> Self {
                Self(raw)
            }

            /// Returns the raw storage key.
            #[must_use]
            pub const fn get(self) -> i64 {
                self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl From<i64> for $name {
            fn from(raw: i64) -> Self {
                Self(raw)
            }
        }

        impl From<$name> for i64 {
            fn from(id: $name) -> Self {
                id.0
            }
        }
    };
}

storage_id!(
    /// Identifier of a scheduled showing.
    ShowingId
);

storage_id!(
    /// Identifier of a seat. Unique across all showings.
    SeatId
);

storage_id!(
    /// Identifier of an immutable booking record.
    BookingId
);

/// Admission identity of a caller.
///
/// Derived from the peer IP address. Clients behind a shared NAT collapse
/// into one identity and a client that changes address becomes a new one.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ClientId(String);

impl ClientId {
    /// Creates an identity from an arbitrary key.
    #[must_use]
    pub fn new(key: impl Into<String>) -> Self {
        Self(key.into())
    }

    /// Identity used when the transport does not expose a peer address.
    #[must_use]
    pub fn unknown() -> Self {
        Self("unknown".to_string())
    }

    /// Returns the identity key.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<IpAddr> for ClientId {
    fn from(ip: IpAddr) -> Self {
        Self(ip.to_string())
    }
}

impl fmt::Display for ClientId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;
    use std::net::{Ipv4Addr, Ipv6Addr};

    #[test]
    fn ids_are_transparent_in_json() {
        let json = serde_json::to_string(&SeatId::new(42)).ok();
        assert_eq!(json.as_deref(), Some("42"));

        let Ok(id) = serde_json::from_str::<ShowingId>("7") else {
            panic!("deserialization failed");
        };
        assert_eq!(id.get(), 7);
    }

    #[test]
    fn display_is_raw_number() {
        assert_eq!(BookingId::new(13).to_string(), "13");
    }

    #[test]
    fn client_id_ignores_port_by_construction() {
        let a = ClientId::from(IpAddr::V4(Ipv4Addr::new(10, 0, 0, 1)));
        let b = ClientId::from(IpAddr::V4(Ipv4Addr::new(10, 0, 0, 1)));
        assert_eq!(a, b);
        assert_eq!(a.as_str(), "10.0.0.1");
    }

    #[test]
    fn client_id_v6_display() {
        let id = ClientId::from(IpAddr::V6(Ipv6Addr::LOCALHOST));
        assert_eq!(id.to_string(), "::1");
    }
}
