//! Data Transfer Objects for REST request/response serialization.
//!
//! Field names follow the public wire format (`user_name`, `seat_number`,
//! `duration`), which differs in places from the domain names.

pub mod booking_dto;
pub mod showing_dto;

pub use booking_dto::*;
pub use showing_dto::*;
