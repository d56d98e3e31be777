//! Admission control: per-client in-flight budgets for mutating requests.
//!
//! [`AdmissionController`] owns the budget table and its idle sweep;
//! [`middleware::admit`] applies it to axum routes.

pub mod controller;
pub mod middleware;

pub use controller::{AdmissionConfig, AdmissionController, AdmissionSlot};
