//! Sans-IO client core for the DIA reservation web service.
//!
//! # Overview
//! Builds `HttpRequest` values and parses `HttpResponse` values without
//! touching the network (host-does-IO pattern). The caller executes the
//! actual HTTP round-trip, so every protocol decision is deterministic and
//! testable from plain strings.
//!
//! # Design
//! - `DiaClient` owns a validated `ClientConfig` and the optional session
//!   token; nothing is process-global, so one client per tenant is fine.
//! - Each operation is split into `build_*` (produces request) and
//!   `parse_*` (consumes response), so the I/O boundary is explicit.
//! - Success is decided by the JSON `code` field alone; HTTP status codes
//!   are carried for diagnostics only.

pub mod client;
pub mod config;
pub mod error;
pub mod http;
pub mod protocol;
pub mod types;

pub use client::DiaClient;
pub use config::{ClientConfig, ClientConfigBuilder};
pub use error::{DiaError, Result};
pub use http::{HttpRequest, HttpResponse};
pub use protocol::Operation;
pub use types::{
    ApiResponse, Context, Guest, ListQuery, NewReservation, Notes, PartySize, ReservationUpdate,
};
