//! Async host for `dia-core`.
//!
//! # Overview
//! `SessionClient` drives every DIA operation through the core's
//! `build_*`/`parse_*` pairs and a pluggable [`Transport`]. The default
//! transport is `reqwest`; tests and alternative stacks implement the trait
//! themselves.
//!
//! One request per call: no retries, no backoff, no explicit timeouts.

pub mod session;
pub mod transport;

pub use dia_core::{
    ApiResponse, ClientConfig, Context, DiaError, Guest, ListQuery, NewReservation, Notes,
    Operation, PartySize, ReservationUpdate,
};
pub use session::SessionClient;
pub use transport::{ReqwestTransport, Transport};
