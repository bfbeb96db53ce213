//! Shared HTTP API types
//!
//! Response envelopes used by the service handlers and by anything that reads
//! the service's responses (admin tooling, tests).

pub mod types;

pub use types::{DataResponse, ErrorResponse, MessageResponse};
