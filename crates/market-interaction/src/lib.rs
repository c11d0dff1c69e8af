//! HTTP gateway to the Campus Market REST backend.
//!
//! [`MarketClient`] implements every gateway trait of `market-core` on top of a
//! single `reqwest` client.

mod client;
mod envelope;

pub use client::{IDENTITY_HEADER, MarketClient};
pub use envelope::{Envelope, decode_envelope};
