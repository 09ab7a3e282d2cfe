//! Typed REST client for the SRIS backend.
//!
//! [`ApiClient`] covers every `/api` endpoint the dashboard consumes and
//! decodes each response into the explicit types from `sris-core`. The
//! [`IntelApi`] trait is the seam the dashboard core is written against.

pub mod api;
pub mod client;
pub mod error;

mod contracts;
mod intelligence;
mod sources;

pub use api::IntelApi;
pub use client::ApiClient;
pub use error::ClientError;
