//! Client side of the Syfit API
//!
//! Every call the server makes to the upstream goes through the
//! [`AuthApi`] trait, so handlers can be exercised against a mock.

mod client;

pub use client::{AuthApi, UpstreamClient, UpstreamResponse, APP_USER_AGENT};

#[cfg(test)]
pub use client::MockAuthApi;
