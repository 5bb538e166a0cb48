//! HTTP networking module
//!
//! Provides the shared HTTP client used by search providers and model servers.

mod client;

pub use client::{HttpClient, HttpResponse};
