//! # Vantage Client
//!
//! HTTP-based API client for the Vantage analytics platform.
//!
//! This crate contains:
//! - The transport layer (one request, one timeout, no retries)
//! - The request builder (auth header injection, subscription/app scoping)
//! - The query wire model (spec → aggregation pipeline translation)
//! - The retry policy applied at the operation layer
//! - The pagination cursor for multi-page list queries
//! - The typed domain operations ([`ApiClient`])
//!
//! Every public operation returns an [`vantage_domain::Envelope`]; no
//! error type crosses that boundary in any other form.

pub mod client;
pub mod page;
pub mod request;
pub mod retry;
pub mod transport;
pub mod wire;

pub use client::{ApiClient, ApiClientBuilder};
pub use page::{PageCursor, PageResponse};
pub use request::{ApiRequest, Endpoint, RequestBuilder};
pub use retry::RetryPolicy;
pub use transport::{HttpTransport, RawResponse, Transport, TransportError};
pub use wire::{to_wire, WireQuery};
