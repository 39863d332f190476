//! Blocking client for the AcuityData vehicle-lookup REST API.
//!
//! # Overview
//! Six lookups (makes, models, years, variants, valuation reports) are mapped
//! to fixed resource paths, sent with `Basic` auth, and returned as a uniform
//! [`ResponseEnvelope`] carrying status, headers, cookies, the decoded body
//! and client-side timing.
//!
//! # Design
//! - `Client` is immutable after construction; every call is one independent
//!   round trip with no retries or caching.
//! - Request construction (`build_request`) is pure, so URLs and headers can
//!   be checked without a network.
//! - I/O goes through the [`Transport`] trait; [`UreqTransport`] is the
//!   blocking default and its errors are returned unchanged.
//! - HTTP error statuses are envelopes, not errors. Bodies that are not JSON
//!   are kept as raw text, and missing or non-text bodies become
//!   [`ParsedBody::Absent`].

pub mod client;
pub mod config;
pub mod constants;
pub mod endpoint;
pub mod error;
pub mod http;
pub mod path;
pub mod request;
pub mod response;
pub mod transport;

pub use client::{Client, Dispatched};
pub use config::ClientConfig;
pub use constants::{API_VERSION, BASE_PATH, BASE_PORT, COMPATIBLE_API_VERSION, VERSION};
pub use endpoint::Endpoint;
pub use error::Error;
pub use http::{HttpMethod, HttpRequest, HttpResponse};
pub use path::build_path;
pub use request::ApiRequest;
pub use response::{Metadata, ParsedBody, ResponseEnvelope};
pub use transport::{Transport, UreqTransport};
