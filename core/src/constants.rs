//! Process-wide constants for the AcuityData API.

/// Default scheme and host of the vendor API.
pub const BASE_PATH: &str = "https://api.acuitydata.com";

/// Default port of the vendor API.
pub const BASE_PORT: u16 = 443;

/// Major API version the endpoint templates target.
pub const COMPATIBLE_API_VERSION: &str = "v1";

/// Revision of the vendor's API documentation the client was written against.
pub const API_VERSION: &str = "v1 2024-03-19";

/// Version of this crate.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub const CONTENT_TYPE_JSON: &str = "application/json";
