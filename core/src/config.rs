//! Client configuration.

use std::fmt;

use serde::Deserialize;

use crate::constants::{BASE_PATH, BASE_PORT};

/// Connection settings for a [`Client`](crate::client::Client).
///
/// `Debug` never prints the auth token.
#[derive(Clone, PartialEq, Eq, Deserialize)]
pub struct ClientConfig {
    pub auth_token: String,
    #[serde(default = "default_base_path")]
    pub base_path: String,
    #[serde(default = "default_port")]
    pub port: u16,
}

impl ClientConfig {
    pub fn new(auth_token: impl Into<String>) -> Self {
        Self {
            auth_token: auth_token.into(),
            base_path: default_base_path(),
            port: default_port(),
        }
    }

    pub fn with_base_path(mut self, base_path: impl Into<String>) -> Self {
        self.base_path = base_path.into();
        self
    }

    pub fn with_port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }
}

fn default_base_path() -> String {
    BASE_PATH.to_string()
}

fn default_port() -> u16 {
    BASE_PORT
}

impl fmt::Debug for ClientConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClientConfig")
            .field("auth_token", &"[REDACTED]")
            .field("base_path", &self.base_path)
            .field("port", &self.port)
            .finish()
    }
}
