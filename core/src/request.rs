//! Per-call request descriptor.
//!
//! An `ApiRequest` names a resource path relative to the client's base path
//! plus the optional pieces of a call. It is turned into a wire
//! [`HttpRequest`](crate::http::HttpRequest) by
//! [`Client::build_request`](crate::client::Client::build_request).

use serde_json::{Map, Value};

use crate::http::HttpMethod;

/// One call against the API, before the client adds its base path, port and
/// mandatory headers.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiRequest {
    pub method: HttpMethod,
    pub resource_path: String,
    /// JSON body; an empty object is not sent.
    pub body: Value,
    /// Appended to the URL in insertion order.
    pub query_params: Vec<(String, String)>,
    /// Extra headers. `Content-Type` and `Authorization` are always overridden.
    pub headers: Vec<(String, String)>,
    /// Overrides the client's port when set.
    pub port: Option<u16>,
    /// Writes `:port` into the URL after the base path.
    pub port_in_path: bool,
}

impl ApiRequest {
    /// A request with an empty body, no query or headers, and the client's port.
    pub fn new(method: HttpMethod, resource_path: impl Into<String>) -> Self {
        Self {
            method,
            resource_path: resource_path.into(),
            body: Value::Object(Map::new()),
            query_params: Vec::new(),
            headers: Vec::new(),
            port: None,
            port_in_path: false,
        }
    }

    /// Shorthand for `ApiRequest::new(HttpMethod::Get, resource_path)`.
    pub fn get(resource_path: impl Into<String>) -> Self {
        Self::new(HttpMethod::Get, resource_path)
    }

    /// Appends a query parameter. Order is preserved and duplicates are kept.
    pub fn query(mut self, key: impl Into<String>, value: impl ToString) -> Self {
        self.query_params.push((key.into(), value.to_string()));
        self
    }

    /// Adds a header. `Content-Type` and `Authorization` set here are replaced.
    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    /// Replaces the JSON body. Ignored for GET and DELETE.
    pub fn body(mut self, body: Value) -> Self {
        self.body = body;
        self
    }

    pub fn port(mut self, port: u16) -> Self {
        self.port = Some(port);
        self
    }

    pub fn port_in_path(mut self, port_in_path: bool) -> Self {
        self.port_in_path = port_in_path;
        self
    }

    /// The body as JSON text, or `None` when there is nothing to send.
    pub(crate) fn encoded_body(&self) -> Option<String> {
        if !self.method.sends_body() {
            return None;
        }
        match &self.body {
            Value::Null => None,
            Value::Object(map) if map.is_empty() => None,
            body => Some(body.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn defaults_are_empty() {
        let request = ApiRequest::get("lookup/make");
        assert_eq!(request.method, HttpMethod::Get);
        assert_eq!(request.body, json!({}));
        assert!(request.query_params.is_empty());
        assert!(request.headers.is_empty());
        assert_eq!(request.port, None);
        assert!(!request.port_in_path);
    }

    #[test]
    fn builder_methods_accumulate() {
        let request = ApiRequest::get("x")
            .query("a", 1)
            .query("b", "2")
            .header("X-Trace", "t")
            .port(8443)
            .port_in_path(true);
        assert_eq!(
            request.query_params,
            vec![("a".to_string(), "1".to_string()), ("b".to_string(), "2".to_string())]
        );
        assert_eq!(request.headers, vec![("X-Trace".to_string(), "t".to_string())]);
        assert_eq!(request.port, Some(8443));
        assert!(request.port_in_path);
    }

    #[test]
    fn empty_object_body_is_not_encoded() {
        let request = ApiRequest::new(HttpMethod::Post, "x");
        assert_eq!(request.encoded_body(), None);
    }

    #[test]
    fn post_body_is_json_text() {
        let request = ApiRequest::new(HttpMethod::Post, "x").body(json!({"vin": "ABC"}));
        assert_eq!(request.encoded_body().as_deref(), Some(r#"{"vin":"ABC"}"#));
    }

    #[test]
    fn get_never_encodes_a_body() {
        let request = ApiRequest::get("x").body(json!({"vin": "ABC"}));
        assert_eq!(request.encoded_body(), None);
    }
}
