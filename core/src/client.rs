//! Blocking client for the AcuityData vehicle-lookup API.
//!
//! # Design
//! `Client` holds an immutable [`ClientConfig`] and a [`Transport`]. Every
//! operation follows the same three steps: turn an [`ApiRequest`] into a wire
//! [`HttpRequest`] (`build_request`), execute it once while recording
//! wall-clock timestamps (`dispatch`), and fold the raw response into a
//! [`ResponseEnvelope`]. HTTP error statuses come back as envelopes; only
//! transport failures are `Err`.

use crate::config::ClientConfig;
use crate::constants::{API_VERSION, COMPATIBLE_API_VERSION, CONTENT_TYPE_JSON};
use crate::endpoint::Endpoint;
use crate::http::{HttpRequest, HttpResponse};
use crate::path::build_path;
use crate::request::ApiRequest;
use crate::response::{now_micros, ResponseEnvelope};
use crate::transport::{Transport, UreqTransport};

/// Raw response plus the timestamps taken around the call.
#[derive(Debug, Clone)]
pub struct Dispatched {
    pub response: HttpResponse,
    pub start_time: u64,
    pub end_time: u64,
}

/// Synchronous, stateless client for the AcuityData API.
///
/// Configuration is fixed at construction; the `with_*` methods consume the
/// client and return an updated one. `T` performs the HTTP exchange and
/// defaults to [`UreqTransport`].
#[derive(Debug, Clone)]
pub struct Client<T = UreqTransport> {
    config: ClientConfig,
    transport: T,
}

impl Client<UreqTransport> {
    /// Client for the vendor's default host and port.
    pub fn new(auth_token: impl Into<String>) -> Self {
        Self::from_config(ClientConfig::new(auth_token))
    }

    pub fn from_config(config: ClientConfig) -> Self {
        Self {
            config,
            transport: UreqTransport::new(),
        }
    }
}

impl<T> Client<T> {
    pub fn compatible_api_version() -> &'static str {
        COMPATIBLE_API_VERSION
    }

    /// Revision of the vendor API docs the endpoint templates follow.
    pub fn api_version() -> &'static str {
        API_VERSION
    }

    pub fn with_base_path(mut self, base_path: impl Into<String>) -> Self {
        self.config.base_path = base_path.into();
        self
    }

    pub fn with_port(mut self, port: u16) -> Self {
        self.config.port = port;
        self
    }

    pub fn with_transport<U: Transport>(self, transport: U) -> Client<U> {
        Client {
            config: self.config,
            transport,
        }
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub fn auth_token(&self) -> &str {
        &self.config.auth_token
    }

    pub fn base_path(&self) -> &str {
        &self.config.base_path
    }

    pub fn port(&self) -> u16 {
        self.config.port
    }

    /// Produce the wire request for `request` without sending it.
    ///
    /// `Content-Type` and `Authorization` replace any caller header with the
    /// same name. The token is sent verbatim after `Basic `.
    pub fn build_request(&self, request: &ApiRequest) -> HttpRequest {
        let port = request.port.unwrap_or(self.config.port);
        let url = build_path(
            &self.config.base_path,
            &request.resource_path,
            port,
            request.port_in_path,
            &request.query_params,
        );

        let mut headers: Vec<(String, String)> = request
            .headers
            .iter()
            .filter(|(name, _)| !is_reserved_header(name))
            .cloned()
            .collect();
        headers.push(("Content-Type".to_string(), CONTENT_TYPE_JSON.to_string()));
        headers.push((
            "Authorization".to_string(),
            format!("Basic {}", self.config.auth_token),
        ));

        HttpRequest {
            method: request.method,
            url,
            port,
            headers,
            body: request.encoded_body(),
        }
    }

    pub fn build_endpoint(&self, endpoint: &Endpoint) -> HttpRequest {
        self.build_request(&ApiRequest::new(endpoint.method(), endpoint.resource_path()))
    }
}

impl<T: Transport> Client<T> {
    /// `GET lookup/make`
    pub fn make(&self) -> Result<ResponseEnvelope, T::Error> {
        self.call(Endpoint::Make)
    }

    /// `GET lookup/model/{make}`, or `lookup/model2/{make}/{year}` when a year is given.
    pub fn model(&self, make: &str, year: Option<u32>) -> Result<ResponseEnvelope, T::Error> {
        self.call(Endpoint::Model {
            make: make.to_string(),
            year,
        })
    }

    /// `GET lookup/year2/{make}`, or `lookup/year/{make}/{model}` when a model is given.
    pub fn year(&self, make: &str, model: Option<&str>) -> Result<ResponseEnvelope, T::Error> {
        self.call(Endpoint::Year {
            make: make.to_string(),
            model: model.map(str::to_string),
        })
    }

    /// `GET lookup/variant/{make}/{model}/{year}`
    pub fn variant(&self, make: &str, model: &str, year: u32) -> Result<ResponseEnvelope, T::Error> {
        self.call(Endpoint::Variant {
            make: make.to_string(),
            model: model.to_string(),
            year,
        })
    }

    /// `GET report/{make}/{model}/{variant}/{year}/{mileage}`
    pub fn report(
        &self,
        make: &str,
        model: &str,
        variant: &str,
        year: u32,
        mileage: u64,
    ) -> Result<ResponseEnvelope, T::Error> {
        self.call(Endpoint::Report {
            make: make.to_string(),
            model: model.to_string(),
            variant: variant.to_string(),
            year,
            mileage,
        })
    }

    pub fn call(&self, endpoint: Endpoint) -> Result<ResponseEnvelope, T::Error> {
        self.send(ApiRequest::new(endpoint.method(), endpoint.resource_path()))
    }

    /// Send an arbitrary request against the configured host.
    pub fn send(&self, request: ApiRequest) -> Result<ResponseEnvelope, T::Error> {
        let request = self.build_request(&request);
        let dispatched = self.dispatch(&request)?;
        Ok(ResponseEnvelope::normalize(
            dispatched.response,
            dispatched.start_time,
            dispatched.end_time,
        ))
    }

    /// Execute `request` exactly once, timing it with the wall clock.
    pub fn dispatch(&self, request: &HttpRequest) -> Result<Dispatched, T::Error> {
        tracing::debug!(method = %request.method, url = %request.url, "sending request");

        let start_time = now_micros();
        let result = self.transport.execute(request);
        let end_time = now_micros();

        match result {
            Ok(response) => {
                tracing::debug!(
                    method = %request.method,
                    url = %request.url,
                    status = response.status,
                    elapsed_us = end_time.saturating_sub(start_time),
                    "received response"
                );
                Ok(Dispatched {
                    response,
                    start_time,
                    end_time,
                })
            }
            Err(err) => {
                tracing::debug!(method = %request.method, url = %request.url, error = %err, "transport failed");
                Err(err)
            }
        }
    }
}

fn is_reserved_header(name: &str) -> bool {
    name.eq_ignore_ascii_case("content-type") || name.eq_ignore_ascii_case("authorization")
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::fmt;

    use serde_json::json;

    use super::*;
    use crate::http::HttpMethod;
    use crate::response::ParsedBody;

    #[derive(Debug)]
    struct Refused;

    impl fmt::Display for Refused {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            write!(f, "connection refused")
        }
    }

    impl std::error::Error for Refused {}

    /// Records every request and answers with a canned response.
    struct Canned {
        response: Option<HttpResponse>,
        seen: RefCell<Vec<HttpRequest>>,
    }

    impl Canned {
        fn new(status: u16, body: Option<&str>) -> Self {
            Self {
                response: Some(HttpResponse {
                    status,
                    headers: vec![("set-cookie".to_string(), "sid=1".to_string())],
                    body: body.map(|b| b.as_bytes().to_vec()),
                }),
                seen: RefCell::new(Vec::new()),
            }
        }

        fn refusing() -> Self {
            Self {
                response: None,
                seen: RefCell::new(Vec::new()),
            }
        }

        fn last_url(&self) -> String {
            self.seen.borrow().last().unwrap().url.clone()
        }
    }

    impl Transport for Canned {
        type Error = Refused;

        fn execute(&self, request: &HttpRequest) -> Result<HttpResponse, Refused> {
            self.seen.borrow_mut().push(request.clone());
            self.response.clone().ok_or(Refused)
        }
    }

    fn client() -> Client {
        Client::new("dG9rZW4=").with_base_path("http://localhost:3000")
    }

    fn canned(status: u16, body: Option<&str>) -> Client<Canned> {
        client().with_transport(Canned::new(status, body))
    }

    #[test]
    fn version_constants() {
        assert_eq!(Client::<UreqTransport>::compatible_api_version(), "v1");
        assert_eq!(Client::<UreqTransport>::api_version(), "v1 2024-03-19");
        assert_eq!(Client::<Canned>::compatible_api_version(), "v1");
        assert_eq!(Client::<Canned>::api_version(), "v1 2024-03-19");
    }

    #[test]
    fn new_uses_vendor_defaults() {
        let client = Client::new("token");
        assert_eq!(client.base_path(), crate::constants::BASE_PATH);
        assert_eq!(client.port(), crate::constants::BASE_PORT);
        assert_eq!(client.auth_token(), "token");
    }

    #[test]
    fn from_config_keeps_settings() {
        let config = ClientConfig::new("abc").with_base_path("http://127.0.0.1").with_port(8080);
        let client = Client::from_config(config.clone());
        assert_eq!(client.config(), &config);
        let req = client.build_request(&ApiRequest::get("lookup/make").port_in_path(true));
        assert_eq!(req.url, "http://127.0.0.1:8080/lookup/make");
    }

    #[test]
    fn build_request_adds_mandatory_headers() {
        let req = client().build_request(&ApiRequest::get("lookup/make"));
        assert_eq!(req.method, HttpMethod::Get);
        assert_eq!(req.url, "http://localhost:3000/lookup/make");
        assert_eq!(req.header("content-type"), Some("application/json"));
        assert_eq!(req.header("authorization"), Some("Basic dG9rZW4="));
        assert!(req.body.is_none());
    }

    #[test]
    fn caller_headers_cannot_replace_mandatory_ones() {
        let request = ApiRequest::get("lookup/make")
            .header("authorization", "Bearer nope")
            .header("CONTENT-TYPE", "text/plain")
            .header("X-Trace", "abc");
        let req = client().build_request(&request);
        assert_eq!(req.headers.len(), 3);
        assert_eq!(req.header("x-trace"), Some("abc"));
        assert_eq!(req.header("authorization"), Some("Basic dG9rZW4="));
        assert_eq!(req.header("content-type"), Some("application/json"));
    }

    #[test]
    fn port_override_and_port_in_path() {
        let request = ApiRequest::get("lookup/make").port(8443).port_in_path(true);
        let req = Client::new("t")
            .with_base_path("https://api.example.com")
            .build_request(&request);
        assert_eq!(req.url, "https://api.example.com:8443/lookup/make");
        assert_eq!(req.port, 8443);
    }

    #[test]
    fn client_port_used_when_not_overridden() {
        let client = Client::new("t").with_base_path("http://h").with_port(9000);
        let req = client.build_request(&ApiRequest::get("x").port_in_path(true));
        assert_eq!(req.url, "http://h:9000/x");
        assert_eq!(req.port, 9000);
    }

    #[test]
    fn query_params_are_appended() {
        let req = client().build_request(&ApiRequest::get("lookup/make").query("a", "1").query("b", "2"));
        assert_eq!(req.url, "http://localhost:3000/lookup/make?a=1&b=2");
    }

    #[test]
    fn post_body_is_serialized() {
        let request = ApiRequest::new(HttpMethod::Post, "valuations").body(json!({"vin": "X"}));
        let req = client().build_request(&request);
        assert_eq!(req.body.as_deref(), Some(r#"{"vin":"X"}"#));
    }

    #[test]
    fn endpoint_paths_reach_the_transport() {
        let client = canned(200, Some("[]"));

        client.make().unwrap();
        assert_eq!(client.transport.last_url(), "http://localhost:3000/lookup/make");

        client.model("toyota", None).unwrap();
        assert_eq!(client.transport.last_url(), "http://localhost:3000/lookup/model/toyota");

        client.model("toyota", Some(2020)).unwrap();
        assert_eq!(client.transport.last_url(), "http://localhost:3000/lookup/model2/toyota/2020");

        client.year("toyota", None).unwrap();
        assert_eq!(client.transport.last_url(), "http://localhost:3000/lookup/year2/toyota");

        client.year("toyota", Some("corolla")).unwrap();
        assert_eq!(client.transport.last_url(), "http://localhost:3000/lookup/year/toyota/corolla");

        client.variant("toyota", "corolla", 2020).unwrap();
        assert_eq!(
            client.transport.last_url(),
            "http://localhost:3000/lookup/variant/toyota/corolla/2020"
        );

        client.report("toyota", "corolla", "le", 2020, 50_000).unwrap();
        assert_eq!(
            client.transport.last_url(),
            "http://localhost:3000/report/toyota/corolla/le/2020/50000"
        );

        assert_eq!(client.transport.seen.borrow().len(), 7);
        for req in client.transport.seen.borrow().iter() {
            assert_eq!(req.method, HttpMethod::Get);
            assert!(req.header("authorization").unwrap().starts_with("Basic "));
        }
    }

    #[test]
    fn spaces_in_segments_are_encoded() {
        let client = canned(200, Some("[]"));
        client.year("land rover", Some("range rover")).unwrap();
        assert_eq!(
            client.transport.last_url(),
            "http://localhost:3000/lookup/year/land%20rover/range%20rover"
        );
    }

    #[test]
    fn error_status_is_an_envelope_not_an_error() {
        let envelope = canned(404, Some(r#"{"error":"unknown make"}"#))
            .model("nope", None)
            .unwrap();
        assert_eq!(envelope.code, 404);
        assert_eq!(envelope.body, ParsedBody::Json(json!({"error": "unknown make"})));
        assert_eq!(envelope.cookies.as_deref(), Some("sid=1"));
    }

    #[test]
    fn plain_text_body_is_kept_raw() {
        let envelope = canned(500, Some("Internal Server Error")).make().unwrap();
        assert_eq!(envelope.body, ParsedBody::Raw("Internal Server Error".to_string()));
    }

    #[test]
    fn missing_body_is_absent() {
        let envelope = canned(204, None).make().unwrap();
        assert!(envelope.body.is_absent());
    }

    #[test]
    fn timing_is_recorded() {
        let envelope = canned(200, Some("{}")).make().unwrap();
        let metadata = envelope.metadata;
        assert!(metadata.start_time > 0);
        assert!(metadata.end_time >= metadata.start_time);
        assert_eq!(metadata.total_time, metadata.end_time - metadata.start_time);
    }

    #[test]
    fn transport_errors_propagate_unwrapped() {
        let client = client().with_transport(Canned::refusing());
        let err = client.make().unwrap_err();
        assert_eq!(err.to_string(), "connection refused");
        assert_eq!(client.transport.seen.borrow().len(), 1);
    }
}
