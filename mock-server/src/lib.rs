//! In-memory stand-in for the AcuityData v1 API.
//!
//! Serves the lookup and report routes from a small fixed catalogue, requires
//! `Authorization: Basic <token>` on every route, and adds helper routes used
//! by client tests: `/status` (204, no body), `/empty` (200, zero-length
//! body), `/padding/{size}` (plain text of the given length) and `/echo`
//! (reflects the request back as JSON).

use std::collections::BTreeSet;
use std::fmt;
use std::net::SocketAddr;
use std::sync::Arc;

use axum::{
    extract::{Path, Request, State},
    http::{header, HeaderMap, Method, StatusCode, Uri},
    middleware::{self, Next},
    response::{IntoResponse, Response},
    routing::{any, get},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tokio::net::TcpListener;
use uuid::Uuid;

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct Vehicle {
    pub make: String,
    pub model: String,
    pub year: u32,
    pub variant: String,
    pub list_price: u64,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct Report {
    pub make: String,
    pub model: String,
    pub variant: String,
    pub year: u32,
    pub mileage: u64,
    pub retail_value: u64,
    pub trade_value: u64,
}

/// Settings for the standalone binary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    pub port: u16,
    pub token: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    InvalidPort(String),
    EmptyToken,
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidPort(raw) => write!(f, "PORT is not a valid port: {raw:?}"),
            ConfigError::EmptyToken => write!(f, "ACUITY_TOKEN must not be empty"),
        }
    }
}

impl std::error::Error for ConfigError {}

impl ServerConfig {
    pub const DEFAULT_PORT: u16 = 3000;
    pub const DEFAULT_TOKEN: &'static str = "dev-token";

    /// Reads `PORT` and `ACUITY_TOKEN`.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_vars(std::env::var("PORT").ok(), std::env::var("ACUITY_TOKEN").ok())
    }

    pub fn from_vars(port: Option<String>, token: Option<String>) -> Result<Self, ConfigError> {
        let port = match port {
            None => Self::DEFAULT_PORT,
            Some(raw) => raw.trim().parse().map_err(|_| ConfigError::InvalidPort(raw))?,
        };
        let token = token.unwrap_or_else(|| Self::DEFAULT_TOKEN.to_string());
        if token.is_empty() {
            return Err(ConfigError::EmptyToken);
        }
        Ok(Self { port, token })
    }

    /// Loopback only.
    pub fn addr(&self) -> SocketAddr {
        SocketAddr::from(([127, 0, 0, 1], self.port))
    }
}

#[derive(Clone)]
struct AppState {
    token: Arc<str>,
    catalogue: Arc<Vec<Vehicle>>,
}

fn vehicle(make: &str, model: &str, year: u32, variant: &str, list_price: u64) -> Vehicle {
    Vehicle {
        make: make.to_string(),
        model: model.to_string(),
        year,
        variant: variant.to_string(),
        list_price,
    }
}

pub fn catalogue() -> Vec<Vehicle> {
    vec![
        vehicle("toyota", "corolla", 2019, "le", 19_500),
        vehicle("toyota", "corolla", 2020, "le", 20_000),
        vehicle("toyota", "corolla", 2020, "se", 22_000),
        vehicle("toyota", "camry", 2020, "xle", 29_000),
        vehicle("toyota", "land cruiser", 2021, "heritage", 87_000),
        vehicle("honda", "civic", 2020, "lx", 21_000),
        vehicle("honda", "civic", 2021, "ex", 24_000),
    ]
}

pub fn app(token: &str) -> Router {
    let state = AppState {
        token: Arc::from(token),
        catalogue: Arc::new(catalogue()),
    };
    Router::new()
        .route("/lookup/make", get(makes))
        .route("/lookup/model/{make}", get(models))
        .route("/lookup/model2/{make}/{year}", get(models_for_year))
        .route("/lookup/year/{make}/{model}", get(years_for_model))
        .route("/lookup/year2/{make}", get(years))
        .route("/lookup/variant/{make}/{model}/{year}", get(variants))
        .route("/report/{make}/{model}/{variant}/{year}/{mileage}", get(report))
        .route("/status", get(status))
        .route("/empty", get(empty))
        .route("/padding/{size}", get(padding))
        .route("/echo", any(echo))
        .layer(middleware::from_fn_with_state(state.clone(), require_basic_auth))
        .with_state(state)
}

pub async fn run(listener: TcpListener, token: &str) -> Result<(), std::io::Error> {
    axum::serve(listener, app(token)).await
}

async fn require_basic_auth(State(state): State<AppState>, request: Request, next: Next) -> Response {
    let expected = format!("Basic {}", state.token);
    let authorized = request
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .is_some_and(|value| value == expected);
    if authorized {
        next.run(request).await
    } else {
        (
            StatusCode::UNAUTHORIZED,
            [(header::WWW_AUTHENTICATE, "Basic")],
            "unauthorized",
        )
            .into_response()
    }
}

fn not_found(message: String) -> Response {
    (StatusCode::NOT_FOUND, Json(json!({ "error": message }))).into_response()
}

fn distinct<T: Ord>(items: impl Iterator<Item = T>) -> Vec<T> {
    items.collect::<BTreeSet<_>>().into_iter().collect()
}

impl AppState {
    fn for_make<'a>(&'a self, make: &'a str) -> impl Iterator<Item = &'a Vehicle> + 'a {
        self.catalogue
            .iter()
            .filter(move |v| v.make.eq_ignore_ascii_case(make))
    }
}

async fn makes(State(state): State<AppState>) -> Response {
    let makes = distinct(state.catalogue.iter().map(|v| v.make.clone()));
    let cookie = format!("session={}; Path=/", Uuid::new_v4());
    ([(header::SET_COOKIE, cookie)], Json(makes)).into_response()
}

async fn models(State(state): State<AppState>, Path(make): Path<String>) -> Response {
    let models = distinct(state.for_make(&make).map(|v| v.model.clone()));
    if models.is_empty() {
        return not_found(format!("unknown make: {make}"));
    }
    Json(models).into_response()
}

async fn models_for_year(
    State(state): State<AppState>,
    Path((make, year)): Path<(String, u32)>,
) -> Response {
    let models = distinct(
        state
            .for_make(&make)
            .filter(|v| v.year == year)
            .map(|v| v.model.clone()),
    );
    if models.is_empty() {
        return not_found(format!("no models for {make} in {year}"));
    }
    Json(models).into_response()
}

async fn years(State(state): State<AppState>, Path(make): Path<String>) -> Response {
    let years = distinct(state.for_make(&make).map(|v| v.year));
    if years.is_empty() {
        return not_found(format!("unknown make: {make}"));
    }
    Json(years).into_response()
}

async fn years_for_model(
    State(state): State<AppState>,
    Path((make, model)): Path<(String, String)>,
) -> Response {
    let years = distinct(
        state
            .for_make(&make)
            .filter(|v| v.model.eq_ignore_ascii_case(&model))
            .map(|v| v.year),
    );
    if years.is_empty() {
        return not_found(format!("unknown model: {make} {model}"));
    }
    Json(years).into_response()
}

async fn variants(
    State(state): State<AppState>,
    Path((make, model, year)): Path<(String, String, u32)>,
) -> Response {
    let variants = distinct(
        state
            .for_make(&make)
            .filter(|v| v.model.eq_ignore_ascii_case(&model) && v.year == year)
            .map(|v| v.variant.clone()),
    );
    if variants.is_empty() {
        return not_found(format!("no variants for {make} {model} {year}"));
    }
    Json(variants).into_response()
}

async fn report(
    State(state): State<AppState>,
    Path((make, model, variant, year, mileage)): Path<(String, String, String, u32, u64)>,
) -> Response {
    let found = state.for_make(&make).find(|v| {
        v.model.eq_ignore_ascii_case(&model)
            && v.variant.eq_ignore_ascii_case(&variant)
            && v.year == year
    });
    let Some(vehicle) = found else {
        return not_found(format!("no vehicle {make} {model} {variant} {year}"));
    };
    Json(valuation(vehicle, mileage)).into_response()
}

/// Ten cents off retail per mile; trade-in is 85% of retail.
pub fn valuation(vehicle: &Vehicle, mileage: u64) -> Report {
    let retail_value = vehicle.list_price.saturating_sub(mileage / 10);
    Report {
        make: vehicle.make.clone(),
        model: vehicle.model.clone(),
        variant: vehicle.variant.clone(),
        year: vehicle.year,
        mileage,
        retail_value,
        trade_value: retail_value * 85 / 100,
    }
}

async fn status() -> StatusCode {
    StatusCode::NO_CONTENT
}

async fn empty() -> (StatusCode, &'static str) {
    (StatusCode::OK, "")
}

async fn padding(Path(size): Path<usize>) -> String {
    "x".repeat(size)
}

async fn echo(method: Method, uri: Uri, headers: HeaderMap, body: String) -> Json<Value> {
    let headers: serde_json::Map<String, Value> = headers
        .iter()
        .map(|(name, value)| {
            (
                name.as_str().to_string(),
                Value::String(String::from_utf8_lossy(value.as_bytes()).into_owned()),
            )
        })
        .collect();
    Json(json!({
        "method": method.as_str(),
        "path": uri.path(),
        "query": uri.query(),
        "headers": headers,
        "body": body,
    }))
}
