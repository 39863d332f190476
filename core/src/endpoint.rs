//! Resource path templates of the AcuityData v1 API.
//!
//! # Design
//! Optional trailing arguments select a different template, so each lookup is
//! an enum variant with `Option` fields rather than a set of overloaded
//! functions. Segments are interpolated verbatim.

use std::fmt;

use crate::http::HttpMethod;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Endpoint {
    /// `lookup/make`
    Make,
    /// `lookup/model/{make}` or, with a year, `lookup/model2/{make}/{year}`.
    Model { make: String, year: Option<u32> },
    /// `lookup/year2/{make}` or, with a model, `lookup/year/{make}/{model}`.
    Year { make: String, model: Option<String> },
    /// `lookup/variant/{make}/{model}/{year}`
    Variant { make: String, model: String, year: u32 },
    /// `report/{make}/{model}/{variant}/{year}/{mileage}`
    Report {
        make: String,
        model: String,
        variant: String,
        year: u32,
        mileage: u64,
    },
}

impl Endpoint {
    pub fn method(&self) -> HttpMethod {
        HttpMethod::Get
    }

    pub fn resource_path(&self) -> String {
        match self {
            Endpoint::Make => "lookup/make".to_string(),
            Endpoint::Model { make, year: None } => format!("lookup/model/{make}"),
            Endpoint::Model {
                make,
                year: Some(year),
            } => format!("lookup/model2/{make}/{year}"),
            Endpoint::Year { make, model: None } => format!("lookup/year2/{make}"),
            Endpoint::Year {
                make,
                model: Some(model),
            } => format!("lookup/year/{make}/{model}"),
            Endpoint::Variant { make, model, year } => {
                format!("lookup/variant/{make}/{model}/{year}")
            }
            Endpoint::Report {
                make,
                model,
                variant,
                year,
                mileage,
            } => format!("report/{make}/{model}/{variant}/{year}/{mileage}"),
        }
    }
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.method(), self.resource_path())
    }
}
