//! URL assembly for API requests.
//!
//! # Design
//! The builder is a pure string function. Resource segments and query values
//! are inserted verbatim; the only encoding applied is turning literal spaces
//! into `%20`. Callers that need `&`, `=` or `/` inside a value must escape it
//! themselves.

/// Build the full request URL for `resource_path`.
///
/// With `port_in_path` the port is written after `base_path`
/// (`https://host:8443/lookup/make`); otherwise the URL carries no explicit
/// port. `query_params` are appended in the order given.
pub fn build_path(
    base_path: &str,
    resource_path: &str,
    port: u16,
    port_in_path: bool,
    query_params: &[(String, String)],
) -> String {
    let mut url = if port_in_path {
        format!("{base_path}:{port}/{resource_path}")
    } else {
        format!("{base_path}/{resource_path}")
    };

    if !query_params.is_empty() {
        url.push('?');
        url.push_str(&query_string(query_params));
    }

    url.replace(' ', "%20")
}

fn query_string(params: &[(String, String)]) -> String {
    params
        .iter()
        .map(|(key, value)| format!("{key}={value}"))
        .collect::<Vec<_>>()
        .join("&")
}
