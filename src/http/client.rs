use std::collections::BTreeMap;
use std::time::Instant;

use hyper::ext::ReasonPhrase;
use reqwest::blocking::{Client, Request, Response};
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use reqwest::redirect::Policy;
use serde_json::Value;
use tracing::{debug, info};

use crate::error::RequestError;

use super::method::HttpMethod;
use super::request::RequestDescriptor;
use super::response::HttpResponse;

const MAX_REDIRECTS: usize = 10;

/// Sends the described request and waits for the full response.
///
/// The client lives only for this call, so no connection is kept once it
/// returns. Certificates are not verified and there is no timeout.
pub fn send(descriptor: &RequestDescriptor) -> Result<HttpResponse, RequestError> {
    let client = Client::builder()
        .danger_accept_invalid_certs(true)
        .redirect(Policy::limited(MAX_REDIRECTS))
        .timeout(None)
        .build()?;

    let request = build_request(&client, descriptor)?;
    debug!(method = %request.method(), url = %request.url(), "sending request");

    let started = Instant::now();
    let response = client.execute(request)?;
    let elapsed_ms = u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX);

    let status = response.status();
    let reason = reason_phrase(&response);
    let headers = response
        .headers()
        .iter()
        .map(|(name, value)| {
            (
                name.to_string(),
                value.to_str().unwrap_or("<binary>").to_string(),
            )
        })
        .collect();
    let body = response.text()?;

    info!(
        status = status.as_u16(),
        size_bytes = body.len(),
        elapsed_ms,
        "response received"
    );

    Ok(HttpResponse {
        status: status.as_u16(),
        reason,
        headers,
        body,
    })
}

/// The phrase the server sent on the status line. hyper only records it when
/// it differs from the canonical one, so fall back to that when it is missing
/// or blank.
fn reason_phrase(response: &Response) -> String {
    let sent = response
        .extensions()
        .get::<ReasonPhrase>()
        .map(|phrase| String::from_utf8_lossy(phrase.as_bytes()).trim().to_string())
        .filter(|phrase| !phrase.is_empty());
    if let Some(phrase) = sent {
        return phrase;
    }
    response
        .status()
        .canonical_reason()
        .unwrap_or("Unknown")
        .to_string()
}

/// Builds the outbound request without touching the network.
///
/// When the descriptor has headers they are the whole header set; only the
/// Basic `Authorization` header is added on top of them. The client still
/// adds `Accept: */*` at send time unless the set has its own `Accept`.
pub fn build_request(
    client: &Client,
    descriptor: &RequestDescriptor,
) -> Result<Request, RequestError> {
    let method: HttpMethod = descriptor.method.parse()?;
    let url = reqwest::Url::parse(&descriptor.url).map_err(|e| RequestError::InvalidUrl {
        url: descriptor.url.clone(),
        reason: e.to_string(),
    })?;

    let mut req_builder = client.request(method.into(), url);

    if let Some(params) = &descriptor.params {
        req_builder = req_builder.query(&query_pairs(params)?);
    }

    if let Some(header) = &descriptor.header {
        req_builder = req_builder.headers(build_headers(header)?);
    }

    if let Some(auth) = &descriptor.auth {
        req_builder = auth.apply(req_builder);
    }

    if let Some(data) = &descriptor.data {
        req_builder = req_builder.body(data.to_string());
    }

    Ok(req_builder.build()?)
}

pub fn build_headers(input: &BTreeMap<String, String>) -> Result<HeaderMap, RequestError> {
    let mut headers = HeaderMap::new();

    for (key, value) in input {
        let header_name = HeaderName::from_bytes(key.as_bytes()).map_err(|e| {
            RequestError::InvalidHeader {
                name: key.clone(),
                reason: e.to_string(),
            }
        })?;
        let header_value = HeaderValue::from_str(value).map_err(|e| RequestError::InvalidHeader {
            name: key.clone(),
            reason: e.to_string(),
        })?;
        headers.insert(header_name, header_value);
    }

    Ok(headers)
}

/// Flattens `params` into query pairs. Lists repeat the key and nulls are
/// dropped.
fn query_pairs(params: &serde_json::Map<String, Value>) -> Result<Vec<(String, String)>, RequestError> {
    let mut pairs = Vec::new();

    for (key, value) in params {
        match value {
            Value::Array(items) => {
                for item in items {
                    if let Some(text) = scalar_text(key, item)? {
                        pairs.push((key.clone(), text));
                    }
                }
            }
            other => {
                if let Some(text) = scalar_text(key, other)? {
                    pairs.push((key.clone(), text));
                }
            }
        }
    }

    Ok(pairs)
}

fn scalar_text(key: &str, value: &Value) -> Result<Option<String>, RequestError> {
    match value {
        Value::Null => Ok(None),
        Value::String(text) => Ok(Some(text.clone())),
        Value::Bool(_) | Value::Number(_) => Ok(Some(value.to_string())),
        Value::Array(_) | Value::Object(_) => Err(RequestError::InvalidParam {
            name: key.to_string(),
        }),
    }
}
