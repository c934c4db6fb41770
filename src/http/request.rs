use std::collections::BTreeMap;
use std::fmt::{self, Display};
use std::fs;
use std::path::Path;

use serde::Deserialize;
use serde_json::Value;

use crate::auth::BasicCredentials;
use crate::error::RequestError;

/// One HTTP call as described by a request file.
///
/// Optional parts are `None` when missing or empty in the file, so the
/// executor only has to check for presence.
#[derive(Debug, Clone, PartialEq)]
pub struct RequestDescriptor {
    pub method: String,
    pub url: String,
    pub header: Option<BTreeMap<String, String>>,
    pub auth: Option<BasicCredentials>,
    pub data: Option<Value>,
    pub params: Option<serde_json::Map<String, Value>>,
}

/// The on-disk shape. Anything outside these keys is ignored.
#[derive(Debug, Deserialize)]
struct RequestFile {
    method: String,
    url: String,
    #[serde(default)]
    header: Option<BTreeMap<String, String>>,
    #[serde(default)]
    auth: Option<BasicCredentials>,
    #[serde(default)]
    data: Option<Value>,
    #[serde(default)]
    params: Option<serde_json::Map<String, Value>>,
}

impl RequestDescriptor {
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, RequestError> {
        let path = path.as_ref();
        let raw = fs::read_to_string(path).map_err(|source| RequestError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse(&raw).map_err(|source| RequestError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn from_json_str(raw: &str) -> Result<Self, serde_json::Error> {
        Self::parse(raw)
    }

    fn parse(raw: &str) -> Result<Self, serde_json::Error> {
        let file: RequestFile = serde_json::from_str(raw)?;
        Ok(file.into_descriptor())
    }
}

impl RequestFile {
    fn into_descriptor(self) -> RequestDescriptor {
        RequestDescriptor {
            method: self.method,
            url: self.url,
            header: self.header.filter(|header| !header.is_empty()),
            auth: self.auth.filter(|auth| !auth.is_empty()),
            data: self.data.filter(is_truthy),
            params: self.params.filter(|params| !params.is_empty()),
        }
    }
}

/// Empty bodies (`{}`, `[]`, `""`, `0`, `false`, `null`) are not sent.
fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(flag) => *flag,
        Value::Number(number) => number.as_f64().is_some_and(|n| n != 0.0),
        Value::String(text) => !text.is_empty(),
        Value::Array(items) => !items.is_empty(),
        Value::Object(map) => !map.is_empty(),
    }
}

impl Display for RequestDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "method: {}\nurl: {}", self.method, self.url)?;
        if let Some(header) = &self.header {
            write!(f, "\nheader: {}", to_json(header))?;
        }
        if let Some(auth) = &self.auth {
            write!(f, "\nauth: {auth}")?;
        }
        if let Some(data) = &self.data {
            write!(f, "\ndata: {data}")?;
        }
        if let Some(params) = &self.params {
            write!(f, "\nparams: {}", to_json(params))?;
        }
        Ok(())
    }
}

fn to_json(value: &impl serde::Serialize) -> String {
    serde_json::to_string(value).unwrap_or_else(|_| "<unprintable>".to_string())
}
