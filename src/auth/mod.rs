//! # Authentication
//!
//! Request files may carry an `auth` object with HTTP Basic credentials:
//!
//! ```json
//! { "auth": { "username": "alice", "password": "s3cret" } }
//! ```

use std::fmt::{self, Display};

use serde::Deserialize;

/// Username/password pair sent as HTTP Basic auth.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct BasicCredentials {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: String,
}

impl BasicCredentials {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.username.is_empty() && self.password.is_empty()
    }

    pub fn apply(&self, builder: reqwest::blocking::RequestBuilder) -> reqwest::blocking::RequestBuilder {
        builder.basic_auth(&self.username, Some(&self.password))
    }
}

/// Never prints the password.
impl Display for BasicCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:******", self.username)
    }
}
