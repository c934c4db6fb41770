//! Run one HTTP request described by a JSON file.
//!
//! A request file is loaded into a [`RequestDescriptor`], sent once with
//! [`http::client::send`], and the result rendered by
//! [`cli::render_response`].

pub mod auth;
pub mod cli;
pub mod error;
pub mod http;
pub mod logging;

pub use error::RequestError;
pub use http::request::RequestDescriptor;
pub use http::response::HttpResponse;
