//! # CLI
//!
//! `getman-cli -f request.json` loads one request file, echoes it, sends it
//! and prints the outcome:
//!
//! ```text
//! method: GET
//! url: https://reqres.in/api/users
//! status code: 200
//! response:
//! {"page":1, ...}
//! ```

use std::path::PathBuf;

use clap::Parser;

use crate::http::response::HttpResponse;

/// Run a single HTTP request described in a JSON file.
#[derive(Debug, Parser)]
#[command(version, about)]
pub struct Cli {
    /// JSON file path
    #[arg(short = 'f', long = "file-name", value_name = "PATH")]
    pub file_name: PathBuf,

    /// Log more to stderr (-v info, -vv debug)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,
}

/// Status line followed by the body for 200-300, the reason phrase otherwise.
pub fn render_response(response: &HttpResponse) -> String {
    let detail = if response.is_success() {
        response.body.as_str()
    } else {
        response.reason.as_str()
    };
    format!("status code: {}\nresponse: \n{detail}", response.status)
}
