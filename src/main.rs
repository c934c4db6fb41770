use std::process;

use anyhow::Result;
use clap::Parser;
use tracing::debug;

use getman_cli::cli::{self, Cli};
use getman_cli::http::client::send;
use getman_cli::{logging, RequestDescriptor, RequestError};

fn main() -> Result<()> {
    let cli = Cli::parse();
    logging::init(cli.verbose);

    match run(&cli) {
        Ok(()) => Ok(()),
        Err(err) if err.is_input_error() => {
            eprintln!("{err}");
            process::exit(1);
        }
        Err(err) => Err(err.into()),
    }
}

fn run(cli: &Cli) -> Result<(), RequestError> {
    let descriptor = RequestDescriptor::from_json_file(&cli.file_name)?;
    debug!(file = %cli.file_name.display(), "loaded request file");
    println!("{descriptor}");

    let response = send(&descriptor)?;
    for (name, value) in &response.headers {
        debug!(%name, %value, "response header");
    }
    println!("{}", cli::render_response(&response));

    Ok(())
}
