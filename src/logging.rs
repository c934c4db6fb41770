use std::io::IsTerminal;

use tracing_subscriber::EnvFilter;

/// Transport and TLS crates stay quiet no matter how verbose we are. With
/// certificate checks disabled they have nothing useful to say.
const QUIET_TARGETS: &str = "rustls=off,hyper=off,hyper_util=off,reqwest=error";

/// Installs the stderr subscriber. Safe to call more than once; later calls
/// are ignored.
pub fn init(verbosity: u8) {
    let _ = tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_ansi(std::io::stderr().is_terminal())
        .with_env_filter(filter(verbosity))
        .with_target(false)
        .with_level(true)
        .compact()
        .try_init();
}

fn filter(verbosity: u8) -> EnvFilter {
    let level = match verbosity {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    EnvFilter::new(directives(level))
}

fn directives(level: &str) -> String {
    format!("getman_cli={level},{QUIET_TARGETS}")
}
