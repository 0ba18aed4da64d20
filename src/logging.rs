//! Console logging.
//!
//! Log lines always go to stderr: stdout carries command output and, in
//! `mcp` mode, the protocol stream.
//!
//! The filter comes from `RULEBASED_LOG` (an `EnvFilter` directive such as
//! `debug` or `rulebased=trace`). Without it, setting `DEBUG` enables debug
//! output; otherwise the level is `info`.

use tracing_subscriber::EnvFilter;

/// Environment variable holding the log filter directive.
pub const LOG_ENV: &str = "RULEBASED_LOG";

fn default_directive() -> &'static str {
    if std::env::var_os("DEBUG").is_some() {
        "debug"
    } else {
        "info"
    }
}

/// Install the global subscriber. Later calls are no-ops.
pub fn init_logging() {
    let filter = EnvFilter::try_from_env(LOG_ENV)
        .unwrap_or_else(|_| EnvFilter::new(default_directive()));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_ansi(atty::is(atty::Stream::Stderr))
        .with_target(false)
        .without_time()
        .compact()
        .try_init();
}
