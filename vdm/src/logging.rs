//! Log output for vdm commands.
//!
//! Progress messages go through `tracing` at `info`; `--debug` adds raw
//! subprocess output and decoded records. `RUST_LOG` overrides both.

use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Initialize the tracing subscriber.
///
/// Reads `RUST_LOG` if set, otherwise `vdm=info` (or `vdm=debug` when `debug`).
/// Output: stderr, compact format.
///
/// # Example
/// ```bash
/// RUST_LOG=vdm=trace vdm sync
/// ```
pub fn init(debug: bool) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directive(debug)));

    tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false)
                .without_time()
                .compact(),
        )
        .init();
}

fn default_directive(debug: bool) -> &'static str {
    if debug { "vdm=debug" } else { "vdm=info" }
}
