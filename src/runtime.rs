//! Async runtime the dashboard runs on.
//!
//! The core is single-threaded: one current-thread tokio runtime drives the
//! compositor loop and every fetch task.

use std::future::Future;
use std::io;

use tokio::runtime::{Builder, Runtime};

/// Builds the current-thread runtime with IO and time drivers enabled.
pub fn build() -> io::Result<Runtime> {
    Builder::new_current_thread().enable_all().build()
}

/// Drives `future` to completion on `runtime`, then shuts the runtime down
/// without waiting on blocking-pool work still in flight.
///
/// HTTP clients resolve names on the blocking pool; a plain drop of the
/// runtime would hold the process until those lookups return.
pub fn block_on_detached<F: Future>(runtime: Runtime, future: F) -> F::Output {
    let output = runtime.block_on(future);
    runtime.shutdown_background();
    output
}
