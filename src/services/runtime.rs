//! Tokio Runtime Bridge
//!
//! The grid core is executor-agnostic, but the HTTP client (reqwest) requires
//! tokio. This module runs tokio futures from whatever executor drives the grid.
//!
//! ## Pattern
//!
//! ```text
//! GridController::render().await   (any executor)
//!       │
//!       ▼
//! HttpTransport::get → run_in_tokio(async { ... })
//!       │
//!       ▼
//! tokio::Runtime::spawn()
//!       │
//!       ▼
//! RemotePage returned to the grid
//! ```

use std::future::Future;
use std::sync::OnceLock;
use tokio::runtime::Runtime;

/// Global tokio runtime instance
static TOKIO_RUNTIME: OnceLock<Runtime> = OnceLock::new();

/// Get or initialize the global tokio runtime
fn get_runtime() -> &'static Runtime {
    TOKIO_RUNTIME.get_or_init(|| Runtime::new().expect("Failed to create tokio runtime"))
}

/// Execute a future in the tokio runtime and wait for the result
///
/// Used for each remote page request.
pub async fn run_in_tokio<F, T>(future: F) -> T
where
    F: Future<Output = T> + Send + 'static,
    T: Send + 'static,
{
    let handle = get_runtime().spawn(future);
    match handle.await {
        Ok(result) => result,
        Err(e) => std::panic::resume_unwind(e.into_panic()),
    }
}

/// Block on a future synchronously (command-line entry point only)
///
/// **Warning**: This blocks the current thread and must not be called from
/// inside an async context.
pub fn block_on<F, T>(future: F) -> T
where
    F: Future<Output = T>,
{
    get_runtime().block_on(future)
}
