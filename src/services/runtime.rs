//! Tokio Runtime Bridge
//!
//! The UI loop is synchronous; HTTP fetches run on a shared multi-thread
//! tokio runtime and report back over channels.
//!
//! ## Pattern
//!
//! ```text
//! UI loop (sync)
//!       │
//!       └── spawn_named_on(handle, fetch)  ──► ServiceEvent over crossbeam
//! ```

use crate::error::Result;
use std::future::Future;
use std::sync::{Mutex, OnceLock, PoisonError};
use tokio::runtime::{Builder, Handle, Runtime};

/// Global tokio runtime instance
static TOKIO_RUNTIME: OnceLock<Runtime> = OnceLock::new();

/// Guards one-time runtime construction
static INIT_LOCK: Mutex<()> = Mutex::new(());

/// Get or initialize the global tokio runtime
fn get_runtime() -> Result<&'static Runtime> {
    if let Some(runtime) = TOKIO_RUNTIME.get() {
        return Ok(runtime);
    }
    let _guard = INIT_LOCK.lock().unwrap_or_else(PoisonError::into_inner);
    if let Some(runtime) = TOKIO_RUNTIME.get() {
        return Ok(runtime);
    }
    let runtime = Builder::new_multi_thread()
        .thread_name("budget-view-io")
        .enable_all()
        .build()?;
    Ok(TOKIO_RUNTIME.get_or_init(|| runtime))
}

/// Get a handle to the tokio runtime
pub fn runtime_handle() -> Result<Handle> {
    Ok(get_runtime()?.handle().clone())
}

/// Spawn a detached task on `handle` with a name (for debugging)
pub fn spawn_named_on<F>(handle: &Handle, name: &'static str, future: F)
where
    F: Future<Output = ()> + Send + 'static,
{
    tracing::debug!(task = name, "Spawning tokio task");
    handle.spawn(async move {
        future.await;
        tracing::debug!(task = name, "Tokio task completed");
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicBool, Ordering};

    #[test]
    fn test_spawn_named_on_runs_task() {
        let flag = Arc::new(AtomicBool::new(false));
        let flag_clone = flag.clone();
        let (tx, rx) = crossbeam_channel::bounded(1);

        let handle = runtime_handle().expect("runtime");
        spawn_named_on(&handle, "test", async move {
            flag_clone.store(true, Ordering::SeqCst);
            let _ = tx.send(());
        });

        rx.recv_timeout(std::time::Duration::from_secs(5))
            .expect("task finished");
        assert!(flag.load(Ordering::SeqCst));
    }
}
