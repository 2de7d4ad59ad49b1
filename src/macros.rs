//! Utility macros for common patterns across the proxy core

/// Spawn a named background task
///
/// The name is recorded in the task's span and logged at spawn time so
/// long-lived actor loops can be told apart in logs.
///
/// ```
/// # #[tokio::main(flavor = "current_thread")]
/// # async fn main() {
/// let handle = ari_proxy_core::spawn_named!("example_task", async move { 40 + 2 });
/// assert_eq!(handle.await.unwrap(), 42);
/// # }
/// ```
#[macro_export]
macro_rules! spawn_named {
    ($name:expr, $future:expr) => {{
        use tracing::Instrument as _;
        let task_name: &'static str = $name;
        tracing::debug!(task = task_name, "Spawning named task");
        tokio::spawn($future.instrument(tracing::debug_span!("task", name = task_name)))
    }};
}
