//! # Core Actor Traits

use tokio::sync::oneshot;

use crate::error::ProxyResult;

/// Reply address captured with every request
pub type CommandResponder<T> = oneshot::Sender<ProxyResult<T>>;

/// Base trait for the proxy's actors
///
/// ## Lifecycle
///
/// - `started()`: called before the processing loop is spawned (default: no-op)
/// - `stopped()`: called once the loop has been asked to stop (default: no-op)
pub trait ProxyActor: Send + 'static {
    /// Actor name for logging
    fn name(&self) -> &'static str;

    /// # Errors
    ///
    /// An error prevents the actor from starting.
    fn started(&mut self) -> ProxyResult<()> {
        Ok(())
    }

    /// # Errors
    ///
    /// Errors are logged by the caller but do not stop other actors from shutting down.
    fn stopped(&mut self) -> ProxyResult<()> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct TestActor {
        starts: u32,
    }

    impl ProxyActor for TestActor {
        fn name(&self) -> &'static str {
            "TestActor"
        }

        fn started(&mut self) -> ProxyResult<()> {
            self.starts += 1;
            Ok(())
        }
    }

    #[test]
    fn test_default_hooks() {
        let mut actor = TestActor { starts: 0 };
        actor.started().unwrap();
        assert!(actor.stopped().is_ok());
        assert_eq!(actor.starts, 1);
        assert_eq!(actor.name(), "TestActor");
    }

    #[tokio::test]
    async fn test_responder_delivers_result() {
        let (tx, rx) = oneshot::channel::<ProxyResult<u8>>();
        let responder: CommandResponder<u8> = tx;
        responder.send(Ok(7)).unwrap();
        assert_eq!(rx.await.unwrap().unwrap(), 7);
    }
}
