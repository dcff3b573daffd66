//! Server lifecycle traits
//!
//! [`Server`] is the one thing a hosting binary needs to know about a
//! listener: run it until a token is cancelled. [`ServerExt`] adds the two
//! ways the service is actually started, in the background for tests and in
//! the foreground with Ctrl+C handling for `ncif serve`.

use async_trait::async_trait;
use std::net::SocketAddr;
use tokio_util::sync::CancellationToken;

use crate::error::Result;

#[async_trait]
pub trait Server: Send + Sync + 'static {
    /// Name used in log lines.
    fn name(&self) -> &str;

    /// The bound address while running; `None` before bind and after shutdown.
    fn address(&self) -> Option<SocketAddr>;

    fn is_running(&self) -> bool;

    /// Bind, serve until `shutdown` is cancelled, then drain in-flight
    /// requests and return `Ok(())`.
    async fn run(&self, shutdown: CancellationToken) -> Result<()>;
}

/// Convenience methods, implemented for every [`Server`].
pub trait ServerExt: Server + Sized {
    /// Run on a new task. Cancel the returned token to stop it.
    fn spawn(self) -> (tokio::task::JoinHandle<Result<()>>, CancellationToken) {
        let stop = CancellationToken::new();
        let handle = tokio::spawn({
            let stop = stop.clone();
            async move { self.run(stop).await }
        });
        (handle, stop)
    }

    /// Run in the foreground until Ctrl+C.
    fn run_with_ctrl_c(self) -> impl std::future::Future<Output = Result<()>> + Send {
        async move {
            let shutdown = crate::shutdown::ShutdownController::with_ctrl_c();
            self.run(shutdown.token()).await
        }
    }
}

impl<T: Server + Sized> ServerExt for T {}
