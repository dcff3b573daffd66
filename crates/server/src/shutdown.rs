//! Ctrl+C handling for the API listener, built on `CancellationToken`.
//!
//! The controller only stops the HTTP listener. The Prometheus exporter
//! installed by `observability::init_metrics` runs until the process exits.

use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

#[derive(Clone, Default)]
pub struct ShutdownController {
    token: CancellationToken,
}

impl ShutdownController {
    pub fn new() -> Self {
        Self::default()
    }

    /// A controller that cancels itself on Ctrl+C.
    ///
    /// Spawns the signal listener, so it must be called inside a runtime.
    pub fn with_ctrl_c() -> Self {
        let controller = Self::new();
        let on_signal = controller.token();

        tokio::spawn(async move {
            if let Err(e) = tokio::signal::ctrl_c().await {
                warn!("Ctrl+C handler unavailable, stop the process another way: {}", e);
                return;
            }
            info!("Ctrl+C received, stopping");
            on_signal.cancel();
        });

        controller
    }

    /// Token handed to `Server::run`; cancelling any clone stops the listener.
    pub fn token(&self) -> CancellationToken {
        self.token.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tokens_share_cancellation() {
        let controller = ShutdownController::new();
        let handed_out = controller.token();
        assert!(!controller.token().is_cancelled());

        handed_out.cancel();
        assert!(controller.token().is_cancelled());
    }

    #[tokio::test]
    async fn test_ctrl_c_controller_starts_uncancelled() {
        let controller = ShutdownController::with_ctrl_c();
        assert!(!controller.token().is_cancelled());
    }
}
