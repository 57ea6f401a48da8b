//! Shared handler state

use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tutor_application::DispatchQueryUseCase;

#[derive(Clone)]
pub struct AppState {
    pub dispatcher: Arc<DispatchQueryUseCase>,
    /// Cancelled on server shutdown; each request runs under a child token.
    pub shutdown: CancellationToken,
}

impl AppState {
    pub fn new(dispatcher: Arc<DispatchQueryUseCase>) -> Self {
        Self {
            dispatcher,
            shutdown: CancellationToken::new(),
        }
    }

    pub fn with_shutdown(mut self, shutdown: CancellationToken) -> Self {
        self.shutdown = shutdown;
        self
    }
}
