use std::sync::Arc;

use tokio::sync::Mutex;

use crate::context::SessionContext;
use crate::error::RemoteError;
use crate::remote::{Identity, RemoteStore};

/// Thin wrapper over the remote auth sub-interface that keeps the shared
/// session context in step with sign-in state.
///
/// Auth failures are user-visible: callers surface the `RemoteError::Auth`
/// message directly.
#[derive(Clone)]
pub struct AuthService {
    remote: Arc<dyn RemoteStore>,
    context: Arc<Mutex<SessionContext>>,
}

impl AuthService {
    #[must_use]
    pub fn new(remote: Arc<dyn RemoteStore>, context: Arc<Mutex<SessionContext>>) -> Self {
        Self { remote, context }
    }

    /// Register a new account; the backend confirms out of band.
    ///
    /// # Errors
    ///
    /// Returns `RemoteError` when the backend rejects the sign-up.
    pub async fn sign_up(&self, email: &str, password: &str) -> Result<(), RemoteError> {
        self.remote.sign_up(email, password).await
    }

    /// Sign in and publish the identity to the session context.
    ///
    /// # Errors
    ///
    /// Returns `RemoteError` when the credentials are rejected.
    pub async fn sign_in(&self, email: &str, password: &str) -> Result<Identity, RemoteError> {
        let identity = self.remote.sign_in(email, password).await?;
        self.context.lock().await.set_identity(Some(identity.clone()));
        Ok(identity)
    }

    /// Sign out the current identity, if any, and clear the context.
    ///
    /// # Errors
    ///
    /// Returns `RemoteError` when the backend rejects the sign-out; the
    /// local identity is cleared regardless.
    pub async fn sign_out(&self) -> Result<(), RemoteError> {
        let identity = { self.context.lock().await.identity().cloned() };
        let result = match identity {
            Some(identity) => self.remote.sign_out(&identity).await,
            None => Ok(()),
        };
        self.context.lock().await.set_identity(None);
        result
    }

    /// Restore an existing session into the context (startup).
    ///
    /// # Errors
    ///
    /// Returns `RemoteError` when the session state cannot be read.
    pub async fn restore_session(&self) -> Result<Option<Identity>, RemoteError> {
        let identity = self.remote.get_session().await?;
        self.context.lock().await.set_identity(identity.clone());
        Ok(identity)
    }
}
