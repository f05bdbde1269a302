//! Process-wide sign-in state, shared by every view that needs it.
//!
//! The identity provider lives outside this crate; it reports into a
//! [`Session`] through `sign_in` / `sign_out` / `fail`. Consumers hold a
//! clone of the `Session` (or a receiver from `subscribe`) instead of
//! reaching for a global.

use std::sync::Arc;

use tokio::sync::watch;

use crate::error::SessionError;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionUser {
    pub uid: String,
    pub email: Option<String>,
    pub display_name: Option<String>,
    /// Bearer credential attached to API calls.
    pub token: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionState {
    pub user: Option<SessionUser>,
    pub error: Option<String>,
    /// True until the provider has reported the initial state, and while a
    /// sign-in or sign-out is in progress.
    pub loading: bool,
}

#[derive(Debug, Clone)]
pub struct Session {
    tx: Arc<watch::Sender<SessionState>>,
}

impl Session {
    /// A session whose state is not known yet.
    pub fn new() -> Self {
        let (tx, _rx) = watch::channel(SessionState {
            user: None,
            error: None,
            loading: true,
        });
        Self { tx: Arc::new(tx) }
    }

    pub fn signed_in(user: SessionUser) -> Self {
        let session = Self::new();
        session.sign_in(user);
        session
    }

    pub fn signed_out() -> Self {
        let session = Self::new();
        session.sign_out();
        session
    }

    /// Receive every subsequent state change. Dropping the receiver
    /// unsubscribes.
    pub fn subscribe(&self) -> watch::Receiver<SessionState> {
        self.tx.subscribe()
    }

    pub fn current(&self) -> SessionState {
        self.tx.borrow().clone()
    }

    pub fn is_authenticated(&self) -> bool {
        self.tx.borrow().user.is_some()
    }

    pub fn token(&self) -> Option<String> {
        self.tx.borrow().user.as_ref().map(|u| u.token.clone())
    }

    /// Mark a sign-in or sign-out as started; clears any previous error.
    pub fn begin(&self) {
        self.tx.send_modify(|s| {
            s.loading = true;
            s.error = None;
        });
    }

    pub fn sign_in(&self, user: SessionUser) {
        tracing::info!(uid = %user.uid, "signed in");
        self.tx.send_replace(SessionState {
            user: Some(user),
            error: None,
            loading: false,
        });
    }

    pub fn sign_out(&self) {
        if self.is_authenticated() {
            tracing::info!("signed out");
        }
        self.tx.send_replace(SessionState {
            user: None,
            error: None,
            loading: false,
        });
    }

    /// The provider reported an error; the current user (if any) is kept.
    pub fn fail(&self, message: impl Into<String>) {
        let message = message.into();
        tracing::error!(%message, "authentication error");
        self.tx.send_modify(|s| {
            s.loading = false;
            s.error = Some(message);
        });
    }

    /// Route guard: the signed-in user, or an error.
    pub fn require_user(&self) -> Result<SessionUser, SessionError> {
        self.tx
            .borrow()
            .user
            .clone()
            .ok_or(SessionError::NotAuthenticated)
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}
