//! Process-wide session state.

use crate::auth::client::IdentityProvider;
use crate::error::Result;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, RwLock};

/// An authenticated session issued by the identity provider.
///
/// The provider owns the session lifecycle; this is the read reference the
/// application holds.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Session {
    /// Bearer token for authenticated calls.
    pub access_token: String,
    /// Token used by the provider to mint new access tokens.
    pub refresh_token: String,
    /// Email of the signed-in account.
    pub email: String,
    /// When the access token expires, if the provider said.
    pub expires_at: Option<DateTime<Utc>>,
}

/// Handle returned by [`SessionStore::on_change`], used to unsubscribe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

type ChangeListener = Box<dyn Fn(Option<&Session>) + Send + Sync>;

struct Inner {
    session: RwLock<Option<Session>>,
    listeners: Mutex<HashMap<u64, ChangeListener>>,
    next_listener_id: AtomicU64,
}

/// Shared holder of the current session.
///
/// Created once at startup and passed (cheaply cloned) into anything that
/// needs session access; there is no ambient global. Listeners registered
/// with [`on_change`](Self::on_change) fire on every sign-in and sign-out.
#[derive(Clone)]
pub struct SessionStore {
    inner: Arc<Inner>,
}

impl SessionStore {
    /// Creates an empty store (nobody signed in).
    pub fn new() -> Self {
        Self {
            inner: Arc::new(Inner {
                session: RwLock::new(None),
                listeners: Mutex::new(HashMap::new()),
                next_listener_id: AtomicU64::new(0),
            }),
        }
    }

    /// Returns a copy of the current session, if any.
    pub fn current(&self) -> Option<Session> {
        self.inner.session.read().expect("session lock poisoned").clone()
    }

    /// Email of the signed-in account, if any.
    pub fn email(&self) -> Option<String> {
        self.current().map(|s| s.email)
    }

    /// Returns true while a session is present.
    pub fn is_signed_in(&self) -> bool {
        self.inner.session.read().expect("session lock poisoned").is_some()
    }

    /// Installs `session` as the current one and notifies listeners.
    pub fn set(&self, session: Session) {
        *self.inner.session.write().expect("session lock poisoned") = Some(session);
        self.notify();
    }

    /// Drops the current session and notifies listeners.
    pub fn clear(&self) {
        *self.inner.session.write().expect("session lock poisoned") = None;
        self.notify();
    }

    /// Registers a callback invoked after every session change.
    pub fn on_change(
        &self,
        listener: impl Fn(Option<&Session>) + Send + Sync + 'static,
    ) -> SubscriptionId {
        let id = self.inner.next_listener_id.fetch_add(1, Ordering::Relaxed);
        self.inner
            .listeners
            .lock()
            .expect("listener lock poisoned")
            .insert(id, Box::new(listener));
        SubscriptionId(id)
    }

    /// Removes a callback registered with [`on_change`](Self::on_change).
    pub fn unsubscribe(&self, id: SubscriptionId) {
        self.inner
            .listeners
            .lock()
            .expect("listener lock poisoned")
            .remove(&id.0);
    }

    /// Signs the current session out at the provider, then clears it locally.
    ///
    /// The local session is cleared even when the provider call fails, so a
    /// dead network cannot pin a stale session.
    pub async fn sign_out(&self, provider: &dyn IdentityProvider) -> Result<()> {
        let token = self.current().map(|s| s.access_token);
        let result = match token {
            Some(token) => provider.sign_out(&token).await,
            None => Ok(()),
        };
        self.clear();
        result
    }

    fn notify(&self) {
        // Snapshot outside the listener lock so a callback may re-read state.
        let current = self.current();
        let listeners = self.inner.listeners.lock().expect("listener lock poisoned");
        for listener in listeners.values() {
            listener(current.as_ref());
        }
    }
}

impl Default for SessionStore {
    fn default() -> Self {
        Self::new()
    }
}
