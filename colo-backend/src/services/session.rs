//! Session bootstrapper
//!
//! Establishes the service's session with the identity provider once at
//! start, then follows auth-state change events for the rest of its
//! lifetime. `start` is idempotent: a guard flag makes sure the initial
//! fetch happens at most once even when re-invoked. `shutdown` (or Drop)
//! stops the event listener.
//!
//! Failure handling per the session contract:
//! - invalid-refresh-token errors force a sign-out and clear the state
//! - any other error is kept as a visible error string; an existing
//!   session, if any, is left untouched

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use tokio::sync::{broadcast, watch};
use tokio::task::JoinHandle;
use tracing::warn;

use colo_core::types::{AuthChange, Session};

use crate::auth::SessionSource;

pub struct SessionBootstrapper<S: SessionSource> {
    source: Arc<S>,
    started: AtomicBool,
    state_tx: Arc<watch::Sender<Option<Session>>>,
    state_rx: watch::Receiver<Option<Session>>,
    last_error: Mutex<Option<String>>,
    listener: Mutex<Option<JoinHandle<()>>>,
}

impl<S: SessionSource + 'static> SessionBootstrapper<S> {
    pub fn new(source: Arc<S>) -> Self {
        let (state_tx, state_rx) = watch::channel(None);
        Self {
            source,
            started: AtomicBool::new(false),
            state_tx: Arc::new(state_tx),
            state_rx,
            last_error: Mutex::new(None),
            listener: Mutex::new(None),
        }
    }

    /// Observe the current session.
    pub fn watch(&self) -> watch::Receiver<Option<Session>> {
        self.state_rx.clone()
    }

    /// The last session error, when one was kept rather than acted on.
    pub fn last_error(&self) -> Option<String> {
        self.last_error.lock().ok().and_then(|g| g.clone())
    }

    /// Fetch the initial session and start following auth-state changes.
    pub async fn start(&self) {
        if self.started.swap(true, Ordering::SeqCst) {
            return;
        }

        match self.source.current_session().await {
            Ok(session) => {
                let _ = self.state_tx.send(session);
            }
            Err(err) if err.is_invalid_refresh() => {
                warn!(error = %err, "refresh token rejected, forcing sign-out");
                if let Err(sign_out_err) = self.source.sign_out().await {
                    warn!(error = %sign_out_err, "sign-out after rejected refresh failed");
                }
                let _ = self.state_tx.send(None);
            }
            Err(err) => {
                if let Ok(mut guard) = self.last_error.lock() {
                    *guard = Some(err.to_string());
                }
            }
        }

        let mut events = self.source.subscribe();
        let state_tx = Arc::clone(&self.state_tx);
        let handle = tokio::spawn(async move {
            loop {
                match events.recv().await {
                    Ok(AuthChange::SignedIn(session))
                    | Ok(AuthChange::TokenRefreshed(session)) => {
                        let _ = state_tx.send(Some(session));
                    }
                    Ok(AuthChange::SignedOut) => {
                        let _ = state_tx.send(None);
                    }
                    Err(broadcast::error::RecvError::Lagged(skipped)) => {
                        warn!(skipped, "auth event stream lagged");
                    }
                    Err(broadcast::error::RecvError::Closed) => break,
                }
            }
        });
        if let Ok(mut guard) = self.listener.lock() {
            *guard = Some(handle);
        }
    }

    /// Stop following auth-state changes.
    pub fn shutdown(&self) {
        if let Ok(mut guard) = self.listener.lock() {
            if let Some(handle) = guard.take() {
                handle.abort();
            }
        }
    }
}

impl<S: SessionSource> Drop for SessionBootstrapper<S> {
    fn drop(&mut self) {
        if let Ok(mut guard) = self.listener.lock() {
            if let Some(handle) = guard.take() {
                handle.abort();
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::sync::atomic::AtomicUsize;

    use colo_core::types::Principal;

    use crate::error::{BackendError, BackendResult};

    enum FetchOutcome {
        Session,
        NoSession,
        InvalidRefresh,
        OtherError,
    }

    struct FakeSource {
        outcome: FetchOutcome,
        fetches: AtomicUsize,
        sign_outs: AtomicUsize,
        events: broadcast::Sender<AuthChange>,
    }

    impl FakeSource {
        fn new(outcome: FetchOutcome) -> Self {
            let (events, _) = broadcast::channel(8);
            Self {
                outcome,
                fetches: AtomicUsize::new(0),
                sign_outs: AtomicUsize::new(0),
                events,
            }
        }

        fn session(id: &str) -> Session {
            Session {
                access_token: "jeton".to_string(),
                refresh_token: Some("refresh".to_string()),
                expires_at: None,
                principal: Principal::new(id, None),
            }
        }
    }

    #[async_trait]
    impl SessionSource for FakeSource {
        async fn current_session(&self) -> BackendResult<Option<Session>> {
            self.fetches.fetch_add(1, Ordering::SeqCst);
            match self.outcome {
                FetchOutcome::Session => Ok(Some(Self::session("ext-1"))),
                FetchOutcome::NoSession => Ok(None),
                FetchOutcome::InvalidRefresh => Err(BackendError::Upstream {
                    status: 400,
                    code: Some("invalid_grant".to_string()),
                    message: "Invalid Refresh Token".to_string(),
                }),
                FetchOutcome::OtherError => Err(BackendError::Upstream {
                    status: 503,
                    code: None,
                    message: "indisponible".to_string(),
                }),
            }
        }

        async fn sign_out(&self) -> BackendResult<()> {
            self.sign_outs.fetch_add(1, Ordering::SeqCst);
            let _ = self.events.send(AuthChange::SignedOut);
            Ok(())
        }

        fn subscribe(&self) -> broadcast::Receiver<AuthChange> {
            self.events.subscribe()
        }
    }

    #[tokio::test]
    async fn test_double_start_fetches_once() {
        let source = Arc::new(FakeSource::new(FetchOutcome::Session));
        let bootstrapper = SessionBootstrapper::new(Arc::clone(&source));

        bootstrapper.start().await;
        bootstrapper.start().await;

        assert_eq!(source.fetches.load(Ordering::SeqCst), 1);
        assert!(bootstrapper.watch().borrow().is_some());
    }

    #[tokio::test]
    async fn test_invalid_refresh_forces_sign_out() {
        let source = Arc::new(FakeSource::new(FetchOutcome::InvalidRefresh));
        let bootstrapper = SessionBootstrapper::new(Arc::clone(&source));

        bootstrapper.start().await;

        assert_eq!(source.sign_outs.load(Ordering::SeqCst), 1);
        assert!(bootstrapper.watch().borrow().is_none());
        assert!(bootstrapper.last_error().is_none());
    }

    #[tokio::test]
    async fn test_other_error_is_kept_visible() {
        let source = Arc::new(FakeSource::new(FetchOutcome::OtherError));
        let bootstrapper = SessionBootstrapper::new(Arc::clone(&source));

        bootstrapper.start().await;

        assert_eq!(source.sign_outs.load(Ordering::SeqCst), 0);
        let error = bootstrapper.last_error().expect("error string kept");
        assert!(error.contains("indisponible"));
    }

    #[tokio::test]
    async fn test_follows_auth_events() {
        let source = Arc::new(FakeSource::new(FetchOutcome::NoSession));
        let bootstrapper = SessionBootstrapper::new(Arc::clone(&source));
        bootstrapper.start().await;

        let mut watch_rx = bootstrapper.watch();
        source
            .events
            .send(AuthChange::SignedIn(FakeSource::session("ext-2")))
            .unwrap();
        watch_rx.changed().await.unwrap();
        assert_eq!(
            watch_rx.borrow().as_ref().map(|s| s.principal.id.clone()),
            Some("ext-2".to_string())
        );

        source.events.send(AuthChange::SignedOut).unwrap();
        watch_rx.changed().await.unwrap();
        assert!(watch_rx.borrow().is_none());

        bootstrapper.shutdown();
    }
}
