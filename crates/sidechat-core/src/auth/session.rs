//! In-process session

use super::AuthProvider;
use crate::error::Result;
use crate::types::{AuthState, CurrentUser};
use async_trait::async_trait;
use parking_lot::RwLock;
use tracing::info;

/// Session held in memory
pub struct LocalSession {
    state: RwLock<AuthState>,
}

impl LocalSession {
    pub fn signed_in(user: CurrentUser) -> Self {
        Self {
            state: RwLock::new(AuthState::signed_in(user)),
        }
    }

    pub fn signed_out() -> Self {
        Self {
            state: RwLock::new(AuthState::default()),
        }
    }

    /// A session that has not resolved its user yet
    pub fn loading() -> Self {
        Self {
            state: RwLock::new(AuthState::loading()),
        }
    }

    pub fn sign_in(&self, user: CurrentUser) {
        info!("Signed in as {}", user.email);
        *self.state.write() = AuthState::signed_in(user);
    }
}

#[async_trait]
impl AuthProvider for LocalSession {
    fn state(&self) -> AuthState {
        self.state.read().clone()
    }

    async fn sign_out(&self) -> Result<()> {
        let mut state = self.state.write();
        if let Some(user) = state.user.take() {
            info!("Signed out {}", user.email);
        }
        state.loading = false;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_sign_out_clears_user() {
        let session = LocalSession::signed_in(CurrentUser::new("a@x.com"));
        assert_eq!(session.state().user.unwrap().email, "a@x.com");

        session.sign_out().await.unwrap();
        let state = session.state();
        assert!(state.user.is_none());
        assert!(!state.loading);
    }

    #[test]
    fn test_loading_then_sign_in() {
        let session = LocalSession::loading();
        assert!(session.state().loading);

        session.sign_in(CurrentUser::new("a@x.com").with_photo("https://img/a.png"));
        let state = session.state();
        assert!(!state.loading);
        assert_eq!(
            state.user.unwrap().photo_url.as_deref(),
            Some("https://img/a.png")
        );
    }

    #[test]
    fn test_signed_out() {
        let session = LocalSession::signed_out();
        assert_eq!(session.state(), AuthState::default());
    }
}
