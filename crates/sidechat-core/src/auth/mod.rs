//! Authentication boundary
//!
//! The sidebar only needs to know who is signed in and how to sign them
//! out. `AuthProvider` is that contract; `LocalSession` is an in-process
//! implementation used by the host application and tests.

mod session;

pub use session::LocalSession;

use crate::error::Result;
use crate::types::AuthState;
use async_trait::async_trait;

/// Source of the signed-in user
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AuthProvider: Send + Sync {
    /// Current user (if any) and whether the session is still resolving
    fn state(&self) -> AuthState;

    /// End the session
    async fn sign_out(&self) -> Result<()>;
}
