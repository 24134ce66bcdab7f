//! Signed-in user types

use serde::{Deserialize, Serialize};

/// The active identity
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CurrentUser {
    pub email: String,
    pub photo_url: Option<String>,
}

impl CurrentUser {
    pub fn new(email: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            photo_url: None,
        }
    }

    pub fn with_photo(mut self, photo_url: impl Into<String>) -> Self {
        self.photo_url = Some(photo_url.into());
        self
    }
}

/// Snapshot of the auth provider
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AuthState {
    pub user: Option<CurrentUser>,
    pub loading: bool,
}

impl AuthState {
    pub fn signed_in(user: CurrentUser) -> Self {
        Self {
            user: Some(user),
            loading: false,
        }
    }

    pub fn loading() -> Self {
        Self {
            user: None,
            loading: true,
        }
    }
}
