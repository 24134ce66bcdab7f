//! Conversation sidebar
//!
//! `Sidebar` ties the collaborators together: it mounts a live list of the
//! signed-in user's conversations, runs the new-chat flow, and exposes the
//! header, search box and rows as plain data for the host to draw.

mod creator;
mod email;
mod list;
mod traits;

pub use creator::{ConversationCreator, CreateOutcome, RejectReason};
pub use email::is_valid_email;
pub use list::{ConversationListReader, ListState};
pub use traits::{Navigator, Notifier, Prompter, RowRenderer};

#[cfg(test)]
pub use traits::{MockNavigator, MockNotifier, MockPrompter, MockRowRenderer};

use crate::auth::AuthProvider;
use crate::config::SidebarSettings;
use crate::error::{AuthError, Result};
use crate::store::DocumentStore;
use crate::types::{ConversationRow, CurrentUser};
use std::sync::Arc;
use tracing::{debug, info};

/// Collaborators handed to the sidebar
pub struct SidebarDeps {
    pub auth: Arc<dyn AuthProvider>,
    pub store: Arc<dyn DocumentStore>,
    pub prompter: Arc<dyn Prompter>,
    pub notifier: Arc<dyn Notifier>,
    pub navigator: Arc<dyn Navigator>,
}

/// Header of the sidebar
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeaderView {
    pub email: String,
    pub avatar: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SidebarBody {
    Loading,
    Rows(Vec<ConversationRow>),
}

/// Everything the host needs to draw the sidebar
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SidebarView {
    pub header: HeaderView,
    pub search_placeholder: String,
    pub search: String,
    pub body: SidebarBody,
}

static UNMOUNTED: ListState = ListState::Loading;

struct Mounted {
    user: CurrentUser,
    list: ConversationListReader,
}

pub struct Sidebar {
    deps: SidebarDeps,
    settings: SidebarSettings,
    creator: ConversationCreator,
    mounted: Option<Mounted>,
    search: String,
}

impl Sidebar {
    pub fn new(deps: SidebarDeps, settings: SidebarSettings) -> Self {
        let creator = ConversationCreator::new(deps.store.clone(), &settings);
        Self {
            deps,
            settings,
            creator,
            mounted: None,
            search: String::new(),
        }
    }

    /// Subscribe to the signed-in user's conversations
    pub fn mount(&mut self) -> Result<()> {
        let auth = self.deps.auth.state();
        if auth.loading {
            return Err(AuthError::Loading.into());
        }
        let user = auth.user.ok_or(AuthError::NotSignedIn)?;

        let list = ConversationListReader::open(self.deps.store.as_ref(), &self.settings, &user.email)?;
        info!("Sidebar mounted for {}", user.email);

        self.mounted = Some(Mounted { user, list });
        Ok(())
    }

    /// Drop the live subscription
    pub fn unmount(&mut self) {
        if let Some(mounted) = self.mounted.take() {
            info!("Sidebar unmounted for {}", mounted.user.email);
            mounted.list.close();
        }
    }

    pub fn is_mounted(&self) -> bool {
        self.mounted.is_some()
    }

    /// Apply the next store delivery to the list.
    ///
    /// Returns `false` when there is no subscription left to read from.
    pub async fn next_update(&mut self) -> Result<bool> {
        let Some(mounted) = self.mounted.as_mut() else {
            return Ok(false);
        };
        Ok(mounted.list.next().await.is_some())
    }

    /// Current list state; `Loading` when unmounted
    pub fn list_state(&self) -> &ListState {
        self.mounted
            .as_ref()
            .map(|m| m.list.state())
            .unwrap_or(&UNMOUNTED)
    }

    /// Prompt for an email and start a conversation with it
    pub async fn new_chat(&mut self) -> Result<CreateOutcome> {
        let mounted = self.mounted.as_ref().ok_or(AuthError::NotSignedIn)?;

        let input = self.deps.prompter.prompt(&self.settings.prompt_message).await;
        let outcome = self
            .creator
            .create(&mounted.user, mounted.list.state(), input.as_deref())
            .await?;

        if let CreateOutcome::Rejected(_) = outcome {
            self.deps.notifier.alert(&self.settings.invalid_email_notice).await;
        }

        Ok(outcome)
    }

    pub async fn sign_out(&mut self) -> Result<()> {
        self.deps.auth.sign_out().await?;
        self.unmount();
        Ok(())
    }

    pub fn avatar_clicked(&self) {
        debug!("Navigating to {}", self.settings.home_path);
        self.deps.navigator.push(&self.settings.home_path);
    }

    pub fn set_search(&mut self, query: impl Into<String>) {
        self.search = query.into();
    }

    pub fn search(&self) -> &str {
        &self.search
    }

    fn visible_rows(&self) -> Option<Vec<ConversationRow>> {
        let mounted = self.mounted.as_ref()?;
        if mounted.list.is_loading() {
            return None;
        }

        let needle = self.search.trim().to_lowercase();
        let rows = mounted
            .list
            .conversations()
            .iter()
            .map(|c| ConversationRow::new(c, &mounted.user))
            .filter(|row| {
                needle.is_empty()
                    || row
                        .recipient
                        .as_deref()
                        .map_or(false, |r| r.to_lowercase().contains(&needle))
            })
            .collect();
        Some(rows)
    }

    pub fn view(&self) -> SidebarView {
        let header = match &self.mounted {
            Some(m) => HeaderView {
                email: m.user.email.clone(),
                avatar: m.user.photo_url.clone(),
            },
            None => HeaderView {
                email: String::new(),
                avatar: None,
            },
        };

        SidebarView {
            header,
            search_placeholder: self.settings.search_placeholder.clone(),
            search: self.search.clone(),
            body: self
                .visible_rows()
                .map_or(SidebarBody::Loading, SidebarBody::Rows),
        }
    }

    /// Hand every visible row to `renderer`, in list order
    pub fn render(&self, renderer: &dyn RowRenderer) -> usize {
        let rows = self.visible_rows().unwrap_or_default();
        for row in &rows {
            renderer.render_row(row);
        }
        rows.len()
    }
}

impl Drop for Sidebar {
    fn drop(&mut self) {
        self.unmount();
    }
}
