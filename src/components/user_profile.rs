use std::{any::type_name_of_val, sync::Arc};
use futures::{future::BoxFuture, FutureExt};
use serde::{Deserialize, Serialize};
use crate::{bases::*, extends::Processor};
use super::*;

pub const USER_URL: &str = "/api/user";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub name: String,
    pub email: String,
}

#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserProfileState {
    pub user: Option<User>,
    pub loading: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UserProfileMessage {
    Loading,
    Loaded(User),
    Failed,
}

impl State for UserProfileState {
    type Message = UserProfileMessage;

    fn apply(&mut self, message: &UserProfileMessage) -> bool {
        use UserProfileMessage::*;

        match message {
            Loading if !self.loading => self.loading = true,
            Loading => return false,
            Loaded(user) => {
                self.user = Some(user.clone());
                self.loading = false;
            },
            Failed => self.loading = false,
        }
        true
    }
}

/// Loads the current user on demand.
///
/// [`UserProfile::load`] starts a fetch and [`UserProfile::settle`] waits for
/// it; in between the profile shows as loading and further loads are ignored.
pub struct UserProfile {
    processor: Processor<UserProfileState>,
    fetcher: Arc<dyn Fetcher>,
    pending: Option<BoxFuture<'static, Result<User>>>,
}

impl std::fmt::Debug for UserProfile {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UserProfile")
        .field("processor", &self.processor)
        .field("fetcher", &type_name_of_val(&self.fetcher))
        .field("pending", &self.pending.is_some())
        .finish()
    }
}

impl UserProfile {
    pub fn state(&self) -> &UserProfileState { self.processor.state() }
    pub fn user(&self) -> Option<&User> { self.processor.user.as_ref() }
    pub fn is_loading(&self) -> bool { self.processor.loading }

    pub fn new<F>(fetcher: F) -> Self
    where F: 'static + Fetcher {
        Self {
            processor: Processor::default(),
            fetcher: Arc::new(fetcher),
            pending: None,
        }
    }

    pub fn button_label(&self) -> &'static str {
        if self.is_loading() { "Loading..." } else { "Load User" }
    }

    /// Starts fetching the user. Returns `false` while a load is in flight.
    pub fn load(&mut self) -> bool {
        if !self.processor.apply(UserProfileMessage::Loading) {
            return false;
        }

        let fetcher = self.fetcher.clone();
        self.pending = Some(async move {
            fetch_state::<User, _>(&fetcher, USER_URL).await
        }.boxed());
        true
    }

    /// Waits for the load in flight, if any, and applies its outcome.
    pub async fn settle(&mut self) {
        let Some(pending) = self.pending.take() else { return };

        match pending.await {
            Ok(user) => {
                log::debug!("loaded user {}", user.name);
                self.processor.apply(UserProfileMessage::Loaded(user));
            },
            Err(err) => {
                log::error!("Failed to fetch user: {err}");
                self.processor.apply(UserProfileMessage::Failed);
            },
        }
    }

    pub async fn load_and_settle(&mut self) {
        self.load();
        self.settle().await;
    }
}

impl View for UserProfile {
    fn view(&self) -> String {
        let button = if self.is_loading() {
            format!("[{}] (disabled)", self.button_label())
        } else {
            format!("[{}]", self.button_label())
        };

        match self.user() {
            Some(user) => format!("{button}\nName: {}\nEmail: {}", user.name, user.email),
            None => button,
        }
    }
}
