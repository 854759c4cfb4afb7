use std::sync::{Arc, Mutex, MutexGuard};
use futures::{future::{ready, BoxFuture}, FutureExt};
use rustc_hash::FxHashMap;
use serde::{de::DeserializeOwned, Serialize};
use crate::bases::*;

/// Fetches the body behind a URL as a CBOR [`Payload`].
pub trait Fetcher: Send + Sync {
    fn fetch(&self, url: &str) -> BoxFuture<'static, Result<Payload>>;
}

impl<F: Fetcher + ?Sized> Fetcher for Arc<F> {
    fn fetch(&self, url: &str) -> BoxFuture<'static, Result<Payload>> {
        (**self).fetch(url)
    }
}

pub async fn fetch_state<T, F>(fetcher: &F, url: &str) -> Result<T>
where T: DeserializeOwned, F: Fetcher + ?Sized {
    fetcher.fetch(url).await?.to_state()
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MockResponse {
    Body(Payload),
    Fail(String),
}

impl MockResponse {
    pub fn state<S: Serialize>(state: &S) -> Result<Self> {
        Payload::from_state(state).map(Self::Body)
    }

    pub fn fail(message: impl Into<String>) -> Self {
        Self::Fail(message.into())
    }
}

/// Answers fetches from a handler table owned by one test.
///
/// A URL without a handler fails, so a test never reaches a real network
/// by accident. Clones share the table and the request log.
#[derive(Debug, Clone, Default)]
pub struct MockFetcher {
    handlers: Arc<Mutex<FxHashMap<String, MockResponse>>>,
    requests: Arc<Mutex<Vec<String>>>,
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|err| err.into_inner())
}

impl MockFetcher {
    pub fn use_handler(&self, url: impl Into<String>, response: MockResponse) -> &Self {
        lock(&self.handlers).insert(url.into(), response);
        self
    }

    pub fn reset_handlers(&self) {
        lock(&self.handlers).clear();
    }

    /// URLs requested so far, in order.
    pub fn requests(&self) -> Vec<String> {
        lock(&self.requests).clone()
    }
}

impl Fetcher for MockFetcher {
    fn fetch(&self, url: &str) -> BoxFuture<'static, Result<Payload>> {
        lock(&self.requests).push(url.to_string());

        let result = match lock(&self.handlers).get(url) {
            Some(MockResponse::Body(payload)) => Ok(payload.clone()),
            Some(MockResponse::Fail(message)) => Err(Error::fetch(url, message)),
            None => Err(Error::fetch(url, "no handler")),
        };

        ready(result).boxed()
    }
}
