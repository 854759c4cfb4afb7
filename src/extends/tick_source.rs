use std::{any::type_name_of_val, fmt::Debug, sync::{atomic::{AtomicBool, Ordering}, Arc}, time::Duration};
use crate::bases::Result;

/// Called once per elapsed period while armed.
///
/// An `Err` tells the source its consumer is gone and it may stop early.
pub type OnTick = Arc<dyn Fn() -> Result<()> + Send + Sync>;

pub trait TickSource: Debug + Send + Sync {
    /// Starts delivering `on_tick` every `period` until the returned
    /// [`Disposer`] is disarmed or dropped. `period` must be non-zero.
    fn arm(&self, period: Duration, on_tick: OnTick) -> Disposer;
}

/// Releases an armed tick source.
///
/// `disarm` is synchronous and idempotent: once it returns, the source
/// delivers nothing more. Dropping the disposer disarms it.
pub struct Disposer {
    disarmed: Arc<AtomicBool>,
    release: Option<Box<dyn FnOnce() + Send>>,
}

impl Debug for Disposer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Disposer")
        .field("disarmed", &self.is_disarmed())
        .field("release", &self.release.as_ref().map(type_name_of_val))
        .finish()
    }
}

impl Disposer {
    pub fn new<F>(disarmed: Arc<AtomicBool>, release: F) -> Self
    where F: 'static + FnOnce() + Send {
        Self {
            disarmed,
            release: Some(Box::new(release)),
        }
    }

    pub fn is_disarmed(&self) -> bool { self.disarmed.load(Ordering::SeqCst) }

    pub fn disarm(&mut self) {
        self.disarmed.store(true, Ordering::SeqCst);

        if let Some(release) = self.release.take() {
            release();
        }
    }
}

impl Drop for Disposer {
    fn drop(&mut self) { self.disarm() }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::AtomicUsize;
    use super::*;

    #[test]
    fn disarm_releases_once() {
        let released = Arc::new(AtomicUsize::new(0));
        let released_clone = released.clone();

        let mut disposer = Disposer::new(Arc::default(), move || {
            released_clone.fetch_add(1, Ordering::SeqCst);
        });

        assert!(!disposer.is_disarmed());

        disposer.disarm();
        disposer.disarm();
        drop(disposer);

        assert_eq!(released.load(Ordering::SeqCst), 1);
    }
}
