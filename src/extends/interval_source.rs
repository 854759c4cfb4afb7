use std::{sync::{atomic::{AtomicBool, Ordering}, Arc}, time::Duration};
use tokio::{runtime::Handle, time::{interval_at, Instant, MissedTickBehavior}};
use crate::bases::{Error, Result};
use super::*;

/// A tick source backed by `tokio::time::interval` on a spawned task.
#[derive(Debug, Clone)]
pub struct IntervalSource {
    handle: Handle,
}

impl IntervalSource {
    pub fn new(handle: Handle) -> Self {
        Self { handle }
    }

    /// Uses the tokio runtime the caller is running on.
    pub fn current() -> Result<Self> {
        Handle::try_current()
        .map(Self::new)
        .map_err(|err| Error::Runtime(format!("IntervalSource needs a tokio runtime -> Err({err})")))
    }
}

impl TickSource for IntervalSource {
    fn arm(&self, period: Duration, on_tick: OnTick) -> Disposer {
        let disarmed = Arc::new(AtomicBool::new(false));
        let disarmed_clone = disarmed.clone();

        let Some(start) = Instant::now().checked_add(period) else {
            log::warn!("interval period {period:?} never elapses, nothing armed");
            return Disposer::new(disarmed, || {});
        };

        let task = self.handle.spawn(async move {
            let mut interval = interval_at(start, period);
            interval.set_missed_tick_behavior(MissedTickBehavior::Burst);

            loop {
                interval.tick().await;

                if disarmed_clone.load(Ordering::SeqCst) { break }

                if let Err(err) = on_tick() {
                    log::debug!("interval tick consumer gone: {err}");
                    break;
                }
            }
        });

        log::debug!("interval armed every {period:?}");

        let abort = task.abort_handle();
        Disposer::new(disarmed, move || {
            abort.abort();
            log::debug!("interval released");
        })
    }
}
