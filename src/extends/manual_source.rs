use std::{sync::{atomic::{AtomicBool, Ordering}, Arc, Mutex, MutexGuard}, time::Duration};
use rustc_hash::FxHashMap;
use super::*;

type ArmId = u64;

/// A tick source driven by hand.
///
/// Time only moves when [`ManualSource::advance`] is called, which makes
/// it the clock to hand a component under test. Clones share one clock.
#[derive(Debug, Clone, Default)]
pub struct ManualSource {
    inner: Arc<Mutex<ManualClock>>,
}

#[derive(Debug, Default)]
struct ManualClock {
    now: Duration,
    next_id: ArmId,
    arms: FxHashMap<ArmId, ManualArm>,
}

struct ManualArm {
    period: Duration,
    next_due: Duration,
    disarmed: Arc<AtomicBool>,
    on_tick: OnTick,
}

impl std::fmt::Debug for ManualArm {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ManualArm")
        .field("period", &self.period)
        .field("next_due", &self.next_due)
        .field("disarmed", &self.disarmed)
        .finish()
    }
}

impl ManualSource {
    fn lock(&self) -> MutexGuard<'_, ManualClock> {
        self.inner.lock().unwrap_or_else(|err| err.into_inner())
    }

    /// Time elapsed since this clock was created.
    pub fn now(&self) -> Duration { self.lock().now }

    /// Number of arms not yet disarmed.
    pub fn armed(&self) -> usize {
        self.lock().arms.values()
        .filter(|arm| !arm.disarmed.load(Ordering::SeqCst))
        .count()
    }

    /// Moves the clock forward by `by` and delivers every tick that falls due,
    /// oldest first. Returns how many ticks were delivered.
    pub fn advance(&self, by: Duration) -> usize {
        let mut due = Vec::new();

        {
            let mut clock = self.lock();
            let target = clock.now.saturating_add(by);

            for (id, arm) in clock.arms.iter_mut() {
                if arm.period.is_zero() { continue }

                while arm.next_due <= target {
                    due.push((arm.next_due, *id, arm.disarmed.clone(), arm.on_tick.clone()));
                    match arm.next_due.checked_add(arm.period) {
                        Some(next_due) => arm.next_due = next_due,
                        // past the end of time, nothing more falls due
                        None => {
                            arm.period = Duration::ZERO;
                            break;
                        },
                    }
                }
            }

            clock.now = target;
        }

        due.sort_by_key(|(at, id, ..)| (*at, *id));

        let mut delivered = 0;
        for (at, id, disarmed, on_tick) in due {
            if disarmed.load(Ordering::SeqCst) { continue }

            match on_tick() {
                Ok(()) => delivered += 1,
                Err(err) => log::debug!("manual arm #{id} tick at {at:?} dropped: {err}"),
            }
        }
        delivered
    }
}

impl TickSource for ManualSource {
    fn arm(&self, period: Duration, on_tick: OnTick) -> Disposer {
        let disarmed = Arc::new(AtomicBool::new(false));

        let id = {
            let mut clock = self.lock();
            let id = clock.next_id;
            clock.next_id += 1;

            let next_due = clock.now.saturating_add(period);
            clock.arms.insert(id, ManualArm {
                period,
                next_due,
                disarmed: disarmed.clone(),
                on_tick,
            });
            id
        };

        log::debug!("manual arm #{id} every {period:?}");

        let inner = self.inner.clone();
        Disposer::new(disarmed, move || {
            inner.lock().unwrap_or_else(|err| err.into_inner()).arms.remove(&id);
            log::debug!("manual arm #{id} released");
        })
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::AtomicUsize;
    use crate::bases::{Error, Result};
    use super::*;

    fn counting() -> (Arc<AtomicUsize>, OnTick) {
        let count = Arc::new(AtomicUsize::new(0));
        let count_clone = count.clone();
        let on_tick: OnTick = Arc::new(move || -> Result<()> {
            count_clone.fetch_add(1, Ordering::SeqCst);
            Ok(())
        });
        (count, on_tick)
    }

    #[test]
    fn delivers_whole_periods_only() {
        let source = ManualSource::default();
        let (count, on_tick) = counting();
        let _disposer = source.arm(Duration::from_secs(1), on_tick);

        assert_eq!(source.advance(Duration::from_millis(999)), 0);
        assert_eq!(source.advance(Duration::from_millis(1)), 1);
        assert_eq!(source.advance(Duration::from_millis(2_500)), 2);
        assert_eq!(count.load(Ordering::SeqCst), 3);
        assert_eq!(source.now(), Duration::from_millis(3_500));
    }

    #[test]
    fn disposer_stops_delivery() {
        let source = ManualSource::default();
        let (count, on_tick) = counting();
        let mut disposer = source.arm(Duration::from_secs(1), on_tick);

        source.advance(Duration::from_secs(2));
        disposer.disarm();
        source.advance(Duration::from_secs(5));

        assert_eq!(count.load(Ordering::SeqCst), 2);
        assert_eq!(source.armed(), 0);
    }

    #[test]
    fn advancing_to_the_end_of_time_does_not_overflow() {
        let source = ManualSource::default();
        let (count, on_tick) = counting();
        source.advance(Duration::from_secs(1));
        let _disposer = source.arm(Duration::MAX / 2 + Duration::from_secs(1), on_tick);

        assert_eq!(source.advance(Duration::MAX), 1);
        assert_eq!(source.now(), Duration::MAX);
        assert_eq!(source.advance(Duration::MAX), 0);
        assert_eq!(count.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn failed_ticks_are_not_counted() {
        let source = ManualSource::default();
        let on_tick: OnTick = Arc::new(|| -> Result<()> {
            Err(Error::Channel("closed".into()))
        });
        let _disposer = source.arm(Duration::from_secs(1), on_tick);

        assert_eq!(source.advance(Duration::from_secs(3)), 0);
    }
}
