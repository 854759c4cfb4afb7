use std::{sync::Arc, time::Duration};
use crossbeam::channel::Receiver;
use serde::{Deserialize, Serialize};
use crate::{bases::*, extends::*};
use super::*;

/// Arm generation. Each start opens a new epoch, and a tick only counts
/// when it carries the epoch of the arm that is currently running.
pub type Epoch = u64;

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CounterState {
    elapsed_ticks: u64,
    is_running: bool,
    #[serde(skip)]
    epoch: Epoch,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CounterMessage {
    Toggle,
    Tick(Epoch),
}

impl CounterState {
    pub fn elapsed_ticks(&self) -> u64 { self.elapsed_ticks }
    pub fn is_running(&self) -> bool { self.is_running }
    pub fn epoch(&self) -> Epoch { self.epoch }
}

impl State for CounterState {
    type Message = CounterMessage;

    fn apply(&mut self, message: &CounterMessage) -> bool {
        match *message {
            CounterMessage::Toggle => {
                self.is_running = !self.is_running;
                if self.is_running {
                    self.epoch = self.epoch.wrapping_add(1);
                }
                true
            },
            CounterMessage::Tick(epoch) if self.is_running && epoch == self.epoch => {
                self.elapsed_ticks = self.elapsed_ticks.saturating_add(1);
                true
            },
            CounterMessage::Tick(_) => false,
        }
    }
}

/// Counts whole tick periods while running.
///
/// Ticks from the [`TickSource`] are queued and applied by
/// [`IntervalCounter::process`]. [`IntervalCounter::toggle`] applies what is
/// already queued, flips the state and arms or disarms the source before it
/// returns, so no tick from a stopped run is ever counted.
#[derive(Debug)]
pub struct IntervalCounter {
    processor: Processor<CounterState>,
    config: CounterConfig,
    source: Box<dyn TickSource>,
    armed: Option<Disposer>,
}

impl IntervalCounter {
    pub fn config(&self) -> &CounterConfig { &self.config }
    pub fn current_state(&self) -> CounterState { *self.processor.state() }
    pub fn is_armed(&self) -> bool { self.armed.is_some() }

    pub fn new<T>(config: CounterConfig, source: T) -> Result<Self>
    where T: 'static + TickSource {
        config.validate()?;

        Ok(Self {
            processor: Processor::default(),
            config,
            source: Box::new(source),
            armed: None,
        })
    }

    pub fn elapsed(&self) -> Duration {
        let ticks = self.processor.elapsed_ticks();
        Duration::from_millis(self.config.tick_period_ms.saturating_mul(ticks))
    }

    pub fn toggle_label(&self) -> &'static str {
        if self.processor.is_running() { "Stop" } else { "Start" }
    }

    /// Observes every toggle and counted tick.
    pub fn output_rx(&mut self) -> Receiver<Packet<CounterMessage>> {
        self.processor.output_rx()
    }

    pub fn toggle(&mut self) {
        self.process();
        self.processor.apply(CounterMessage::Toggle);

        if self.processor.is_running() {
            self.arm();
        } else {
            self.disarm();
        }
    }

    /// Applies the ticks delivered so far and returns how many counted.
    pub fn process(&mut self) -> usize {
        self.processor.process()
    }

    /// Waits for the next tick and returns whether it counted.
    ///
    /// A stopped counter has no tick to wait for, so this returns
    /// `Ok(false)` right away after applying what is already queued.
    pub async fn process_async(&mut self) -> Result<bool> {
        if !self.processor.is_running() {
            self.process();
            return Ok(false);
        }
        self.processor.process_async().await
    }

    /// Applies the ticks already delivered, releases the tick source and
    /// hands back the final state.
    pub fn teardown(mut self) -> CounterState {
        self.process();
        self.disarm();
        log::debug!("teardown at {:?}", self.processor.state());
        self.current_state()
    }

    fn arm(&mut self) {
        self.disarm();

        let emitter = self.processor.emitter().clone();
        let epoch = self.processor.epoch();
        let on_tick: OnTick = Arc::new(move || emitter.emit(CounterMessage::Tick(epoch)));

        log::debug!("arm epoch {epoch} every {:?}", self.config.tick_period());
        self.armed = Some(self.source.arm(self.config.tick_period(), on_tick));
    }

    fn disarm(&mut self) {
        if let Some(mut disposer) = self.armed.take() {
            disposer.disarm();
            log::debug!("disarm epoch {}", self.processor.epoch());
        }
    }
}

impl Drop for IntervalCounter {
    fn drop(&mut self) { self.disarm() }
}

impl View for IntervalCounter {
    fn view(&self) -> String {
        format!(
            "Time: {}s\n[{}]",
            self.elapsed().as_secs_f64(),
            self.toggle_label(),
        )
    }
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;
    use super::*;

    #[derive(Debug, Clone, Copy)]
    enum Op {
        Toggle,
        Process,
        Advance(u32),
    }

    fn op() -> impl Strategy<Value = Op> {
        prop_oneof![
            Just(Op::Toggle),
            Just(Op::Process),
            (0u32..5).prop_map(Op::Advance),
        ]
    }

    proptest! {
        #[test]
        fn counts_only_ticks_delivered_while_running(
            ops in prop::collection::vec(op(), 0..64),
            end_with_teardown in any::<bool>(),
        ) {
            let source = ManualSource::default();
            let mut counter = IntervalCounter::new(CounterConfig::default(), source.clone()).unwrap();
            let mut expected = 0u64;

            for op in ops {
                match op {
                    Op::Toggle => counter.toggle(),
                    Op::Process => { counter.process(); },
                    Op::Advance(ticks) => {
                        let delivered = source.advance(Duration::from_secs(ticks.into())) as u64;
                        if counter.current_state().is_running() {
                            prop_assert_eq!(delivered, u64::from(ticks));
                            expected += delivered;
                        } else {
                            prop_assert_eq!(delivered, 0);
                        }
                    },
                }
                prop_assert!(source.armed() <= 1);
            }

            let state = if end_with_teardown {
                counter.teardown()
            } else {
                counter.process();
                counter.current_state()
            };
            prop_assert_eq!(state.elapsed_ticks(), expected);
        }
    }

    #[test]
    fn stale_epoch_never_counts() {
        let mut state = CounterState::default();

        assert!(!state.apply(&CounterMessage::Tick(0)), "stopped");

        state.apply(&CounterMessage::Toggle);
        let first = state.epoch();
        assert!(state.apply(&CounterMessage::Tick(first)));

        state.apply(&CounterMessage::Toggle);
        state.apply(&CounterMessage::Toggle);
        assert!(!state.apply(&CounterMessage::Tick(first)), "previous run");
        assert!(state.apply(&CounterMessage::Tick(state.epoch())));

        assert_eq!(state.elapsed_ticks(), 2);
    }

    #[test]
    fn view_follows_tick_period() -> Result<()> {
        let source = ManualSource::default();
        let config = CounterConfig::default().with_tick_period(Duration::from_millis(500));
        let mut counter = IntervalCounter::new(config, source.clone())?;

        assert_eq!(counter.view(), "Time: 0s\n[Start]");

        counter.toggle();
        source.advance(Duration::from_millis(1_500));
        counter.process();

        assert_eq!(counter.view(), "Time: 1.5s\n[Stop]");
        Ok(())
    }
}
