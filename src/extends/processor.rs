use std::ops::Deref;
use crossbeam::channel::{unbounded, Receiver, Sender};
use tokio::sync::mpsc::{unbounded_channel, UnboundedReceiver};
use crate::bases::*;

/// Owns a [`State`] and applies messages to it in arrival order.
///
/// Messages arrive either through [`Processor::emitter`] clones, queued until
/// [`Processor::process`] drains them, or directly through
/// [`Processor::apply`]. Every message that changes the state is forwarded
/// to the output channel, when one is open.
#[derive(Debug)]
pub struct Processor<S: State> {
    state: S,
    emitter: Emitter<S::Message>,
    input_rx: UnboundedReceiver<Packet<S::Message>>,
    output_tx: Option<Sender<Packet<S::Message>>>,
}

impl<S: State> Deref for Processor<S> {
    type Target = S;
    fn deref(&self) -> &Self::Target { &self.state }
}

impl<S: State> Default for Processor<S> {
    fn default() -> Self { Self::new(S::default()) }
}

impl<S: State> Processor<S> {
    pub fn state(&self) -> &S { &self.state }
    pub fn emitter(&self) -> &Emitter<S::Message> { &self.emitter }

    pub fn new(state: S) -> Self {
        let (input_tx, input_rx) = unbounded_channel();

        Self {
            state,
            emitter: Emitter::new(input_tx),
            input_rx,
            output_tx: None,
        }
    }

    /// Opens a fresh output channel, replacing any previous one.
    pub fn output_rx(&mut self) -> Receiver<Packet<S::Message>> {
        let (output_tx, output_rx) = unbounded();
        self.output_tx = Some(output_tx);
        output_rx
    }

    pub fn snapshot(&self) -> Result<Payload> {
        self.state.to_payload()
    }

    /// Applies `message` right away, ahead of anything still queued.
    pub fn apply(&mut self, message: S::Message) -> bool {
        let header = self.emitter.header();
        self.commit(Packet::new(header, message))
    }

    /// Drains every queued packet and returns how many changed the state.
    pub fn process(&mut self) -> usize {
        let mut applied = 0;
        while let Ok(packet) = self.input_rx.try_recv() {
            if self.commit(packet) { applied += 1 }
        }
        applied
    }

    /// Waits for the next queued packet and applies it.
    ///
    /// The processor holds a sender of its own, so the queue stays open for
    /// as long as the processor lives and this waits until something is
    /// emitted.
    pub async fn process_async(&mut self) -> Result<bool> {
        match self.input_rx.recv().await {
            Some(packet) => Ok(self.commit(packet)),
            None => Err(Error::Channel("input_rx channel closed".into())),
        }
    }

    fn commit(&mut self, packet: Packet<S::Message>) -> bool {
        if !self.state.apply(packet.message()) {
            log::trace!("#{} ignored {:?}", packet.header().seq(), packet.message());
            return false;
        }

        log::trace!("#{} applied {:?}", packet.header().seq(), packet.message());

        if let Some(output_tx) = &self.output_tx {
            if let Err(err) = output_tx.send(packet) {
                log::warn!("output observer dropped: {err}");
                self.output_tx = None;
            }
        }
        true
    }

    /// Moves the processor onto a tokio task that applies packets as they
    /// arrive, until `stop` resolves. The task hands the processor back.
    #[cfg(feature = "tokio_rt")]
    pub fn start<F>(self, stop: F) -> tokio::task::JoinHandle<Self>
    where F: 'static + std::future::Future<Output = ()> + Send {
        let mut processor = self;
        tokio::spawn(async move {
            tokio::pin!(stop);
            loop {
                tokio::select! {
                    _ = &mut stop => break,
                    result = processor.process_async() => {
                        if let Err(err) = result {
                            log::error!("{err}");
                            break;
                        }
                    }
                }
            }
            processor
        })
    }
}

#[cfg(test)]
mod tests {
    use serde::{Deserialize, Serialize};
    use super::*;

    #[derive(Debug, Default, Clone, Serialize, Deserialize)]
    struct Sum {
        total: i64,
    }

    #[derive(Debug, Clone)]
    enum SumMessage {
        Add(i64),
        Nop,
    }

    impl State for Sum {
        type Message = SumMessage;

        fn apply(&mut self, message: &SumMessage) -> bool {
            match message {
                SumMessage::Add(n) => {
                    self.total += n;
                    true
                },
                SumMessage::Nop => false,
            }
        }
    }

    #[test]
    fn process_drains_queue_in_order() -> Result<()> {
        let mut processor = Processor::<Sum>::default();
        let output_rx = processor.output_rx();
        let emitter = processor.emitter().clone();

        emitter.emit(SumMessage::Add(1))?;
        emitter.emit(SumMessage::Nop)?;
        emitter.emit(SumMessage::Add(2))?;

        assert_eq!(processor.total, 0, "queued only");
        assert_eq!(processor.process(), 2);
        assert_eq!(processor.total, 3);

        let seqs: Vec<_> = output_rx.try_iter().map(|packet| packet.header().seq()).collect();
        assert_eq!(seqs, vec![0, 2]);
        Ok(())
    }

    #[test]
    fn apply_skips_queue() -> Result<()> {
        let mut processor = Processor::<Sum>::default();

        processor.emitter().emit(SumMessage::Add(10))?;
        assert!(processor.apply(SumMessage::Add(1)));
        assert_eq!(processor.total, 1);

        processor.process();
        assert_eq!(processor.total, 11);

        let snapshot: Sum = processor.snapshot()?.to_state()?;
        assert_eq!(snapshot.total, 11);
        Ok(())
    }

    #[test]
    fn dropped_observer_is_forgotten() {
        let mut processor = Processor::<Sum>::default();
        drop(processor.output_rx());

        assert!(processor.apply(SumMessage::Add(1)));
        assert!(processor.output_tx.is_none());
    }

    #[cfg(feature = "tokio_rt")]
    #[tokio::test]
    async fn started_processor_hands_state_back() -> Result<()> {
        let processor = Processor::<Sum>::default();
        let emitter = processor.emitter().clone();
        let (stop_tx, stop_rx) = tokio::sync::oneshot::channel::<()>();

        let task = processor.start(async move { let _ = stop_rx.await; });

        emitter.emit(SumMessage::Add(4))?;
        emitter.emit(SumMessage::Add(5))?;
        tokio::time::sleep(std::time::Duration::from_millis(20)).await;

        stop_tx.send(()).ok();
        let processor = task.await.map_err(|err| Error::Runtime(err.to_string()))?;

        assert_eq!(processor.total, 9);
        Ok(())
    }
}
