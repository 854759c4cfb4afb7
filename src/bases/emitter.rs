use std::sync::{atomic::{AtomicU64, Ordering}, Arc};
use super::*;

/// Stamps messages with a [`Header`] and hands them to a [`Reporter`].
///
/// Clones share one sequence counter, so packets from every clone
/// carry distinct, increasing `seq` values.
#[derive(Debug, Clone)]
pub struct Emitter<M: Message> {
    reporter: Reporter<M>,
    seq: Arc<AtomicU64>,
}

impl<M: Message> Emitter<M> {
    pub fn reporter(&self) -> &Reporter<M> { &self.reporter }

    pub fn new<R: Into<Reporter<M>>>(reporter: R) -> Self {
        Self {
            reporter: reporter.into(),
            seq: Arc::default(),
        }
    }

    pub fn new_callback<F>(callback: F) -> Self
    where F: 'static + Fn(Packet<M>) + Send + Sync {
        Self::new(Reporter::new_callback(callback))
    }

    pub fn header(&self) -> Header {
        Header::new(self.seq.fetch_add(1, Ordering::Relaxed))
    }

    pub fn emit(&self, message: M) -> Result<()> {
        self.reporter.report(Packet::new(self.header(), message))
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;
    use super::*;

    #[test]
    fn clones_share_sequence() -> Result<()> {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let seen_clone = seen.clone();

        let emitter = Emitter::new_callback(move |packet: Packet<&'static str>| {
            seen_clone.lock().unwrap().push((packet.header().seq(), *packet.message()));
        });

        emitter.emit("a")?;
        emitter.clone().emit("b")?;
        emitter.emit("c")?;

        assert_eq!(*seen.lock().unwrap(), vec![(0, "a"), (1, "b"), (2, "c")]);
        Ok(())
    }
}
