use std::{any::type_name_of_val, sync::Arc};
use tokio::sync::mpsc::UnboundedSender;
use super::*;

/// Where emitted packets go.
#[derive(Clone)]
pub enum Reporter<M: Message> {
    Callback(Arc<dyn Fn(Packet<M>) + Send + Sync>),
    Sender(UnboundedSender<Packet<M>>),
}

impl<M: Message> std::fmt::Debug for Reporter<M> {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            Reporter::Callback(callback) => {
                write!(f, "Reporter::Callback({})", type_name_of_val(callback))
            },
            Reporter::Sender(sender) => {
                write!(f, "Reporter::Sender({:#?})", sender)
            },
        }
    }
}

impl<M: Message> From<UnboundedSender<Packet<M>>> for Reporter<M> {
    fn from(sender: UnboundedSender<Packet<M>>) -> Self { Self::new_sender(sender) }
}

impl<M: Message> Reporter<M> {
    pub fn new_callback<F>(callback: F) -> Self
    where F: 'static + Fn(Packet<M>) + Send + Sync {
        Self::Callback(Arc::new(callback))
    }

    pub fn new_sender(sender: UnboundedSender<Packet<M>>) -> Self {
        Self::Sender(sender)
    }

    pub fn report(&self, packet: Packet<M>) -> Result<()> {
        match self {
            Reporter::Callback(callback) => {
                callback(packet);
                Ok(())
            },
            Reporter::Sender(sender) => {
                let seq = packet.header().seq();
                sender.send(packet)
                .map_err(|err| Error::Channel(format!("packet #{seq} not delivered -> Err({err})")))
            },
        }
    }
}
