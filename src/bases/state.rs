use std::fmt::Debug;
use serde::{de::DeserializeOwned, Serialize};
use super::*;

/// State owned by a [`Processor`](crate::extends::Processor).
///
/// A state changes only through [`State::apply`], one message at a time.
pub trait State: 'static + Debug + Default + Clone + Send + Sync + Serialize + DeserializeOwned {
    type Message: Message;

    /// Applies `message` and returns whether the state changed.
    fn apply(&mut self, message: &Self::Message) -> bool;

    fn to_payload(&self) -> Result<Payload> {
        Payload::from_state(self)
    }

    fn from_payload(payload: &Payload) -> Result<Self> {
        payload.to_state()
    }
}
