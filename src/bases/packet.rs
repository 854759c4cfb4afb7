use std::{io::Cursor, time::Instant};
use serde::{de::DeserializeOwned, Serialize};
use super::*;

pub type Seq = u64;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Header {
    seq: Seq,
    instant: Instant,
}

#[derive(Debug, Clone)]
pub struct Packet<M: Message> {
    header: Header,
    message: M,
}

/// CBOR encoded bytes of a state or a fetched body.
#[derive(Default, Debug, Clone, PartialEq, Eq)]
pub struct Payload(Box<[u8]>);

impl Header {
    pub fn seq(&self) -> Seq { self.seq }
    pub fn instant(&self) -> Instant { self.instant }

    pub fn new(seq: Seq) -> Self {
        Self {
            seq,
            instant: Instant::now(),
        }
    }
}

impl<M: Message> Packet<M> {
    pub fn header(&self) -> &Header { &self.header }
    pub fn message(&self) -> &M { &self.message }
    pub fn into_message(self) -> M { self.message }

    pub fn new(header: Header, message: M) -> Self {
        Self {
            header,
            message,
        }
    }
}

impl Payload {
    pub fn as_bytes(&self) -> &[u8] { &self.0 }

    pub fn from_state<S: Serialize + ?Sized>(state: &S) -> Result<Self> {
        let mut buffer = Vec::new();

        ciborium::into_writer(state, &mut buffer)
        .map_err(|err| Error::Payload(format!("serialize into CBOR -> Err({err})")))?;

        Ok(Self(buffer.into_boxed_slice()))
    }

    pub fn to_state<S: DeserializeOwned>(&self) -> Result<S> {
        ciborium::from_reader(Cursor::new(&self.0[..]))
        .map_err(|err| Error::Payload(format!(
            "deserialize CBOR of {} bytes -> Err({err})", self.0.len(),
        )))
    }
}

impl From<Vec<u8>> for Payload {
    fn from(bytes: Vec<u8>) -> Self { Self(bytes.into_boxed_slice()) }
}
