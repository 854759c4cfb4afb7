mod state;
mod message;
mod packet;
mod reporter;
mod emitter;
mod result;
mod config;

pub use self::{
    state::*,
    message::*,
    packet::*,
    reporter::*,
    emitter::*,
    result::*,
    config::*,
};
