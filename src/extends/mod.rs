mod processor;
mod tick_source;
mod manual_source;
#[cfg(feature = "tokio_rt")]
mod interval_source;

pub use self::{
    processor::*,
    tick_source::*,
    manual_source::*,
};

#[cfg(feature = "tokio_rt")]
pub use self::interval_source::*;
