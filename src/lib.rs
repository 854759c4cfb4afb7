// Copyright 2024 frand-nano
// SPDX-License-Identifier: MIT
//
// This software is licensed under the MIT License.
// For more details, see the LICENSE file in the project root.

pub use prelude::*;

pub mod bases;
pub mod extends;
pub mod components;

pub mod prelude {
    pub use crate::{
        bases::{
            State, Message, Packet, Header, Payload,
            Reporter, Emitter, Error, Result,
            CounterConfig,
        },
        extends::{
            Processor, TickSource, OnTick, Disposer, ManualSource,
        },
        components::{
            View,
            IntervalCounter, CounterState, CounterMessage,
            Button,
            LoginForm, LoginError, Credentials,
            Navigation, Location,
            Fetcher, MockFetcher, MockResponse, fetch_state,
            UserProfile, User,
        },
    };

    #[cfg(feature = "tokio_rt")]
    pub use crate::extends::IntervalSource;
}
