// Licensed under the Apache-2.0 license

//! Helpers for unit tests of buses and the models built on them.

mod log;

pub use log::Log;
