// Licensed under the Apache-2.0 license

//! Test sequences shared between the firmware images (running on the
//! management core) and the hardware model tests (running on the host).
#![cfg_attr(not(test), no_std)]

pub mod sram;
