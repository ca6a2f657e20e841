/*++

Licensed under the Apache-2.0 license.

File Name:

    bus.rs

Abstract:

    File contains the Bus trait implemented by every emulated peripheral.

--*/

use caravel_emu_types::{RvAddr, RvData, RvSize};

/// Why a wishbone access was not acknowledged.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum BusError {
    LoadAddrMisaligned,
    /// Nothing decodes the address, or the target refused the read.
    LoadAccessFault,
    StoreAddrMisaligned,
    /// Nothing decodes the address, or the target refused the write.
    StoreAccessFault,
}

impl std::fmt::Display for BusError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let msg = match self {
            BusError::LoadAddrMisaligned => "load address misaligned",
            BusError::LoadAccessFault => "load access fault",
            BusError::StoreAddrMisaligned => "store address misaligned",
            BusError::StoreAccessFault => "store access fault",
        };
        f.write_str(msg)
    }
}

impl std::error::Error for BusError {}

/// A wishbone target: the SoC interconnect, or one peripheral behind it.
/// Peripherals see addresses relative to their own base.
pub trait Bus {
    /// Read `size` bytes at `addr`, little-endian.
    fn read(&mut self, size: RvSize, addr: RvAddr) -> Result<RvData, BusError>;

    /// Write the low `size` bytes of `val` to `addr`.
    fn write(&mut self, size: RvSize, addr: RvAddr, val: RvData) -> Result<(), BusError>;

    /// Notifies peripherals of the passage of one clock cycle. The owner of
    /// the bus calls this once per cycle.
    fn poll(&mut self) {}

    /// Returns every peripheral to its power-on state.
    fn warm_reset(&mut self) {}
}
