/*++

Licensed under the Apache-2.0 license.

File Name:

    user_project.rs

Abstract:

    File contains the user project: three SRAM instances behind the wishbone
    bridge.

--*/

use crate::{AccessCounts, BridgeEnable, Sram};
use caravel_emu_bus::{Bus, BusError};
use caravel_emu_types::{RvAddr, RvData, RvSize};
use caravel_hw_model_types::SramFault;

/// Number of SRAM instances in the user project.
pub const SRAM_COUNT: usize = 3;

pub struct UserProject {
    srams: [Sram; SRAM_COUNT],
    bridge: BridgeEnable,
}

impl UserProject {
    pub fn new(bridge: BridgeEnable) -> Self {
        Self {
            srams: [Sram::new(), Sram::new(), Sram::new()],
            bridge,
        }
    }

    /// Maps a user-space offset to (instance, offset within instance).
    fn decode(offset: RvAddr) -> Option<(usize, RvAddr)> {
        let index = (offset / Sram::SIZE) as usize;
        (index < SRAM_COUNT).then_some((index, offset % Sram::SIZE))
    }

    pub fn sram(&self, index: usize) -> Option<&Sram> {
        self.srams.get(index)
    }

    /// Attach a fault; `offset` is relative to the start of user space.
    ///
    /// Returns `false` if `offset` is not backed by an SRAM.
    pub fn inject_fault(&mut self, offset: RvAddr, fault: SramFault) -> bool {
        match Self::decode(offset) {
            Some((index, word)) => {
                self.srams[index].inject_fault(word, fault);
                true
            }
            None => false,
        }
    }

    pub fn access_counts(&self, offset: RvAddr) -> Option<AccessCounts> {
        let (index, word) = Self::decode(offset)?;
        self.srams[index].access_counts(word)
    }
}

impl Bus for UserProject {
    fn read(&mut self, size: RvSize, addr: RvAddr) -> Result<RvData, BusError> {
        if !self.bridge.get() {
            Err(BusError::LoadAccessFault)?
        }
        let (index, offset) = Self::decode(addr).ok_or(BusError::LoadAccessFault)?;
        self.srams[index].read(size, offset)
    }

    fn write(&mut self, size: RvSize, addr: RvAddr, val: RvData) -> Result<(), BusError> {
        if !self.bridge.get() {
            Err(BusError::StoreAccessFault)?
        }
        let (index, offset) = Self::decode(addr).ok_or(BusError::StoreAccessFault)?;
        self.srams[index].write(size, offset, val)
    }

    fn warm_reset(&mut self) {
        for sram in self.srams.iter_mut() {
            sram.warm_reset();
        }
    }
}
