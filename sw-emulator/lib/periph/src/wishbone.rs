/*++

Licensed under the Apache-2.0 license.

File Name:

    wishbone.rs

Abstract:

    File contains the wishbone bridge control CSR.

--*/

use caravel_emu_bus::{Bus, BusError};
use caravel_emu_types::{RvAddr, RvData, RvSize};
use std::cell::Cell;
use std::rc::Rc;

/// Shared view of the bridge enable bit. The user project checks it on
/// every access.
#[derive(Clone, Default)]
pub struct BridgeEnable(Rc<Cell<bool>>);
impl BridgeEnable {
    pub fn get(&self) -> bool {
        self.0.get()
    }
}

pub struct WishboneCtrl {
    enable: BridgeEnable,
}

impl WishboneCtrl {
    const ADDR_WB_ENABLE: RvAddr = 0x00;

    pub fn new() -> Self {
        Self {
            enable: BridgeEnable::default(),
        }
    }

    /// Memory map size.
    pub fn mmap_size(&self) -> RvAddr {
        4
    }

    pub fn bridge(&self) -> BridgeEnable {
        self.enable.clone()
    }

    pub fn is_enabled(&self) -> bool {
        self.enable.get()
    }
}

impl Default for WishboneCtrl {
    fn default() -> Self {
        Self::new()
    }
}

impl Bus for WishboneCtrl {
    fn read(&mut self, size: RvSize, addr: RvAddr) -> Result<RvData, BusError> {
        match (size, addr) {
            (RvSize::Word, Self::ADDR_WB_ENABLE) => Ok(RvData::from(self.enable.get())),
            _ => Err(BusError::LoadAccessFault),
        }
    }

    fn write(&mut self, size: RvSize, addr: RvAddr, val: RvData) -> Result<(), BusError> {
        match (size, addr) {
            (RvSize::Word, Self::ADDR_WB_ENABLE) => self.enable.0.set(val & 1 != 0),
            _ => Err(BusError::StoreAccessFault)?,
        }
        Ok(())
    }

    fn warm_reset(&mut self) {
        self.enable.0.set(false);
    }
}
