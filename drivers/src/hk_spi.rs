/*++

Licensed under the Apache-2.0 license.

File Name:

    hk_spi.rs

Abstract:

    File contains API for the housekeeping SPI.

--*/

use caravel_registers::sys::{self, RegisterBlock};
use ureg::{Mmio, RealMmio};

/// Housekeeping SPI. Shares pads with user I/O, so tests that own those pads
/// switch it off.
pub struct HousekeepingSpi<TMmio: Mmio = RealMmio<'static>> {
    regs: RegisterBlock<TMmio>,
}

impl HousekeepingSpi {
    pub fn new() -> Self {
        Self {
            regs: RegisterBlock::sys_reg(),
        }
    }
}

impl Default for HousekeepingSpi {
    fn default() -> Self {
        Self::new()
    }
}

impl<TMmio: Mmio> HousekeepingSpi<TMmio> {
    pub fn new_with_mmio(mmio: TMmio) -> Self {
        Self {
            regs: unsafe { RegisterBlock::new_with_mmio(sys::SYS_ADDR as *mut u32, mmio) },
        }
    }

    pub fn enable(&mut self, enable: bool) {
        self.regs.hkspi_disable().write(|w| w.disable(!enable));
    }
}
