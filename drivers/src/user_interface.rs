/*++

Licensed under the Apache-2.0 license.

File Name:

    user_interface.rs

Abstract:

    File contains API for the wishbone bridge to the user project.

--*/

use caravel_registers::wishbone::{self, RegisterBlock};
use ureg::{Mmio, RealMmio};

/// Wishbone bridge between the management core and the user project. Must be
/// enabled before any `UserSpace` access.
pub struct UserInterface<TMmio: Mmio = RealMmio<'static>> {
    regs: RegisterBlock<TMmio>,
}

impl UserInterface {
    pub fn new() -> Self {
        Self {
            regs: RegisterBlock::wishbone_reg(),
        }
    }
}

impl Default for UserInterface {
    fn default() -> Self {
        Self::new()
    }
}

impl<TMmio: Mmio> UserInterface<TMmio> {
    pub fn new_with_mmio(mmio: TMmio) -> Self {
        Self {
            regs: unsafe {
                RegisterBlock::new_with_mmio(wishbone::WISHBONE_ADDR as *mut u32, mmio)
            },
        }
    }

    pub fn enable(&mut self) {
        self.regs.wb_enable().write(|w| w.en(true));
    }

    pub fn disable(&mut self) {
        self.regs.wb_enable().write(|w| w.en(false));
    }
}
