/*++

Licensed under the Apache-2.0 license.

File Name:

    gpio.rs

Abstract:

    File contains API for configuring the user I/O pads.

--*/

use crate::{CaravelError, CaravelResult};
use bitflags::bitflags;
use caravel_registers::housekeeping::{self, RegisterBlock};
use caravel_registers::MPRJ_IO_COUNT;
use ureg::{Mmio, RealMmio};

bitflags! {
    /// Bits of a pad configuration word.
    pub struct PadConfig: u32 {
        const MGMT_ENABLE = 1 << 0;
        const OUTPUT_DISABLE = 1 << 1;
        const HOLD_OVERRIDE = 1 << 2;
        const INPUT_DISABLE = 1 << 3;
        const MODE_SELECT = 1 << 4;
        const ANALOG_ENABLE = 1 << 5;
        const ANALOG_SELECT = 1 << 6;
        const ANALOG_POLARITY = 1 << 7;
        const SLOW_SLEW = 1 << 8;
        const TRIPOINT_SELECT = 1 << 9;
        const DIGITAL_MODE_0 = 1 << 10;
        const DIGITAL_MODE_1 = 1 << 11;
        const DIGITAL_MODE_2 = 1 << 12;
    }
}

/// Pad modes understood by the Caravel GPIO control blocks.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
#[repr(u32)]
pub enum GpioMode {
    MgmtStdInputNopull = 0x0403,
    MgmtStdInputPulldown = 0x0c01,
    MgmtStdInputPullup = 0x0801,
    MgmtStdOutput = 0x1809,
    MgmtStdBidirectional = 0x1801,
    MgmtStdAnalog = 0x000b,
    UserStdInputNopull = 0x0402,
    UserStdInputPulldown = 0x0c00,
    UserStdInputPullup = 0x0800,
    UserStdOutput = 0x1808,
    UserStdBidirectional = 0x1800,
    UserStdOutMonitored = 0x1802,
    UserStdAnalog = 0x000a,
}

impl GpioMode {
    pub fn config(self) -> PadConfig {
        PadConfig::from_bits_truncate(self as u32)
    }

    /// Whether the pad is controlled by the management core rather than the
    /// user project.
    pub fn is_management(self) -> bool {
        self.config().contains(PadConfig::MGMT_ENABLE)
    }
}

impl From<GpioMode> for u32 {
    fn from(mode: GpioMode) -> u32 {
        mode as u32
    }
}

/// The user I/O pads `mprj_io[0..38]`.
pub struct Gpios<TMmio: Mmio = RealMmio<'static>> {
    regs: RegisterBlock<TMmio>,
}

impl Gpios {
    pub fn new() -> Self {
        Self {
            regs: RegisterBlock::housekeeping_reg(),
        }
    }
}

impl Default for Gpios {
    fn default() -> Self {
        Self::new()
    }
}

impl<TMmio: Mmio> Gpios<TMmio> {
    pub fn new_with_mmio(mmio: TMmio) -> Self {
        Self {
            regs: unsafe {
                RegisterBlock::new_with_mmio(housekeeping::HOUSEKEEPING_ADDR as *mut u32, mmio)
            },
        }
    }

    /// Set the mode of a single pad. Takes effect after `load_configs`.
    ///
    /// # Arguments
    ///
    /// * `pin` - Pad index, `0..38`
    /// * `mode` - Pad mode
    pub fn configure(&mut self, pin: usize, mode: GpioMode) -> CaravelResult<()> {
        if pin >= MPRJ_IO_COUNT {
            return Err(CaravelError::DRIVER_GPIO_INVALID_PIN);
        }
        self.regs.mprj_io().at(pin).write(|_| mode.into());
        Ok(())
    }

    /// Set every pad to `mode`. Takes effect after `load_configs`.
    pub fn configure_all(&mut self, mode: GpioMode) {
        for reg in self.regs.mprj_io().iter() {
            reg.write(|_| mode.into());
        }
    }

    /// Shift the configuration into the pads and wait for the transfer to
    /// finish.
    pub fn load_configs(&mut self) {
        self.regs.mprj_xfer().write(|w| w.start(true));
        while self.regs.mprj_xfer().read().busy() {}
    }
}
