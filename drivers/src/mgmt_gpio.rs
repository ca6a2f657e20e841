/*++

Licensed under the Apache-2.0 license.

File Name:

    mgmt_gpio.rs

Abstract:

    File contains API for the management GPIO pin.

--*/

use caravel_registers::mgmt_gpio::{self, RegisterBlock};
use ureg::{Mmio, RealMmio};

/// The management GPIO. Test firmware drives its status codes here.
pub struct ManagementGpio<TMmio: Mmio = RealMmio<'static>> {
    regs: RegisterBlock<TMmio>,
}

impl ManagementGpio {
    pub fn new() -> Self {
        Self {
            regs: RegisterBlock::mgmt_gpio_reg(),
        }
    }
}

impl Default for ManagementGpio {
    fn default() -> Self {
        Self::new()
    }
}

impl<TMmio: Mmio> ManagementGpio<TMmio> {
    pub fn new_with_mmio(mmio: TMmio) -> Self {
        Self {
            regs: unsafe {
                RegisterBlock::new_with_mmio(mgmt_gpio::MGMT_GPIO_ADDR as *mut u32, mmio)
            },
        }
    }

    /// Configure the pad as a plain output.
    pub fn output_enable(&mut self) {
        self.regs.mode1().write(|w| w.en(true));
        self.regs.mode0().write(|w| w.en(false));
        self.regs.ien().write(|w| w.en(false));
        self.regs.oe().write(|w| w.en(true));
    }

    /// Drive `value` onto the pin.
    ///
    /// # Arguments
    ///
    /// * `value` - Status value
    pub fn write(&mut self, value: u8) {
        self.regs.out().write(|_| u32::from(value));
    }

    /// Last value driven onto the pin.
    pub fn read(&self) -> u8 {
        self.regs.out().read() as u8
    }
}
