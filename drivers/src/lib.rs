/*++

Licensed under the Apache-2.0 license.

File Name:

    lib.rs

Abstract:

    File contains exports for the Caravel management SoC firmware API.

--*/

#![no_std]

mod gpio;
mod hk_spi;
mod mgmt_gpio;
mod user_interface;
mod user_space;

pub use caravel_error::{CaravelError, CaravelResult};
pub use gpio::{GpioMode, Gpios, PadConfig};
pub use hk_spi::HousekeepingSpi;
pub use mgmt_gpio::ManagementGpio;
pub use user_interface::UserInterface;
pub use user_space::UserSpace;

cfg_if::cfg_if! {
    if #[cfg(feature = "riscv")] {
        /// Stall the core forever.
        #[inline(always)]
        pub fn halt() -> ! {
            loop {
                unsafe { core::arch::asm!("wfi") };
            }
        }
    } else {
        /// Stall the core forever.
        #[allow(clippy::empty_loop)]
        pub fn halt() -> ! {
            loop {}
        }
    }
}
