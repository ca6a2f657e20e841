/*++

Licensed under the Apache-2.0 license.

File Name:

    lib.rs

Abstract:

    File contains start-up code and macros for Caravel test firmware.

--*/
#![no_std]

pub use caravel_drivers::halt;
use caravel_drivers::ManagementGpio;
use caravel_test_harness_types::STATUS_FIRMWARE_PANIC;

#[cfg(feature = "riscv")]
core::arch::global_asm!(include_str!("start.S"));

/// Declares `main` and the panic handler of a test firmware image.
///
/// `$entry` is called once; the core halts when it returns.
#[macro_export]
macro_rules! test_firmware {
    ($entry:path) => {
        #[panic_handler]
        pub fn panic(_info: &core::panic::PanicInfo) -> ! {
            $crate::report_panic()
        }

        #[no_mangle]
        pub extern "C" fn main() {
            $entry();
            $crate::halt();
        }
    };
}

/// Drive the panic status onto the management GPIO and stop.
pub fn report_panic() -> ! {
    let mut status = ManagementGpio::new();
    status.output_enable();
    status.write(STATUS_FIRMWARE_PANIC);
    halt()
}
