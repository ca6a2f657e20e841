/*++

Licensed under the Apache-2.0 license.

File Name:

    lib.rs

Abstract:

    File contains exports for the Caravel Emulator Peripheral library.

--*/

mod housekeeping;
mod mgmt_gpio;
mod root_bus;
mod sram;
mod user_project;
mod wishbone;

pub use housekeeping::{Housekeeping, XFER_TICKS};
pub use mgmt_gpio::{MgmtGpio, MgmtGpioCb};
pub use root_bus::{CaravelRootBus, CaravelRootBusArgs};
pub use sram::{AccessCounts, Sram};
pub use user_project::{UserProject, SRAM_COUNT};
pub use wishbone::{BridgeEnable, WishboneCtrl};
