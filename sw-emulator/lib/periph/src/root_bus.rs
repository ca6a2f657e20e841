/*++

Licensed under the Apache-2.0 license.

File Name:

    root_bus.rs

Abstract:

    File contains the root Bus implementation for the Caravel management SoC.

--*/

use crate::{AccessCounts, Housekeeping, MgmtGpio, MgmtGpioCb, UserProject, WishboneCtrl};
use caravel_emu_bus::{Bus, BusError};
use caravel_emu_types::{RvAddr, RvData, RvSize};
use caravel_hw_model_types::SramFault;
use caravel_registers::{
    housekeeping::HOUSEKEEPING_ADDR, mgmt_gpio::MGMT_GPIO_ADDR, wishbone::WISHBONE_ADDR,
    USER_SPACE_ADDR, USER_SPACE_SIZE,
};

#[derive(Default)]
pub struct CaravelRootBusArgs {
    /// Receives every status value driven onto the management GPIO.
    pub mgmt_gpio_cb: MgmtGpioCb,

    /// Faults to attach to user-space SRAM words.
    pub sram_faults: Vec<SramFault>,
}

pub struct CaravelRootBus {
    pub mgmt_gpio: MgmtGpio,
    pub housekeeping: Housekeeping,
    pub wishbone: WishboneCtrl,
    pub user_project: UserProject,
}

impl CaravelRootBus {
    pub fn new(args: CaravelRootBusArgs) -> Result<Self, BusError> {
        let wishbone = WishboneCtrl::new();
        let mut user_project = UserProject::new(wishbone.bridge());
        for fault in args.sram_faults {
            let offset = fault
                .addr
                .checked_sub(USER_SPACE_ADDR)
                .ok_or(BusError::StoreAccessFault)?;
            if !user_project.inject_fault(offset, fault) {
                return Err(BusError::StoreAccessFault);
            }
        }
        Ok(Self {
            mgmt_gpio: MgmtGpio::new(args.mgmt_gpio_cb),
            housekeeping: Housekeeping::new(),
            wishbone,
            user_project,
        })
    }

    /// Access counts of the SRAM word at absolute address `addr`.
    pub fn sram_access_counts(&self, addr: RvAddr) -> Option<AccessCounts> {
        self.user_project
            .access_counts(addr.checked_sub(USER_SPACE_ADDR)?)
    }

    fn route(&mut self, addr: RvAddr) -> Option<(&mut dyn Bus, RvAddr)> {
        let within = |base: RvAddr, size: RvAddr| {
            addr.checked_sub(base).filter(|offset| *offset < size)
        };
        let dev: &mut dyn Bus;
        let offset;
        if let Some(o) = within(USER_SPACE_ADDR, USER_SPACE_SIZE) {
            dev = &mut self.user_project;
            offset = o;
        } else if let Some(o) = within(MGMT_GPIO_ADDR, self.mgmt_gpio.mmap_size()) {
            dev = &mut self.mgmt_gpio;
            offset = o;
        } else if let Some(o) = within(HOUSEKEEPING_ADDR, self.housekeeping.mmap_size()) {
            dev = &mut self.housekeeping;
            offset = o;
        } else if let Some(o) = within(WISHBONE_ADDR, self.wishbone.mmap_size()) {
            dev = &mut self.wishbone;
            offset = o;
        } else {
            return None;
        }
        Some((dev, offset))
    }
}

impl Bus for CaravelRootBus {
    fn read(&mut self, size: RvSize, addr: RvAddr) -> Result<RvData, BusError> {
        let (dev, offset) = self.route(addr).ok_or(BusError::LoadAccessFault)?;
        dev.read(size, offset)
    }

    fn write(&mut self, size: RvSize, addr: RvAddr, val: RvData) -> Result<(), BusError> {
        let (dev, offset) = self.route(addr).ok_or(BusError::StoreAccessFault)?;
        dev.write(size, offset, val)
    }

    fn poll(&mut self) {
        self.housekeeping.poll();
    }

    fn warm_reset(&mut self) {
        self.mgmt_gpio.warm_reset();
        self.housekeeping.warm_reset();
        self.wishbone.warm_reset();
        self.user_project.warm_reset();
    }
}
