// Licensed under the Apache-2.0 license

use std::cell::RefCell;

use caravel_emu_bus::Bus;
use caravel_emu_types::RvSize;
use ureg::{Uint, UintType};

fn rvsize<T: Uint>() -> RvSize {
    match T::TYPE {
        UintType::U8 => RvSize::Byte,
        UintType::U16 => RvSize::HalfWord,
        UintType::U32 => RvSize::Word,
    }
}

/// An MMIO implementation that reads and writes to a `caravel_emu_bus::Bus`.
pub struct BusMmio<TBus: Bus> {
    bus: RefCell<TBus>,
}
impl<TBus: Bus> BusMmio<TBus> {
    pub fn new(bus: TBus) -> Self {
        Self {
            bus: RefCell::new(bus),
        }
    }
    pub fn into_inner(self) -> TBus {
        self.bus.into_inner()
    }
}
impl<TBus: Bus> ureg::Mmio for BusMmio<TBus> {
    /// Loads from address `src` on the bus and returns the value.
    ///
    /// # Panics
    ///
    /// This function panics if the bus faults.
    ///
    /// # Safety
    ///
    /// As the pointer isn't read from, this Mmio implementation isn't actually
    /// unsafe.
    unsafe fn read_volatile<T: Uint>(&self, src: *const T) -> T {
        let addr = src as usize as u32;
        match self.bus.borrow_mut().read(rvsize::<T>(), addr) {
            Ok(val) => T::from_u32(val),
            Err(e) => panic!("Bus fault reading 0x{addr:08x}: {e}"),
        }
    }

    /// Stores `src` to address `dst` on the bus.
    ///
    /// # Panics
    ///
    /// This function panics if the bus faults.
    ///
    /// # Safety
    ///
    /// As the pointer isn't written to, this Mmio implementation isn't actually
    /// unsafe.
    unsafe fn write_volatile<T: Uint>(&self, dst: *mut T, src: T) {
        let addr = dst as usize as u32;
        if let Err(e) = self
            .bus
            .borrow_mut()
            .write(rvsize::<T>(), addr, src.to_u32())
        {
            panic!("Bus fault writing 0x{addr:08x}: {e}");
        }
    }
}
