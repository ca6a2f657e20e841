/*++

Licensed under the Apache-2.0 license.

File Name:

    mgmt_gpio.rs

Abstract:

    File contains the management GPIO peripheral.

--*/

use caravel_emu_bus::{Bus, BusError, ReadOnlyRegister, ReadWriteRegister, Register};
use caravel_emu_types::{RvAddr, RvData, RvSize};
use tock_registers::interfaces::{Readable, Writeable};
use tock_registers::register_bitfields;

register_bitfields! [
    u32,

    /// Single-bit enable CSR
    Enable [
        EN OFFSET(0) NUMBITS(1) [],
    ],
];

/// Called with the low 8 bits of every value driven onto the pin while the
/// output is enabled.
pub struct MgmtGpioCb(pub Box<dyn FnMut(u8)>);
impl MgmtGpioCb {
    pub fn new(f: impl FnMut(u8) + 'static) -> Self {
        Self(Box::new(f))
    }
}
impl Default for MgmtGpioCb {
    fn default() -> Self {
        Self(Box::new(|_| {}))
    }
}
impl std::fmt::Debug for MgmtGpioCb {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("MgmtGpioCb")
            .field(&"<unknown closure>")
            .finish()
    }
}

pub struct MgmtGpio {
    mode1: ReadWriteRegister<Enable::Register>,
    mode0: ReadWriteRegister<Enable::Register>,
    ien: ReadWriteRegister<Enable::Register>,
    oe: ReadWriteRegister<Enable::Register>,
    input: ReadOnlyRegister,
    out: u32,
    cb: MgmtGpioCb,
}

impl MgmtGpio {
    const ADDR_MODE1: RvAddr = 0x00;
    const ADDR_MODE0: RvAddr = 0x04;
    const ADDR_IEN: RvAddr = 0x08;
    const ADDR_OE: RvAddr = 0x0c;
    const ADDR_IN: RvAddr = 0x10;
    const ADDR_OUT: RvAddr = 0x14;

    pub fn new(cb: MgmtGpioCb) -> Self {
        Self {
            mode1: ReadWriteRegister::new(0),
            mode0: ReadWriteRegister::new(0),
            ien: ReadWriteRegister::new(0),
            oe: ReadWriteRegister::new(0),
            input: ReadOnlyRegister::new(0),
            out: 0,
            cb,
        }
    }

    /// Memory map size.
    pub fn mmap_size(&self) -> RvAddr {
        0x800
    }

    pub fn output_enabled(&self) -> bool {
        self.oe.reg.is_set(Enable::EN)
    }

    pub fn input_enabled(&self) -> bool {
        self.ien.reg.is_set(Enable::EN)
    }

    /// Value currently driven onto the pin.
    pub fn out(&self) -> u8 {
        self.out as u8
    }

    pub fn reset(&mut self) {
        for reg in [&self.mode1, &self.mode0, &self.ien, &self.oe] {
            reg.reg.set(0);
        }
        self.out = 0;
    }
}

impl Bus for MgmtGpio {
    fn read(&mut self, size: RvSize, addr: RvAddr) -> Result<RvData, BusError> {
        match addr {
            Self::ADDR_MODE1 => self.mode1.read(size),
            Self::ADDR_MODE0 => self.mode0.read(size),
            Self::ADDR_IEN => self.ien.read(size),
            Self::ADDR_OE => self.oe.read(size),
            Self::ADDR_IN => self.input.read(size),
            Self::ADDR_OUT => self.out.read(size),
            _ => Err(BusError::LoadAccessFault),
        }
    }

    fn write(&mut self, size: RvSize, addr: RvAddr, val: RvData) -> Result<(), BusError> {
        match addr {
            Self::ADDR_MODE1 => self.mode1.write(size, val),
            Self::ADDR_MODE0 => self.mode0.write(size, val),
            Self::ADDR_IEN => self.ien.write(size, val),
            Self::ADDR_OE => self.oe.write(size, val),
            Self::ADDR_IN => self.input.write(size, val),
            Self::ADDR_OUT => {
                self.out.write(size, val)?;
                if self.output_enabled() {
                    (self.cb.0)(val as u8);
                }
                Ok(())
            }
            _ => Err(BusError::StoreAccessFault),
        }
    }

    fn warm_reset(&mut self) {
        self.reset();
    }
}
