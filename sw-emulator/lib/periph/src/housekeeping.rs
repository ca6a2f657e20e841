/*++

Licensed under the Apache-2.0 license.

File Name:

    housekeeping.rs

Abstract:

    File contains the housekeeping block: user pad configuration, the serial
    transfer that loads it into the pads, and the housekeeping SPI switch.

--*/

use caravel_emu_bus::{Bus, BusError, ReadWriteRegister, Register};
use caravel_emu_types::{RvAddr, RvData, RvSize};
use caravel_registers::{housekeeping::HOUSEKEEPING_ADDR, sys::SYS_ADDR, MPRJ_IO_COUNT};
use tock_registers::interfaces::{ReadWriteable, Readable};
use tock_registers::register_bitfields;

register_bitfields! [
    u32,

    /// Pad configuration transfer
    MprjXfer [
        BUSY OFFSET(0) NUMBITS(1) [],
    ],

    /// Housekeeping SPI control
    HkspiDisable [
        DISABLE OFFSET(0) NUMBITS(1) [],
    ],
];

/// Ticks needed to shift the configuration of every pad. Each pad control
/// block holds 13 bits.
pub const XFER_TICKS: u64 = 13 * MPRJ_IO_COUNT as u64;

pub struct Housekeeping {
    mprj_xfer: ReadWriteRegister<MprjXfer::Register>,
    hkspi_disable: ReadWriteRegister<HkspiDisable::Register>,

    /// Configuration written by firmware, not yet shifted into the pads.
    shadow: [u32; MPRJ_IO_COUNT],

    /// Configuration currently applied to the pads.
    pads: [u32; MPRJ_IO_COUNT],

    ticks_remaining: u64,
    xfer_count: u32,
}

impl Housekeeping {
    const ADDR_MPRJ_XFER: RvAddr = 0x00;
    const ADDR_MPRJ_IO_START: RvAddr = 0x24;
    const ADDR_MPRJ_IO_END: RvAddr = Self::ADDR_MPRJ_IO_START + 4 * MPRJ_IO_COUNT as RvAddr;
    const ADDR_HKSPI_DISABLE: RvAddr = SYS_ADDR - HOUSEKEEPING_ADDR + 0x10;

    pub fn new() -> Self {
        Self {
            mprj_xfer: ReadWriteRegister::new(0),
            hkspi_disable: ReadWriteRegister::new(0),
            shadow: [0; MPRJ_IO_COUNT],
            pads: [0; MPRJ_IO_COUNT],
            ticks_remaining: 0,
            xfer_count: 0,
        }
    }

    /// Memory map size.
    pub fn mmap_size(&self) -> RvAddr {
        0x0100_0000
    }

    pub fn is_busy(&self) -> bool {
        self.mprj_xfer.reg.is_set(MprjXfer::BUSY)
    }

    pub fn is_hkspi_enabled(&self) -> bool {
        !self.hkspi_disable.reg.is_set(HkspiDisable::DISABLE)
    }

    /// Configuration applied to pad `pin`, or `None` if there is no such pad.
    pub fn pad_config(&self, pin: usize) -> Option<u32> {
        self.pads.get(pin).copied()
    }

    /// Number of completed configuration transfers.
    pub fn xfer_count(&self) -> u32 {
        self.xfer_count
    }

    fn start_xfer(&mut self) {
        if self.is_busy() {
            return;
        }
        self.mprj_xfer.reg.modify(MprjXfer::BUSY::SET);
        self.ticks_remaining = XFER_TICKS;
    }

    fn io_index(addr: RvAddr) -> Option<usize> {
        if (Self::ADDR_MPRJ_IO_START..Self::ADDR_MPRJ_IO_END).contains(&addr) && addr % 4 == 0 {
            Some(((addr - Self::ADDR_MPRJ_IO_START) / 4) as usize)
        } else {
            None
        }
    }
}

impl Default for Housekeeping {
    fn default() -> Self {
        Self::new()
    }
}

impl Bus for Housekeeping {
    fn read(&mut self, size: RvSize, addr: RvAddr) -> Result<RvData, BusError> {
        match addr {
            Self::ADDR_MPRJ_XFER => self.mprj_xfer.read(size),
            Self::ADDR_HKSPI_DISABLE => self.hkspi_disable.read(size),
            _ => match Self::io_index(addr) {
                Some(i) => self.shadow[i].read(size),
                None => Err(BusError::LoadAccessFault),
            },
        }
    }

    fn write(&mut self, size: RvSize, addr: RvAddr, val: RvData) -> Result<(), BusError> {
        match addr {
            Self::ADDR_MPRJ_XFER => {
                if size != RvSize::Word {
                    Err(BusError::StoreAccessFault)?
                }
                if val & 1 != 0 {
                    self.start_xfer();
                }
                Ok(())
            }
            Self::ADDR_HKSPI_DISABLE => self.hkspi_disable.write(size, val),
            _ => match Self::io_index(addr) {
                Some(i) => self.shadow[i].write(size, val),
                None => Err(BusError::StoreAccessFault),
            },
        }
    }

    fn poll(&mut self) {
        if !self.is_busy() {
            return;
        }
        self.ticks_remaining = self.ticks_remaining.saturating_sub(1);
        if self.ticks_remaining == 0 {
            self.pads = self.shadow;
            self.xfer_count += 1;
            self.mprj_xfer.reg.modify(MprjXfer::BUSY::CLEAR);
        }
    }

    fn warm_reset(&mut self) {
        *self = Self::new();
    }
}
