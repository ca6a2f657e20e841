/*++

Licensed under the Apache-2.0 license.

File Name:

    sram.rs

Abstract:

    File contains a CF_SRAM_16384x32 instance with access counters and fault
    injection.

--*/

use caravel_emu_bus::{Bus, BusError, Ram};
use caravel_emu_types::{RvAddr, RvData, RvSize};
use caravel_hw_model_types::SramFault;
use std::collections::HashMap;

/// Reads and writes seen by one SRAM word.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq)]
pub struct AccessCounts {
    pub reads: u32,
    pub writes: u32,
}

impl AccessCounts {
    pub fn total(&self) -> u32 {
        self.reads + self.writes
    }
}

/// 16384 x 32-bit single-port SRAM. Word accesses only.
pub struct Sram {
    ram: Ram,
    counts: Vec<AccessCounts>,

    /// Faults keyed by word offset within this instance.
    faults: HashMap<RvAddr, SramFault>,
}

impl Sram {
    pub const WORDS: usize = 16384;

    /// Size of one instance in bytes.
    pub const SIZE: RvAddr = (Self::WORDS * 4) as RvAddr;

    pub fn new() -> Self {
        Self {
            ram: Ram::new(vec![0; Self::SIZE as usize]),
            counts: vec![AccessCounts::default(); Self::WORDS],
            faults: HashMap::new(),
        }
    }

    /// Memory map size.
    pub fn mmap_size(&self) -> RvAddr {
        Self::SIZE
    }

    /// Attach `fault` to the word at `offset`. Replaces any earlier fault on
    /// the same word.
    pub fn inject_fault(&mut self, offset: RvAddr, fault: SramFault) {
        self.faults.insert(offset & !3, fault);
    }

    /// Access counts of the word at `offset`.
    pub fn access_counts(&self, offset: RvAddr) -> Option<AccessCounts> {
        self.counts.get((offset / 4) as usize).copied()
    }

    /// Number of distinct words that have been read.
    pub fn words_read(&self) -> usize {
        self.counts.iter().filter(|c| c.reads > 0).count()
    }

    /// Contents of the storage array, bypassing faults and counters.
    pub fn peek(&self, offset: RvAddr) -> Option<u32> {
        let bytes = self.ram.data().get(offset as usize..offset as usize + 4)?;
        Some(u32::from_le_bytes(bytes.try_into().ok()?))
    }
}

impl Default for Sram {
    fn default() -> Self {
        Self::new()
    }
}

impl Bus for Sram {
    fn read(&mut self, size: RvSize, addr: RvAddr) -> Result<RvData, BusError> {
        if size != RvSize::Word {
            Err(BusError::LoadAccessFault)?
        }
        let stored = self.ram.read(size, addr)?;
        self.counts[(addr / 4) as usize].reads += 1;
        Ok(match self.faults.get(&addr) {
            Some(fault) => fault.apply_read(stored),
            None => stored,
        })
    }

    fn write(&mut self, size: RvSize, addr: RvAddr, val: RvData) -> Result<(), BusError> {
        if size != RvSize::Word {
            Err(BusError::StoreAccessFault)?
        }
        if !size.is_aligned(addr) {
            Err(BusError::StoreAddrMisaligned)?
        }
        if addr >= Self::SIZE {
            Err(BusError::StoreAccessFault)?
        }
        self.counts[(addr / 4) as usize].writes += 1;
        if self.faults.get(&addr).map_or(false, SramFault::drops_writes) {
            return Ok(());
        }
        self.ram.write(size, addr, val)
    }

    fn warm_reset(&mut self) {
        self.counts.fill(AccessCounts::default());
    }
}
