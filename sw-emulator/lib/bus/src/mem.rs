/*++

Licensed under the Apache-2.0 license.

File Name:

    mem.rs

Abstract:

    File contains the byte-addressed backing store shared by memory devices.

--*/

use crate::BusError;
use caravel_emu_types::{RvAddr, RvData, RvSize};

/// Memory Exception
#[derive(Debug, PartialEq, Eq)]
pub enum MemError {
    /// Read Address misaligned
    ReadAddrMisaligned,

    /// Read Access fault
    ReadAccessFault,

    /// Write Address misaligned
    WriteAddrMisaligned,

    /// Write access fault
    WriteAccessFault,
}

impl From<MemError> for BusError {
    fn from(exception: MemError) -> BusError {
        match exception {
            MemError::ReadAddrMisaligned => BusError::LoadAddrMisaligned,
            MemError::ReadAccessFault => BusError::LoadAccessFault,
            MemError::WriteAddrMisaligned => BusError::StoreAddrMisaligned,
            MemError::WriteAccessFault => BusError::StoreAccessFault,
        }
    }
}

/// Little-endian memory. All accesses must be naturally aligned.
pub struct Mem {
    data: Vec<u8>,
}

impl Mem {
    /// Create a new memory object
    ///
    /// # Arguments
    ///
    /// * `data` - Data contents for memory
    pub fn new(data: Vec<u8>) -> Self {
        Self { data }
    }

    /// Size of the memory in bytes
    #[inline]
    pub fn len(&self) -> usize {
        self.data.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Immutable reference to data
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    fn range(&self, size: RvSize, addr: RvAddr) -> Option<std::ops::Range<usize>> {
        if size == RvSize::Invalid {
            return None;
        }
        let start = addr as usize;
        let end = start.checked_add(usize::from(size))?;
        (end <= self.data.len()).then_some(start..end)
    }

    /// Read data of specified size from given address
    ///
    /// # Error
    ///
    /// * `MemError::ReadAddrMisaligned` - Read address is not `size` aligned
    /// * `MemError::ReadAccessFault` - Read from invalid or non existent address
    pub fn read(&self, size: RvSize, addr: RvAddr) -> Result<RvData, MemError> {
        let range = self.range(size, addr).ok_or(MemError::ReadAccessFault)?;
        if !size.is_aligned(addr) {
            return Err(MemError::ReadAddrMisaligned);
        }
        Ok(self.data[range]
            .iter()
            .rev()
            .fold(0, |acc, &b| (acc << 8) | RvData::from(b)))
    }

    /// Write data of specified size to given address
    ///
    /// # Error
    ///
    /// * `MemError::WriteAddrMisaligned` - Write address is not `size` aligned
    /// * `MemError::WriteAccessFault` - Write to invalid or non existent address
    pub fn write(&mut self, size: RvSize, addr: RvAddr, val: RvData) -> Result<(), MemError> {
        let range = self.range(size, addr).ok_or(MemError::WriteAccessFault)?;
        if !size.is_aligned(addr) {
            return Err(MemError::WriteAddrMisaligned);
        }
        for (i, byte) in self.data[range].iter_mut().enumerate() {
            *byte = (val >> (8 * i)) as u8;
        }
        Ok(())
    }
}
