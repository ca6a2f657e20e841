// Licensed under the Apache-2.0 license

use std::fmt;
use std::str::FromStr;

/// How a faulty SRAM word misbehaves.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum SramFaultMode {
    /// Every read returns this value, whatever was written.
    StuckAt(u32),

    /// Reads return the stored value XOR this mask.
    FlipBits(u32),

    /// Writes are silently discarded.
    DropWrites,
}

/// A fault attached to one word of user-space SRAM.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct SramFault {
    /// Absolute wishbone address of the word (`0x3000_0000`-based).
    pub addr: u32,
    pub mode: SramFaultMode,
}

impl SramFault {
    pub fn stuck_at(addr: u32, value: u32) -> Self {
        Self {
            addr,
            mode: SramFaultMode::StuckAt(value),
        }
    }

    pub fn flip_bits(addr: u32, mask: u32) -> Self {
        Self {
            addr,
            mode: SramFaultMode::FlipBits(mask),
        }
    }

    pub fn drop_writes(addr: u32) -> Self {
        Self {
            addr,
            mode: SramFaultMode::DropWrites,
        }
    }

    /// Value returned by a read of the faulty word holding `stored`.
    pub fn apply_read(&self, stored: u32) -> u32 {
        match self.mode {
            SramFaultMode::StuckAt(val) => val,
            SramFaultMode::FlipBits(mask) => stored ^ mask,
            SramFaultMode::DropWrites => stored,
        }
    }

    pub fn drops_writes(&self) -> bool {
        self.mode == SramFaultMode::DropWrites
    }
}

impl fmt::Display for SramFault {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.mode {
            SramFaultMode::StuckAt(val) => write!(f, "{:#010x} stuck at {val:#010x}", self.addr),
            SramFaultMode::FlipBits(mask) => {
                write!(f, "{:#010x} flips bits {mask:#010x}", self.addr)
            }
            SramFaultMode::DropWrites => write!(f, "{:#010x} drops writes", self.addr),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ParseIntError(pub String);

impl fmt::Display for ParseIntError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid number {:?}", self.0)
    }
}

impl std::error::Error for ParseIntError {}

/// Parses a decimal or `0x`-prefixed hexadecimal u32, allowing `_`
/// separators.
pub fn parse_u32(s: &str) -> Result<u32, ParseIntError> {
    let cleaned = s.trim().replace('_', "");
    let result = match cleaned
        .strip_prefix("0x")
        .or_else(|| cleaned.strip_prefix("0X"))
    {
        Some(hex) => u32::from_str_radix(hex, 16),
        None => cleaned.parse(),
    };
    result.map_err(|_| ParseIntError(s.to_string()))
}

/// An `ADDR=VALUE` pair, as taken on the command line.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct AddrValue {
    pub addr: u32,
    pub value: u32,
}

impl FromStr for AddrValue {
    type Err = ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (addr, value) = s
            .split_once('=')
            .ok_or_else(|| ParseIntError(s.to_string()))?;
        Ok(Self {
            addr: parse_u32(addr)?,
            value: parse_u32(value)?,
        })
    }
}
