/*++

Licensed under the Apache-2.0 license.

File Name:

    lib.rs

Abstract:

    File contains the data types shared by the Caravel emulator crates.

--*/

use std::fmt;

/// Wishbone data width
pub type RvData = u32;

/// Wishbone address width
pub type RvAddr = u32;

/// Size of a bus access
#[derive(Debug, Eq, PartialEq, Copy, Clone)]
pub enum RvSize {
    Byte,
    HalfWord,
    Word,
    Invalid,
}

impl From<RvSize> for usize {
    fn from(size: RvSize) -> usize {
        match size {
            RvSize::Byte => 1,
            RvSize::HalfWord => 2,
            RvSize::Word => 4,
            RvSize::Invalid => 0,
        }
    }
}

impl From<usize> for RvSize {
    fn from(len: usize) -> RvSize {
        match len {
            1 => RvSize::Byte,
            2 => RvSize::HalfWord,
            4 => RvSize::Word,
            _ => RvSize::Invalid,
        }
    }
}

impl fmt::Display for RvSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

impl RvSize {
    /// Whether `addr` is a multiple of the access size.
    pub fn is_aligned(self, addr: RvAddr) -> bool {
        match self {
            RvSize::Invalid => false,
            size => addr as usize % usize::from(size) == 0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rv_size() {
        assert_eq!(RvSize::from(4usize), RvSize::Word);
        assert_eq!(RvSize::from(3usize), RvSize::Invalid);
        assert_eq!(usize::from(RvSize::HalfWord), 2);
        assert_eq!(RvSize::Word.to_string(), "Word");
        assert_eq!(RvSize::Invalid.to_string(), "Invalid");
    }

    #[test]
    fn test_is_aligned() {
        assert!(RvSize::Word.is_aligned(0x3000_fffc));
        assert!(!RvSize::Word.is_aligned(0x3000_fffe));
        assert!(RvSize::HalfWord.is_aligned(0x3000_fffe));
        assert!(RvSize::Byte.is_aligned(0x3000_ffff));
        assert!(!RvSize::Invalid.is_aligned(0));
    }
}
