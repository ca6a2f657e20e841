// Licensed under the Apache-2.0 license

//! Values test firmware drives onto the management GPIO, shared with the
//! host-side harness that watches the pin.
#![no_std]

/// Value driven right after the status output is enabled.
pub const STATUS_RESET: u8 = 0x00;

/// Bring-up finished; memory accesses start after this.
pub const STATUS_CONFIGURED: u8 = 0x01;

/// All SRAM checks passed.
pub const STATUS_SRAM_PASSED: u8 = 0xAB;

pub const STATUS_SRAM0_BEGIN_MISMATCH: u8 = 0xAA;
pub const STATUS_SRAM0_END_MISMATCH: u8 = 0xBB;
pub const STATUS_SRAM1_BEGIN_MISMATCH: u8 = 0xCC;
pub const STATUS_SRAM1_END_MISMATCH: u8 = 0xDD;
pub const STATUS_SRAM2_BEGIN_MISMATCH: u8 = 0xEE;
pub const STATUS_SRAM2_END_MISMATCH: u8 = 0xFF;

/// Driven by the test harness panic handler.
pub const STATUS_FIRMWARE_PANIC: u8 = 0xFE;

/// Interpretation of a status value.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum StatusCode {
    Reset,
    Configured,
    Passed,
    Failed(u8),
    Unknown(u8),
}

impl From<u8> for StatusCode {
    fn from(value: u8) -> Self {
        match value {
            STATUS_RESET => Self::Reset,
            STATUS_CONFIGURED => Self::Configured,
            STATUS_SRAM_PASSED => Self::Passed,
            STATUS_SRAM0_BEGIN_MISMATCH
            | STATUS_SRAM0_END_MISMATCH
            | STATUS_SRAM1_BEGIN_MISMATCH
            | STATUS_SRAM1_END_MISMATCH
            | STATUS_SRAM2_BEGIN_MISMATCH
            | STATUS_SRAM2_END_MISMATCH
            | STATUS_FIRMWARE_PANIC => Self::Failed(value),
            _ => Self::Unknown(value),
        }
    }
}

impl StatusCode {
    /// True for the values that end a test run.
    pub fn is_final(self) -> bool {
        matches!(self, Self::Passed | Self::Failed(_))
    }
}

/// Human readable meaning of a final status value.
pub fn describe(value: u8) -> &'static str {
    match value {
        STATUS_SRAM_PASSED => "All SRAM tests passed",
        STATUS_SRAM0_BEGIN_MISMATCH => "SRAM 0 begin read mismatch",
        STATUS_SRAM0_END_MISMATCH => "SRAM 0 end read mismatch",
        STATUS_SRAM1_BEGIN_MISMATCH => "SRAM 1 begin read mismatch",
        STATUS_SRAM1_END_MISMATCH => "SRAM 1 end read mismatch",
        STATUS_SRAM2_BEGIN_MISMATCH => "SRAM 2 begin read mismatch",
        STATUS_SRAM2_END_MISMATCH => "SRAM 2 end read mismatch",
        STATUS_FIRMWARE_PANIC => "Firmware panic",
        STATUS_RESET => "Reset",
        STATUS_CONFIGURED => "Configuration finished",
        _ => "Unknown status code",
    }
}
