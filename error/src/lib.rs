/*++

Licensed under the Apache-2.0 license.

File Name:

    lib.rs

Abstract:

    File contains API and macros used by the firmware for error handling

--*/
#![cfg_attr(not(feature = "std"), no_std)]
use core::num::{NonZeroU32, TryFromIntError};

/// Firmware error code. Zero is reserved for success.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct CaravelError(pub NonZeroU32);

/// Defines one `CaravelError` constant per `(name, value, doc)` entry.
#[macro_export]
macro_rules! define_error_constants {
    ($(($name:ident, $value:expr, $doc:expr)),* $(,)?) => {
        $(
            #[doc = $doc]
            pub const $name: CaravelError = CaravelError::new_const($value);
        )*

        #[cfg(test)]
        pub fn all_constants() -> Vec<(&'static str, u32)> {
            vec![
                $(
                    (stringify!($name), $value),
                )*
            ]
        }
    };
}

impl CaravelError {
    /// Only for constants; use `CaravelError::try_from()` at runtime.
    const fn new_const(val: u32) -> Self {
        match NonZeroU32::new(val) {
            Some(val) => Self(val),
            None => panic!("CaravelError cannot be 0"),
        }
    }

    define_error_constants![
        (
            DRIVER_GPIO_INVALID_PIN,
            0x0001_0001,
            "Driver Error: user GPIO pin index out of range"
        ),
        (
            SRAM_TEST_SRAM0_BEGIN_MISMATCH,
            0x0100_0001,
            "SRAM Test Error: SRAM 0 begin read mismatch"
        ),
        (
            SRAM_TEST_SRAM0_END_MISMATCH,
            0x0100_0002,
            "SRAM Test Error: SRAM 0 end read mismatch"
        ),
        (
            SRAM_TEST_SRAM1_BEGIN_MISMATCH,
            0x0100_0003,
            "SRAM Test Error: SRAM 1 begin read mismatch"
        ),
        (
            SRAM_TEST_SRAM1_END_MISMATCH,
            0x0100_0004,
            "SRAM Test Error: SRAM 1 end read mismatch"
        ),
        (
            SRAM_TEST_SRAM2_BEGIN_MISMATCH,
            0x0100_0005,
            "SRAM Test Error: SRAM 2 begin read mismatch"
        ),
        (
            SRAM_TEST_SRAM2_END_MISMATCH,
            0x0100_0006,
            "SRAM Test Error: SRAM 2 end read mismatch"
        ),
    ];
}

impl From<NonZeroU32> for CaravelError {
    fn from(val: NonZeroU32) -> Self {
        CaravelError(val)
    }
}

impl From<CaravelError> for u32 {
    fn from(val: CaravelError) -> Self {
        val.0.get()
    }
}

impl TryFrom<u32> for CaravelError {
    type Error = TryFromIntError;
    fn try_from(val: u32) -> Result<Self, TryFromIntError> {
        NonZeroU32::try_from(val).map(CaravelError)
    }
}

pub type CaravelResult<T> = Result<T, CaravelError>;
