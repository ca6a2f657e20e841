// Licensed under the Apache-2.0 license
//
// Register blocks of the Caravel management SoC that are touched by the
// test firmware. Layout follows the generated-ureg shape: a `RegisterBlock`
// holding a base pointer and an `Mmio`, one accessor per register, and value
// types in `regs`.
#![no_std]
#![allow(clippy::erasing_op)]
#![allow(clippy::identity_op)]

/// Base of the user project wishbone window.
pub const USER_SPACE_ADDR: u32 = 0x3000_0000;

/// Size of the user project wishbone window.
pub const USER_SPACE_SIZE: u32 = 0x1000_0000;

/// Number of user I/O pads (`mprj_io[0..38]`).
pub const MPRJ_IO_COUNT: usize = 38;

macro_rules! register_block {
    (
        $(#[$meta:meta])*
        $addr_name:ident = $addr:literal;
        $ctor:ident;
        {
            $(
                $(#[$reg_meta:meta])*
                $reg:ident @ $offset:literal : $reg_ty:ty,
            )*
        }
    ) => {
        pub const $addr_name: u32 = $addr;

        $(#[$meta])*
        #[allow(dead_code)]
        #[derive(Clone, Copy)]
        pub struct RegisterBlock<TMmio: ureg::Mmio> {
            ptr: *mut u32,
            mmio: TMmio,
        }
        impl RegisterBlock<ureg::RealMmio<'_>> {
            pub fn $ctor() -> Self {
                unsafe { Self::new($addr_name as *mut u32) }
            }
        }
        impl<TMmio: ureg::Mmio + core::default::Default> RegisterBlock<TMmio> {
            /// # Safety
            ///
            /// The caller is responsible for ensuring that ptr is valid for
            /// volatile reads and writes at any of the offsets in this register
            /// block.
            #[inline(always)]
            pub unsafe fn new(ptr: *mut u32) -> Self {
                Self {
                    ptr,
                    mmio: core::default::Default::default(),
                }
            }
        }
        impl<TMmio: ureg::Mmio> RegisterBlock<TMmio> {
            /// # Safety
            ///
            /// The caller is responsible for ensuring that ptr is valid for
            /// volatile reads and writes at any of the offsets in this register
            /// block.
            #[inline(always)]
            pub unsafe fn new_with_mmio(ptr: *mut u32, mmio: TMmio) -> Self {
                Self { ptr, mmio }
            }
            $(
                $(#[$reg_meta])*
                #[inline(always)]
                pub fn $reg(&self) -> ureg::RegRef<$reg_ty, &TMmio> {
                    unsafe {
                        ureg::RegRef::new_with_mmio(
                            self.ptr.wrapping_add($offset / core::mem::size_of::<u32>()),
                            &self.mmio,
                        )
                    }
                }
            )*
        }
    };
}

pub mod mgmt_gpio {
    //! The single management GPIO pin, used by test firmware as its status
    //! output.
    use crate::meta;

    register_block! {
        MGMT_GPIO_ADDR = 0xf000_3800;
        mgmt_gpio_reg;
        {
            /// Mode bit 1 of the management pad.
            mode1 @ 0x00: meta::Enable,
            /// Mode bit 0 of the management pad.
            mode0 @ 0x04: meta::Enable,
            /// Input enable.
            ien @ 0x08: meta::Enable,
            /// Output enable.
            oe @ 0x0c: meta::Enable,
            /// Value sampled on the pad.
            input @ 0x10: meta::ReadOnly,
            /// Value driven onto the pad.
            out @ 0x14: meta::Word,
        }
    }
}

pub mod housekeeping {
    //! User pad configuration registers and the serial transfer that shifts
    //! them into the pads.
    use crate::meta;

    register_block! {
        HOUSEKEEPING_ADDR = 0x2600_0000;
        housekeeping_reg;
        {
            /// Writing `start` shifts the `mprj_io` configuration into the
            /// pads; `busy` stays set until the transfer completes.
            mprj_xfer @ 0x00: meta::MprjXfer,
        }
    }

    impl<TMmio: ureg::Mmio> RegisterBlock<TMmio> {
        /// Per-pad configuration, `mprj_io[0]` at offset 0x24.
        #[inline(always)]
        pub fn mprj_io(
            &self,
        ) -> ureg::Array<{ crate::MPRJ_IO_COUNT }, ureg::RegRef<meta::Word, &TMmio>> {
            unsafe {
                ureg::Array::new_with_mmio(
                    self.ptr.wrapping_add(0x24 / core::mem::size_of::<u32>()),
                    &self.mmio,
                )
            }
        }
    }
}

pub mod sys {
    //! Housekeeping system control.
    use crate::meta;

    register_block! {
        SYS_ADDR = 0x2620_0000;
        sys_reg;
        {
            /// Disables the housekeeping SPI when set.
            hkspi_disable @ 0x10: meta::HkspiDisable,
        }
    }
}

pub mod wishbone {
    //! Management core to user project wishbone bridge.
    use crate::meta;

    register_block! {
        WISHBONE_ADDR = 0xf000_9800;
        wishbone_reg;
        {
            /// Enables the wishbone interface to the user project.
            wb_enable @ 0x00: meta::Enable,
        }
    }
}

pub mod regs {
    //! Types that represent the values held by registers.

    #[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
    pub struct EnableReadVal(u32);
    impl EnableReadVal {
        #[inline(always)]
        pub fn en(&self) -> bool {
            (self.0 & 1) != 0
        }
    }
    impl From<u32> for EnableReadVal {
        fn from(val: u32) -> Self {
            Self(val)
        }
    }

    #[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
    pub struct EnableWriteVal(u32);
    impl EnableWriteVal {
        #[inline(always)]
        pub fn en(self, val: bool) -> Self {
            Self((self.0 & !1) | u32::from(val))
        }
    }
    impl From<u32> for EnableWriteVal {
        fn from(val: u32) -> Self {
            Self(val)
        }
    }
    impl From<EnableWriteVal> for u32 {
        fn from(val: EnableWriteVal) -> u32 {
            val.0
        }
    }

    #[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
    pub struct MprjXferReadVal(u32);
    impl MprjXferReadVal {
        /// The pad configuration transfer is still in progress.
        #[inline(always)]
        pub fn busy(&self) -> bool {
            (self.0 & 1) != 0
        }
    }
    impl From<u32> for MprjXferReadVal {
        fn from(val: u32) -> Self {
            Self(val)
        }
    }

    #[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
    pub struct MprjXferWriteVal(u32);
    impl MprjXferWriteVal {
        #[inline(always)]
        pub fn start(self, val: bool) -> Self {
            Self((self.0 & !1) | u32::from(val))
        }
    }
    impl From<u32> for MprjXferWriteVal {
        fn from(val: u32) -> Self {
            Self(val)
        }
    }
    impl From<MprjXferWriteVal> for u32 {
        fn from(val: MprjXferWriteVal) -> u32 {
            val.0
        }
    }

    #[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
    pub struct HkspiDisableWriteVal(u32);
    impl HkspiDisableWriteVal {
        #[inline(always)]
        pub fn disable(self, val: bool) -> Self {
            Self((self.0 & !1) | u32::from(val))
        }
    }
    impl From<u32> for HkspiDisableWriteVal {
        fn from(val: u32) -> Self {
            Self(val)
        }
    }
    impl From<HkspiDisableWriteVal> for u32 {
        fn from(val: HkspiDisableWriteVal) -> u32 {
            val.0
        }
    }
}

pub mod meta {
    //! Additional metadata needed by ureg.
    use crate::regs;

    pub type Word = ureg::ReadWriteReg32<0, u32, u32>;
    pub type ReadOnly = ureg::ReadOnlyReg32<u32>;
    pub type Enable = ureg::ReadWriteReg32<0, regs::EnableReadVal, regs::EnableWriteVal>;
    pub type MprjXfer = ureg::ReadWriteReg32<0, regs::MprjXferReadVal, regs::MprjXferWriteVal>;
    pub type HkspiDisable = ureg::ReadWriteReg32<0, u32, regs::HkspiDisableWriteVal>;
}
