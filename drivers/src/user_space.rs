/*++

Licensed under the Apache-2.0 license.

File Name:

    user_space.rs

Abstract:

    File contains API for word access to the user project wishbone window.

--*/

use caravel_registers::USER_SPACE_ADDR;
use ureg::{Mmio, RealMmio};

/// The user project address space, starting at `USER_SPACE_ADDR`.
///
/// Offsets are in bytes and must be word aligned.
pub struct UserSpace<TMmio: Mmio = RealMmio<'static>> {
    mmio: TMmio,
}

impl UserSpace {
    pub fn new() -> Self {
        Self {
            mmio: RealMmio::default(),
        }
    }
}

impl Default for UserSpace {
    fn default() -> Self {
        Self::new()
    }
}

impl<TMmio: Mmio> UserSpace<TMmio> {
    pub fn new_with_mmio(mmio: TMmio) -> Self {
        Self { mmio }
    }

    #[inline(always)]
    fn word_ptr(offset: u32) -> *mut u32 {
        debug_assert_eq!(offset & 3, 0);
        USER_SPACE_ADDR.wrapping_add(offset) as *mut u32
    }

    /// Write a word to the user project
    ///
    /// # Arguments
    ///
    /// * `offset` - Byte offset from the start of user space
    /// * `data` - Word to write
    pub fn write_word(&mut self, offset: u32, data: u32) {
        unsafe { self.mmio.write_volatile(Self::word_ptr(offset), data) }
    }

    /// Read a word from the user project
    ///
    /// # Arguments
    ///
    /// * `offset` - Byte offset from the start of user space
    pub fn read_word(&self, offset: u32) -> u32 {
        unsafe { self.mmio.read_volatile(Self::word_ptr(offset)) }
    }
}
