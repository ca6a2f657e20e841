/*++

Licensed under the Apache-2.0 license.

File Name:

    lib.rs

Abstract:

    Minimal register access layer. Register blocks in caravel-registers are
    generic over an `Mmio` implementation, so the same driver code can touch
    real hardware (`RealMmio`) or an emulated bus on the host.

--*/
#![no_std]

use core::marker::PhantomData;

mod private {
    pub trait Sealed {}
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum UintType {
    U8,
    U16,
    U32,
}

/// An unsigned integer that can be moved across an MMIO boundary.
pub trait Uint: Clone + Copy + Default + private::Sealed {
    const TYPE: UintType;

    fn from_u32(val: u32) -> Self;
    fn to_u32(self) -> u32;
}

macro_rules! impl_uint {
    ($ty:ty, $kind:ident) => {
        impl private::Sealed for $ty {}
        impl Uint for $ty {
            const TYPE: UintType = UintType::$kind;

            #[inline(always)]
            fn from_u32(val: u32) -> Self {
                val as $ty
            }

            #[inline(always)]
            fn to_u32(self) -> u32 {
                self as u32
            }
        }
    };
}
impl_uint!(u8, U8);
impl_uint!(u16, U16);
impl_uint!(u32, U32);

/// The way registers are loaded from and stored to.
pub trait Mmio: Sized {
    /// Loads from address `src` and returns the value.
    ///
    /// # Safety
    ///
    /// Same requirements as [`core::ptr::read_volatile`].
    unsafe fn read_volatile<T: Uint>(&self, src: *const T) -> T;

    /// Stores `src` to address `dst`.
    ///
    /// # Safety
    ///
    /// Same requirements as [`core::ptr::write_volatile`].
    unsafe fn write_volatile<T: Uint>(&self, dst: *mut T, src: T);
}

/// Like [`Mmio`], for implementations that need exclusive access to store.
pub trait MmioMut: Mmio {
    /// # Safety
    ///
    /// Same requirements as [`core::ptr::write_volatile`].
    unsafe fn write_volatile_mut<T: Uint>(&mut self, dst: *mut T, src: T) {
        self.write_volatile(dst, src)
    }
}

impl<TMmio: Mmio> Mmio for &TMmio {
    #[inline(always)]
    unsafe fn read_volatile<T: Uint>(&self, src: *const T) -> T {
        TMmio::read_volatile(self, src)
    }

    #[inline(always)]
    unsafe fn write_volatile<T: Uint>(&self, dst: *mut T, src: T) {
        TMmio::write_volatile(self, dst, src)
    }
}

/// Volatile loads and stores through real pointers.
#[derive(Clone, Copy, Default)]
pub struct RealMmio<'a>(PhantomData<&'a ()>);
impl Mmio for RealMmio<'_> {
    #[inline(always)]
    unsafe fn read_volatile<T: Uint>(&self, src: *const T) -> T {
        core::ptr::read_volatile(src)
    }

    #[inline(always)]
    unsafe fn write_volatile<T: Uint>(&self, dst: *mut T, src: T) {
        core::ptr::write_volatile(dst, src)
    }
}

#[derive(Default)]
pub struct RealMmioMut<'a>(PhantomData<&'a mut ()>);
impl Mmio for RealMmioMut<'_> {
    #[inline(always)]
    unsafe fn read_volatile<T: Uint>(&self, src: *const T) -> T {
        core::ptr::read_volatile(src)
    }

    #[inline(always)]
    unsafe fn write_volatile<T: Uint>(&self, dst: *mut T, src: T) {
        core::ptr::write_volatile(dst, src)
    }
}
impl MmioMut for RealMmioMut<'_> {}

pub trait RegType {
    type Raw: Uint;
}

pub trait ReadableReg: RegType {
    type ReadVal: Copy + From<Self::Raw>;
}

pub trait WritableReg: RegType {
    type WriteVal: Copy + From<Self::Raw> + Into<Self::Raw>;
}

pub trait ResettableReg: RegType {
    const RESET_VAL: Self::Raw;
}

#[derive(Clone, Copy)]
pub struct ReadOnlyReg32<TReadVal: Copy + From<u32>>(PhantomData<TReadVal>);
impl<TReadVal: Copy + From<u32>> RegType for ReadOnlyReg32<TReadVal> {
    type Raw = u32;
}
impl<TReadVal: Copy + From<u32>> ReadableReg for ReadOnlyReg32<TReadVal> {
    type ReadVal = TReadVal;
}

#[derive(Clone, Copy)]
pub struct WriteOnlyReg32<const RESET_VAL: u32, TWriteVal: Copy + From<u32> + Into<u32>>(
    PhantomData<TWriteVal>,
);
impl<const RESET_VAL: u32, TWriteVal: Copy + From<u32> + Into<u32>> RegType
    for WriteOnlyReg32<RESET_VAL, TWriteVal>
{
    type Raw = u32;
}
impl<const RESET_VAL: u32, TWriteVal: Copy + From<u32> + Into<u32>> WritableReg
    for WriteOnlyReg32<RESET_VAL, TWriteVal>
{
    type WriteVal = TWriteVal;
}
impl<const RESET_VAL: u32, TWriteVal: Copy + From<u32> + Into<u32>> ResettableReg
    for WriteOnlyReg32<RESET_VAL, TWriteVal>
{
    const RESET_VAL: u32 = RESET_VAL;
}

#[derive(Clone, Copy)]
pub struct ReadWriteReg32<
    const RESET_VAL: u32,
    TReadVal: Copy + From<u32>,
    TWriteVal: Copy + From<u32> + Into<u32>,
>(PhantomData<(TReadVal, TWriteVal)>);
impl<const RESET_VAL: u32, TReadVal: Copy + From<u32>, TWriteVal: Copy + From<u32> + Into<u32>>
    RegType for ReadWriteReg32<RESET_VAL, TReadVal, TWriteVal>
{
    type Raw = u32;
}
impl<const RESET_VAL: u32, TReadVal: Copy + From<u32>, TWriteVal: Copy + From<u32> + Into<u32>>
    ReadableReg for ReadWriteReg32<RESET_VAL, TReadVal, TWriteVal>
{
    type ReadVal = TReadVal;
}
impl<const RESET_VAL: u32, TReadVal: Copy + From<u32>, TWriteVal: Copy + From<u32> + Into<u32>>
    WritableReg for ReadWriteReg32<RESET_VAL, TReadVal, TWriteVal>
{
    type WriteVal = TWriteVal;
}
impl<const RESET_VAL: u32, TReadVal: Copy + From<u32>, TWriteVal: Copy + From<u32> + Into<u32>>
    ResettableReg for ReadWriteReg32<RESET_VAL, TReadVal, TWriteVal>
{
    const RESET_VAL: u32 = RESET_VAL;
}

/// A reference to a single register.
pub struct RegRef<TReg: RegType, TMmio: Mmio> {
    ptr: *mut TReg::Raw,
    mmio: TMmio,
}
impl<TReg: RegType, TMmio: Mmio> RegRef<TReg, TMmio> {
    /// # Safety
    ///
    /// The caller is responsible for ensuring that ptr is valid for
    /// volatile reads and writes through `mmio`.
    #[inline(always)]
    pub unsafe fn new_with_mmio(ptr: *mut TReg::Raw, mmio: TMmio) -> Self {
        Self { ptr, mmio }
    }

    pub fn ptr(&self) -> *mut TReg::Raw {
        self.ptr
    }
}
impl<TReg: ReadableReg, TMmio: Mmio> RegRef<TReg, TMmio> {
    #[inline(always)]
    pub fn read(&self) -> TReg::ReadVal {
        let raw = unsafe { self.mmio.read_volatile(self.ptr) };
        TReg::ReadVal::from(raw)
    }
}
impl<TReg: ResettableReg + WritableReg, TMmio: Mmio> RegRef<TReg, TMmio> {
    /// Writes the value returned by `f`, which is handed the register's
    /// reset value.
    #[inline(always)]
    pub fn write(&self, f: impl FnOnce(TReg::WriteVal) -> TReg::WriteVal) {
        let val = f(TReg::WriteVal::from(TReg::RESET_VAL));
        unsafe { self.mmio.write_volatile(self.ptr, val.into()) }
    }
}
impl<TReg: ReadableReg + WritableReg, TMmio: Mmio> RegRef<TReg, TMmio> {
    /// Read-modify-write.
    #[inline(always)]
    pub fn modify(&self, f: impl FnOnce(TReg::WriteVal) -> TReg::WriteVal) {
        let raw = unsafe { self.mmio.read_volatile(self.ptr) };
        let val = f(TReg::WriteVal::from(raw));
        unsafe { self.mmio.write_volatile(self.ptr, val.into()) }
    }
}

/// A contiguous array of `LEN` registers.
pub struct Array<const LEN: usize, TItem: ArrayItem> {
    ptr: *mut TItem::Raw,
    mmio: TItem::TMmio,
}

pub trait ArrayItem {
    type Raw: Uint;
    type TMmio: Mmio + Copy;

    /// # Safety
    ///
    /// `ptr` must be valid for volatile access through `mmio`.
    unsafe fn new_with_mmio(ptr: *mut Self::Raw, mmio: Self::TMmio) -> Self;
}
impl<TReg: RegType, TMmio: Mmio + Copy> ArrayItem for RegRef<TReg, TMmio> {
    type Raw = TReg::Raw;
    type TMmio = TMmio;

    unsafe fn new_with_mmio(ptr: *mut Self::Raw, mmio: Self::TMmio) -> Self {
        RegRef::new_with_mmio(ptr, mmio)
    }
}

impl<const LEN: usize, TItem: ArrayItem> Array<LEN, TItem> {
    /// # Safety
    ///
    /// The caller is responsible for ensuring that `ptr` is valid for
    /// volatile access to `LEN` consecutive items.
    #[inline(always)]
    pub unsafe fn new_with_mmio(ptr: *mut TItem::Raw, mmio: TItem::TMmio) -> Self {
        Self { ptr, mmio }
    }

    pub const fn len(&self) -> usize {
        LEN
    }

    pub const fn is_empty(&self) -> bool {
        LEN == 0
    }

    /// # Panics
    ///
    /// Panics if `index` is out of bounds.
    #[inline(always)]
    pub fn at(&self, index: usize) -> TItem {
        assert!(index < LEN, "register array index out of bounds");
        unsafe { TItem::new_with_mmio(self.ptr.add(index), self.mmio) }
    }

    pub fn iter(&self) -> impl Iterator<Item = TItem> + '_ {
        (0..LEN).map(move |i| self.at(i))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core::cell::Cell;

    #[derive(Default)]
    struct FakeMmio {
        last_write: Cell<Option<(usize, u32)>>,
        value: Cell<u32>,
    }
    impl Mmio for FakeMmio {
        unsafe fn read_volatile<T: Uint>(&self, _src: *const T) -> T {
            T::from_u32(self.value.get())
        }
        unsafe fn write_volatile<T: Uint>(&self, dst: *mut T, src: T) {
            self.last_write.set(Some((dst as usize, src.to_u32())));
            self.value.set(src.to_u32());
        }
    }

    type Reg = ReadWriteReg32<0x5, u32, u32>;

    #[test]
    fn test_write_starts_from_reset_value() {
        let mmio = FakeMmio::default();
        let reg: RegRef<Reg, &FakeMmio> = unsafe { RegRef::new_with_mmio(0x100 as *mut u32, &mmio) };
        reg.write(|w| w | 0x10);
        assert_eq!(mmio.last_write.get(), Some((0x100, 0x15)));
    }

    #[test]
    fn test_modify() {
        let mmio = FakeMmio::default();
        mmio.value.set(0x80);
        let reg: RegRef<Reg, &FakeMmio> = unsafe { RegRef::new_with_mmio(0x100 as *mut u32, &mmio) };
        reg.modify(|w| w | 1);
        assert_eq!(reg.read(), 0x81);
    }

    #[test]
    fn test_array_at() {
        let mmio = FakeMmio::default();
        let arr: Array<4, RegRef<Reg, &FakeMmio>> =
            unsafe { Array::new_with_mmio(0x200 as *mut u32, &mmio) };
        arr.at(3).write(|_| 7);
        assert_eq!(mmio.last_write.get(), Some((0x20c, 7)));
        assert_eq!(arr.iter().count(), 4);
    }

    #[test]
    #[should_panic]
    fn test_array_out_of_bounds() {
        let mmio = FakeMmio::default();
        let arr: Array<4, RegRef<Reg, &FakeMmio>> =
            unsafe { Array::new_with_mmio(0x200 as *mut u32, &mmio) };
        arr.at(4);
    }
}
