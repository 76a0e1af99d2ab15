//! Offset-based typed views over instance storage.
//!
//! An accessor is a plain value: a byte offset (plus a stride and a length for
//! arrays) fixed when it is built, and the serial of the compiled type that
//! built it. Building one is where the field name and kind are checked; using
//! one costs an unaligned load or store.
//!
//! The safe methods still index the byte slice, so a misused accessor panics
//! instead of touching memory outside the instance. The `unsafe` variants drop
//! that last check.

#![allow(unsafe_code)]

use core::fmt;
use core::marker::PhantomData;

use dystruct_types::Basic;

use crate::primitive::Primitive;

/// Reads and writes one `T` at a fixed offset.
pub struct Accessor<T> {
    offset: usize,
    owner: u64,
    _marker: PhantomData<fn() -> T>,
}

// --- Manual Clone/Copy/Debug to avoid bounds on T ---

impl<T> Clone for Accessor<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for Accessor<T> {}

impl<T: Primitive> fmt::Debug for Accessor<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Accessor")
            .field("kind", &T::BASIC)
            .field("offset", &self.offset)
            .finish()
    }
}

impl<T: Primitive> Accessor<T> {
    /// An accessor for the `T` at `offset`, on behalf of compiled type `owner`.
    pub fn new(offset: usize, owner: u64) -> Self {
        Self {
            offset,
            owner,
            _marker: PhantomData,
        }
    }

    pub fn offset(&self) -> usize {
        self.offset
    }

    /// Serial of the compiled type this accessor was built for.
    pub fn owner(&self) -> u64 {
        self.owner
    }

    #[inline]
    pub fn get(&self, bytes: &[u8]) -> T {
        T::load(&bytes[self.offset..])
    }

    #[inline]
    pub fn set(&self, bytes: &mut [u8], value: T) {
        value.store(&mut bytes[self.offset..]);
    }

    /// # Safety
    ///
    /// `bytes` must hold at least `offset() + T::SIZE` bytes.
    #[inline]
    pub unsafe fn get_unchecked(&self, bytes: &[u8]) -> T {
        debug_assert!(self.offset + T::SIZE <= bytes.len());
        unsafe { T::load_unchecked(bytes.as_ptr().add(self.offset)) }
    }

    /// # Safety
    ///
    /// `bytes` must hold at least `offset() + T::SIZE` bytes.
    #[inline]
    pub unsafe fn set_unchecked(&self, bytes: &mut [u8], value: T) {
        debug_assert!(self.offset + T::SIZE <= bytes.len());
        unsafe { value.store_unchecked(bytes.as_mut_ptr().add(self.offset)) }
    }
}

/// Reads and writes the elements of a fixed array of `T`.
pub struct StrideAccessor<T> {
    offset: usize,
    stride: usize,
    len: usize,
    owner: u64,
    _marker: PhantomData<fn() -> T>,
}

impl<T> Clone for StrideAccessor<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for StrideAccessor<T> {}

impl<T: Primitive> fmt::Debug for StrideAccessor<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StrideAccessor")
            .field("kind", &T::BASIC)
            .field("offset", &self.offset)
            .field("stride", &self.stride)
            .field("len", &self.len)
            .finish()
    }
}

impl<T: Primitive> StrideAccessor<T> {
    /// Elements start at `offset` and are `stride` bytes apart. `stride` must be
    /// at least `T::SIZE`.
    pub fn new(offset: usize, stride: usize, len: usize, owner: u64) -> Self {
        debug_assert!(stride >= T::SIZE);
        Self {
            offset,
            stride,
            len,
            owner,
            _marker: PhantomData,
        }
    }

    pub fn offset(&self) -> usize {
        self.offset
    }

    pub fn stride(&self) -> usize {
        self.stride
    }

    /// Number of elements.
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn owner(&self) -> u64 {
        self.owner
    }

    #[inline]
    fn position(&self, index: usize) -> usize {
        debug_assert!(index < self.len, "index {index} out of {}", self.len);
        self.offset + index * self.stride
    }

    #[inline]
    pub fn get(&self, bytes: &[u8], index: usize) -> T {
        T::load(&bytes[self.position(index)..])
    }

    #[inline]
    pub fn set(&self, bytes: &mut [u8], index: usize, value: T) {
        value.store(&mut bytes[self.position(index)..]);
    }

    /// # Safety
    ///
    /// `index < len()` and `bytes` must cover the whole array.
    #[inline]
    pub unsafe fn get_unchecked(&self, bytes: &[u8], index: usize) -> T {
        unsafe { T::load_unchecked(bytes.as_ptr().add(self.position(index))) }
    }

    /// # Safety
    ///
    /// `index < len()` and `bytes` must cover the whole array.
    #[inline]
    pub unsafe fn set_unchecked(&self, bytes: &mut [u8], index: usize, value: T) {
        unsafe { value.store_unchecked(bytes.as_mut_ptr().add(self.position(index))) }
    }

    /// Every element, in index order.
    pub fn iter<'a>(&self, bytes: &'a [u8]) -> impl Iterator<Item = T> + use<'a, T> {
        let this = *self;
        (0..self.len).map(move |i| this.get(bytes, i))
    }
}

/// Reads and writes an enum field as `u32`, whatever its storage width.
#[derive(Clone, Copy)]
pub struct EnumAccessor {
    offset: usize,
    width: Basic,
    owner: u64,
}

impl fmt::Debug for EnumAccessor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EnumAccessor")
            .field("width", &self.width)
            .field("offset", &self.offset)
            .finish()
    }
}

impl EnumAccessor {
    /// `width` is the enum's storage kind: `U8`, `U16` or `U32`.
    pub fn new(offset: usize, width: Basic, owner: u64) -> Self {
        debug_assert!(matches!(width, Basic::U8 | Basic::U16 | Basic::U32));
        Self {
            offset,
            width,
            owner,
        }
    }

    pub fn offset(&self) -> usize {
        self.offset
    }

    pub fn width(&self) -> Basic {
        self.width
    }

    pub fn owner(&self) -> u64 {
        self.owner
    }

    pub fn get(&self, bytes: &[u8]) -> u32 {
        let at = &bytes[self.offset..];
        match self.width {
            Basic::U8 => u32::from(u8::load(at)),
            Basic::U16 => u32::from(u16::load(at)),
            _ => u32::load(at),
        }
    }

    /// Stores `value` truncated to the storage width.
    pub fn set(&self, bytes: &mut [u8], value: u32) {
        let at = &mut bytes[self.offset..];
        match self.width {
            Basic::U8 => {
                debug_assert!(value <= u32::from(u8::MAX));
                (value as u8).store(at)
            }
            Basic::U16 => {
                debug_assert!(value <= u32::from(u16::MAX));
                (value as u16).store(at)
            }
            _ => value.store(at),
        }
    }
}
