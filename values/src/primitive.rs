//! Mapping between Rust scalar types and [`Basic`] kinds.
//!
//! Every basic kind has exactly one Rust type. The three kinds without a
//! natural Rust counterpart get transparent newtypes: [`Byte`], [`Char`] and
//! [`WChar`].
//!
//! Values are stored in native byte order without alignment, so they are
//! always copied in and out of storage rather than borrowed.

#![allow(unsafe_code)]

use core::fmt;

use dystruct_types::Basic;
use static_assertions::assert_eq_size;

mod sealed {
    pub trait Sealed {}
}

/// A Rust type that is the value type of one [`Basic`] kind.
///
/// Sealed: the set of basic kinds is closed.
pub trait Primitive: Copy + fmt::Debug + sealed::Sealed {
    /// The kind whose storage this type reads and writes.
    const BASIC: Basic;

    /// Bytes occupied in storage. Always equal to `Self::BASIC.size()`.
    const SIZE: usize;

    /// Decodes a value from the first [`SIZE`](Self::SIZE) bytes of `bytes`.
    ///
    /// # Panics
    ///
    /// Panics if `bytes` is shorter than `SIZE`.
    fn load(bytes: &[u8]) -> Self;

    /// Encodes `self` into the first [`SIZE`](Self::SIZE) bytes of `bytes`.
    ///
    /// # Panics
    ///
    /// Panics if `bytes` is shorter than `SIZE`.
    fn store(self, bytes: &mut [u8]);

    /// # Safety
    ///
    /// `ptr` must be valid for reads of `SIZE` bytes.
    unsafe fn load_unchecked(ptr: *const u8) -> Self;

    /// # Safety
    ///
    /// `ptr` must be valid for writes of `SIZE` bytes.
    unsafe fn store_unchecked(self, ptr: *mut u8);
}

/// An opaque byte (`Basic::Byte`).
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(transparent)]
pub struct Byte(pub u8);

/// A narrow character code unit (`Basic::Char`).
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(transparent)]
pub struct Char(pub u8);

/// A 32-bit wide character code unit (`Basic::WChar`).
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(transparent)]
pub struct WChar(pub u32);

assert_eq_size!(Byte, u8);
assert_eq_size!(Char, u8);
assert_eq_size!(WChar, u32);

impl Char {
    /// The code unit as a `char`, if it is ASCII.
    pub fn to_char(self) -> Option<char> {
        self.0.is_ascii().then_some(self.0 as char)
    }
}

impl From<char> for WChar {
    fn from(c: char) -> Self {
        WChar(c as u32)
    }
}

impl WChar {
    pub fn to_char(self) -> Option<char> {
        char::from_u32(self.0)
    }
}

macro_rules! impl_primitive {
    ($($ty:ty => $basic:ident),* $(,)?) => {$(
        impl sealed::Sealed for $ty {}

        impl Primitive for $ty {
            const BASIC: Basic = Basic::$basic;
            const SIZE: usize = core::mem::size_of::<$ty>();

            fn load(bytes: &[u8]) -> Self {
                let mut buf = [0u8; core::mem::size_of::<$ty>()];
                buf.copy_from_slice(&bytes[..Self::SIZE]);
                <$ty>::from_ne_bytes(buf)
            }

            fn store(self, bytes: &mut [u8]) {
                bytes[..Self::SIZE].copy_from_slice(&self.to_ne_bytes());
            }

            unsafe fn load_unchecked(ptr: *const u8) -> Self {
                // SAFETY: every bit pattern is a valid value of this type.
                unsafe { ptr.cast::<$ty>().read_unaligned() }
            }

            unsafe fn store_unchecked(self, ptr: *mut u8) {
                unsafe { ptr.cast::<$ty>().write_unaligned(self) }
            }
        }
    )*};
}

impl_primitive! {
    i8 => I8,
    u8 => U8,
    i16 => I16,
    u16 => U16,
    i32 => I32,
    u32 => U32,
    i64 => I64,
    u64 => U64,
    f32 => F32,
    f64 => F64,
}

macro_rules! impl_newtype {
    ($($ty:ident($inner:ty) => $basic:ident),* $(,)?) => {$(
        impl sealed::Sealed for $ty {}

        impl Primitive for $ty {
            const BASIC: Basic = Basic::$basic;
            const SIZE: usize = <$inner as Primitive>::SIZE;

            fn load(bytes: &[u8]) -> Self {
                $ty(<$inner>::load(bytes))
            }

            fn store(self, bytes: &mut [u8]) {
                self.0.store(bytes)
            }

            unsafe fn load_unchecked(ptr: *const u8) -> Self {
                $ty(unsafe { <$inner>::load_unchecked(ptr) })
            }

            unsafe fn store_unchecked(self, ptr: *mut u8) {
                unsafe { self.0.store_unchecked(ptr) }
            }
        }
    )*};
}

impl_newtype! {
    Byte(u8) => Byte,
    Char(u8) => Char,
    WChar(u32) => WChar,
}

impl sealed::Sealed for bool {}

/// Any non-zero byte reads as `true`; `true` is stored as `1`.
impl Primitive for bool {
    const BASIC: Basic = Basic::Bool;
    const SIZE: usize = 1;

    fn load(bytes: &[u8]) -> Self {
        bytes[0] != 0
    }

    fn store(self, bytes: &mut [u8]) {
        bytes[0] = u8::from(self);
    }

    unsafe fn load_unchecked(ptr: *const u8) -> Self {
        unsafe { ptr.read() != 0 }
    }

    unsafe fn store_unchecked(self, ptr: *mut u8) {
        unsafe { ptr.write(u8::from(self)) }
    }
}
