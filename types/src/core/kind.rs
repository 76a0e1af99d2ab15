use core::fmt;
use core::str::FromStr;

use super::flags::{BasicFlags, FamilyFlags};

/// Tag selecting which variant a shape is.
///
/// Only `Basic`, `Enum`, `Array` and `DyStruct` have a [`Shape`](super::Shape)
/// variant. The remaining tags are reserved so that their trait rows, and the
/// numbering of the tags, are stable.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Family {
    Basic,
    Enum,
    Array,
    Struct,
    DyStruct,
    String,
    Vector,
    Set,
    Map,
}

/// Static description of a [`Family`].
#[derive(Debug)]
pub struct FamilyTraits {
    pub family: Family,
    pub name: &'static str,
    pub flags: FamilyFlags,
}

const fn fam(family: Family, name: &'static str, flags: FamilyFlags) -> FamilyTraits {
    FamilyTraits {
        family,
        name,
        flags,
    }
}

const FIXED: FamilyFlags = FamilyFlags::ALWAYS_FIXED_FOOTPRINT;
const MULTI: FamilyFlags = FamilyFlags::MULTI_ELEMENT;
const COMPOSITE: FamilyFlags = FamilyFlags::COMPOSITE;
const ASSOC: FamilyFlags = FamilyFlags::ASSOCIATIVE;
const COUNTED: FamilyFlags = FamilyFlags::FIXED_COUNT;

static FAMILY_TRAITS: [FamilyTraits; Family::COUNT] = [
    fam(Family::Basic, "Basic", FIXED.union(COUNTED)),
    fam(Family::Enum, "Enum", FIXED.union(COUNTED)),
    fam(Family::Array, "Array", MULTI.union(COUNTED)),
    fam(Family::Struct, "Struct", COMPOSITE.union(COUNTED)),
    fam(Family::DyStruct, "DyStruct", COMPOSITE.union(COUNTED)),
    fam(Family::String, "String", FamilyFlags::empty()),
    fam(Family::Vector, "Vector", MULTI),
    fam(Family::Set, "Set", MULTI),
    fam(Family::Map, "Map", MULTI.union(ASSOC)),
];

impl Family {
    pub const COUNT: usize = 9;

    pub const ALL: [Family; Family::COUNT] = [
        Family::Basic,
        Family::Enum,
        Family::Array,
        Family::Struct,
        Family::DyStruct,
        Family::String,
        Family::Vector,
        Family::Set,
        Family::Map,
    ];

    pub fn traits(self) -> &'static FamilyTraits {
        &FAMILY_TRAITS[self as usize]
    }

    pub fn name(self) -> &'static str {
        self.traits().name
    }

    pub fn flags(self) -> FamilyFlags {
        self.traits().flags
    }

    pub fn is_always_fixed_footprint(self) -> bool {
        self.flags().contains(FamilyFlags::ALWAYS_FIXED_FOOTPRINT)
    }

    pub fn is_multi_element(self) -> bool {
        self.flags().contains(FamilyFlags::MULTI_ELEMENT)
    }

    pub fn is_composite(self) -> bool {
        self.flags().contains(FamilyFlags::COMPOSITE)
    }

    pub fn is_associative(self) -> bool {
        self.flags().contains(FamilyFlags::ASSOCIATIVE)
    }

    pub fn is_fixed_count(self) -> bool {
        self.flags().contains(FamilyFlags::FIXED_COUNT)
    }
}

impl fmt::Display for Family {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// The built-in primitive kinds.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Basic {
    I8,
    U8,
    I16,
    U16,
    I32,
    U32,
    I64,
    U64,
    F32,
    F64,
    Bool,
    Byte,
    Char,
    /// 32-bit wide character, independent of the platform's `wchar_t`.
    WChar,
}

/// Static description of a [`Basic`] kind.
#[derive(Debug)]
pub struct BasicTraits {
    pub basic: Basic,
    /// Canonical name; also the kind's contribution to structural hashes.
    pub name: &'static str,
    pub size: u32,
    pub flags: BasicFlags,
}

const fn basic(basic: Basic, name: &'static str, size: u32, flags: BasicFlags) -> BasicTraits {
    BasicTraits {
        basic,
        name,
        size,
        flags,
    }
}

const SINT: BasicFlags = BasicFlags::NUMERIC
    .union(BasicFlags::INTEGER)
    .union(BasicFlags::SIGNED);
const UINT: BasicFlags = BasicFlags::NUMERIC.union(BasicFlags::INTEGER);
const FLOAT: BasicFlags = BasicFlags::NUMERIC
    .union(BasicFlags::SIGNED)
    .union(BasicFlags::FLOAT);
const PLAIN: BasicFlags = BasicFlags::empty();

static BASIC_TRAITS: [BasicTraits; Basic::COUNT] = [
    basic(Basic::I8, "I8", 1, SINT),
    basic(Basic::U8, "U8", 1, UINT),
    basic(Basic::I16, "I16", 2, SINT),
    basic(Basic::U16, "U16", 2, UINT),
    basic(Basic::I32, "I32", 4, SINT),
    basic(Basic::U32, "U32", 4, UINT),
    basic(Basic::I64, "I64", 8, SINT),
    basic(Basic::U64, "U64", 8, UINT),
    basic(Basic::F32, "F32", 4, FLOAT),
    basic(Basic::F64, "F64", 8, FLOAT),
    basic(Basic::Bool, "Bool", 1, PLAIN),
    basic(Basic::Byte, "Byte", 1, PLAIN),
    basic(Basic::Char, "Char", 1, PLAIN),
    basic(Basic::WChar, "WChar", 4, PLAIN),
];

impl Basic {
    pub const COUNT: usize = 14;

    pub const ALL: [Basic; Basic::COUNT] = [
        Basic::I8,
        Basic::U8,
        Basic::I16,
        Basic::U16,
        Basic::I32,
        Basic::U32,
        Basic::I64,
        Basic::U64,
        Basic::F32,
        Basic::F64,
        Basic::Bool,
        Basic::Byte,
        Basic::Char,
        Basic::WChar,
    ];

    pub fn traits(self) -> &'static BasicTraits {
        &BASIC_TRAITS[self as usize]
    }

    pub fn name(self) -> &'static str {
        self.traits().name
    }

    pub fn size(self) -> u32 {
        self.traits().size
    }

    pub fn is_numeric(self) -> bool {
        self.traits().flags.contains(BasicFlags::NUMERIC)
    }

    pub fn is_integer(self) -> bool {
        self.traits().flags.contains(BasicFlags::INTEGER)
    }

    pub fn is_signed(self) -> bool {
        self.traits().flags.contains(BasicFlags::SIGNED)
    }

    pub fn is_float(self) -> bool {
        self.traits().flags.contains(BasicFlags::FLOAT)
    }
}

impl fmt::Display for Basic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Returned when a string names no basic kind.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownBasic;

impl fmt::Display for UnknownBasic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("unknown basic kind")
    }
}

impl core::error::Error for UnknownBasic {}

impl FromStr for Basic {
    type Err = UnknownBasic;

    /// Parses a canonical kind name, ignoring ASCII case.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Basic::ALL
            .into_iter()
            .find(|b| b.name().eq_ignore_ascii_case(s))
            .ok_or(UnknownBasic)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn basic_table_is_indexed_by_discriminant() {
        for b in Basic::ALL {
            assert_eq!(b.traits().basic, b);
        }
    }

    #[test]
    fn family_table_is_indexed_by_discriminant() {
        for f in Family::ALL {
            assert_eq!(f.traits().family, f);
        }
    }

    #[test]
    fn basic_sizes() {
        assert_eq!(Basic::U64.size(), 8);
        assert_eq!(Basic::I8.size(), 1);
        assert_eq!(Basic::Bool.size(), 1);
        assert_eq!(Basic::F64.size(), 8);
        assert_eq!(Basic::F32.size(), 4);
        assert_eq!(Basic::I16.size(), 2);
        assert_eq!(Basic::WChar.size(), 4);
    }

    #[test]
    fn basic_classification() {
        assert!(Basic::I32.is_signed() && Basic::I32.is_integer());
        assert!(!Basic::U32.is_signed());
        assert!(Basic::F32.is_float() && Basic::F32.is_signed() && !Basic::F32.is_integer());
        assert!(!Basic::Bool.is_numeric());
        assert!(!Basic::Char.is_numeric());
    }

    #[test]
    fn family_flags() {
        assert!(Family::Basic.is_always_fixed_footprint());
        assert!(Family::Enum.is_always_fixed_footprint());
        assert!(!Family::Array.is_always_fixed_footprint());
        assert!(Family::Array.is_multi_element() && Family::Array.is_fixed_count());
        assert!(Family::DyStruct.is_composite());
        assert!(Family::Map.is_associative() && !Family::Map.is_fixed_count());
        assert!(Family::String.flags().is_empty());
    }

    #[test]
    fn parse_basic_ignores_case() {
        assert_eq!("u64".parse::<Basic>(), Ok(Basic::U64));
        assert_eq!("WCHAR".parse::<Basic>(), Ok(Basic::WChar));
        assert_eq!("u128".parse::<Basic>(), Err(UnknownBasic));
    }
}
