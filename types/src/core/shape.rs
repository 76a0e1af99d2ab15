use alloc::string::String;
use alloc::vec::Vec;
use core::fmt;

use smallvec::SmallVec;
use static_assertions::{assert_eq_size, assert_impl_all};

use super::kind::{Basic, Family};
use crate::error::ShapeError;

/// Stable handle to a shape owned by a [`ShapeArena`](crate::ShapeArena).
///
/// The generation makes handles to destroyed shapes detectable even after the
/// slot has been reused.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ShapeId {
    pub(crate) index: u32,
    pub(crate) generation: u32,
}

impl ShapeId {
    pub fn index(self) -> u32 {
        self.index
    }

    pub fn generation(self) -> u32 {
        self.generation
    }
}

assert_eq_size!(ShapeId, u64);
assert_impl_all!(Shape: Clone, Send, Sync);

impl fmt::Display for ShapeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}.{}", self.index, self.generation)
    }
}

/// One node of a type graph.
///
/// Constituent shapes are referenced by [`ShapeId`]; their sizes are resolved
/// through the owning arena.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Shape {
    Basic(Basic),
    Enum(EnumShape),
    Array(ArrayShape),
    /// A struct whose fields are appended at run time ("DyStruct").
    Aggregate(AggregateShape),
}

impl Shape {
    pub fn family(&self) -> Family {
        match self {
            Shape::Basic(_) => Family::Basic,
            Shape::Enum(_) => Family::Enum,
            Shape::Array(_) => Family::Array,
            Shape::Aggregate(_) => Family::DyStruct,
        }
    }

    pub fn is_basic(&self) -> bool {
        matches!(self, Shape::Basic(_))
    }

    pub fn is_enum(&self) -> bool {
        matches!(self, Shape::Enum(_))
    }

    pub fn is_array(&self) -> bool {
        matches!(self, Shape::Array(_))
    }

    pub fn is_aggregate(&self) -> bool {
        matches!(self, Shape::Aggregate(_))
    }

    pub fn as_basic(&self) -> Option<Basic> {
        match self {
            Shape::Basic(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_enum(&self) -> Option<&EnumShape> {
        match self {
            Shape::Enum(e) => Some(e),
            _ => None,
        }
    }

    pub fn as_array(&self) -> Option<&ArrayShape> {
        match self {
            Shape::Array(a) => Some(a),
            _ => None,
        }
    }

    pub fn as_aggregate(&self) -> Option<&AggregateShape> {
        match self {
            Shape::Aggregate(a) => Some(a),
            _ => None,
        }
    }

    /// Shapes this node refers to directly, in declaration order.
    pub fn children(&self) -> impl Iterator<Item = ShapeId> + '_ {
        let (array, fields) = match self {
            Shape::Array(a) => (Some(a.element), None),
            Shape::Aggregate(a) => (None, Some(a.fields.iter().map(|f| f.shape))),
            Shape::Basic(_) | Shape::Enum(_) => (None, None),
        };
        array.into_iter().chain(fields.into_iter().flatten())
    }
}

/// A named `(name, value)` pair of an [`EnumShape`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnumEntry {
    pub name: String,
    pub value: u32,
}

/// Ordered enumeration whose storage width follows its largest value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnumShape {
    entries: Vec<EnumEntry>,
    max_value: i64,
}

impl Default for EnumShape {
    fn default() -> Self {
        Self::new()
    }
}

impl EnumShape {
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
            max_value: -1,
        }
    }

    /// Appends `name = value`. Fails if either is already present.
    pub fn add_entry(&mut self, name: impl Into<String>, value: u32) -> Result<(), ShapeError> {
        let name = name.into();
        if self.contains(&name, value) {
            return Err(ShapeError::DuplicateEntry { name, value });
        }
        self.max_value = self.max_value.max(i64::from(value));
        self.entries.push(EnumEntry { name, value });
        Ok(())
    }

    /// Appends `name` valued one more than the current maximum.
    pub fn add_entry_auto(&mut self, name: impl Into<String>) -> Result<u32, ShapeError> {
        let value =
            u32::try_from(self.max_value + 1).map_err(|_| ShapeError::EnumValueOverflow)?;
        self.add_entry(name, value)?;
        Ok(value)
    }

    pub fn entries(&self) -> &[EnumEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Largest value seen so far, or `-1` for an empty enum.
    pub fn max_value(&self) -> i64 {
        self.max_value
    }

    pub fn value_of(&self, name: &str) -> Option<u32> {
        self.entries.iter().find(|e| e.name == name).map(|e| e.value)
    }

    pub fn name_of(&self, value: u32) -> Option<&str> {
        self.entries
            .iter()
            .find(|e| e.value == value)
            .map(|e| e.name.as_str())
    }

    /// Unsigned kind wide enough for every value: `U8`, `U16` or `U32`.
    pub fn underlying(&self) -> Basic {
        if self.max_value < 256 {
            Basic::U8
        } else if self.max_value < 65_536 {
            Basic::U16
        } else {
            Basic::U32
        }
    }

    pub fn size_of(&self) -> u32 {
        self.underlying().size()
    }

    fn contains(&self, name: &str, value: u32) -> bool {
        self.entries
            .iter()
            .any(|e| e.value == value || e.name == name)
    }
}

/// `count` contiguous elements of one shape, without padding.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ArrayShape {
    pub count: u32,
    pub element: ShapeId,
}

/// One field of an [`AggregateShape`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Field {
    /// Byte offset from the start of the aggregate.
    pub offset: u32,
    pub shape: ShapeId,
    pub name: String,
    /// Size of `shape` when the field was appended.
    pub size: u32,
}

/// Densely packed struct assembled field by field.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AggregateShape {
    size: u32,
    fields: SmallVec<[Field; 4]>,
}

impl AggregateShape {
    pub fn new() -> Self {
        Self::default()
    }

    /// Cumulative size of every field appended so far.
    pub fn size_of(&self) -> u32 {
        self.size
    }

    pub fn fields(&self) -> &[Field] {
        &self.fields
    }

    pub fn field_count(&self) -> usize {
        self.fields.len()
    }

    pub fn field(&self, index: usize) -> Option<&Field> {
        self.fields.get(index)
    }

    pub fn find_field(&self, name: &str) -> Option<&Field> {
        self.fields.iter().find(|f| f.name == name)
    }

    pub fn has_field(&self, name: &str) -> bool {
        self.find_field(name).is_some()
    }

    /// Appends a field of `size` bytes at the current end and returns its offset.
    ///
    /// The caller has already resolved `shape` and computed `size`.
    pub(crate) fn push_field(
        &mut self,
        shape: ShapeId,
        name: String,
        size: u32,
    ) -> Result<u32, ShapeError> {
        if name.is_empty() {
            return Err(ShapeError::EmptyFieldName);
        }
        if self.has_field(&name) {
            return Err(ShapeError::DuplicateField(name));
        }
        let offset = self.size;
        let end = offset.checked_add(size).ok_or(ShapeError::SizeOverflow)?;
        self.fields.push(Field {
            offset,
            shape,
            name,
            size,
        });
        self.size = end;
        Ok(offset)
    }
}
