//! Frozen layouts.
//!
//! A [`Layout`] is an owned, immutable snapshot of a shape graph, taken when a
//! shape is compiled. It carries everything instance management needs (sizes,
//! field offsets, construct/destruct hooks) without referring back to the
//! arena, so later edits to, or destruction of, the source shapes never
//! affect it.
//!
//! The `Display` form of a layout is its signature: the exact text whose
//! one-at-a-time hash is the structural identity. Enum entry names are hashed
//! as C strings, so the signature prints them only up to the first NUL.
//!
//! Sub-layouts are shared through [`Rc`], so a shape reached along many paths
//! is stored once. The signature is still as long as the fully expanded tree.

use alloc::rc::Rc;
use alloc::string::String;
use alloc::vec::Vec;
use core::fmt;

use crate::core::{Basic, EnumEntry, EnumShape, Family};
use crate::error::ShapeError;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Layout {
    kind: LayoutKind,
    size: u32,
    /// No hook in this subtree does anything.
    trivial: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LayoutKind {
    Basic(Basic),
    Enum {
        /// Storage width at the time of compilation.
        underlying: Basic,
        entries: Vec<EnumEntry>,
    },
    Array {
        count: u32,
        element: Rc<Layout>,
    },
    Aggregate {
        fields: Vec<FieldLayout>,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldLayout {
    pub name: String,
    pub offset: u32,
    pub layout: Rc<Layout>,
}

impl FieldLayout {
    fn range(&self) -> core::ops::Range<usize> {
        let start = self.offset as usize;
        start..start + self.layout.size as usize
    }
}

impl Layout {
    pub(crate) fn basic(basic: Basic) -> Self {
        Self {
            kind: LayoutKind::Basic(basic),
            size: basic.size(),
            trivial: true,
        }
    }

    pub(crate) fn enumeration(shape: &EnumShape) -> Self {
        let underlying = shape.underlying();
        Self {
            kind: LayoutKind::Enum {
                underlying,
                entries: shape.entries().to_vec(),
            },
            size: underlying.size(),
            trivial: true,
        }
    }

    pub(crate) fn array(count: u32, element: Rc<Layout>) -> Result<Self, ShapeError> {
        let size = count
            .checked_mul(element.size)
            .ok_or(ShapeError::SizeOverflow)?;
        let trivial = element.trivial;
        Ok(Self {
            kind: LayoutKind::Array {
                count,
                element,
            },
            size,
            trivial,
        })
    }

    pub(crate) fn aggregate(fields: Vec<FieldLayout>, size: u32) -> Self {
        let trivial = fields.iter().all(|f| f.layout.trivial);
        Self {
            kind: LayoutKind::Aggregate { fields },
            size,
            trivial,
        }
    }

    pub fn kind(&self) -> &LayoutKind {
        &self.kind
    }

    pub fn family(&self) -> Family {
        match self.kind {
            LayoutKind::Basic(_) => Family::Basic,
            LayoutKind::Enum { .. } => Family::Enum,
            LayoutKind::Array { .. } => Family::Array,
            LayoutKind::Aggregate { .. } => Family::DyStruct,
        }
    }

    pub fn size_of(&self) -> u32 {
        self.size
    }

    /// Total extent of the data; equal to [`size_of`](Self::size_of) because no
    /// layout holds out-of-line storage.
    pub fn footprint(&self) -> u32 {
        self.size
    }

    pub fn elem_count(&self) -> u32 {
        match self.kind {
            LayoutKind::Array { count, .. } => count,
            _ => 1,
        }
    }

    pub fn elem_size(&self) -> u32 {
        match &self.kind {
            LayoutKind::Array { element, .. } => element.size,
            _ => self.size,
        }
    }

    pub fn is_fixed_footprint(&self) -> bool {
        match &self.kind {
            LayoutKind::Basic(_) | LayoutKind::Enum { .. } => true,
            LayoutKind::Array { element, .. } => element.is_fixed_footprint(),
            LayoutKind::Aggregate { fields } => {
                fields.iter().all(|f| f.layout.is_fixed_footprint())
            }
        }
    }

    /// True when construct/destruct do nothing for this layout.
    pub fn is_trivial(&self) -> bool {
        self.trivial
    }

    pub fn as_basic(&self) -> Option<Basic> {
        match self.kind {
            LayoutKind::Basic(b) => Some(b),
            _ => None,
        }
    }

    pub fn fields(&self) -> &[FieldLayout] {
        match &self.kind {
            LayoutKind::Aggregate { fields } => fields,
            _ => &[],
        }
    }

    pub fn field(&self, name: &str) -> Option<&FieldLayout> {
        self.fields().iter().find(|f| f.name == name)
    }

    /// Runs construct hooks over `mem`, outermost first, fields in declaration order.
    pub fn construct(&self, mem: &mut [u8]) -> Result<(), ShapeError> {
        match &self.kind {
            LayoutKind::Basic(_) | LayoutKind::Enum { .. } => Ok(()),
            LayoutKind::Array { count, element } => {
                self.check_block(mem.len())?;
                if element.trivial {
                    return Ok(());
                }
                if element.size == 0 {
                    for _ in 0..*count {
                        element.construct(&mut [])?;
                    }
                    return Ok(());
                }
                for chunk in mem.chunks_exact_mut(element.size as usize) {
                    element.construct(chunk)?;
                }
                Ok(())
            }
            LayoutKind::Aggregate { fields } => {
                self.check_block(mem.len())?;
                for field in fields {
                    let found = mem.len();
                    let sub = mem.get_mut(field.range()).ok_or(ShapeError::BlockSize {
                        expected: field.offset + field.layout.size,
                        found,
                    })?;
                    field.layout.construct(sub)?;
                }
                Ok(())
            }
        }
    }

    /// Runs destruct hooks over `mem`, in the reverse order of [`construct`](Self::construct).
    pub fn destruct(&self, mem: &mut [u8]) -> Result<(), ShapeError> {
        match &self.kind {
            LayoutKind::Basic(_) | LayoutKind::Enum { .. } => Ok(()),
            LayoutKind::Array { count, element } => {
                self.check_block(mem.len())?;
                if element.trivial {
                    return Ok(());
                }
                if element.size == 0 {
                    for _ in 0..*count {
                        element.destruct(&mut [])?;
                    }
                    return Ok(());
                }
                for chunk in mem.chunks_exact_mut(element.size as usize).rev() {
                    element.destruct(chunk)?;
                }
                Ok(())
            }
            LayoutKind::Aggregate { fields } => {
                self.check_block(mem.len())?;
                for field in fields.iter().rev() {
                    let found = mem.len();
                    let sub = mem.get_mut(field.range()).ok_or(ShapeError::BlockSize {
                        expected: field.offset + field.layout.size,
                        found,
                    })?;
                    field.layout.destruct(sub)?;
                }
                Ok(())
            }
        }
    }

    fn check_block(&self, len: usize) -> Result<(), ShapeError> {
        if len != self.size as usize {
            return Err(ShapeError::BlockSize {
                expected: self.size,
                found: len,
            });
        }
        Ok(())
    }
}

impl fmt::Display for Layout {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.kind {
            LayoutKind::Basic(b) => f.write_str(b.name()),
            LayoutKind::Enum { entries, .. } => {
                f.write_str("(")?;
                for (i, e) in entries.iter().enumerate() {
                    if i > 0 {
                        f.write_str(",")?;
                    }
                    let name = e.name.split('\0').next().unwrap_or_default();
                    write!(f, "{name}:{}", e.value)?;
                }
                f.write_str(")")
            }
            LayoutKind::Array { count, element } => write!(f, "[{count}:{element}]"),
            LayoutKind::Aggregate { fields } => {
                f.write_str("<")?;
                for (i, field) in fields.iter().enumerate() {
                    if i > 0 {
                        f.write_str(",")?;
                    }
                    write!(f, "{}", field.layout)?;
                }
                f.write_str(">")
            }
        }
    }
}
