//! Ownership of shapes.
//!
//! The arena is the single owner of every shape of one registry. Arrays and
//! aggregates refer to their constituents by [`ShapeId`], and every slot counts
//! how many other shapes refer to it, so destroying a shape that is still in
//! use is refused instead of leaving dangling references behind.

use alloc::rc::Rc;
use alloc::string::String;
use alloc::vec;
use alloc::vec::Vec;

use crate::core::{ArrayShape, AggregateShape, Basic, EnumShape, Family, Shape, ShapeId};
use crate::error::ShapeError;
use crate::hasher::Hasher;
use crate::layout::{FieldLayout, Layout};

#[derive(Debug, Clone)]
struct Entry {
    shape: Shape,
    /// Number of live shapes whose children include this one.
    dependents: u32,
}

#[derive(Debug, Clone)]
struct Slot {
    generation: u32,
    entry: Option<Entry>,
}

/// Owner of a graph of shapes addressed by [`ShapeId`].
///
/// # Example
///
/// ```
/// use dystruct_types::{Basic, Shape, ShapeArena};
///
/// let mut arena = ShapeArena::new();
/// let u64_ty = arena.insert(Shape::Basic(Basic::U64)).unwrap();
/// let v3 = arena.insert_aggregate();
/// for name in ["x", "y", "z"] {
///     arena.add_field(v3, u64_ty, name).unwrap();
/// }
///
/// assert_eq!(arena.size_of(v3), Ok(24));
/// assert_eq!(arena.freeze(v3).unwrap().to_string(), "<U64,U64,U64>");
/// ```
#[derive(Debug, Clone, Default)]
pub struct ShapeArena {
    slots: Vec<Slot>,
    free: Vec<u32>,
    len: usize,
}

impl ShapeArena {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            slots: Vec::with_capacity(capacity),
            free: Vec::new(),
            len: 0,
        }
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn contains(&self, id: ShapeId) -> bool {
        self.entry(id).is_ok()
    }

    pub fn get(&self, id: ShapeId) -> Option<&Shape> {
        self.entry(id).ok().map(|e| &e.shape)
    }

    /// Like [`get`](Self::get), but reports a missing shape as an error.
    pub fn shape(&self, id: ShapeId) -> Result<&Shape, ShapeError> {
        self.entry(id).map(|e| &e.shape)
    }

    /// How many live shapes refer to `id`.
    pub fn dependents(&self, id: ShapeId) -> Option<u32> {
        self.entry(id).ok().map(|e| e.dependents)
    }

    pub fn iter(&self) -> impl Iterator<Item = (ShapeId, &Shape)> + '_ {
        self.slots.iter().enumerate().filter_map(|(index, slot)| {
            let entry = slot.entry.as_ref()?;
            let id = ShapeId {
                index: index as u32,
                generation: slot.generation,
            };
            Some((id, &entry.shape))
        })
    }

    /// Takes ownership of `shape`. Every shape it refers to must be owned here.
    pub fn insert(&mut self, shape: Shape) -> Result<ShapeId, ShapeError> {
        if let Some(missing) = shape.children().find(|&child| !self.contains(child)) {
            return Err(ShapeError::UnknownShape(missing));
        }
        let children: Vec<ShapeId> = shape.children().collect();
        for child in children {
            self.entry_mut(child)?.dependents += 1;
        }

        Ok(self.push(shape))
    }

    pub fn insert_basic(&mut self, basic: Basic) -> ShapeId {
        self.insert_leaf(Shape::Basic(basic))
    }

    pub fn insert_enum(&mut self) -> ShapeId {
        self.insert_leaf(Shape::Enum(EnumShape::new()))
    }

    pub fn insert_array(&mut self, count: u32, element: ShapeId) -> Result<ShapeId, ShapeError> {
        self.insert(Shape::Array(ArrayShape { count, element }))
    }

    pub fn insert_aggregate(&mut self) -> ShapeId {
        self.insert_leaf(Shape::Aggregate(AggregateShape::new()))
    }

    fn insert_leaf(&mut self, shape: Shape) -> ShapeId {
        debug_assert_eq!(shape.children().count(), 0);
        self.push(shape)
    }

    fn push(&mut self, shape: Shape) -> ShapeId {
        let entry = Entry {
            shape,
            dependents: 0,
        };
        self.len += 1;
        match self.free.pop() {
            Some(index) => {
                let slot = &mut self.slots[index as usize];
                slot.entry = Some(entry);
                ShapeId {
                    index,
                    generation: slot.generation,
                }
            }
            None => {
                let index = self.slots.len() as u32;
                self.slots.push(Slot {
                    generation: 0,
                    entry: Some(entry),
                });
                ShapeId {
                    index,
                    generation: 0,
                }
            }
        }
    }

    /// Destroys `id` and returns its shape. Refused while another shape refers to it.
    pub fn remove(&mut self, id: ShapeId) -> Result<Shape, ShapeError> {
        let dependents = self.entry(id)?.dependents;
        if dependents > 0 {
            return Err(ShapeError::ShapeInUse { id, dependents });
        }
        let shape = self.take(id.index).ok_or(ShapeError::UnknownShape(id))?;
        for child in shape.children() {
            if let Ok(entry) = self.entry_mut(child) {
                entry.dependents = entry.dependents.saturating_sub(1);
            }
        }
        Ok(shape)
    }

    /// Destroys every shape. Outstanding ids become stale rather than aliasing new shapes.
    pub fn clear(&mut self) {
        for index in 0..self.slots.len() as u32 {
            self.take(index);
        }
    }

    fn take(&mut self, index: u32) -> Option<Shape> {
        let slot = self.slots.get_mut(index as usize)?;
        let entry = slot.entry.take()?;
        slot.generation = slot.generation.wrapping_add(1);
        self.free.push(index);
        self.len -= 1;
        Some(entry.shape)
    }

    fn entry(&self, id: ShapeId) -> Result<&Entry, ShapeError> {
        self.slots
            .get(id.index as usize)
            .filter(|slot| slot.generation == id.generation)
            .and_then(|slot| slot.entry.as_ref())
            .ok_or(ShapeError::UnknownShape(id))
    }

    fn entry_mut(&mut self, id: ShapeId) -> Result<&mut Entry, ShapeError> {
        self.slots
            .get_mut(id.index as usize)
            .filter(|slot| slot.generation == id.generation)
            .and_then(|slot| slot.entry.as_mut())
            .ok_or(ShapeError::UnknownShape(id))
    }

    // === Editing ===

    pub fn enum_mut(&mut self, id: ShapeId) -> Result<&mut EnumShape, ShapeError> {
        match &mut self.entry_mut(id)?.shape {
            Shape::Enum(e) => Ok(e),
            _ => Err(ShapeError::NotAnEnum(id)),
        }
    }

    pub fn add_enum_entry(
        &mut self,
        id: ShapeId,
        name: impl Into<String>,
        value: u32,
    ) -> Result<(), ShapeError> {
        self.enum_mut(id)?.add_entry(name, value)
    }

    pub fn add_enum_entry_auto(
        &mut self,
        id: ShapeId,
        name: impl Into<String>,
    ) -> Result<u32, ShapeError> {
        self.enum_mut(id)?.add_entry_auto(name)
    }

    /// Appends field `name` of shape `field` to `aggregate` and returns its offset.
    ///
    /// The offset is the aggregate's size before the call; the aggregate then
    /// grows by the field's current size.
    pub fn add_field(
        &mut self,
        aggregate: ShapeId,
        field: ShapeId,
        name: impl Into<String>,
    ) -> Result<u32, ShapeError> {
        if !self.shape(aggregate)?.is_aggregate() {
            return Err(ShapeError::NotAnAggregate(aggregate));
        }
        if self.reaches(field, aggregate)? {
            return Err(ShapeError::RecursiveField { aggregate, field });
        }
        let size = self.size_of(field)?;

        let Shape::Aggregate(agg) = &mut self.entry_mut(aggregate)?.shape else {
            return Err(ShapeError::NotAnAggregate(aggregate));
        };
        let offset = agg.push_field(field, name.into(), size)?;
        self.entry_mut(field)?.dependents += 1;
        Ok(offset)
    }

    /// Whether `target` is `from` or is reachable from it. Each shape is
    /// visited at most once, however many paths lead to it.
    fn reaches(&self, from: ShapeId, target: ShapeId) -> Result<bool, ShapeError> {
        let mut seen = vec![false; self.slots.len()];
        let mut stack = Vec::from([from]);
        while let Some(id) = stack.pop() {
            if id == target {
                return Ok(true);
            }
            match seen.get_mut(id.index as usize) {
                Some(true) => continue,
                Some(visited) => *visited = true,
                None => return Err(ShapeError::UnknownShape(id)),
            }
            stack.extend(self.shape(id)?.children());
        }
        Ok(false)
    }

    // === Metrics ===

    pub fn family(&self, id: ShapeId) -> Result<Family, ShapeError> {
        Ok(self.shape(id)?.family())
    }

    pub fn elem_count(&self, id: ShapeId) -> Result<u32, ShapeError> {
        Ok(match self.shape(id)? {
            Shape::Array(a) => a.count,
            Shape::Basic(_) | Shape::Enum(_) | Shape::Aggregate(_) => 1,
        })
    }

    pub fn elem_size(&self, id: ShapeId) -> Result<u32, ShapeError> {
        match self.shape(id)? {
            Shape::Basic(b) => Ok(b.size()),
            Shape::Enum(e) => Ok(e.size_of()),
            Shape::Array(a) => self.size_of(a.element),
            Shape::Aggregate(a) => Ok(a.size_of()),
        }
    }

    pub fn size_of(&self, id: ShapeId) -> Result<u32, ShapeError> {
        match self.shape(id)? {
            Shape::Array(a) => a
                .count
                .checked_mul(self.size_of(a.element)?)
                .ok_or(ShapeError::SizeOverflow),
            _ => self.elem_size(id),
        }
    }

    pub fn footprint(&self, id: ShapeId) -> Result<u32, ShapeError> {
        match self.shape(id)? {
            Shape::Basic(b) => Ok(b.size()),
            Shape::Enum(e) => Ok(e.size_of()),
            Shape::Array(a) => a
                .count
                .checked_mul(self.footprint(a.element)?)
                .ok_or(ShapeError::SizeOverflow),
            Shape::Aggregate(a) => a.fields().iter().try_fold(0u32, |total, f| {
                total
                    .checked_add(self.footprint(f.shape)?)
                    .ok_or(ShapeError::SizeOverflow)
            }),
        }
    }

    pub fn is_fixed_footprint(&self, id: ShapeId) -> Result<bool, ShapeError> {
        match self.shape(id)? {
            Shape::Basic(_) | Shape::Enum(_) => Ok(true),
            Shape::Array(a) => self.is_fixed_footprint(a.element),
            Shape::Aggregate(a) => {
                for f in a.fields() {
                    if !self.is_fixed_footprint(f.shape)? {
                        return Ok(false);
                    }
                }
                Ok(true)
            }
        }
    }

    // === Identity ===

    /// Feeds the structural signature of `id` into `hasher`.
    ///
    /// Depends only on kinds, counts, enum entries and field order; field names
    /// are left out so fields can be renamed without changing identity.
    pub fn update_hash(&self, id: ShapeId, hasher: &mut Hasher) -> Result<(), ShapeError> {
        match self.shape(id)? {
            Shape::Basic(b) => hasher.update_str(b.name()),
            Shape::Enum(e) => {
                hasher.update_str("(");
                for (i, entry) in e.entries().iter().enumerate() {
                    if i > 0 {
                        hasher.update_str(",");
                    }
                    hasher.update_str(&entry.name);
                    hasher.update_str(":");
                    hasher.update_unsigned(entry.value);
                }
                hasher.update_str(")");
            }
            Shape::Array(a) => {
                hasher.update_str("[");
                hasher.update_unsigned(a.count);
                hasher.update_str(":");
                self.update_hash(a.element, hasher)?;
                hasher.update_str("]");
            }
            Shape::Aggregate(a) => {
                hasher.update_str("<");
                for (i, field) in a.fields().iter().enumerate() {
                    if i > 0 {
                        hasher.update_str(",");
                    }
                    self.update_hash(field.shape, hasher)?;
                }
                hasher.update_str(">");
            }
        }
        Ok(())
    }

    /// The 32-bit structural identity of `id`.
    pub fn structural_id(&self, id: ShapeId) -> Result<u32, ShapeError> {
        let mut hasher = Hasher::new();
        self.update_hash(id, &mut hasher)?;
        Ok(hasher.finalize_and_reset())
    }

    /// Takes an owned snapshot of the graph rooted at `id`.
    ///
    /// Fails with [`ShapeError::StaleField`] when a field's shape has changed
    /// size since it was appended (an enum that grew wider, say), because the
    /// recorded offsets would then overlap.
    ///
    /// A shape reached through several paths is frozen once and its layout is
    /// shared by every parent.
    pub fn freeze(&self, id: ShapeId) -> Result<Layout, ShapeError> {
        let mut frozen = vec![None; self.slots.len()];
        let layout = self.freeze_shared(id, &mut frozen)?;
        Ok(Rc::unwrap_or_clone(layout))
    }

    fn freeze_shared(
        &self,
        id: ShapeId,
        frozen: &mut [Option<Rc<Layout>>],
    ) -> Result<Rc<Layout>, ShapeError> {
        if let Some(Some(layout)) = frozen.get(id.index as usize) {
            return Ok(Rc::clone(layout));
        }
        let layout = Rc::new(self.freeze_node(id, frozen)?);
        if let Some(slot) = frozen.get_mut(id.index as usize) {
            *slot = Some(Rc::clone(&layout));
        }
        Ok(layout)
    }

    fn freeze_node(
        &self,
        id: ShapeId,
        frozen: &mut [Option<Rc<Layout>>],
    ) -> Result<Layout, ShapeError> {
        match self.shape(id)? {
            Shape::Basic(b) => Ok(Layout::basic(*b)),
            Shape::Enum(e) => Ok(Layout::enumeration(e)),
            Shape::Array(a) => Layout::array(a.count, self.freeze_shared(a.element, frozen)?),
            Shape::Aggregate(a) => {
                let mut fields = Vec::with_capacity(a.field_count());
                for f in a.fields() {
                    let layout = self.freeze_shared(f.shape, frozen)?;
                    if layout.size_of() != f.size {
                        return Err(ShapeError::StaleField {
                            field: f.name.clone(),
                            recorded: f.size,
                            current: layout.size_of(),
                        });
                    }
                    fields.push(FieldLayout {
                        name: f.name.clone(),
                        offset: f.offset,
                        layout,
                    });
                }
                Ok(Layout::aggregate(fields, a.size_of()))
            }
        }
    }
}
