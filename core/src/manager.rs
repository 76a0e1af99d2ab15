//! The type registry.
//!
//! A [`TypeManager`] owns every shape built through it and every type compiled
//! from those shapes. Each manager is independent: ids, names and compiled
//! types of one manager mean nothing to another.
//!
//! ```
//! use dystruct_core::TypeManager;
//! use dystruct_types::Basic;
//!
//! let mut mgr = TypeManager::new();
//! let u64_ty = mgr.basic(Basic::U64);
//! let v3 = mgr.aggregate();
//! for name in ["x", "y", "z"] {
//!     mgr.add_field(v3, u64_ty, name).unwrap();
//! }
//!
//! let ty = mgr.compile(v3, "V3").unwrap();
//! assert_eq!(ty.size_of(), 24);
//! assert!(mgr.compile(v3, "V3").is_err());
//! ```

use std::rc::Rc;
use std::sync::atomic::{AtomicU32, Ordering};

use dystruct_types::{Basic, Layout, Shape, ShapeArena, ShapeId};
use hashbrown::HashMap;
use tracing::{debug, trace};

use crate::compiled::CompiledType;
use crate::error::{Error, Result};
use crate::options::TypeManagerOptions;

/// Only registry ids are process-wide; compiled-type serials are counted per
/// manager and carry the registry id in their high half.
static NEXT_REGISTRY: AtomicU32 = AtomicU32::new(1);

pub struct TypeManager {
    id: u32,
    next_local: u32,
    shapes: ShapeArena,
    compiled: HashMap<String, Rc<CompiledType>>,
}

impl Default for TypeManager {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for TypeManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TypeManager")
            .field("id", &self.id)
            .field("shapes", &self.shapes.len())
            .field("compiled", &self.compiled.len())
            .finish()
    }
}

impl TypeManager {
    pub fn new() -> Self {
        Self::with_options(TypeManagerOptions::default())
    }

    pub fn with_options(options: TypeManagerOptions) -> Self {
        Self {
            id: NEXT_REGISTRY.fetch_add(1, Ordering::Relaxed),
            next_local: 0,
            shapes: ShapeArena::with_capacity(options.shape_capacity),
            compiled: HashMap::with_capacity(options.name_capacity),
        }
    }

    // === Shapes ===

    /// Takes ownership of `shape`. Fails if it refers to a shape not owned here.
    pub fn create_shape(&mut self, shape: Shape) -> Result<ShapeId> {
        let family = shape.family();
        let id = self.shapes.insert(shape)?;
        trace!(%id, %family, "created shape");
        Ok(id)
    }

    pub fn basic(&mut self, basic: Basic) -> ShapeId {
        let id = self.shapes.insert_basic(basic);
        trace!(%id, %basic, "created shape");
        id
    }

    /// A new, empty enum.
    pub fn enumeration(&mut self) -> ShapeId {
        let id = self.shapes.insert_enum();
        trace!(%id, "created enum shape");
        id
    }

    pub fn array(&mut self, count: u32, element: ShapeId) -> Result<ShapeId> {
        let id = self.shapes.insert_array(count, element)?;
        trace!(%id, count, %element, "created array shape");
        Ok(id)
    }

    /// A new aggregate with no fields.
    pub fn aggregate(&mut self) -> ShapeId {
        let id = self.shapes.insert_aggregate();
        trace!(%id, "created aggregate shape");
        id
    }

    pub fn add_enum_entry(&mut self, id: ShapeId, name: &str, value: u32) -> Result<()> {
        Ok(self.shapes.add_enum_entry(id, name, value)?)
    }

    /// Adds `name` with the next free value and returns that value.
    pub fn add_enum_entry_auto(&mut self, id: ShapeId, name: &str) -> Result<u32> {
        Ok(self.shapes.add_enum_entry_auto(id, name)?)
    }

    /// Appends a field to an aggregate and returns its offset.
    pub fn add_field(&mut self, aggregate: ShapeId, field: ShapeId, name: &str) -> Result<u32> {
        Ok(self.shapes.add_field(aggregate, field, name)?)
    }

    /// Destroys a shape. Compiled types built from it are unaffected.
    pub fn destroy_shape(&mut self, id: ShapeId) -> Result<()> {
        let shape = self.shapes.remove(id)?;
        trace!(%id, family = %shape.family(), "destroyed shape");
        Ok(())
    }

    pub fn has_shape(&self, id: ShapeId) -> bool {
        self.shapes.contains(id)
    }

    pub fn shape(&self, id: ShapeId) -> Option<&Shape> {
        self.shapes.get(id)
    }

    /// Read access to every shape, including the size queries.
    pub fn shapes(&self) -> &ShapeArena {
        &self.shapes
    }

    pub fn structural_id(&self, id: ShapeId) -> Result<u32> {
        Ok(self.shapes.structural_id(id)?)
    }

    // === Compiled types ===

    /// Compiles `shape` under `name`.
    ///
    /// Fails without changing anything if `name` is taken or the shape cannot
    /// be frozen.
    pub fn compile(&mut self, shape: ShapeId, name: &str) -> Result<Rc<CompiledType>> {
        if self.compiled.contains_key(name) {
            return Err(Error::DuplicateName(name.to_string()));
        }
        let layout = self.shapes.freeze(shape)?;
        let id = self.shapes.structural_id(shape)?;

        self.next_local = self.next_local.wrapping_add(1);
        let serial = (u64::from(self.id) << 32) | u64::from(self.next_local);
        let ty = Rc::new(CompiledType::new(name.to_string(), id, serial, layout));
        debug!(name, size = ty.size_of(), id, "compiled type");
        self.compiled.insert(name.to_string(), Rc::clone(&ty));
        Ok(ty)
    }

    /// Unregisters `ty`. Instances and clones of the handle stay usable.
    pub fn destroy_compiled_type(&mut self, ty: &CompiledType) -> Result<()> {
        if !self.has_compiled_type(ty) {
            return Err(Error::NotOwned(ty.name().to_string()));
        }
        self.compiled.remove(ty.name());
        debug!(name = ty.name(), "destroyed compiled type");
        Ok(())
    }

    /// Whether `ty` is the type currently registered here under its name.
    pub fn has_compiled_type(&self, ty: &CompiledType) -> bool {
        ty.registry() == self.id
            && self
                .compiled
                .get(ty.name())
                .is_some_and(|registered| registered.serial() == ty.serial())
    }

    pub fn compiled_type(&self, name: &str) -> Option<Rc<CompiledType>> {
        self.compiled.get(name).cloned()
    }

    /// The layout compiled under `name`.
    pub fn shape_of(&self, name: &str) -> Option<&Layout> {
        self.compiled.get(name).map(|ty| ty.layout())
    }

    /// Destroys every compiled type, then every shape.
    pub fn clear(&mut self) {
        let compiled = self.compiled.len();
        let shapes = self.shapes.len();
        self.compiled.clear();
        self.shapes.clear();
        debug!(compiled, shapes, "cleared type manager");
    }

    pub fn len_shapes(&self) -> usize {
        self.shapes.len()
    }

    pub fn len_compiled(&self) -> usize {
        self.compiled.len()
    }

    /// Registered names, in no particular order.
    pub fn names(&self) -> impl Iterator<Item = &str> + '_ {
        self.compiled.keys().map(String::as_str)
    }
}

#[cfg(test)]
#[path = "manager_test.rs"]
mod manager_test;
