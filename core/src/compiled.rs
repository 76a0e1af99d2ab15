//! Compiled types: named, fingerprinted snapshots of a shape.
//!
//! A [`CompiledType`] never changes after [`TypeManager::compile`] builds it.
//! It owns a frozen [`Layout`], so destroying or editing the shapes it was
//! compiled from has no effect on it or on its instances.
//!
//! [`TypeManager::compile`]: crate::TypeManager::compile

use std::fmt;
use std::rc::Rc;

use dystruct_types::{Layout, LayoutKind};
use dystruct_values::{Accessor, EnumAccessor, Primitive, StrideAccessor};
use tracing::{debug, trace, warn};

use crate::error::{Error, Result};
use crate::instance::Instance;

pub struct CompiledType {
    name: String,
    size: u32,
    id: u32,
    serial: u64,
    layout: Layout,
}

impl fmt::Debug for CompiledType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CompiledType")
            .field("name", &self.name)
            .field("size", &self.size)
            .field("id", &format_args!("{:#010x}", self.id))
            .field("layout", &format_args!("{}", self.layout))
            .finish()
    }
}

impl CompiledType {
    pub(crate) fn new(name: String, id: u32, serial: u64, layout: Layout) -> Self {
        Self {
            name,
            size: layout.size_of(),
            id,
            serial,
            layout,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Bytes in one instance.
    pub fn size_of(&self) -> u32 {
        self.size
    }

    /// Structural identity: the one-at-a-time hash of the layout signature
    /// (`self.layout().to_string()`).
    pub fn id(&self) -> u32 {
        self.id
    }

    /// Serial number, unique across managers: the registry id in the high
    /// half, a per-registry count in the low half. Accessors remember it to
    /// catch cross-type use.
    pub fn serial(&self) -> u64 {
        self.serial
    }

    /// Id of the manager that compiled this type.
    pub(crate) fn registry(&self) -> u32 {
        (self.serial >> 32) as u32
    }

    pub fn layout(&self) -> &Layout {
        &self.layout
    }

    // === Instances ===

    /// Allocates a zeroed instance and runs the construct hooks over it.
    ///
    /// If a hook fails the buffer is released and a null instance, still bound
    /// to this type, is returned. Check [`Instance::is_null`].
    pub fn create_instance(self: &Rc<Self>) -> Instance {
        let mut data = vec![0u8; self.size as usize].into_boxed_slice();
        match self.layout.construct(&mut data) {
            Ok(()) => {
                trace!(ty = %self.name, size = self.size, "created instance");
                Instance::new(Rc::clone(self), Some(data))
            }
            // Unreachable for the built-in families: their hooks only fail on a
            // block of the wrong size, and this one is sized from the layout.
            Err(err) => {
                debug!(ty = %self.name, %err, "construct hook failed; returning null instance");
                Instance::new(Rc::clone(self), None)
            }
        }
    }

    /// Runs the destruct hooks over `instance`, frees it and leaves it null.
    ///
    /// `instance` must have been created by this type. That is asserted in
    /// debug builds; in release builds a mismatched call is logged and ignored.
    /// A null instance is left alone.
    pub fn destroy_instance(&self, instance: &mut Instance) {
        let bound = instance.compiled_type().serial == self.serial;
        debug_assert!(
            bound,
            "instance of `{}` destroyed through `{}`",
            instance.compiled_type().name,
            self.name
        );
        if !bound {
            warn!(
                ty = %self.name,
                instance_ty = %instance.compiled_type().name,
                "ignoring destroy_instance for an instance of another type"
            );
            return;
        }

        let Some(mut data) = instance.nullify() else {
            return;
        };
        if let Err(err) = self.layout.destruct(&mut data) {
            warn!(ty = %self.name, %err, "destruct hook failed");
        }
        trace!(ty = %self.name, size = self.size, "destroyed instance");
    }

    // === Accessors ===

    /// Accessor for a type whose root is the basic kind of `T`.
    pub fn accessor<T: Primitive>(&self) -> Result<Accessor<T>> {
        self.accessor_path(&[])
    }

    /// Accessor for the basic field `field` of an aggregate type.
    pub fn accessor_field<T: Primitive>(&self, field: &str) -> Result<Accessor<T>> {
        self.accessor_path(&[field])
    }

    /// Accessor for a basic field reached through nested aggregates.
    ///
    /// `accessor_path(&["pos", "x"])` reads field `x` of the aggregate field
    /// `pos`. The offsets along the path are summed once, here.
    pub fn accessor_path<T: Primitive>(&self, path: &[&str]) -> Result<Accessor<T>> {
        let (offset, layout, at) = self.resolve(path)?;
        expect_basic::<T>(layout, at)?;
        Ok(Accessor::new(offset, self.serial))
    }

    /// Accessor for a type whose root is an array of `T`.
    pub fn accessor_array<T: Primitive>(&self) -> Result<StrideAccessor<T>> {
        self.array_accessor(&[])
    }

    /// Accessor for the array field `field` of an aggregate type.
    pub fn accessor_field_array<T: Primitive>(&self, field: &str) -> Result<StrideAccessor<T>> {
        self.array_accessor(&[field])
    }

    /// Accessor for the enum field `field`, at the storage width fixed at compile time.
    pub fn accessor_enum_field(&self, field: &str) -> Result<EnumAccessor> {
        let (offset, layout, at) = self.resolve(&[field])?;
        match layout.kind() {
            LayoutKind::Enum { underlying, .. } => {
                Ok(EnumAccessor::new(offset, *underlying, self.serial))
            }
            _ => Err(Error::NotAnEnum(at)),
        }
    }

    fn array_accessor<T: Primitive>(&self, path: &[&str]) -> Result<StrideAccessor<T>> {
        let (offset, layout, at) = self.resolve(path)?;
        let LayoutKind::Array { count, element } = layout.kind() else {
            return Err(Error::NotAnArray(at));
        };
        expect_basic::<T>(element, format!("{at}[]"))?;
        Ok(StrideAccessor::new(
            offset,
            element.size_of() as usize,
            *count as usize,
            self.serial,
        ))
    }

    /// Walks `path` through nested aggregates. Returns the summed offset, the
    /// layout at the end of the path and its dotted name for error messages.
    fn resolve(&self, path: &[&str]) -> Result<(usize, &Layout, String)> {
        let mut offset = 0usize;
        let mut layout = &self.layout;
        let mut at = self.name.clone();

        for &name in path {
            if !matches!(layout.kind(), LayoutKind::Aggregate { .. }) {
                return Err(Error::NotAnAggregate(at));
            }
            let field = layout.field(name).ok_or_else(|| Error::UnknownField {
                ty: at.clone(),
                field: name.to_string(),
            })?;
            offset += field.offset as usize;
            layout = &*field.layout;
            at.push('.');
            at.push_str(name);
        }

        Ok((offset, layout, at))
    }
}

fn expect_basic<T: Primitive>(layout: &Layout, at: String) -> Result<()> {
    match layout.as_basic() {
        Some(found) if found == T::BASIC => Ok(()),
        Some(found) => Err(Error::KindMismatch {
            expected: T::BASIC,
            found,
        }),
        None => Err(Error::NotBasic {
            ty: at,
            found: layout.family(),
        }),
    }
}

#[cfg(test)]
#[path = "compiled_test.rs"]
mod compiled_test;
