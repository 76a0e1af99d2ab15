use std::fmt;
use std::rc::Rc;

use dystruct_values::{Accessor, EnumAccessor, Primitive, StrideAccessor};
use tracing::trace;

use crate::compiled::CompiledType;

/// A raw instance of a [`CompiledType`], or a null one.
///
/// The buffer is exactly [`CompiledType::size_of`] bytes. Release it with
/// [`destroy_self`](Self::destroy_self) (or
/// [`CompiledType::destroy_instance`]) to run the destruct hooks; dropping a
/// non-null instance only frees the memory.
///
/// # Panics
///
/// The accessor methods index the buffer, so using them on a null instance
/// panics.
pub struct Instance {
    data: Option<Box<[u8]>>,
    ty: Rc<CompiledType>,
}

impl Instance {
    pub(crate) fn new(ty: Rc<CompiledType>, data: Option<Box<[u8]>>) -> Self {
        Self { data, ty }
    }

    /// The compiled type that created this instance.
    pub fn compiled_type(&self) -> &Rc<CompiledType> {
        &self.ty
    }

    pub fn data(&self) -> Option<&[u8]> {
        self.data.as_deref()
    }

    pub fn data_mut(&mut self) -> Option<&mut [u8]> {
        self.data.as_deref_mut()
    }

    pub fn is_null(&self) -> bool {
        self.data.is_none()
    }

    /// Detaches the buffer without running destruct hooks and hands it back.
    pub fn nullify(&mut self) -> Option<Box<[u8]>> {
        self.data.take()
    }

    /// Destroys this instance through the compiled type that created it.
    pub fn destroy_self(&mut self) {
        let ty = Rc::clone(&self.ty);
        ty.destroy_instance(self);
    }

    #[inline]
    pub fn get<T: Primitive>(&self, accessor: &Accessor<T>) -> T {
        self.check_owner(accessor.owner());
        accessor.get(self.bytes())
    }

    #[inline]
    pub fn set<T: Primitive>(&mut self, accessor: &Accessor<T>, value: T) {
        self.check_owner(accessor.owner());
        accessor.set(self.bytes_mut(), value);
    }

    #[inline]
    pub fn get_at<T: Primitive>(&self, accessor: &StrideAccessor<T>, index: usize) -> T {
        self.check_owner(accessor.owner());
        accessor.get(self.bytes(), index)
    }

    #[inline]
    pub fn set_at<T: Primitive>(&mut self, accessor: &StrideAccessor<T>, index: usize, value: T) {
        self.check_owner(accessor.owner());
        accessor.set(self.bytes_mut(), index, value);
    }

    pub fn get_enum(&self, accessor: &EnumAccessor) -> u32 {
        self.check_owner(accessor.owner());
        accessor.get(self.bytes())
    }

    pub fn set_enum(&mut self, accessor: &EnumAccessor, value: u32) {
        self.check_owner(accessor.owner());
        accessor.set(self.bytes_mut(), value);
    }

    fn bytes(&self) -> &[u8] {
        self.data.as_deref().unwrap_or_default()
    }

    fn bytes_mut(&mut self) -> &mut [u8] {
        self.data.as_deref_mut().unwrap_or_default()
    }

    #[inline]
    fn check_owner(&self, owner: u64) {
        debug_assert_eq!(
            owner,
            self.ty.serial(),
            "accessor built for another compiled type used on `{}`",
            self.ty.name()
        );
    }
}

impl fmt::Debug for Instance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Instance")
            .field("ty", &self.ty.name())
            .field("null", &self.is_null())
            .finish()
    }
}

impl Drop for Instance {
    fn drop(&mut self) {
        if let Some(data) = self.data.take() {
            trace!(
                ty = %self.ty.name(),
                size = data.len(),
                "dropping live instance without destruct hooks"
            );
        }
    }
}

#[cfg(test)]
#[path = "instance_test.rs"]
mod instance_test;
