/// Construction options for a [`TypeManager`](crate::TypeManager).
///
/// Both capacities are hints; the manager grows past them as needed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TypeManagerOptions {
    /// Shapes to reserve room for up front.
    pub shape_capacity: usize,
    /// Compiled type names to reserve room for up front.
    pub name_capacity: usize,
}

impl Default for TypeManagerOptions {
    fn default() -> Self {
        Self {
            shape_capacity: 64,
            name_capacity: 16,
        }
    }
}
