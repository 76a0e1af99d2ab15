use alloc::string::String;

use crate::ShapeId;

/// Failures while assembling, querying or freezing shapes.
///
/// Every operation that returns one of these leaves the arena exactly as it
/// was before the call.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ShapeError {
    #[error("shape {0} is not owned by this arena")]
    UnknownShape(ShapeId),

    #[error("shape {0} is not an enum")]
    NotAnEnum(ShapeId),

    #[error("shape {0} is not an aggregate")]
    NotAnAggregate(ShapeId),

    #[error("enum already has an entry named `{name}` or valued {value}")]
    DuplicateEntry { name: String, value: u32 },

    #[error("enum value would exceed u32::MAX")]
    EnumValueOverflow,

    #[error("field name is empty")]
    EmptyFieldName,

    #[error("aggregate already has a field named `{0}`")]
    DuplicateField(String),

    #[error("shape {field} contains aggregate {aggregate}; adding it as a field would be recursive")]
    RecursiveField { aggregate: ShapeId, field: ShapeId },

    #[error("shape {id} is still referenced by {dependents} other shape(s)")]
    ShapeInUse { id: ShapeId, dependents: u32 },

    #[error("shape size exceeds u32::MAX bytes")]
    SizeOverflow,

    #[error("field `{field}` was appended with {recorded} bytes but its shape is now {current} bytes")]
    StaleField {
        field: String,
        recorded: u32,
        current: u32,
    },

    #[error("memory block is {found} bytes but the layout needs {expected}")]
    BlockSize { expected: u32, found: usize },
}
