//! dystruct - struct layouts decided at run time
//!
//! # Overview
//!
//! dystruct builds type shapes (basic scalars, enumerations, fixed arrays and
//! densely packed aggregates) at run time, compiles them into named,
//! structurally fingerprinted types, and allocates raw instances whose fields
//! are read and written through accessors that cost about as much as native
//! field access.
//!
//! # Quick Start
//!
//! ```
//! use dystruct::{Basic, TypeManager};
//!
//! let mut mgr = TypeManager::new();
//!
//! // Assemble V3 { x, y, z: U64 }
//! let u64_ty = mgr.basic(Basic::U64);
//! let v3 = mgr.aggregate();
//! for name in ["x", "y", "z"] {
//!     mgr.add_field(v3, u64_ty, name).unwrap();
//! }
//!
//! // Compile it and build accessors once
//! let ty = mgr.compile(v3, "V3").unwrap();
//! let x = ty.accessor_field::<u64>("x").unwrap();
//! let z = ty.accessor_field::<u64>("z").unwrap();
//!
//! // Use them on any number of instances
//! let mut inst = ty.create_instance();
//! inst.set(&x, 42);
//! inst.set(&z, 105);
//! assert_eq!(inst.get(&x) + inst.get(&z), 147);
//! inst.destroy_self();
//! assert!(inst.is_null());
//! ```
//!
//! # Identity
//!
//! A compiled type's [`id`](CompiledType::id) is the one-at-a-time hash of its
//! signature. Field names are not part of it; field order is.
//!
//! ```
//! use dystruct::{Basic, TypeManager, hasher::one_at_a_time};
//!
//! let mut mgr = TypeManager::new();
//! let u8_ty = mgr.basic(Basic::U8);
//! let arr = mgr.array(4, u8_ty).unwrap();
//! let ty = mgr.compile(arr, "Quad").unwrap();
//!
//! assert_eq!(ty.layout().to_string(), "[4:U8]");
//! assert_eq!(ty.id(), one_at_a_time(b"[4:U8]"));
//! ```

pub use dystruct_core::{CompiledType, Error, Instance, Result, TypeManager, TypeManagerOptions};
pub use dystruct_types::{
    AggregateShape, ArrayShape, Basic, EnumEntry, EnumShape, Family, Field, FieldLayout, Layout,
    LayoutKind, Shape, ShapeArena, ShapeError, ShapeId, hasher,
};
pub use dystruct_values::{Accessor, Byte, Char, EnumAccessor, Primitive, StrideAccessor, WChar};
