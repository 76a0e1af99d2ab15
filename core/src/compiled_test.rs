//! Tests for accessor construction and the instance factory

use super::*;
use crate::TypeManager;
use crate::test_utils::init_test_logging;
use dystruct_types::{Basic, Family};
use dystruct_values::{Byte, WChar};
use pretty_assertions::assert_eq;

/// `Particle { id: I32, pos: V3 { x, y, z: F64 }, samples: [4:U16], kind: Kind }`
fn particle(mgr: &mut TypeManager) -> Rc<CompiledType> {
    let i32_ty = mgr.basic(Basic::I32);
    let f64_ty = mgr.basic(Basic::F64);
    let u16_ty = mgr.basic(Basic::U16);

    let v3 = mgr.aggregate();
    for name in ["x", "y", "z"] {
        mgr.add_field(v3, f64_ty, name).unwrap();
    }
    let samples = mgr.array(4, u16_ty).unwrap();
    let kind = mgr.enumeration();
    for name in ["electron", "proton", "neutron"] {
        mgr.add_enum_entry_auto(kind, name).unwrap();
    }

    let p = mgr.aggregate();
    mgr.add_field(p, i32_ty, "id").unwrap();
    mgr.add_field(p, v3, "pos").unwrap();
    mgr.add_field(p, samples, "samples").unwrap();
    mgr.add_field(p, kind, "kind").unwrap();
    mgr.compile(p, "Particle").unwrap()
}

#[test]
fn test_particle_layout() {
    let mut mgr = TypeManager::new();
    let ty = particle(&mut mgr);

    assert_eq!(ty.size_of(), 4 + 24 + 8 + 1);
    assert_eq!(
        ty.layout().to_string(),
        "<I32,<F64,F64,F64>,[4:U16],(electron:0,proton:1,neutron:2)>"
    );
}

#[test]
fn test_root_accessor() {
    let mut mgr = TypeManager::new();
    let u64_ty = mgr.basic(Basic::U64);
    let ty = mgr.compile(u64_ty, "U64").unwrap();

    let acc = ty.accessor::<u64>().unwrap();
    assert_eq!(acc.offset(), 0);
    assert_eq!(acc.owner(), ty.serial());

    assert_eq!(
        ty.accessor::<i64>().unwrap_err(),
        Error::KindMismatch {
            expected: Basic::I64,
            found: Basic::U64
        }
    );
    assert_eq!(
        ty.accessor_field::<u64>("x").unwrap_err(),
        Error::NotAnAggregate("U64".into())
    );
}

#[test]
fn test_field_accessors() {
    let mut mgr = TypeManager::new();
    let ty = particle(&mut mgr);

    assert_eq!(ty.accessor_field::<i32>("id").unwrap().offset(), 0);
    assert_eq!(ty.accessor_path::<f64>(&["pos", "x"]).unwrap().offset(), 4);
    assert_eq!(ty.accessor_path::<f64>(&["pos", "z"]).unwrap().offset(), 20);

    assert_eq!(
        ty.accessor_field::<i32>("mass").unwrap_err(),
        Error::UnknownField {
            ty: "Particle".into(),
            field: "mass".into()
        }
    );
    assert_eq!(
        ty.accessor_field::<u32>("id").unwrap_err(),
        Error::KindMismatch {
            expected: Basic::U32,
            found: Basic::I32
        }
    );
    assert_eq!(
        ty.accessor_field::<f64>("pos").unwrap_err(),
        Error::NotBasic {
            ty: "Particle.pos".into(),
            found: Family::DyStruct
        }
    );
    assert_eq!(
        ty.accessor_path::<f64>(&["pos", "w"]).unwrap_err(),
        Error::UnknownField {
            ty: "Particle.pos".into(),
            field: "w".into()
        }
    );
    assert_eq!(
        ty.accessor_path::<i32>(&["id", "low"]).unwrap_err(),
        Error::NotAnAggregate("Particle.id".into())
    );
    assert_eq!(
        ty.accessor::<i32>().unwrap_err(),
        Error::NotBasic {
            ty: "Particle".into(),
            found: Family::DyStruct
        }
    );
}

#[test]
fn test_array_accessors() {
    let mut mgr = TypeManager::new();
    let ty = particle(&mut mgr);

    let samples = ty.accessor_field_array::<u16>("samples").unwrap();
    assert_eq!(samples.offset(), 28);
    assert_eq!(samples.stride(), 2);
    assert_eq!(samples.len(), 4);

    assert_eq!(
        ty.accessor_field_array::<u8>("samples").unwrap_err(),
        Error::KindMismatch {
            expected: Basic::U8,
            found: Basic::U16
        }
    );
    assert_eq!(
        ty.accessor_field_array::<i32>("id").unwrap_err(),
        Error::NotAnArray("Particle.id".into())
    );
    assert_eq!(
        ty.accessor_array::<u16>().unwrap_err(),
        Error::NotAnArray("Particle".into())
    );
}

#[test]
fn test_array_of_aggregates_is_not_basic() {
    let mut mgr = TypeManager::new();
    let u8_ty = mgr.basic(Basic::U8);
    let pair = mgr.aggregate();
    mgr.add_field(pair, u8_ty, "a").unwrap();
    mgr.add_field(pair, u8_ty, "b").unwrap();
    let pairs = mgr.array(3, pair).unwrap();
    let ty = mgr.compile(pairs, "Pairs").unwrap();

    assert_eq!(
        ty.accessor_array::<u8>().unwrap_err(),
        Error::NotBasic {
            ty: "Pairs[]".into(),
            found: Family::DyStruct
        }
    );
}

#[test]
fn test_enum_accessor() {
    let mut mgr = TypeManager::new();
    let ty = particle(&mut mgr);

    let kind = ty.accessor_enum_field("kind").unwrap();
    assert_eq!(kind.offset(), 36);
    assert_eq!(kind.width(), Basic::U8);
    assert_eq!(
        ty.accessor_enum_field("id").unwrap_err(),
        Error::NotAnEnum("Particle.id".into())
    );
}

#[test]
fn test_enum_width_is_fixed_at_compile_time() {
    let mut mgr = TypeManager::new();
    let e = mgr.enumeration();
    mgr.add_enum_entry(e, "low", 1).unwrap();
    let holder = mgr.aggregate();
    mgr.add_field(holder, e, "e").unwrap();
    let narrow = mgr.compile(holder, "Narrow").unwrap();

    // Widening the enum afterwards does not change the compiled width.
    mgr.add_enum_entry(e, "high", 300).unwrap();
    assert_eq!(narrow.accessor_enum_field("e").unwrap().width(), Basic::U8);

    let wide_holder = mgr.aggregate();
    mgr.add_field(wide_holder, e, "e").unwrap();
    let wide = mgr.compile(wide_holder, "Wide").unwrap();
    assert_eq!(wide.accessor_enum_field("e").unwrap().width(), Basic::U16);
    assert_eq!(wide.size_of(), 2);

    // The old aggregate recorded a one-byte field and can no longer be frozen.
    assert!(matches!(
        mgr.compile(holder, "Stale"),
        Err(Error::Shape(dystruct_types::ShapeError::StaleField { .. }))
    ));
}

#[test]
fn test_newtype_accessors() {
    let mut mgr = TypeManager::new();
    let byte_ty = mgr.basic(Basic::Byte);
    let wchar_ty = mgr.basic(Basic::WChar);
    let rec = mgr.aggregate();
    mgr.add_field(rec, byte_ty, "b").unwrap();
    mgr.add_field(rec, wchar_ty, "w").unwrap();
    let ty = mgr.compile(rec, "Rec").unwrap();

    let b = ty.accessor_field::<Byte>("b").unwrap();
    let w = ty.accessor_field::<WChar>("w").unwrap();
    let mut inst = ty.create_instance();
    inst.set(&b, Byte(7));
    inst.set(&w, WChar::from('Ω'));
    assert_eq!(inst.get(&b), Byte(7));
    assert_eq!(inst.get(&w).to_char(), Some('Ω'));
    assert!(ty.accessor_field::<u8>("b").is_err());
    inst.destroy_self();
}

#[test]
fn test_create_and_destroy_instance() {
    init_test_logging();
    let mut mgr = TypeManager::new();
    let ty = particle(&mut mgr);

    let mut inst = ty.create_instance();
    assert!(!inst.is_null());
    assert!(Rc::ptr_eq(inst.compiled_type(), &ty));
    assert_eq!(inst.data(), Some(&[0u8; 37][..]));

    ty.destroy_instance(&mut inst);
    assert!(inst.is_null());

    // Destroying a null instance is a no-op.
    ty.destroy_instance(&mut inst);
    assert!(inst.is_null());
}

#[test]
fn test_zero_sized_instance() {
    let mut mgr = TypeManager::new();
    let empty = mgr.aggregate();
    let ty = mgr.compile(empty, "Empty").unwrap();

    assert_eq!(ty.size_of(), 0);
    let mut inst = ty.create_instance();
    assert!(!inst.is_null());
    assert_eq!(inst.data().map(<[u8]>::len), Some(0));
    inst.destroy_self();
    assert!(inst.is_null());
}

#[test]
#[cfg_attr(debug_assertions, should_panic(expected = "destroyed through"))]
fn test_destroy_through_wrong_type() {
    let mut mgr = TypeManager::new();
    let a = mgr.basic(Basic::U8);
    let a = mgr.compile(a, "A").unwrap();
    let b = mgr.basic(Basic::U8);
    let b = mgr.compile(b, "B").unwrap();

    let mut inst = a.create_instance();
    b.destroy_instance(&mut inst);
    // Release builds ignore the mismatched call.
    assert!(!inst.is_null());
}
