use super::*;
use crate::TypeManager;
use dystruct_types::Basic;
use pretty_assertions::assert_eq;

fn vec3_type(mgr: &mut TypeManager) -> Rc<CompiledType> {
    let u64_ty = mgr.basic(Basic::U64);
    let v3 = mgr.aggregate();
    for name in ["x", "y", "z"] {
        mgr.add_field(v3, u64_ty, name).unwrap();
    }
    mgr.compile(v3, "V3").unwrap()
}

#[test]
fn test_single_u64() {
    let mut mgr = TypeManager::new();
    let u64_ty = mgr.basic(Basic::U64);
    let ty = mgr.compile(u64_ty, "U64").unwrap();
    let acc = ty.accessor::<u64>().unwrap();

    let mut inst = ty.create_instance();
    inst.set(&acc, 42);
    assert_eq!(inst.get(&acc), 42);
    assert_eq!(inst.data(), Some(&42u64.to_ne_bytes()[..]));
    inst.destroy_self();
}

#[test]
fn test_vec3_fields() {
    let mut mgr = TypeManager::new();
    let ty = vec3_type(&mut mgr);
    let x = ty.accessor_field::<u64>("x").unwrap();
    let y = ty.accessor_field::<u64>("y").unwrap();
    let z = ty.accessor_field::<u64>("z").unwrap();

    let mut inst = ty.create_instance();
    inst.set(&x, 42);
    inst.set(&y, 69);
    inst.set(&z, 105);

    assert_eq!((inst.get(&x), inst.get(&y), inst.get(&z)), (42, 69, 105));
    ty.destroy_instance(&mut inst);
    assert!(inst.is_null());
}

#[test]
fn test_accessor_reused_across_instances() {
    let mut mgr = TypeManager::new();
    let ty = vec3_type(&mut mgr);
    let y = ty.accessor_field::<u64>("y").unwrap();

    let mut instances: Vec<Instance> = (0..10).map(|_| ty.create_instance()).collect();
    for (i, inst) in instances.iter_mut().enumerate() {
        inst.set(&y, i as u64 * 100);
    }
    for (i, inst) in instances.iter().enumerate() {
        assert_eq!(inst.get(&y), i as u64 * 100);
    }
    for inst in &mut instances {
        inst.destroy_self();
    }
    assert!(instances.iter().all(Instance::is_null));
}

#[test]
fn test_array_instance() {
    let mut mgr = TypeManager::new();
    let u64_ty = mgr.basic(Basic::U64);
    let arr = mgr.array(50, u64_ty).unwrap();
    let ty = mgr.compile(arr, "Samples").unwrap();
    let acc = ty.accessor_array::<u64>().unwrap();

    let mut inst = ty.create_instance();
    for i in 0..acc.len() {
        inst.set_at(&acc, i, (i * i) as u64);
    }
    for i in 0..acc.len() {
        assert_eq!(inst.get_at(&acc, i), (i * i) as u64);
    }
    inst.destroy_self();
}

#[test]
fn test_enum_field_instance() {
    let mut mgr = TypeManager::new();
    let status = mgr.enumeration();
    mgr.add_enum_entry(status, "idle", 0).unwrap();
    mgr.add_enum_entry(status, "busy", 1000).unwrap();
    let job = mgr.aggregate();
    mgr.add_field(job, status, "status").unwrap();
    let ty = mgr.compile(job, "Job").unwrap();
    let acc = ty.accessor_enum_field("status").unwrap();

    let mut inst = ty.create_instance();
    assert_eq!(inst.get_enum(&acc), 0);
    inst.set_enum(&acc, 1000);
    assert_eq!(inst.get_enum(&acc), 1000);
    assert_eq!(inst.data().map(<[u8]>::len), Some(2));
}

#[test]
fn test_nullify_detaches_buffer() {
    let mut mgr = TypeManager::new();
    let ty = vec3_type(&mut mgr);
    let x = ty.accessor_field::<u64>("x").unwrap();

    let mut inst = ty.create_instance();
    inst.set(&x, 7);
    let buffer = inst.nullify().unwrap();
    assert!(inst.is_null());
    assert_eq!(buffer.len(), 24);
    assert_eq!(x.get(&buffer), 7);

    assert!(inst.nullify().is_none());
    assert!(inst.data_mut().is_none());
}

#[test]
fn test_data_mut_is_visible_to_accessors() {
    let mut mgr = TypeManager::new();
    let ty = vec3_type(&mut mgr);
    let z = ty.accessor_field::<u64>("z").unwrap();

    let mut inst = ty.create_instance();
    if let Some(data) = inst.data_mut() {
        data[16..24].copy_from_slice(&9u64.to_ne_bytes());
    }
    assert_eq!(inst.get(&z), 9);
}

#[test]
fn test_instance_keeps_type_alive() {
    let mut mgr = TypeManager::new();
    let ty = vec3_type(&mut mgr);
    let x = ty.accessor_field::<u64>("x").unwrap();
    let mut inst = ty.create_instance();

    mgr.destroy_compiled_type(&ty).unwrap();
    drop(ty);
    mgr.clear();

    inst.set(&x, 1);
    assert_eq!(inst.get(&x), 1);
    assert_eq!(inst.compiled_type().name(), "V3");
    inst.destroy_self();
}

#[test]
#[should_panic]
fn test_access_on_null_instance_panics() {
    let mut mgr = TypeManager::new();
    let ty = vec3_type(&mut mgr);
    let x = ty.accessor_field::<u64>("x").unwrap();

    let mut inst = ty.create_instance();
    inst.destroy_self();
    inst.get(&x);
}

#[test]
#[cfg(debug_assertions)]
#[should_panic(expected = "accessor built for another compiled type")]
fn test_foreign_accessor_is_caught_in_debug() {
    let mut mgr = TypeManager::new();
    let ty = vec3_type(&mut mgr);
    let u64_ty = mgr.basic(Basic::U64);
    let other = mgr.compile(u64_ty, "U64").unwrap();
    let foreign = other.accessor::<u64>().unwrap();

    let inst = ty.create_instance();
    inst.get(&foreign);
}
