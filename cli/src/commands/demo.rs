//! The `demo` command - a tour of the registry.

use dystruct::{Basic, TypeManager};

use crate::common::CliResult;

/// Run the demo command.
pub fn run() -> CliResult<()> {
    let mut mgr = TypeManager::new();

    let u64_ty = mgr.basic(Basic::U64);
    let scalar = mgr.compile(u64_ty, "U64")?;
    let value = scalar.accessor::<u64>()?;

    let mut inst = scalar.create_instance();
    inst.set(&value, 42);
    println!("{}: size {}, id {:#010x}", scalar.name(), scalar.size_of(), scalar.id());
    println!("  value = {}", inst.get(&value));
    inst.destroy_self();

    let v3 = mgr.aggregate();
    for name in ["x", "y", "z"] {
        mgr.add_field(v3, u64_ty, name)?;
    }
    let vector = mgr.compile(v3, "V3")?;
    let fields = [
        ("x", vector.accessor_field::<u64>("x")?, 42),
        ("y", vector.accessor_field::<u64>("y")?, 69),
        ("z", vector.accessor_field::<u64>("z")?, 105),
    ];

    let mut inst = vector.create_instance();
    for (_, acc, v) in &fields {
        inst.set(acc, *v);
    }
    println!("{}: size {}, id {:#010x}", vector.name(), vector.size_of(), vector.id());
    for (name, acc, _) in &fields {
        println!("  {name} = {}", inst.get(acc));
    }
    vector.destroy_instance(&mut inst);

    mgr.clear();
    Ok(())
}
