//! The `layout` command - lay out an aggregate from field specs.

use dystruct::{Basic, ShapeId, TypeManager};
use tracing::debug;

use crate::cli::LayoutArgs;
use crate::common::{CliError, CliResult};

/// One parsed `name:kind[count]` argument.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldSpec {
    pub name: String,
    pub kind: Basic,
    pub count: Option<u32>,
}

impl FieldSpec {
    pub fn parse(spec: &str) -> CliResult<Self> {
        let invalid = || CliError::FieldSpec(spec.to_string());

        let (name, kind) = spec.split_once(':').ok_or_else(invalid)?;
        let (kind, count) = match kind.strip_suffix(']') {
            Some(rest) => {
                let (kind, count) = rest.split_once('[').ok_or_else(invalid)?;
                (kind, Some(count.parse::<u32>().map_err(|_| invalid())?))
            }
            None => (kind, None),
        };
        let kind = kind.parse::<Basic>().map_err(|_| CliError::UnknownKind {
            field: name.to_string(),
            kind: kind.to_string(),
        })?;

        Ok(Self {
            name: name.to_string(),
            kind,
            count,
        })
    }

    fn build(&self, mgr: &mut TypeManager) -> CliResult<ShapeId> {
        let basic = mgr.basic(self.kind);
        match self.count {
            Some(count) => Ok(mgr.array(count, basic)?),
            None => Ok(basic),
        }
    }
}

/// Run the layout command.
pub fn run(args: LayoutArgs) -> CliResult<()> {
    let specs = args
        .fields
        .iter()
        .map(|s| FieldSpec::parse(s))
        .collect::<CliResult<Vec<_>>>()?;

    let mut mgr = TypeManager::new();
    let agg = mgr.aggregate();
    for spec in &specs {
        let shape = spec.build(&mut mgr)?;
        let offset = mgr.add_field(agg, shape, &spec.name)?;
        debug!(field = %spec.name, offset, "added field");
    }
    let ty = mgr.compile(agg, &args.name)?;

    println!("{:<12} {:>6} {:>6}  type", "field", "offset", "size");
    for field in ty.layout().fields() {
        println!(
            "{:<12} {:>6} {:>6}  {}",
            field.name,
            field.offset,
            field.layout.size_of(),
            field.layout
        );
    }
    println!("{}: size {}, id {:#010x}", ty.name(), ty.size_of(), ty.id());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_scalar_and_array() {
        assert_eq!(
            FieldSpec::parse("id:i32").unwrap(),
            FieldSpec {
                name: "id".into(),
                kind: Basic::I32,
                count: None
            }
        );
        assert_eq!(
            FieldSpec::parse("pos:F64[3]").unwrap(),
            FieldSpec {
                name: "pos".into(),
                kind: Basic::F64,
                count: Some(3)
            }
        );
    }

    #[test]
    fn parse_errors() {
        assert!(matches!(
            FieldSpec::parse("nokind"),
            Err(CliError::FieldSpec(_))
        ));
        assert!(matches!(
            FieldSpec::parse("a:u8[x]"),
            Err(CliError::FieldSpec(_))
        ));
        assert!(matches!(
            FieldSpec::parse("a:u8]"),
            Err(CliError::FieldSpec(_))
        ));
        assert!(matches!(
            FieldSpec::parse("a:u128"),
            Err(CliError::UnknownKind { .. })
        ));
    }
}
