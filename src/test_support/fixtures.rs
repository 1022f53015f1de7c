//! Symbol table fixtures.
//!
//! The `geom` fixture is a small geometry package that touches every kind
//! of declaration, plus one type from a package that is not bound
//! (`units.Meter`).

use crate::bind::convert::BindContext;
use crate::bind::handle::HandleConfig;
use crate::bind::partition::TargetSet;
use crate::core::{
    BasicKind, Package, PackageRef, Symbol, SymbolKind, SymbolTable, TypeRef,
};

pub const GEOM: &str = "example.com/geom";
pub const UNITS: &str = "example.com/units";

/// A full symbol table in its JSON form.
///
/// `geom` declares every kind of binding; `units.Meter` is external and
/// listed twice on purpose.
pub const GEOM_TABLE: &str = r#"{
    "packages": [{
        "path": "example.com/geom",
        "name": "geom",
        "doc": "Package geom does plane geometry.",
        "imports": ["example.com/units"],
        "consts": [
            {"name": "Epsilon", "type": "float64", "value": "1e-9"},
            {"name": "Strict", "type": "bool", "value": "true"}
        ],
        "vars": [
            {"name": "Origin", "type": "example.com/geom.Point", "doc": "Origin is (0, 0)."}
        ],
        "interfaces": [{
            "name": "Shape",
            "methods": [{"name": "Area", "results": ["float64"]}]
        }],
        "structs": [{
            "name": "Point",
            "doc": "Point is a location in the plane.",
            "fields": [
                {"name": "X", "type": "float64"},
                {"name": "Y", "type": "float64"}
            ],
            "methods": [{
                "name": "Dist",
                "params": [{"name": "q", "type": "example.com/geom.Point"}],
                "results": ["float64"]
            }]
        }],
        "funcs": [
            {
                "name": "NewPoint",
                "params": [{"name": "x", "type": "float64"}, {"name": "y", "type": "float64"}],
                "results": ["example.com/geom.Point"]
            },
            {
                "name": "Parse",
                "params": [{"name": "s", "type": "string"}],
                "results": ["*example.com/geom.Point", "error"]
            },
            {
                "name": "Length",
                "params": [{"name": "m", "type": "example.com/units.Meter"}],
                "results": ["float64"]
            }
        ]
    }],
    "symbols": [
        {"name": "Meter", "package": {"path": "example.com/units", "name": "units"}, "kind": "struct"},
        {"name": "Point", "package": {"path": "example.com/geom", "name": "geom"}, "kind": "struct"},
        {"name": "Shape", "package": {"path": "example.com/geom", "name": "geom"}, "kind": "interface"},
        {"name": "Path", "package": {"path": "example.com/geom", "name": "geom"}, "kind": "slice", "elem": "example.com/geom.Point"},
        {"name": "Celsius", "package": {"path": "example.com/geom", "name": "geom"}, "kind": "basic", "underlying": "float64"},
        {"name": "Meter", "package": {"path": "example.com/units", "name": "units"}, "kind": "struct"},
        {"name": "NewPoint", "package": {"path": "example.com/geom", "name": "geom"}, "kind": "func"}
    ]
}"#;

/// A table plus the target set of one generation session.
#[derive(Debug)]
pub struct Session {
    pub table: SymbolTable,
    pub targets: TargetSet,
}

impl Session {
    pub fn new(table: SymbolTable) -> Self {
        let targets = TargetSet::from_packages(table.packages());
        Session { table, targets }
    }

    /// Type symbols only, for exercising emitters one declaration at a
    /// time. Includes a slice of an unresolvable element (`Broken`).
    pub fn geom() -> Self {
        let geom = PackageRef::new(GEOM, "geom");
        let units = PackageRef::new(UNITS, "units");
        let table = SymbolTable::new(
            vec![Package::new(GEOM, "geom")],
            vec![
                Symbol::new("Point", geom.clone(), SymbolKind::Struct),
                Symbol::new("Shape", geom.clone(), SymbolKind::Interface),
                Symbol::new(
                    "Celsius",
                    geom.clone(),
                    SymbolKind::Basic {
                        underlying: BasicKind::Float64,
                    },
                ),
                Symbol::new(
                    "Path",
                    geom.clone(),
                    SymbolKind::Slice {
                        elem: TypeRef::named(GEOM, "Point"),
                    },
                ),
                Symbol::new(
                    "Labels",
                    geom.clone(),
                    SymbolKind::Map {
                        key: TypeRef::Basic(BasicKind::String),
                        elem: TypeRef::Basic(BasicKind::Int),
                    },
                ),
                Symbol::new(
                    "Broken",
                    geom,
                    SymbolKind::Slice {
                        elem: TypeRef::named(GEOM, "Nowhere"),
                    },
                ),
                Symbol::new("Meter", units, SymbolKind::Struct),
            ],
        );
        Session::new(table)
    }

    /// The full JSON fixture.
    pub fn geom_table() -> Self {
        Session::new(SymbolTable::from_json(GEOM_TABLE).expect("fixture table should parse"))
    }

    pub fn cx(&self) -> BindContext<'_> {
        BindContext {
            table: &self.table,
            targets: &self.targets,
            handle: &HandleConfig::INT64,
            out_name: "geom",
        }
    }

    pub fn geom_package(&self) -> &Package {
        self.table.package(GEOM).expect("fixture has geom")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fixture_table_parses() {
        let session = Session::geom_table();
        let pkg = session.geom_package();
        // NewPoint returns Point by value, so it moved onto the struct.
        assert_eq!(pkg.structs[0].ctors.len(), 1);
        assert_eq!(pkg.funcs.len(), 2);
        assert_eq!(session.targets.external_types(&session.table).len(), 2);
    }
}
