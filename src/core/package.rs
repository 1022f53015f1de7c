//! Package - a target unit of binding and its declarations.
//!
//! Everything here is produced by the upstream analyzer and is read-only to
//! the generator.

use serde::{Deserialize, Serialize};

use crate::core::symbol::{QualName, TypeRef};

/// A Go package selected for binding.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Package {
    /// Import path
    pub path: String,

    /// Package name as used in Go source
    pub name: String,

    /// Package documentation
    #[serde(default)]
    pub doc: String,

    /// Import paths of the packages this one imports
    #[serde(default)]
    pub imports: Vec<String>,

    #[serde(default)]
    pub consts: Vec<Const>,

    #[serde(default)]
    pub vars: Vec<Var>,

    #[serde(default)]
    pub interfaces: Vec<Interface>,

    #[serde(default)]
    pub structs: Vec<Struct>,

    #[serde(default)]
    pub funcs: Vec<Func>,
}

impl Package {
    /// Create an empty package.
    pub fn new(path: impl Into<String>, name: impl Into<String>) -> Self {
        Package {
            path: path.into(),
            name: name.into(),
            ..Default::default()
        }
    }

    /// Find a struct declared in this package.
    pub fn struct_named(&self, name: &str) -> Option<&Struct> {
        self.structs.iter().find(|s| s.name == name)
    }

    /// Qualified name of a declaration in this package.
    pub fn qualify(&self, name: &str) -> QualName {
        QualName::new(&self.path, name)
    }

    /// Move value-returning factory functions onto the structs they build.
    ///
    /// A function is a constructor of `T` when its only non-error result is
    /// `T` by value and `T` is a struct of this package. Factories returning
    /// `*T` are not recognized and remain free functions; this is a known gap
    /// in what gets bound as a constructor.
    pub fn associate_constructors(&mut self) {
        let funcs = std::mem::take(&mut self.funcs);
        for func in funcs {
            let target = func.constructed_type(&self.path).and_then(|name| {
                self.structs.iter().position(|s| s.name == name)
            });
            match target {
                Some(idx) => {
                    let st = &mut self.structs[idx];
                    if !st.ctors.iter().any(|c| c.name == func.name) {
                        tracing::debug!("constructor {}.{} -> {}", self.name, func.name, st.name);
                        st.ctors.push(func);
                    }
                }
                None => self.funcs.push(func),
            }
        }
    }
}

/// A package-level constant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Const {
    pub name: String,
    #[serde(rename = "type")]
    pub ty: TypeRef,
    /// Go source literal of the value
    pub value: String,
    #[serde(default)]
    pub doc: String,
}

/// A package-level variable.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Var {
    pub name: String,
    #[serde(rename = "type")]
    pub ty: TypeRef,
    #[serde(default)]
    pub doc: String,
}

/// An interface type and its method set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Interface {
    pub name: String,
    #[serde(default)]
    pub doc: String,
    #[serde(default)]
    pub methods: Vec<Func>,
}

/// A struct type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Struct {
    pub name: String,
    #[serde(default)]
    pub doc: String,
    #[serde(default)]
    pub fields: Vec<Field>,
    /// Methods with a pointer or value receiver
    #[serde(default)]
    pub methods: Vec<Func>,
    /// Functions returning this struct by value
    #[serde(default)]
    pub ctors: Vec<Func>,
}

impl Struct {
    pub fn new(name: impl Into<String>) -> Self {
        Struct {
            name: name.into(),
            doc: String::new(),
            fields: Vec::new(),
            methods: Vec::new(),
            ctors: Vec::new(),
        }
    }

    pub fn with_field(mut self, field: Field) -> Self {
        self.fields.push(field);
        self
    }

    pub fn with_method(mut self, method: Func) -> Self {
        self.methods.push(method);
        self
    }
}

/// An exported struct field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Field {
    pub name: String,
    #[serde(rename = "type")]
    pub ty: TypeRef,
    #[serde(default)]
    pub doc: String,
}

impl Field {
    pub fn new(name: impl Into<String>, ty: TypeRef) -> Self {
        Field {
            name: name.into(),
            ty,
            doc: String::new(),
        }
    }
}

/// A function or method signature.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Func {
    pub name: String,
    #[serde(default)]
    pub doc: String,
    #[serde(default)]
    pub params: Vec<Param>,
    #[serde(default)]
    pub results: Vec<TypeRef>,
}

impl Func {
    pub fn new(name: impl Into<String>) -> Self {
        Func {
            name: name.into(),
            doc: String::new(),
            params: Vec::new(),
            results: Vec::new(),
        }
    }

    pub fn with_param(mut self, name: impl Into<String>, ty: TypeRef) -> Self {
        self.params.push(Param {
            name: name.into(),
            ty,
        });
        self
    }

    pub fn with_result(mut self, ty: TypeRef) -> Self {
        self.results.push(ty);
        self
    }

    pub fn with_doc(mut self, doc: impl Into<String>) -> Self {
        self.doc = doc.into();
        self
    }

    /// Whether the last result is `error`.
    pub fn returns_error(&self) -> bool {
        self.results.last().is_some_and(TypeRef::is_error)
    }

    /// Results other than a trailing `error`.
    pub fn value_results(&self) -> &[TypeRef] {
        if self.returns_error() {
            &self.results[..self.results.len() - 1]
        } else {
            &self.results
        }
    }

    /// Name of the struct in `pkg_path` this function returns by value, if
    /// that is its only value result.
    fn constructed_type(&self, pkg_path: &str) -> Option<&str> {
        match self.value_results() {
            [TypeRef::Named(q)] if q.path == pkg_path => Some(q.name.as_str()),
            _ => None,
        }
    }
}

/// A named function parameter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Param {
    pub name: String,
    #[serde(rename = "type")]
    pub ty: TypeRef,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::symbol::BasicKind;

    const GEOM: &str = "example.com/geom";

    fn geom() -> Package {
        let mut pkg = Package::new(GEOM, "geom");
        pkg.structs.push(Struct::new("Point"));
        pkg
    }

    #[test]
    fn test_value_factory_becomes_constructor() {
        let mut pkg = geom();
        pkg.funcs.push(Func::new("NewPoint").with_result(TypeRef::named(GEOM, "Point")));
        pkg.funcs.push(
            Func::new("ParsePoint")
                .with_param("s", TypeRef::Basic(BasicKind::String))
                .with_result(TypeRef::named(GEOM, "Point"))
                .with_result(TypeRef::Error),
        );
        pkg.associate_constructors();

        assert!(pkg.funcs.is_empty());
        let names: Vec<_> = pkg.structs[0].ctors.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, ["NewPoint", "ParsePoint"]);
    }

    #[test]
    fn test_pointer_factory_stays_free_function() {
        let mut pkg = geom();
        pkg.funcs.push(Func::new("NewPointPtr").with_result(TypeRef::pointer(GEOM, "Point")));
        pkg.associate_constructors();

        assert_eq!(pkg.funcs.len(), 1);
        assert!(pkg.structs[0].ctors.is_empty());
    }

    #[test]
    fn test_foreign_or_multi_result_is_not_constructor() {
        let mut pkg = geom();
        pkg.funcs.push(Func::new("Other").with_result(TypeRef::named("example.com/other", "Point")));
        pkg.funcs.push(
            Func::new("Pair")
                .with_result(TypeRef::named(GEOM, "Point"))
                .with_result(TypeRef::named(GEOM, "Point")),
        );
        pkg.associate_constructors();

        assert_eq!(pkg.funcs.len(), 2);
        assert!(pkg.structs[0].ctors.is_empty());
    }

    #[test]
    fn test_associate_is_idempotent() {
        let mut pkg = geom();
        pkg.structs[0].ctors.push(Func::new("NewPoint").with_result(TypeRef::named(GEOM, "Point")));
        pkg.funcs.push(Func::new("NewPoint").with_result(TypeRef::named(GEOM, "Point")));
        pkg.associate_constructors();
        pkg.associate_constructors();

        assert_eq!(pkg.structs[0].ctors.len(), 1);
        assert!(pkg.funcs.is_empty());
    }
}
