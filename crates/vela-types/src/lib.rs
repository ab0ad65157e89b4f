//! Program model and type algebra for the Vela semantic front-end.
//!
//! The model is arena-based: [`TypeStore`] owns class, method, field and
//! type-parameter definitions behind `u32` newtype ids, and read access goes
//! through the [`TypeEnv`] trait so that algorithms stay independent of the
//! concrete store.

use serde::{Deserialize, Serialize};
use vela_core::{Name, PackageName, TypeName};

mod assign;
mod expr;
mod sam;
mod store;
mod subst;
mod well_known;

pub use assign::{distance_to_object, is_assignable, ARRAY_DIFFERENCE_PENALTY};
pub use expr::Expression;
pub use sam::single_abstract_method_of;
pub use store::TypeStore;
pub use subst::{MethodSubst, Substitution};
pub use well_known::WellKnown;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ClassId(pub u32);

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct MethodId(pub u32);

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct FieldId(pub u32);

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct TypeVarId(pub u32);

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Primitive {
    Boolean,
    Byte,
    Short,
    Char,
    Int,
    Long,
    Float,
    Double,
}

impl Primitive {
    pub fn name(self) -> &'static str {
        match self {
            Primitive::Boolean => "boolean",
            Primitive::Byte => "byte",
            Primitive::Short => "short",
            Primitive::Char => "char",
            Primitive::Int => "int",
            Primitive::Long => "long",
            Primitive::Float => "float",
            Primitive::Double => "double",
        }
    }
}

/// The non-array part of a [`Type`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Base {
    Class(ClassId),
    Var(TypeVarId),
    Primitive(Primitive),
    Void,
    /// The type of the `null` literal.
    Null,
    /// The unbounded wildcard `?`.
    Wildcard,
}

/// A (possibly parameterized, possibly array) type reference.
///
/// `arrays` counts array dimensions; `String[][]` is the `String` class with
/// `arrays == 2`. Type arguments only make sense for `Base::Class`.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Type {
    pub base: Base,
    pub args: Vec<Type>,
    pub arrays: u8,
}

impl Type {
    pub fn class(id: ClassId, args: Vec<Type>) -> Type {
        Type { base: Base::Class(id), args, arrays: 0 }
    }

    /// A class reference without type arguments.
    pub fn simple(id: ClassId) -> Type {
        Type::class(id, Vec::new())
    }

    pub fn var(id: TypeVarId) -> Type {
        Type { base: Base::Var(id), args: Vec::new(), arrays: 0 }
    }

    pub fn primitive(p: Primitive) -> Type {
        Type { base: Base::Primitive(p), args: Vec::new(), arrays: 0 }
    }

    pub fn int() -> Type {
        Type::primitive(Primitive::Int)
    }

    pub fn boolean() -> Type {
        Type::primitive(Primitive::Boolean)
    }

    pub fn void() -> Type {
        Type { base: Base::Void, args: Vec::new(), arrays: 0 }
    }

    pub fn null() -> Type {
        Type { base: Base::Null, args: Vec::new(), arrays: 0 }
    }

    pub fn wildcard() -> Type {
        Type { base: Base::Wildcard, args: Vec::new(), arrays: 0 }
    }

    pub fn with_arrays(mut self, arrays: u8) -> Type {
        self.arrays = arrays;
        self
    }

    pub fn array_of(&self) -> Type {
        let mut t = self.clone();
        t.arrays += 1;
        t
    }

    pub fn copy_without_arrays(&self) -> Type {
        let mut t = self.clone();
        t.arrays = 0;
        t
    }

    pub fn copy_with_fewer_arrays(&self, fewer: u8) -> Type {
        let mut t = self.clone();
        t.arrays = t.arrays.saturating_sub(fewer);
        t
    }

    pub fn is_void(&self) -> bool {
        self.base == Base::Void && self.arrays == 0
    }

    pub fn is_null(&self) -> bool {
        self.base == Base::Null
    }

    pub fn is_primitive(&self) -> bool {
        matches!(self.base, Base::Primitive(_)) && self.arrays == 0
    }

    pub fn is_unbound_wildcard(&self) -> bool {
        self.base == Base::Wildcard
    }

    pub fn as_var(&self) -> Option<TypeVarId> {
        match self.base {
            Base::Var(v) => Some(v),
            _ => None,
        }
    }

    /// The class id of the base, ignoring arrays and type arguments.
    pub fn base_class(&self) -> Option<ClassId> {
        match self.base {
            Base::Class(c) => Some(c),
            _ => None,
        }
    }

    /// The closest concrete class: the class itself, the first bound of a
    /// type parameter, or `Object` for wildcards and `null`.
    pub fn best_class(&self, env: &dyn TypeEnv) -> Option<ClassId> {
        match self.base {
            Base::Class(c) => Some(c),
            Base::Var(v) => {
                let tp = env.type_param(v);
                match tp.bounds.first() {
                    Some(bound) => bound.best_class(env),
                    None => Some(env.well_known().object),
                }
            }
            Base::Wildcard | Base::Null => Some(env.well_known().object),
            Base::Primitive(_) | Base::Void => None,
        }
    }

    /// The erasure: type arguments dropped, type parameters replaced by the
    /// erasure of their first bound (or `Object`).
    pub fn erased(&self, env: &dyn TypeEnv) -> Type {
        match self.base {
            Base::Class(c) => Type::simple(c).with_arrays(self.arrays),
            Base::Var(v) => {
                let tp = env.type_param(v);
                let mut t = match tp.bounds.first() {
                    Some(bound) => bound.erased(env),
                    None => Type::simple(env.well_known().object),
                };
                t.arrays += self.arrays;
                t
            }
            Base::Wildcard | Base::Null => {
                Type::simple(env.well_known().object).with_arrays(self.arrays)
            }
            Base::Primitive(_) | Base::Void => self.clone(),
        }
    }

    /// Human-readable form for diagnostics, e.g. `java.util.List<java.lang.String>[]`.
    pub fn describe(&self, env: &dyn TypeEnv) -> String {
        let mut s = match self.base {
            Base::Class(c) => env.class(c).name.as_str().to_string(),
            Base::Var(v) => env.type_param(v).name.as_str().to_string(),
            Base::Primitive(p) => p.name().to_string(),
            Base::Void => "void".to_string(),
            Base::Null => "null".to_string(),
            Base::Wildcard => "?".to_string(),
        };
        if !self.args.is_empty() {
            let args: Vec<String> = self.args.iter().map(|a| a.describe(env)).collect();
            s.push('<');
            s.push_str(&args.join(", "));
            s.push('>');
        }
        for _ in 0..self.arrays {
            s.push_str("[]");
        }
        s
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ClassKind {
    Class,
    Interface,
}

#[derive(Debug, Clone)]
pub struct ClassDef {
    /// Fully-qualified name; nested types use dotted nesting (`a.Outer.Inner`).
    pub name: TypeName,
    pub package: PackageName,
    pub kind: ClassKind,
    pub is_public: bool,
    /// For nested types: declared `static`.
    pub is_static: bool,
    pub is_abstract: bool,
    pub type_params: Vec<TypeVarId>,
    /// `None` only for the root class `Object`.
    pub super_class: Option<Type>,
    pub interfaces: Vec<Type>,
    pub enclosing: Option<ClassId>,
    pub nested: Vec<ClassId>,
    pub fields: Vec<FieldId>,
    pub constructors: Vec<MethodId>,
    pub methods: Vec<MethodId>,
}

impl ClassDef {
    /// A blank public class in the given package; callers fill in the rest
    /// with struct update syntax.
    pub fn new(package: PackageName, simple_name: &str, kind: ClassKind) -> ClassDef {
        let name = package.member(&Name::new(simple_name));
        ClassDef {
            name,
            package,
            kind,
            is_public: true,
            is_static: false,
            is_abstract: kind == ClassKind::Interface,
            type_params: Vec::new(),
            super_class: None,
            interfaces: Vec::new(),
            enclosing: None,
            nested: Vec::new(),
            fields: Vec::new(),
            constructors: Vec::new(),
            methods: Vec::new(),
        }
    }

    pub fn simple_name(&self) -> Name {
        self.name.simple_name()
    }

    pub fn is_interface(&self) -> bool {
        self.kind == ClassKind::Interface
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Param {
    pub name: Name,
    /// For a varargs parameter this is the array type (`String...` is stored
    /// as `String[]`).
    pub ty: Type,
    pub varargs: bool,
}

impl Param {
    pub fn new(name: &str, ty: Type) -> Param {
        Param { name: Name::new(name), ty, varargs: false }
    }

    pub fn varargs(name: &str, element: Type) -> Param {
        Param { name: Name::new(name), ty: element.array_of(), varargs: true }
    }
}

#[derive(Debug, Clone)]
pub struct MethodDef {
    pub name: Name,
    pub owner: ClassId,
    pub type_params: Vec<TypeVarId>,
    pub params: Vec<Param>,
    pub return_type: Type,
    pub is_static: bool,
    pub is_abstract: bool,
    pub is_default: bool,
    pub is_public: bool,
    pub is_constructor: bool,
    /// Set by the deferred resolver.
    pub body: Option<Expression>,
}

impl MethodDef {
    pub fn new(owner: ClassId, name: &str, params: Vec<Param>, return_type: Type) -> MethodDef {
        MethodDef {
            name: Name::new(name),
            owner,
            type_params: Vec::new(),
            params,
            return_type,
            is_static: false,
            is_abstract: false,
            is_default: false,
            is_public: true,
            is_constructor: false,
            body: None,
        }
    }

    pub fn constructor(owner: ClassId, params: Vec<Param>, ty: Type) -> MethodDef {
        MethodDef {
            name: Name::new("<init>"),
            owner,
            type_params: Vec::new(),
            params,
            return_type: ty,
            is_static: false,
            is_abstract: false,
            is_default: false,
            is_public: true,
            is_constructor: true,
            body: None,
        }
    }

    pub fn is_varargs(&self) -> bool {
        self.params.last().is_some_and(|p| p.varargs)
    }
}

#[derive(Debug, Clone)]
pub struct FieldDef {
    pub name: Name,
    pub owner: ClassId,
    pub ty: Type,
    pub is_static: bool,
    pub is_public: bool,
    /// Set by the deferred resolver.
    pub initializer: Option<Expression>,
}

#[derive(Debug, Clone)]
pub struct TypeParamDef {
    pub name: Name,
    pub bounds: Vec<Type>,
}

/// Read access to the program model. Algorithms take `&dyn TypeEnv` so they
/// work against any store (and so tests can wrap stores).
pub trait TypeEnv {
    fn class(&self, id: ClassId) -> &ClassDef;
    fn method(&self, id: MethodId) -> &MethodDef;
    fn field(&self, id: FieldId) -> &FieldDef;
    fn type_param(&self, id: TypeVarId) -> &TypeParamDef;
    /// The symbol-loader seam: resolve a fully-qualified name to a class.
    fn lookup_class(&self, fqn: &str) -> Option<ClassId>;
    fn well_known(&self) -> &WellKnown;
}
