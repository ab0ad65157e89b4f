//! Core name primitives shared across the Vela crates.
//!
//! This crate is intentionally small: simple names, dotted package names and
//! fully-qualified type names, with cheap cloning via [`smol_str`].

use std::fmt;

use serde::{Deserialize, Serialize};
use smol_str::SmolStr;

/// A simple (undotted) identifier: a class simple name, a method name, a
/// variable name or a type-parameter name.
#[derive(Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Name(SmolStr);

impl Name {
    pub fn new(s: impl AsRef<str>) -> Self {
        debug_assert!(
            !s.as_ref().contains('.'),
            "simple names must not be dotted: {}",
            s.as_ref()
        );
        Name(SmolStr::new(s.as_ref()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Name {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl fmt::Debug for Name {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Name({:?})", self.0.as_str())
    }
}

impl From<&str> for Name {
    fn from(s: &str) -> Self {
        Name::new(s)
    }
}

/// A dotted package name, e.g. `java.util`. The empty string is the default
/// (unnamed) package.
#[derive(Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct PackageName(SmolStr);

impl PackageName {
    pub fn from_dotted(s: impl AsRef<str>) -> Self {
        PackageName(SmolStr::new(s.as_ref()))
    }

    pub fn unnamed() -> Self {
        PackageName(SmolStr::default())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_unnamed(&self) -> bool {
        self.0.is_empty()
    }

    pub fn segments(&self) -> impl Iterator<Item = &str> {
        self.0.split('.').filter(|s| !s.is_empty())
    }

    /// Joins a simple name onto this package, producing a qualified name.
    pub fn member(&self, name: &Name) -> TypeName {
        if self.is_unnamed() {
            TypeName(SmolStr::new(name.as_str()))
        } else {
            TypeName(SmolStr::new(format!("{}.{}", self.0, name)))
        }
    }
}

impl fmt::Display for PackageName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl fmt::Debug for PackageName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "PackageName({:?})", self.0.as_str())
    }
}

/// A fully-qualified type name, e.g. `java.util.List` or `a.b.Outer.Inner`.
#[derive(Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct TypeName(SmolStr);

impl TypeName {
    pub fn new(s: impl AsRef<str>) -> Self {
        TypeName(SmolStr::new(s.as_ref()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The segment after the last dot.
    pub fn simple_name(&self) -> Name {
        match self.0.rsplit_once('.') {
            Some((_, last)) => Name::new(last),
            None => Name::new(self.0.as_str()),
        }
    }

    /// Splits at the last dot: `a.b.C` becomes `("a.b", "C")`.
    pub fn split_last(&self) -> Option<(&str, &str)> {
        self.0.rsplit_once('.')
    }

    /// Appends a nested type's simple name: `a.B` plus `C` is `a.B.C`.
    pub fn nested(&self, name: &Name) -> TypeName {
        TypeName(SmolStr::new(format!("{}.{}", self.0, name)))
    }
}

impl fmt::Display for TypeName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl fmt::Debug for TypeName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "TypeName({:?})", self.0.as_str())
    }
}
