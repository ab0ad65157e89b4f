//! The type context: hierarchical scopes mapping simple names to named
//! entities (classes and type parameters), with priorities.
//!
//! Scopes live in an arena (`Vec` plus parent links). Each scope belongs to a
//! compilation unit, which carries the package name, the static import map
//! and the on-demand imported packages. Bindings carry a priority; a re-add
//! at lower priority never shadows an existing binding.

use std::collections::{HashMap, HashSet, VecDeque};

use tracing::trace;
use vela_core::{Name, PackageName};
use vela_types::{ClassId, TypeEnv, TypeVarId};

use crate::error::ResolveError;
use crate::imports::StaticImportMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TypeScopeId(u32);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct UnitId(u32);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NamedEntity {
    Class(ClassId),
    TypeParam(TypeVarId),
}

/// Relative order is what matters: explicit imports beat static imports beat
/// on-demand imports beat hierarchy-derived bindings beat enclosing-derived
/// ones. Locally declared names beat everything.
pub mod priority {
    pub const LOCAL: u32 = 50;
    pub const IMPORT: u32 = 40;
    pub const STATIC_IMPORT: u32 = 35;
    pub const ON_DEMAND_IMPORT: u32 = 25;
    pub const HIERARCHY: u32 = 20;
    pub const ENCLOSING: u32 = 10;
}

#[derive(Debug)]
struct UnitData {
    package: PackageName,
    static_imports: StaticImportMap,
    on_demand_packages: Vec<PackageName>,
}

#[derive(Debug)]
struct ScopeData {
    parent: Option<TypeScopeId>,
    unit: UnitId,
    map: HashMap<Name, (NamedEntity, u32)>,
}

#[derive(Debug, Default)]
pub struct TypeScopes {
    scopes: Vec<ScopeData>,
    units: Vec<UnitData>,
}

impl TypeScopes {
    pub fn new() -> TypeScopes {
        TypeScopes::default()
    }

    pub fn new_unit(&mut self, package: PackageName) -> TypeScopeId {
        let unit = UnitId(self.units.len() as u32);
        self.units.push(UnitData {
            package,
            static_imports: StaticImportMap::default(),
            on_demand_packages: Vec::new(),
        });
        let id = TypeScopeId(self.scopes.len() as u32);
        self.scopes.push(ScopeData { parent: None, unit, map: HashMap::new() });
        id
    }

    pub fn new_child(&mut self, parent: TypeScopeId) -> TypeScopeId {
        let unit = self.scopes[parent.0 as usize].unit;
        let id = TypeScopeId(self.scopes.len() as u32);
        self.scopes.push(ScopeData { parent: Some(parent), unit, map: HashMap::new() });
        id
    }

    pub fn package(&self, scope: TypeScopeId) -> &PackageName {
        &self.units[self.unit_of(scope).0 as usize].package
    }

    pub fn static_imports(&self, scope: TypeScopeId) -> &StaticImportMap {
        &self.units[self.unit_of(scope).0 as usize].static_imports
    }

    pub fn static_imports_mut(&mut self, scope: TypeScopeId) -> &mut StaticImportMap {
        let unit = self.unit_of(scope);
        &mut self.units[unit.0 as usize].static_imports
    }

    pub fn add_on_demand_package(&mut self, scope: TypeScopeId, package: PackageName) {
        let unit = self.unit_of(scope);
        let packages = &mut self.units[unit.0 as usize].on_demand_packages;
        if !packages.contains(&package) {
            packages.push(package);
        }
    }

    fn unit_of(&self, scope: TypeScopeId) -> UnitId {
        self.scopes[scope.0 as usize].unit
    }

    /// Inserts into the current scope unless a binding with strictly higher
    /// priority is already there. Re-adding at equal priority overwrites,
    /// which makes equal re-adds idempotent.
    pub fn add(&mut self, scope: TypeScopeId, name: Name, entity: NamedEntity, priority: u32) {
        let map = &mut self.scopes[scope.0 as usize].map;
        match map.get(&name) {
            Some((_, existing)) if *existing > priority => {
                trace!(%name, existing, priority, "keeping higher-priority binding");
            }
            _ => {
                map.insert(name, (entity, priority));
            }
        }
    }

    /// Simple-name lookup: the scope chain, then same-package types, then
    /// on-demand imported packages, then nested types of static-import
    /// classes, then the core language package.
    pub fn get_simple(
        &self,
        env: &dyn TypeEnv,
        scope: TypeScopeId,
        name: &Name,
    ) -> Option<NamedEntity> {
        let mut current = Some(scope);
        while let Some(id) = current {
            let data = &self.scopes[id.0 as usize];
            if let Some((entity, _)) = data.map.get(name) {
                return Some(*entity);
            }
            current = data.parent;
        }
        let unit = &self.units[self.unit_of(scope).0 as usize];
        if let Some(c) = env.lookup_class(unit.package.member(name).as_str()) {
            return Some(NamedEntity::Class(c));
        }
        for pkg in &unit.on_demand_packages {
            if let Some(c) = env.lookup_class(pkg.member(name).as_str()) {
                return Some(NamedEntity::Class(c));
            }
        }
        for class in unit.static_imports.on_demand() {
            if let Some(nested) = nested_with_name(env, *class, name) {
                return Some(NamedEntity::Class(nested));
            }
        }
        env.lookup_class(&format!("java.lang.{name}"))
            .map(NamedEntity::Class)
    }

    /// Simple or (partially) qualified lookup. A dotted name is tried as a
    /// fully-qualified name first; failing that, the prefix is resolved
    /// recursively and the last segment searched among the prefix type's
    /// related nested types.
    pub fn get(
        &self,
        env: &dyn TypeEnv,
        scope: TypeScopeId,
        name: &str,
        complain: bool,
    ) -> Result<Option<NamedEntity>, ResolveError> {
        let found = self.get_inner(env, scope, name);
        match found {
            Some(entity) => Ok(Some(entity)),
            None if complain => Err(ResolveError::UnresolvedName { name: name.to_string() }),
            None => Ok(None),
        }
    }

    fn get_inner(&self, env: &dyn TypeEnv, scope: TypeScopeId, name: &str) -> Option<NamedEntity> {
        match name.rsplit_once('.') {
            None => self.get_simple(env, scope, &Name::new(name)),
            Some((prefix, last)) => {
                if let Some(c) = env.lookup_class(name) {
                    return Some(NamedEntity::Class(c));
                }
                if let Some(NamedEntity::Class(p)) = self.get_inner(env, scope, prefix) {
                    if let Some(nested) = subtype_of_related(env, p, &Name::new(last)) {
                        return Some(NamedEntity::Class(nested));
                    }
                }
                None
            }
        }
    }

    /// For anonymous class bodies: every nested type anywhere in the
    /// supertype hierarchy of `base` becomes visible by simple name.
    pub fn add_subtypes_of_hierarchy(
        &mut self,
        env: &dyn TypeEnv,
        scope: TypeScopeId,
        base: ClassId,
    ) {
        for id in hierarchy_of(env, base) {
            let nested = env.class(id).nested.clone();
            for n in nested {
                let simple = env.class(n).simple_name();
                self.add(scope, simple, NamedEntity::Class(n), priority::HIERARCHY);
            }
        }
    }
}

/// A nested type with the given simple name, in `class` or anywhere up its
/// supertype hierarchy.
pub fn subtype_of_related(env: &dyn TypeEnv, class: ClassId, name: &Name) -> Option<ClassId> {
    for id in hierarchy_of(env, class) {
        if let Some(found) = nested_with_name(env, id, name) {
            return Some(found);
        }
    }
    None
}

fn nested_with_name(env: &dyn TypeEnv, class: ClassId, name: &Name) -> Option<ClassId> {
    env.class(class)
        .nested
        .iter()
        .copied()
        .find(|n| env.class(*n).simple_name() == *name)
}

/// Breadth-first enumeration of `base` and its supertypes, each once.
fn hierarchy_of(env: &dyn TypeEnv, base: ClassId) -> Vec<ClassId> {
    let mut out = Vec::new();
    let mut queue = VecDeque::from([base]);
    let mut seen = HashSet::from([base]);
    while let Some(id) = queue.pop_front() {
        out.push(id);
        let def = env.class(id);
        let parents = def
            .super_class
            .iter()
            .chain(def.interfaces.iter())
            .filter_map(|t| t.base_class());
        for p in parents {
            if seen.insert(p) {
                queue.push_back(p);
            }
        }
    }
    out
}
