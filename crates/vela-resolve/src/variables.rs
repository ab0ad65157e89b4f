//! Variable scopes: locals, parameters and fields by simple name.
//!
//! Scopes live in an arena and form chains through `parent`; lookups walk
//! innermost-first, so an inner declaration shadows an outer one without
//! touching it.

use std::collections::HashMap;

use vela_core::Name;
use vela_types::{FieldId, Type};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct VarScopeId(u32);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VariableKind {
    Local,
    Parameter,
    Field(FieldId),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Variable {
    pub name: Name,
    pub ty: Type,
    pub kind: VariableKind,
}

#[derive(Debug, Default)]
struct VarScopeData {
    parent: Option<VarScopeId>,
    map: HashMap<Name, Variable>,
}

#[derive(Debug, Default)]
pub struct VariableScopes {
    scopes: Vec<VarScopeData>,
}

impl VariableScopes {
    pub fn new() -> VariableScopes {
        VariableScopes::default()
    }

    /// A scope with no parent: the boundary used for static contexts and new
    /// compilation units, where nothing from outside may leak in.
    pub fn new_root(&mut self) -> VarScopeId {
        self.alloc(None)
    }

    pub fn new_child(&mut self, parent: VarScopeId) -> VarScopeId {
        self.alloc(Some(parent))
    }

    fn alloc(&mut self, parent: Option<VarScopeId>) -> VarScopeId {
        let id = VarScopeId(self.scopes.len() as u32);
        self.scopes.push(VarScopeData { parent, map: HashMap::new() });
        id
    }

    pub fn add(&mut self, scope: VarScopeId, variable: Variable) {
        self.scopes[scope.0 as usize].map.insert(variable.name.clone(), variable);
    }

    pub fn get(&self, scope: VarScopeId, name: &Name) -> Option<&Variable> {
        let mut current = Some(scope);
        while let Some(id) = current {
            let data = &self.scopes[id.0 as usize];
            if let Some(v) = data.map.get(name) {
                return Some(v);
            }
            current = data.parent;
        }
        None
    }
}
