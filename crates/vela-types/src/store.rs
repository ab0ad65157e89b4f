//! The arena that owns all class, method, field and type-parameter
//! definitions.
//!
//! Declarations go through a builder-to-committed lifecycle: everything is
//! mutable after insertion, `commit_*` freezes it, and mutating a committed
//! declaration is a programming error (panic), never a silent overwrite.

use std::collections::HashMap;

use vela_core::{Name, TypeName};

use crate::well_known::seed_core_package;
use crate::{
    ClassDef, ClassId, Expression, FieldDef, FieldId, MethodDef, MethodId, TypeEnv, TypeParamDef,
    TypeVarId, WellKnown,
};

pub struct TypeStore {
    classes: Vec<ClassDef>,
    methods: Vec<MethodDef>,
    fields: Vec<FieldDef>,
    type_params: Vec<TypeParamDef>,
    classes_committed: Vec<bool>,
    methods_committed: Vec<bool>,
    fields_committed: Vec<bool>,
    by_name: HashMap<TypeName, ClassId>,
    well_known: WellKnown,
}

impl TypeStore {
    /// A store pre-seeded with the essential core-package types (`Object`,
    /// `String`, boxed primitives). Everything else is user-supplied.
    pub fn new() -> TypeStore {
        let mut store = TypeStore {
            classes: Vec::new(),
            methods: Vec::new(),
            fields: Vec::new(),
            type_params: Vec::new(),
            classes_committed: Vec::new(),
            methods_committed: Vec::new(),
            fields_committed: Vec::new(),
            by_name: HashMap::new(),
            well_known: WellKnown::placeholder(),
        };
        store.well_known = seed_core_package(&mut store);
        store
    }

    pub fn add_class(&mut self, def: ClassDef) -> ClassId {
        let id = ClassId(self.classes.len() as u32);
        self.by_name.insert(def.name.clone(), id);
        let enclosing = def.enclosing;
        self.classes.push(def);
        self.classes_committed.push(false);
        if let Some(outer) = enclosing {
            assert!(
                !self.classes_committed[outer.0 as usize],
                "cannot add a nested type to committed class {}",
                self.classes[outer.0 as usize].name
            );
            self.classes[outer.0 as usize].nested.push(id);
        }
        id
    }

    pub fn add_method(&mut self, def: MethodDef) -> MethodId {
        let id = MethodId(self.methods.len() as u32);
        let owner = def.owner;
        assert!(
            !self.classes_committed[owner.0 as usize],
            "cannot add a method to committed class {}",
            self.classes[owner.0 as usize].name
        );
        if def.is_constructor {
            self.classes[owner.0 as usize].constructors.push(id);
        } else {
            self.classes[owner.0 as usize].methods.push(id);
        }
        self.methods.push(def);
        self.methods_committed.push(false);
        id
    }

    pub fn add_field(&mut self, def: FieldDef) -> FieldId {
        let id = FieldId(self.fields.len() as u32);
        let owner = def.owner;
        assert!(
            !self.classes_committed[owner.0 as usize],
            "cannot add a field to committed class {}",
            self.classes[owner.0 as usize].name
        );
        self.classes[owner.0 as usize].fields.push(id);
        self.fields.push(def);
        self.fields_committed.push(false);
        id
    }

    pub fn add_type_param(&mut self, name: &str) -> TypeVarId {
        let id = TypeVarId(self.type_params.len() as u32);
        self.type_params.push(TypeParamDef { name: Name::new(name), bounds: Vec::new() });
        id
    }

    /// Bounds are often set after creation, once the bounded types exist
    /// (F-bounded parameters refer back to the parameter itself).
    pub fn set_type_param_bounds(&mut self, id: TypeVarId, bounds: Vec<crate::Type>) {
        self.type_params[id.0 as usize].bounds = bounds;
    }

    pub fn class_mut(&mut self, id: ClassId) -> &mut ClassDef {
        assert!(
            !self.classes_committed[id.0 as usize],
            "attempt to mutate committed class {}",
            self.classes[id.0 as usize].name
        );
        &mut self.classes[id.0 as usize]
    }

    pub fn method_mut(&mut self, id: MethodId) -> &mut MethodDef {
        assert!(
            !self.methods_committed[id.0 as usize],
            "attempt to mutate committed method {}",
            self.methods[id.0 as usize].name
        );
        &mut self.methods[id.0 as usize]
    }

    pub fn field_mut(&mut self, id: FieldId) -> &mut FieldDef {
        assert!(
            !self.fields_committed[id.0 as usize],
            "attempt to mutate committed field {}",
            self.fields[id.0 as usize].name
        );
        &mut self.fields[id.0 as usize]
    }

    pub fn set_method_body(&mut self, id: MethodId, body: Expression) {
        self.method_mut(id).body = Some(body);
    }

    pub fn set_field_initializer(&mut self, id: FieldId, initializer: Expression) {
        self.field_mut(id).initializer = Some(initializer);
    }

    pub fn commit_method(&mut self, id: MethodId) {
        self.methods_committed[id.0 as usize] = true;
    }

    pub fn commit_field(&mut self, id: FieldId) {
        self.fields_committed[id.0 as usize] = true;
    }

    /// Commits the class and all of its members. One-way.
    pub fn commit_class(&mut self, id: ClassId) {
        let (methods, constructors, fields) = {
            let def = &self.classes[id.0 as usize];
            (def.methods.clone(), def.constructors.clone(), def.fields.clone())
        };
        for m in methods.into_iter().chain(constructors) {
            self.commit_method(m);
        }
        for f in fields {
            self.commit_field(f);
        }
        self.classes_committed[id.0 as usize] = true;
    }

    pub fn is_class_committed(&self, id: ClassId) -> bool {
        self.classes_committed[id.0 as usize]
    }

    pub fn is_method_committed(&self, id: MethodId) -> bool {
        self.methods_committed[id.0 as usize]
    }

    pub fn is_field_committed(&self, id: FieldId) -> bool {
        self.fields_committed[id.0 as usize]
    }

    pub fn class_ids(&self) -> impl Iterator<Item = ClassId> {
        (0..self.classes.len() as u32).map(ClassId)
    }
}

impl Default for TypeStore {
    fn default() -> Self {
        TypeStore::new()
    }
}

impl TypeEnv for TypeStore {
    fn class(&self, id: ClassId) -> &ClassDef {
        &self.classes[id.0 as usize]
    }

    fn method(&self, id: MethodId) -> &MethodDef {
        &self.methods[id.0 as usize]
    }

    fn field(&self, id: FieldId) -> &FieldDef {
        &self.fields[id.0 as usize]
    }

    fn type_param(&self, id: TypeVarId) -> &TypeParamDef {
        &self.type_params[id.0 as usize]
    }

    fn lookup_class(&self, fqn: &str) -> Option<ClassId> {
        self.by_name.get(&TypeName::new(fqn)).copied()
    }

    fn well_known(&self) -> &WellKnown {
        &self.well_known
    }
}
