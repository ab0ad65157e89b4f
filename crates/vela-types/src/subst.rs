//! Type-parameter substitution maps and the per-method variant used by
//! overload resolution.

use std::collections::BTreeSet;
use std::collections::BTreeMap;
use std::hash::{Hash, Hasher};

use crate::{is_assignable, Base, MethodId, Type, TypeEnv, TypeVarId};

/// A map from type parameters to concrete (or more concrete) types.
/// `BTreeMap` keeps iteration order deterministic.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Substitution {
    map: BTreeMap<TypeVarId, Type>,
}

impl Substitution {
    pub fn new() -> Substitution {
        Substitution::default()
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    pub fn len(&self) -> usize {
        self.map.len()
    }

    pub fn insert(&mut self, var: TypeVarId, ty: Type) {
        self.map.insert(var, ty);
    }

    pub fn get(&self, var: TypeVarId) -> Option<&Type> {
        self.map.get(&var)
    }

    pub fn contains(&self, var: TypeVarId) -> bool {
        self.map.contains_key(&var)
    }

    pub fn iter(&self) -> impl Iterator<Item = (TypeVarId, &Type)> {
        self.map.iter().map(|(k, v)| (*k, v))
    }

    /// Union where `other`'s entries win on conflict.
    pub fn merge(&self, other: &Substitution) -> Substitution {
        let mut map = self.map.clone();
        for (k, v) in &other.map {
            map.insert(*k, v.clone());
        }
        Substitution { map }
    }

    /// Union keeping the most specific binding per key: on conflict the
    /// subtype wins.
    pub fn merge_most_specific(&self, env: &dyn TypeEnv, other: &Substitution) -> Substitution {
        let mut map = self.map.clone();
        for (k, v) in &other.map {
            match map.get(k) {
                Some(existing) => {
                    map.insert(*k, most_specific(env, existing, v));
                }
                None => {
                    map.insert(*k, v.clone());
                }
            }
        }
        Substitution { map }
    }
}

fn most_specific(env: &dyn TypeEnv, a: &Type, b: &Type) -> Type {
    if a == b {
        return a.clone();
    }
    // `b` fits where `a` is expected: `b` is the subtype, keep it.
    if is_assignable(env, a, b).is_some() {
        b.clone()
    } else {
        a.clone()
    }
}

impl FromIterator<(TypeVarId, Type)> for Substitution {
    fn from_iter<I: IntoIterator<Item = (TypeVarId, Type)>>(iter: I) -> Self {
        Substitution { map: iter.into_iter().collect() }
    }
}

impl Type {
    /// Replaces type parameters by their bindings. Array dimensions add up:
    /// substituting `{T -> String[]}` into `T[]` yields `String[][]`.
    pub fn substitute(&self, env: &dyn TypeEnv, subst: &Substitution) -> Type {
        match self.base {
            Base::Var(v) => match subst.get(v) {
                Some(bound) => {
                    let mut t = bound.clone();
                    t.arrays += self.arrays;
                    t
                }
                None => self.clone(),
            },
            Base::Class(_) => {
                let args = self.args.iter().map(|a| a.substitute(env, subst)).collect();
                Type { base: self.base, args, arrays: self.arrays }
            }
            _ => self.clone(),
        }
    }

    /// Replaces type parameters by their first bound (`Object` if unbounded),
    /// recursively. Used when a signature must be viewed without free
    /// parameters.
    pub fn replace_by_bounds(&self, env: &dyn TypeEnv) -> Type {
        let mut seen = BTreeSet::new();
        self.replace_by_bounds_rec(env, &mut seen)
    }

    fn replace_by_bounds_rec(&self, env: &dyn TypeEnv, seen: &mut BTreeSet<TypeVarId>) -> Type {
        match self.base {
            Base::Var(v) => {
                if !seen.insert(v) {
                    return Type::simple(env.well_known().object).with_arrays(self.arrays);
                }
                let tp = env.type_param(v);
                let mut t = match tp.bounds.first() {
                    Some(bound) => bound.replace_by_bounds_rec(env, seen),
                    None => Type::simple(env.well_known().object),
                };
                t.arrays += self.arrays;
                t
            }
            Base::Class(_) => {
                let args =
                    self.args.iter().map(|a| a.replace_by_bounds_rec(env, seen)).collect();
                Type { base: self.base, args, arrays: self.arrays }
            }
            _ => self.clone(),
        }
    }

    /// All type parameters occurring in this type.
    pub fn type_vars(&self) -> BTreeSet<TypeVarId> {
        let mut out = BTreeSet::new();
        self.collect_type_vars(&mut out);
        out
    }

    fn collect_type_vars(&self, out: &mut BTreeSet<TypeVarId>) {
        if let Base::Var(v) = self.base {
            out.insert(v);
        }
        for a in &self.args {
            a.collect_type_vars(out);
        }
    }

    /// The substitution binding the base class's formal type parameters to
    /// this type's arguments, gathered recursively through the arguments.
    /// `List<String>` yields `{E -> String}`.
    pub fn initial_type_parameter_map(&self, env: &dyn TypeEnv) -> Substitution {
        let mut subst = Substitution::new();
        let mut seen = BTreeSet::new();
        self.initial_map_rec(env, &mut subst, &mut seen);
        subst
    }

    fn initial_map_rec(
        &self,
        env: &dyn TypeEnv,
        subst: &mut Substitution,
        seen: &mut BTreeSet<Type>,
    ) {
        if !seen.insert(self.clone()) {
            return;
        }
        if let Base::Class(c) = self.base {
            let def = env.class(c);
            for (formal, arg) in def.type_params.iter().zip(&self.args) {
                if !subst.contains(*formal) {
                    subst.insert(*formal, arg.clone());
                }
                arg.initial_map_rec(env, subst, seen);
            }
        }
    }

    /// The reverse view: arguments that are themselves type parameters map to
    /// the base class's formal parameter at that position. For `Stream<R>`
    /// where `R` is a method's parameter, yields `{R -> T-of-Stream}`.
    pub fn forward_type_parameter_map(&self, env: &dyn TypeEnv) -> Substitution {
        let mut subst = Substitution::new();
        let mut seen = BTreeSet::new();
        self.forward_map_rec(env, &mut subst, &mut seen);
        subst
    }

    fn forward_map_rec(
        &self,
        env: &dyn TypeEnv,
        subst: &mut Substitution,
        seen: &mut BTreeSet<Type>,
    ) {
        if !seen.insert(self.clone()) {
            return;
        }
        if let Base::Class(c) = self.base {
            let def = env.class(c);
            for (formal, arg) in def.type_params.iter().zip(&self.args) {
                if let Base::Var(v) = arg.base {
                    if !subst.contains(v) {
                        subst.insert(v, Type::var(*formal));
                    }
                } else {
                    arg.forward_map_rec(env, subst, seen);
                }
            }
        }
    }
}

/// A resolved method together with the concrete bindings for the type
/// parameters in scope at the call site. Identity is the method alone: two
/// maps for the same method are the same candidate.
#[derive(Debug, Clone)]
pub struct MethodSubst {
    pub method: MethodId,
    pub concrete: Substitution,
}

impl PartialEq for MethodSubst {
    fn eq(&self, other: &Self) -> bool {
        self.method == other.method
    }
}

impl Eq for MethodSubst {}

impl Hash for MethodSubst {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.method.hash(state);
    }
}

impl MethodSubst {
    pub fn new(method: MethodId, concrete: Substitution) -> MethodSubst {
        MethodSubst { method, concrete }
    }

    pub fn concrete_return_type(&self, env: &dyn TypeEnv) -> Type {
        env.method(self.method).return_type.substitute(env, &self.concrete)
    }

    /// The concrete type of parameter `i`. Indices past the end slide to the
    /// last (varargs) parameter.
    pub fn concrete_param_type(&self, env: &dyn TypeEnv, i: usize) -> Type {
        let def = env.method(self.method);
        let param = if i < def.params.len() {
            &def.params[i]
        } else {
            def.params.last().expect("parameter index on a method without parameters")
        };
        param.ty.substitute(env, &self.concrete)
    }

    /// Merges further bindings, keeping the most specific type per parameter.
    pub fn expand(&self, env: &dyn TypeEnv, extra: &Substitution) -> MethodSubst {
        MethodSubst {
            method: self.method,
            concrete: self.concrete.merge_most_specific(env, extra),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::TypeStore;
    use pretty_assertions::assert_eq;

    #[test]
    fn substitute_adds_array_dimensions() {
        let mut store = TypeStore::with_minimal_core();
        let t = store.add_type_param("T");
        let string = Type::simple(store.well_known().string);
        let subst: Substitution = [(t, string.array_of())].into_iter().collect();
        let out = Type::var(t).array_of().substitute(&store, &subst);
        assert_eq!(out, string.with_arrays(2));
    }

    #[test]
    fn initial_map_of_parameterized_list() {
        let store = TypeStore::with_minimal_core();
        let list = store.lookup_class("java.util.List").unwrap();
        let e = store.class(list).type_params[0];
        let string = Type::simple(store.well_known().string);
        let ty = Type::class(list, vec![string.clone()]);
        let map = ty.initial_type_parameter_map(&store);
        assert_eq!(map.get(e), Some(&string));
    }

    #[test]
    fn forward_map_points_back_at_formals() {
        let mut store = TypeStore::with_minimal_core();
        let list = store.lookup_class("java.util.List").unwrap();
        let e = store.class(list).type_params[0];
        let r = store.add_type_param("R");
        let ty = Type::class(list, vec![Type::var(r)]);
        let map = ty.forward_type_parameter_map(&store);
        assert_eq!(map.get(r), Some(&Type::var(e)));
    }

    #[test]
    fn method_subst_slides_to_varargs_parameter() {
        let store = TypeStore::with_minimal_core();
        let list = store.lookup_class("java.util.List").unwrap();
        let of = store
            .class(list)
            .methods
            .iter()
            .copied()
            .find(|m| store.method(*m).name.as_str() == "of")
            .unwrap();
        let f = store.method(of).type_params[0];
        let string = Type::simple(store.well_known().string);
        let ms = MethodSubst::new(of, [(f, string.clone())].into_iter().collect());
        // Index 3 still refers to the single varargs parameter `F...`.
        assert_eq!(ms.concrete_param_type(&store, 3), string.array_of());
        assert_eq!(
            ms.concrete_return_type(&store),
            Type::class(list, vec![string])
        );
    }

    #[test]
    fn merge_most_specific_prefers_the_subtype() {
        let mut store = TypeStore::with_minimal_core();
        let t = store.add_type_param("T");
        let object = Type::simple(store.well_known().object);
        let string = Type::simple(store.well_known().string);
        let broad: Substitution = [(t, object)].into_iter().collect();
        let narrow: Substitution = [(t, string.clone())].into_iter().collect();
        assert_eq!(broad.merge_most_specific(&store, &narrow).get(t), Some(&string));
        assert_eq!(narrow.merge_most_specific(&store, &broad).get(t), Some(&string));
    }
}
