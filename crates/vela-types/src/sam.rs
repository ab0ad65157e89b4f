//! Single-abstract-method discovery for functional interfaces.

use std::collections::HashSet;

use crate::{ClassId, MethodSubst, Type, TypeEnv};

/// The single abstract method of a functional interface, together with the
/// type-parameter bindings implied by `ty`'s arguments. When the abstract
/// method is inherited, the bindings are composed along the interface
/// hierarchy path that reaches it.
pub fn single_abstract_method_of(env: &dyn TypeEnv, ty: &Type) -> Option<MethodSubst> {
    if ty.arrays > 0 {
        return None;
    }
    let mut visited = HashSet::new();
    find(env, ty, &mut visited)
}

fn find(env: &dyn TypeEnv, ty: &Type, visited: &mut HashSet<ClassId>) -> Option<MethodSubst> {
    let class = ty.best_class(env)?;
    if !visited.insert(class) {
        return None;
    }
    let def = env.class(class);
    if !def.is_interface() {
        return None;
    }
    let mut abstracts = def
        .methods
        .iter()
        .copied()
        .filter(|m| {
            let md = env.method(*m);
            md.is_abstract && !md.is_default && !md.is_static
        })
        .collect::<Vec<_>>();
    match abstracts.len() {
        0 => {
            // Inherited SAM: walk super-interfaces with this type's bindings
            // applied, so the map stays in terms of concrete types.
            let map = ty.initial_type_parameter_map(env);
            for itf in &def.interfaces {
                let instantiated = itf.substitute(env, &map);
                if let Some(found) = find(env, &instantiated, visited) {
                    return Some(found);
                }
            }
            None
        }
        1 => {
            let method = abstracts.pop().unwrap();
            Some(MethodSubst::new(method, ty.initial_type_parameter_map(env)))
        }
        _ => None,
    }
}

impl Type {
    pub fn is_functional_interface(&self, env: &dyn TypeEnv) -> bool {
        single_abstract_method_of(env, self).is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{ClassDef, ClassKind, TypeStore};
    use pretty_assertions::assert_eq;
    use vela_core::PackageName;

    #[test]
    fn function_has_a_sam_with_bindings() {
        let store = TypeStore::with_minimal_core();
        let function = store.lookup_class("java.util.function.Function").unwrap();
        let string = Type::simple(store.well_known().string);
        let integer = Type::simple(store.well_known().boxed_int);
        let ty = Type::class(function, vec![string.clone(), integer.clone()]);
        let sam = single_abstract_method_of(&store, &ty).unwrap();
        assert_eq!(store.method(sam.method).name.as_str(), "apply");
        assert_eq!(sam.concrete_param_type(&store, 0), string);
        assert_eq!(sam.concrete_return_type(&store), integer);
    }

    #[test]
    fn inherited_sam_composes_bindings() {
        let mut store = TypeStore::with_minimal_core();
        let function = store.lookup_class("java.util.function.Function").unwrap();
        let string = Type::simple(store.well_known().string);
        // interface StringMapper<R> extends Function<String, R> {}
        let r = store.add_type_param("R");
        let mapper = store.add_class(ClassDef {
            type_params: vec![r],
            interfaces: vec![Type::class(function, vec![string.clone(), Type::var(r)])],
            ..ClassDef::new(PackageName::from_dotted("a"), "StringMapper", ClassKind::Interface)
        });
        let integer = Type::simple(store.well_known().boxed_int);
        let ty = Type::class(mapper, vec![integer.clone()]);
        let sam = single_abstract_method_of(&store, &ty).unwrap();
        assert_eq!(store.method(sam.method).name.as_str(), "apply");
        assert_eq!(sam.concrete_param_type(&store, 0), string);
        assert_eq!(sam.concrete_return_type(&store), integer);
    }

    #[test]
    fn a_class_is_not_functional() {
        let store = TypeStore::with_minimal_core();
        let string = Type::simple(store.well_known().string);
        assert!(!string.is_functional_interface(&store));
    }

    #[test]
    fn two_abstract_methods_disqualify() {
        let mut store = TypeStore::with_minimal_core();
        let pkg = PackageName::from_dotted("a");
        let broken = store.add_class(ClassDef::new(pkg, "TwoWays", ClassKind::Interface));
        for name in ["first", "second"] {
            let mut m = crate::MethodDef::new(broken, name, vec![], Type::void());
            m.is_abstract = true;
            store.add_method(m);
        }
        assert!(!Type::simple(broken).is_functional_interface(&store));
    }
}
