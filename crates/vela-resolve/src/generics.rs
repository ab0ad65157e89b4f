//! Binding formal type parameters against concrete types.
//!
//! The central operation is [`translate_map`]: given a formal type as it
//! appears in a signature and the concrete type of what was actually
//! provided, compute the substitution for the formal's type parameters.
//! Functional interfaces translate per SAM parameter and return type;
//! otherwise the two types are related through the class hierarchy.

use tracing::trace;
use vela_types::{
    single_abstract_method_of, Base, ClassDef, ClassId, MethodSubst, Substitution, Type, TypeEnv,
};

use crate::error::ResolveError;

/// Generic structures found in real code do not nest anywhere near this
/// deep; hitting the limit means a cyclic or degenerate construction.
const RECURSION_LIMIT: usize = 20;

pub fn translate_map(
    env: &dyn TypeEnv,
    formal: &Type,
    concrete: &Type,
    concrete_is_assignable_to_formal: bool,
) -> Result<Substitution, ResolveError> {
    translate_map_rec(env, formal, concrete, concrete_is_assignable_to_formal, 0)
}

fn translate_map_rec(
    env: &dyn TypeEnv,
    formal: &Type,
    concrete: &Type,
    assignable: bool,
    depth: usize,
) -> Result<Substitution, ResolveError> {
    if depth > RECURSION_LIMIT {
        return Err(ResolveError::MalformedGenerics {
            message: format!(
                "recursion limit reached translating {} against {}",
                formal.describe(env),
                concrete.describe(env)
            ),
        });
    }

    // A bare type parameter binds directly. When the formal carries array
    // dimensions they are peeled off the concrete type; a functional concrete
    // type contributes its SAM return type instead.
    if let Base::Var(v) = formal.base {
        let mut map = Substitution::new();
        let bound = if formal.arrays > 0 {
            match single_abstract_method_of(env, concrete) {
                Some(sam) if concrete.arrays == 0 => sam.concrete_return_type(env),
                _ => concrete.copy_with_fewer_arrays(formal.arrays),
            }
        } else {
            concrete.clone()
        };
        map.insert(v, bound);
        return Ok(map);
    }

    // A formal without type arguments has nothing to bind.
    if formal.args.is_empty() {
        return Ok(Substitution::new());
    }

    if formal.base_class().is_some() && formal.base_class() == concrete.base_class() {
        let mut map = Substitution::new();
        for (pat, conc) in formal.args.iter().zip(&concrete.args) {
            bind_structurally(env, pat, conc, &mut map);
        }
        return Ok(map);
    }

    let formal_sam = single_abstract_method_of(env, formal);
    let concrete_sam = single_abstract_method_of(env, concrete);
    if let (Some(f_sam), Some(c_sam)) = (formal_sam, concrete_sam) {
        return translate_functional_pair(env, &f_sam, &c_sam, assignable, depth);
    }

    let Some(concrete_class) = concrete.base_class() else {
        return Ok(Substitution::new());
    };
    let related = if assignable {
        map_in_terms_of_parameters_of_super_type(env, concrete_class, formal)
    } else {
        map_in_terms_of_parameters_of_sub_type(env, formal, concrete)
    };
    let m1 = concrete.initial_type_parameter_map(env);
    let combined = combine_maps(&m1, &related.unwrap_or_default());
    trace!(
        formal = %formal.describe(env),
        concrete = %concrete.describe(env),
        bindings = combined.len(),
        "translated through hierarchy"
    );
    Ok(combined)
}

fn translate_functional_pair(
    env: &dyn TypeEnv,
    formal_sam: &MethodSubst,
    concrete_sam: &MethodSubst,
    assignable: bool,
    depth: usize,
) -> Result<Substitution, ResolveError> {
    let formal_arity = env.method(formal_sam.method).params.len();
    let concrete_arity = env.method(concrete_sam.method).params.len();
    if formal_arity != concrete_arity {
        return Err(ResolveError::MalformedGenerics {
            message: format!(
                "functional types disagree on arity: {} takes {} argument(s), {} takes {}",
                env.method(formal_sam.method).name,
                formal_arity,
                env.method(concrete_sam.method).name,
                concrete_arity
            ),
        });
    }
    let mut map = Substitution::new();
    for i in 0..formal_arity {
        let fp = formal_sam.concrete_param_type(env, i);
        let cp = concrete_sam.concrete_param_type(env, i);
        map = map.merge(&translate_map_rec(env, &fp, &cp, assignable, depth + 1)?);
    }
    let fr = formal_sam.concrete_return_type(env);
    let cr = concrete_sam.concrete_return_type(env);
    if !fr.is_void() && !cr.is_void() {
        map = map.merge(&translate_map_rec(env, &fr, &cr, assignable, depth + 1)?);
    }
    Ok(map)
}

/// Entries of `m2` whose value is itself a type parameter get rerouted
/// through `m1`; everything in `m1` is kept.
pub fn combine_maps(m1: &Substitution, m2: &Substitution) -> Substitution {
    let mut out = m1.clone();
    for (k, v) in m2.iter() {
        if let Base::Var(pv) = v.base {
            if let Some(bound) = m1.get(pv) {
                let mut t = bound.clone();
                t.arrays += v.arrays;
                out.insert(k, t);
                continue;
            }
        }
        out.insert(k, v.clone());
    }
    out
}

/// Matches a pattern (a formal type containing type parameters) against a
/// concrete type, binding every parameter it encounters. First binding wins.
fn bind_structurally(env: &dyn TypeEnv, pattern: &Type, concrete: &Type, map: &mut Substitution) {
    match pattern.base {
        Base::Var(v) => {
            if !map.contains(v) {
                map.insert(v, concrete.copy_with_fewer_arrays(pattern.arrays));
            }
        }
        Base::Class(_) if pattern.base == concrete.base => {
            for (p, c) in pattern.args.iter().zip(&concrete.args) {
                bind_structurally(env, p, c, map);
            }
        }
        _ => {}
    }
}

/// `sub` is a subtype of the formal's class: express the type parameters
/// occurring in `formal`'s arguments in terms of `sub`'s declared parameters.
/// `Collection<T>` against `ArrayList` yields `{T -> E-of-ArrayList}`.
pub fn map_in_terms_of_parameters_of_super_type(
    env: &dyn TypeEnv,
    sub: ClassId,
    formal: &Type,
) -> Option<Substitution> {
    let formal_class = formal.base_class()?;
    let def = env.class(sub);
    for parent in parents(def) {
        let Some(pc) = parent.base_class() else { continue };
        if pc == formal_class {
            let mut map = Substitution::new();
            for (pat, val) in formal.args.iter().zip(&parent.args) {
                bind_structurally(env, pat, val, &mut map);
            }
            return Some(map);
        }
        if let Some(inner) = map_in_terms_of_parameters_of_super_type(env, pc, formal) {
            // Inner values are in terms of `pc`'s parameters; view them
            // through this level's instantiation.
            let pdef = env.class(pc);
            let parent_initial: Substitution = pdef
                .type_params
                .iter()
                .copied()
                .zip(parent.args.iter().cloned())
                .collect();
            let mut out = Substitution::new();
            for (k, v) in inner.iter() {
                out.insert(k, v.substitute(env, &parent_initial));
            }
            return Some(out);
        }
    }
    None
}

/// The formal's class is a subtype of the concrete's class: bind the type
/// parameters in `formal`'s arguments from the concrete supertype's
/// arguments. `List<T>` against `Collection<String>` yields `{T -> String}`.
pub fn map_in_terms_of_parameters_of_sub_type(
    env: &dyn TypeEnv,
    formal: &Type,
    concrete: &Type,
) -> Option<Substitution> {
    let formal_class = formal.base_class()?;
    let declared = declared_bindings(env, formal_class, concrete)?;
    let fdef = env.class(formal_class);
    let mut out = Substitution::new();
    for (i, pat) in formal.args.iter().enumerate() {
        if let Some(declared_param) = fdef.type_params.get(i) {
            if let Some(v) = declared.get(*declared_param) {
                bind_structurally(env, pat, v, &mut out);
            }
        }
    }
    Some(out)
}

/// Walks from `sub` up to `target`'s class, binding `sub`'s declared type
/// parameters to `target`'s arguments.
fn declared_bindings(env: &dyn TypeEnv, sub: ClassId, target: &Type) -> Option<Substitution> {
    let target_class = target.base_class()?;
    let def = env.class(sub);
    for parent in parents(def) {
        let Some(pc) = parent.base_class() else { continue };
        if pc == target_class {
            let mut map = Substitution::new();
            for (pat, val) in parent.args.iter().zip(&target.args) {
                bind_structurally(env, pat, val, &mut map);
            }
            return Some(map);
        }
        if let Some(inner) = declared_bindings(env, pc, target) {
            let pdef = env.class(pc);
            let mut map = Substitution::new();
            for (j, f) in pdef.type_params.iter().enumerate() {
                if let (Some(pat), Some(val)) = (parent.args.get(j), inner.get(*f)) {
                    bind_structurally(env, pat, val, &mut map);
                }
            }
            return Some(map);
        }
    }
    None
}

fn parents(def: &ClassDef) -> impl Iterator<Item = &Type> {
    def.super_class.iter().chain(def.interfaces.iter())
}

/// The SAM of a functional interface, or an error when `complain` and there
/// is none.
pub fn find_single_abstract_method(
    env: &dyn TypeEnv,
    ty: &Type,
    complain: bool,
) -> Result<Option<MethodSubst>, ResolveError> {
    match single_abstract_method_of(env, ty) {
        Some(sam) => Ok(Some(sam)),
        None if complain => Err(ResolveError::MalformedGenerics {
            message: format!("{} is not a functional interface", ty.describe(env)),
        }),
        None => Ok(None),
    }
}
