//! Overload and constructor resolution.
//!
//! The pipeline: collect candidates by walking outward from the call's scope
//! type, evaluate arguments in erasure mode, score each candidate against
//! the argument type sets, trim (best score, most specific return type,
//! fixed arity over varargs), then re-evaluate the erased arguments against
//! the winner with precise forward types.

use std::collections::{BTreeMap, BTreeSet, HashSet};

use tracing::{debug, trace};
use vela_core::Name;
use vela_types::{
    distance_to_object, is_assignable, ClassId, Expression, MethodDef, MethodId, MethodSubst,
    Substitution, Type, TypeEnv,
};

use crate::context::Context;
use crate::error::ResolveError;
use crate::forward::{determine_forward_argument_type, ForwardType};
use crate::generics::translate_map;
use crate::imports::StaticImportMap;
use crate::resolver::{ParseHelper, Resolution};
use crate::scopes::NamedEntity;

/// Each hierarchy step away from the call's scope weighs this much.
pub const METHOD_DISTANCE_WEIGHT: u32 = 100;
/// Per argument folded into a varargs array.
pub const VARARGS_SKIP_WEIGHT: u32 = 10;
/// Applying a method in varargs form at all.
pub const VARARGS_PENALTY: u32 = 500;
/// Base score for a null-literal argument; the distance of the formal type
/// to `Object` is subtracted, so the type farthest from `Object` wins.
pub const NULL_BASE_SCORE: u32 = 10_000;
/// A static method reached through an instance call site still works, but
/// loses against anything better.
pub const STATIC_AT_INSTANCE_PENALTY: u32 = 100;

const PARENT_STEP: u32 = 1;
const INTERFACE_STEP: u32 = 2;
const ENCLOSING_STEP: u32 = 1;
const STATIC_IMPORT_STEP: u32 = 1;

/// How the call is scoped: unqualified, through a type, or through a value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScopeNature {
    Absent,
    Static,
    Instance,
}

#[derive(Debug, Clone)]
pub(crate) struct Candidate {
    pub(crate) subst: MethodSubst,
    pub(crate) distance: u32,
}

#[derive(Debug, Clone)]
pub(crate) struct Scored {
    pub(crate) candidate: Candidate,
    pub(crate) score: u32,
}

pub(crate) fn compatible_arity(md: &MethodDef, presented: usize) -> bool {
    if md.is_varargs() {
        presented + 1 >= md.params.len()
    } else {
        presented == md.params.len()
    }
}

/// Walks outward from the scope type: supertypes, enclosing types, static
/// imports. Distances accumulate; a method reachable several ways keeps its
/// shortest distance.
pub(crate) fn collect_method_candidates(
    env: &dyn TypeEnv,
    imports: &StaticImportMap,
    initial: &Type,
    nature: ScopeNature,
    name: &Name,
    presented: usize,
) -> Vec<Candidate> {
    let mut out: BTreeMap<MethodId, Candidate> = BTreeMap::new();
    let mut visited: HashSet<(ClassId, bool)> = HashSet::new();
    let static_only = nature == ScopeNature::Static;
    recurse_methods(
        env, initial, 0, static_only, nature, name, presented, &mut visited, &mut out,
    );
    if nature == ScopeNature::Absent {
        let mut import_classes: Vec<ClassId> = imports.class_for(name).into_iter().collect();
        import_classes.extend(imports.on_demand().iter().copied());
        for class in import_classes {
            recurse_methods(
                env,
                &Type::simple(class),
                STATIC_IMPORT_STEP,
                true,
                nature,
                name,
                presented,
                &mut visited,
                &mut out,
            );
        }
    }
    out.into_values().collect()
}

#[allow(clippy::too_many_arguments)]
fn recurse_methods(
    env: &dyn TypeEnv,
    ty: &Type,
    distance: u32,
    static_only: bool,
    nature: ScopeNature,
    name: &Name,
    presented: usize,
    visited: &mut HashSet<(ClassId, bool)>,
    out: &mut BTreeMap<MethodId, Candidate>,
) {
    let Some(class) = ty.best_class(env) else { return };
    if !visited.insert((class, static_only)) {
        return;
    }
    let map = ty.initial_type_parameter_map(env);
    let def = env.class(class);
    for &m in &def.methods {
        let md = env.method(m);
        if md.name != *name || !compatible_arity(md, presented) {
            continue;
        }
        if static_only && !md.is_static {
            continue;
        }
        let mut d = distance;
        if md.is_static && nature == ScopeNature::Instance {
            d += STATIC_AT_INSTANCE_PENALTY;
        }
        match out.get(&m) {
            Some(existing) if existing.distance <= d => {}
            _ => {
                out.insert(m, Candidate { subst: MethodSubst::new(m, map.clone()), distance: d });
            }
        }
    }
    if let Some(sup) = &def.super_class {
        let inst = sup.substitute(env, &map);
        recurse_methods(
            env, &inst, distance + PARENT_STEP, static_only, nature, name, presented, visited, out,
        );
    }
    for itf in &def.interfaces {
        let inst = itf.substitute(env, &map);
        recurse_methods(
            env, &inst, distance + INTERFACE_STEP, static_only, nature, name, presented, visited,
            out,
        );
    }
    // Interfaces and root-less classes still answer to Object.
    let object = env.well_known().object;
    if def.super_class.is_none() && class != object {
        recurse_methods(
            env,
            &Type::simple(object),
            distance + PARENT_STEP,
            static_only,
            nature,
            name,
            presented,
            visited,
            out,
        );
    }
    if let Some(enc) = def.enclosing {
        // Crossing out of a static nested type loses access to the
        // enclosing instance.
        let enc_static_only = static_only || def.is_static;
        let enc_def = env.class(enc);
        let enc_ty =
            Type::class(enc, enc_def.type_params.iter().map(|tp| Type::var(*tp)).collect());
        recurse_methods(
            env,
            &enc_ty,
            distance + ENCLOSING_STEP,
            enc_static_only,
            nature,
            name,
            presented,
            visited,
            out,
        );
    }
}

pub(crate) fn collect_constructor_candidates(
    env: &dyn TypeEnv,
    ty: &Type,
    presented: usize,
) -> Vec<Candidate> {
    let Some(class) = ty.base_class() else { return Vec::new() };
    let map = ty.initial_type_parameter_map(env);
    env.class(class)
        .constructors
        .iter()
        .copied()
        .filter(|c| compatible_arity(env.method(*c), presented))
        .map(|c| Candidate { subst: MethodSubst::new(c, map.clone()), distance: 0 })
        .collect()
}

/// Scores every candidate against the evaluated arguments. A candidate with
/// an argument that fits no erasure candidate drops out.
pub(crate) fn score_candidates(
    env: &dyn TypeEnv,
    candidates: Vec<Candidate>,
    args: &[Expression],
) -> Vec<Scored> {
    let mut scored = Vec::new();
    'cand: for cand in candidates {
        let md = env.method(cand.subst.method);
        let declared = md.params.len();
        let mut sum = 0u32;
        // Fewer arguments than parameters means an empty varargs array.
        let mut varargs_used = args.len() < declared;
        for (i, arg) in args.iter().enumerate() {
            let formal = cand.subst.concrete_param_type(env, i);
            let last_slot = md.is_varargs() && i + 1 >= declared;
            let score = if arg.is_null_literal() {
                if formal.is_primitive() {
                    continue 'cand;
                }
                let d = distance_to_object(env, &formal).unwrap_or(0);
                NULL_BASE_SCORE - d.min(NULL_BASE_SCORE)
            } else {
                let mut best: Option<(u32, bool)> = None;
                for t in arg.erasure_types(env) {
                    if let Some(s) = is_assignable(env, &formal, &t) {
                        if best.map_or(true, |(b, _)| s < b) {
                            best = Some((s, false));
                        }
                    }
                    if last_slot {
                        let element = formal.copy_with_fewer_arrays(1);
                        if let Some(s) = is_assignable(env, &element, &t) {
                            if best.map_or(true, |(b, _)| s < b) {
                                best = Some((s, true));
                            }
                        }
                    }
                }
                match best {
                    None => continue 'cand,
                    Some((s, element_form)) => {
                        varargs_used |= element_form;
                        s
                    }
                }
            };
            sum += score;
        }
        let skipped = args.len().saturating_sub(declared) as u32;
        let mut total =
            sum + METHOD_DISTANCE_WEIGHT * cand.distance + VARARGS_SKIP_WEIGHT * skipped;
        if varargs_used || skipped > 0 {
            total += VARARGS_PENALTY;
        }
        trace!(method = cand.subst.method.0, total, "scored candidate");
        scored.push(Scored { candidate: cand, score: total });
    }
    scored
}

pub(crate) fn trim_best_score(scored: Vec<Scored>) -> Vec<Scored> {
    let Some(min) = scored.iter().map(|s| s.score).min() else { return scored };
    scored.into_iter().filter(|s| s.score == min).collect()
}

/// Among score ties, keep the candidates whose return type fits into every
/// other's. When nothing qualifies, keep them all.
pub(crate) fn trim_most_specific_return(env: &dyn TypeEnv, scored: Vec<Scored>) -> Vec<Scored> {
    if scored.len() <= 1 {
        return scored;
    }
    let returns: Vec<Type> =
        scored.iter().map(|s| s.candidate.subst.concrete_return_type(env)).collect();
    let keep: Vec<bool> = returns
        .iter()
        .enumerate()
        .map(|(i, ri)| {
            returns
                .iter()
                .enumerate()
                .all(|(j, rj)| i == j || is_assignable(env, rj, ri).is_some())
        })
        .collect();
    if keep.iter().any(|k| *k) && !keep.iter().all(|k| *k) {
        scored
            .into_iter()
            .zip(keep)
            .filter_map(|(s, k)| k.then_some(s))
            .collect()
    } else {
        scored
    }
}

/// A fixed-arity method beats varargs when both survive.
pub(crate) fn trim_varargs_vs_fixed(env: &dyn TypeEnv, scored: Vec<Scored>) -> Vec<Scored> {
    if scored.iter().any(|s| !env.method(s.candidate.subst.method).is_varargs()) {
        scored
            .into_iter()
            .filter(|s| !env.method(s.candidate.subst.method).is_varargs())
            .collect()
    } else {
        scored
    }
}

fn sort_key(env: &dyn TypeEnv, s: &Scored) -> (u32, bool, u32) {
    let md = env.method(s.candidate.subst.method);
    (s.candidate.distance, !md.is_public, s.candidate.subst.method.0)
}

/// Deterministic final order: shallowest first, public first, stable id.
pub(crate) fn sort_candidates(env: &dyn TypeEnv, scored: &mut [Scored]) {
    scored.sort_by_key(|s| sort_key(env, s));
}

impl<'e, N> Resolution<'e, N> {
    /// A variable by simple name, innermost scope first.
    pub fn resolve_variable(&self, ctx: &Context, name: &Name) -> Result<Expression, ResolveError> {
        match self.var_scopes.get(ctx.var_scope, name) {
            Some(v) => Ok(Expression::Variable { name: v.name.clone(), ty: v.ty.clone() }),
            None => Err(ResolveError::UnresolvedVariable { name: name.to_string() }),
        }
    }

    /// A type by simple or qualified name, through the type context.
    pub fn resolve_type_name(
        &self,
        ctx: &Context,
        name: &str,
        complain: bool,
    ) -> Result<Option<Type>, ResolveError> {
        match self.type_scopes.get(self.env, ctx.type_scope, name, complain)? {
            Some(NamedEntity::Class(c)) => Ok(Some(Type::simple(c))),
            Some(NamedEntity::TypeParam(v)) => Ok(Some(Type::var(v))),
            None => Ok(None),
        }
    }

    /// A bare name: variable first, then type.
    pub fn resolve_name(&self, ctx: &Context, name: &Name) -> Result<Expression, ResolveError> {
        if let Ok(var) = self.resolve_variable(ctx, name) {
            return Ok(var);
        }
        match self.resolve_type_name(ctx, name.as_str(), false)? {
            Some(ty) => Ok(Expression::TypeRef(ty)),
            None => Err(ResolveError::UnresolvedName { name: name.to_string() }),
        }
    }

    /// Resolves `scope.name(args...)` (or unqualified `name(args...)`).
    ///
    /// In erasure mode the result is an erased expression carrying the
    /// surviving candidates' return types; otherwise the winner is chosen
    /// and erased arguments are re-evaluated against it.
    pub fn resolve_method_call<P: ParseHelper<Node = N>>(
        &mut self,
        helper: &P,
        ctx: &Context,
        forward: &ForwardType,
        name: &Name,
        scope_node: Option<&N>,
        arg_nodes: &[N],
    ) -> Result<Expression, ResolveError> {
        let env = self.env;
        let (scope_expr, scope_ty, nature) = match scope_node {
            Some(node) => {
                let e =
                    helper.parse_expression(self, ctx, &ForwardType::none_erasure_on_failure(), node)?;
                let nature = if e.is_type_reference() {
                    ScopeNature::Static
                } else {
                    ScopeNature::Instance
                };
                let ty = e.ty(env);
                (e, ty, nature)
            }
            None => {
                let ty = ctx.enclosing_type_as_type(env).ok_or_else(|| {
                    ResolveError::UnresolvedName { name: name.to_string() }
                })?;
                (Expression::TypeRef(ty.clone()), ty, ScopeNature::Absent)
            }
        };
        let imports = self.type_scopes.static_imports(ctx.type_scope).clone();
        let candidates =
            collect_method_candidates(env, &imports, &scope_ty, nature, name, arg_nodes.len());
        if candidates.is_empty() {
            return Err(ResolveError::NoApplicableOverload {
                name: name.to_string(),
                arity: arg_nodes.len(),
            });
        }

        let mut args = Vec::with_capacity(arg_nodes.len());
        for node in arg_nodes {
            args.push(helper.parse_expression(self, ctx, &ForwardType::erasure(), node)?);
        }

        let scored = score_candidates(env, candidates, &args);
        if scored.is_empty() {
            return Err(ResolveError::NoApplicableOverload {
                name: name.to_string(),
                arity: arg_nodes.len(),
            });
        }
        let mut scored = trim_best_score(scored);
        scored = trim_most_specific_return(env, scored);
        scored = trim_varargs_vs_fixed(env, scored);
        sort_candidates(env, &mut scored);

        if forward.erasure {
            let candidates: BTreeSet<Type> = scored
                .iter()
                .map(|s| s.candidate.subst.concrete_return_type(env).erased(env))
                .collect();
            return Ok(Expression::Erased { candidates });
        }

        if scored.len() > 1 {
            let k0 = sort_key(env, &scored[0]);
            let k1 = sort_key(env, &scored[1]);
            if (k0.0, k0.1) == (k1.0, k1.1) {
                let candidates = scored
                    .iter()
                    .map(|s| {
                        let md = env.method(s.candidate.subst.method);
                        format!("{}.{}", env.class(md.owner).name, md.name)
                    })
                    .collect();
                return Err(ResolveError::AmbiguousOverload {
                    name: name.to_string(),
                    candidates,
                });
            }
        }
        let winner = scored.swap_remove(0).candidate;
        debug!(method = winner.subst.method.0, %name, "chose overload");

        let expansion = compute_map_expansion(env, &winner.subst, &args);
        let mut subst = winner.subst.expand(env, &expansion);

        for (i, node) in arg_nodes.iter().enumerate() {
            if args[i].contains_erased() {
                let fwd =
                    determine_forward_argument_type(env, &subst, i, forward.ty.as_ref(), &forward.extra);
                args[i] = helper.parse_expression(self, ctx, &fwd, node)?;
            }
        }
        let expansion = compute_map_expansion(env, &subst, &args);
        subst = subst.expand(env, &expansion);

        let mut return_type = subst.concrete_return_type(env);
        if !return_type.type_vars().is_empty() {
            if let Some(out) = &forward.ty {
                // The call's result flows outward, so the return type sits
                // below the expectation in the hierarchy.
                if let Ok(extra) = translate_map(env, &return_type, out, false) {
                    return_type = return_type.substitute(env, &extra);
                }
            }
        }

        Ok(Expression::MethodCall {
            method: subst.method,
            scope: Box::new(scope_expr),
            args,
            return_type,
        })
    }

    /// Resolves `new T(args...)`, including diamond inference from the
    /// forward type when `T` is written without arguments.
    pub fn resolve_constructor_call<P: ParseHelper<Node = N>>(
        &mut self,
        helper: &P,
        ctx: &Context,
        forward: &ForwardType,
        ty: &Type,
        arg_nodes: &[N],
    ) -> Result<Expression, ResolveError> {
        let env = self.env;
        let formal = diamond_formal(env, ty, forward);
        let describe = || formal.describe(env);
        let candidates = collect_constructor_candidates(env, &formal, arg_nodes.len());
        if candidates.is_empty() {
            return Err(ResolveError::NoApplicableOverload {
                name: describe(),
                arity: arg_nodes.len(),
            });
        }

        let mut args = Vec::with_capacity(arg_nodes.len());
        for node in arg_nodes {
            args.push(helper.parse_expression(self, ctx, &ForwardType::erasure(), node)?);
        }
        let scored = score_candidates(env, candidates, &args);
        if scored.is_empty() {
            return Err(ResolveError::NoApplicableOverload {
                name: describe(),
                arity: arg_nodes.len(),
            });
        }
        let mut scored = trim_best_score(scored);
        scored = trim_varargs_vs_fixed(env, scored);
        sort_candidates(env, &mut scored);

        if forward.erasure {
            let candidates: BTreeSet<Type> = scored
                .iter()
                .map(|s| s.candidate.subst.concrete_return_type(env).erased(env))
                .collect();
            return Ok(Expression::Erased { candidates });
        }
        if scored.len() > 1 && scored[0].score == scored[1].score {
            let candidates =
                scored.iter().map(|_| format!("{}.<init>", describe())).collect();
            return Err(ResolveError::AmbiguousOverload { name: describe(), candidates });
        }
        let winner = scored.swap_remove(0).candidate;

        let expansion = compute_map_expansion(env, &winner.subst, &args);
        let mut subst = winner.subst.expand(env, &expansion);
        for (i, node) in arg_nodes.iter().enumerate() {
            if args[i].contains_erased() {
                let fwd =
                    determine_forward_argument_type(env, &subst, i, forward.ty.as_ref(), &forward.extra);
                args[i] = helper.parse_expression(self, ctx, &fwd, node)?;
            }
        }
        let expansion = compute_map_expansion(env, &subst, &args);
        subst = subst.expand(env, &expansion);

        Ok(Expression::ConstructorCall {
            constructor: subst.method,
            args,
            ty: subst.concrete_return_type(env),
        })
    }
}

/// `new ArrayList<>()` expected as `List<String>`: view the constructed
/// class with its own parameters, bind them through the expectation.
fn diamond_formal(env: &dyn TypeEnv, ty: &Type, forward: &ForwardType) -> Type {
    if !ty.args.is_empty() {
        return ty.clone();
    }
    let Some(class) = ty.base_class() else { return ty.clone() };
    let def = env.class(class);
    if def.type_params.is_empty() {
        return ty.clone();
    }
    let Some(expected) = &forward.ty else { return ty.clone() };
    let self_ty = Type::class(class, def.type_params.iter().map(|tp| Type::var(*tp)).collect());
    match translate_map(env, &self_ty, expected, false) {
        Ok(map) if !map.is_empty() => self_ty.substitute(env, &map),
        _ => ty.clone(),
    }
}

/// Bindings learned from already-evaluated arguments: each formal parameter
/// type is translated against the argument's concrete type, most specific
/// binding kept.
fn compute_map_expansion(
    env: &dyn TypeEnv,
    subst: &MethodSubst,
    args: &[Expression],
) -> Substitution {
    let md = env.method(subst.method);
    let n = md.params.len();
    let mut expansion = Substitution::new();
    for (i, arg) in args.iter().enumerate() {
        if arg.contains_erased() || n == 0 {
            continue;
        }
        let mut raw = if i < n {
            md.params[i].ty.clone()
        } else {
            md.params[n - 1].ty.copy_with_fewer_arrays(1)
        };
        if raw.type_vars().is_empty() {
            continue;
        }
        let concrete = arg.ty(env);
        if md.is_varargs() && i + 1 == n && concrete.arrays < raw.arrays {
            raw = raw.copy_with_fewer_arrays(1);
        }
        match translate_map(env, &raw, &concrete, true) {
            Ok(m) => expansion = expansion.merge_most_specific(env, &m),
            Err(err) => trace!(%err, "ignoring expansion failure for one argument"),
        }
    }
    expansion
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use vela_core::PackageName;
    use vela_types::{ClassDef, ClassKind, MethodDef, Param, TypeStore};

    fn collect(
        store: &TypeStore,
        class: ClassId,
        nature: ScopeNature,
        name: &str,
        presented: usize,
    ) -> Vec<Candidate> {
        collect_method_candidates(
            store,
            &StaticImportMap::default(),
            &Type::simple(class),
            nature,
            &Name::new(name),
            presented,
        )
    }

    #[test]
    fn varargs_arity_accepts_one_or_more_but_not_zero() {
        let mut store = TypeStore::with_minimal_core();
        let pkg = PackageName::from_dotted("a");
        let c = store.add_class(ClassDef::new(pkg, "C", ClassKind::Class));
        let string = Type::simple(store.well_known().string);
        // m(int, String...)
        store.add_method(MethodDef::new(
            c,
            "m",
            vec![Param::new("first", Type::int()), Param::varargs("rest", string)],
            Type::void(),
        ));

        assert!(collect(&store, c, ScopeNature::Absent, "m", 0).is_empty());
        assert_eq!(collect(&store, c, ScopeNature::Absent, "m", 1).len(), 1);
        assert_eq!(collect(&store, c, ScopeNature::Absent, "m", 4).len(), 1);
    }

    #[test]
    fn inherited_methods_carry_distance() {
        let store = TypeStore::with_minimal_core();
        let array_list = store.lookup_class("java.util.ArrayList").unwrap();
        let candidates = collect(&store, array_list, ScopeNature::Instance, "add", 1);
        // Declared on List (distance 2) and inherited from Collection (4).
        let mut distances: Vec<u32> = candidates.iter().map(|c| c.distance).collect();
        distances.sort_unstable();
        assert_eq!(distances, vec![2, 4]);
    }

    #[test]
    fn static_scope_hides_instance_methods() {
        let store = TypeStore::with_minimal_core();
        let list = store.lookup_class("java.util.List").unwrap();
        let static_side = collect(&store, list, ScopeNature::Static, "of", 1);
        assert_eq!(static_side.len(), 1);
        assert!(collect(&store, list, ScopeNature::Static, "add", 1).is_empty());
        assert_eq!(collect(&store, list, ScopeNature::Instance, "add", 1).len(), 2);
    }

    #[test]
    fn specificity_prefers_the_exact_parameterization() {
        let mut store = TypeStore::with_minimal_core();
        let pkg = PackageName::from_dotted("a");
        let list = store.lookup_class("java.util.List").unwrap();
        let a = store.add_class(ClassDef {
            super_class: Some(Type::simple(store.well_known().object)),
            ..ClassDef::new(pkg.clone(), "A", ClassKind::Class)
        });
        let b = store.add_class(ClassDef {
            super_class: Some(Type::simple(a)),
            ..ClassDef::new(pkg.clone(), "B", ClassKind::Class)
        });
        let c = store.add_class(ClassDef::new(pkg, "C", ClassKind::Class));
        let list_a = Type::class(list, vec![Type::simple(a)]);
        let list_b = Type::class(list, vec![Type::simple(b)]);
        let m_a = store.add_method(MethodDef::new(
            c,
            "m",
            vec![Param::new("xs", list_a)],
            Type::void(),
        ));
        let m_b = store.add_method(MethodDef::new(
            c,
            "m",
            vec![Param::new("xs", list_b.clone())],
            Type::void(),
        ));

        let candidates = collect(&store, c, ScopeNature::Absent, "m", 1);
        assert_eq!(candidates.len(), 2);
        let arg = Expression::Variable { name: Name::new("xs"), ty: list_b };
        let scored = score_candidates(&store, candidates, &[arg]);
        let best = trim_best_score(scored);
        assert_eq!(best.len(), 1);
        assert_eq!(best[0].candidate.subst.method, m_b);
        assert_ne!(best[0].candidate.subst.method, m_a);
    }

    #[test]
    fn fixed_arity_beats_varargs() {
        let mut store = TypeStore::with_minimal_core();
        let pkg = PackageName::from_dotted("a");
        let c = store.add_class(ClassDef::new(pkg, "C", ClassKind::Class));
        let fixed = store.add_method(MethodDef::new(
            c,
            "m",
            vec![Param::new("x", Type::int())],
            Type::void(),
        ));
        store.add_method(MethodDef::new(
            c,
            "m",
            vec![Param::varargs("xs", Type::int())],
            Type::void(),
        ));

        let candidates = collect(&store, c, ScopeNature::Absent, "m", 1);
        assert_eq!(candidates.len(), 2);
        let scored = score_candidates(&store, candidates, &[Expression::IntLiteral(1)]);
        let best = trim_best_score(scored);
        assert_eq!(best.len(), 1);
        assert_eq!(best[0].candidate.subst.method, fixed);

        // The dedicated trim gives the same answer when scores tie.
        let candidates = collect(&store, c, ScopeNature::Absent, "m", 1);
        let scored = score_candidates(&store, candidates, &[Expression::IntLiteral(1)]);
        let trimmed = trim_varargs_vs_fixed(&store, scored);
        assert!(trimmed
            .iter()
            .all(|s| !store.method(s.candidate.subst.method).is_varargs()));
    }

    #[test]
    fn null_prefers_the_type_farthest_from_object() {
        let mut store = TypeStore::with_minimal_core();
        let pkg = PackageName::from_dotted("a");
        let c = store.add_class(ClassDef::new(pkg, "C", ClassKind::Class));
        let object = Type::simple(store.well_known().object);
        let string = Type::simple(store.well_known().string);
        store.add_method(MethodDef::new(c, "m", vec![Param::new("x", object)], Type::void()));
        let m_string =
            store.add_method(MethodDef::new(c, "m", vec![Param::new("x", string)], Type::void()));

        let candidates = collect(&store, c, ScopeNature::Absent, "m", 1);
        let scored = score_candidates(&store, candidates, &[Expression::NullLiteral]);
        let best = trim_best_score(scored);
        assert_eq!(best.len(), 1);
        assert_eq!(best[0].candidate.subst.method, m_string);
    }

    #[test]
    fn null_never_matches_a_primitive_parameter() {
        let mut store = TypeStore::with_minimal_core();
        let pkg = PackageName::from_dotted("a");
        let c = store.add_class(ClassDef::new(pkg, "C", ClassKind::Class));
        store.add_method(MethodDef::new(c, "m", vec![Param::new("x", Type::int())], Type::void()));
        let candidates = collect(&store, c, ScopeNature::Absent, "m", 1);
        let scored = score_candidates(&store, candidates, &[Expression::NullLiteral]);
        assert!(scored.is_empty());
    }

    #[test]
    fn most_specific_return_breaks_ties() {
        let mut store = TypeStore::with_minimal_core();
        let pkg = PackageName::from_dotted("a");
        let sup = store.add_class(ClassDef::new(pkg.clone(), "Sup", ClassKind::Class));
        let sub = store.add_class(ClassDef {
            super_class: Some(Type::simple(sup)),
            ..ClassDef::new(pkg.clone(), "Sub", ClassKind::Class)
        });
        let c = store.add_class(ClassDef::new(pkg, "C", ClassKind::Class));
        let wide =
            store.add_method(MethodDef::new(c, "make", vec![], Type::simple(sup)));
        let narrow =
            store.add_method(MethodDef::new(c, "make", vec![], Type::simple(sub)));
        let candidates = collect(&store, c, ScopeNature::Absent, "make", 0);
        let scored = score_candidates(&store, candidates, &[]);
        let trimmed = trim_most_specific_return(&store, scored);
        assert_eq!(trimmed.len(), 1);
        assert_eq!(trimmed[0].candidate.subst.method, narrow);
        assert_ne!(trimmed[0].candidate.subst.method, wide);
    }

    #[test]
    fn constructor_candidates_respect_arity() {
        let store = TypeStore::with_minimal_core();
        let array_list = store.lookup_class("java.util.ArrayList").unwrap();
        let ty = Type::simple(array_list);
        assert_eq!(collect_constructor_candidates(&store, &ty, 0).len(), 1);
        assert_eq!(collect_constructor_candidates(&store, &ty, 1).len(), 1);
        assert_eq!(collect_constructor_candidates(&store, &ty, 2).len(), 0);
    }
}
