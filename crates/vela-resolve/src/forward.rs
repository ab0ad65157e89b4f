//! Forward type information: what the surrounding context expects of an
//! expression, flowing top-down while resolution flows bottom-up.

use vela_types::{
    single_abstract_method_of, Base, MethodSubst, Substitution, Type, TypeEnv,
};

#[derive(Debug, Clone, Default)]
pub struct ForwardType {
    /// The expected type, if the context pins one down.
    pub ty: Option<Type>,
    /// Evaluate in erasure mode: produce candidate type sets instead of a
    /// resolved expression.
    pub erasure: bool,
    /// Precise evaluation wanted, but a fallback to erasure is acceptable
    /// when the expected type does not determine the expression.
    pub erasure_on_failure: bool,
    /// Extra bindings accumulated by an enclosing call.
    pub extra: Substitution,
}

impl ForwardType {
    /// The context expects exactly `ty`.
    pub fn expect(ty: Type) -> ForwardType {
        ForwardType { ty: Some(ty), ..ForwardType::default() }
    }

    pub fn expect_with_extra(ty: Type, extra: Substitution) -> ForwardType {
        ForwardType { ty: Some(ty), extra, ..ForwardType::default() }
    }

    /// No expectation at all.
    pub fn none() -> ForwardType {
        ForwardType::default()
    }

    /// Candidate-set evaluation for overload scoring.
    pub fn erasure() -> ForwardType {
        ForwardType { erasure: true, ..ForwardType::default() }
    }

    /// No expectation, but the expression may answer with an erased form if
    /// it cannot commit yet (scopes of calls are evaluated this way).
    pub fn none_erasure_on_failure() -> ForwardType {
        ForwardType { erasure_on_failure: true, ..ForwardType::default() }
    }

    pub fn is_void(&self) -> bool {
        self.ty.as_ref().is_some_and(|t| t.is_void())
    }

    /// The functional signature the expected type imposes, for lambdas and
    /// method references.
    pub fn compute_sam(&self, env: &dyn TypeEnv) -> Option<MethodSubst> {
        self.ty.as_ref().and_then(|t| single_abstract_method_of(env, t))
    }
}

/// The forward type for argument `i` of a chosen method.
///
/// Start from the winner's bindings; if the method's own return type
/// parameter is still free and the outside context expects a type, bind it
/// (with array dimensions peeled). The argument's formal parameter type is
/// then viewed through the merged map.
pub fn determine_forward_argument_type(
    env: &dyn TypeEnv,
    winner: &MethodSubst,
    i: usize,
    outside: Option<&Type>,
    extra: &Substitution,
) -> ForwardType {
    let def = env.method(winner.method);
    let mut map = winner.concrete.clone();
    if let Some(out) = outside {
        if let Base::Var(v) = def.return_type.base {
            if def.type_params.contains(&v) && !map.contains(v) {
                map.insert(v, out.copy_with_fewer_arrays(def.return_type.arrays));
            }
        }
    }
    let map = map.merge(extra);
    let n = def.params.len();
    let raw = if i < n {
        def.params[i].ty.clone()
    } else {
        // Sliding past the end means the argument goes into the varargs
        // array one element at a time.
        def.params[n - 1].ty.copy_with_fewer_arrays(1)
    };
    let ty = raw.substitute(env, &map);
    ForwardType { ty: Some(ty), erasure: false, erasure_on_failure: true, extra: map }
}
