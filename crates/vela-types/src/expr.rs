//! The resolved-expression model.
//!
//! This is deliberately small: enough structure for field initializers and
//! method bodies to land somewhere typed, plus the erased form that overload
//! resolution leans on. An erased expression stands for a subexpression whose
//! own resolution was postponed; it carries the set of types it could still
//! take.

use std::collections::BTreeSet;

use vela_core::Name;

use crate::{Base, FieldId, MethodId, Type, TypeEnv};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Expression {
    IntLiteral(i64),
    StringLiteral(String),
    BoolLiteral(bool),
    NullLiteral,
    Variable {
        name: Name,
        ty: Type,
    },
    /// A type used as a scope, e.g. the `List` in `List.of(..)`.
    TypeRef(Type),
    FieldAccess {
        field: FieldId,
        scope: Box<Expression>,
        ty: Type,
    },
    MethodCall {
        method: MethodId,
        scope: Box<Expression>,
        args: Vec<Expression>,
        return_type: Type,
    },
    ConstructorCall {
        constructor: MethodId,
        args: Vec<Expression>,
        ty: Type,
    },
    Lambda {
        /// The functional interface type the lambda was resolved against,
        /// with concrete arguments.
        functional: Type,
        body: Box<Expression>,
    },
    /// Candidate types of a not-yet-resolved subexpression.
    Erased {
        candidates: BTreeSet<Type>,
    },
}

impl Expression {
    pub fn ty(&self, env: &dyn TypeEnv) -> Type {
        match self {
            Expression::IntLiteral(_) => Type::int(),
            Expression::StringLiteral(_) => Type::simple(env.well_known().string),
            Expression::BoolLiteral(_) => Type::boolean(),
            Expression::NullLiteral => Type::null(),
            Expression::Variable { ty, .. } => ty.clone(),
            Expression::TypeRef(ty) => ty.clone(),
            Expression::FieldAccess { ty, .. } => ty.clone(),
            Expression::MethodCall { return_type, .. } => return_type.clone(),
            Expression::ConstructorCall { ty, .. } => ty.clone(),
            Expression::Lambda { functional, .. } => functional.clone(),
            Expression::Erased { candidates } => candidates
                .first()
                .cloned()
                .unwrap_or_else(|| Type::simple(env.well_known().object)),
        }
    }

    /// The candidate type set: the erased candidates, or the single type of
    /// an already-resolved expression.
    pub fn erasure_types(&self, env: &dyn TypeEnv) -> BTreeSet<Type> {
        match self {
            Expression::Erased { candidates } => candidates.clone(),
            other => BTreeSet::from([other.ty(env)]),
        }
    }

    pub fn is_erased(&self) -> bool {
        matches!(self, Expression::Erased { .. })
    }

    pub fn is_null_literal(&self) -> bool {
        matches!(self, Expression::NullLiteral)
    }

    /// True when any subexpression is still erased.
    pub fn contains_erased(&self) -> bool {
        match self {
            Expression::Erased { .. } => true,
            Expression::FieldAccess { scope, .. } => scope.contains_erased(),
            Expression::MethodCall { scope, args, .. } => {
                scope.contains_erased() || args.iter().any(|a| a.contains_erased())
            }
            Expression::ConstructorCall { args, .. } => args.iter().any(|a| a.contains_erased()),
            Expression::Lambda { body, .. } => body.contains_erased(),
            _ => false,
        }
    }

    /// True for type references with no array/argument decoration, i.e. a
    /// static scope.
    pub fn is_type_reference(&self) -> bool {
        matches!(self, Expression::TypeRef(t) if matches!(t.base, Base::Class(_)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::TypeStore;
    use pretty_assertions::assert_eq;

    #[test]
    fn erasure_types_of_plain_expressions() {
        let store = TypeStore::with_minimal_core();
        let e = Expression::IntLiteral(3);
        assert_eq!(e.erasure_types(&store), BTreeSet::from([Type::int()]));
        assert!(!e.contains_erased());
    }

    #[test]
    fn erased_sets_propagate_through_calls() {
        let store = TypeStore::with_minimal_core();
        let string = Type::simple(store.well_known().string);
        let erased = Expression::Erased { candidates: BTreeSet::from([string.clone(), Type::int()]) };
        assert_eq!(erased.erasure_types(&store).len(), 2);
        let call = Expression::MethodCall {
            method: crate::MethodId(0),
            scope: Box::new(Expression::TypeRef(string)),
            args: vec![erased],
            return_type: Type::void(),
        };
        assert!(call.contains_erased());
    }
}
