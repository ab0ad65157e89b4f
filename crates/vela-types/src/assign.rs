//! Assignability with covariant erasure, scored.
//!
//! `is_assignable(env, target, from)` answers "can a value of type `from` go
//! where `target` is expected", returning a distance (0 for an exact match)
//! or `None` when not assignable. Type arguments never cause rejection when
//! the classes line up (erasure); they only add to the score, so an exact
//! parameterization beats a merely compatible one.

use std::collections::{HashSet, VecDeque};

use crate::{Base, ClassId, Primitive, Type, TypeEnv};

/// Added per array dimension that gets absorbed by an `Object` target.
pub const ARRAY_DIFFERENCE_PENALTY: u32 = 100;

pub fn is_assignable(env: &dyn TypeEnv, target: &Type, from: &Type) -> Option<u32> {
    if target == from {
        return Some(0);
    }
    if from.is_null() {
        return if target.is_primitive() || target.is_void() { None } else { Some(1) };
    }
    if target.is_void() || from.is_void() {
        return None;
    }
    // Unbounded wildcards behave like `Object` on either side.
    if target.is_unbound_wildcard() {
        return is_assignable(env, &object(env).with_arrays(target.arrays), from);
    }
    if from.is_unbound_wildcard() {
        return is_assignable(env, target, &object(env).with_arrays(from.arrays));
    }

    if target.arrays != from.arrays {
        // `Object` (or `Object[]`...) absorbs deeper arrays, at a price.
        if target.arrays < from.arrays && target.base == Base::Class(env.well_known().object) {
            let diff = (from.arrays - target.arrays) as u32;
            return Some(ARRAY_DIFFERENCE_PENALTY * diff);
        }
        return None;
    }
    if target.arrays > 0 {
        let te = target.copy_without_arrays();
        let fe = from.copy_without_arrays();
        if te == fe {
            return Some(0);
        }
        // Array covariance is for reference element types only.
        if te.is_primitive() || fe.is_primitive() {
            return None;
        }
        return is_assignable(env, &te, &fe);
    }

    match (target.base, from.base) {
        (Base::Primitive(t), Base::Primitive(f)) => widening_steps(f, t),
        (Base::Primitive(t), Base::Class(f)) => {
            let unboxed = env.well_known().unboxed(f)?;
            if unboxed == t {
                Some(1)
            } else {
                widening_steps(unboxed, t).map(|s| s + 1)
            }
        }
        (Base::Class(_), Base::Primitive(f)) => {
            let boxed = env.well_known().boxed(f);
            is_assignable(env, target, &Type::simple(boxed)).map(|s| s + 1)
        }
        (_, Base::Var(v)) => {
            let tp = env.type_param(v);
            let from_bound = match tp.bounds.first() {
                Some(b) => b.clone(),
                None => object(env),
            };
            is_assignable(env, target, &from_bound)
        }
        (Base::Var(v), _) => {
            let tp = env.type_param(v);
            if tp.bounds.is_empty() {
                return Some(1);
            }
            let mut worst = 0;
            for bound in &tp.bounds {
                let score = is_assignable(env, bound, from)?;
                worst = worst.max(score);
            }
            Some(1 + worst)
        }
        (Base::Class(tc), Base::Class(fc)) => {
            if tc == fc {
                Some(argument_penalty(env, &target.args, &from.args))
            } else {
                class_distance(env, fc, tc)
            }
        }
        _ => None,
    }
}

/// Distance from a type up to `Object`, used to break null-literal ties.
pub fn distance_to_object(env: &dyn TypeEnv, ty: &Type) -> Option<u32> {
    is_assignable(env, &object(env), ty)
}

fn object(env: &dyn TypeEnv) -> Type {
    Type::simple(env.well_known().object)
}

/// Same class, differing arguments: penalize per argument position without
/// ever rejecting (erasure).
fn argument_penalty(env: &dyn TypeEnv, target_args: &[Type], from_args: &[Type]) -> u32 {
    // Raw usage on either side: no information, no penalty.
    if target_args.is_empty() || from_args.is_empty() {
        return 0;
    }
    let mut penalty = 0;
    for (t, f) in target_args.iter().zip(from_args) {
        if t == f || t.is_unbound_wildcard() {
            continue;
        }
        penalty += match is_assignable(env, t, f) {
            Some(score) => score.max(1),
            None => 2,
        };
    }
    penalty
}

/// Breadth-first distance through the supertype graph, ids only.
fn class_distance(env: &dyn TypeEnv, from: ClassId, target: ClassId) -> Option<u32> {
    let object = env.well_known().object;
    let mut queue = VecDeque::new();
    let mut seen = HashSet::new();
    queue.push_back((from, 0u32));
    seen.insert(from);
    while let Some((id, dist)) = queue.pop_front() {
        if id == target {
            return Some(dist);
        }
        let def = env.class(id);
        let mut neighbors: Vec<ClassId> = Vec::new();
        if let Some(sup) = &def.super_class {
            neighbors.extend(sup.base_class());
        }
        for itf in &def.interfaces {
            neighbors.extend(itf.base_class());
        }
        if neighbors.is_empty() && id != object {
            neighbors.push(object);
        }
        for n in neighbors {
            if seen.insert(n) {
                queue.push_back((n, dist + 1));
            }
        }
    }
    None
}

fn widening_steps(from: Primitive, to: Primitive) -> Option<u32> {
    if from == to {
        return Some(0);
    }
    // Nothing widens to boolean or char.
    if matches!(to, Primitive::Boolean | Primitive::Char) {
        return None;
    }
    let from_rank = rank(from)?;
    let to_rank = rank(to)?;
    if to_rank > from_rank {
        Some(to_rank - from_rank)
    } else {
        None
    }
}

fn rank(p: Primitive) -> Option<u32> {
    match p {
        Primitive::Boolean => None,
        Primitive::Byte => Some(1),
        Primitive::Short | Primitive::Char => Some(2),
        Primitive::Int => Some(3),
        Primitive::Long => Some(4),
        Primitive::Float => Some(5),
        Primitive::Double => Some(6),
    }
}
