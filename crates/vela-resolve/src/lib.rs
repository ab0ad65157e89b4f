//! Name, type and overload resolution over the `vela-types` program model.
//!
//! The crate is organized around two contexts and an engine:
//!
//! * [`scopes::TypeScopes`] answers "what does this type name mean here",
//!   layering local declarations, imports, hierarchy members and enclosing
//!   types by priority.
//! * [`variables::VariableScopes`] answers the same for value names, with
//!   plain innermost-first shadowing.
//! * [`Resolution`] ties them together: the structural pass builds contexts
//!   and queues field initializers and method bodies as todos; draining the
//!   queue resolves each one through a [`ParseHelper`], and [`commit`]
//!   writes the results back into the store and freezes the declarations.
//!
//! Overload resolution (in [`overload`]) evaluates arguments in erasure
//! mode first, scores the candidate set, and re-evaluates the erased
//! arguments precisely once a winner is known, with expectations flowing
//! down as [`ForwardType`]s.

pub mod context;
pub mod counters;
pub mod error;
pub mod forward;
pub mod generics;
pub mod imports;
pub mod overload;
pub mod resolver;
pub mod scopes;
pub mod summary;
pub mod variables;

pub use context::Context;
pub use counters::AnonymousCounters;
pub use error::ResolveError;
pub use forward::{determine_forward_argument_type, ForwardType};
pub use generics::{combine_maps, find_single_abstract_method, translate_map};
pub use imports::StaticImportMap;
pub use overload::ScopeNature;
pub use resolver::{commit, Outcome, ParseHelper, Resolution, Todo, TodoTarget};
pub use scopes::{priority, NamedEntity, TypeScopeId, TypeScopes, UnitId};
pub use summary::{Diagnostic, ErrorPolicy, Summary};
pub use variables::{VarScopeId, Variable, VariableKind, VariableScopes};
