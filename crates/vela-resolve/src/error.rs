use thiserror::Error;

#[derive(Debug, Clone, Error)]
pub enum ResolveError {
    #[error("unresolved type or name: {name}")]
    UnresolvedName { name: String },

    #[error("unresolved variable: {name}")]
    UnresolvedVariable { name: String },

    #[error("no applicable overload of {name} for {arity} argument(s)")]
    NoApplicableOverload { name: String, arity: usize },

    #[error("ambiguous call to {name}, candidates: {}", candidates.join(", "))]
    AmbiguousOverload { name: String, candidates: Vec<String> },

    #[error("malformed generics usage: {message}")]
    MalformedGenerics { message: String },

    /// Surfaced by a `ParseHelper` when the underlying syntax is broken.
    #[error("syntax error: {message}")]
    Syntax { message: String },

    /// Thrown by the summary under the fail-fast policy; aborts the run.
    #[error("resolution aborted at {location}: {message}")]
    FailFast { location: String, message: String },
}
