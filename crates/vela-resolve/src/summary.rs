//! Per-run outcome accounting: which types made it through, which failed,
//! and the diagnostics collected along the way.

use std::collections::BTreeSet;

use serde::Serialize;
use tracing::warn;
use vela_types::ClassId;

use crate::error::ResolveError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorPolicy {
    /// Abort the run on the first diagnostic.
    FailFast,
    /// Collect diagnostics and keep resolving the rest.
    Collect,
}

#[derive(Debug, Clone, Serialize)]
pub struct Diagnostic {
    pub location: String,
    pub message: String,
}

#[derive(Debug)]
pub struct Summary {
    policy: ErrorPolicy,
    diagnostics: Vec<Diagnostic>,
    types_ok: BTreeSet<ClassId>,
    types_failed: BTreeSet<ClassId>,
}

impl Summary {
    pub fn new(policy: ErrorPolicy) -> Summary {
        Summary {
            policy,
            diagnostics: Vec::new(),
            types_ok: BTreeSet::new(),
            types_failed: BTreeSet::new(),
        }
    }

    pub fn policy(&self) -> ErrorPolicy {
        self.policy
    }

    /// Records a diagnostic. Under fail-fast this returns the error that
    /// aborts the run; under collect it always returns `Ok`.
    pub fn record(&mut self, location: &str, error: &ResolveError) -> Result<(), ResolveError> {
        warn!(location, %error, "resolution diagnostic");
        self.diagnostics
            .push(Diagnostic { location: location.to_string(), message: error.to_string() });
        match self.policy {
            ErrorPolicy::FailFast => Err(ResolveError::FailFast {
                location: location.to_string(),
                message: error.to_string(),
            }),
            ErrorPolicy::Collect => Ok(()),
        }
    }

    /// Marks the primary type an item belongs to as resolved or failed. A
    /// type that failed anywhere stays failed.
    pub fn add_type(&mut self, primary: ClassId, ok: bool) {
        if ok {
            if !self.types_failed.contains(&primary) {
                self.types_ok.insert(primary);
            }
        } else {
            self.types_ok.remove(&primary);
            self.types_failed.insert(primary);
        }
    }

    pub fn have_errors(&self) -> bool {
        !self.diagnostics.is_empty()
    }

    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    pub fn resolved_types(&self) -> &BTreeSet<ClassId> {
        &self.types_ok
    }

    pub fn failed_types(&self) -> &BTreeSet<ClassId> {
        &self.types_failed
    }
}
