//! Per-run counters for naming anonymous types.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use vela_types::ClassId;

/// Monotonically increasing indices per primary type. Cheap to clone (shared
/// handle); `fork` produces an independent map, one per compilation unit, so
/// indices never leak across units.
#[derive(Debug, Clone, Default)]
pub struct AnonymousCounters {
    inner: Arc<Mutex<HashMap<ClassId, u32>>>,
}

impl AnonymousCounters {
    pub fn new() -> AnonymousCounters {
        AnonymousCounters::default()
    }

    pub fn fork(&self) -> AnonymousCounters {
        AnonymousCounters::new()
    }

    /// The next index for an anonymous type inside `primary`, starting at 1.
    pub fn next_index(&self, primary: ClassId) -> u32 {
        let mut map = self.inner.lock().expect("anonymous counter lock poisoned");
        let entry = map.entry(primary).or_insert(0);
        *entry += 1;
        *entry
    }
}
