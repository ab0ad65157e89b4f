//! Static imports, per compilation unit.

use std::collections::HashMap;

use vela_core::Name;
use vela_types::ClassId;

/// `import static a.B.member` and `import static a.B.*`. Specific imports
/// win over on-demand ones.
#[derive(Debug, Clone, Default)]
pub struct StaticImportMap {
    specific: HashMap<Name, ClassId>,
    on_demand: Vec<ClassId>,
}

impl StaticImportMap {
    pub fn add_specific(&mut self, member: Name, class: ClassId) {
        self.specific.insert(member, class);
    }

    pub fn add_on_demand(&mut self, class: ClassId) {
        if !self.on_demand.contains(&class) {
            self.on_demand.push(class);
        }
    }

    /// The class a specifically imported member comes from.
    pub fn class_for(&self, member: &Name) -> Option<ClassId> {
        self.specific.get(member).copied()
    }

    pub fn on_demand(&self) -> &[ClassId] {
        &self.on_demand
    }

    pub fn is_empty(&self) -> bool {
        self.specific.is_empty() && self.on_demand.is_empty()
    }
}
