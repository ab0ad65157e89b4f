//! Deferred resolution: the structural pass queues field initializers and
//! method bodies as todos; draining the queue parses them through the
//! [`ParseHelper`] seam; committing writes the results into the store and
//! freezes every scanned declaration.

use tracing::{debug, info};
use vela_core::{Name, PackageName};
use vela_types::{ClassId, Expression, FieldId, MethodId, TypeEnv, TypeStore};

use crate::context::Context;
use crate::counters::AnonymousCounters;
use crate::error::ResolveError;
use crate::forward::ForwardType;
use crate::scopes::{priority, NamedEntity, TypeScopes};
use crate::summary::{ErrorPolicy, Summary};
use crate::variables::VariableScopes;

/// The boundary to the syntax side. Payloads stay opaque (`Node`); the
/// helper turns them into expressions, calling back into the resolution for
/// name lookups and method calls along the way.
pub trait ParseHelper {
    type Node;

    fn parse_expression(
        &self,
        res: &mut Resolution<'_, Self::Node>,
        ctx: &Context,
        forward: &ForwardType,
        node: &Self::Node,
    ) -> Result<Expression, ResolveError>;

    /// Method bodies default to plain expression parsing; `eci` carries an
    /// explicit constructor invocation when the method is a constructor.
    fn resolve_method_body(
        &self,
        res: &mut Resolution<'_, Self::Node>,
        ctx: &Context,
        forward: &ForwardType,
        eci: Option<&Self::Node>,
        node: &Self::Node,
    ) -> Result<Expression, ResolveError> {
        let _ = eci;
        self.parse_expression(res, ctx, forward, node)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TodoTarget {
    Field(FieldId),
    Method(MethodId),
}

pub struct Todo<N> {
    pub target: TodoTarget,
    pub forward: ForwardType,
    /// Explicit constructor invocation payload, if any.
    pub eci: Option<N>,
    pub payload: N,
    pub context: Context,
}

/// Working state of one resolution run: the scope arenas, the todo queue and
/// the summary. Reads the program model through `&dyn TypeEnv`; all writes
/// happen at commit time, after this has been consumed.
pub struct Resolution<'e, N> {
    pub(crate) env: &'e dyn TypeEnv,
    pub(crate) type_scopes: TypeScopes,
    pub(crate) var_scopes: VariableScopes,
    pub(crate) counters: AnonymousCounters,
    summary: Summary,
    todos: Vec<Todo<N>>,
    types: Vec<ClassId>,
}

/// What a drained run produces: expressions to write back, types to commit,
/// and the summary.
#[derive(Debug)]
pub struct Outcome {
    pub assignments: Vec<(TodoTarget, Expression)>,
    pub types: Vec<ClassId>,
    pub summary: Summary,
}

impl<'e, N> Resolution<'e, N> {
    pub fn new(env: &'e dyn TypeEnv, policy: ErrorPolicy) -> Resolution<'e, N> {
        Resolution {
            env,
            type_scopes: TypeScopes::new(),
            var_scopes: VariableScopes::new(),
            counters: AnonymousCounters::new(),
            summary: Summary::new(policy),
            todos: Vec::new(),
            types: Vec::new(),
        }
    }

    pub fn env(&self) -> &'e dyn TypeEnv {
        self.env
    }

    pub fn summary(&self) -> &Summary {
        &self.summary
    }

    /// Registers a scanned type for commit at the end of the run.
    pub fn add_type(&mut self, id: ClassId) {
        if !self.types.contains(&id) {
            self.types.push(id);
        }
    }

    pub fn add_todo(&mut self, todo: Todo<N>) {
        self.todos.push(todo);
    }

    /// `import a.B`: the simple name becomes visible across the unit.
    pub fn add_import(&mut self, ctx: &Context, class: ClassId) {
        let name = self.env.class(class).simple_name();
        self.type_scopes.add(ctx.type_scope, name, NamedEntity::Class(class), priority::IMPORT);
    }

    /// `import a.*`.
    pub fn add_on_demand_import(&mut self, ctx: &Context, package: PackageName) {
        self.type_scopes.add_on_demand_package(ctx.type_scope, package);
    }

    /// `import static a.B.member`.
    pub fn add_static_import(&mut self, ctx: &Context, member: Name, class: ClassId) {
        self.type_scopes.static_imports_mut(ctx.type_scope).add_specific(member, class);
    }

    /// `import static a.B.*`.
    pub fn add_static_on_demand_import(&mut self, ctx: &Context, class: ClassId) {
        self.type_scopes.static_imports_mut(ctx.type_scope).add_on_demand(class);
    }

    pub fn pending(&self) -> usize {
        self.todos.len()
    }

    /// Drains the todo queue. Each item is parsed independently; a failure
    /// is recorded against the item's primary type and, under the collect
    /// policy, does not stop the others. Under fail-fast the first
    /// diagnostic aborts the whole run.
    pub fn resolve<P: ParseHelper<Node = N>>(mut self, helper: &P) -> Result<Outcome, ResolveError> {
        let todos = std::mem::take(&mut self.todos);
        info!(count = todos.len(), "resolving deferred initializers and bodies");
        let mut assignments = Vec::new();
        for todo in todos {
            let location = self.location_of(todo.target);
            let primary = todo.context.enclosing_type.map(|t| primary_type(self.env, t));
            let result = match todo.target {
                TodoTarget::Field(_) => {
                    helper.parse_expression(&mut self, &todo.context, &todo.forward, &todo.payload)
                }
                TodoTarget::Method(_) => helper.resolve_method_body(
                    &mut self,
                    &todo.context,
                    &todo.forward,
                    todo.eci.as_ref(),
                    &todo.payload,
                ),
            };
            match result {
                Ok(expr) => {
                    debug!(%location, "resolved");
                    assignments.push((todo.target, expr));
                    if let Some(p) = primary {
                        self.summary.add_type(p, true);
                    }
                }
                Err(err) => {
                    if let Some(p) = primary {
                        self.summary.add_type(p, false);
                    }
                    self.summary.record(&location, &err)?;
                }
            }
        }
        Ok(Outcome { assignments, types: self.types, summary: self.summary })
    }

    fn location_of(&self, target: TodoTarget) -> String {
        match target {
            TodoTarget::Field(f) => {
                let fd = self.env.field(f);
                format!("{}.{}", self.env.class(fd.owner).name, fd.name)
            }
            TodoTarget::Method(m) => {
                let md = self.env.method(m);
                format!("{}.{}", self.env.class(md.owner).name, md.name)
            }
        }
    }
}

fn primary_type(env: &dyn TypeEnv, mut id: ClassId) -> ClassId {
    while let Some(e) = env.class(id).enclosing {
        id = e;
    }
    id
}

/// Writes the resolved expressions into the store and commits every scanned
/// type, transitioning all their declarations from builder to committed.
pub fn commit(store: &mut TypeStore, outcome: Outcome) -> Summary {
    for (target, expr) in outcome.assignments {
        match target {
            TodoTarget::Field(f) => store.set_field_initializer(f, expr),
            TodoTarget::Method(m) => store.set_method_body(m, expr),
        }
    }
    for t in &outcome.types {
        store.commit_class(*t);
    }
    outcome.summary
}
