//! The resolution context: an immutable snapshot of where resolution
//! currently stands. Factory methods produce a copy with one aspect
//! replaced; existing contexts are never mutated, so a queued todo keeps the
//! exact view it was created under.

use vela_core::PackageName;
use vela_types::{ClassId, FieldId, MethodId, Type};

use crate::counters::AnonymousCounters;
use crate::resolver::Resolution;
use crate::scopes::{priority, NamedEntity, TypeScopeId};
use crate::variables::{VarScopeId, Variable, VariableKind};

#[derive(Debug, Clone)]
pub struct Context {
    pub enclosing_type: Option<ClassId>,
    pub enclosing_method: Option<MethodId>,
    pub enclosing_field: Option<FieldId>,
    pub type_scope: TypeScopeId,
    pub var_scope: VarScopeId,
    pub counters: AnonymousCounters,
}

impl Context {
    pub fn with_enclosing_field(&self, field: FieldId) -> Context {
        Context { enclosing_field: Some(field), ..self.clone() }
    }

    /// The enclosing type viewed with its own parameters as arguments, the
    /// way `this` sees it.
    pub fn enclosing_type_as_type(&self, env: &dyn vela_types::TypeEnv) -> Option<Type> {
        self.enclosing_type.map(|c| {
            let def = env.class(c);
            let args = def.type_params.iter().map(|tp| Type::var(*tp)).collect();
            Type::class(c, args)
        })
    }
}

impl<'e, N> Resolution<'e, N> {
    /// A fresh unit: its own package, import tables, variable-scope root and
    /// forked anonymous counters.
    pub fn new_compilation_unit(&mut self, package: PackageName) -> Context {
        let type_scope = self.type_scopes.new_unit(package);
        let var_scope = self.var_scopes.new_root();
        Context {
            enclosing_type: None,
            enclosing_method: None,
            enclosing_field: None,
            type_scope,
            var_scope,
            counters: self.counters.fork(),
        }
    }

    pub fn new_type_context(&mut self, ctx: &Context) -> Context {
        let type_scope = self.type_scopes.new_child(ctx.type_scope);
        Context { type_scope, ..ctx.clone() }
    }

    /// Entering a type body: the type's parameters and nested types become
    /// visible, and its fields enter the variable context.
    pub fn new_type_body(&mut self, ctx: &Context, class: ClassId) -> Context {
        let env = self.env;
        let type_scope = self.type_scopes.new_child(ctx.type_scope);
        let def = env.class(class);
        for &tp in &def.type_params {
            let name = env.type_param(tp).name.clone();
            self.type_scopes.add(type_scope, name, NamedEntity::TypeParam(tp), priority::LOCAL);
        }
        for &nested in &def.nested {
            let name = env.class(nested).simple_name();
            self.type_scopes.add(type_scope, name, NamedEntity::Class(nested), priority::LOCAL);
        }
        let var_scope = self.var_scopes.new_child(ctx.var_scope);
        for &f in &def.fields {
            let fd = env.field(f);
            self.var_scopes.add(
                var_scope,
                Variable { name: fd.name.clone(), ty: fd.ty.clone(), kind: VariableKind::Field(f) },
            );
        }
        Context {
            enclosing_type: Some(class),
            enclosing_method: None,
            enclosing_field: None,
            type_scope,
            var_scope,
            counters: ctx.counters.clone(),
        }
    }

    /// A dependent variable scope: blocks, loops, branches.
    pub fn new_variable_context(&mut self, ctx: &Context) -> Context {
        let var_scope = self.var_scopes.new_child(ctx.var_scope);
        Context { var_scope, ..ctx.clone() }
    }

    /// A variable scope with no parent: nothing from outside is visible.
    pub fn new_empty_variable_context(&mut self, ctx: &Context) -> Context {
        let var_scope = self.var_scopes.new_root();
        Context { var_scope, ..ctx.clone() }
    }

    /// The scope of a method body: parameters seeded, instance state visible
    /// only from instance methods, the method's own type parameters in
    /// scope.
    pub fn new_variable_context_for_method_block(
        &mut self,
        ctx: &Context,
        method: MethodId,
    ) -> Context {
        let env = self.env;
        let md = env.method(method);
        let var_scope = if md.is_static {
            let scope = self.var_scopes.new_root();
            if let Some(t) = ctx.enclosing_type {
                for &f in &env.class(t).fields {
                    let fd = env.field(f);
                    if fd.is_static {
                        self.var_scopes.add(
                            scope,
                            Variable {
                                name: fd.name.clone(),
                                ty: fd.ty.clone(),
                                kind: VariableKind::Field(f),
                            },
                        );
                    }
                }
            }
            scope
        } else {
            self.var_scopes.new_child(ctx.var_scope)
        };
        for p in &md.params {
            self.var_scopes.add(
                var_scope,
                Variable { name: p.name.clone(), ty: p.ty.clone(), kind: VariableKind::Parameter },
            );
        }
        let type_scope = if md.type_params.is_empty() {
            ctx.type_scope
        } else {
            let scope = self.type_scopes.new_child(ctx.type_scope);
            for &tp in &md.type_params {
                let name = env.type_param(tp).name.clone();
                self.type_scopes.add(scope, name, NamedEntity::TypeParam(tp), priority::LOCAL);
            }
            scope
        };
        Context {
            enclosing_method: Some(method),
            enclosing_field: None,
            type_scope,
            var_scope,
            ..ctx.clone()
        }
    }

    /// Lambdas see the enclosing variables; their parameters land in a
    /// dependent scope.
    pub fn new_lambda_context(&mut self, ctx: &Context) -> Context {
        self.new_variable_context(ctx)
    }

    /// An anonymous class body: the nested types of the base type's whole
    /// hierarchy become visible by simple name.
    pub fn new_anonymous_class_body(&mut self, ctx: &Context, base: ClassId) -> Context {
        let type_scope = self.type_scopes.new_child(ctx.type_scope);
        self.type_scopes.add_subtypes_of_hierarchy(self.env, type_scope, base);
        Context { type_scope, ..ctx.clone() }
    }
}
