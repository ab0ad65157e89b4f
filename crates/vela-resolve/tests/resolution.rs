//! End-to-end resolution over a hand-built syntax tree: a tiny parse helper
//! feeds expressions through the deferred queue, and the results are
//! committed back into the store.

use pretty_assertions::assert_eq;
use vela_core::{Name, PackageName};
use vela_resolve::{
    commit, Context, ErrorPolicy, ForwardType, ParseHelper, Resolution, ResolveError, Todo,
    TodoTarget,
};
use vela_types::{
    ClassDef, ClassId, ClassKind, Expression, FieldDef, MethodDef, MethodId, Param, Type, TypeEnv,
    TypeStore,
};

/// Just enough surface syntax to exercise the resolver.
#[derive(Debug, Clone)]
enum Node {
    Name(&'static str),
    Int(i64),
    Str(&'static str),
    Call { scope: Option<Box<Node>>, name: &'static str, args: Vec<Node> },
    New { type_name: &'static str, args: Vec<Node> },
}

struct Parser;

impl ParseHelper for Parser {
    type Node = Node;

    fn parse_expression(
        &self,
        res: &mut Resolution<'_, Node>,
        ctx: &Context,
        forward: &ForwardType,
        node: &Node,
    ) -> Result<Expression, ResolveError> {
        match node {
            Node::Name(n) => res.resolve_name(ctx, &Name::new(n)),
            Node::Int(v) => Ok(Expression::IntLiteral(*v)),
            Node::Str(s) => Ok(Expression::StringLiteral((*s).to_string())),
            Node::Call { scope, name, args } => res.resolve_method_call(
                self,
                ctx,
                forward,
                &Name::new(name),
                scope.as_deref(),
                args,
            ),
            Node::New { type_name, args } => {
                let ty = res.resolve_type_name(ctx, type_name, true)?.ok_or_else(|| {
                    ResolveError::UnresolvedName { name: (*type_name).to_string() }
                })?;
                res.resolve_constructor_call(self, ctx, forward, &ty, args)
            }
        }
    }
}

/// `RUST_LOG=vela_resolve=trace cargo test` shows the resolution traces.
fn init_logging() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

fn method_named(store: &TypeStore, class: ClassId, name: &str) -> MethodId {
    store
        .class(class)
        .methods
        .iter()
        .copied()
        .find(|m| store.method(*m).name.as_str() == name)
        .unwrap()
}

fn method_todo(method: MethodId, payload: Node, context: Context) -> Todo<Node> {
    Todo { target: TodoTarget::Method(method), forward: ForwardType::none(), eci: None, payload, context }
}

#[test]
fn list_add_binds_the_element_parameter() {
    init_logging();
    let mut store = TypeStore::with_minimal_core();
    let list = store.lookup_class("java.util.List").unwrap();
    let string = Type::simple(store.well_known().string);
    let pkg = PackageName::from_dotted("app");
    let main = store.add_class(ClassDef::new(pkg.clone(), "Main", ClassKind::Class));
    store.add_field(FieldDef {
        name: Name::new("list"),
        owner: main,
        ty: Type::class(list, vec![string]),
        is_static: false,
        is_public: false,
        initializer: None,
    });
    let run = store.add_method(MethodDef::new(main, "run", vec![], Type::void()));

    let mut res: Resolution<'_, Node> = Resolution::new(&store, ErrorPolicy::Collect);
    let unit = res.new_compilation_unit(pkg);
    let body = res.new_type_body(&unit, main);
    let block = res.new_variable_context_for_method_block(&body, run);
    res.add_type(main);
    res.add_todo(method_todo(
        run,
        Node::Call {
            scope: Some(Box::new(Node::Name("list"))),
            name: "add",
            args: vec![Node::Str("x")],
        },
        block,
    ));

    let outcome = res.resolve(&Parser).unwrap();
    let list_add = method_named(&store, list, "add");
    match &outcome.assignments[..] {
        [(TodoTarget::Method(m), Expression::MethodCall { method, args, .. })] => {
            assert_eq!(*m, run);
            // The variant declared directly on List wins over the one
            // inherited from Collection.
            assert_eq!(*method, list_add);
            assert_eq!(args[0], Expression::StringLiteral("x".to_string()));
        }
        other => panic!("unexpected assignments: {other:?}"),
    }

    let summary = commit(&mut store, outcome);
    assert!(!summary.have_errors());
    assert!(summary.resolved_types().contains(&main));
    assert!(store.is_class_committed(main));
    assert!(store.is_method_committed(run));
    assert!(store.method(run).body.is_some());
}

#[test]
fn fixed_arity_wins_over_varargs_at_a_call_site() {
    init_logging();
    let mut store = TypeStore::with_minimal_core();
    let pkg = PackageName::from_dotted("app");
    let main = store.add_class(ClassDef::new(pkg.clone(), "Main", ClassKind::Class));
    let fixed = store.add_method(MethodDef::new(
        main,
        "m",
        vec![Param::new("x", Type::int())],
        Type::void(),
    ));
    store.add_method(MethodDef::new(
        main,
        "m",
        vec![Param::varargs("xs", Type::int())],
        Type::void(),
    ));
    let run = store.add_method(MethodDef::new(main, "run", vec![], Type::void()));

    let mut res: Resolution<'_, Node> = Resolution::new(&store, ErrorPolicy::Collect);
    let unit = res.new_compilation_unit(pkg);
    let body = res.new_type_body(&unit, main);
    let block = res.new_variable_context_for_method_block(&body, run);
    res.add_type(main);
    res.add_todo(method_todo(
        run,
        Node::Call { scope: None, name: "m", args: vec![Node::Int(1)] },
        block,
    ));

    let outcome = res.resolve(&Parser).unwrap();
    match &outcome.assignments[..] {
        [(_, Expression::MethodCall { method, .. })] => assert_eq!(*method, fixed),
        other => panic!("unexpected assignments: {other:?}"),
    }
}

#[test]
fn an_unresolvable_call_fails_only_its_own_type() {
    init_logging();
    let mut store = TypeStore::with_minimal_core();
    let pkg = PackageName::from_dotted("app");
    let string = Type::simple(store.well_known().string);
    let broken = store.add_class(ClassDef::new(pkg.clone(), "Broken", ClassKind::Class));
    store.add_method(MethodDef::new(
        broken,
        "m",
        vec![Param::new("first", Type::int()), Param::varargs("rest", string)],
        Type::void(),
    ));
    let broken_run = store.add_method(MethodDef::new(broken, "run", vec![], Type::void()));
    let healthy = store.add_class(ClassDef::new(pkg.clone(), "Healthy", ClassKind::Class));
    let healthy_run = store.add_method(MethodDef::new(healthy, "run", vec![], Type::int()));

    let mut res: Resolution<'_, Node> = Resolution::new(&store, ErrorPolicy::Collect);
    let unit = res.new_compilation_unit(pkg);
    let broken_block = {
        let body = res.new_type_body(&unit, broken);
        res.new_variable_context_for_method_block(&body, broken_run)
    };
    let healthy_block = {
        let body = res.new_type_body(&unit, healthy);
        res.new_variable_context_for_method_block(&body, healthy_run)
    };
    res.add_type(broken);
    res.add_type(healthy);
    // Varargs still requires the fixed arguments; zero presented cannot
    // satisfy m(int, String...).
    res.add_todo(method_todo(
        broken_run,
        Node::Call { scope: None, name: "m", args: vec![] },
        broken_block,
    ));
    res.add_todo(method_todo(healthy_run, Node::Int(42), healthy_block));

    let outcome = res.resolve(&Parser).unwrap();
    assert_eq!(outcome.assignments.len(), 1);
    let summary = commit(&mut store, outcome);
    assert_eq!(summary.diagnostics().len(), 1);
    assert!(summary.failed_types().contains(&broken));
    assert!(summary.resolved_types().contains(&healthy));
    // Commit still freezes everything that was scanned.
    assert!(store.is_class_committed(broken));
    assert!(store.is_class_committed(healthy));
    assert!(store.method(healthy_run).body.is_some());
    assert!(store.method(broken_run).body.is_none());
}

#[test]
fn fail_fast_aborts_the_whole_run() {
    init_logging();
    let mut store = TypeStore::with_minimal_core();
    let pkg = PackageName::from_dotted("app");
    let main = store.add_class(ClassDef::new(pkg.clone(), "Main", ClassKind::Class));
    let run = store.add_method(MethodDef::new(main, "run", vec![], Type::void()));

    let mut res: Resolution<'_, Node> = Resolution::new(&store, ErrorPolicy::FailFast);
    let unit = res.new_compilation_unit(pkg);
    let body = res.new_type_body(&unit, main);
    let block = res.new_variable_context_for_method_block(&body, run);
    res.add_type(main);
    res.add_todo(method_todo(
        run,
        Node::Call { scope: None, name: "nowhere", args: vec![] },
        block,
    ));

    let err = res.resolve(&Parser).unwrap_err();
    assert!(matches!(err, ResolveError::FailFast { .. }));
}

#[test]
fn diamond_takes_arguments_from_the_expected_type() {
    init_logging();
    let mut store = TypeStore::with_minimal_core();
    let list = store.lookup_class("java.util.List").unwrap();
    let array_list = store.lookup_class("java.util.ArrayList").unwrap();
    let string = Type::simple(store.well_known().string);
    let pkg = PackageName::from_dotted("app");
    let main = store.add_class(ClassDef::new(pkg.clone(), "Main", ClassKind::Class));
    let list_string = Type::class(list, vec![string.clone()]);
    let xs = store.add_field(FieldDef {
        name: Name::new("xs"),
        owner: main,
        ty: list_string.clone(),
        is_static: false,
        is_public: false,
        initializer: None,
    });

    let mut res: Resolution<'_, Node> = Resolution::new(&store, ErrorPolicy::Collect);
    let unit = res.new_compilation_unit(pkg);
    let body = res.new_type_body(&unit, main);
    res.add_type(main);
    res.add_todo(Todo {
        target: TodoTarget::Field(xs),
        forward: ForwardType::expect(list_string),
        eci: None,
        payload: Node::New { type_name: "java.util.ArrayList", args: vec![] },
        context: body,
    });

    let outcome = res.resolve(&Parser).unwrap();
    match &outcome.assignments[..] {
        [(TodoTarget::Field(f), Expression::ConstructorCall { ty, args, .. })] => {
            assert_eq!(*f, xs);
            assert!(args.is_empty());
            assert_eq!(*ty, Type::class(array_list, vec![string]));
        }
        other => panic!("unexpected assignments: {other:?}"),
    }

    let summary = commit(&mut store, outcome);
    assert!(!summary.have_errors());
    assert!(store.is_field_committed(xs));
    assert!(store.field(xs).initializer.is_some());
}

#[test]
fn static_import_brings_a_generic_factory_into_scope() {
    init_logging();
    let mut store = TypeStore::with_minimal_core();
    let list = store.lookup_class("java.util.List").unwrap();
    let string = Type::simple(store.well_known().string);
    let pkg = PackageName::from_dotted("app");
    let main = store.add_class(ClassDef::new(pkg.clone(), "Main", ClassKind::Class));
    let run = store.add_method(MethodDef::new(main, "run", vec![], Type::void()));

    let mut res: Resolution<'_, Node> = Resolution::new(&store, ErrorPolicy::Collect);
    let unit = res.new_compilation_unit(pkg);
    res.add_static_import(&unit, Name::new("of"), list);
    let body = res.new_type_body(&unit, main);
    let block = res.new_variable_context_for_method_block(&body, run);
    res.add_type(main);
    res.add_todo(method_todo(
        run,
        Node::Call { scope: None, name: "of", args: vec![Node::Str("a")] },
        block,
    ));

    let outcome = res.resolve(&Parser).unwrap();
    let list_of = method_named(&store, list, "of");
    match &outcome.assignments[..] {
        [(_, Expression::MethodCall { method, return_type, .. })] => {
            assert_eq!(*method, list_of);
            // The element parameter is inferred from the argument.
            assert_eq!(*return_type, Type::class(list, vec![string]));
        }
        other => panic!("unexpected assignments: {other:?}"),
    }
}

#[test]
fn a_true_tie_between_overloads_is_ambiguous() {
    init_logging();
    let mut store = TypeStore::with_minimal_core();
    let object = Type::simple(store.well_known().object);
    let pkg = PackageName::from_dotted("app");
    let ia = store.add_class(ClassDef::new(pkg.clone(), "IA", ClassKind::Interface));
    let ib = store.add_class(ClassDef::new(pkg.clone(), "IB", ClassKind::Interface));
    let both = store.add_class(ClassDef {
        super_class: Some(object),
        interfaces: vec![Type::simple(ia), Type::simple(ib)],
        ..ClassDef::new(pkg.clone(), "Both", ClassKind::Class)
    });
    let main = store.add_class(ClassDef::new(pkg.clone(), "Main", ClassKind::Class));
    store.add_method(MethodDef::new(
        main,
        "m",
        vec![Param::new("a", Type::simple(ia))],
        Type::void(),
    ));
    store.add_method(MethodDef::new(
        main,
        "m",
        vec![Param::new("b", Type::simple(ib))],
        Type::void(),
    ));
    store.add_field(FieldDef {
        name: Name::new("both"),
        owner: main,
        ty: Type::simple(both),
        is_static: false,
        is_public: false,
        initializer: None,
    });
    let run = store.add_method(MethodDef::new(main, "run", vec![], Type::void()));

    let mut res: Resolution<'_, Node> = Resolution::new(&store, ErrorPolicy::Collect);
    let unit = res.new_compilation_unit(pkg);
    let body = res.new_type_body(&unit, main);
    let block = res.new_variable_context_for_method_block(&body, run);

    // Both overloads sit on the same class, both are public and both accept
    // the argument at distance one; nothing breaks the tie.
    let err = res
        .resolve_method_call(
            &Parser,
            &block,
            &ForwardType::none(),
            &Name::new("m"),
            None,
            &[Node::Name("both")],
        )
        .unwrap_err();
    match err {
        ResolveError::AmbiguousOverload { name, candidates } => {
            assert_eq!(name, "m");
            assert_eq!(candidates.len(), 2);
        }
        other => panic!("expected an ambiguity, got {other:?}"),
    }
}

#[test]
fn an_erased_inner_call_is_reevaluated_under_the_winning_parameter() {
    init_logging();
    let mut store = TypeStore::with_minimal_core();
    let list = store.lookup_class("java.util.List").unwrap();
    let string = Type::simple(store.well_known().string);
    let pkg = PackageName::from_dotted("app");
    let main = store.add_class(ClassDef::new(pkg.clone(), "Main", ClassKind::Class));
    store.add_field(FieldDef {
        name: Name::new("xs"),
        owner: main,
        ty: Type::class(list, vec![string.clone()]),
        is_static: false,
        is_public: false,
        initializer: None,
    });
    let pick = store.add_method(MethodDef::new(main, "pick", vec![], string.clone()));
    let run = store.add_method(MethodDef::new(main, "run", vec![], Type::void()));

    let mut res: Resolution<'_, Node> = Resolution::new(&store, ErrorPolicy::Collect);
    let unit = res.new_compilation_unit(pkg);
    let body = res.new_type_body(&unit, main);
    let block = res.new_variable_context_for_method_block(&body, run);
    res.add_type(main);
    // The inner call is first seen under erasure while the outer overload is
    // still open, then parsed again once `add` has won.
    res.add_todo(method_todo(
        run,
        Node::Call {
            scope: Some(Box::new(Node::Name("xs"))),
            name: "add",
            args: vec![Node::Call { scope: None, name: "pick", args: vec![] }],
        },
        block,
    ));

    let outcome = res.resolve(&Parser).unwrap();
    let list_add = method_named(&store, list, "add");
    match &outcome.assignments[..] {
        [(_, expr @ Expression::MethodCall { method, args, .. })] => {
            assert_eq!(*method, list_add);
            assert!(!expr.contains_erased());
            match &args[0] {
                Expression::MethodCall { method, return_type, .. } => {
                    assert_eq!(*method, pick);
                    assert_eq!(*return_type, string);
                }
                other => panic!("unexpected argument: {other:?}"),
            }
        }
        other => panic!("unexpected assignments: {other:?}"),
    }
}
