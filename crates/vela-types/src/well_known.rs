//! The handful of core-package types every resolution run needs, plus a
//! larger fixture used throughout the test suites.

use vela_core::PackageName;

use crate::{ClassDef, ClassId, ClassKind, MethodDef, Param, Primitive, Type, TypeEnv, TypeStore};

/// Ids of the always-present core types.
#[derive(Debug, Clone)]
pub struct WellKnown {
    pub object: ClassId,
    pub string: ClassId,
    pub boxed_boolean: ClassId,
    pub boxed_byte: ClassId,
    pub boxed_short: ClassId,
    pub boxed_char: ClassId,
    pub boxed_int: ClassId,
    pub boxed_long: ClassId,
    pub boxed_float: ClassId,
    pub boxed_double: ClassId,
}

impl WellKnown {
    pub(crate) fn placeholder() -> WellKnown {
        let none = ClassId(u32::MAX);
        WellKnown {
            object: none,
            string: none,
            boxed_boolean: none,
            boxed_byte: none,
            boxed_short: none,
            boxed_char: none,
            boxed_int: none,
            boxed_long: none,
            boxed_float: none,
            boxed_double: none,
        }
    }

    pub fn boxed(&self, p: Primitive) -> ClassId {
        match p {
            Primitive::Boolean => self.boxed_boolean,
            Primitive::Byte => self.boxed_byte,
            Primitive::Short => self.boxed_short,
            Primitive::Char => self.boxed_char,
            Primitive::Int => self.boxed_int,
            Primitive::Long => self.boxed_long,
            Primitive::Float => self.boxed_float,
            Primitive::Double => self.boxed_double,
        }
    }

    pub fn unboxed(&self, c: ClassId) -> Option<Primitive> {
        if c == self.boxed_boolean {
            Some(Primitive::Boolean)
        } else if c == self.boxed_byte {
            Some(Primitive::Byte)
        } else if c == self.boxed_short {
            Some(Primitive::Short)
        } else if c == self.boxed_char {
            Some(Primitive::Char)
        } else if c == self.boxed_int {
            Some(Primitive::Int)
        } else if c == self.boxed_long {
            Some(Primitive::Long)
        } else if c == self.boxed_float {
            Some(Primitive::Float)
        } else if c == self.boxed_double {
            Some(Primitive::Double)
        } else {
            None
        }
    }
}

pub(crate) fn seed_core_package(store: &mut TypeStore) -> WellKnown {
    let lang = PackageName::from_dotted("java.lang");

    let object = store.add_class(ClassDef::new(lang.clone(), "Object", ClassKind::Class));
    let obj = Type::simple(object);

    let string = store.add_class(ClassDef {
        super_class: Some(obj.clone()),
        ..ClassDef::new(lang.clone(), "String", ClassKind::Class)
    });

    store.add_method(MethodDef::new(
        object,
        "equals",
        vec![Param::new("other", obj.clone())],
        Type::boolean(),
    ));
    store.add_method(MethodDef::new(object, "hashCode", vec![], Type::int()));
    store.add_method(MethodDef::new(object, "toString", vec![], Type::simple(string)));

    store.add_method(MethodDef::new(string, "length", vec![], Type::int()));
    store.add_method(MethodDef::new(string, "isEmpty", vec![], Type::boolean()));

    let boxed_class = |store: &mut TypeStore, simple: &str| {
        store.add_class(ClassDef {
            super_class: Some(obj.clone()),
            ..ClassDef::new(lang.clone(), simple, ClassKind::Class)
        })
    };
    let boxed_boolean = boxed_class(store, "Boolean");
    let boxed_byte = boxed_class(store, "Byte");
    let boxed_short = boxed_class(store, "Short");
    let boxed_char = boxed_class(store, "Character");
    let boxed_int = boxed_class(store, "Integer");
    let boxed_long = boxed_class(store, "Long");
    let boxed_float = boxed_class(store, "Float");
    let boxed_double = boxed_class(store, "Double");

    let mut value_of = MethodDef::new(
        boxed_int,
        "valueOf",
        vec![Param::new("value", Type::int())],
        Type::simple(boxed_int),
    );
    value_of.is_static = true;
    store.add_method(value_of);
    store.add_method(MethodDef::new(boxed_int, "intValue", vec![], Type::int()));

    WellKnown {
        object,
        string,
        boxed_boolean,
        boxed_byte,
        boxed_short,
        boxed_char,
        boxed_int,
        boxed_long,
        boxed_float,
        boxed_double,
    }
}

impl TypeStore {
    /// The core package plus a small collections and functional-interface
    /// fixture: `Iterable`, `Collection`, `List`, `ArrayList`, `Function`,
    /// `Consumer`, `Supplier`, `Runnable`. Used heavily in tests.
    pub fn with_minimal_core() -> TypeStore {
        let mut store = TypeStore::new();
        let object = Type::simple(store.well_known().object);
        let lang = PackageName::from_dotted("java.lang");
        let util = PackageName::from_dotted("java.util");
        let function_pkg = PackageName::from_dotted("java.util.function");

        let t_iterable = store.add_type_param("T");
        let iterable = store.add_class(ClassDef {
            type_params: vec![t_iterable],
            ..ClassDef::new(lang.clone(), "Iterable", ClassKind::Interface)
        });

        let e_coll = store.add_type_param("E");
        let collection = store.add_class(ClassDef {
            type_params: vec![e_coll],
            interfaces: vec![Type::class(iterable, vec![Type::var(e_coll)])],
            ..ClassDef::new(util.clone(), "Collection", ClassKind::Interface)
        });
        let mut add = MethodDef::new(
            collection,
            "add",
            vec![Param::new("e", Type::var(e_coll))],
            Type::boolean(),
        );
        add.is_abstract = true;
        store.add_method(add);
        let mut size = MethodDef::new(collection, "size", vec![], Type::int());
        size.is_abstract = true;
        store.add_method(size);

        let e_list = store.add_type_param("E");
        let list = store.add_class(ClassDef {
            type_params: vec![e_list],
            interfaces: vec![Type::class(collection, vec![Type::var(e_list)])],
            ..ClassDef::new(util.clone(), "List", ClassKind::Interface)
        });
        let mut list_add = MethodDef::new(
            list,
            "add",
            vec![Param::new("e", Type::var(e_list))],
            Type::boolean(),
        );
        list_add.is_abstract = true;
        store.add_method(list_add);
        let mut get = MethodDef::new(
            list,
            "get",
            vec![Param::new("index", Type::int())],
            Type::var(e_list),
        );
        get.is_abstract = true;
        store.add_method(get);
        let f_of = store.add_type_param("F");
        let mut of = MethodDef::new(
            list,
            "of",
            vec![Param::varargs("elements", Type::var(f_of))],
            Type::class(list, vec![Type::var(f_of)]),
        );
        of.type_params = vec![f_of];
        of.is_static = true;
        store.add_method(of);

        let e_array_list = store.add_type_param("E");
        let array_list = store.add_class(ClassDef {
            type_params: vec![e_array_list],
            super_class: Some(object.clone()),
            interfaces: vec![Type::class(list, vec![Type::var(e_array_list)])],
            ..ClassDef::new(util, "ArrayList", ClassKind::Class)
        });
        let array_list_ty = Type::class(array_list, vec![Type::var(e_array_list)]);
        store.add_method(MethodDef::constructor(array_list, vec![], array_list_ty.clone()));
        store.add_method(MethodDef::constructor(
            array_list,
            vec![Param::new("initialCapacity", Type::int())],
            array_list_ty,
        ));

        let t_fn = store.add_type_param("T");
        let r_fn = store.add_type_param("R");
        let function = store.add_class(ClassDef {
            type_params: vec![t_fn, r_fn],
            ..ClassDef::new(function_pkg.clone(), "Function", ClassKind::Interface)
        });
        let mut apply = MethodDef::new(
            function,
            "apply",
            vec![Param::new("t", Type::var(t_fn))],
            Type::var(r_fn),
        );
        apply.is_abstract = true;
        store.add_method(apply);

        let t_consumer = store.add_type_param("T");
        let consumer = store.add_class(ClassDef {
            type_params: vec![t_consumer],
            ..ClassDef::new(function_pkg.clone(), "Consumer", ClassKind::Interface)
        });
        let mut accept = MethodDef::new(
            consumer,
            "accept",
            vec![Param::new("t", Type::var(t_consumer))],
            Type::void(),
        );
        accept.is_abstract = true;
        store.add_method(accept);

        let t_supplier = store.add_type_param("T");
        let supplier = store.add_class(ClassDef {
            type_params: vec![t_supplier],
            ..ClassDef::new(function_pkg, "Supplier", ClassKind::Interface)
        });
        let mut get = MethodDef::new(supplier, "get", vec![], Type::var(t_supplier));
        get.is_abstract = true;
        store.add_method(get);

        let runnable = store.add_class(ClassDef::new(lang, "Runnable", ClassKind::Interface));
        let mut run = MethodDef::new(runnable, "run", vec![], Type::void());
        run.is_abstract = true;
        store.add_method(run);

        store
    }
}
