use nova_classfile::{NoSiblings, ReferenceRole, StubBuilder, StubData, StubKind, StubTree};
use pretty_assertions::assert_eq;

use crate::support::classgen::*;
use crate::support::{children_of_kind, find_child, member_names, parameter_types};

fn decode(bytes: &[u8]) -> StubTree {
    StubBuilder::new(&NoSiblings).build("T.class", bytes).unwrap()
}

fn return_type(tree: &StubTree, method: nova_classfile::StubId) -> Option<String> {
    match tree.data(method) {
        StubData::Method(data) => data.return_type.clone(),
        other => panic!("unexpected {other:?}"),
    }
}

fn reference_types(tree: &StubTree, owner: nova_classfile::StubId, role: ReferenceRole) -> Vec<String> {
    match tree.data(tree.reference_list(owner, role).unwrap()) {
        StubData::ReferenceList { types, .. } => types.clone(),
        other => panic!("unexpected {other:?}"),
    }
}

#[test]
fn malformed_member_signature_falls_back_to_descriptor_for_that_member_only() {
    let bytes = ClassGen::new("p/T")
        .method(
            Member::new(ACC_PUBLIC, "broken", "(Ljava/util/List;)Ljava/util/Map;")
                .signature("(Ljava/util/List<TT;)Ljava/util/Map<"),
        )
        .method(
            Member::new(ACC_PUBLIC, "generic", "(Ljava/util/List;)Ljava/lang/Object;")
                .signature("<T:Ljava/lang/Object;>(Ljava/util/List<+TT;>;)TT;"),
        )
        .field(Member::new(ACC_PUBLIC, "names", "Ljava/util/List;").signature("Ljava/util/List<"))
        .build();
    let tree = decode(&bytes);
    let root = tree.root().unwrap();

    let broken = find_child(&tree, root, StubKind::Method, "broken");
    assert_eq!(parameter_types(&tree, broken), vec!["java.util.List arg0"]);
    assert_eq!(return_type(&tree, broken).as_deref(), Some("java.util.Map"));
    let tparams = tree
        .child_of_kind(broken, StubKind::TypeParameterList)
        .unwrap();
    assert!(tree.children(tparams).is_empty());

    let generic = find_child(&tree, root, StubKind::Method, "generic");
    assert_eq!(
        parameter_types(&tree, generic),
        vec!["java.util.List<? extends T> arg0"]
    );
    assert_eq!(return_type(&tree, generic).as_deref(), Some("T"));
    let tparams = tree
        .child_of_kind(generic, StubKind::TypeParameterList)
        .unwrap();
    assert_eq!(member_names(&tree, tparams, StubKind::TypeParameter), vec!["T"]);
    let t = children_of_kind(&tree, tparams, StubKind::TypeParameter)[0];
    assert!(reference_types(&tree, t, ReferenceRole::Bounds).is_empty());

    let names = find_child(&tree, root, StubKind::Field, "names");
    let StubData::Field(field) = tree.data(names) else {
        panic!()
    };
    assert_eq!(field.type_text, "java.util.List");
}

#[test]
fn malformed_class_signature_uses_raw_supertypes() {
    let bytes = ClassGen::new("p/T")
        .extends("p/Base")
        .implements("java/lang/Iterable")
        .signature("<T:Ljava/lang/Object;>Lp/Base<TT;>")
        .build();
    let tree = decode(&bytes);
    let root = tree.root().unwrap();
    assert_eq!(reference_types(&tree, root, ReferenceRole::Extends), vec!["p.Base"]);
    assert_eq!(
        reference_types(&tree, root, ReferenceRole::Implements),
        vec!["java.lang.Iterable"]
    );
}

#[test]
fn generic_class_signature_renders_bounds_and_arguments() {
    let bytes = ClassGen::new("p/Cache")
        .extends("java/util/AbstractMap")
        .implements("java/io/Serializable")
        .signature(
            "<K::Ljava/lang/Comparable<-TK;>;V:Ljava/lang/Number;:Ljava/lang/Cloneable;>Ljava/util/AbstractMap<TK;TV;>;Ljava/io/Serializable;",
        )
        .build();
    let tree = decode(&bytes);
    let root = tree.root().unwrap();
    let tparams = tree.child_of_kind(root, StubKind::TypeParameterList).unwrap();
    let ids = children_of_kind(&tree, tparams, StubKind::TypeParameter);
    assert_eq!(
        reference_types(&tree, ids[0], ReferenceRole::Bounds),
        vec!["java.lang.Comparable<? super K>"]
    );
    assert_eq!(
        reference_types(&tree, ids[1], ReferenceRole::Bounds),
        vec!["java.lang.Number", "java.lang.Cloneable"]
    );
    assert_eq!(
        reference_types(&tree, root, ReferenceRole::Extends),
        vec!["java.util.AbstractMap<K, V>"]
    );
}

#[test]
fn shorter_signature_throws_list_defers_to_exceptions_attribute() {
    let bytes = ClassGen::new("p/T")
        .method(
            Member::new(ACC_PUBLIC, "io", "()V")
                .signature("<E:Ljava/lang/Exception;>()V^TE;")
                .exceptions(&["java/lang/Exception", "java/io/IOException"]),
        )
        .method(
            Member::new(ACC_PUBLIC, "generic", "()V")
                .signature("<E:Ljava/lang/Exception;>()V^TE;")
                .exceptions(&["java/lang/Exception"]),
        )
        .method(Member::new(ACC_PUBLIC, "plain", "()V").exceptions(&["p/Outer$Failure"]))
        .build();
    let tree = decode(&bytes);
    let root = tree.root().unwrap();

    let io = find_child(&tree, root, StubKind::Method, "io");
    assert_eq!(
        reference_types(&tree, io, ReferenceRole::Throws),
        vec!["java.lang.Exception", "java.io.IOException"]
    );
    let generic = find_child(&tree, root, StubKind::Method, "generic");
    assert_eq!(reference_types(&tree, generic, ReferenceRole::Throws), vec!["E"]);
    let plain = find_child(&tree, root, StubKind::Method, "plain");
    assert_eq!(
        reference_types(&tree, plain, ReferenceRole::Throws),
        vec!["p.Outer.Failure"]
    );
}

#[test]
fn binary_names_collapse_only_inner_separators() {
    let bytes = ClassGen::new("p/T")
        .field(Member::new(ACC_PUBLIC, "a", "Lp/Outer$Inner;"))
        .field(Member::new(ACC_PUBLIC, "b", "Lp/$Proxy;"))
        .field(Member::new(ACC_PUBLIC, "c", "Lp/Gen$$Lambda;"))
        .field(Member::new(ACC_PUBLIC, "d", "Lp/Trailing$;"))
        .build();
    let tree = decode(&bytes);
    let root = tree.root().unwrap();
    let types: Vec<String> = children_of_kind(&tree, root, StubKind::Field)
        .into_iter()
        .map(|id| match tree.data(id) {
            StubData::Field(field) => field.type_text.clone(),
            _ => unreachable!(),
        })
        .collect();
    assert_eq!(
        types,
        vec!["p.Outer.Inner", "p.$Proxy", "p.Gen$$Lambda", "p.Trailing$"]
    );
}

#[test]
fn unspellable_type_variable_falls_back_to_descriptor() {
    let bytes = ClassGen::new("p/Gen")
        .field(Member::new(ACC_PUBLIC, "ok", "I"))
        .method(Member::new(ACC_PUBLIC, "m", "()V").signature("<a-b:Ljava/lang/Object;>()V"))
        .method(
            Member::new(ACC_PUBLIC, "get", "()Ljava/lang/Object;").signature("()Tclass;"),
        )
        .build();
    let tree = decode(&bytes);
    let root = tree.root().unwrap();
    assert_eq!(member_names(&tree, root, StubKind::Field), vec!["ok"]);

    let m = find_child(&tree, root, StubKind::Method, "m");
    let tparams = tree.child_of_kind(m, StubKind::TypeParameterList).unwrap();
    assert!(tree.children(tparams).is_empty());
    let get = find_child(&tree, root, StubKind::Method, "get");
    assert_eq!(return_type(&tree, get).as_deref(), Some("java.lang.Object"));
}

#[test]
fn unspellable_signature_class_name_falls_back_to_descriptor() {
    let bytes = ClassGen::new("p/T")
        .field(
            Member::new(ACC_PUBLIC, "items", "Ljava/util/List;")
                .signature("Ljava/util/List<Lp/a-b;>;"),
        )
        .method(
            Member::new(ACC_PUBLIC, "run", "(Ljava/lang/Runnable;)V")
                .signature("(Lp/Outer$1;)V"),
        )
        .build();
    let tree = decode(&bytes);
    let root = tree.root().unwrap();
    let items = find_child(&tree, root, StubKind::Field, "items");
    let StubData::Field(field) = tree.data(items) else {
        panic!()
    };
    assert_eq!(field.type_text, "java.util.List");
    let run = find_child(&tree, root, StubKind::Method, "run");
    assert_eq!(parameter_types(&tree, run), vec!["java.lang.Runnable arg0"]);
}

#[test]
fn unspellable_descriptor_class_name_omits_only_that_member() {
    let bytes = ClassGen::new("p/T")
        .field(Member::new(ACC_PUBLIC, "bad", "Lp/a-b;"))
        .field(Member::new(ACC_PUBLIC, "good", "Ljava/lang/String;"))
        .method(Member::new(ACC_PUBLIC, "take", "(Lp/Outer$1;)V"))
        .method(Member::new(ACC_PUBLIC, "give", "()[Lint/X;"))
        .method(
            Member::new(ACC_PUBLIC, "risky", "()V")
                .exceptions(&["p/a-b", "java/io/IOException"]),
        )
        .build();
    let tree = decode(&bytes);
    let root = tree.root().unwrap();
    assert_eq!(member_names(&tree, root, StubKind::Field), vec!["good"]);
    assert_eq!(member_names(&tree, root, StubKind::Method), vec!["risky"]);
    let risky = find_child(&tree, root, StubKind::Method, "risky");
    assert_eq!(
        reference_types(&tree, risky, ReferenceRole::Throws),
        vec!["java.io.IOException"]
    );
}

#[test]
fn unspellable_raw_supertypes_are_dropped() {
    let bytes = ClassGen::new("p/T")
        .extends("p/Base$1")
        .implements("java/lang/Runnable")
        .implements("p/a-b")
        .build();
    let tree = decode(&bytes);
    let root = tree.root().unwrap();
    assert!(reference_types(&tree, root, ReferenceRole::Extends).is_empty());
    assert_eq!(
        reference_types(&tree, root, ReferenceRole::Implements),
        vec!["java.lang.Runnable"]
    );
}

#[test]
fn unspellable_package_rejects_the_class() {
    for internal in ["p./T", "1/T", "class/T", "a//T"] {
        let bytes = ClassGen::new(internal).build();
        let err = StubBuilder::new(&NoSiblings).build("T.class", &bytes).unwrap_err();
        assert_eq!(err, nova_classfile::BuildError::InvalidClassName(internal.to_string()));
        let tree = StubBuilder::new(&NoSiblings)
            .build_or_placeholder("T.class", &bytes)
            .unwrap();
        assert!(tree.is_placeholder(), "{internal}");
    }
}
