use nova_classfile::{ClassKind, NoSiblings, StubBuilder, StubData, StubKind, StubTree};
use pretty_assertions::assert_eq;

use crate::support::classgen::*;
use crate::support::{annotation_texts, children_of_kind, find_child};

fn decode(bytes: &[u8]) -> StubTree {
    StubBuilder::new(&NoSiblings).build("T.class", bytes).unwrap()
}

#[test]
fn deprecation_comes_from_attribute_or_annotation() {
    let bytes = ClassGen::new("p/T")
        .annotation(Ann::new("Ljava/lang/Deprecated;"))
        .field(Member::new(ACC_PUBLIC, "old", "I").deprecated())
        .field(Member::new(ACC_PUBLIC, "fresh", "I"))
        .build();
    let tree = decode(&bytes);
    let root = tree.root().unwrap();
    assert!(tree.get(root).is_deprecated());
    assert_eq!(annotation_texts(&tree, root), vec!["@java.lang.Deprecated"]);
    assert!(tree.get(find_child(&tree, root, StubKind::Field, "old")).is_deprecated());
    assert!(!tree.get(find_child(&tree, root, StubKind::Field, "fresh")).is_deprecated());
}

#[test]
fn constant_initializers_follow_field_types() {
    let bytes = ClassGen::new("p/T")
        .field(Member::new(ACC_STATIC | ACC_FINAL, "I", "I").constant(Const::Int(42)))
        .field(Member::new(ACC_STATIC | ACC_FINAL, "Z", "Z").constant(Const::Int(1)))
        .field(Member::new(ACC_STATIC | ACC_FINAL, "C", "C").constant(Const::Int(10)))
        .field(Member::new(ACC_STATIC | ACC_FINAL, "J", "J").constant(Const::Long(7)))
        .field(Member::new(ACC_STATIC | ACC_FINAL, "F", "F").constant(Const::Float(f32::NAN)))
        .field(
            Member::new(ACC_STATIC | ACC_FINAL, "D", "D").constant(Const::Double(f64::NEG_INFINITY)),
        )
        .field(
            Member::new(ACC_STATIC | ACC_FINAL, "S", "Ljava/lang/String;")
                .constant(Const::Str("a\"b".to_string())),
        )
        .field(Member::new(ACC_STATIC, "none", "I"))
        .build();
    let tree = decode(&bytes);
    let root = tree.root().unwrap();
    let initializers: Vec<Option<String>> = children_of_kind(&tree, root, StubKind::Field)
        .into_iter()
        .map(|id| match tree.data(id) {
            StubData::Field(field) => field.initializer.clone(),
            _ => unreachable!(),
        })
        .collect();
    assert_eq!(
        initializers,
        vec![
            Some("42".to_string()),
            Some("true".to_string()),
            Some("'\\n'".to_string()),
            Some("7L".to_string()),
            Some("0.0f / 0.0f".to_string()),
            Some("-1.0 / 0.0".to_string()),
            Some("\"a\\\"b\"".to_string()),
            None,
        ]
    );
}

#[test]
fn annotation_values_are_rendered_as_source() {
    let ann = Ann::new("Lp/Meta;")
        .with("value", Value::Str("x".to_string()))
        .with("n", Value::Int(3))
        .with("big", Value::Long(1))
        .with("on", Value::Bool(true))
        .with("c", Value::Char(u16::from(b'q')))
        .with("kind", Value::Enum("Lp/Kind;".to_string(), "FAST".to_string()))
        .with("type", Value::Class("[I".to_string()))
        .with(
            "tags",
            Value::Array(vec![Value::Str("a".to_string()), Value::Str("b".to_string())]),
        )
        .with("nested", Value::Nested(Ann::new("Lp/Inner;").with("v", Value::Double(0.5))));
    let bytes = ClassGen::new("p/T")
        .method(
            Member::new(ACC_PUBLIC, "run", "(I)V")
                .annotation(ann)
                .invisible_annotation(Ann::new("Lp/Hidden;"))
                .parameter_annotations(vec![vec![Ann::new("Lp/NonNull;")]]),
        )
        .build();
    let tree = decode(&bytes);
    let run = find_child(&tree, tree.root().unwrap(), StubKind::Method, "run");
    assert_eq!(
        annotation_texts(&tree, run),
        vec![
            "@p.Meta(value = \"x\", n = 3, big = 1L, on = true, c = 'q', kind = p.Kind.FAST, type = int[].class, tags = {\"a\", \"b\"}, nested = @p.Inner(v = 0.5))",
            "@p.Hidden",
        ]
    );
    let param = children_of_kind(&tree, run, StubKind::Parameter)[0];
    assert_eq!(annotation_texts(&tree, param), vec!["@p.NonNull"]);
}

#[test]
fn unknown_element_tag_keeps_the_annotations_before_it() {
    let bytes = ClassGen::new("p/T")
        .method(
            Member::new(ACC_PUBLIC, "run", "()V")
                .annotation_table(vec![
                    Ann::new("Lp/First;"),
                    Ann::new("Lp/Second;").with("n", Value::Int(2)),
                    Ann::new("Lp/Weird;").with("v", Value::UnknownTag(b'?')),
                    Ann::new("Lp/Unreachable;"),
                ])
                .invisible_annotation(Ann::new("Lp/Kept;")),
        )
        .method(
            Member::new(ACC_PUBLIC, "take", "(II)V").parameter_annotations(vec![
                vec![Ann::new("Lp/Weird;").with("v", Value::UnknownTag(b'?'))],
                vec![Ann::new("Lp/Lost;")],
            ]),
        )
        .build();
    let tree = decode(&bytes);
    let root = tree.root().unwrap();
    let run = find_child(&tree, root, StubKind::Method, "run");
    assert_eq!(
        annotation_texts(&tree, run),
        vec!["@p.First", "@p.Second(n = 2)", "@p.Kept"]
    );

    let take = find_child(&tree, root, StubKind::Method, "take");
    let params = children_of_kind(&tree, take, StubKind::Parameter);
    assert_eq!(params.len(), 2);
    assert!(annotation_texts(&tree, params[0]).is_empty());
    assert!(annotation_texts(&tree, params[1]).is_empty());
}

#[test]
fn unspellable_annotation_names_omit_only_that_annotation() {
    let bytes = ClassGen::new("p/T")
        .method(
            Member::new(ACC_PUBLIC, "run", "()V")
                .annotation_table(vec![
                    Ann::new("Lp/a-b;"),
                    Ann::new("Lp/Bad;").with("not-a-name", Value::Int(1)),
                    Ann::new("Lp/Kind;").with("k", Value::Enum("Lp/Kind;".into(), "a-b".into())),
                    Ann::new("Lp/Kept;"),
                ]),
        )
        .build();
    let tree = decode(&bytes);
    let run = find_child(&tree, tree.root().unwrap(), StubKind::Method, "run");
    assert_eq!(annotation_texts(&tree, run), vec!["@p.Kept"]);
}

#[test]
fn annotation_type_elements_carry_defaults() {
    let bytes = ClassGen::new("p/Config")
        .flags(ACC_PUBLIC | ACC_INTERFACE | ACC_ABSTRACT | ACC_ANNOTATION)
        .implements("java/lang/annotation/Annotation")
        .method(
            Member::new(ACC_PUBLIC | ACC_ABSTRACT, "name", "()Ljava/lang/String;")
                .annotation_default(Value::Str("none".to_string())),
        )
        .method(Member::new(ACC_PUBLIC | ACC_ABSTRACT, "size", "()I"))
        .build();
    let tree = decode(&bytes);
    let root = tree.root().unwrap();
    let StubData::Class(class) = tree.data(root) else {
        panic!()
    };
    assert_eq!(class.kind, ClassKind::Annotation);

    let name = find_child(&tree, root, StubKind::Method, "name");
    let StubData::Method(method) = tree.data(name) else {
        panic!()
    };
    assert_eq!(method.annotation_default.as_deref(), Some("\"none\""));

    let extends = tree
        .reference_list(root, nova_classfile::ReferenceRole::Extends)
        .unwrap();
    assert_eq!(
        tree.data(extends),
        &StubData::ReferenceList {
            role: nova_classfile::ReferenceRole::Extends,
            types: Vec::new(),
        }
    );
}
