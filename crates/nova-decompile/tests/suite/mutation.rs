use nova_classfile::Modifiers;
use nova_decompile::{DecompileError, StubKind};

use crate::point;

#[test]
fn every_mutation_is_rejected() {
    let file = point();
    let before = file.text();
    let root = file.root().unwrap();
    let field = root.fields().remove(0);
    let param_list = root.methods()[0].modifier_list().unwrap();

    let results = [
        root.add_child("int y;"),
        root.remove_child(4),
        root.replace_child(4, "int y;"),
        field.set_name("y"),
        field.set_modifier(Modifiers::STATIC, true),
        field.set_initializer(Some("1")),
        param_list.set_modifier(Modifiers::FINAL, false),
    ];
    for result in results {
        assert!(matches!(result, Err(DecompileError::NotModifiable { .. })));
    }

    let Err(DecompileError::NotModifiable { path }) = field.set_name("y") else {
        panic!("mutation accepted");
    };
    assert_eq!(&path, field.path());
    assert_eq!(path.to_string(), "/4");

    assert_eq!(file.text(), before);
    assert_eq!(root.fields()[0].name(), Some("x"));
    assert_eq!(param_list.kind(), StubKind::ModifierList);
}
