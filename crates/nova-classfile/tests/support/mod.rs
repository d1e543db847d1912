pub mod classgen;

use nova_classfile::{StubData, StubId, StubKind, StubTree};

/// Children of `id` with the given kind, in order.
pub fn children_of_kind(tree: &StubTree, id: StubId, kind: StubKind) -> Vec<StubId> {
    tree.children(id)
        .iter()
        .copied()
        .filter(|child| tree.get(*child).kind() == kind)
        .collect()
}

pub fn names(tree: &StubTree, ids: &[StubId]) -> Vec<String> {
    ids.iter()
        .filter_map(|id| tree.get(*id).name().map(str::to_string))
        .collect()
}

pub fn member_names(tree: &StubTree, id: StubId, kind: StubKind) -> Vec<String> {
    names(tree, &children_of_kind(tree, id, kind))
}

pub fn find_child(tree: &StubTree, id: StubId, kind: StubKind, name: &str) -> StubId {
    children_of_kind(tree, id, kind)
        .into_iter()
        .find(|child| tree.get(*child).name() == Some(name))
        .unwrap_or_else(|| panic!("no {kind:?} named {name}"))
}

pub fn parameter_types(tree: &StubTree, method: StubId) -> Vec<String> {
    children_of_kind(tree, method, StubKind::Parameter)
        .into_iter()
        .map(|id| match tree.data(id) {
            StubData::Parameter(param) => format!("{} {}", param.type_text, param.name),
            other => panic!("unexpected {other:?}"),
        })
        .collect()
}

pub fn annotation_texts(tree: &StubTree, owner: StubId) -> Vec<String> {
    let list = tree
        .child_of_kind(owner, StubKind::ModifierList)
        .expect("modifier list");
    tree.children(list)
        .iter()
        .map(|id| match tree.data(*id) {
            StubData::Annotation { text, .. } => text.clone(),
            other => panic!("unexpected {other:?}"),
        })
        .collect()
}
