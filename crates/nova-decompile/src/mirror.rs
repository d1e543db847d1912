//! The parsed mirror: a declaration-shaped view of mirror text.
//!
//! [`MirrorTree`] nodes use the stub kinds and the stub child order, so the binder can pair them
//! positionally. Optional syntax that is absent from the text (an empty modifier list, a missing
//! `extends` clause) still gets a node, with an empty range at the spot it would occupy.

use nova_classfile::StubKind;
use text_size::{TextRange, TextSize};
use tree_sitter::{Node, Parser};

use crate::error::MirrorParseError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MirrorId(u32);

impl MirrorId {
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MirrorNode {
    kind: StubKind,
    range: TextRange,
    name_range: Option<TextRange>,
    reference_ranges: Vec<TextRange>,
    elided: Vec<TextRange>,
    parent: Option<MirrorId>,
    children: Vec<MirrorId>,
}

impl MirrorNode {
    pub fn kind(&self) -> StubKind {
        self.kind
    }

    pub fn range(&self) -> TextRange {
        self.range
    }

    pub fn name_range(&self) -> Option<TextRange> {
        self.name_range
    }

    /// One range per referenced type, for reference lists.
    pub fn reference_ranges(&self) -> &[TextRange] {
        &self.reference_ranges
    }

    /// Text inside this node with no compiled counterpart: bodies, initializers, default values.
    pub fn elided(&self) -> &[TextRange] {
        &self.elided
    }

    pub fn parent(&self) -> Option<MirrorId> {
        self.parent
    }

    pub fn children(&self) -> &[MirrorId] {
        &self.children
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MirrorTree {
    nodes: Vec<MirrorNode>,
    root: Option<MirrorId>,
}

impl MirrorTree {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn root(&self) -> Option<MirrorId> {
        self.root
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// # Panics
    ///
    /// If `id` was not issued by this tree.
    pub fn get(&self, id: MirrorId) -> &MirrorNode {
        &self.nodes[id.index()]
    }

    pub fn children(&self, id: MirrorId) -> &[MirrorId] {
        &self.get(id).children
    }

    /// Appends a node; the first parentless node becomes the root.
    pub fn push(&mut self, parent: Option<MirrorId>, kind: StubKind, range: TextRange) -> MirrorId {
        let id = MirrorId(self.nodes.len() as u32);
        self.nodes.push(MirrorNode {
            kind,
            range,
            name_range: None,
            reference_ranges: Vec::new(),
            elided: Vec::new(),
            parent,
            children: Vec::new(),
        });
        match parent {
            Some(parent) => self.nodes[parent.index()].children.push(id),
            None => {
                if self.root.is_none() {
                    self.root = Some(id);
                }
            }
        }
        id
    }

    pub fn set_name_range(&mut self, id: MirrorId, range: TextRange) {
        self.nodes[id.index()].name_range = Some(range);
    }

    pub fn push_reference_range(&mut self, id: MirrorId, range: TextRange) {
        self.nodes[id.index()].reference_ranges.push(range);
    }

    pub fn push_elided(&mut self, id: MirrorId, range: TextRange) {
        self.nodes[id.index()].elided.push(range);
    }
}

/// Parses mirror text into a [`MirrorTree`].
///
/// Implementations must be safe to share across threads; the engine may call `parse` for
/// several files at once.
pub trait MirrorParser: Send + Sync {
    fn parse(&self, text: &str) -> Result<MirrorTree, MirrorParseError>;
}

/// [`MirrorParser`] backed by `tree-sitter-java`.
#[derive(Debug, Clone, Copy, Default)]
pub struct JavaMirrorParser;

impl MirrorParser for JavaMirrorParser {
    fn parse(&self, text: &str) -> Result<MirrorTree, MirrorParseError> {
        let mut parser = Parser::new();
        parser
            .set_language(&tree_sitter_java::LANGUAGE.into())
            .map_err(|err| MirrorParseError::Language(err.to_string()))?;
        let tree = parser.parse(text, None).ok_or(MirrorParseError::Aborted)?;
        let root = tree.root_node();
        if root.has_error() {
            let offset = first_error(root).unwrap_or(root.start_byte());
            return Err(MirrorParseError::Syntax { offset });
        }

        let mut mirror = MirrorTree::new();
        let mut cursor = root.walk();
        let declaration = root
            .named_children(&mut cursor)
            .find(|child| is_type_declaration(child.kind()));
        if let Some(declaration) = declaration {
            convert_type_declaration(&mut mirror, declaration, None);
        }
        Ok(mirror)
    }
}

fn first_error(node: Node<'_>) -> Option<usize> {
    if node.is_error() || node.is_missing() {
        return Some(node.start_byte());
    }
    let mut cursor = node.walk();
    let children: Vec<Node<'_>> = node.children(&mut cursor).collect();
    children
        .into_iter()
        .filter(|child| child.has_error() || child.is_missing())
        .find_map(first_error)
}

fn is_type_declaration(kind: &str) -> bool {
    matches!(
        kind,
        "class_declaration"
            | "interface_declaration"
            | "enum_declaration"
            | "annotation_type_declaration"
    )
}

fn is_comment(kind: &str) -> bool {
    matches!(kind, "line_comment" | "block_comment")
}

fn offset(byte: usize) -> TextSize {
    TextSize::from(u32::try_from(byte).unwrap_or(u32::MAX))
}

fn range_of(node: Node<'_>) -> TextRange {
    TextRange::new(offset(node.start_byte()), offset(node.end_byte()))
}

fn empty_at(byte: usize) -> TextRange {
    TextRange::empty(offset(byte))
}

fn child_of_kind<'t>(node: Node<'t>, kind: &str) -> Option<Node<'t>> {
    let mut cursor = node.walk();
    let found = node.named_children(&mut cursor).find(|child| child.kind() == kind);
    found
}

fn named_children<'t>(node: Node<'t>) -> Vec<Node<'t>> {
    let mut cursor = node.walk();
    let children = node
        .named_children(&mut cursor)
        .filter(|child| !is_comment(child.kind()))
        .collect();
    children
}

fn convert_type_declaration(mirror: &mut MirrorTree, node: Node<'_>, parent: Option<MirrorId>) {
    let id = mirror.push(parent, StubKind::Class, range_of(node));
    let name = node.child_by_field_name("name");
    if let Some(name) = name {
        mirror.set_name_range(id, range_of(name));
    }
    let mut cursor_byte = name.map_or(node.start_byte(), |name| name.end_byte());

    convert_modifiers(mirror, id, child_of_kind(node, "modifiers"), node.start_byte());

    let type_parameters = node.child_by_field_name("type_parameters");
    convert_type_parameters(mirror, id, type_parameters, cursor_byte);
    if let Some(params) = type_parameters {
        cursor_byte = params.end_byte();
    }

    let (extends, implements) = match node.kind() {
        "class_declaration" => (
            node.child_by_field_name("superclass"),
            node.child_by_field_name("interfaces"),
        ),
        "interface_declaration" => (child_of_kind(node, "extends_interfaces"), None),
        "enum_declaration" => (None, child_of_kind(node, "super_interfaces")),
        _ => (None, None),
    };
    convert_reference_list(mirror, id, extends, cursor_byte);
    if let Some(extends) = extends {
        cursor_byte = extends.end_byte();
    }
    convert_reference_list(mirror, id, implements, cursor_byte);

    if let Some(body) = node.child_by_field_name("body") {
        convert_body(mirror, id, body);
    }
}

fn convert_body(mirror: &mut MirrorTree, owner: MirrorId, body: Node<'_>) {
    for item in named_children(body) {
        match item.kind() {
            "field_declaration" | "constant_declaration" => convert_field(mirror, owner, item),
            "enum_constant" => convert_enum_constant(mirror, owner, item),
            "enum_body_declarations" => convert_body(mirror, owner, item),
            "method_declaration" | "constructor_declaration" => {
                convert_method(mirror, owner, item)
            }
            "annotation_type_element_declaration" => convert_element(mirror, owner, item),
            kind if is_type_declaration(kind) => convert_type_declaration(mirror, item, Some(owner)),
            kind => {
                tracing::debug!(
                    target: "nova.decompile",
                    kind,
                    "ignoring unexpected declaration in mirror text"
                );
            }
        }
    }
}

fn convert_field(mirror: &mut MirrorTree, owner: MirrorId, node: Node<'_>) {
    let id = mirror.push(Some(owner), StubKind::Field, range_of(node));
    let mut cursor = node.walk();
    let declarators: Vec<Node<'_>> = node
        .children_by_field_name("declarator", &mut cursor)
        .collect();
    if let Some(name) = declarators
        .first()
        .and_then(|declarator| declarator.child_by_field_name("name"))
    {
        mirror.set_name_range(id, range_of(name));
    }
    for value in declarators
        .iter()
        .filter_map(|declarator| declarator.child_by_field_name("value"))
    {
        mirror.push_elided(id, range_of(value));
    }
    convert_modifiers(mirror, id, child_of_kind(node, "modifiers"), node.start_byte());
}

fn convert_enum_constant(mirror: &mut MirrorTree, owner: MirrorId, node: Node<'_>) {
    let id = mirror.push(Some(owner), StubKind::Field, range_of(node));
    if let Some(name) = node.child_by_field_name("name") {
        mirror.set_name_range(id, range_of(name));
    }
    for field in ["arguments", "body"] {
        if let Some(elided) = node.child_by_field_name(field) {
            mirror.push_elided(id, range_of(elided));
        }
    }
    convert_modifiers(mirror, id, child_of_kind(node, "modifiers"), node.start_byte());
}

fn convert_method(mirror: &mut MirrorTree, owner: MirrorId, node: Node<'_>) {
    let id = mirror.push(Some(owner), StubKind::Method, range_of(node));
    let name = node.child_by_field_name("name");
    if let Some(name) = name {
        mirror.set_name_range(id, range_of(name));
    }
    convert_modifiers(mirror, id, child_of_kind(node, "modifiers"), node.start_byte());

    // Without type parameters, the list sits where they would start: before the return type,
    // or before the name for constructors.
    let header = node
        .child_by_field_name("type")
        .or(name)
        .map_or(node.start_byte(), |header| header.start_byte());
    convert_type_parameters(
        mirror,
        id,
        node.child_by_field_name("type_parameters"),
        header,
    );

    let parameters = node.child_by_field_name("parameters");
    if let Some(parameters) = parameters {
        for param in named_children(parameters) {
            if matches!(param.kind(), "formal_parameter" | "spread_parameter") {
                convert_parameter(mirror, id, param);
            }
        }
    }

    let after_parameters = parameters
        .map(|parameters| parameters.end_byte())
        .or(name.map(|name| name.end_byte()))
        .unwrap_or(node.start_byte());
    convert_reference_list(mirror, id, child_of_kind(node, "throws"), after_parameters);

    if let Some(body) = node.child_by_field_name("body") {
        mirror.push_elided(id, range_of(body));
    }
}

fn convert_element(mirror: &mut MirrorTree, owner: MirrorId, node: Node<'_>) {
    let id = mirror.push(Some(owner), StubKind::Method, range_of(node));
    let name = node.child_by_field_name("name");
    if let Some(name) = name {
        mirror.set_name_range(id, range_of(name));
    }
    convert_modifiers(mirror, id, child_of_kind(node, "modifiers"), node.start_byte());
    let header = node
        .child_by_field_name("type")
        .map_or(node.start_byte(), |ty| ty.start_byte());
    convert_type_parameters(mirror, id, None, header);
    let after_name = name.map_or(node.start_byte(), |name| name.end_byte());
    convert_reference_list(mirror, id, None, after_name);
    if let Some(value) = node.child_by_field_name("value") {
        mirror.push_elided(id, range_of(value));
    }
}

fn convert_parameter(mirror: &mut MirrorTree, owner: MirrorId, node: Node<'_>) {
    let id = mirror.push(Some(owner), StubKind::Parameter, range_of(node));
    let name = match node.kind() {
        "spread_parameter" => child_of_kind(node, "variable_declarator")
            .and_then(|declarator| declarator.child_by_field_name("name")),
        _ => node.child_by_field_name("name"),
    };
    if let Some(name) = name {
        mirror.set_name_range(id, range_of(name));
    }
    convert_modifiers(mirror, id, child_of_kind(node, "modifiers"), node.start_byte());
}

fn convert_modifiers(
    mirror: &mut MirrorTree,
    owner: MirrorId,
    node: Option<Node<'_>>,
    fallback: usize,
) {
    let Some(node) = node else {
        mirror.push(Some(owner), StubKind::ModifierList, empty_at(fallback));
        return;
    };
    let id = mirror.push(Some(owner), StubKind::ModifierList, range_of(node));
    for child in named_children(node) {
        if matches!(child.kind(), "annotation" | "marker_annotation") {
            let annotation = mirror.push(Some(id), StubKind::Annotation, range_of(child));
            if let Some(name) = child.child_by_field_name("name") {
                mirror.set_name_range(annotation, range_of(name));
            }
        }
    }
}

fn convert_type_parameters(
    mirror: &mut MirrorTree,
    owner: MirrorId,
    node: Option<Node<'_>>,
    fallback: usize,
) {
    let Some(node) = node else {
        mirror.push(Some(owner), StubKind::TypeParameterList, empty_at(fallback));
        return;
    };
    let list = mirror.push(Some(owner), StubKind::TypeParameterList, range_of(node));
    for param in named_children(node) {
        if param.kind() != "type_parameter" {
            continue;
        }
        let id = mirror.push(Some(list), StubKind::TypeParameter, range_of(param));
        if let Some(name) = child_of_kind(param, "type_identifier") {
            mirror.set_name_range(id, range_of(name));
        }
        convert_reference_list(mirror, id, child_of_kind(param, "type_bound"), param.end_byte());
    }
}

/// A clause such as `extends A` or `throws X, Y`; every named child except a `type_list`
/// wrapper is one referenced type.
fn convert_reference_list(
    mirror: &mut MirrorTree,
    owner: MirrorId,
    node: Option<Node<'_>>,
    fallback: usize,
) {
    let Some(node) = node else {
        mirror.push(Some(owner), StubKind::ReferenceList, empty_at(fallback));
        return;
    };
    let id = mirror.push(Some(owner), StubKind::ReferenceList, range_of(node));
    for child in named_children(node) {
        if child.kind() == "type_list" {
            for ty in named_children(child) {
                mirror.push_reference_range(id, range_of(ty));
            }
        } else {
            mirror.push_reference_range(id, range_of(child));
        }
    }
}
