//! The stub tree: a compact structural record of one top-level class and its nested classes.
//!
//! Nodes live in an arena addressed by [`StubId`]. Child order is fixed per kind:
//!
//! - class: modifier list, type parameter list, `extends` list, `implements` list, fields
//!   (enum constants first), methods, inner classes
//! - field: modifier list
//! - method: modifier list, type parameter list, parameters, `throws` list
//! - parameter: modifier list
//! - modifier list: annotations
//! - type parameter list: type parameters
//! - type parameter: bounds list
//!
//! Reference lists and annotations are leaves.

use std::fmt;

use crate::flags::Modifiers;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct StubId(u32);

impl StubId {
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// Child indices from the root; the root itself is the empty path.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct StubPath(Vec<u32>);

impl StubPath {
    pub fn root() -> Self {
        Self::default()
    }

    pub fn from_indices(indices: impl IntoIterator<Item = u32>) -> Self {
        Self(indices.into_iter().collect())
    }

    pub fn child(&self, index: usize) -> Self {
        let mut indices = self.0.clone();
        indices.push(index as u32);
        Self(indices)
    }

    pub fn parent(&self) -> Option<Self> {
        let (_, rest) = self.0.split_last()?;
        Some(Self(rest.to_vec()))
    }

    pub fn indices(&self) -> &[u32] {
        &self.0
    }

    pub fn is_root(&self) -> bool {
        self.0.is_empty()
    }

    pub fn depth(&self) -> usize {
        self.0.len()
    }
}

impl fmt::Display for StubPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("/")?;
        for (i, idx) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str("/")?;
            }
            write!(f, "{idx}")?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StubKind {
    Class,
    Field,
    Method,
    Parameter,
    ModifierList,
    ReferenceList,
    TypeParameter,
    TypeParameterList,
    Annotation,
}

impl StubKind {
    /// Kinds whose children participate in binding.
    pub fn is_composite(self) -> bool {
        !matches!(self, StubKind::ReferenceList | StubKind::Annotation)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ClassKind {
    Class,
    Interface,
    Enum,
    Annotation,
}

impl ClassKind {
    pub fn from_modifiers(modifiers: Modifiers) -> Self {
        if modifiers.is_annotation() {
            ClassKind::Annotation
        } else if modifiers.is_interface() {
            ClassKind::Interface
        } else if modifiers.is_enum() {
            ClassKind::Enum
        } else {
            ClassKind::Class
        }
    }

    pub fn keyword(self) -> &'static str {
        match self {
            ClassKind::Class => "class",
            ClassKind::Interface => "interface",
            ClassKind::Enum => "enum",
            ClassKind::Annotation => "@interface",
        }
    }

    pub fn is_interface_like(self) -> bool {
        matches!(self, ClassKind::Interface | ClassKind::Annotation)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ReferenceRole {
    Extends,
    Implements,
    Throws,
    Bounds,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassData {
    pub short_name: String,
    /// Dotted source name (`a.b.Outer.Inner`).
    pub qualified_name: String,
    pub package: String,
    pub modifiers: Modifiers,
    pub deprecated: bool,
    pub kind: ClassKind,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldData {
    pub name: String,
    pub modifiers: Modifiers,
    pub type_text: String,
    pub initializer: Option<String>,
    pub deprecated: bool,
    pub enum_constant: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MethodData {
    pub name: String,
    pub modifiers: Modifiers,
    /// `None` for constructors.
    pub return_type: Option<String>,
    pub constructor: bool,
    pub varargs: bool,
    pub deprecated: bool,
    pub annotation_default: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParameterData {
    pub name: String,
    pub type_text: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StubData {
    Class(ClassData),
    Field(FieldData),
    Method(MethodData),
    Parameter(ParameterData),
    ModifierList { modifiers: Modifiers },
    ReferenceList { role: ReferenceRole, types: Vec<String> },
    TypeParameter { name: String },
    TypeParameterList,
    Annotation { text: String, qualified_name: String },
}

impl StubData {
    pub fn kind(&self) -> StubKind {
        match self {
            StubData::Class(_) => StubKind::Class,
            StubData::Field(_) => StubKind::Field,
            StubData::Method(_) => StubKind::Method,
            StubData::Parameter(_) => StubKind::Parameter,
            StubData::ModifierList { .. } => StubKind::ModifierList,
            StubData::ReferenceList { .. } => StubKind::ReferenceList,
            StubData::TypeParameter { .. } => StubKind::TypeParameter,
            StubData::TypeParameterList => StubKind::TypeParameterList,
            StubData::Annotation { .. } => StubKind::Annotation,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StubNode {
    parent: Option<StubId>,
    children: Vec<StubId>,
    data: StubData,
}

impl StubNode {
    pub fn kind(&self) -> StubKind {
        self.data.kind()
    }

    pub fn data(&self) -> &StubData {
        &self.data
    }

    pub fn parent(&self) -> Option<StubId> {
        self.parent
    }

    pub fn children(&self) -> &[StubId] {
        &self.children
    }

    /// The declared name, for the kinds that have one.
    pub fn name(&self) -> Option<&str> {
        match &self.data {
            StubData::Class(class) => Some(&class.short_name),
            StubData::Field(field) => Some(&field.name),
            StubData::Method(method) => Some(&method.name),
            StubData::Parameter(param) => Some(&param.name),
            StubData::TypeParameter { name } => Some(name),
            _ => None,
        }
    }

    pub fn modifiers(&self) -> Option<Modifiers> {
        match &self.data {
            StubData::Class(class) => Some(class.modifiers),
            StubData::Field(field) => Some(field.modifiers),
            StubData::Method(method) => Some(method.modifiers),
            StubData::ModifierList { modifiers } => Some(*modifiers),
            _ => None,
        }
    }

    pub fn is_deprecated(&self) -> bool {
        match &self.data {
            StubData::Class(class) => class.deprecated,
            StubData::Field(field) => field.deprecated,
            StubData::Method(method) => method.deprecated,
            _ => false,
        }
    }
}

/// Immutable once built; the builder is the only producer.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StubTree {
    nodes: Vec<StubNode>,
    root: Option<StubId>,
}

impl StubTree {
    /// The root-less tree standing in for undecodable input and `module-info`/`package-info`.
    pub fn placeholder() -> Self {
        Self::default()
    }

    pub fn is_placeholder(&self) -> bool {
        self.root.is_none()
    }

    pub fn root(&self) -> Option<StubId> {
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
    pub fn get(&self, id: StubId) -> &StubNode {
        &self.nodes[id.index()]
    }

    pub fn data(&self, id: StubId) -> &StubData {
        &self.get(id).data
    }

    pub fn children(&self, id: StubId) -> &[StubId] {
        &self.get(id).children
    }

    pub fn parent(&self, id: StubId) -> Option<StubId> {
        self.get(id).parent
    }

    /// First child of `id` with the given kind.
    pub fn child_of_kind(&self, id: StubId, kind: StubKind) -> Option<StubId> {
        self.children(id)
            .iter()
            .copied()
            .find(|child| self.get(*child).kind() == kind)
    }

    pub fn reference_list(&self, id: StubId, role: ReferenceRole) -> Option<StubId> {
        self.children(id).iter().copied().find(|child| {
            matches!(self.data(*child), StubData::ReferenceList { role: r, .. } if *r == role)
        })
    }

    pub fn path_of(&self, id: StubId) -> StubPath {
        let mut indices = Vec::new();
        let mut current = id;
        while let Some(parent) = self.parent(current) {
            let pos = self
                .children(parent)
                .iter()
                .position(|child| *child == current)
                .unwrap_or_default();
            indices.push(pos as u32);
            current = parent;
        }
        indices.reverse();
        StubPath(indices)
    }

    pub fn resolve(&self, path: &StubPath) -> Option<StubId> {
        let mut current = self.root?;
        for idx in path.indices() {
            current = *self.children(current).get(*idx as usize)?;
        }
        Some(current)
    }

    /// Pre-order walk from the root.
    pub fn descendants(&self) -> Vec<StubId> {
        let mut out = Vec::with_capacity(self.nodes.len());
        let mut stack: Vec<StubId> = self.root.into_iter().collect();
        while let Some(id) = stack.pop() {
            out.push(id);
            stack.extend(self.children(id).iter().rev().copied());
        }
        out
    }

    pub(crate) fn push(&mut self, parent: Option<StubId>, data: StubData) -> StubId {
        let id = StubId(self.nodes.len() as u32);
        self.nodes.push(StubNode {
            parent,
            children: Vec::new(),
            data,
        });
        match parent {
            Some(parent) => self.nodes[parent.index()].children.push(id),
            None => self.root = Some(id),
        }
        id
    }
}
