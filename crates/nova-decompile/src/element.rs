use std::fmt;
use std::sync::Arc;

use nova_classfile::{
    ClassKind, Modifiers, ReferenceRole, StubData, StubId, StubKind, StubNode, StubPath, StubTree,
};
use text_size::TextRange;

use crate::error::{DecompileError, Result};
use crate::file::CompiledFile;

/// A read-only view of one stub node.
///
/// Structural getters answer from the stub tree the element was created from. Text getters go
/// through the owning file and return `None` once its content has been replaced.
#[derive(Clone)]
pub struct CompiledElement<'f> {
    file: &'f CompiledFile,
    version: u64,
    stub: Arc<StubTree>,
    id: StubId,
    path: StubPath,
}

impl fmt::Debug for CompiledElement<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CompiledElement")
            .field("path", &self.path)
            .field("kind", &self.kind())
            .field("name", &self.name())
            .finish()
    }
}

impl PartialEq for CompiledElement<'_> {
    fn eq(&self, other: &Self) -> bool {
        std::ptr::eq(self.file, other.file)
            && self.version == other.version
            && self.path == other.path
    }
}

impl Eq for CompiledElement<'_> {}

impl<'f> CompiledElement<'f> {
    pub(crate) fn new(file: &'f CompiledFile, version: u64, stub: Arc<StubTree>, id: StubId) -> Self {
        let path = stub.path_of(id);
        Self {
            file,
            version,
            stub,
            id,
            path,
        }
    }

    fn at(&self, id: StubId) -> Self {
        Self::new(self.file, self.version, Arc::clone(&self.stub), id)
    }

    pub fn file(&self) -> &'f CompiledFile {
        self.file
    }

    pub fn path(&self) -> &StubPath {
        &self.path
    }

    /// The content version this element was read from.
    pub fn version(&self) -> u64 {
        self.version
    }

    pub fn node(&self) -> &StubNode {
        self.stub.get(self.id)
    }

    pub fn data(&self) -> &StubData {
        self.stub.data(self.id)
    }

    pub fn kind(&self) -> StubKind {
        self.node().kind()
    }

    pub fn name(&self) -> Option<&str> {
        self.node().name()
    }

    /// Declared modifiers; for parameters, those of their modifier list.
    pub fn modifiers(&self) -> Option<Modifiers> {
        match self.data() {
            StubData::Parameter(_) => self
                .modifier_list()
                .and_then(|list| list.node().modifiers()),
            _ => self.node().modifiers(),
        }
    }

    pub fn has_modifier(&self, modifier: Modifiers) -> bool {
        self.modifiers()
            .is_some_and(|modifiers| modifiers.contains(modifier))
    }

    pub fn class_kind(&self) -> Option<ClassKind> {
        match self.data() {
            StubData::Class(class) => Some(class.kind),
            _ => None,
        }
    }

    /// Dotted name of a class, or of an annotation's type.
    pub fn qualified_name(&self) -> Option<&str> {
        match self.data() {
            StubData::Class(class) => Some(&class.qualified_name),
            StubData::Annotation { qualified_name, .. } => Some(qualified_name),
            _ => None,
        }
    }

    /// Field or parameter type, or method return type.
    pub fn type_text(&self) -> Option<&str> {
        match self.data() {
            StubData::Field(field) => Some(&field.type_text),
            StubData::Parameter(param) => Some(&param.type_text),
            StubData::Method(method) => method.return_type.as_deref(),
            _ => None,
        }
    }

    pub fn reference_role(&self) -> Option<ReferenceRole> {
        match self.data() {
            StubData::ReferenceList { role, .. } => Some(*role),
            _ => None,
        }
    }

    /// Types named by a reference list; empty for every other kind.
    pub fn referenced_types(&self) -> &[String] {
        match self.data() {
            StubData::ReferenceList { types, .. } => types.as_slice(),
            _ => &[],
        }
    }

    pub fn initializer(&self) -> Option<&str> {
        match self.data() {
            StubData::Field(field) => field.initializer.as_deref(),
            _ => None,
        }
    }

    pub fn annotation_default(&self) -> Option<&str> {
        match self.data() {
            StubData::Method(method) => method.annotation_default.as_deref(),
            _ => None,
        }
    }

    pub fn annotation_text(&self) -> Option<&str> {
        match self.data() {
            StubData::Annotation { text, .. } => Some(text),
            _ => None,
        }
    }

    pub fn is_deprecated(&self) -> bool {
        self.node().is_deprecated()
    }

    pub fn is_varargs(&self) -> bool {
        matches!(self.data(), StubData::Method(method) if method.varargs)
    }

    pub fn is_enum_constant(&self) -> bool {
        matches!(self.data(), StubData::Field(field) if field.enum_constant)
    }

    pub fn is_constructor(&self) -> bool {
        matches!(self.data(), StubData::Method(method) if method.constructor)
    }

    pub fn parent(&self) -> Option<CompiledElement<'f>> {
        self.stub.parent(self.id).map(|id| self.at(id))
    }

    pub fn children(&self) -> Vec<CompiledElement<'f>> {
        self.stub
            .children(self.id)
            .iter()
            .map(|id| self.at(*id))
            .collect()
    }

    pub fn child(&self, index: usize) -> Option<CompiledElement<'f>> {
        self.stub
            .children(self.id)
            .get(index)
            .map(|id| self.at(*id))
    }

    pub fn children_of_kind(&self, kind: StubKind) -> Vec<CompiledElement<'f>> {
        self.stub
            .children(self.id)
            .iter()
            .filter(|id| self.stub.get(**id).kind() == kind)
            .map(|id| self.at(*id))
            .collect()
    }

    pub fn modifier_list(&self) -> Option<CompiledElement<'f>> {
        self.stub
            .child_of_kind(self.id, StubKind::ModifierList)
            .map(|id| self.at(id))
    }

    pub fn type_parameter_list(&self) -> Option<CompiledElement<'f>> {
        self.stub
            .child_of_kind(self.id, StubKind::TypeParameterList)
            .map(|id| self.at(id))
    }

    pub fn reference_list(&self, role: ReferenceRole) -> Option<CompiledElement<'f>> {
        self.stub
            .reference_list(self.id, role)
            .map(|id| self.at(id))
    }

    pub fn fields(&self) -> Vec<CompiledElement<'f>> {
        self.children_of_kind(StubKind::Field)
    }

    pub fn methods(&self) -> Vec<CompiledElement<'f>> {
        self.children_of_kind(StubKind::Method)
    }

    pub fn inner_classes(&self) -> Vec<CompiledElement<'f>> {
        self.children_of_kind(StubKind::Class)
    }

    pub fn parameters(&self) -> Vec<CompiledElement<'f>> {
        self.children_of_kind(StubKind::Parameter)
    }

    pub fn type_parameters(&self) -> Vec<CompiledElement<'f>> {
        self.type_parameter_list()
            .map(|list| list.children())
            .unwrap_or_default()
    }

    pub fn annotations(&self) -> Vec<CompiledElement<'f>> {
        self.modifier_list()
            .map(|list| list.children())
            .unwrap_or_default()
    }

    pub fn text_range(&self) -> Option<TextRange> {
        self.file.text_range_at(Some(self.version), &self.path)
    }

    pub fn name_range(&self) -> Option<TextRange> {
        self.file.name_range_at(Some(self.version), &self.path)
    }

    pub fn navigation_range(&self) -> Option<TextRange> {
        self.file.navigation_range_at(Some(self.version), &self.path)
    }

    pub fn text(&self) -> Option<String> {
        self.file.element_text_at(Some(self.version), &self.path)
    }

    pub fn add_child(&self, _text: &str) -> Result<()> {
        self.not_modifiable()
    }

    pub fn remove_child(&self, _index: usize) -> Result<()> {
        self.not_modifiable()
    }

    pub fn replace_child(&self, _index: usize, _text: &str) -> Result<()> {
        self.not_modifiable()
    }

    pub fn set_name(&self, _name: &str) -> Result<()> {
        self.not_modifiable()
    }

    pub fn set_modifier(&self, _modifier: Modifiers, _present: bool) -> Result<()> {
        self.not_modifiable()
    }

    pub fn set_initializer(&self, _text: Option<&str>) -> Result<()> {
        self.not_modifiable()
    }

    fn not_modifiable(&self) -> Result<()> {
        Err(DecompileError::NotModifiable {
            path: self.path.clone(),
        })
    }
}
