//! Renders a [`StubTree`] as Java-like source text.
//!
//! The output is deterministic and re-parses into a declaration tree whose shape matches the stub
//! tree child for child; the binder depends on both properties.

use nova_classfile::{
    ClassData, ClassKind, FieldData, MethodData, Modifiers, ReferenceRole, StubData, StubId,
    StubKind, StubTree, KEYWORD_ORDER,
};

use crate::config::DecompileConfig;

const DEPRECATED_COMMENT: &str = "/** @deprecated */";

/// The mirror text for `tree`; the placeholder tree renders as the empty document.
pub fn synthesize(tree: &StubTree, config: &DecompileConfig) -> String {
    let Some(root) = tree.root() else {
        return String::new();
    };
    let mut printer = Printer {
        tree,
        config,
        out: String::new(),
    };
    if let StubData::Class(class) = tree.data(root) {
        if !class.package.is_empty() {
            printer.out.push_str("package ");
            printer.out.push_str(&class.package);
            printer.out.push_str(";\n\n");
        }
    }
    printer.class(root, 0, None);
    printer.out
}

/// Keyword order used in headers; bits outside it are never printed.
pub fn modifier_keywords(modifiers: Modifiers) -> impl Iterator<Item = &'static str> {
    KEYWORD_ORDER
        .into_iter()
        .filter(move |(flag, _)| modifiers.contains(*flag))
        .map(|(_, keyword)| keyword)
}

/// Modifiers printed on a class header nested in `owner` (`None` at top level).
pub fn printed_class_modifiers(class: &ClassData, owner: Option<ClassKind>) -> Modifiers {
    let mut modifiers = class.modifiers.keywords();
    match class.kind {
        ClassKind::Interface | ClassKind::Annotation => modifiers.remove(Modifiers::ABSTRACT),
        ClassKind::Enum => modifiers.remove(Modifiers::FINAL | Modifiers::ABSTRACT),
        ClassKind::Class => {}
    }
    match owner {
        None => modifiers.remove(Modifiers::STATIC),
        Some(owner) => {
            if class.kind != ClassKind::Class {
                modifiers.remove(Modifiers::STATIC);
            }
            if owner.is_interface_like() {
                modifiers.remove(Modifiers::PUBLIC | Modifiers::STATIC);
            }
        }
    }
    modifiers
}

pub fn printed_field_modifiers(field: &FieldData, owner: ClassKind) -> Modifiers {
    if field.enum_constant && owner == ClassKind::Enum {
        return Modifiers::empty();
    }
    let mut modifiers = field.modifiers.keywords();
    if owner.is_interface_like() {
        modifiers.remove(Modifiers::PUBLIC | Modifiers::STATIC | Modifiers::FINAL);
    }
    modifiers
}

pub fn printed_method_modifiers(method: &MethodData, owner: ClassKind) -> Modifiers {
    let mut modifiers = method.modifiers.keywords();
    if owner.is_interface_like() {
        modifiers.remove(Modifiers::PUBLIC | Modifiers::ABSTRACT);
    }
    if owner == ClassKind::Enum && method.constructor {
        modifiers.remove(Modifiers::PRIVATE);
    }
    modifiers
}

struct Printer<'a> {
    tree: &'a StubTree,
    config: &'a DecompileConfig,
    out: String,
}

impl Printer<'_> {
    fn class(&mut self, id: StubId, depth: usize, owner: Option<ClassKind>) {
        let tree = self.tree;
        let StubData::Class(class) = tree.data(id) else {
            return;
        };
        let indent = self.config.indent(depth);
        self.leading(id, &indent, class.deprecated);

        self.out.push_str(&indent);
        self.keywords(printed_class_modifiers(class, owner));
        self.out.push_str(class.kind.keyword());
        self.out.push(' ');
        self.out.push_str(&class.short_name);
        self.type_parameters(id);
        self.reference_clause(id, ReferenceRole::Extends, " extends ");
        self.reference_clause(id, ReferenceRole::Implements, " implements ");
        self.out.push_str(" {\n");

        let members = tree.children(id).iter().copied().filter(|child| {
            matches!(
                tree.get(*child).kind(),
                StubKind::Field | StubKind::Method | StubKind::Class
            )
        });
        // Constants only print as such inside an enum; elsewhere they are plain fields.
        let (constants, others): (Vec<StubId>, Vec<StubId>) = members.partition(|member| {
            class.kind == ClassKind::Enum
                && matches!(tree.data(*member), StubData::Field(field) if field.enum_constant)
        });

        let member_indent = self.config.indent(depth + 1);
        if class.kind == ClassKind::Enum {
            for (i, constant) in constants.iter().enumerate() {
                let terminator = if i + 1 == constants.len() { ";" } else { "," };
                self.enum_constant(*constant, &member_indent, terminator);
            }
            if constants.is_empty() && !others.is_empty() {
                self.out.push_str(&member_indent);
                self.out.push_str(";\n");
            }
            if !others.is_empty() {
                self.out.push('\n');
            }
        }

        for (i, member) in others.iter().enumerate() {
            if i > 0 {
                self.out.push('\n');
            }
            self.member(*member, depth + 1, class.kind);
        }

        self.out.push_str(&indent);
        self.out.push_str("}\n");
    }

    fn member(&mut self, id: StubId, depth: usize, owner: ClassKind) {
        let tree = self.tree;
        match tree.data(id) {
            StubData::Field(field) => self.field(id, field, depth, owner),
            StubData::Method(method) => self.method(id, method, depth, owner),
            StubData::Class(_) => self.class(id, depth, Some(owner)),
            _ => {}
        }
    }

    fn enum_constant(&mut self, id: StubId, indent: &str, terminator: &str) {
        let tree = self.tree;
        let StubData::Field(field) = tree.data(id) else {
            return;
        };
        self.leading(id, indent, field.deprecated);
        self.out.push_str(indent);
        self.out.push_str(&field.name);
        self.out.push_str(terminator);
        self.out.push('\n');
    }

    fn field(&mut self, id: StubId, field: &FieldData, depth: usize, owner: ClassKind) {
        let indent = self.config.indent(depth);
        self.leading(id, &indent, field.deprecated);
        self.out.push_str(&indent);
        self.keywords(printed_field_modifiers(field, owner));
        self.out.push_str(&field.type_text);
        self.out.push(' ');
        self.out.push_str(&field.name);
        if let Some(init) = &field.initializer {
            self.out.push_str(" = ");
            self.out.push_str(init);
        }
        self.out.push_str(";\n");
    }

    fn method(&mut self, id: StubId, method: &MethodData, depth: usize, owner: ClassKind) {
        let indent = self.config.indent(depth);
        self.leading(id, &indent, method.deprecated);
        self.out.push_str(&indent);
        self.keywords(printed_method_modifiers(method, owner));
        if self.type_parameters(id) {
            self.out.push(' ');
        }
        if let Some(return_type) = &method.return_type {
            self.out.push_str(return_type);
            self.out.push(' ');
        }
        self.out.push_str(&method.name);
        self.out.push('(');
        let tree = self.tree;
        let params: Vec<StubId> = tree
            .children(id)
            .iter()
            .copied()
            .filter(|child| tree.get(*child).kind() == StubKind::Parameter)
            .collect();
        for (i, param) in params.iter().enumerate() {
            if i > 0 {
                self.out.push_str(", ");
            }
            self.parameter(*param);
        }
        self.out.push(')');
        self.reference_clause(id, ReferenceRole::Throws, " throws ");
        if let Some(default) = &method.annotation_default {
            self.out.push_str(" default ");
            self.out.push_str(default);
        }
        let bodiless = method
            .modifiers
            .intersects(Modifiers::ABSTRACT | Modifiers::NATIVE)
            || owner == ClassKind::Annotation;
        if bodiless {
            self.out.push(';');
        } else {
            self.out.push(' ');
            self.out.push_str(&self.config.body_placeholder);
        }
        self.out.push('\n');
    }

    fn parameter(&mut self, id: StubId) {
        let tree = self.tree;
        let StubData::Parameter(param) = tree.data(id) else {
            return;
        };
        let mut modifiers = Modifiers::empty();
        if let Some(list) = tree.child_of_kind(id, StubKind::ModifierList) {
            for annotation in annotations(tree, list) {
                self.out.push_str(annotation);
                self.out.push(' ');
            }
            if let StubData::ModifierList { modifiers: flags } = tree.data(list) {
                modifiers = *flags & Modifiers::FINAL;
            }
        }
        self.keywords(modifiers);
        self.out.push_str(&param.type_text);
        self.out.push(' ');
        self.out.push_str(&param.name);
    }

    /// Deprecation comment and annotations, one per line.
    fn leading(&mut self, owner: StubId, indent: &str, deprecated: bool) {
        if deprecated && self.config.deprecation_comments {
            self.out.push_str(indent);
            self.out.push_str(DEPRECATED_COMMENT);
            self.out.push('\n');
        }
        let tree = self.tree;
        let Some(list) = tree.child_of_kind(owner, StubKind::ModifierList) else {
            return;
        };
        for annotation in annotations(tree, list) {
            self.out.push_str(indent);
            self.out.push_str(annotation);
            self.out.push('\n');
        }
    }

    fn keywords(&mut self, modifiers: Modifiers) {
        for keyword in modifier_keywords(modifiers) {
            self.out.push_str(keyword);
            self.out.push(' ');
        }
    }

    /// Returns whether anything was printed.
    fn type_parameters(&mut self, owner: StubId) -> bool {
        let tree = self.tree;
        let Some(list) = tree.child_of_kind(owner, StubKind::TypeParameterList) else {
            return false;
        };
        let params = tree.children(list);
        if params.is_empty() {
            return false;
        }
        self.out.push('<');
        for (i, param) in params.iter().enumerate() {
            if i > 0 {
                self.out.push_str(", ");
            }
            if let Some(name) = tree.get(*param).name() {
                self.out.push_str(name);
            }
            if let Some(bounds) = tree.reference_list(*param, ReferenceRole::Bounds) {
                if let StubData::ReferenceList { types, .. } = tree.data(bounds) {
                    if !types.is_empty() {
                        self.out.push_str(" extends ");
                        self.out.push_str(&types.join(" & "));
                    }
                }
            }
        }
        self.out.push('>');
        true
    }

    fn reference_clause(&mut self, owner: StubId, role: ReferenceRole, keyword: &str) {
        let tree = self.tree;
        let Some(list) = tree.reference_list(owner, role) else {
            return;
        };
        if let StubData::ReferenceList { types, .. } = tree.data(list) {
            if !types.is_empty() {
                self.out.push_str(keyword);
                self.out.push_str(&types.join(", "));
            }
        }
    }
}

fn annotations(tree: &StubTree, list: StubId) -> Vec<&str> {
    tree.children(list)
        .iter()
        .filter_map(|child| match tree.data(*child) {
            StubData::Annotation { text, .. } => Some(text.as_str()),
            _ => None,
        })
        .collect()
}
